//! Charset/partition geometry, outgroup promotion, and minimum-gene-count
//! filtering.
//!
//! Offsets are 1-based and inclusive, the convention shared by NEXUS and
//! PHYLIP charset blocks, and are derived solely from the widths of the
//! blocks actually emitted, so the charset block can never drift from the
//! alignment.

use std::collections::HashMap;

use crate::assemble::GeneBlock;
use crate::errors::DatasetError;
use crate::request::{PartitionScheme, PositionSet};

/// A possibly strided 1-based inclusive character range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetRange {
    pub start: usize,
    pub end: usize,
    pub stride: Option<usize>,
}

impl std::fmt::Display for CharsetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stride {
            Some(stride) => write!(f, "{}-{}\\{}", self.start, self.end, stride),
            None => write!(f, "{}-{}", self.start, self.end),
        }
    }
}

/// A named charset covering one or more ranges of the concatenated matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    pub name: String,
    pub ranges: Vec<CharsetRange>,
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "charset {} = ", self.name)?;
        let ranges: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{};", ranges.join(" "))
    }
}

/// The planner's output: ordered charsets plus the matrix dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionMap {
    pub charsets: Vec<Charset>,
    pub total_width: usize,
    pub ntax: usize,
}

/// Moves the outgroup voucher to the first row of every gene block, keeping
/// the relative order of all other vouchers.
pub fn promote_outgroup(blocks: &mut [GeneBlock], outgroup: &str, warnings: &mut Vec<String>) {
    let known = blocks
        .first()
        .map(|b| b.rows.iter().any(|r| r.voucher_code == outgroup))
        .unwrap_or(false);
    if !known {
        warnings.push(format!("Could not find outgroup voucher {outgroup}"));
        return;
    }
    for block in blocks.iter_mut() {
        if let Some(idx) = block.rows.iter().position(|r| r.voucher_code == outgroup) {
            let row = block.rows.remove(idx);
            block.rows.insert(0, row);
        }
    }
}

/// Drops vouchers whose gene coverage (blocks with any real data) is below
/// `minimum` from every block.
pub fn filter_by_gene_count(blocks: &mut [GeneBlock], minimum: usize) {
    let mut coverage: HashMap<String, usize> = HashMap::new();
    for block in blocks.iter() {
        for row in &block.rows {
            if row.has_data {
                *coverage.entry(row.voucher_code.clone()).or_insert(0) += 1;
            }
        }
    }
    for block in blocks.iter_mut() {
        block
            .rows
            .retain(|r| coverage.get(&r.voucher_code).copied().unwrap_or(0) >= minimum);
    }
}

fn position_label(position: usize) -> &'static str {
    match position {
        1 => "1st",
        2 => "2nd",
        _ => "3rd",
    }
}

/// Selected codon positions (1-based), ascending.
fn selected_positions(positions: &PositionSet) -> Vec<usize> {
    positions.offsets().iter().map(|o| o + 1).collect()
}

/// The charset range for one codon position of a block starting at matrix
/// column `start`.
///
/// With all three positions in the matrix the block holds the raw sequence,
/// so the column of a position depends on the reading frame and strides by
/// 3. A filtered block is already in frame and interleaved, so the position
/// sits at its index within the selection and strides by the selection
/// size.
fn position_range(
    start: usize,
    width: usize,
    frame: u8,
    position: usize,
    positions: &PositionSet,
) -> CharsetRange {
    let end = start + width - 1;
    if positions.is_all() {
        CharsetRange {
            start: start + (frame as usize + position - 2) % 3,
            end,
            stride: Some(3),
        }
    } else {
        let offsets = positions.offsets();
        let index = offsets
            .iter()
            .position(|&o| o == position - 1)
            .unwrap_or(0);
        CharsetRange {
            start: start + index,
            end,
            stride: if offsets.len() > 1 { Some(offsets.len()) } else { None },
        }
    }
}

fn block_charsets(
    block: &GeneBlock,
    start: usize,
    scheme: PartitionScheme,
    positions: &PositionSet,
) -> Result<Vec<Charset>, DatasetError> {
    let end = start + block.width - 1;
    if scheme == PartitionScheme::ByGene {
        return Ok(vec![Charset {
            name: block.gene_code.clone(),
            ranges: vec![CharsetRange { start, end, stride: None }],
        }]);
    }

    let frame = block.reading_frame.ok_or(DatasetError::MissingReadingFrames)?;
    let selected = selected_positions(positions);

    let groups: Vec<Vec<usize>> = match scheme {
        PartitionScheme::ByCodonPosition => selected.iter().map(|&p| vec![p]).collect(),
        PartitionScheme::OnePlusTwoThree => {
            let first_second: Vec<usize> = selected.iter().copied().filter(|&p| p < 3).collect();
            let third: Vec<usize> = selected.iter().copied().filter(|&p| p == 3).collect();
            vec![first_second, third]
        }
        PartitionScheme::ByGene => unreachable!(),
    };

    let mut charsets = Vec::new();
    for group in groups.into_iter().filter(|g| !g.is_empty()) {
        let labels: Vec<&str> = group.iter().map(|&p| position_label(p)).collect();
        let name = format!("{}_{}", block.gene_code, labels.join("-"));

        // A group holding every position present in a filtered block is
        // simply the whole contiguous block.
        let ranges = if !positions.is_all() && group == selected {
            vec![CharsetRange { start, end, stride: None }]
        } else {
            group
                .iter()
                .map(|&p| position_range(start, block.width, frame, p, positions))
                .filter(|r| r.start <= r.end)
                .collect()
        };
        if !ranges.is_empty() {
            charsets.push(Charset { name, ranges });
        }
    }
    Ok(charsets)
}

/// Computes the charset map for the final block list. Fails when codon
/// sub-partitioning is requested and any block has no reading frame.
pub fn plan(
    blocks: &[GeneBlock],
    scheme: PartitionScheme,
    positions: &PositionSet,
) -> Result<PartitionMap, DatasetError> {
    let mut charsets = Vec::new();
    let mut offset = 1usize;
    for block in blocks {
        if block.width == 0 {
            continue;
        }
        charsets.extend(block_charsets(block, offset, scheme, positions)?);
        offset += block.width;
    }
    Ok(PartitionMap {
        charsets,
        total_width: offset - 1,
        ntax: blocks.first().map(|b| b.rows.len()).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::AssembledSequence;
    use crate::request::CodonPosition;

    fn row(voucher: &str, gene: &str, seq: &str, has_data: bool) -> AssembledSequence {
        AssembledSequence {
            voucher_code: voucher.to_string(),
            gene_code: gene.to_string(),
            label: voucher.to_string(),
            seq: seq.to_string(),
            has_data,
        }
    }

    fn block(gene: &str, width: usize, frame: Option<u8>, rows: Vec<AssembledSequence>) -> GeneBlock {
        GeneBlock {
            gene_code: gene.to_string(),
            width,
            reading_frame: frame,
            genetic_code: 1,
            rows,
        }
    }

    #[test]
    fn by_gene_charsets_are_contiguous_and_cover_the_matrix() {
        let blocks = vec![
            block("16S", 515, None, vec![]),
            block("COI", 1047, Some(2), vec![]),
        ];
        let map = plan(&blocks, PartitionScheme::ByGene, &PositionSet::all()).unwrap();
        assert_eq!(map.total_width, 1562);
        assert_eq!(map.charsets[0].to_string(), "charset 16S = 1-515;");
        assert_eq!(map.charsets[1].to_string(), "charset COI = 516-1562;");
    }

    #[test]
    fn each_scheme_strides_from_the_reading_frame() {
        let blocks = vec![block("COI", 12, Some(2), vec![])];
        let map = plan(&blocks, PartitionScheme::ByCodonPosition, &PositionSet::all()).unwrap();
        // Frame 2: base 1 is a 3rd position, base 2 opens the first codon.
        assert_eq!(map.charsets[0].to_string(), "charset COI_1st = 2-12\\3;");
        assert_eq!(map.charsets[1].to_string(), "charset COI_2nd = 3-12\\3;");
        assert_eq!(map.charsets[2].to_string(), "charset COI_3rd = 1-12\\3;");
    }

    #[test]
    fn each_scheme_requires_reading_frames() {
        let blocks = vec![block("16S", 515, None, vec![])];
        assert_eq!(
            plan(&blocks, PartitionScheme::ByCodonPosition, &PositionSet::all()),
            Err(DatasetError::MissingReadingFrames)
        );
    }

    #[test]
    fn one_plus_two_three_groups_positions() {
        let blocks = vec![block("COI", 12, Some(1), vec![])];
        let map = plan(&blocks, PartitionScheme::OnePlusTwoThree, &PositionSet::all()).unwrap();
        assert_eq!(
            map.charsets[0].to_string(),
            "charset COI_1st-2nd = 1-12\\3 2-12\\3;"
        );
        assert_eq!(map.charsets[1].to_string(), "charset COI_3rd = 3-12\\3;");
    }

    #[test]
    fn filtered_blocks_use_selection_strides() {
        let positions =
            PositionSet::normalize(&[CodonPosition::First, CodonPosition::Second]).unwrap();
        let blocks = vec![block("COI", 8, Some(1), vec![])];
        let map = plan(&blocks, PartitionScheme::ByCodonPosition, &positions).unwrap();
        assert_eq!(map.charsets[0].to_string(), "charset COI_1st = 1-8\\2;");
        assert_eq!(map.charsets[1].to_string(), "charset COI_2nd = 2-8\\2;");

        // 1st+2nd as one group over a 1st+2nd matrix is just the block.
        let map = plan(&blocks, PartitionScheme::OnePlusTwoThree, &positions).unwrap();
        assert_eq!(map.charsets.len(), 1);
        assert_eq!(map.charsets[0].to_string(), "charset COI_1st-2nd = 1-8;");
    }

    #[test]
    fn outgroup_moves_to_the_front_of_every_block() {
        let mut blocks = vec![
            block(
                "COI",
                4,
                Some(1),
                vec![row("A", "COI", "AAAA", true), row("B", "COI", "CCCC", true)],
            ),
            block(
                "EF1a",
                4,
                Some(1),
                vec![row("A", "EF1a", "GGGG", true), row("B", "EF1a", "TTTT", true)],
            ),
        ];
        let mut warnings = Vec::new();
        promote_outgroup(&mut blocks, "B", &mut warnings);
        assert!(warnings.is_empty());
        for block in &blocks {
            assert_eq!(block.rows[0].voucher_code, "B");
            assert_eq!(block.rows[1].voucher_code, "A");
        }
    }

    #[test]
    fn unknown_outgroup_is_a_warning_not_a_reorder() {
        let mut blocks = vec![block("COI", 4, Some(1), vec![row("A", "COI", "AAAA", true)])];
        let mut warnings = Vec::new();
        promote_outgroup(&mut blocks, "ZZ", &mut warnings);
        assert_eq!(warnings, vec!["Could not find outgroup voucher ZZ"]);
    }

    #[test]
    fn low_coverage_vouchers_are_dropped_everywhere() {
        let mut blocks = vec![
            block(
                "COI",
                4,
                Some(1),
                vec![row("A", "COI", "AAAA", true), row("B", "COI", "CCCC", true)],
            ),
            block(
                "EF1a",
                4,
                Some(1),
                vec![row("A", "EF1a", "GGGG", true), row("B", "EF1a", "????", false)],
            ),
        ];
        filter_by_gene_count(&mut blocks, 2);
        for block in &blocks {
            assert_eq!(block.rows.len(), 1);
            assert_eq!(block.rows[0].voucher_code, "A");
        }
    }
}
