//! End-to-end dataset assembly: normalize the request, assemble gene
//! blocks, filter/translate, plan partitions, and serialize.

use crate::assemble::{assemble, GeneBlock};
use crate::codon;
use crate::degen;
use crate::errors::DatasetError;
use crate::genetic_code::GeneticCode;
use crate::partition::{self, PartitionMap};
use crate::request::{
    resolve_gene_codes, resolve_voucher_codes, DatasetRequest, PartitionScheme, PositionSet,
};
use crate::store::SequenceSource;
use crate::writers::{self, WriterInput};

/// The outcome of one build. A fatal input error leaves `dataset_str` empty
/// and `errors` populated; data-completeness problems only add warnings.
#[derive(Debug)]
pub struct DatasetBuildResult {
    pub dataset_str: String,
    /// Standalone charset text, produced by the PHYLIP writer only.
    pub charset_block: Option<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Coordinates the pipeline over a read-only [`SequenceSource`]. Each
/// builder owns all of its intermediate state, so any number of builds can
/// run against the same store at once.
pub struct DatasetBuilder<'a> {
    store: &'a dyn SequenceSource,
    request: DatasetRequest,
}

impl<'a> DatasetBuilder<'a> {
    pub fn new(store: &'a dyn SequenceSource, request: DatasetRequest) -> Self {
        DatasetBuilder { store, request }
    }

    /// Runs the build to completion. Fatal errors never propagate past this
    /// boundary; they are translated into the result's `errors` list.
    pub fn build(&self) -> DatasetBuildResult {
        let mut warnings = Vec::new();
        match self.run(&mut warnings) {
            Ok((dataset_str, charset_block)) => DatasetBuildResult {
                dataset_str,
                charset_block,
                warnings,
                errors: Vec::new(),
            },
            Err(err) => {
                info!("Dataset build failed: {err}");
                DatasetBuildResult {
                    dataset_str: String::new(),
                    charset_block: None,
                    warnings,
                    errors: vec![err.to_string()],
                }
            }
        }
    }

    fn run(
        &self,
        warnings: &mut Vec<String>,
    ) -> Result<(String, Option<String>), DatasetError> {
        let request = &self.request;

        debug!("Normalizing input");
        let positions = PositionSet::normalize(&request.positions)?;
        if request.degen.is_some() {
            if !positions.is_all() {
                return Err(DatasetError::DegenRequiresAllPositions);
            }
            if request.partition_scheme != PartitionScheme::ByGene {
                return Err(DatasetError::DegenRequiresGenePartition);
            }
        }
        if request.aminoacids && request.partition_scheme != PartitionScheme::ByGene {
            return Err(DatasetError::AminoAcidPartition);
        }

        let gene_codes = resolve_gene_codes(request, self.store);
        let voucher_codes = resolve_voucher_codes(request, self.store);

        debug!("Assembling {} genes x {} vouchers", gene_codes.len(), voucher_codes.len());
        let mut blocks = assemble(
            self.store,
            &gene_codes,
            &voucher_codes,
            &request.taxon_names,
            warnings,
        );

        debug!("Filtering and translating");
        if request.aminoacids {
            if !positions.is_all() {
                warnings.push(
                    "Ignoring codon position selection: amino acid datasets use all codon positions"
                        .to_string(),
                );
            }
            translate_blocks(&mut blocks, warnings);
        } else if request.degen.is_some() {
            degenerate_blocks(&mut blocks, warnings);
        } else if !positions.is_all() {
            filter_blocks(&mut blocks, &positions, warnings);
        }

        debug!("Partitioning");
        if let Some(outgroup) = &request.outgroup {
            partition::promote_outgroup(&mut blocks, outgroup, warnings);
        }
        if let Some(minimum) = request.number_genes {
            partition::filter_by_gene_count(&mut blocks, minimum);
        }
        let partition = partition::plan(&blocks, request.partition_scheme, &positions)?;

        debug!("Writing {:?}", request.file_format);
        let outgroup_label = self.outgroup_label(&blocks);
        let output = writers::build(
            request.file_format,
            &WriterInput {
                blocks: &blocks,
                partition: &partition,
                aminoacids: request.aminoacids,
                outgroup_label,
            },
        );
        log_dimensions(&partition);
        Ok((output.dataset, output.charset_block))
    }

    /// Display label of the promoted outgroup row, when it made it into the
    /// final matrix.
    fn outgroup_label(&self, blocks: &[GeneBlock]) -> Option<String> {
        let outgroup = self.request.outgroup.as_deref()?;
        blocks
            .first()?
            .rows
            .iter()
            .find(|r| r.voucher_code == outgroup)
            .map(|r| r.label.clone())
    }
}

fn log_dimensions(partition: &PartitionMap) {
    info!(
        "Assembled matrix: {} taxa, {} characters, {} charsets",
        partition.ntax,
        partition.total_width,
        partition.charsets.len()
    );
}

/// Translates every block to amino acids. A gene with no reading frame
/// cannot be read in codons and collapses to a single `?` placeholder
/// column, so it keeps its charset without widening the matrix.
fn translate_blocks(blocks: &mut [GeneBlock], warnings: &mut Vec<String>) {
    for block in blocks.iter_mut() {
        let Some(frame) = block.reading_frame else {
            for row in &mut block.rows {
                row.seq = "?".to_string();
            }
            block.width = 1;
            continue;
        };
        let code = GeneticCode::from_id(block.genetic_code);
        for row in &mut block.rows {
            let aa = code.translate(codon::into_frame(&row.seq, frame));
            if aa.contains('*') {
                warnings.push(stop_codon_warning(&block.gene_code, &row.label));
            }
            row.seq = aa;
        }
        block.width = block.width.saturating_sub(frame as usize - 1) / 3;
    }
}

/// Replaces every codon with its degeneracy-family codon. Genes without a
/// reading frame cannot be degenerated and are left as raw nucleotides.
fn degenerate_blocks(blocks: &mut [GeneBlock], warnings: &mut Vec<String>) {
    for block in blocks.iter_mut() {
        let Some(frame) = block.reading_frame else {
            warnings.push(format!(
                "Gene {} was not degenerated: it has no reading frame",
                block.gene_code
            ));
            continue;
        };
        let code = GeneticCode::from_id(block.genetic_code);
        for row in &mut block.rows {
            let in_frame = codon::into_frame(&row.seq, frame);
            if code.translate(in_frame).contains('*') {
                warnings.push(stop_codon_warning(&block.gene_code, &row.label));
            }
            row.seq = degen::degenerate(code, in_frame);
        }
        block.width = block.width.saturating_sub(frame as usize - 1);
    }
}

/// Narrows every block to the selected codon positions. Genes without a
/// reading frame cannot be put in frame and are dropped with a warning.
fn filter_blocks(blocks: &mut Vec<GeneBlock>, positions: &PositionSet, warnings: &mut Vec<String>) {
    blocks.retain(|block| {
        if block.reading_frame.is_none() {
            warnings.push(format!(
                "Could not use gene {}: it has no reading frame",
                block.gene_code
            ));
        }
        block.reading_frame.is_some()
    });
    for block in blocks.iter_mut() {
        let frame = block.reading_frame.unwrap_or(1);
        for row in &mut block.rows {
            row.seq = codon::apply_positions(&row.seq, frame, positions);
        }
        block.width = codon::filtered_len(block.width, frame, positions);
    }
}

fn stop_codon_warning(gene_code: &str, label: &str) -> String {
    format!("Gene {gene_code}, sequence {label} contains stop codons \"*\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{CodonPosition, DegenMode, FileFormat, TaxonField};
    use crate::store::{GeneRecord, Store, VoucherRecord};

    fn store() -> Store {
        let mut store = Store::new();
        store.add_gene(GeneRecord {
            gene_code: "COI".to_string(),
            length: 9,
            reading_frame: Some(1),
            genetic_code: 1,
        });
        store.add_gene(GeneRecord {
            gene_code: "16S".to_string(),
            length: 6,
            reading_frame: None,
            genetic_code: 1,
        });
        store.add_voucher(VoucherRecord {
            code: "CP100-10".to_string(),
            genus: "Aus".to_string(),
            species: "aus".to_string(),
            ..Default::default()
        });
        store.add_voucher(VoucherRecord {
            code: "CP100-11".to_string(),
            genus: "Bus".to_string(),
            species: "bus".to_string(),
            ..Default::default()
        });
        store.add_sequence("CP100-10", "COI", "ATGGCTCAT").unwrap();
        store.add_sequence("CP100-10", "16S", "ACGTAC").unwrap();
        store.add_sequence("CP100-11", "COI", "ATGTAAGGG").unwrap();
        store
    }

    fn request() -> DatasetRequest {
        DatasetRequest {
            voucher_codes: vec!["CP100-10".to_string(), "CP100-11".to_string()],
            taxon_names: vec![TaxonField::Code, TaxonField::Genus, TaxonField::Species],
            ..Default::default()
        }
    }

    #[test]
    fn degen_with_partial_positions_fails_with_empty_dataset() {
        let store = store();
        let mut request = request();
        request.degen = Some(DegenMode::Normal);
        request.positions = vec![CodonPosition::First];
        let result = DatasetBuilder::new(&store, request).build();
        assert_eq!(result.dataset_str, "");
        assert_eq!(
            result.errors,
            vec!["Cannot degenerate codons if you have not selected all codon positions"]
        );
    }

    #[test]
    fn degen_with_position_partitions_fails() {
        let store = store();
        let mut request = request();
        request.degen = Some(DegenMode::Normal);
        request.partition_scheme = PartitionScheme::OnePlusTwoThree;
        let result = DatasetBuilder::new(&store, request).build();
        assert_eq!(
            result.errors,
            vec!["Cannot degenerate codons if they go to different partitions"]
        );
    }

    #[test]
    fn empty_positions_fail_the_build() {
        let store = store();
        let mut request = request();
        request.positions = Vec::new();
        let result = DatasetBuilder::new(&store, request).build();
        assert_eq!(result.errors, vec!["Codon positions requested are invalid or empty"]);
    }

    #[test]
    fn stop_codons_warn_once_per_sequence() {
        let store = store();
        let mut request = request();
        request.aminoacids = true;
        let result = DatasetBuilder::new(&store, request).build();
        assert!(result
            .warnings
            .contains(&"Gene COI, sequence CP100-11_Bus_bus contains stop codons \"*\"".to_string()));
        assert!(result.errors.is_empty());
    }

    #[test]
    fn frameless_genes_collapse_to_one_aa_column() {
        let store = store();
        let mut request = request();
        request.aminoacids = true;
        let result = DatasetBuilder::new(&store, request).build();
        // 16S gives one ? column, COI gives three residues.
        assert!(result.dataset_str.contains("DIMENSIONS NTAX=2 NCHAR=4;"));
        assert!(result.dataset_str.contains("charset 16S = 1-1;"));
        assert!(result.dataset_str.contains("charset COI = 2-4;"));
    }

    #[test]
    fn position_filter_drops_frameless_genes_with_a_warning() {
        let store = store();
        let mut request = request();
        request.positions = vec![CodonPosition::First, CodonPosition::Second];
        let result = DatasetBuilder::new(&store, request).build();
        assert!(result.dataset_str.contains("DIMENSIONS NTAX=2 NCHAR=6;"));
        assert!(result
            .warnings
            .contains(&"Could not use gene 16S: it has no reading frame".to_string()));
    }

    #[test]
    fn missing_pairs_fill_and_warn_but_do_not_fail() {
        let store = store();
        let result = DatasetBuilder::new(&store, request()).build();
        assert!(result.errors.is_empty());
        assert!(result
            .warnings
            .contains(&"Could not find sequences for voucher CP100-11 and gene_code 16S".to_string()));
        assert!(result.dataset_str.contains("??????"));
    }

    #[test]
    fn degenerated_dataset_keeps_nucleotide_space() {
        let store = store();
        let mut request = request();
        request.degen = Some(DegenMode::Normal);
        let result = DatasetBuilder::new(&store, request).build();
        assert!(result.errors.is_empty());
        // ATG GCT CAT degenerates to ATG GCN CAY.
        assert!(result.dataset_str.contains("ATGGCNCAY"));
    }

    #[test]
    fn genes_shorter_than_their_frame_offset_collapse_to_zero_width() {
        let mut store = store();
        store.add_gene(GeneRecord {
            gene_code: "stub".to_string(),
            length: 1,
            reading_frame: Some(3),
            genetic_code: 1,
        });
        store.add_sequence("CP100-10", "stub", "A").unwrap();

        let mut request = request();
        request.aminoacids = true;
        let result = DatasetBuilder::new(&store, request).build();
        assert!(result.errors.is_empty());
        // The stub gene contributes no columns and no charset.
        assert!(result.dataset_str.contains("DIMENSIONS NTAX=2 NCHAR=4;"));
        assert!(!result.dataset_str.contains("charset stub"));

        let mut request = self::request();
        request.degen = Some(DegenMode::Normal);
        let result = DatasetBuilder::new(&store, request).build();
        assert!(result.errors.is_empty());
    }

    #[test]
    fn amino_acid_builds_warn_when_positions_are_discarded() {
        let store = store();
        let mut request = request();
        request.aminoacids = true;
        request.positions = vec![CodonPosition::First];
        let result = DatasetBuilder::new(&store, request).build();
        assert!(result.errors.is_empty());
        // The selection is ignored, not applied: the matrix is the full
        // amino acid alignment.
        assert!(result.dataset_str.contains("DIMENSIONS NTAX=2 NCHAR=4;"));
        assert!(result.warnings.contains(
            &"Ignoring codon position selection: amino acid datasets use all codon positions"
                .to_string()
        ));
    }

    #[test]
    fn builds_are_deterministic() {
        let store = store();
        let first = DatasetBuilder::new(&store, request()).build();
        let second = DatasetBuilder::new(&store, request()).build();
        assert_eq!(first.dataset_str, second.dataset_str);
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn phylip_exposes_a_charset_block() {
        let store = store();
        let mut request = request();
        request.file_format = FileFormat::Phylip;
        let result = DatasetBuilder::new(&store, request).build();
        assert!(result.dataset_str.starts_with("2 15\n"));
        assert_eq!(
            result.charset_block.as_deref(),
            Some("charset 16S = 1-6;\ncharset COI = 7-15;\n")
        );
    }
}
