//! Format-specific serializers. Every writer consumes the same planned
//! input and shares one invariant: voucher order and gene order are
//! identical in the alignment and in the charset/partition metadata.

mod fasta;
mod mega;
mod nexus;
mod phylip;
mod tnt;

use crate::assemble::GeneBlock;
use crate::partition::PartitionMap;
use crate::request::FileFormat;

/// Column at which sequences start in label + sequence rows.
pub const LABEL_WIDTH: usize = 55;

/// The planner's output handed to a writer. Writers never re-decide voucher
/// inclusion or ordering.
pub struct WriterInput<'a> {
    pub blocks: &'a [GeneBlock],
    pub partition: &'a PartitionMap,
    pub aminoacids: bool,
    /// Display label of the outgroup voucher, when one was promoted.
    pub outgroup_label: Option<String>,
}

pub struct WriterOutput {
    pub dataset: String,
    /// PHYLIP keeps its charset block out of the `.phy` payload and exposes
    /// it as a standalone artifact.
    pub charset_block: Option<String>,
}

/// Single dispatch point from file format to writer.
pub fn build(format: FileFormat, input: &WriterInput) -> WriterOutput {
    match format {
        FileFormat::Nexus => WriterOutput {
            dataset: nexus::build(input),
            charset_block: None,
        },
        FileFormat::Phylip => {
            let (dataset, charset_block) = phylip::build(input);
            WriterOutput {
                dataset,
                charset_block: Some(charset_block),
            }
        }
        FileFormat::Fasta => WriterOutput {
            dataset: fasta::build(input),
            charset_block: None,
        },
        FileFormat::GenbankFasta => WriterOutput {
            dataset: fasta::build_genbank(input),
            charset_block: None,
        },
        FileFormat::Mega => WriterOutput {
            dataset: mega::build(input),
            charset_block: None,
        },
        FileFormat::Tnt => WriterOutput {
            dataset: tnt::build(input),
            charset_block: None,
        },
    }
}

/// left-justifies a label to the shared sequence column.
pub(crate) fn pad_label(label: &str) -> String {
    format!("{:<width$}", label, width = LABEL_WIDTH)
}

/// Concatenates every gene block row-wise into (label, sequence) pairs, in
/// voucher order. The label of the first block wins when labels differ per
/// gene (the GENECODE pseudo-field).
pub(crate) fn concatenated_rows(blocks: &[GeneBlock]) -> Vec<(String, String)> {
    let ntax = blocks.first().map(|b| b.rows.len()).unwrap_or(0);
    let mut rows = Vec::with_capacity(ntax);
    for i in 0..ntax {
        let label = blocks[0].rows[i].label.clone();
        let mut seq = String::new();
        for block in blocks {
            seq.push_str(&block.rows[i].seq);
        }
        rows.push((label, seq));
    }
    rows
}
