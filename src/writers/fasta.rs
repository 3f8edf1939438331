//! Plain FASTA and the GenBank-submission flavour that marks gene
//! boundaries inside the flat stream.

use super::{concatenated_rows, WriterInput};

/// Dashed placeholder sequence of the synthetic gene-boundary records.
const GENE_DIVIDER: &str = "--------------------";

/// One record per voucher over the concatenated matrix.
pub fn build(input: &WriterInput) -> String {
    let mut records = Vec::new();
    for (label, seq) in concatenated_rows(input.blocks) {
        records.push(format!(">{label}\n{seq}"));
    }
    records.join("\n")
}

/// Gene-major stream: every gene change is announced by a synthetic
/// `>gene_code` record with a dashed placeholder sequence, then the gene's
/// per-voucher records follow.
pub fn build_genbank(input: &WriterInput) -> String {
    let mut records = Vec::new();
    for block in input.blocks {
        records.push(format!(">{}\n{}", block.gene_code, GENE_DIVIDER));
        for row in &block.rows {
            records.push(format!(">{}\n{}", row.label, row.seq));
        }
    }
    records.join("\n")
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{block, by_gene_partition};
    use super::*;
    use indoc::indoc;

    fn input_fixture() -> (Vec<crate::assemble::GeneBlock>, crate::partition::PartitionMap) {
        let blocks = vec![
            block("COI", Some(1), &[("V1_Aus_aus", "ATGATG"), ("V2_Bus_bus", "??????")]),
            block("wnt", Some(1), &[("V1_Aus_aus", "CCC"), ("V2_Bus_bus", "GGG")]),
        ];
        let partition = by_gene_partition(&blocks);
        (blocks, partition)
    }

    #[test]
    fn fasta_concatenates_genes_per_voucher() {
        let (blocks, partition) = input_fixture();
        let input = WriterInput {
            blocks: &blocks,
            partition: &partition,
            aminoacids: false,
            outgroup_label: None,
        };
        let expected = indoc! {"
            >V1_Aus_aus
            ATGATGCCC
            >V2_Bus_bus
            ??????GGG"};
        assert_eq!(build(&input), expected);
    }

    #[test]
    fn genbank_fasta_inserts_gene_boundary_records() {
        let (blocks, partition) = input_fixture();
        let input = WriterInput {
            blocks: &blocks,
            partition: &partition,
            aminoacids: false,
            outgroup_label: None,
        };
        let expected = indoc! {"
            >COI
            --------------------
            >V1_Aus_aus
            ATGATG
            >V2_Bus_bus
            ??????
            >wnt
            --------------------
            >V1_Aus_aus
            CCC
            >V2_Bus_bus
            GGG"};
        assert_eq!(build_genbank(&input), expected);
    }
}
