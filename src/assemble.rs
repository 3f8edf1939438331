//! Builds one fixed-width sequence row per requested (voucher, gene) pair,
//! gap-filling whatever the store cannot provide.

use std::collections::HashSet;

use crate::request::TaxonField;
use crate::store::SequenceSource;

/// One row of a gene block: a display label plus a sequence of exactly the
/// gene's canonical length.
#[derive(Debug, Clone)]
pub struct AssembledSequence {
    pub voucher_code: String,
    pub gene_code: String,
    pub label: String,
    pub seq: String,
    /// Whether the store had any actual data for this pair. Fully gap-filled
    /// rows do not count towards a voucher's gene coverage.
    pub has_data: bool,
}

/// All rows for one gene, in voucher order. Every row has length `width`.
#[derive(Debug, Clone)]
pub struct GeneBlock {
    pub gene_code: String,
    pub width: usize,
    pub reading_frame: Option<u8>,
    pub genetic_code: u8,
    pub rows: Vec<AssembledSequence>,
}

/// Builds the display label for a voucher: the requested taxonomy fields in
/// caller order, joined by underscores, empty fields skipped. Inner
/// whitespace becomes underscores so labels stay single tokens.
pub fn voucher_label(
    store: &dyn SequenceSource,
    voucher_code: &str,
    taxon_names: &[TaxonField],
) -> String {
    let parts: Vec<String> = match store.voucher(voucher_code) {
        Some(voucher) => taxon_names
            .iter()
            .filter(|&&f| f != TaxonField::GeneCode)
            .map(|&f| voucher.field(f).trim().replace(char::is_whitespace, "_"))
            .filter(|v| !v.is_empty())
            .collect(),
        None => vec![voucher_code.to_string()],
    };
    parts.join("_")
}

/// Assembles one gene block per gene code, gene-major and voucher-minor.
///
/// Missing vouchers and missing (voucher, gene) records are reported as
/// warnings and filled with `?` to the gene's canonical length; short
/// sequences are right-padded and over-long ones truncated, both with a
/// warning. Gene codes without metadata are skipped entirely.
pub fn assemble(
    store: &dyn SequenceSource,
    gene_codes: &[String],
    voucher_codes: &[String],
    taxon_names: &[TaxonField],
    warnings: &mut Vec<String>,
) -> Vec<GeneBlock> {
    let append_gene_code = taxon_names.contains(&TaxonField::GeneCode);
    let mut missing_vouchers: HashSet<String> = HashSet::new();
    let mut blocks = Vec::with_capacity(gene_codes.len());

    for gene_code in gene_codes {
        let Some(gene) = store.gene(gene_code) else {
            warnings.push(format!("Could not find gene {gene_code}"));
            continue;
        };

        let mut rows = Vec::with_capacity(voucher_codes.len());
        for voucher_code in voucher_codes {
            if store.voucher(voucher_code).is_none()
                && missing_vouchers.insert(voucher_code.clone())
            {
                warnings.push(format!("Could not find voucher {voucher_code}"));
            }

            let raw = store.sequence(voucher_code, gene_code);
            let seq = match raw {
                Some(seq) if seq.len() > gene.length => {
                    warnings.push(format!(
                        "Sequence for voucher {voucher_code} and gene_code {gene_code} \
                         is longer than the gene ({} > {}); truncating",
                        seq.len(),
                        gene.length
                    ));
                    seq[..gene.length].to_string()
                }
                Some(seq) if seq.len() < gene.length => {
                    warnings.push(format!(
                        "Sequence for voucher {voucher_code} and gene_code {gene_code} \
                         is shorter than the gene ({} < {}); padding with ?",
                        seq.len(),
                        gene.length
                    ));
                    pad(seq, gene.length)
                }
                Some(seq) => seq.to_string(),
                None => {
                    warnings.push(format!(
                        "Could not find sequences for voucher {voucher_code} \
                         and gene_code {gene_code}"
                    ));
                    "?".repeat(gene.length)
                }
            };

            let mut label = voucher_label(store, voucher_code, taxon_names);
            if append_gene_code {
                label.push('_');
                label.push_str(gene_code);
            }

            rows.push(AssembledSequence {
                voucher_code: voucher_code.clone(),
                gene_code: gene_code.clone(),
                label,
                seq,
                has_data: raw.map(|s| s.chars().any(|c| c != '?')).unwrap_or(false),
            });
        }

        blocks.push(GeneBlock {
            gene_code: gene_code.clone(),
            width: gene.length,
            reading_frame: gene.reading_frame,
            genetic_code: gene.genetic_code,
            rows,
        });
    }

    blocks
}

fn pad(seq: &str, length: usize) -> String {
    let mut padded = String::with_capacity(length);
    padded.push_str(seq);
    while padded.len() < length {
        padded.push('?');
    }
    padded
}
