use std::path::Path;

use anyhow::{bail, Context, Result};
use bio::alphabets::dna;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::request::TaxonField;

/// Reference metadata for one gene: its canonical aligned length in base
/// pairs, an optional 1-based reading frame, and the NCBI genetic code table
/// used to translate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneRecord {
    pub gene_code: String,
    pub length: usize,
    pub reading_frame: Option<u8>,
    #[serde(default = "default_genetic_code")]
    pub genetic_code: u8,
}

fn default_genetic_code() -> u8 {
    1
}

/// A specimen record with its taxonomy columns. Empty columns are simply
/// omitted from display labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoucherRecord {
    pub code: String,
    #[serde(default)]
    pub orden: String,
    #[serde(default)]
    pub superfamily: String,
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub subfamily: String,
    #[serde(default)]
    pub tribe: String,
    #[serde(default)]
    pub subtribe: String,
    #[serde(default)]
    pub genus: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub subspecies: String,
    #[serde(default)]
    pub auctor: String,
    #[serde(default)]
    pub hostorg: String,
}

impl VoucherRecord {
    /// Look up a taxonomy column by field identifier. `GeneCode` is a
    /// pseudo-field resolved by the assembler, not stored on the voucher.
    pub fn field(&self, field: TaxonField) -> &str {
        match field {
            TaxonField::Code => &self.code,
            TaxonField::Orden => &self.orden,
            TaxonField::Superfamily => &self.superfamily,
            TaxonField::Family => &self.family,
            TaxonField::Subfamily => &self.subfamily,
            TaxonField::Tribe => &self.tribe,
            TaxonField::Subtribe => &self.subtribe,
            TaxonField::Genus => &self.genus,
            TaxonField::Species => &self.species,
            TaxonField::Subspecies => &self.subspecies,
            TaxonField::Auctor => &self.auctor,
            TaxonField::Hostorg => &self.hostorg,
            TaxonField::GeneCode => "",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SequenceRow {
    code: String,
    gene_code: String,
    sequences: String,
}

/// Read-only access to voucher, gene, and sequence records. The dataset
/// pipeline only ever reads through this interface, so one store can serve
/// any number of concurrent builds.
pub trait SequenceSource {
    fn gene(&self, gene_code: &str) -> Option<&GeneRecord>;
    fn voucher(&self, code: &str) -> Option<&VoucherRecord>;
    fn sequence(&self, voucher_code: &str, gene_code: &str) -> Option<&str>;

    /// All gene codes, in insertion order.
    fn gene_codes(&self) -> Vec<String>;

    /// All voucher codes, in insertion order.
    fn voucher_codes(&self) -> Vec<String>;
}

/// In-memory implementation of [`SequenceSource`], loadable from a directory
/// of TSV tables (`genes.tsv`, `vouchers.tsv`, `sequences.tsv`).
#[derive(Debug, Default)]
pub struct Store {
    genes: IndexMap<String, GeneRecord>,
    vouchers: IndexMap<String, VoucherRecord>,
    sequences: IndexMap<(String, String), String>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// Loads the three TSV tables from `dir`. Raw sequences are checked
    /// against the IUPAC DNA alphabet (plus `?` for missing sites) and the
    /// load fails with context on the first malformed row.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut store = Store::new();

        let mut rdr = tsv_reader(&dir.join("genes.tsv"))?;
        for row in rdr.deserialize() {
            let gene: GeneRecord = row.context("Malformed row in genes.tsv")?;
            store.add_gene(gene);
        }

        let mut rdr = tsv_reader(&dir.join("vouchers.tsv"))?;
        for row in rdr.deserialize() {
            let voucher: VoucherRecord = row.context("Malformed row in vouchers.tsv")?;
            store.add_voucher(voucher);
        }

        let mut rdr = tsv_reader(&dir.join("sequences.tsv"))?;
        for row in rdr.deserialize() {
            let row: SequenceRow = row.context("Malformed row in sequences.tsv")?;
            store
                .add_sequence(&row.code, &row.gene_code, &row.sequences)
                .with_context(|| {
                    format!("Bad sequence for voucher {} and gene {}", row.code, row.gene_code)
                })?;
        }

        info!(
            "Loaded store: {} genes, {} vouchers, {} sequences",
            store.genes.len(),
            store.vouchers.len(),
            store.sequences.len()
        );

        Ok(store)
    }

    pub fn add_gene(&mut self, gene: GeneRecord) {
        self.genes.insert(gene.gene_code.clone(), gene);
    }

    pub fn add_voucher(&mut self, voucher: VoucherRecord) {
        self.vouchers.insert(voucher.code.clone(), voucher);
    }

    /// Registers a raw sequence for a (voucher, gene) pair after checking it
    /// against the IUPAC DNA alphabet extended with `?` and `-`.
    pub fn add_sequence(&mut self, voucher_code: &str, gene_code: &str, seq: &str) -> Result<()> {
        let alphabet = dna::iupac_alphabet();
        let stripped: Vec<u8> = seq.bytes().filter(|&b| b != b'?' && b != b'-').collect();
        if !alphabet.is_word(&stripped) {
            bail!("Sequence contains symbols outside the IUPAC DNA alphabet");
        }
        self.sequences.insert(
            (voucher_code.to_string(), gene_code.to_string()),
            seq.to_string(),
        );
        Ok(())
    }

    /// Per-store statistics for the `summary` command.
    pub fn summary(&self) -> StoreSummary {
        let mut coverage: IndexMap<String, usize> = IndexMap::new();
        for gene_code in self.genes.keys() {
            coverage.insert(gene_code.clone(), 0);
        }
        for (_, gene_code) in self.sequences.keys() {
            *coverage.entry(gene_code.clone()).or_insert(0) += 1;
        }
        StoreSummary {
            genes: self.genes.len(),
            vouchers: self.vouchers.len(),
            sequences: self.sequences.len(),
            sequences_per_gene: coverage,
        }
    }
}

impl SequenceSource for Store {
    fn gene(&self, gene_code: &str) -> Option<&GeneRecord> {
        self.genes.get(gene_code)
    }

    fn voucher(&self, code: &str) -> Option<&VoucherRecord> {
        self.vouchers.get(code)
    }

    fn sequence(&self, voucher_code: &str, gene_code: &str) -> Option<&str> {
        self.sequences
            .get(&(voucher_code.to_string(), gene_code.to_string()))
            .map(String::as_str)
    }

    fn gene_codes(&self) -> Vec<String> {
        self.genes.keys().cloned().collect()
    }

    fn voucher_codes(&self) -> Vec<String> {
        self.vouchers.keys().cloned().collect()
    }
}

#[derive(Debug, Serialize)]
pub struct StoreSummary {
    pub genes: usize,
    pub vouchers: usize,
    pub sequences: usize,
    pub sequences_per_gene: IndexMap<String, usize>,
}

fn tsv_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("Unable to open {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_iupac_sequences() {
        let mut store = Store::new();
        assert!(store.add_sequence("V1", "COI", "ACGT?RYN-").is_ok());
        assert!(store.add_sequence("V1", "COI", "ACGT!Z").is_err());
    }

    #[test]
    fn coverage_counts_sequences_per_gene() {
        let mut store = Store::new();
        store.add_gene(GeneRecord {
            gene_code: "COI".to_string(),
            length: 10,
            reading_frame: Some(1),
            genetic_code: 1,
        });
        store.add_sequence("V1", "COI", "ACGT").unwrap();
        store.add_sequence("V2", "COI", "ACGT").unwrap();
        let summary = store.summary();
        assert_eq!(summary.sequences_per_gene.get("COI"), Some(&2));
    }
}
