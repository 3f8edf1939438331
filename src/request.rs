use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;

use crate::errors::DatasetError;
use crate::store::SequenceSource;

/// One of the three bases of a codon, or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CodonPosition {
    All,
    First,
    Second,
    Third,
}

impl CodonPosition {
    /// 0-based offset of this position within an in-frame codon.
    pub fn offset(self) -> usize {
        match self {
            CodonPosition::All => 0,
            CodonPosition::First => 0,
            CodonPosition::Second => 1,
            CodonPosition::Third => 2,
        }
    }
}

impl fmt::Display for CodonPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CodonPosition::All => "ALL",
            CodonPosition::First => "1st",
            CodonPosition::Second => "2nd",
            CodonPosition::Third => "3rd",
        };
        f.write_str(s)
    }
}

impl FromStr for CodonPosition {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(CodonPosition::All),
            "1st" | "first" => Ok(CodonPosition::First),
            "2nd" | "second" => Ok(CodonPosition::Second),
            "3rd" | "third" => Ok(CodonPosition::Third),
            _ => Err(DatasetError::InadequateCodonPositions),
        }
    }
}

/// Normalized, deduplicated codon-position selection. `ALL` always collapses
/// the set to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionSet(Vec<CodonPosition>);

impl PositionSet {
    /// Collapses a raw selection: `ALL` wins over any positional token, the
    /// rest are deduplicated and sorted 1st < 2nd < 3rd. An empty selection
    /// is an input error.
    pub fn normalize(raw: &[CodonPosition]) -> Result<Self, DatasetError> {
        if raw.is_empty() {
            return Err(DatasetError::InadequateCodonPositions);
        }
        if raw.contains(&CodonPosition::All) {
            return Ok(PositionSet(vec![CodonPosition::All]));
        }
        let mut positions: Vec<CodonPosition> = raw.iter().copied().collect::<IndexSet<_>>().into_iter().collect();
        positions.sort();
        Ok(PositionSet(positions))
    }

    pub fn all() -> Self {
        PositionSet(vec![CodonPosition::All])
    }

    pub fn is_all(&self) -> bool {
        self.0 == [CodonPosition::All]
    }

    /// The selected in-frame codon offsets, ascending. `ALL` covers 0..3.
    pub fn offsets(&self) -> Vec<usize> {
        if self.is_all() {
            vec![0, 1, 2]
        } else {
            self.0.iter().map(|p| p.offset()).collect()
        }
    }

    pub fn contains(&self, position: CodonPosition) -> bool {
        self.is_all() || self.0.contains(&position)
    }
}

/// Taxonomy fields usable in display labels, in the column order of the
/// voucher table. `GeneCode` is a pseudo-field: it appends the gene code of
/// the sequence itself rather than a voucher column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TaxonField {
    Code,
    Orden,
    Superfamily,
    Family,
    Subfamily,
    Tribe,
    Subtribe,
    Genus,
    Species,
    Subspecies,
    Auctor,
    Hostorg,
    GeneCode,
}

impl fmt::Display for TaxonField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaxonField::Code => "code",
            TaxonField::Orden => "orden",
            TaxonField::Superfamily => "superfamily",
            TaxonField::Family => "family",
            TaxonField::Subfamily => "subfamily",
            TaxonField::Tribe => "tribe",
            TaxonField::Subtribe => "subtribe",
            TaxonField::Genus => "genus",
            TaxonField::Species => "species",
            TaxonField::Subspecies => "subspecies",
            TaxonField::Auctor => "auctor",
            TaxonField::Hostorg => "hostorg",
            TaxonField::GeneCode => "gene-code",
        };
        f.write_str(name)
    }
}

/// How charsets are carved out of each gene block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionScheme {
    /// One contiguous charset per gene (`ONE` / "by gene").
    ByGene,
    /// One charset per codon position per gene (`EACH`).
    ByCodonPosition,
    /// Positions 1+2 against position 3, two charsets per gene (`1st2nd_3rd`).
    OnePlusTwoThree,
}

impl FromStr for PartitionScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "one" | "by gene" | "by-gene" | "gene" => Ok(PartitionScheme::ByGene),
            "each" => Ok(PartitionScheme::ByCodonPosition),
            "1st2nd_3rd" | "1st2nd-3rd" => Ok(PartitionScheme::OnePlusTwoThree),
            other => Err(format!("Unknown partition scheme: {other}")),
        }
    }
}

/// Output serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Nexus,
    Phylip,
    Fasta,
    GenbankFasta,
    Mega,
    Tnt,
}

impl FromStr for FileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nexus" | "nex" => Ok(FileFormat::Nexus),
            "phy" | "phylip" => Ok(FileFormat::Phylip),
            "fasta" => Ok(FileFormat::Fasta),
            "genbankfasta" | "genbank-fasta" => Ok(FileFormat::GenbankFasta),
            "mega" => Ok(FileFormat::Mega),
            "tnt" => Ok(FileFormat::Tnt),
            other => Err(format!("Unknown file format: {other}")),
        }
    }
}

/// Codon degeneration flavours. Only the standard Zwick-style table is
/// implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenMode {
    Normal,
}

impl FromStr for DegenMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(DegenMode::Normal),
            other => Err(format!("Unknown degen translation mode: {other}")),
        }
    }
}

/// A cleaned dataset build request, the crate-level equivalent of validated
/// form input.
#[derive(Debug, Clone)]
pub struct DatasetRequest {
    /// Requested voucher codes, in caller order. Empty means every voucher
    /// in the store.
    pub voucher_codes: Vec<String>,
    /// Requested gene codes. Empty means every gene in the store.
    pub gene_codes: Vec<String>,
    /// Ordered taxonomy fields used to build display labels.
    pub taxon_names: Vec<TaxonField>,
    pub positions: Vec<CodonPosition>,
    pub partition_scheme: PartitionScheme,
    pub file_format: FileFormat,
    pub aminoacids: bool,
    pub degen: Option<DegenMode>,
    pub outgroup: Option<String>,
    /// Minimum number of genes a voucher must have data for to stay in the
    /// matrix.
    pub number_genes: Option<usize>,
}

impl Default for DatasetRequest {
    fn default() -> Self {
        DatasetRequest {
            voucher_codes: Vec::new(),
            gene_codes: Vec::new(),
            taxon_names: vec![TaxonField::Code, TaxonField::Genus, TaxonField::Species],
            positions: vec![CodonPosition::All],
            partition_scheme: PartitionScheme::ByGene,
            file_format: FileFormat::Nexus,
            aminoacids: false,
            degen: None,
            outgroup: None,
            number_genes: None,
        }
    }
}

/// Splits newline- or comma-separated code text into a deduplicated list,
/// preserving caller order. CR-LF input is accepted as-is.
pub fn parse_code_list(raw: &str) -> Vec<String> {
    let mut seen = IndexSet::new();
    for token in raw.split(['\n', ',']) {
        let token = token.trim();
        if !token.is_empty() {
            seen.insert(token.to_string());
        }
    }
    seen.into_iter().collect()
}

/// Resolves the gene selection against the store: an explicit list is
/// deduplicated, an empty list selects every gene. Either way the result is
/// sorted case-insensitively, which fixes gene block order for the rest of
/// the pipeline.
pub fn resolve_gene_codes(request: &DatasetRequest, store: &dyn SequenceSource) -> Vec<String> {
    let mut codes: Vec<String> = if request.gene_codes.is_empty() {
        store.gene_codes()
    } else {
        request
            .gene_codes
            .iter()
            .cloned()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    };
    codes.sort_by_key(|c| c.to_lowercase());
    codes
}

/// Resolves the voucher selection: caller order is kept for an explicit
/// list, store order otherwise.
pub fn resolve_voucher_codes(request: &DatasetRequest, store: &dyn SequenceSource) -> Vec<String> {
    if request.voucher_codes.is_empty() {
        store.voucher_codes()
    } else {
        request
            .voucher_codes
            .iter()
            .cloned()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}
