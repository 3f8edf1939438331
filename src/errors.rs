use thiserror::Error;

/// Fatal input errors. Any of these aborts the build with an empty dataset
/// string; everything else (missing vouchers, short sequences, stop codons)
/// is reported as a warning and the build completes best-effort.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    /// The requested codon-position set was empty after normalization.
    #[error("Codon positions requested are invalid or empty")]
    InadequateCodonPositions,

    #[error("Cannot degenerate codons if you have not selected all codon positions")]
    DegenRequiresAllPositions,

    #[error("Cannot degenerate codons if they go to different partitions")]
    DegenRequiresGenePartition,

    /// Sub-partitioning by codon position needs a reading frame for every
    /// gene in the build.
    #[error("You need to specify the reading frame of all genes to do the partitioning by codon positions.")]
    MissingReadingFrames,

    #[error("Cannot partition amino acid datasets by codon positions")]
    AminoAcidPartition,
}
