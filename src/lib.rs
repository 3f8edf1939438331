//! Assemble sparse per-voucher, per-gene sequence records into dense aligned
//! matrices and serialize them to the textual formats used by phylogenetic
//! analysis tools (NEXUS, PHYLIP, FASTA, MEGA, TNT).

#[macro_use]
extern crate log;

pub mod assemble;
pub mod cli;
pub mod codon;
pub mod dataset;
pub mod degen;
pub mod errors;
pub mod genetic_code;
pub mod partition;
pub mod request;
pub mod store;
pub mod writers;

pub use dataset::{DatasetBuildResult, DatasetBuilder};
pub use errors::DatasetError;
pub use request::DatasetRequest;
pub use store::{SequenceSource, Store};
