use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::{Parser, Subcommand};

use crate::request::{CodonPosition, DegenMode, FileFormat, PartitionScheme, TaxonField};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const INFO_STRING: &str = "
🧬 phylomat version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   assemble voucher/gene sequence tables into phylogenetic datasets";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    flatten_help = true,
    styles = STYLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a dataset from a store of genes, vouchers, and sequences
    #[command(arg_required_else_help = true)]
    Create {
        /// directory holding genes.tsv, vouchers.tsv, and sequences.tsv
        #[arg(long)]
        store: String,

        /// voucher codes, comma- or newline-separated. all vouchers when omitted
        #[arg(long)]
        vouchers: Option<String>,

        /// gene codes, comma- or newline-separated. all genes when omitted
        #[arg(long)]
        genes: Option<String>,

        /// taxonomy fields used to build row labels, in order.
        /// gene-code appends the gene code of each sequence
        #[arg(long, value_enum, value_delimiter = ',', verbatim_doc_comment, default_values_t =
            [TaxonField::Code, TaxonField::Genus, TaxonField::Species])]
        taxon_names: Vec<TaxonField>,

        /// codon positions to keep: ALL, 1st, 2nd, 3rd
        #[arg(long, value_delimiter = ',', default_value = "ALL",
            value_parser = parse_position)]
        positions: Vec<CodonPosition>,

        /// charset layout: ONE (whole genes), EACH (per codon position),
        /// or 1st2nd_3rd
        #[arg(long, default_value = "ONE", verbatim_doc_comment,
            value_parser = parse_scheme)]
        partition: PartitionScheme,

        /// output format: NEXUS, PHY, FASTA, GenbankFASTA, MEGA, TNT
        #[arg(long, default_value = "NEXUS", value_parser = parse_format)]
        format: FileFormat,

        /// translate to amino acids
        #[arg(long, action)]
        aminoacids: bool,

        /// degenerate codons to ambiguity families (mode: NORMAL)
        #[arg(long, value_parser = parse_degen)]
        degen: Option<DegenMode>,

        /// voucher code to promote to the first row of every gene block
        #[arg(long)]
        outgroup: Option<String>,

        /// drop vouchers with data for fewer than this many genes
        #[arg(long)]
        min_genes: Option<usize>,

        /// the output file; standard output when omitted
        #[arg(short)]
        output: Option<String>,

        /// where to write the PHYLIP charset block
        #[arg(long)]
        charset_out: Option<String>,
    },

    /// Print store statistics as JSON
    #[command(arg_required_else_help = true)]
    Summary {
        /// directory holding genes.tsv, vouchers.tsv, and sequences.tsv
        #[arg(long)]
        store: String,
    },
}

fn parse_position(arg: &str) -> Result<CodonPosition, String> {
    arg.parse::<CodonPosition>()
        .map_err(|_| format!("Unknown codon position: {arg} (expected ALL, 1st, 2nd, or 3rd)"))
}

fn parse_scheme(arg: &str) -> Result<PartitionScheme, String> {
    arg.parse()
}

fn parse_format(arg: &str) -> Result<FileFormat, String> {
    arg.parse()
}

fn parse_degen(arg: &str) -> Result<DegenMode, String> {
    arg.parse()
}
