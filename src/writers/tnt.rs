//! TNT xread writer.

use super::{concatenated_rows, pad_label, WriterInput};

pub fn build(input: &WriterInput) -> String {
    let partition = input.partition;
    let nstates = if input.aminoacids { "prot" } else { "dna" };

    let mut out = String::new();
    out.push_str(&format!("nstates {nstates};\nxread\n"));
    out.push_str(&format!("{} {}\n", partition.total_width, partition.ntax));
    for (label, seq) in concatenated_rows(input.blocks) {
        out.push_str(&pad_label(&label));
        out.push_str(&seq);
        out.push('\n');
    }
    out.push_str(";\nproc /;");
    out
}
