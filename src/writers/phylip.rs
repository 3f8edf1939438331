//! Relaxed PHYLIP writer. The charset block is returned separately so
//! callers can hand it to RAxML/IQ-TREE style tools as its own file.

use super::{concatenated_rows, pad_label, WriterInput};

pub fn build(input: &WriterInput) -> (String, String) {
    let partition = input.partition;

    let mut out = String::new();
    out.push_str(&format!("{} {}\n", partition.ntax, partition.total_width));
    for (label, seq) in concatenated_rows(input.blocks) {
        out.push_str(&pad_label(&label));
        out.push_str(&seq);
        out.push('\n');
    }

    let mut charset_block = String::new();
    for charset in &partition.charsets {
        charset_block.push_str(&charset.to_string());
        charset_block.push('\n');
    }

    (out, charset_block)
}
