//! MEGA writer.

use super::{concatenated_rows, WriterInput};

pub fn build(input: &WriterInput) -> String {
    let datatype = if input.aminoacids { "protein" } else { "dna" };

    let mut out = String::new();
    out.push_str("#MEGA\n!Title dataset;\n");
    out.push_str(&format!("!Format datatype={datatype};\n\n"));

    let records: Vec<String> = concatenated_rows(input.blocks)
        .into_iter()
        .map(|(label, seq)| format!("#{label}\n{seq}"))
        .collect();
    out.push_str(&records.join("\n"));
    out
}
