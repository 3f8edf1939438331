//! Codon degeneration: each codon is replaced by the IUPAC-ambiguity codon
//! covering every codon synonymous for the same amino acid (Zwick-style
//! "degen" coding). This strips synonymous signal while keeping the data in
//! nucleotide space.

use crate::genetic_code::GeneticCode;

/// Degenerates one codon under the given genetic code.
///
/// The two serine families are kept apart (`TCN` vs `AGY`), leucine
/// collapses to `YTN` and arginine to `MGN`. Stop codons and fully missing
/// codons pass through unchanged; any other codon the code cannot read
/// becomes `NNN`.
pub fn degenerate_codon(code: &GeneticCode, codon: &[u8]) -> String {
    let upper: Vec<u8> = codon.iter().map(|b| b.to_ascii_uppercase()).collect();
    match code.translate_codon(&upper) {
        b'?' | b'*' => String::from_utf8_lossy(codon).into_owned(),
        b'X' => "NNN".to_string(),
        b'L' => "YTN".to_string(),
        b'R' => "MGN".to_string(),
        b'S' => {
            if upper.starts_with(b"AG") {
                "AGY".to_string()
            } else {
                "TCN".to_string()
            }
        }
        b'I' => "ATH".to_string(),
        b'V' => "GTN".to_string(),
        b'P' => "CCN".to_string(),
        b'T' => "ACN".to_string(),
        b'A' => "GCN".to_string(),
        b'G' => "GGN".to_string(),
        b'F' => "TTY".to_string(),
        b'Y' => "TAY".to_string(),
        b'H' => "CAY".to_string(),
        b'Q' => "CAR".to_string(),
        b'N' => "AAY".to_string(),
        b'K' => "AAR".to_string(),
        b'D' => "GAY".to_string(),
        b'E' => "GAR".to_string(),
        b'C' => "TGY".to_string(),
        b'W' => "TGG".to_string(),
        b'M' => "ATG".to_string(),
        other => {
            // Reassigned residues outside the 20 standard families keep the
            // original codon.
            debug!("No degeneracy family for residue {}", other as char);
            String::from_utf8_lossy(codon).into_owned()
        }
    }
}

/// Degenerates an in-frame sequence codon by codon. An incomplete trailing
/// codon is carried over unmodified so the sequence keeps its length.
pub fn degenerate(code: &GeneticCode, seq: &str) -> String {
    let bytes = seq.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    let mut chunks = bytes.chunks_exact(3);
    for codon in &mut chunks {
        out.push_str(&degenerate_codon(code, codon));
    }
    out.push_str(&String::from_utf8_lossy(chunks.remainder()));
    out
}
