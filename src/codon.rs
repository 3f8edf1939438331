//! Reading-frame-aware codon-position extraction.

use crate::request::PositionSet;

/// Rotates a sequence into frame by dropping the `frame - 1` leading bases.
pub fn into_frame(seq: &str, frame: u8) -> &str {
    let skip = (frame.saturating_sub(1) as usize).min(seq.len());
    &seq[skip..]
}

/// Extracts the selected codon positions from a sequence.
///
/// The sequence is first brought into frame, then sampled codon by codon so
/// that multi-position selections stay interleaved in original codon order
/// (1st of codon 1, 2nd of codon 1, 1st of codon 2, ...) rather than being
/// concatenated as whole strided runs. `ALL` returns the in-frame sequence
/// unchanged.
pub fn apply_positions(seq: &str, frame: u8, positions: &PositionSet) -> String {
    let in_frame = into_frame(seq, frame);
    if positions.is_all() {
        return in_frame.to_string();
    }

    let offsets = positions.offsets();
    let bytes = in_frame.as_bytes();
    let mut out = String::with_capacity(bytes.len() / 3 * offsets.len() + offsets.len());
    for codon in bytes.chunks(3) {
        for &offset in &offsets {
            if let Some(&b) = codon.get(offset) {
                out.push(b as char);
            }
        }
    }
    out
}

/// Width of the filtered sequence for a gene of `length` bases, without
/// materializing it. Used by the partition planner to cross-check block
/// widths.
pub fn filtered_len(length: usize, frame: u8, positions: &PositionSet) -> usize {
    let in_frame = length.saturating_sub(frame.saturating_sub(1) as usize);
    if positions.is_all() {
        return in_frame;
    }
    let full_codons = in_frame / 3;
    let tail = in_frame % 3;
    let offsets = positions.offsets();
    full_codons * offsets.len() + offsets.iter().filter(|&&o| o < tail).count()
}
