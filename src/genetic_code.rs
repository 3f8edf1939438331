//! NCBI genetic-code tables and codon translation.
//!
//! Tables are stored as the 64-character `ncbieaa` strings published by
//! NCBI, indexed in T/C/A/G order. Single-base IUPAC ambiguity codes are
//! resolved when every expansion agrees on the amino acid.

/// A genetic code table addressed by its NCBI id.
#[derive(Debug, Clone, Copy)]
pub struct GeneticCode {
    pub id: u8,
    pub name: &'static str,
    ncbieaa: &'static str,
}

const TABLES: &[GeneticCode] = &[
    GeneticCode {
        id: 1,
        name: "Standard",
        ncbieaa: "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    },
    GeneticCode {
        id: 2,
        name: "Vertebrate Mitochondrial",
        ncbieaa: "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG",
    },
    GeneticCode {
        id: 3,
        name: "Yeast Mitochondrial",
        ncbieaa: "FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    },
    GeneticCode {
        id: 4,
        name: "Mold/Protozoan/Coelenterate Mitochondrial",
        ncbieaa: "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    },
    GeneticCode {
        id: 5,
        name: "Invertebrate Mitochondrial",
        ncbieaa: "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG",
    },
    GeneticCode {
        id: 9,
        name: "Echinoderm/Flatworm Mitochondrial",
        ncbieaa: "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG",
    },
    GeneticCode {
        id: 11,
        name: "Bacterial/Archaeal/Plant Plastid",
        ncbieaa: "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    },
];

/// T/U=0, C=1, A=2, G=3, anything else is not a plain base.
fn base_index(b: u8) -> Option<usize> {
    match b.to_ascii_uppercase() {
        b'T' | b'U' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

/// Possible base indices for a single IUPAC ambiguity code.
fn expansions(b: u8) -> &'static [usize] {
    match b.to_ascii_uppercase() {
        b'R' => &[2, 3],
        b'Y' => &[0, 1],
        b'S' => &[1, 3],
        b'W' => &[0, 2],
        b'K' => &[0, 3],
        b'M' => &[1, 2],
        b'B' => &[0, 1, 3],
        b'D' => &[0, 2, 3],
        b'H' => &[0, 1, 2],
        b'V' => &[1, 2, 3],
        b'N' => &[0, 1, 2, 3],
        _ => &[],
    }
}

impl GeneticCode {
    /// The table for an NCBI genetic-code id, falling back to the standard
    /// code for ids this crate does not carry.
    pub fn from_id(id: u8) -> &'static GeneticCode {
        TABLES
            .iter()
            .find(|t| t.id == id)
            .unwrap_or_else(|| {
                warn!("Unknown genetic code table {id}, using the standard code");
                &TABLES[0]
            })
    }

    fn lookup(&self, b1: usize, b2: usize, b3: usize) -> u8 {
        self.ncbieaa.as_bytes()[b1 * 16 + b2 * 4 + b3]
    }

    /// Translates one codon to an amino-acid symbol.
    ///
    /// A codon made entirely of `?`/`-` stays missing data (`?`). A codon
    /// with a single ambiguity code resolves when all expansions agree on
    /// the amino acid; everything else that cannot be read is `X`. Stop
    /// codons come back as `*`.
    pub fn translate_codon(&self, codon: &[u8]) -> u8 {
        if codon.len() != 3 {
            return b'X';
        }
        if codon.iter().all(|&b| b == b'?' || b == b'-') {
            return b'?';
        }

        let indices: Vec<Option<usize>> = codon.iter().map(|&b| base_index(b)).collect();
        if let (Some(b1), Some(b2), Some(b3)) = (indices[0], indices[1], indices[2]) {
            return self.lookup(b1, b2, b3);
        }

        // Resolve at most one ambiguous base; more than one never narrows
        // down to a single amino acid in practice.
        let ambiguous = indices.iter().filter(|i| i.is_none()).count();
        if ambiguous != 1 {
            return b'X';
        }

        let expanded: Vec<Vec<usize>> = codon
            .iter()
            .zip(&indices)
            .map(|(&b, idx)| match idx {
                Some(i) => vec![*i],
                None => expansions(b).to_vec(),
            })
            .collect();
        if expanded.iter().any(|e| e.is_empty()) {
            return b'X';
        }

        let mut aa = None;
        for &b1 in &expanded[0] {
            for &b2 in &expanded[1] {
                for &b3 in &expanded[2] {
                    let candidate = self.lookup(b1, b2, b3);
                    match aa {
                        None => aa = Some(candidate),
                        Some(prev) if prev != candidate => return b'X',
                        _ => {}
                    }
                }
            }
        }
        aa.unwrap_or(b'X')
    }

    /// Translates an in-frame nucleotide sequence, dropping any incomplete
    /// trailing codon.
    pub fn translate(&self, seq: &str) -> String {
        let bytes = seq.as_bytes();
        let mut out = String::with_capacity(bytes.len() / 3);
        for codon in bytes.chunks_exact(3) {
            out.push(self.translate_codon(codon) as char);
        }
        out
    }
}
