//! NEXUS writer with a MrBayes run-control block.

use itertools::Itertools;

use super::{pad_label, WriterInput};

/// Fixed MrBayes directive battery, reproduced verbatim including the
/// inline bracketed comments.
const MRBAYES_DIRECTIVES: &str = "\
prset applyto=(all) ratepr=variable brlensp=unconstrained:Exp(100.0) shapepr=exp(1.0) tratiopr=beta(2.0,1.0);
lset applyto=(all) nst=mixed rates=gamma [invgamma];
unlink statefreq=(all);
unlink shape=(all) revmat=(all) tratio=(all) [pinvar=(all)];
mcmc ngen=10000000 printfreq=1000 samplefreq=1000 nchains=4 nruns=2 savebrlens=yes [temp=0.11];
 sump relburnin=yes [no] burninfrac=0.25 [2500];
 sumt relburnin=yes [no] burninfrac=0.25 [2500] contype=halfcompat [allcompat];
END;";

pub fn build(input: &WriterInput) -> String {
    let partition = input.partition;
    let datatype = if input.aminoacids { "PROTEIN" } else { "DNA" };

    let mut out = String::new();
    out.push_str("#NEXUS\n\nBEGIN DATA;\n");
    out.push_str(&format!(
        "DIMENSIONS NTAX={} NCHAR={};\n",
        partition.ntax, partition.total_width
    ));
    out.push_str(&format!(
        "FORMAT INTERLEAVE DATATYPE={datatype} MISSING=? GAP=-;\n"
    ));
    out.push_str("MATRIX\n");

    for block in input.blocks {
        out.push('\n');
        out.push_str(&format!("[{}]\n", block.gene_code));
        for row in &block.rows {
            out.push_str(&pad_label(&row.label));
            out.push_str(&row.seq);
            out.push('\n');
        }
    }

    out.push_str(";\nEND;\n\nbegin mrbayes;\n");
    for charset in &partition.charsets {
        out.push_str(&format!("    {charset}\n"));
    }
    out.push_str(&format!(
        "partition GENES = {}: {};\n",
        partition.charsets.len(),
        partition.charsets.iter().map(|c| c.name.as_str()).join(", ")
    ));
    out.push_str("\nset partition = GENES;\n\nset autoclose=yes;\n");
    if let Some(label) = &input.outgroup_label {
        out.push_str(&format!("outgroup {label};\n"));
    }
    out.push_str(MRBAYES_DIRECTIVES);
    out
}
