extern crate env_logger;
#[macro_use]
extern crate log;

use std::{
    fs::File,
    io::{prelude::*, stdout, BufWriter},
    path::Path,
};

use anyhow::{bail, Result};
use clap::Parser;

use phylomat::cli::{Cli, Commands};
use phylomat::request::{parse_code_list, DatasetRequest};
use phylomat::{DatasetBuilder, Store};

/// Creates a `BufWriter` for the given output option. This allows for an
/// output file to be passed or otherwise will default to using standard
/// output.
fn get_writer(output: &Option<String>) -> Result<impl Write> {
    // get output as a BufWriter - equal to stdout if None
    let writer = BufWriter::new(match output {
        Some(ref x) => {
            let file = File::create(Path::new(x))?;
            Box::new(file) as Box<dyn Write + Send>
        }
        None => Box::new(stdout()) as Box<dyn Write + Send>,
    });
    Ok(writer)
}

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Create {
            store,
            vouchers,
            genes,
            taxon_names,
            positions,
            partition,
            format,
            aminoacids,
            degen,
            outgroup,
            min_genes,
            output,
            charset_out,
        } => {
            let store = Store::from_dir(store)?;

            let request = DatasetRequest {
                voucher_codes: vouchers.as_deref().map(parse_code_list).unwrap_or_default(),
                gene_codes: genes.as_deref().map(parse_code_list).unwrap_or_default(),
                taxon_names: taxon_names.clone(),
                positions: positions.clone(),
                partition_scheme: *partition,
                file_format: *format,
                aminoacids: *aminoacids,
                degen: *degen,
                outgroup: outgroup.clone(),
                number_genes: *min_genes,
            };

            let result = DatasetBuilder::new(&store, request).build();

            for warning in &result.warnings {
                warn!("{warning}");
            }
            if !result.errors.is_empty() {
                for error in &result.errors {
                    error!("{error}");
                }
                bail!("Could not create dataset");
            }

            if let (Some(path), Some(charset_block)) = (charset_out, &result.charset_block) {
                std::fs::write(path, charset_block)?;
                info!("Wrote charset block to {path}");
            }

            let mut writer = get_writer(output)?;
            write!(writer, "{}", result.dataset_str)?;
            if !result.dataset_str.ends_with('\n') {
                writeln!(writer)?;
            }

            info!("Completed successfully.")
        }
        Commands::Summary { store } => {
            let store = Store::from_dir(store)?;
            println!("{}", serde_json::to_string_pretty(&store.summary())?);
        }
    };
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
