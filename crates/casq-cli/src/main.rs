//! CaSQ command line tool.

use std::path::PathBuf;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use casq_cli::{convert, validate, ConvertOptions};

#[derive(Parser)]
#[command(name = "casq")]
#[command(about = "Convert CellDesigner models to SBML-qual", long_about = None)]
struct Cli {
    /// Print debug information on stderr
    #[arg(short, long)]
    debug: bool,

    /// Use the GinSim naming convention for species
    #[arg(short, long)]
    ginsim: bool,

    /// Also write a CSV species listing next to the output file
    #[arg(short, long)]
    csv: bool,

    /// Remove connected components of size at most S; if negative, keep only
    /// the biggest component(s)
    #[arg(short, long, value_name = "S", default_value = "0", allow_negative_numbers = true)]
    remove: i64,

    /// Value range of the BMA export
    #[arg(long, default_value = "1")]
    granularity: u32,

    /// Also write a BMA JSON model to FILE
    #[arg(long, value_name = "FILE")]
    bma: Option<PathBuf>,

    /// Check the output with the sbml.org online validator
    #[arg(long)]
    validate: bool,

    /// CellDesigner file to convert; stdin when absent
    infile: Option<PathBuf>,

    /// Where to write the SBML-qual model; derived from INFILE, or stdout
    /// when reading stdin
    outfile: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = ConvertOptions {
        ginsim: cli.ginsim,
        csv: cli.csv,
        remove: cli.remove,
        granularity: cli.granularity,
        bma: cli.bma,
        infile: cli.infile,
        outfile: cli.outfile,
    };
    let written = convert(&options)?;

    if cli.validate {
        match written {
            Some(path) => println!("{}", validate::validate(&path).await?),
            None => warn!("cannot validate a model written to stdout"),
        }
    }

    Ok(())
}
