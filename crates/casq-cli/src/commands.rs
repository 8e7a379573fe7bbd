//! The read → simplify → prune → export pipeline.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, info};

use casq_celldesigner::read_celldesigner;
use casq_core::{remove_small_components, simplify};
use casq_export::{write_bma, write_csv, write_qual, QualOptions};

/// What to convert and where to put it.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Mangle species names for GinSim.
    pub ginsim: bool,
    /// Also write the species listing next to the output file.
    pub csv: bool,
    /// Drop connected components of size at most this; negative keeps only
    /// the largest component(s).
    pub remove: i64,
    /// Value range of the BMA export.
    pub granularity: u32,
    /// Also write a BMA JSON model here.
    pub bma: Option<PathBuf>,
    /// CellDesigner file; stdin when absent.
    pub infile: Option<PathBuf>,
    /// SBML-qual file; derived from the input name, or stdout when reading
    /// stdin.
    pub outfile: Option<PathBuf>,
}

impl ConvertOptions {
    /// Where the SBML-qual output goes; `None` means stdout.
    fn output_path(&self) -> Option<PathBuf> {
        match (&self.infile, &self.outfile) {
            (_, Some(outfile)) => Some(outfile.clone()),
            (Some(infile), None) => Some(infile.with_extension("sbml")),
            (None, None) => None,
        }
    }
}

/// Run the conversion; returns the path of the written SBML-qual file, or
/// `None` when it went to stdout.
pub fn convert(options: &ConvertOptions) -> anyhow::Result<Option<PathBuf>> {
    let text = match &options.infile {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    debug!(
        input = %options.infile.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| "<stdin>".to_string()),
        "parsing"
    );
    let mut model = read_celldesigner(&text)?;
    info!(species = model.len(), "model read");
    simplify(&mut model);
    let removed = remove_small_components(&mut model, options.remove);
    if !removed.is_empty() {
        info!(removed = removed.len(), "dropped small connected components");
    }

    let qual_options = QualOptions {
        ginsim_names: options.ginsim,
    };
    let output_path = options.output_path();
    match &output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_qual(&mut writer, &mut model, qual_options)?;
            writer.flush()?;
            info!(output = %path.display(), "SBML-qual model written");
        }
        None => {
            let stdout = std::io::stdout();
            write_qual(stdout.lock(), &mut model, qual_options)?;
        }
    }

    if options.csv {
        match &output_path {
            Some(path) => {
                let csv_path = PathBuf::from(format!("{}.csv", path.display()));
                write_csv(
                    BufWriter::new(File::create(&csv_path)?),
                    &model,
                )?;
                info!(output = %csv_path.display(), "species listing written");
            }
            None => debug!("skipping CSV output for stdout conversion"),
        }
    }

    if let Some(bma_path) = &options.bma {
        write_bma(
            BufWriter::new(File::create(bma_path)?),
            &model,
            options.granularity,
        )?;
        info!(output = %bma_path.display(), "BMA model written");
    }

    Ok(output_path)
}
