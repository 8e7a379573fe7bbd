//! CSV listing of the converted variables.

use std::io::Write;

use casq_core::LogicalModel;

use crate::error::ExportResult;

/// Write one row per species: alias id, name, SBML species id, GinSim
/// formula. Meant to be produced next to the SBML-qual file.
pub fn write_csv<W: Write>(mut out: W, model: &LogicalModel) -> ExportResult<()> {
    for (id, species) in model.iter() {
        write!(
            out,
            "{},{},{},{}\r\n",
            field(id),
            field(&species.name),
            field(&species.ref_species),
            field(&species.function),
        )?;
    }
    Ok(())
}

fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
