//! BMA (BioModelAnalyzer) JSON export.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use casq_core::LogicalModel;

use crate::error::{ExportError, ExportResult};

#[derive(Debug, Serialize)]
struct BmaDocument {
    #[serde(rename = "Model")]
    model: BmaModel,
    #[serde(rename = "Layout")]
    layout: BmaLayout,
    ltl: BmaLtl,
}

#[derive(Debug, Serialize)]
struct BmaModel {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Variables")]
    variables: Vec<BmaVariable>,
    #[serde(rename = "Relationships")]
    relationships: Vec<BmaRelationship>,
}

#[derive(Debug, Serialize)]
struct BmaVariable {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Id")]
    id: u32,
    #[serde(rename = "RangeFrom")]
    range_from: u32,
    #[serde(rename = "RangeTo")]
    range_to: u32,
    #[serde(rename = "Formula")]
    formula: String,
}

#[derive(Debug, Serialize)]
struct BmaRelationship {
    #[serde(rename = "ToVariable")]
    to_variable: u32,
    #[serde(rename = "Type")]
    kind: &'static str,
    #[serde(rename = "FromVariable")]
    from_variable: u32,
    #[serde(rename = "Id")]
    id: u32,
}

#[derive(Debug, Serialize)]
struct BmaLayoutVariable {
    #[serde(rename = "Id")]
    id: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Type")]
    kind: &'static str,
    #[serde(rename = "ContainerId")]
    container_id: u32,
    #[serde(rename = "PositionX")]
    position_x: f64,
    #[serde(rename = "PositionY")]
    position_y: f64,
    #[serde(rename = "CellY")]
    cell_y: u32,
    #[serde(rename = "CellX")]
    cell_x: u32,
    #[serde(rename = "Angle")]
    angle: u32,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Fill", skip_serializing_if = "Option::is_none")]
    fill: Option<String>,
}

#[derive(Debug, Serialize)]
struct BmaLayout {
    #[serde(rename = "Variables")]
    variables: Vec<BmaLayoutVariable>,
    #[serde(rename = "Containers")]
    containers: Vec<serde_json::Value>,
    #[serde(rename = "Description")]
    description: String,
}

#[derive(Debug, Serialize)]
struct BmaLtl {
    states: Vec<serde_json::Value>,
    operations: Vec<serde_json::Value>,
}

/// Builds BMA target functions: a `max` over reactions of `min` chains over
/// the reaction's activators and inhibitors.
struct FormulaBuilder {
    value: String,
    transition: String,
}

impl FormulaBuilder {
    fn new() -> Self {
        FormulaBuilder {
            value: "0".to_string(),
            transition: "1".to_string(),
        }
    }

    fn add_activator(&mut self, vid: u32) {
        self.transition = format!("(min(var({vid}),{}))", self.transition);
    }

    fn add_inhibitor(&mut self, vid: u32) {
        self.transition = format!("(min(1-var({vid}),{}))", self.transition);
    }

    fn finish_transition(&mut self) {
        self.value = format!("(max({},{}))", self.transition, self.value);
        self.transition = "1".to_string();
    }
}

/// The four most populous compartments get the BMA fill colours.
fn colour_map(index: usize) -> Option<&'static str> {
    match index {
        0 => Some("BMA_Green"),
        1 => Some("BMA_Orange"),
        2 => Some("BMA_Purple"),
        3 => Some("BMA_Mint"),
        _ => None,
    }
}

fn clean_name(name: &str) -> String {
    name.chars()
        .filter_map(|c| match c {
            ' ' | ',' | '-' => Some('_'),
            '(' | ')' | '+' | ':' | '/' | '\\' => None,
            other => Some(other),
        })
        .collect()
}

/// Write the model as a BMA JSON document.
pub fn write_bma<W: Write>(out: W, model: &LogicalModel, granularity: u32) -> ExportResult<()> {
    if granularity == 0 {
        return Err(ExportError::InvalidGranularity(granularity));
    }

    // first-seen compartment order, so colour assignment is stable
    let mut compartment_order: Vec<String> = Vec::new();
    let mut compartment_counts: HashMap<String, usize> = HashMap::new();
    for (_, species) in model.iter() {
        if !compartment_counts.contains_key(&species.compartment) {
            compartment_order.push(species.compartment.clone());
        }
        *compartment_counts.entry(species.compartment.clone()).or_insert(0) += 1;
    }
    compartment_order.sort_by_key(|c| std::cmp::Reverse(compartment_counts[c]));
    let colours: HashMap<&String, Option<&'static str>> = compartment_order
        .iter()
        .enumerate()
        .map(|(index, compartment)| (compartment, colour_map(index)))
        .collect();

    let mut next_id = 1u32;
    let mut id_map: HashMap<&String, u32> = HashMap::new();
    for id in model.ids() {
        id_map.insert(id, next_id);
        next_id += 1;
    }

    let mut relationships = Vec::new();
    let mut formulas: HashMap<&String, String> = HashMap::new();
    for (id, species) in model.iter() {
        if species.reactions.is_empty() {
            continue;
        }
        let target = id_map[id];
        let mut builder = FormulaBuilder::new();
        for reaction in &species.reactions {
            for reactant in &reaction.reactants {
                // the simplified model may no longer hold every alias
                let Some(&source) = id_map.get(reactant) else {
                    continue;
                };
                relationships.push(BmaRelationship {
                    to_variable: target,
                    kind: "Activator",
                    from_variable: source,
                    id: next_id,
                });
                next_id += 1;
                builder.add_activator(source);
            }
            for modifier in &reaction.modifiers {
                let Some(&source) = id_map.get(&modifier.aliases) else {
                    continue;
                };
                let kind = if modifier.kind.is_bma_inhibition() {
                    builder.add_inhibitor(source);
                    "Inhibitor"
                } else {
                    builder.add_activator(source);
                    "Activator"
                };
                relationships.push(BmaRelationship {
                    to_variable: target,
                    kind,
                    from_variable: source,
                    id: next_id,
                });
                next_id += 1;
            }
            builder.finish_transition();
        }
        let formula = if granularity == 1 {
            builder.value
        } else {
            // multi-valued targets are left for BMA to infer
            String::new()
        };
        formulas.insert(id, formula);
    }

    let variables: Vec<BmaVariable> = model
        .iter()
        .map(|(id, species)| BmaVariable {
            name: clean_name(&species.name),
            id: id_map[id],
            range_from: 0,
            range_to: granularity,
            // sources with no incoming edges are assumed active
            formula: formulas
                .get(id)
                .cloned()
                .unwrap_or_else(|| granularity.to_string()),
        })
        .collect();
    let layout_variables: Vec<BmaLayoutVariable> = model
        .iter()
        .map(|(id, species)| BmaLayoutVariable {
            id: id_map[id],
            name: clean_name(&species.name),
            kind: "Constant",
            container_id: 0,
            position_x: species.bounds.x.parse().unwrap_or(0.0),
            position_y: species.bounds.y.parse().unwrap_or(0.0),
            cell_y: 0,
            cell_x: 0,
            angle: 0,
            description: String::new(),
            fill: colours
                .get(&species.compartment)
                .copied()
                .flatten()
                .map(str::to_string),
        })
        .collect();

    let document = BmaDocument {
        model: BmaModel {
            name: "CaSQ-BMA".to_string(),
            variables,
            relationships,
        },
        layout: BmaLayout {
            variables: layout_variables,
            containers: Vec::new(),
            description: String::new(),
        },
        ltl: BmaLtl {
            states: Vec::new(),
            operations: Vec::new(),
        },
    };
    serde_json::to_writer_pretty(out, &document)?;
    Ok(())
}
