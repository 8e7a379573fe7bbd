//! The logical model extracted from a CellDesigner map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::annotation::{merge_annotations, RdfAnnotation, RdfDescription, RdfQualifier};

/// Activation state drawn for a species alias on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    Active,
    Inactive,
}

impl Activity {
    pub fn from_cd(text: &str) -> Self {
        if text == "active" {
            Activity::Active
        } else {
            Activity::Inactive
        }
    }
}

/// Position and size of a species alias, kept as the verbatim attribute
/// strings so the layout round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: String,
    pub y: String,
    pub w: String,
    pub h: String,
}

/// How a modification arc acts on its reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierKind {
    Inhibition,
    UnknownInhibition,
    /// `BOOLEAN_LOGIC_GATE_AND`: the listed aliases are all required.
    AndGate,
    /// Catalysis and every other CellDesigner modification type, all treated
    /// as activation.
    Other(String),
}

impl ModifierKind {
    pub fn from_cd(kind: &str) -> Self {
        match kind {
            "INHIBITION" => ModifierKind::Inhibition,
            "UNKNOWN_INHIBITION" => ModifierKind::UnknownInhibition,
            "BOOLEAN_LOGIC_GATE_AND" => ModifierKind::AndGate,
            other => ModifierKind::Other(other.to_string()),
        }
    }

    /// Inhibiting for the strict SBML-qual semantics (`UNKNOWN_INHIBITION`
    /// is deliberately not included, matching the qual function builder).
    pub fn is_strict_inhibition(&self) -> bool {
        matches!(self, ModifierKind::Inhibition)
    }

    /// Inhibiting for the BMA export, where unknown inhibitions also count.
    pub fn is_bma_inhibition(&self) -> bool {
        matches!(self, ModifierKind::Inhibition | ModifierKind::UnknownInhibition)
    }
}

/// A modification arc of a reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub kind: ModifierKind,
    /// Alias id, or a comma-joined alias list for Boolean gates.
    pub aliases: String,
}

impl Modifier {
    pub fn new(kind: ModifierKind, aliases: &str) -> Self {
        Modifier {
            kind,
            aliases: aliases.to_string(),
        }
    }

    /// The individual alias ids (gates list several).
    pub fn alias_list(&self) -> impl Iterator<Item = &str> {
        self.aliases.split(',')
    }
}

/// A reaction producing a species, reduced to what the logical semantics
/// needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// CellDesigner reaction type (`STATE_TRANSITION`, ...), informational.
    pub kind: Option<String>,
    /// Base reactant alias ids, complexes resolved.
    pub reactants: Vec<String>,
    pub modifiers: Vec<Modifier>,
    /// Serialized XHTML body of the reaction notes, if any.
    pub notes: Option<String>,
    pub annotations: Option<RdfAnnotation>,
}

/// A species alias of the map together with everything the conversion needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    /// Display name of the referenced SBML species.
    pub name: String,
    /// CellDesigner class (`PROTEIN`, `GENE`, `RNA`, `COMPLEX`, ...).
    pub class: String,
    pub activity: Activity,
    pub bounds: Bounds,
    /// Id of the referenced SBML species.
    pub ref_species: String,
    /// Compartment id of the referenced SBML species.
    pub compartment: String,
    /// Post-translational modification states.
    pub modifications: Vec<String>,
    pub annotations: Option<RdfAnnotation>,
    /// Reactions producing this species.
    pub reactions: Vec<Reaction>,
    /// Rendered GinSim formula; the species name until a function is built.
    pub function: String,
}

impl Species {
    /// Record the logical function and the CellDesigner id as
    /// `urn:casq:` resources on the annotation block.
    pub fn annotate_function(&mut self) {
        let rdf = RdfAnnotation {
            descriptions: vec![RdfDescription {
                about: format!("#{}", self.ref_species),
                qualifiers: vec![
                    RdfQualifier::described_by(&format!("urn:casq:function:{}", self.function)),
                    RdfQualifier::described_by(&format!("urn:casq:cdid:{}", self.ref_species)),
                ],
            }],
        };
        merge_annotations(&mut self.annotations, &rdf);
    }
}

/// The converted model: species keyed by alias id, in map order.
///
/// Output order must follow the order species were discovered in, so the map
/// keeps an explicit id sequence beside the lookup table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicalModel {
    order: Vec<String>,
    species: HashMap<String, Species>,
    /// Species name -> alias ids sharing that name (active and inactive
    /// aliases of the same protein).
    pub by_name: HashMap<String, Vec<String>>,
    /// Canvas width from the CellDesigner model display.
    pub width: String,
    /// Canvas height from the CellDesigner model display.
    pub height: String,
}

impl LogicalModel {
    pub fn new(width: &str, height: &str) -> Self {
        LogicalModel {
            width: width.to_string(),
            height: height.to_string(),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.species.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Species> {
        self.species.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Species> {
        self.species.get_mut(id)
    }

    /// Insert a species, keeping first-insertion order on re-insertion.
    pub fn insert(&mut self, id: &str, species: Species) {
        if self.species.insert(id.to_string(), species).is_none() {
            self.order.push(id.to_string());
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Species> {
        let removed = self.species.remove(id);
        if removed.is_some() {
            self.order.retain(|known| known != id);
        }
        removed
    }

    /// Alias ids in map order.
    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    /// Species with their ids, in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Species)> {
        self.order
            .iter()
            .filter_map(|id| self.species.get(id).map(|sp| (id, sp)))
    }

    /// Record the alias under its species name for later simplification.
    pub fn record_name(&mut self, name: &str, alias: &str) {
        self.by_name
            .entry(name.to_string())
            .or_default()
            .push(alias.to_string());
    }

    /// Display name of an alias, empty when unknown or unnamed.
    pub fn display_name(&self, id: &str) -> &str {
        self.get(id).map(|sp| sp.name.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(name: &str) -> Species {
        Species {
            name: name.to_string(),
            class: "PROTEIN".to_string(),
            activity: Activity::Inactive,
            bounds: Bounds::default(),
            ref_species: format!("ref_{name}"),
            compartment: "default".to_string(),
            modifications: Vec::new(),
            annotations: None,
            reactions: Vec::new(),
            function: name.to_string(),
        }
    }

    #[test]
    fn test_insertion_order_survives_removal() {
        let mut model = LogicalModel::new("600", "400");
        model.insert("sa1", species("A"));
        model.insert("sa2", species("B"));
        model.insert("csa1", species("A_B"));
        model.remove("sa2");
        let ids: Vec<_> = model.ids().map(String::as_str).collect();
        assert_eq!(ids, vec!["sa1", "csa1"]);
    }

    #[test]
    fn test_annotate_function_creates_urns() {
        let mut sp = species("A");
        sp.function = "B&!C".to_string();
        sp.annotate_function();
        let annotation = sp.annotations.unwrap();
        let resources: Vec<_> = annotation.descriptions[0]
            .qualifiers
            .iter()
            .flat_map(|q| q.resources.iter())
            .collect();
        assert_eq!(resources, vec!["urn:casq:function:B&!C", "urn:casq:cdid:ref_A"]);
    }

    #[test]
    fn test_modifier_kind_mapping() {
        assert_eq!(ModifierKind::from_cd("INHIBITION"), ModifierKind::Inhibition);
        assert!(ModifierKind::from_cd("UNKNOWN_INHIBITION").is_bma_inhibition());
        assert!(!ModifierKind::from_cd("UNKNOWN_INHIBITION").is_strict_inhibition());
        assert_eq!(
            ModifierKind::from_cd("CATALYSIS"),
            ModifierKind::Other("CATALYSIS".to_string())
        );
    }
}
