//! MIRIAM-style RDF annotations.
//!
//! CellDesigner species and reactions carry `rdf:RDF` annotation blocks whose
//! useful content is a list of qualifier elements (`bqbiol:is`,
//! `bqbiol:isDescribedBy`, ...) each holding an `rdf:Bag` of resource URIs.
//! We keep that structure rather than opaque XML so annotations can be merged
//! and extended with the computed logical functions.

use serde::{Deserialize, Serialize};

use crate::ns;

/// A full `rdf:RDF` annotation block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RdfAnnotation {
    pub descriptions: Vec<RdfDescription>,
}

/// One `rdf:Description` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RdfDescription {
    /// Value of `rdf:about`.
    pub about: String,
    pub qualifiers: Vec<RdfQualifier>,
}

/// A qualifier element holding a bag of resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdfQualifier {
    /// Namespace URI of the qualifier element.
    pub ns: String,
    /// Local name, e.g. `isDescribedBy`.
    pub local: String,
    /// `rdf:resource` values of the `rdf:li` children.
    pub resources: Vec<String>,
}

impl RdfQualifier {
    pub fn described_by(resource: &str) -> Self {
        RdfQualifier {
            ns: ns::BQBIOL.to_string(),
            local: "isDescribedBy".to_string(),
            resources: vec![resource.to_string()],
        }
    }
}

impl RdfAnnotation {
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    /// Merge another annotation into this one: the first description absorbs
    /// the qualifiers of the other annotation's first description. Further
    /// descriptions of the merged block are dropped.
    pub fn merge(&mut self, other: &RdfAnnotation) {
        if let (Some(first), Some(new)) =
            (self.descriptions.first_mut(), other.descriptions.first())
        {
            first.qualifiers.extend(new.qualifiers.iter().cloned());
        }
    }
}

/// Merge `new` into an optional annotation slot, creating it if absent.
pub fn merge_annotations(target: &mut Option<RdfAnnotation>, new: &RdfAnnotation) {
    match target {
        Some(existing) => existing.merge(new),
        None => *target = Some(new.clone()),
    }
}
