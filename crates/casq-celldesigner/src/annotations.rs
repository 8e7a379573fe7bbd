//! Extraction of MIRIAM annotations from `rdf:RDF` blocks.

use casq_core::ns;
use casq_core::{RdfAnnotation, RdfDescription, RdfQualifier};
use casq_xml::Element;

/// Read the qualifier/resource structure out of an `rdf:RDF` element.
///
/// Only qualifier children holding an `rdf:Bag` of `rdf:li` resources are
/// kept (bqbiol/bqmodel relations and the like); vCard author blocks carry
/// no bag and are skipped.
pub fn parse_rdf(rdf: &Element) -> Option<RdfAnnotation> {
    let mut annotation = RdfAnnotation::default();
    for description in rdf.find_all(Some(ns::RDF), "Description") {
        let mut parsed = RdfDescription {
            about: description
                .attr_ns(Some(ns::RDF), "about")
                .unwrap_or_default()
                .to_string(),
            qualifiers: Vec::new(),
        };
        for qualifier in description.elements() {
            let Some(bag) = qualifier.find(Some(ns::RDF), "Bag") else {
                continue;
            };
            let resources: Vec<String> = bag
                .find_all(Some(ns::RDF), "li")
                .filter_map(|li| li.attr_ns(Some(ns::RDF), "resource"))
                .map(str::to_string)
                .collect();
            parsed.qualifiers.push(RdfQualifier {
                ns: qualifier.ns.clone().unwrap_or_default(),
                local: qualifier.local.clone(),
                resources,
            });
        }
        annotation.descriptions.push(parsed);
    }
    if annotation.is_empty() {
        None
    } else {
        Some(annotation)
    }
}
