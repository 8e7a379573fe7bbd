//! End-to-end conversion of a small CellDesigner map.

use casq_celldesigner::read_celldesigner;
use casq_core::ns;
use casq_core::{remove_small_components, simplify};
use casq_export::{write_qual, QualOptions};
use casq_xml::Element;

const FIXTURE: &str = include_str!("../../casq-celldesigner/tests/fixtures/mini_map.xml");

fn convert(remove: i64, ginsim_names: bool) -> Element {
    let mut model = read_celldesigner(FIXTURE).unwrap();
    simplify(&mut model);
    if remove != 0 {
        remove_small_components(&mut model, remove);
    }
    let mut out = Vec::new();
    write_qual(&mut out, &mut model, QualOptions { ginsim_names }).unwrap();
    Element::parse(&String::from_utf8(out).unwrap()).unwrap()
}

#[test]
fn test_produces_a_qual_document() {
    let root = convert(0, false);
    assert!(root.is(Some(ns::SBML3), "sbml"));
    assert_eq!(root.attr_ns(Some(ns::QUAL), "required"), Some("true"));
    let model = root.find(Some(ns::SBML3), "model").unwrap();
    let qlist = model.find(Some(ns::QUAL), "listOfQualitativeSpecies").unwrap();
    let species: Vec<_> = qlist
        .find_all(Some(ns::QUAL), "qualitativeSpecies")
        .collect();
    assert_eq!(species.len(), 3);
    // complexes first, then plain aliases, in map order
    assert_eq!(species[0].attr_ns(Some(ns::QUAL), "id"), Some("csa1"));
    assert_eq!(species[1].attr_ns(Some(ns::QUAL), "id"), Some("sa1"));
    assert_eq!(species[1].attr_ns(Some(ns::QUAL), "name"), Some("A"));
    assert_eq!(species[1].attr_ns(Some(ns::QUAL), "constant"), Some("true"));
    assert_eq!(species[2].attr_ns(Some(ns::QUAL), "constant"), Some("false"));
}

#[test]
fn test_transition_structure() {
    let root = convert(0, false);
    let model = root.find(Some(ns::SBML3), "model").unwrap();
    let tlist = model.find(Some(ns::QUAL), "listOfTransitions").unwrap();
    let transitions: Vec<_> = tlist.find_all(Some(ns::QUAL), "transition").collect();
    assert_eq!(transitions.len(), 1);
    let transition = transitions[0];
    assert_eq!(transition.attr_ns(Some(ns::QUAL), "id"), Some("tr_sa2"));
    let inputs: Vec<_> = transition
        .find(Some(ns::QUAL), "listOfInputs")
        .unwrap()
        .find_all(Some(ns::QUAL), "input")
        .collect();
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[0].attr_ns(Some(ns::QUAL), "qualitativeSpecies"), Some("sa1"));
    assert_eq!(inputs[0].attr_ns(Some(ns::QUAL), "sign"), Some("positive"));
    assert_eq!(inputs[1].attr_ns(Some(ns::QUAL), "qualitativeSpecies"), Some("csa1"));
    assert_eq!(inputs[1].attr_ns(Some(ns::QUAL), "sign"), Some("negative"));
    // function: A and not A_B
    let math = transition.descendant(Some(ns::MATHML), "math").unwrap();
    let apply = math.find(Some(ns::MATHML), "apply").unwrap();
    assert!(apply.find(Some(ns::MATHML), "and").is_some());
    let cis: Vec<String> = apply
        .descendants(Some(ns::MATHML), "ci")
        .iter()
        .map(|ci| ci.text())
        .collect();
    assert_eq!(cis, vec!["sa1", "csa1"]);
}

#[test]
fn test_layout_follows_the_map() {
    let root = convert(0, false);
    let model = root.find(Some(ns::SBML3), "model").unwrap();
    let layouts = model.find(Some(ns::LAYOUT), "listOfLayouts").unwrap();
    let layout = layouts.find(Some(ns::LAYOUT), "layout").unwrap();
    let dimensions = layout.find(Some(ns::LAYOUT), "dimensions").unwrap();
    assert_eq!(dimensions.attr("width"), Some("600"));
    assert_eq!(dimensions.attr("height"), Some("400"));
    let glyphs = layout
        .find(Some(ns::LAYOUT), "listOfAdditionalGraphicalObjects")
        .unwrap()
        .descendants(Some(ns::LAYOUT), "generalGlyph");
    assert_eq!(glyphs.len(), 3);
    assert_eq!(glyphs[0].attr_ns(Some(ns::LAYOUT), "reference"), Some("csa1"));
}

#[test]
fn test_function_and_cdid_urns_attached() {
    let root = convert(0, false);
    let resources: Vec<String> = root
        .descendants(Some(ns::RDF), "li")
        .iter()
        .filter_map(|li| li.attr_ns(Some(ns::RDF), "resource"))
        .map(str::to_string)
        .collect();
    assert!(resources.iter().any(|r| r == "urn:casq:function:A&!A_B"));
    assert!(resources.iter().any(|r| r == "urn:casq:cdid:s2"));
    // species annotations from the map survive
    assert!(resources.iter().any(|r| r == "urn:miriam:uniprot:P1"));
    // reaction annotations end up on the transition
    assert!(resources.iter().any(|r| r == "urn:miriam:pubmed:123"));
}

#[test]
fn test_ginsim_names_are_mangled() {
    let root = convert(0, true);
    let model = root.find(Some(ns::SBML3), "model").unwrap();
    let qlist = model.find(Some(ns::QUAL), "listOfQualitativeSpecies").unwrap();
    let names: Vec<_> = qlist
        .find_all(Some(ns::QUAL), "qualitativeSpecies")
        .filter_map(|s| s.attr_ns(Some(ns::QUAL), "name"))
        .collect();
    assert!(names.contains(&"A_sa1"));
}

#[test]
fn test_negative_remove_keeps_largest_component() {
    let root = convert(-1, false);
    let model = root.find(Some(ns::SBML3), "model").unwrap();
    let qlist = model.find(Some(ns::QUAL), "listOfQualitativeSpecies").unwrap();
    // the whole fixture is one component plus the constant-only species
    assert_eq!(qlist.find_all(Some(ns::QUAL), "qualitativeSpecies").count(), 3);
}
