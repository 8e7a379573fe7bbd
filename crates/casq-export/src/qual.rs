//! SBML-qual Level 3 Version 1 writer, layout package included.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::debug;

use casq_core::graph::known_inputs;
use casq_core::logic::build_functions;
use casq_core::ns;
use casq_core::{Expr, LogicalModel, RdfAnnotation, RdfDescription};

use crate::error::ExportResult;

/// Writer options.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualOptions {
    /// Mangle species names for GinSim, which uses names as identifiers.
    pub ginsim_names: bool,
}

/// Write the model as an SBML-qual document with layout.
///
/// Builds the Boolean functions first, which also records them as
/// `urn:casq:` annotations and as the `function` field used by the CSV
/// export.
pub fn write_qual<W: Write>(
    out: W,
    model: &mut LogicalModel,
    options: QualOptions,
) -> ExportResult<()> {
    let exprs = build_functions(model);
    let model = &*model;
    let mut w = Writer::new(out);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut root = BytesStart::new("sbml");
    root.push_attribute(("level", "3"));
    root.push_attribute(("version", "1"));
    root.push_attribute(("layout:required", "false"));
    root.push_attribute(("xmlns", ns::SBML3));
    root.push_attribute(("qual:required", "true"));
    root.push_attribute(("xmlns:layout", ns::LAYOUT));
    root.push_attribute(("xmlns:qual", ns::QUAL));
    root.push_attribute(("xmlns:rdf", ns::RDF));
    root.push_attribute(("xmlns:bqbiol", ns::BQBIOL));
    root.push_attribute(("xmlns:bqmodel", ns::BQMODEL));
    w.write_event(Event::Start(root))?;

    let mut model_tag = BytesStart::new("model");
    model_tag.push_attribute(("id", "model_id"));
    w.write_event(Event::Start(model_tag))?;

    w.write_event(Event::Start(BytesStart::new("listOfCompartments")))?;
    let mut compartment = BytesStart::new("compartment");
    compartment.push_attribute(("constant", "true"));
    compartment.push_attribute(("id", "comp1"));
    w.write_event(Event::Empty(compartment))?;
    w.write_event(Event::End(BytesEnd::new("listOfCompartments")))?;

    write_layout(&mut w, model, options)?;
    write_species(&mut w, model, options)?;
    write_transitions(&mut w, model, &exprs)?;

    w.write_event(Event::End(BytesEnd::new("model")))?;
    w.write_event(Event::End(BytesEnd::new("sbml")))?;
    Ok(())
}

fn write_layout<W: Write>(
    w: &mut Writer<W>,
    model: &LogicalModel,
    _options: QualOptions,
) -> ExportResult<()> {
    w.write_event(Event::Start(BytesStart::new("layout:listOfLayouts")))?;
    let mut layout = BytesStart::new("layout:layout");
    layout.push_attribute(("id", "layout1"));
    w.write_event(Event::Start(layout))?;
    let mut dimensions = BytesStart::new("layout:dimensions");
    dimensions.push_attribute(("width", model.width.as_str()));
    dimensions.push_attribute(("height", model.height.as_str()));
    w.write_event(Event::Empty(dimensions))?;

    w.write_event(Event::Start(BytesStart::new(
        "layout:listOfAdditionalGraphicalObjects",
    )))?;
    for (id, species) in model.iter() {
        let mut glyph = BytesStart::new("layout:generalGlyph");
        glyph.push_attribute(("layout:reference", id.as_str()));
        glyph.push_attribute(("layout:id", format!("{id}_glyph").as_str()));
        w.write_event(Event::Start(glyph))?;
        w.write_event(Event::Start(BytesStart::new("layout:boundingBox")))?;
        let mut position = BytesStart::new("layout:position");
        position.push_attribute(("layout:x", species.bounds.x.as_str()));
        position.push_attribute(("layout:y", species.bounds.y.as_str()));
        w.write_event(Event::Empty(position))?;
        let mut size = BytesStart::new("layout:dimensions");
        size.push_attribute(("layout:height", species.bounds.h.as_str()));
        size.push_attribute(("layout:width", species.bounds.w.as_str()));
        w.write_event(Event::Empty(size))?;
        w.write_event(Event::End(BytesEnd::new("layout:boundingBox")))?;
        w.write_event(Event::End(BytesEnd::new("layout:generalGlyph")))?;
    }
    w.write_event(Event::End(BytesEnd::new(
        "layout:listOfAdditionalGraphicalObjects",
    )))?;
    w.write_event(Event::End(BytesEnd::new("layout:layout")))?;
    w.write_event(Event::End(BytesEnd::new("layout:listOfLayouts")))?;
    Ok(())
}

fn write_species<W: Write>(
    w: &mut Writer<W>,
    model: &LogicalModel,
    options: QualOptions,
) -> ExportResult<()> {
    w.write_event(Event::Start(BytesStart::new(
        "qual:listOfQualitativeSpecies",
    )))?;
    for (id, species) in model.iter() {
        let constant = if species.reactions.is_empty() {
            "true"
        } else {
            "false"
        };
        let mut tag = BytesStart::new("qual:qualitativeSpecies");
        tag.push_attribute(("qual:maxLevel", "1"));
        tag.push_attribute(("qual:compartment", "comp1"));
        tag.push_attribute((
            "qual:name",
            fix_name(&species.name, id, options.ginsim_names).as_str(),
        ));
        tag.push_attribute(("qual:constant", constant));
        tag.push_attribute(("qual:id", id.as_str()));
        match &species.annotations {
            Some(annotation) => {
                w.write_event(Event::Start(tag))?;
                w.write_event(Event::Start(BytesStart::new("annotation")))?;
                write_rdf(w, annotation)?;
                w.write_event(Event::End(BytesEnd::new("annotation")))?;
                w.write_event(Event::End(BytesEnd::new("qual:qualitativeSpecies")))?;
            }
            None => w.write_event(Event::Empty(tag))?,
        }
    }
    w.write_event(Event::End(BytesEnd::new("qual:listOfQualitativeSpecies")))?;
    Ok(())
}

fn write_transitions<W: Write>(
    w: &mut Writer<W>,
    model: &LogicalModel,
    exprs: &std::collections::HashMap<String, Expr>,
) -> ExportResult<()> {
    w.write_event(Event::Start(BytesStart::new("qual:listOfTransitions")))?;
    for (id, species) in model.iter() {
        if species.reactions.is_empty() {
            continue;
        }
        let inputs = known_inputs(&species.reactions, model);
        // every input may reference species outside the model
        if inputs.is_empty() {
            debug!(species = %id, "transition references no known species, dropped");
            continue;
        }
        let Some(expr) = exprs.get(id) else {
            continue;
        };

        let mut transition = BytesStart::new("qual:transition");
        transition.push_attribute(("qual:id", format!("tr_{id}").as_str()));
        w.write_event(Event::Start(transition))?;

        w.write_event(Event::Start(BytesStart::new("qual:listOfInputs")))?;
        for (index, (input, sign)) in inputs.iter().enumerate() {
            let mut tag = BytesStart::new("qual:input");
            tag.push_attribute(("qual:qualitativeSpecies", input.as_str()));
            tag.push_attribute(("qual:transitionEffect", "none"));
            tag.push_attribute(("qual:sign", sign.as_str()));
            tag.push_attribute(("qual:id", format!("tr_{id}_in_{index}").as_str()));
            w.write_event(Event::Empty(tag))?;
        }
        w.write_event(Event::End(BytesEnd::new("qual:listOfInputs")))?;

        w.write_event(Event::Start(BytesStart::new("qual:listOfOutputs")))?;
        let mut output = BytesStart::new("qual:output");
        output.push_attribute(("qual:qualitativeSpecies", id.as_str()));
        output.push_attribute(("qual:transitionEffect", "assignmentLevel"));
        output.push_attribute(("qual:id", format!("tr_{id}_out").as_str()));
        w.write_event(Event::Empty(output))?;
        w.write_event(Event::End(BytesEnd::new("qual:listOfOutputs")))?;

        w.write_event(Event::Start(BytesStart::new("qual:listOfFunctionTerms")))?;
        let mut default_term = BytesStart::new("qual:defaultTerm");
        default_term.push_attribute(("qual:resultLevel", "0"));
        w.write_event(Event::Empty(default_term))?;
        let mut function_term = BytesStart::new("qual:functionTerm");
        function_term.push_attribute(("qual:resultLevel", "1"));
        w.write_event(Event::Start(function_term))?;
        let mut math = BytesStart::new("math");
        math.push_attribute(("xmlns", ns::MATHML));
        w.write_event(Event::Start(math))?;
        write_expr(w, expr)?;
        w.write_event(Event::End(BytesEnd::new("math")))?;
        w.write_event(Event::End(BytesEnd::new("qual:functionTerm")))?;
        w.write_event(Event::End(BytesEnd::new("qual:listOfFunctionTerms")))?;

        write_notes(w, species)?;
        write_reaction_annotations(w, species)?;

        w.write_event(Event::End(BytesEnd::new("qual:transition")))?;
    }
    w.write_event(Event::End(BytesEnd::new("qual:listOfTransitions")))?;
    Ok(())
}

fn write_expr<W: Write>(w: &mut Writer<W>, expr: &Expr) -> ExportResult<()> {
    match expr {
        Expr::Eq { species, level } => {
            w.write_event(Event::Start(BytesStart::new("apply")))?;
            w.write_event(Event::Empty(BytesStart::new("eq")))?;
            w.write_event(Event::Start(BytesStart::new("ci")))?;
            w.write_event(Event::Text(BytesText::new(species)))?;
            w.write_event(Event::End(BytesEnd::new("ci")))?;
            let mut cn = BytesStart::new("cn");
            cn.push_attribute(("type", "integer"));
            w.write_event(Event::Start(cn))?;
            w.write_event(Event::Text(BytesText::new(&level.to_string())))?;
            w.write_event(Event::End(BytesEnd::new("cn")))?;
            w.write_event(Event::End(BytesEnd::new("apply")))?;
        }
        Expr::And(terms) => write_nary(w, "and", terms)?,
        Expr::Or(terms) => write_nary(w, "or", terms)?,
    }
    Ok(())
}

fn write_nary<W: Write>(w: &mut Writer<W>, op: &str, terms: &[Expr]) -> ExportResult<()> {
    w.write_event(Event::Start(BytesStart::new("apply")))?;
    w.write_event(Event::Empty(BytesStart::new(op)))?;
    for term in terms {
        write_expr(w, term)?;
    }
    w.write_event(Event::End(BytesEnd::new("apply")))?;
    Ok(())
}

fn write_notes<W: Write>(w: &mut Writer<W>, species: &casq_core::Species) -> ExportResult<()> {
    let snippets: Vec<&str> = species
        .reactions
        .iter()
        .filter_map(|r| r.notes.as_deref())
        .collect();
    if snippets.is_empty() {
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new("notes")))?;
    let mut html = BytesStart::new("html");
    html.push_attribute(("xmlns", ns::XHTML));
    w.write_event(Event::Start(html))?;
    w.write_event(Event::Start(BytesStart::new("head")))?;
    w.write_event(Event::Empty(BytesStart::new("title")))?;
    w.write_event(Event::End(BytesEnd::new("head")))?;
    w.write_event(Event::Start(BytesStart::new("body")))?;
    for snippet in snippets {
        // already well-formed XML, write through unchanged
        w.write_event(Event::Text(BytesText::from_escaped(snippet)))?;
    }
    w.write_event(Event::End(BytesEnd::new("body")))?;
    w.write_event(Event::End(BytesEnd::new("html")))?;
    w.write_event(Event::End(BytesEnd::new("notes")))?;
    Ok(())
}

/// The first description of every producing reaction's annotation, collected
/// under one RDF block.
fn write_reaction_annotations<W: Write>(
    w: &mut Writer<W>,
    species: &casq_core::Species,
) -> ExportResult<()> {
    let descriptions: Vec<&RdfDescription> = species
        .reactions
        .iter()
        .filter_map(|r| r.annotations.as_ref())
        .filter_map(|a| a.descriptions.first())
        .collect();
    if descriptions.is_empty() {
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new("annotation")))?;
    w.write_event(Event::Start(BytesStart::new("rdf:RDF")))?;
    for description in descriptions {
        write_description(w, description)?;
    }
    w.write_event(Event::End(BytesEnd::new("rdf:RDF")))?;
    w.write_event(Event::End(BytesEnd::new("annotation")))?;
    Ok(())
}

fn write_rdf<W: Write>(w: &mut Writer<W>, annotation: &RdfAnnotation) -> ExportResult<()> {
    w.write_event(Event::Start(BytesStart::new("rdf:RDF")))?;
    for description in &annotation.descriptions {
        write_description(w, description)?;
    }
    w.write_event(Event::End(BytesEnd::new("rdf:RDF")))?;
    Ok(())
}

fn write_description<W: Write>(w: &mut Writer<W>, description: &RdfDescription) -> ExportResult<()> {
    let mut tag = BytesStart::new("rdf:Description");
    tag.push_attribute(("rdf:about", description.about.as_str()));
    w.write_event(Event::Start(tag))?;
    for qualifier in &description.qualifiers {
        let name = match prefix_for(&qualifier.ns) {
            Some(prefix) => format!("{prefix}:{}", qualifier.local),
            None => qualifier.local.clone(),
        };
        let mut start = BytesStart::new(name.as_str());
        if prefix_for(&qualifier.ns).is_none() && !qualifier.ns.is_empty() {
            start.push_attribute(("xmlns", qualifier.ns.as_str()));
        }
        w.write_event(Event::Start(start))?;
        w.write_event(Event::Start(BytesStart::new("rdf:Bag")))?;
        for resource in &qualifier.resources {
            let mut li = BytesStart::new("rdf:li");
            li.push_attribute(("rdf:resource", resource.as_str()));
            w.write_event(Event::Empty(li))?;
        }
        w.write_event(Event::End(BytesEnd::new("rdf:Bag")))?;
        w.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    }
    w.write_event(Event::End(BytesEnd::new("rdf:Description")))?;
    Ok(())
}

fn prefix_for(ns_uri: &str) -> Option<&'static str> {
    match ns_uri {
        ns::BQBIOL => Some("bqbiol"),
        ns::BQMODEL => Some("bqmodel"),
        ns::RDF => Some("rdf"),
        _ => None,
    }
}

/// Adjust a display name: strip subscript markers, or mangle the name and
/// suffix the alias id for GinSim, which uses names as identifiers.
pub fn fix_name(name: &str, species: &str, ginsim_names: bool) -> String {
    if ginsim_names {
        let cleaned = name.replace(' ', "_").replace(',', "").replace('/', "_");
        format!("{cleaned}_{species}")
    } else {
        name.replace("_sub_", "").replace("_endsub_", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casq_core::{Activity, Bounds, Modifier, ModifierKind, Reaction, Species};

    fn species(name: &str) -> Species {
        Species {
            name: name.to_string(),
            class: "PROTEIN".to_string(),
            activity: Activity::Inactive,
            bounds: Bounds {
                x: "10".to_string(),
                y: "20".to_string(),
                w: "80".to_string(),
                h: "40".to_string(),
            },
            ref_species: format!("ref_{name}"),
            compartment: "c1".to_string(),
            modifications: Vec::new(),
            annotations: None,
            reactions: Vec::new(),
            function: name.to_string(),
        }
    }

    fn sample_model() -> LogicalModel {
        let mut model = LogicalModel::new("600", "400");
        model.insert("sa1", species("A"));
        let mut b = species("B");
        b.reactions.push(Reaction {
            reactants: vec!["sa1".to_string()],
            modifiers: vec![Modifier::new(ModifierKind::Inhibition, "sa3")],
            notes: Some("<p>note</p>".to_string()),
            ..Default::default()
        });
        model.insert("sa2", b);
        model.insert("sa3", species("C"));
        model
    }

    fn render(model: &mut LogicalModel, options: QualOptions) -> String {
        let mut out = Vec::new();
        write_qual(&mut out, model, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_document_skeleton() {
        let mut model = sample_model();
        let xml = render(&mut model, QualOptions::default());
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("qual:required=\"true\""));
        assert!(xml.contains("<compartment constant=\"true\" id=\"comp1\"/>"));
        assert!(xml.contains("<layout:dimensions width=\"600\" height=\"400\"/>"));
    }

    #[test]
    fn test_species_constant_flag_and_glyphs() {
        let mut model = sample_model();
        let xml = render(&mut model, QualOptions::default());
        assert!(xml.contains("qual:name=\"A\" qual:constant=\"true\" qual:id=\"sa1\""));
        assert!(xml.contains("qual:name=\"B\" qual:constant=\"false\" qual:id=\"sa2\""));
        assert!(xml.contains("layout:reference=\"sa1\" layout:id=\"sa1_glyph\""));
        assert!(xml.contains("<layout:position layout:x=\"10\" layout:y=\"20\"/>"));
    }

    #[test]
    fn test_transition_inputs_and_math() {
        let mut model = sample_model();
        let xml = render(&mut model, QualOptions::default());
        assert!(xml.contains("<qual:transition qual:id=\"tr_sa2\">"));
        assert!(xml.contains(
            "qual:qualitativeSpecies=\"sa1\" qual:transitionEffect=\"none\" \
             qual:sign=\"positive\" qual:id=\"tr_sa2_in_0\""
        ));
        assert!(xml.contains("qual:sign=\"negative\" qual:id=\"tr_sa2_in_1\""));
        assert!(xml.contains("<qual:defaultTerm qual:resultLevel=\"0\"/>"));
        assert!(xml.contains("<apply><and/><apply><eq/><ci>sa1</ci>"));
        assert!(xml.contains("<ci>sa3</ci><cn type=\"integer\">0</cn>"));
    }

    #[test]
    fn test_function_recorded_on_model() {
        let mut model = sample_model();
        render(&mut model, QualOptions::default());
        assert_eq!(model.get("sa2").unwrap().function, "A&!C");
        let annotation = model.get("sa2").unwrap().annotations.as_ref().unwrap();
        assert!(annotation.descriptions[0]
            .qualifiers
            .iter()
            .any(|q| q.resources.iter().any(|r| r == "urn:casq:function:A&!C")));
    }

    #[test]
    fn test_notes_passthrough() {
        let mut model = sample_model();
        let xml = render(&mut model, QualOptions::default());
        assert!(xml.contains("<body><p>note</p></body>"));
    }

    #[test]
    fn test_transition_without_known_inputs_is_dropped() {
        let mut model = LogicalModel::new("10", "10");
        let mut lonely = species("L");
        lonely.reactions.push(Reaction {
            reactants: vec!["sa99".to_string()],
            ..Default::default()
        });
        model.insert("sa1", lonely);
        let xml = render(&mut model, QualOptions::default());
        assert!(!xml.contains("<qual:transition"));
        // still marked non-constant, like the original
        assert!(xml.contains("qual:constant=\"false\""));
    }

    #[test]
    fn test_ginsim_names() {
        assert_eq!(fix_name("p53 active, nuclear", "sa1", true), "p53_active_nuclear_sa1");
        assert_eq!(fix_name("NF_sub_kB_endsub_", "sa1", false), "NFkB");
    }
}
