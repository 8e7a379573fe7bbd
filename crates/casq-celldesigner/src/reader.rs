//! Parsing of CellDesigner SBML Level 2 Version 4 files.

use casq_core::annotation::merge_annotations;
use casq_core::ns;
use casq_core::{Activity, Bounds, LogicalModel, Modifier, ModifierKind, Reaction, Species};
use casq_xml::Element;
use tracing::debug;

use crate::annotations::parse_rdf;
use crate::error::{ReadError, ReadResult};

/// Parse a CellDesigner document into a logical model.
pub fn read_celldesigner(text: &str) -> ReadResult<LogicalModel> {
    let root = Element::parse(text)?;
    if !root.is(Some(ns::SBML), "sbml") {
        return Err(ReadError::UnsupportedDocument);
    }
    let sbml_model = root
        .find(Some(ns::SBML), "model")
        .ok_or(ReadError::MissingModel)?;
    let extension = sbml_model
        .find(Some(ns::SBML), "annotation")
        .and_then(|annotation| annotation.find(Some(ns::CD), "extension"))
        .ok_or(ReadError::MissingModelDisplay)?;
    let display = extension
        .find(Some(ns::CD), "modelDisplay")
        .ok_or(ReadError::MissingModelDisplay)?;
    let mut model = LogicalModel::new(
        display.attr("sizeX").unwrap_or("0"),
        display.attr("sizeY").unwrap_or("0"),
    );
    collect_species(&mut model, sbml_model, extension);
    merge_included_species(&mut model, extension);
    collect_reactions(&mut model, sbml_model, extension);
    Ok(model)
}

/// Species aliases drawn inside a compartment, complexes first (their map
/// order drives the output order).
fn compartment_aliases<'a>(extension: &'a Element) -> Vec<&'a Element> {
    let mut aliases: Vec<&Element> = Vec::new();
    if let Some(list) = extension.find(Some(ns::CD), "listOfComplexSpeciesAliases") {
        aliases.extend(
            list.find_all(Some(ns::CD), "complexSpeciesAlias")
                .filter(|a| a.attr("compartmentAlias").is_some()),
        );
    }
    if let Some(list) = extension.find(Some(ns::CD), "listOfSpeciesAliases") {
        aliases.extend(
            list.find_all(Some(ns::CD), "speciesAlias")
                .filter(|a| a.attr("compartmentAlias").is_some()),
        );
    }
    aliases
}

fn collect_species(model: &mut LogicalModel, sbml_model: &Element, extension: &Element) {
    let species_list = sbml_model.find(Some(ns::SBML), "listOfSpecies");
    for alias in compartment_aliases(extension) {
        let Some(bounds) = alias.descendant(Some(ns::CD), "bounds") else {
            continue;
        };
        let Some(alias_id) = alias.attr("id") else {
            continue;
        };
        let Some(ref_species) = alias.attr("species") else {
            continue;
        };
        debug!(ref_species, "parsing species alias");
        let Some(sbml) = species_list.and_then(|l| {
            l.find_all(Some(ns::SBML), "species")
                .find(|s| s.attr("id") == Some(ref_species))
        }) else {
            continue;
        };
        let Some(annotation) = sbml.find(Some(ns::SBML), "annotation") else {
            continue;
        };
        let class = annotation
            .descendant(Some(ns::CD), "class")
            .map(|c| c.text())
            .unwrap_or_else(|| "PROTEIN".to_string());
        if class == "DEGRADED" {
            continue;
        }
        let activity = alias
            .descendant(Some(ns::CD), "activity")
            .map(|a| Activity::from_cd(&a.text()))
            .unwrap_or(Activity::Inactive);
        let modifications = annotation
            .descendant(Some(ns::CD), "listOfModifications")
            .map(|list| {
                list.find_all(Some(ns::CD), "modification")
                    .filter_map(|m| m.attr("state"))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let name = sbml.attr("name").unwrap_or("").to_string();
        model.insert(
            alias_id,
            Species {
                name: name.clone(),
                class,
                activity,
                bounds: Bounds {
                    x: bounds.attr("x").unwrap_or("0").to_string(),
                    y: bounds.attr("y").unwrap_or("0").to_string(),
                    w: bounds.attr("w").unwrap_or("0").to_string(),
                    h: bounds.attr("h").unwrap_or("0").to_string(),
                },
                ref_species: ref_species.to_string(),
                compartment: sbml.attr("compartment").unwrap_or("").to_string(),
                modifications,
                annotations: annotation.descendant(Some(ns::RDF), "RDF").and_then(parse_rdf),
                reactions: Vec::new(),
                function: name.clone(),
            },
        );
        model.record_name(&name, alias_id);
    }
}

/// Complex subcomponents never get their own alias on the map, but they may
/// carry annotations; those move to the enclosing complex.
fn merge_included_species(model: &mut LogicalModel, extension: &Element) {
    let Some(included) = extension.find(Some(ns::CD), "listOfIncludedSpecies") else {
        return;
    };
    for species in included.find_all(Some(ns::CD), "species") {
        let Some(rdf) = species
            .find(Some(ns::CD), "notes")
            .and_then(|notes| notes.descendant(Some(ns::RDF), "RDF"))
        else {
            continue;
        };
        let Some(id) = species.attr("id") else {
            continue;
        };
        let parent = decomplexify(id, extension, "species");
        let Some(annotation) = parse_rdf(rdf) else {
            continue;
        };
        if let Some(target) = model.get_mut(&parent) {
            merge_annotations(&mut target.annotations, &annotation);
        }
    }
}

/// Resolve an alias to the complex alias containing it, if any.
fn decomplexify(value: &str, extension: &Element, field: &str) -> String {
    extension
        .find(Some(ns::CD), "listOfSpeciesAliases")
        .and_then(|list| {
            list.find_all(Some(ns::CD), "speciesAlias")
                .find(|a| a.attr(field) == Some(value))
        })
        .and_then(|alias| alias.attr("complexSpeciesAlias"))
        .unwrap_or(value)
        .to_string()
}

fn collect_reactions(model: &mut LogicalModel, sbml_model: &Element, extension: &Element) {
    let Some(reactions) = sbml_model.find(Some(ns::SBML), "listOfReactions") else {
        return;
    };
    for reaction in reactions.find_all(Some(ns::SBML), "reaction") {
        debug!(id = reaction.attr("id").unwrap_or(""), "parsing reaction");
        let Some(annotation) = reaction.find(Some(ns::SBML), "annotation") else {
            continue;
        };
        let Some(cd) = annotation.find(Some(ns::CD), "extension") else {
            continue;
        };
        let kind = cd.find(Some(ns::CD), "reactionType").map(|t| t.text());
        let reactants: Vec<String> = cd
            .find(Some(ns::CD), "baseReactants")
            .map(|list| {
                list.find_all(Some(ns::CD), "baseReactant")
                    .filter_map(|r| r.attr("alias"))
                    .map(|alias| decomplexify(alias, extension, "id"))
                    .filter(|alias| model.contains(alias))
                    .collect()
            })
            .unwrap_or_default();
        let products: Vec<String> = cd
            .find(Some(ns::CD), "baseProducts")
            .map(|list| {
                list.find_all(Some(ns::CD), "baseProduct")
                    .filter_map(|p| p.attr("alias"))
                    .map(|alias| decomplexify(alias, extension, "id"))
                    .filter(|alias| model.contains(alias))
                    .collect()
            })
            .unwrap_or_default();
        let modifiers: Vec<Modifier> = cd
            .find(Some(ns::CD), "listOfModification")
            .map(|list| {
                list.find_all(Some(ns::CD), "modification")
                    .filter_map(|m| {
                        let kind = ModifierKind::from_cd(m.attr("type")?);
                        let aliases = decomplexify(m.attr("aliases")?, extension, "id");
                        Some(Modifier { kind, aliases })
                    })
                    .collect()
            })
            .unwrap_or_default();
        let notes = reaction
            .find(Some(ns::SBML), "notes")
            .and_then(|notes| notes.descendant(Some(ns::XHTML), "body"))
            .map(|body| format!("<p>{}</p>", body.inner_local_xml()));
        let parsed = Reaction {
            kind,
            reactants,
            modifiers,
            notes,
            annotations: annotation.find(Some(ns::RDF), "RDF").and_then(parse_rdf),
        };
        for product in &products {
            if let Some(species) = model.get_mut(product) {
                species.reactions.push(parsed.clone());
            }
        }
    }
}
