//! Boolean activation functions.
//!
//! The activation function of a species is an OR over all reactions producing
//! it. A reaction can activate its product when all its reactants are
//! present, no inhibitor is present, and at least one of its activators is
//! present. `BOOLEAN_LOGIC_GATE_AND` modifiers list aliases that are all
//! required, so they count as reactants.

use std::collections::HashMap;

use crate::graph::known_inputs;
use crate::model::{LogicalModel, ModifierKind, Reaction};

/// A Boolean formula over species, compared at a level.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The species equals the given level (1 = present, 0 = absent).
    Eq { species: String, level: u8 },
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    fn present(species: &str) -> Expr {
        Expr::Eq {
            species: species.to_string(),
            level: 1,
        }
    }

    fn absent(species: &str) -> Expr {
        Expr::Eq {
            species: species.to_string(),
            level: 0,
        }
    }

    /// Render as a GinSim formula over display names (`&`, `|`, `!`).
    pub fn to_ginsim(&self, model: &LogicalModel) -> String {
        match self {
            Expr::Eq { species, level } => {
                let name = model.display_name(species);
                if *level == 0 {
                    format!("!{name}")
                } else {
                    name.to_string()
                }
            }
            Expr::And(terms) => terms
                .iter()
                .map(|t| t.to_ginsim(model))
                .collect::<Vec<_>>()
                .join("&"),
            Expr::Or(terms) => terms
                .iter()
                .map(|t| t.to_ginsim(model))
                .collect::<Vec<_>>()
                .join("|"),
        }
    }
}

/// Build the activation function over the reactions producing one species.
/// `None` when no reaction involves a known species.
pub fn activation_function(reactions: &[Reaction], model: &LogicalModel) -> Option<Expr> {
    let mut alternatives: Vec<Expr> = Vec::new();
    for reaction in reactions {
        if let Some(term) = reaction_term(reaction, model) {
            alternatives.push(term);
        }
    }
    match alternatives.len() {
        0 => None,
        1 => alternatives.pop(),
        _ => Some(Expr::Or(alternatives)),
    }
}

fn reaction_term(reaction: &Reaction, model: &LogicalModel) -> Option<Expr> {
    let mut reactants: Vec<String> = reaction
        .reactants
        .iter()
        .filter(|r| model.contains(r))
        .cloned()
        .collect();
    // AND gate members are all required
    for modifier in &reaction.modifiers {
        if modifier.kind == ModifierKind::AndGate {
            reactants.extend(
                modifier
                    .alias_list()
                    .filter(|a| model.contains(a))
                    .map(str::to_string),
            );
        }
    }
    let activators: Vec<String> = reaction
        .modifiers
        .iter()
        .filter(|m| {
            !matches!(m.kind, ModifierKind::Inhibition | ModifierKind::AndGate)
                && model.contains(&m.aliases)
                && !reactants.contains(&m.aliases)
        })
        .map(|m| m.aliases.clone())
        .collect();
    let inhibitors: Vec<String> = reaction
        .modifiers
        .iter()
        .filter(|m| m.kind.is_strict_inhibition() && model.contains(&m.aliases))
        .map(|m| m.aliases.clone())
        .collect();

    let mut terms: Vec<Expr> = Vec::new();
    let mut reactants = reactants;
    if activators.len() >= 2 {
        terms.push(Expr::Or(
            activators.iter().map(|a| Expr::present(a)).collect(),
        ));
    } else {
        // a single activator behaves like a reactant
        reactants.extend(activators);
    }
    terms.extend(reactants.iter().map(|r| Expr::present(r)));
    terms.extend(inhibitors.iter().map(|i| Expr::absent(i)));

    match terms.len() {
        0 => None,
        1 => terms.pop(),
        _ => Some(Expr::And(terms)),
    }
}

/// Build functions for every species, store their GinSim rendering and the
/// `urn:casq:` annotations on the model, and return the expressions keyed by
/// alias id for the MathML writer.
///
/// Species whose reactions reference no known input get neither a function
/// nor the extra annotation: their transition is dropped by the writer.
pub fn build_functions(model: &mut LogicalModel) -> HashMap<String, Expr> {
    let ids: Vec<String> = model.ids().cloned().collect();
    let mut exprs: HashMap<String, Expr> = HashMap::new();
    let mut rendered: HashMap<String, String> = HashMap::new();
    let mut annotate: Vec<String> = Vec::new();

    for id in &ids {
        let Some(species) = model.get(id) else { continue };
        if species.reactions.is_empty() {
            annotate.push(id.clone());
            continue;
        }
        if known_inputs(&species.reactions, model).is_empty() {
            continue;
        }
        if let Some(expr) = activation_function(&species.reactions, model) {
            rendered.insert(id.clone(), expr.to_ginsim(model));
            exprs.insert(id.clone(), expr);
            annotate.push(id.clone());
        }
    }
    for id in annotate {
        if let Some(species) = model.get_mut(&id) {
            if let Some(function) = rendered.remove(&id) {
                species.function = function;
            }
            species.annotate_function();
        }
    }
    exprs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Activity, Bounds, Modifier, Species};

    fn model_with(names: &[(&str, &str)]) -> LogicalModel {
        let mut model = LogicalModel::new("600", "400");
        for (id, name) in names {
            model.insert(
                id,
                Species {
                    name: name.to_string(),
                    class: "PROTEIN".to_string(),
                    activity: Activity::Inactive,
                    bounds: Bounds::default(),
                    ref_species: format!("ref_{id}"),
                    compartment: "c1".to_string(),
                    modifications: Vec::new(),
                    annotations: None,
                    reactions: Vec::new(),
                    function: name.to_string(),
                },
            );
        }
        model
    }

    fn catalysis(alias: &str) -> Modifier {
        Modifier::new(ModifierKind::Other("CATALYSIS".to_string()), alias)
    }

    #[test]
    fn test_single_reactant_is_a_bare_equality() {
        let model = model_with(&[("sa1", "A")]);
        let reactions = vec![Reaction {
            reactants: vec!["sa1".to_string()],
            ..Default::default()
        }];
        let expr = activation_function(&reactions, &model).unwrap();
        assert_eq!(expr, Expr::present("sa1"));
        assert_eq!(expr.to_ginsim(&model), "A");
    }

    #[test]
    fn test_single_activator_behaves_like_a_reactant() {
        let model = model_with(&[("sa1", "A"), ("sa2", "B")]);
        let reactions = vec![Reaction {
            reactants: vec!["sa1".to_string()],
            modifiers: vec![catalysis("sa2")],
            ..Default::default()
        }];
        let expr = activation_function(&reactions, &model).unwrap();
        assert_eq!(expr, Expr::And(vec![Expr::present("sa1"), Expr::present("sa2")]));
        assert_eq!(expr.to_ginsim(&model), "A&B");
    }

    #[test]
    fn test_two_activators_are_ored_before_reactants() {
        let model = model_with(&[("sa1", "A"), ("sa2", "B"), ("sa3", "C")]);
        let reactions = vec![Reaction {
            reactants: vec!["sa3".to_string()],
            modifiers: vec![catalysis("sa1"), catalysis("sa2")],
            ..Default::default()
        }];
        let expr = activation_function(&reactions, &model).unwrap();
        assert_eq!(
            expr,
            Expr::And(vec![
                Expr::Or(vec![Expr::present("sa1"), Expr::present("sa2")]),
                Expr::present("sa3"),
            ])
        );
        assert_eq!(expr.to_ginsim(&model), "A|B&C");
    }

    #[test]
    fn test_inhibitor_is_negated() {
        let model = model_with(&[("sa1", "A"), ("sa2", "B")]);
        let reactions = vec![Reaction {
            reactants: vec!["sa1".to_string()],
            modifiers: vec![Modifier::new(ModifierKind::Inhibition, "sa2")],
            ..Default::default()
        }];
        let expr = activation_function(&reactions, &model).unwrap();
        assert_eq!(expr.to_ginsim(&model), "A&!B");
    }

    #[test]
    fn test_unknown_inhibition_counts_as_activator() {
        let model = model_with(&[("sa1", "A")]);
        let reactions = vec![Reaction {
            modifiers: vec![Modifier::new(ModifierKind::UnknownInhibition, "sa1")],
            ..Default::default()
        }];
        let expr = activation_function(&reactions, &model).unwrap();
        assert_eq!(expr, Expr::present("sa1"));
    }

    #[test]
    fn test_and_gate_members_are_required() {
        let model = model_with(&[("sa1", "A"), ("sa2", "B")]);
        let reactions = vec![Reaction {
            modifiers: vec![Modifier::new(ModifierKind::AndGate, "sa1,sa2")],
            ..Default::default()
        }];
        let expr = activation_function(&reactions, &model).unwrap();
        assert_eq!(expr.to_ginsim(&model), "A&B");
    }

    #[test]
    fn test_reactions_are_ored() {
        let model = model_with(&[("sa1", "A"), ("sa2", "B")]);
        let reactions = vec![
            Reaction {
                reactants: vec!["sa1".to_string()],
                ..Default::default()
            },
            Reaction {
                reactants: vec!["sa2".to_string()],
                ..Default::default()
            },
        ];
        let expr = activation_function(&reactions, &model).unwrap();
        assert_eq!(expr.to_ginsim(&model), "A|B");
    }

    #[test]
    fn test_unknown_species_are_filtered_out() {
        let model = model_with(&[("sa1", "A")]);
        let reactions = vec![Reaction {
            reactants: vec!["sa1".to_string(), "sa9".to_string()],
            modifiers: vec![catalysis("sa8")],
            ..Default::default()
        }];
        let expr = activation_function(&reactions, &model).unwrap();
        assert_eq!(expr, Expr::present("sa1"));
    }

    #[test]
    fn test_build_functions_annotates_and_renders() {
        let mut model = model_with(&[("sa1", "A"), ("sa2", "B")]);
        model.get_mut("sa2").unwrap().reactions.push(Reaction {
            reactants: vec!["sa1".to_string()],
            ..Default::default()
        });
        let exprs = build_functions(&mut model);
        assert!(exprs.contains_key("sa2"));
        assert_eq!(model.get("sa2").unwrap().function, "A");
        // constant species keep their name as function but are annotated too
        let constant = model.get("sa1").unwrap();
        assert_eq!(constant.function, "A");
        assert!(constant.annotations.is_some());
    }
}
