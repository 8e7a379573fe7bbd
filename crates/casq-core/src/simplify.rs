//! Model simplification around active/inactive species pairs.
//!
//! CellDesigner maps often draw a protein twice, as an inactive and an active
//! alias linked by an activation reaction. When the inactive alias is not
//! produced by anything and is only consumed by its own active alias, it is
//! redundant: it is removed and its annotations move to the active alias.

use tracing::debug;

use crate::annotation::merge_annotations;
use crate::model::LogicalModel;

/// Which species consumes an alias, if exactly one does.
enum Consumer {
    NoneYet,
    One(String),
    Several,
}

pub fn simplify(model: &mut LogicalModel) {
    let groups: Vec<(String, Vec<String>)> = model
        .by_name
        .iter()
        .filter(|(_, aliases)| aliases.len() > 1)
        .map(|(name, aliases)| (name.clone(), aliases.clone()))
        .collect();
    for (name, aliases) in groups {
        for alias in &aliases {
            if !model.contains(alias) {
                continue;
            }
            debug!(species = %alias, name = %name, "looking at multi-alias species");
            let consumer = find_consumer(model, alias);
            let removable = model
                .get(alias)
                .is_some_and(|sp| sp.reactions.is_empty());
            if let (true, Consumer::One(active)) = (removable, consumer) {
                if aliases.contains(&active) && active != *alias {
                    debug!(inactive = %alias, active = %active, "merging redundant alias");
                    if let Some(removed) = model.remove(alias) {
                        if let (Some(target), Some(rdf)) =
                            (model.get_mut(&active), removed.annotations.as_ref())
                        {
                            merge_annotations(&mut target.annotations, rdf);
                        }
                    }
                }
            }
        }
    }
}

fn find_consumer(model: &LogicalModel, alias: &str) -> Consumer {
    let mut consumer = Consumer::NoneYet;
    for (id, species) in model.iter() {
        for reaction in &species.reactions {
            let consumed = reaction.reactants.iter().any(|r| r == alias)
                || reaction
                    .modifiers
                    .iter()
                    .any(|m| m.alias_list().any(|a| a == alias));
            if consumed {
                consumer = match consumer {
                    Consumer::NoneYet => Consumer::One(id.clone()),
                    _ => Consumer::Several,
                };
            }
        }
        if matches!(consumer, Consumer::Several) {
            break;
        }
    }
    consumer
}
