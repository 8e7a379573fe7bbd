//! Influence graph over the model's species.
//!
//! Replaces the networkx dependency of the historical tool: the only graph
//! operation the conversion needs is undirected connected components, used to
//! drop isolated fragments of the map.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::model::{LogicalModel, Reaction};

/// Sign of an influence, as written on SBML-qual inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn as_str(self) -> &'static str {
        match self {
            Sign::Positive => "positive",
            Sign::Negative => "negative",
        }
    }
}

/// Signed inputs of a species: every known reactant and modifier of its
/// reactions, deduplicated by (alias, sign), in first-occurrence order.
/// Reactants are positive; only plain inhibitions are negative.
pub fn known_inputs(reactions: &[Reaction], model: &LogicalModel) -> Vec<(String, Sign)> {
    let mut inputs: Vec<(String, Sign)> = Vec::new();
    let mut seen: HashSet<(String, Sign)> = HashSet::new();
    let mut push = |alias: &str, sign: Sign, inputs: &mut Vec<(String, Sign)>| {
        if model.contains(alias) && seen.insert((alias.to_string(), sign)) {
            inputs.push((alias.to_string(), sign));
        }
    };
    for reaction in reactions {
        for reactant in &reaction.reactants {
            push(reactant, Sign::Positive, &mut inputs);
        }
        for modifier in &reaction.modifiers {
            let sign = if modifier.kind.is_strict_inhibition() {
                Sign::Negative
            } else {
                Sign::Positive
            };
            // gates keep their comma-joined alias list and never match a
            // known species here, exactly like the qual input list
            push(&modifier.aliases, sign, &mut inputs);
        }
    }
    inputs
}

/// Undirected graph between species and their inputs.
#[derive(Debug, Default)]
pub struct InfluenceGraph {
    order: Vec<String>,
    adjacency: HashMap<String, HashSet<String>>,
}

impl InfluenceGraph {
    /// One node per species with at least one producing reaction, one edge
    /// per known input.
    pub fn from_model(model: &LogicalModel) -> Self {
        let mut graph = InfluenceGraph::default();
        for (id, species) in model.iter() {
            if species.reactions.is_empty() {
                continue;
            }
            graph.add_node(id);
            for (input, _sign) in known_inputs(&species.reactions, model) {
                graph.add_edge(id, &input);
            }
        }
        graph
    }

    pub fn add_node(&mut self, id: &str) {
        if !self.adjacency.contains_key(id) {
            self.adjacency.insert(id.to_string(), HashSet::new());
            self.order.push(id.to_string());
        }
    }

    pub fn add_edge(&mut self, a: &str, b: &str) {
        self.add_node(a);
        self.add_node(b);
        if let Some(neighbors) = self.adjacency.get_mut(a) {
            neighbors.insert(b.to_string());
        }
        if let Some(neighbors) = self.adjacency.get_mut(b) {
            neighbors.insert(a.to_string());
        }
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Connected components, each in traversal order, components ordered by
    /// their first node.
    pub fn connected_components(&self) -> Vec<Vec<String>> {
        let mut components = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        for start in &self.order {
            if visited.contains(start.as_str()) {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = VecDeque::from([start.as_str()]);
            visited.insert(start);
            while let Some(node) = queue.pop_front() {
                component.push(node.to_string());
                if let Some(neighbors) = self.adjacency.get(node) {
                    let mut next: Vec<&str> = neighbors
                        .iter()
                        .map(String::as_str)
                        .filter(|n| !visited.contains(*n))
                        .collect();
                    next.sort_unstable();
                    for neighbor in next {
                        visited.insert(neighbor);
                        queue.push_back(neighbor);
                    }
                }
            }
            components.push(component);
        }
        components
    }
}

/// Delete every connected component of size at most `threshold` from the
/// model. A negative threshold keeps only the largest component(s). Returns
/// the removed alias ids.
pub fn remove_small_components(model: &mut LogicalModel, threshold: i64) -> Vec<String> {
    let graph = InfluenceGraph::from_model(model);
    let components = graph.connected_components();
    let largest = components.iter().map(Vec::len).max().unwrap_or(0);
    let threshold = if threshold < 0 {
        largest.saturating_sub(1)
    } else {
        threshold as usize
    };
    let mut removed = Vec::new();
    for component in components {
        if component.len() > threshold {
            continue;
        }
        debug!(size = component.len(), "removing connected component");
        for id in component {
            debug!(species = %id, "removing species");
            model.remove(&id);
            removed.push(id);
        }
    }
    removed
}
