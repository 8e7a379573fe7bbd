//! Core logical-model types and semantics for CaSQ.
//!
//! This crate contains:
//! - The logical model container and species/reaction records
//! - MIRIAM RDF annotation records and merging
//! - Boolean activation functions and their GinSim rendering
//! - The influence graph and connected-component pruning
//! - Active/inactive alias simplification

pub mod annotation;
pub mod graph;
pub mod logic;
pub mod model;
pub mod ns;
pub mod simplify;

pub use annotation::{RdfAnnotation, RdfDescription, RdfQualifier};
pub use graph::{remove_small_components, InfluenceGraph, Sign};
pub use logic::{build_functions, Expr};
pub use model::{Activity, Bounds, LogicalModel, Modifier, ModifierKind, Reaction, Species};
pub use simplify::simplify;
