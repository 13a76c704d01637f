//! `skufam-families`: SKU affinity mining and family assignment engine.
//!
//! Pure engine crate: receives parsed transactions, returns families.
//! File handling and the command line live in `skufam-cli`.

pub mod anchors;
pub mod assign;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod graph;
pub mod model;
pub mod transactions;

pub use config::FamilyConfig;
pub use engine::run;
pub use error::FamilyError;
pub use graph::{build_affinity_graph, AffinityGraph};
pub use model::{Family, FamilyResult, FamilySet, Placement, Sku, Transaction};
