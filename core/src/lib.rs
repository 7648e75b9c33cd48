//! Synthetic auto-insurance fraud-ring data and its property-graph projection.
//!
//! `synthesizer` generates a [`dataset::Dataset`]; `table` writes and reads
//! it as JSON Lines; `loader` projects the tables into a [`store::GraphStore`]
//! and `derived` infers shared-attribute edges between claimants.

pub mod archetype;
pub mod attribute_pool;
pub mod claim;
pub mod config;
pub mod counterparty;
pub mod dataset;
pub mod derived;
pub mod error;
pub mod graph;
pub mod loader;
pub mod model;
pub mod policy;
pub mod population;
pub mod relationship;
pub mod report;
pub mod rng;
pub mod store;
pub mod synthesizer;
pub mod table;
pub mod types;
pub mod witness;
