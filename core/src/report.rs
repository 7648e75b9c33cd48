//! Load reporting: per-entity row counts and the post-load graph census.

use crate::graph::CONSTRAINTS;
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

/// Rows attempted vs loaded for one entity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityLoad {
    pub entity: String,
    pub attempted: usize,
    pub loaded: usize,
    pub edges: usize,
    /// The source file was missing; nothing was attempted.
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub load_id: String,
    pub entities: Vec<EntityLoad>,
    pub shares_address: usize,
    pub shares_phone: usize,
}

impl LoadReport {
    pub fn entity(&self, name: &str) -> Option<&EntityLoad> {
        self.entities.iter().find(|e| e.entity == name)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.entities
            .iter()
            .filter(|e| e.skipped)
            .map(|e| e.entity.as_str())
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "load {}", self.load_id)?;
        for e in &self.entities {
            if e.skipped {
                writeln!(f, "  {:24} skipped (no source file)", e.entity)?;
            } else {
                writeln!(
                    f,
                    "  {:24} {:>7} attempted {:>7} loaded {:>7} edges",
                    e.entity, e.attempted, e.loaded, e.edges
                )?;
            }
        }
        writeln!(f, "  {:24} {:>7} new", "SHARES_ADDRESS", self.shares_address)?;
        write!(f, "  {:24} {:>7} new", "SHARES_PHONE", self.shares_phone)
    }
}

/// Census of the stored graph, for a manual sanity check after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub nodes_by_label: BTreeMap<String, usize>,
    pub edges_by_type: BTreeMap<String, usize>,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub ring_members: BTreeMap<String, usize>,
    pub claimants_sharing_address: usize,
    pub claimants_sharing_phone: usize,
    /// Repair shops with at least `BUSY_SHOP_CLAIMS` claims.
    pub busy_repair_shops: usize,
    pub max_claims_at_one_shop: usize,
    /// Nodes with no edge in either direction.
    pub orphan_nodes: usize,
}

pub const BUSY_SHOP_CLAIMS: usize = 5;

impl GraphSummary {
    pub fn node_count(&self, label: &str) -> usize {
        self.nodes_by_label.get(label).copied().unwrap_or(0)
    }

    pub fn edge_count(&self, rel_type: &str) -> usize {
        self.edges_by_type.get(rel_type).copied().unwrap_or(0)
    }

    /// Constrained labels with no node at all.
    pub fn missing_labels(&self) -> Vec<&'static str> {
        CONSTRAINTS
            .iter()
            .map(|(label, _)| *label)
            .filter(|label| self.node_count(label) == 0)
            .collect()
    }
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes: {}", self.total_nodes)?;
        for (label, n) in &self.nodes_by_label {
            writeln!(f, "  {label:20} {n:>7}")?;
        }
        writeln!(f, "edges: {}", self.total_edges)?;
        for (rel_type, n) in &self.edges_by_type {
            writeln!(f, "  {rel_type:20} {n:>7}")?;
        }
        writeln!(
            f,
            "fraud rings: {} ({} members)",
            self.ring_members.len(),
            self.ring_members.values().sum::<usize>()
        )?;
        for (ring, n) in &self.ring_members {
            writeln!(f, "  {ring:20} {n:>7}")?;
        }
        writeln!(f, "claimants sharing an address: {}", self.claimants_sharing_address)?;
        writeln!(f, "claimants sharing a phone:    {}", self.claimants_sharing_phone)?;
        writeln!(
            f,
            "repair shops with {}+ claims: {} (max {})",
            BUSY_SHOP_CLAIMS, self.busy_repair_shops, self.max_claims_at_one_shop
        )?;
        write!(f, "orphan nodes: {}", self.orphan_nodes)?;
        let missing = self.missing_labels();
        if !missing.is_empty() {
            write!(f, "\nmissing labels: {}", missing.join(", "))?;
        }
        Ok(())
    }
}
