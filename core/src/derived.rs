//! Derived-edge inference: claimants that share an address or a phone.
//!
//! RULE: Each unordered pair of distinct claimants with an equal, non-empty
//! attribute yields exactly one pair, ordered so the smaller claimant id
//! comes first. Both strategies produce the same pair set.
//!
//! The store only creates edges that do not exist yet, so inferring again
//! over an unchanged graph creates nothing.

use crate::{
    config::InferenceStrategy,
    error::NetResult,
    graph::rel,
    store::{ClaimantContact, GraphStore},
    types::EntityId,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedAttribute {
    Address,
    Phone,
}

impl SharedAttribute {
    pub const ALL: [SharedAttribute; 2] = [SharedAttribute::Address, SharedAttribute::Phone];

    pub fn rel_type(&self) -> &'static str {
        match self {
            Self::Address => rel::SHARES_ADDRESS,
            Self::Phone => rel::SHARES_PHONE,
        }
    }

    fn of<'a>(&self, contact: &'a ClaimantContact) -> &'a str {
        match self {
            Self::Address => &contact.address,
            Self::Phone => &contact.phone,
        }
    }
}

/// New edges created per attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceOutcome {
    pub shares_address: usize,
    pub shares_phone: usize,
}

/// All claimant pairs sharing `attribute`, smaller id first, sorted.
pub fn infer_pairs(
    contacts: &[ClaimantContact],
    attribute: SharedAttribute,
    strategy: InferenceStrategy,
) -> Vec<(EntityId, EntityId)> {
    let mut pairs = match strategy {
        InferenceStrategy::AllPairs => all_pairs(contacts, attribute),
        InferenceStrategy::GroupBy => grouped_pairs(contacts, attribute),
    };
    pairs.sort();
    pairs.dedup();
    pairs
}

fn all_pairs(contacts: &[ClaimantContact], attribute: SharedAttribute) -> Vec<(EntityId, EntityId)> {
    let mut pairs = Vec::new();
    for (i, a) in contacts.iter().enumerate() {
        let value = attribute.of(a);
        if value.is_empty() {
            continue;
        }
        for b in &contacts[i + 1..] {
            if a.claimant_id != b.claimant_id && attribute.of(b) == value {
                pairs.push(ordered(&a.claimant_id, &b.claimant_id));
            }
        }
    }
    pairs
}

fn grouped_pairs(
    contacts: &[ClaimantContact],
    attribute: SharedAttribute,
) -> Vec<(EntityId, EntityId)> {
    let mut buckets: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for c in contacts {
        let value = attribute.of(c);
        if !value.is_empty() {
            buckets.entry(value).or_default().push(&c.claimant_id);
        }
    }

    let mut pairs = Vec::new();
    for members in buckets.values_mut().filter(|m| m.len() > 1) {
        members.sort_unstable();
        members.dedup();
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                pairs.push(((*a).to_string(), (*b).to_string()));
            }
        }
    }
    pairs
}

fn ordered(a: &str, b: &str) -> (EntityId, EntityId) {
    if a < b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Infer and merge both derived edge types over every stored claimant.
///
/// Must run after all claimant nodes are loaded.
pub fn infer_shared_attributes(
    store: &mut GraphStore,
    strategy: InferenceStrategy,
) -> NetResult<InferenceOutcome> {
    let contacts = store.claimant_contacts()?;
    let mut outcome = InferenceOutcome::default();
    for attribute in SharedAttribute::ALL {
        let pairs = infer_pairs(&contacts, attribute, strategy);
        let created = store.merge_derived_edges(attribute.rel_type(), &pairs)?;
        log::info!(
            "derived {}: claimants={} pairs={} created={}",
            attribute.rel_type(),
            contacts.len(),
            pairs.len(),
            created
        );
        match attribute {
            SharedAttribute::Address => outcome.shares_address = created,
            SharedAttribute::Phone => outcome.shares_phone = created,
        }
    }
    Ok(outcome)
}
