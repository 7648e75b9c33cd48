//! Intra-ring association edges (family / associate / friend).

use crate::{
    error::NetResult,
    model::{Claimant, ClaimantRelationship, RelationshipType, Validate},
    rng::StageRng,
};
use std::collections::BTreeSet;

/// Seed `floor(n/2)` relationships among the members of `ring_id`.
///
/// Each draw picks two distinct members independently of earlier draws,
/// so the same unordered pair can come up twice. With `dedup` set, a
/// repeated pair is dropped instead of emitted again.
pub fn seed_relationships(
    members: &[Claimant],
    ring_id: &str,
    dedup: bool,
    rng: &mut StageRng,
) -> NetResult<Vec<ClaimantRelationship>> {
    let ring: Vec<&Claimant> = members
        .iter()
        .filter(|c| c.fraud_ring_id.as_deref() == Some(ring_id))
        .collect();
    if ring.len() < 2 {
        return Ok(Vec::new());
    }

    let mut seen = BTreeSet::new();
    let mut relationships = Vec::with_capacity(ring.len() / 2);
    for _ in 0..ring.len() / 2 {
        let (a, b) = rng.distinct_pair(ring.len());
        let relationship_type = *rng
            .pick(RelationshipType::ALL)
            .unwrap_or(&RelationshipType::Associate);

        if dedup && !seen.insert((a.min(b), a.max(b))) {
            log::debug!("stage=relationship ring={ring_id} dropped repeated pair");
            continue;
        }

        let relationship = ClaimantRelationship {
            from_claimant: ring[a].claimant_id.clone(),
            to_claimant: ring[b].claimant_id.clone(),
            relationship_type,
            ring_id: ring_id.to_string(),
        };
        relationships.push(relationship.validated()?);
    }
    Ok(relationships)
}
