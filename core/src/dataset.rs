//! The generated tables as one unit, with its summary record and
//! referential checks.

use crate::{
    error::{FraudNetError, NetResult},
    model::{
        Claim, ClaimWitness, Claimant, ClaimantRelationship, Lawyer, MedicalProvider, Policy,
        RepairShop, Vehicle, Witness,
    },
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub claimants: Vec<Claimant>,
    pub policies: Vec<Policy>,
    pub vehicles: Vec<Vehicle>,
    pub repair_shops: Vec<RepairShop>,
    pub medical_providers: Vec<MedicalProvider>,
    pub lawyers: Vec<Lawyer>,
    pub claims: Vec<Claim>,
    pub witnesses: Vec<Witness>,
    pub claim_witnesses: Vec<ClaimWitness>,
    pub claimant_relationships: Vec<ClaimantRelationship>,
    /// Claims without any witness attached. Not persisted as a table.
    pub unwitnessed_claims: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub total_claimants: usize,
    pub fraud_ring_claimants: usize,
    pub total_claims: usize,
    pub fraud_ring_claims: usize,
    pub total_policies: usize,
    pub total_vehicles: usize,
    pub num_fraud_rings: usize,
    pub repair_shops: usize,
    pub medical_providers: usize,
    pub lawyers: usize,
    pub witnesses: usize,
    pub unwitnessed_claims: usize,
}

impl Dataset {
    pub fn summary(&self) -> GenerationSummary {
        let rings: BTreeSet<&str> = self
            .claimants
            .iter()
            .filter_map(|c| c.fraud_ring_id.as_deref())
            .collect();
        GenerationSummary {
            total_claimants: self.claimants.len(),
            fraud_ring_claimants: self.claimants.iter().filter(|c| c.is_fraud_ring).count(),
            total_claims: self.claims.len(),
            fraud_ring_claims: self.claims.iter().filter(|c| c.is_fraud_ring).count(),
            total_policies: self.policies.len(),
            total_vehicles: self.vehicles.len(),
            num_fraud_rings: rings.len(),
            repair_shops: self.repair_shops.len(),
            medical_providers: self.medical_providers.len(),
            lawyers: self.lawyers.len(),
            witnesses: self.witnesses.len(),
            unwitnessed_claims: self.unwitnessed_claims,
        }
    }

    /// Members per ring id, in ring id order.
    pub fn ring_sizes(&self) -> BTreeMap<&str, usize> {
        let mut sizes = BTreeMap::new();
        for ring in self.claimants.iter().filter_map(|c| c.fraud_ring_id.as_deref()) {
            *sizes.entry(ring).or_insert(0) += 1;
        }
        sizes
    }

    /// Verify ids are unique per table and every reference resolves to a
    /// row with matching ownership.
    pub fn check_integrity(&self) -> NetResult<()> {
        let claimants = unique("claimant", self.claimants.iter().map(|c| c.claimant_id.as_str()))?;
        let policies: BTreeMap<&str, &Policy> =
            self.policies.iter().map(|p| (p.policy_id.as_str(), p)).collect();
        unique("policy", self.policies.iter().map(|p| p.policy_id.as_str()))?;
        let vehicles: BTreeMap<&str, &Vehicle> =
            self.vehicles.iter().map(|v| (v.vehicle_id.as_str(), v)).collect();
        unique("vehicle", self.vehicles.iter().map(|v| v.vehicle_id.as_str()))?;
        let shops = unique("repair_shop", self.repair_shops.iter().map(|s| s.shop_id.as_str()))?;
        let providers = unique(
            "medical_provider",
            self.medical_providers.iter().map(|m| m.provider_id.as_str()),
        )?;
        let lawyers = unique("lawyer", self.lawyers.iter().map(|l| l.lawyer_id.as_str()))?;
        let claims = unique("claim", self.claims.iter().map(|c| c.claim_id.as_str()))?;
        let witnesses = unique("witness", self.witnesses.iter().map(|w| w.witness_id.as_str()))?;

        for p in &self.policies {
            resolve("policy", &p.policy_id, "claimant", &p.claimant_id, &claimants)?;
        }
        let mut vehicles_per_policy: BTreeMap<&str, usize> = BTreeMap::new();
        for v in &self.vehicles {
            if !policies.contains_key(v.policy_id.as_str()) {
                return dangling("vehicle", &v.vehicle_id, "policy", &v.policy_id);
            }
            *vehicles_per_policy.entry(v.policy_id.as_str()).or_insert(0) += 1;
        }
        if let Some((policy, n)) = vehicles_per_policy.iter().find(|(_, n)| **n != 1) {
            return Err(invalid("policy", policy, format!("has {n} vehicles")));
        }
        if let Some(p) = self
            .policies
            .iter()
            .find(|p| !vehicles_per_policy.contains_key(p.policy_id.as_str()))
        {
            return Err(invalid("policy", &p.policy_id, "has no vehicle".into()));
        }

        let claimant_rows: BTreeMap<&str, &Claimant> =
            self.claimants.iter().map(|c| (c.claimant_id.as_str(), c)).collect();
        for c in &self.claims {
            let Some(owner) = claimant_rows.get(c.claimant_id.as_str()) else {
                return dangling("claim", &c.claim_id, "claimant", &c.claimant_id);
            };
            let Some(policy) = policies.get(c.policy_id.as_str()) else {
                return dangling("claim", &c.claim_id, "policy", &c.policy_id);
            };
            let Some(vehicle) = vehicles.get(c.vehicle_id.as_str()) else {
                return dangling("claim", &c.claim_id, "vehicle", &c.vehicle_id);
            };
            if policy.claimant_id != c.claimant_id {
                return Err(invalid("claim", &c.claim_id, "policy belongs to another claimant".into()));
            }
            if vehicle.policy_id != c.policy_id {
                return Err(invalid("claim", &c.claim_id, "vehicle is not on the claim's policy".into()));
            }
            if owner.fraud_ring_id != c.fraud_ring_id || owner.is_fraud_ring != c.is_fraud_ring {
                return Err(invalid("claim", &c.claim_id, "ring fields differ from claimant".into()));
            }
            resolve("claim", &c.claim_id, "repair_shop", &c.repair_shop_id, &shops)?;
            if let Some(m) = &c.medical_provider_id {
                resolve("claim", &c.claim_id, "medical_provider", m, &providers)?;
            }
            if let Some(l) = &c.lawyer_id {
                resolve("claim", &c.claim_id, "lawyer", l, &lawyers)?;
            }
        }

        for cw in &self.claim_witnesses {
            resolve("claim_witness", &cw.claim_id, "claim", &cw.claim_id, &claims)?;
            resolve("claim_witness", &cw.claim_id, "witness", &cw.witness_id, &witnesses)?;
        }
        for r in &self.claimant_relationships {
            for endpoint in [&r.from_claimant, &r.to_claimant] {
                let Some(member) = claimant_rows.get(endpoint.as_str()) else {
                    return dangling("claimant_relationship", &r.ring_id, "claimant", endpoint);
                };
                if member.fraud_ring_id.as_deref() != Some(r.ring_id.as_str()) {
                    return Err(invalid(
                        "claimant_relationship",
                        &r.ring_id,
                        format!("{endpoint} is not a member of the ring"),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn unique<'a>(
    entity: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> NetResult<BTreeSet<&'a str>> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(invalid(entity, id, "duplicate id".into()));
        }
    }
    Ok(seen)
}

fn resolve(
    entity: &'static str,
    id: &str,
    target: &str,
    target_id: &str,
    known: &BTreeSet<&str>,
) -> NetResult<()> {
    if known.contains(target_id) {
        Ok(())
    } else {
        dangling(entity, id, target, target_id)
    }
}

fn dangling(entity: &'static str, id: &str, target: &str, target_id: &str) -> NetResult<()> {
    Err(invalid(entity, id, format!("references missing {target} {target_id}")))
}

fn invalid(entity: &'static str, id: &str, reason: String) -> FraudNetError {
    FraudNetError::InvalidRecord {
        entity,
        id: id.to_string(),
        reason,
    }
}
