//! Claim generation with ring targeting.
//!
//! Per claimant:
//!   1. Bernoulli trial on the claim rate (fraud rate for ring members).
//!   2. Uniform policy choice among the claimant's policies, then its vehicle.
//!   3. Uniform claim type; amount uniform in the type's range, or in
//!      [low·max, high·max] for ring members.
//!   4. Counterparties from the ring's archetype (see archetype.rs).
//!
//! A claimant that cannot produce a consistent claim (no policy, no
//! vehicle, no eligible repair shop) is skipped and logged; the run goes on.

use crate::{
    archetype::{route, CounterpartyPools, RingArchetype},
    attribute_pool::AttributePool,
    config::GeneratorConfig,
    error::NetResult,
    model::{Claim, ClaimStatus, Claimant, Policy, Validate, Vehicle, Weather},
    rng::StageRng,
    types::round_cents,
};
use chrono::Duration;
use std::collections::BTreeMap;

pub const INCIDENT_WINDOW_DAYS: (i64, i64) = (1, 180);
pub const FILING_DELAY_DAYS: (i64, i64) = (1, 7);

pub struct ClaimGenerator<'a> {
    config: &'a GeneratorConfig,
    pools: &'a CounterpartyPools,
    policies_by_claimant: BTreeMap<&'a str, Vec<&'a Policy>>,
    vehicle_by_policy: BTreeMap<&'a str, &'a Vehicle>,
}

impl<'a> ClaimGenerator<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        pools: &'a CounterpartyPools,
        policies: &'a [Policy],
        vehicles: &'a [Vehicle],
    ) -> Self {
        let mut policies_by_claimant: BTreeMap<&str, Vec<&Policy>> = BTreeMap::new();
        for p in policies {
            policies_by_claimant
                .entry(p.claimant_id.as_str())
                .or_default()
                .push(p);
        }
        let vehicle_by_policy = vehicles.iter().map(|v| (v.policy_id.as_str(), v)).collect();
        Self {
            config,
            pools,
            policies_by_claimant,
            vehicle_by_policy,
        }
    }

    pub fn generate(&self, claimants: &[Claimant], rng: &mut StageRng) -> NetResult<Vec<Claim>> {
        let mut claims = Vec::new();
        for claimant in claimants {
            let rate = if claimant.is_fraud_ring {
                self.config.fraud_claim_rate
            } else {
                self.config.claim_rate
            };
            if !rng.chance(rate) {
                continue;
            }
            if let Some(claim) = self.claim_for(claimant, claims.len(), rng)? {
                claims.push(claim);
            }
        }
        Ok(claims)
    }

    fn claim_for(
        &self,
        claimant: &Claimant,
        counter: usize,
        rng: &mut StageRng,
    ) -> NetResult<Option<Claim>> {
        let id = claimant.claimant_id.as_str();
        let Some(policies) = self.policies_by_claimant.get(id) else {
            log::debug!("stage=claim claimant={id} has no policy, no claim filed");
            return Ok(None);
        };
        let Some(policy) = rng.pick(policies).copied() else {
            return Ok(None);
        };
        let Some(vehicle) = self.vehicle_by_policy.get(policy.policy_id.as_str()).copied() else {
            log::warn!("stage=claim policy={} has no vehicle, claim skipped", policy.policy_id);
            return Ok(None);
        };
        let Some(range) = rng.pick(&self.config.claim_types) else {
            return Ok(None);
        };

        let claim_amount = if claimant.is_fraud_ring {
            let skew = &self.config.ring_amount_skew;
            rng.uniform(range.max * skew.low, range.max * skew.high)
        } else {
            rng.uniform(range.min, range.max)
        };

        let incident_date = AttributePool::days_before(
            rng,
            self.config.reference_date,
            INCIDENT_WINDOW_DAYS.0,
            INCIDENT_WINDOW_DAYS.1,
        );
        let claim_date = incident_date
            + Duration::days(rng.range_inclusive(FILING_DELAY_DAYS.0, FILING_DELAY_DAYS.1));

        let archetype = self.archetype_for(claimant);
        let routing = route(archetype.as_ref(), self.pools, &self.config.routing, rng);
        let Some(repair_shop_id) = routing.repair_shop_id else {
            log::warn!("stage=claim claimant={id} has no eligible repair shop, claim skipped");
            return Ok(None);
        };

        let claim = Claim {
            claim_id: format!("CLAIM_{counter}"),
            claim_number: format!("CN{}", rng.digits(10)),
            claimant_id: claimant.claimant_id.clone(),
            policy_id: policy.policy_id.clone(),
            vehicle_id: vehicle.vehicle_id.clone(),
            claim_date,
            incident_date,
            claim_amount: round_cents(claim_amount),
            claim_type: range.claim_type,
            status: *rng.pick(ClaimStatus::ALL).unwrap_or(&ClaimStatus::Open),
            description: format!(
                "{} incident involving {} {}",
                range.claim_type, vehicle.make, vehicle.model
            ),
            location: AttributePool::city(rng).into(),
            weather_condition: *rng.pick(Weather::ALL).unwrap_or(&Weather::Clear),
            repair_shop_id,
            medical_provider_id: routing.medical_provider_id,
            lawyer_id: routing.lawyer_id,
            is_fraud_ring: claimant.is_fraud_ring,
            fraud_ring_id: claimant.fraud_ring_id.clone(),
        };
        claim.validated().map(Some)
    }

    fn archetype_for(&self, claimant: &Claimant) -> Option<RingArchetype> {
        let ring_id = claimant.fraud_ring_id.as_deref()?;
        match self.config.ring(ring_id) {
            Some(ring) => Some(ring.archetype.clone()),
            None => {
                log::warn!("stage=claim ring={ring_id} has no configured archetype, using diffuse");
                Some(RingArchetype::Diffuse)
            }
        }
    }
}
