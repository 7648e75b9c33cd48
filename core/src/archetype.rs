//! Ring archetypes: how a fraud ring routes its claims to counterparties.
//!
//! A ring id maps to exactly one archetype through the ring configuration.
//! Claim generation asks the archetype for a routing decision and never
//! inspects ring id strings itself, so a new archetype only needs a new
//! variant here and a branch in `route`.

use crate::{
    config::RoutingConfig,
    rng::StageRng,
    types::EntityId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RingArchetype {
    /// Every claim is repaired at one hub shop.
    HubShop { shop_id: EntityId },
    /// Every claim is treated by one hub provider.
    HubProvider { provider_id: EntityId },
    /// Claims spread across the fraud-flagged counterparty pools.
    Diffuse,
}

impl RingArchetype {
    pub fn name(&self) -> &'static str {
        match self {
            Self::HubShop { .. } => "hub_shop",
            Self::HubProvider { .. } => "hub_provider",
            Self::Diffuse => "diffuse",
        }
    }
}

/// Counterparty ids split by fraud involvement.
#[derive(Debug, Clone, Default)]
pub struct CounterpartyPools {
    pub fraud_shops: Vec<EntityId>,
    pub legit_shops: Vec<EntityId>,
    pub fraud_providers: Vec<EntityId>,
    pub legit_providers: Vec<EntityId>,
    pub fraud_lawyers: Vec<EntityId>,
    pub legit_lawyers: Vec<EntityId>,
}

/// Where a claim goes. The shop is mandatory; None means the candidate
/// pool for it was empty and the claim must be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routing {
    pub repair_shop_id: Option<EntityId>,
    pub medical_provider_id: Option<EntityId>,
    pub lawyer_id: Option<EntityId>,
}

/// Decide counterparties for one claim.
///
/// `archetype` is None for legitimate claimants.
pub fn route(
    archetype: Option<&RingArchetype>,
    pools: &CounterpartyPools,
    p: &RoutingConfig,
    rng: &mut StageRng,
) -> Routing {
    match archetype {
        Some(RingArchetype::HubShop { shop_id }) => Routing {
            repair_shop_id: Some(shop_id.clone()),
            medical_provider_id: either(
                rng,
                p.hub_shop_fraud_provider,
                &pools.fraud_providers,
                &pools.legit_providers,
            ),
            lawyer_id: rng.pick(&pools.legit_lawyers).cloned(),
        },
        Some(RingArchetype::HubProvider { provider_id }) => Routing {
            repair_shop_id: rng.pick(&pools.legit_shops).cloned(),
            medical_provider_id: Some(provider_id.clone()),
            lawyer_id: maybe(rng, p.hub_provider_fraud_lawyer, &pools.fraud_lawyers),
        },
        Some(RingArchetype::Diffuse) => Routing {
            repair_shop_id: either(rng, p.diffuse_fraud_shop, &pools.fraud_shops, &pools.legit_shops),
            medical_provider_id: either(
                rng,
                p.diffuse_fraud_provider,
                &pools.fraud_providers,
                &pools.legit_providers,
            ),
            lawyer_id: either(rng, p.diffuse_fraud_lawyer, &pools.fraud_lawyers, &pools.legit_lawyers),
        },
        None => Routing {
            repair_shop_id: rng.pick(&pools.legit_shops).cloned(),
            medical_provider_id: maybe(rng, p.legit_provider, &pools.legit_providers),
            lawyer_id: maybe(rng, p.legit_lawyer, &pools.legit_lawyers),
        },
    }
}

/// With probability `p` pick from `preferred`, else from `fallback`.
fn either(
    rng: &mut StageRng,
    p: f64,
    preferred: &[EntityId],
    fallback: &[EntityId],
) -> Option<EntityId> {
    if rng.chance(p) {
        rng.pick(preferred).cloned()
    } else {
        rng.pick(fallback).cloned()
    }
}

/// With probability `p` pick from `pool`, else nothing.
fn maybe(rng: &mut StageRng, p: f64, pool: &[EntityId]) -> Option<EntityId> {
    if rng.chance(p) {
        rng.pick(pool).cloned()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StageSlot};

    fn pools() -> CounterpartyPools {
        CounterpartyPools {
            fraud_shops: vec!["SHOP_0".into(), "SHOP_1".into()],
            legit_shops: vec!["SHOP_2".into(), "SHOP_3".into()],
            fraud_providers: vec!["MED_0".into()],
            legit_providers: vec!["MED_1".into(), "MED_2".into()],
            fraud_lawyers: vec!["LAW_0".into()],
            legit_lawyers: vec!["LAW_1".into()],
        }
    }

    #[test]
    fn hub_shop_always_routes_to_hub() {
        let mut rng = RngBank::new(11).for_stage(StageSlot::Claim);
        let hub = RingArchetype::HubShop { shop_id: "SHOP_1".into() };
        for _ in 0..200 {
            let r = route(Some(&hub), &pools(), &RoutingConfig::default(), &mut rng);
            assert_eq!(r.repair_shop_id.as_deref(), Some("SHOP_1"));
            assert_eq!(r.lawyer_id.as_deref(), Some("LAW_1"));
        }
    }

    #[test]
    fn hub_provider_uses_legit_shops_only() {
        let mut rng = RngBank::new(12).for_stage(StageSlot::Claim);
        let hub = RingArchetype::HubProvider { provider_id: "MED_0".into() };
        for _ in 0..200 {
            let r = route(Some(&hub), &pools(), &RoutingConfig::default(), &mut rng);
            assert_eq!(r.medical_provider_id.as_deref(), Some("MED_0"));
            let shop = r.repair_shop_id.unwrap();
            assert!(shop == "SHOP_2" || shop == "SHOP_3", "unexpected shop {shop}");
            assert!(r.lawyer_id.is_none() || r.lawyer_id.as_deref() == Some("LAW_0"));
        }
    }

    #[test]
    fn legitimate_claims_never_touch_fraud_pools() {
        let mut rng = RngBank::new(13).for_stage(StageSlot::Claim);
        let p = pools();
        for _ in 0..500 {
            let r = route(None, &p, &RoutingConfig::default(), &mut rng);
            assert!(p.legit_shops.contains(r.repair_shop_id.as_ref().unwrap()));
            if let Some(m) = &r.medical_provider_id {
                assert!(p.legit_providers.contains(m));
            }
            if let Some(l) = &r.lawyer_id {
                assert!(p.legit_lawyers.contains(l));
            }
        }
    }

    #[test]
    fn empty_shop_pool_yields_no_shop() {
        let mut rng = RngBank::new(14).for_stage(StageSlot::Claim);
        let p = CounterpartyPools::default();
        let r = route(None, &p, &RoutingConfig::default(), &mut rng);
        assert!(r.repair_shop_id.is_none());
    }
}
