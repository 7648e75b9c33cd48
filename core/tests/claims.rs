//! Claim generation: references, date windows, amounts and ring targeting.

use chrono::Duration;
use fraudnet_core::{
    archetype::RingArchetype,
    claim::{FILING_DELAY_DAYS, INCIDENT_WINDOW_DAYS},
    config::{GeneratorConfig, RingConfig},
    dataset::Dataset,
    model::ClaimType,
    synthesizer::Synthesizer,
};
use std::collections::BTreeSet;

fn run(config: GeneratorConfig) -> Dataset {
    Synthesizer::new(config).unwrap().run().unwrap()
}

/// Ten legitimate claimants and one four-member ring, everyone files.
fn scenario(archetype: RingArchetype, seed: u64) -> Dataset {
    let mut config = GeneratorConfig::default_test().with_seed(seed);
    config.legitimate_claimants = 10;
    config.rings = vec![RingConfig {
        ring_id: "RING_0".into(),
        size: 4,
        archetype,
    }];
    config.claim_rate = 1.0;
    config.fraud_claim_rate = 1.0;
    run(config)
}

#[test]
fn generated_dataset_is_referentially_consistent() {
    for seed in [1, 42, 1234] {
        let data = run(GeneratorConfig::default().with_seed(seed));
        data.check_integrity()
            .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
        assert!(!data.claims.is_empty());
    }
}

#[test]
fn claim_dates_fall_inside_the_window() {
    let data = run(GeneratorConfig::default());
    let as_of = GeneratorConfig::default().reference_date;
    let earliest = as_of - Duration::days(INCIDENT_WINDOW_DAYS.1);
    let latest = as_of - Duration::days(INCIDENT_WINDOW_DAYS.0);

    for c in &data.claims {
        assert!(
            (earliest..=latest).contains(&c.incident_date),
            "{} incident {} outside [{earliest}, {latest}]",
            c.claim_id,
            c.incident_date
        );
        let delay = (c.claim_date - c.incident_date).num_days();
        assert!(
            (FILING_DELAY_DAYS.0..=FILING_DELAY_DAYS.1).contains(&delay),
            "{} filed {delay} days after the incident",
            c.claim_id
        );
    }
}

#[test]
fn ring_amounts_skew_towards_the_ceiling() {
    let config = GeneratorConfig::default();
    let data = run(config.clone());
    let range_of = |t: ClaimType| {
        config
            .claim_types
            .iter()
            .find(|r| r.claim_type == t)
            .expect("configured claim type")
    };

    for c in &data.claims {
        let range = range_of(c.claim_type);
        let (lo, hi) = if c.is_fraud_ring {
            (
                range.max * config.ring_amount_skew.low,
                range.max * config.ring_amount_skew.high,
            )
        } else {
            (range.min, range.max)
        };
        assert!(
            c.claim_amount >= lo - 0.01 && c.claim_amount <= hi + 0.01,
            "{} amount {} outside [{lo}, {hi}]",
            c.claim_id,
            c.claim_amount
        );
        assert_eq!(c.claim_amount, (c.claim_amount * 100.0).round() / 100.0);
    }
}

#[test]
fn ring_members_file_far_more_often() {
    let data = run(GeneratorConfig::default());
    let summary = data.summary();
    let ring_rate = summary.fraud_ring_claims as f64 / summary.fraud_ring_claimants as f64;
    let legit_rate = (summary.total_claims - summary.fraud_ring_claims) as f64
        / (summary.total_claimants - summary.fraud_ring_claimants) as f64;
    assert!(ring_rate > 0.6, "ring claim rate {ring_rate}");
    assert!(legit_rate < 0.25, "legitimate claim rate {legit_rate}");
}

#[test]
fn body_shop_ring_routes_every_claim_to_the_hub() {
    for seed in [1, 2, 3] {
        let data = scenario(
            RingArchetype::HubShop {
                shop_id: "SHOP_0".into(),
            },
            seed,
        );
        assert_eq!(data.claims.len(), 14);

        for c in &data.claims {
            if c.is_fraud_ring {
                assert_eq!(c.repair_shop_id, "SHOP_0", "{}", c.claim_id);
            } else {
                assert_ne!(c.repair_shop_id, "SHOP_0", "legit claim {} at the hub", c.claim_id);
            }
        }
        let legit_lawyers: BTreeSet<&str> = data
            .lawyers
            .iter()
            .filter(|l| !l.is_fraud_involved)
            .map(|l| l.lawyer_id.as_str())
            .collect();
        for c in data.claims.iter().filter(|c| c.is_fraud_ring) {
            let lawyer = c.lawyer_id.as_deref().expect("hub-shop claims always have a lawyer");
            assert!(legit_lawyers.contains(lawyer), "{} uses fraud lawyer {lawyer}", c.claim_id);
        }
    }
}

#[test]
fn medical_mill_ring_routes_every_claim_to_the_hub_provider() {
    for seed in [4, 5, 6] {
        let data = scenario(
            RingArchetype::HubProvider {
                provider_id: "MED_0".into(),
            },
            seed,
        );
        let fraud_shops: BTreeSet<&str> = data
            .repair_shops
            .iter()
            .filter(|s| s.is_fraud_involved)
            .map(|s| s.shop_id.as_str())
            .collect();

        for c in &data.claims {
            if c.is_fraud_ring {
                assert_eq!(c.medical_provider_id.as_deref(), Some("MED_0"), "{}", c.claim_id);
                assert!(!fraud_shops.contains(c.repair_shop_id.as_str()));
            } else {
                assert_ne!(c.medical_provider_id.as_deref(), Some("MED_0"));
            }
        }
    }
}

#[test]
fn legitimate_claims_never_touch_fraud_counterparties() {
    let data = run(GeneratorConfig::default());
    let fraud: BTreeSet<&str> = data
        .repair_shops
        .iter()
        .filter(|s| s.is_fraud_involved)
        .map(|s| s.shop_id.as_str())
        .chain(
            data.medical_providers
                .iter()
                .filter(|m| m.is_fraud_involved)
                .map(|m| m.provider_id.as_str()),
        )
        .chain(
            data.lawyers
                .iter()
                .filter(|l| l.is_fraud_involved)
                .map(|l| l.lawyer_id.as_str()),
        )
        .collect();

    for c in data.claims.iter().filter(|c| !c.is_fraud_ring) {
        assert!(!fraud.contains(c.repair_shop_id.as_str()), "{}", c.claim_id);
        if let Some(m) = &c.medical_provider_id {
            assert!(!fraud.contains(m.as_str()), "{}", c.claim_id);
        }
        if let Some(l) = &c.lawyer_id {
            assert!(!fraud.contains(l.as_str()), "{}", c.claim_id);
        }
    }
}

#[test]
fn claim_ids_are_sequential() {
    let data = run(GeneratorConfig::default_test());
    for (i, c) in data.claims.iter().enumerate() {
        assert_eq!(c.claim_id, format!("CLAIM_{i}"));
        assert!(c.claim_number.starts_with("CN") && c.claim_number.len() == 12);
    }
}
