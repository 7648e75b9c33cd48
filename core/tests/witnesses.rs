//! Witness attachment: recurring witnesses for ring claims, one-offs for
//! the rest, and an accounted-for remainder with no witness.

use fraudnet_core::{config::GeneratorConfig, synthesizer::Synthesizer};
use std::collections::{BTreeMap, BTreeSet};

#[test]
fn every_claim_has_at_most_one_witness_or_is_counted_unwitnessed() {
    let data = Synthesizer::new(GeneratorConfig::default()).unwrap().run().unwrap();

    let mut per_claim: BTreeMap<&str, usize> = BTreeMap::new();
    for cw in &data.claim_witnesses {
        *per_claim.entry(cw.claim_id.as_str()).or_insert(0) += 1;
    }
    assert!(per_claim.values().all(|n| *n == 1));
    assert_eq!(
        per_claim.len() + data.unwitnessed_claims,
        data.claims.len(),
        "witnessed + unwitnessed must cover every claim"
    );
    assert_eq!(data.summary().unwitnessed_claims, data.unwitnessed_claims);
}

#[test]
fn recurring_witnesses_only_appear_on_ring_claims() {
    let data = Synthesizer::new(GeneratorConfig::default()).unwrap().run().unwrap();
    let recurring: BTreeSet<&str> = data
        .witnesses
        .iter()
        .filter(|w| w.is_recurring)
        .map(|w| w.witness_id.as_str())
        .collect();
    let ring_claims: BTreeSet<&str> = data
        .claims
        .iter()
        .filter(|c| c.is_fraud_ring)
        .map(|c| c.claim_id.as_str())
        .collect();

    assert_eq!(recurring.len(), 5);
    let mut recurring_links = 0;
    for cw in &data.claim_witnesses {
        if recurring.contains(cw.witness_id.as_str()) {
            assert!(ring_claims.contains(cw.claim_id.as_str()), "{}", cw.claim_id);
            recurring_links += 1;
        }
    }
    assert!(recurring_links > 0, "no ring claim drew a recurring witness");
}

#[test]
fn one_off_witnesses_are_listed_before_the_recurring_pool() {
    let data = Synthesizer::build_test(21).unwrap().run().unwrap();
    let first_recurring = data
        .witnesses
        .iter()
        .position(|w| w.is_recurring)
        .expect("recurring pool present");
    assert!(data.witnesses[first_recurring..].iter().all(|w| w.is_recurring));

    // The pool is created first, so it owns the lowest ids.
    let pool_ids: Vec<&str> = data.witnesses[first_recurring..]
        .iter()
        .map(|w| w.witness_id.as_str())
        .collect();
    assert_eq!(pool_ids, vec!["WIT_0", "WIT_1", "WIT_2", "WIT_3", "WIT_4"]);

    // Each one-off witness is attached to exactly one claim.
    let mut uses: BTreeMap<&str, usize> = BTreeMap::new();
    for cw in &data.claim_witnesses {
        *uses.entry(cw.witness_id.as_str()).or_insert(0) += 1;
    }
    for w in data.witnesses.iter().filter(|w| !w.is_recurring) {
        assert_eq!(uses.get(w.witness_id.as_str()), Some(&1), "{}", w.witness_id);
    }
}
