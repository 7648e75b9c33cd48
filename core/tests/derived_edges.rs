//! Shared-attribute inference over loaded claimants.

use fraudnet_core::{
    config::{GeneratorConfig, InferenceStrategy, LoaderConfig},
    dataset::Dataset,
    derived::{infer_pairs, infer_shared_attributes, SharedAttribute},
    graph::rel,
    loader::GraphLoader,
    model::Claimant,
    store::GraphStore,
    synthesizer::Synthesizer,
    table::{write_rows, Table},
};
use std::collections::BTreeSet;

fn store() -> GraphStore {
    let store = GraphStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn claimant(id: &str, address: &str, phone: &str) -> Claimant {
    Claimant {
        claimant_id: id.into(),
        name: format!("Person {id}"),
        national_id: "123-45-6789".into(),
        dob: GeneratorConfig::default().reference_date,
        address: address.into(),
        phone: phone.into(),
        email: format!("{id}@example.com"),
        license_number: "DL12345678".into(),
        is_fraud_ring: false,
        fraud_ring_id: None,
    }
}

/// Load only a claimant table; every other table is absent and skipped.
fn load_claimants(claimants: &[Claimant], strategy: InferenceStrategy) -> GraphStore {
    let dir = tempfile::tempdir().unwrap();
    write_rows(&Table::Claimants.path_in(dir.path()), claimants).unwrap();
    let mut config = LoaderConfig::new(dir.path().to_string_lossy());
    config.inference = strategy;
    let mut store = store();
    GraphLoader::new(config, &mut store).run().unwrap();
    store
}

fn load_generated(data: &Dataset, strategy: InferenceStrategy) -> GraphStore {
    let dir = tempfile::tempdir().unwrap();
    data.write_tables(dir.path()).unwrap();
    let mut config = LoaderConfig::new(dir.path().to_string_lossy());
    config.inference = strategy;
    let mut store = store();
    GraphLoader::new(config, &mut store).run().unwrap();
    store
}

#[test]
fn shared_phone_with_distinct_addresses_links_by_phone_only() {
    let store = load_claimants(
        &[
            claimant("CLM_LEG_1", "1 Oak St, Austin, TX 73301", "(512) 555-0100"),
            claimant("CLM_LEG_0", "9 Elm Ave, Denver, CO 80201", "(512) 555-0100"),
        ],
        InferenceStrategy::GroupBy,
    );

    assert_eq!(
        store.edges_of_type(rel::SHARES_PHONE).unwrap(),
        vec![("CLM_LEG_0".to_string(), "CLM_LEG_1".to_string())]
    );
    assert!(store.edges_of_type(rel::SHARES_ADDRESS).unwrap().is_empty());

    let summary = store.graph_summary().unwrap();
    assert_eq!(summary.claimants_sharing_phone, 2);
    assert_eq!(summary.claimants_sharing_address, 0);
}

#[test]
fn three_claimants_at_one_address_give_three_edges() {
    let store = load_claimants(
        &[
            claimant("CLM_RING_0_0", "5 Pine Rd, Reno, NV 89501", "(775) 555-0001"),
            claimant("CLM_RING_0_1", "5 Pine Rd, Reno, NV 89501", "(775) 555-0002"),
            claimant("CLM_RING_0_2", "5 Pine Rd, Reno, NV 89501", "(775) 555-0003"),
        ],
        InferenceStrategy::AllPairs,
    );
    let edges = store.edges_of_type(rel::SHARES_ADDRESS).unwrap();
    assert_eq!(edges.len(), 3);
    assert!(edges.iter().all(|(a, b)| a < b));
}

#[test]
fn rerunning_inference_creates_nothing() {
    let data = Synthesizer::new(GeneratorConfig::default()).unwrap().run().unwrap();
    let mut store = load_generated(&data, InferenceStrategy::GroupBy);

    let address_edges = store.edges_of_type(rel::SHARES_ADDRESS).unwrap();
    let phone_edges = store.edges_of_type(rel::SHARES_PHONE).unwrap();
    assert!(!address_edges.is_empty());

    for strategy in [InferenceStrategy::GroupBy, InferenceStrategy::AllPairs] {
        let again = infer_shared_attributes(&mut store, strategy).unwrap();
        assert_eq!(again.shares_address, 0);
        assert_eq!(again.shares_phone, 0);
    }
    assert_eq!(store.edges_of_type(rel::SHARES_ADDRESS).unwrap(), address_edges);
    assert_eq!(store.edges_of_type(rel::SHARES_PHONE).unwrap(), phone_edges);
}

#[test]
fn strategies_agree_on_generated_data() {
    let data = Synthesizer::new(GeneratorConfig::default().with_seed(7))
        .unwrap()
        .run()
        .unwrap();
    let grouped = load_generated(&data, InferenceStrategy::GroupBy);
    let scanned = load_generated(&data, InferenceStrategy::AllPairs);

    for rel_type in rel::DERIVED {
        assert_eq!(
            grouped.edges_of_type(rel_type).unwrap(),
            scanned.edges_of_type(rel_type).unwrap(),
            "{rel_type} differs between strategies"
        );
    }

    let contacts = grouped.claimant_contacts().unwrap();
    assert_eq!(contacts.len(), data.claimants.len());
    for attribute in SharedAttribute::ALL {
        assert_eq!(
            infer_pairs(&contacts, attribute, InferenceStrategy::GroupBy),
            infer_pairs(&contacts, attribute, InferenceStrategy::AllPairs)
        );
    }
}

#[test]
fn derived_edges_match_a_direct_pairwise_count() {
    let data = Synthesizer::new(GeneratorConfig::default()).unwrap().run().unwrap();
    let store = load_generated(&data, InferenceStrategy::GroupBy);

    let mut expected_address = BTreeSet::new();
    let mut expected_phone = BTreeSet::new();
    for (i, a) in data.claimants.iter().enumerate() {
        for b in &data.claimants[i + 1..] {
            let pair = if a.claimant_id < b.claimant_id {
                (a.claimant_id.clone(), b.claimant_id.clone())
            } else {
                (b.claimant_id.clone(), a.claimant_id.clone())
            };
            if a.address == b.address {
                expected_address.insert(pair.clone());
            }
            if a.phone == b.phone {
                expected_phone.insert(pair);
            }
        }
    }

    let address: BTreeSet<_> = store
        .edges_of_type(rel::SHARES_ADDRESS)
        .unwrap()
        .into_iter()
        .collect();
    let phone: BTreeSet<_> = store.edges_of_type(rel::SHARES_PHONE).unwrap().into_iter().collect();
    assert_eq!(address, expected_address);
    assert_eq!(phone, expected_phone);
}
