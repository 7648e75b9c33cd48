//! The generation pipeline.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Population      legitimate claimants, then each ring in config order
//!   2. Relationship    intra-ring edges, per ring, right after its members
//!   3. Policy          one or two per claimant
//!   4. Vehicle         one per policy
//!   5. Counterparty    shops, providers, lawyers
//!   6. Claim           per claimant, ring targeting
//!   7. Witness         recurring pool, then per claim
//!
//! RULES:
//!   - Each stage reads only the tables produced by earlier stages.
//!   - Each stage draws from its own RngBank stream, so a change inside one
//!     stage never shifts another stage's values.

use crate::{
    claim::ClaimGenerator,
    config::GeneratorConfig,
    counterparty::Counterparties,
    dataset::Dataset,
    error::{FraudNetError, NetResult},
    policy::{generate_policies, generate_vehicles},
    population::generate_claimants,
    relationship::seed_relationships,
    rng::{RngBank, StageSlot},
    witness::generate_witnesses,
};
use std::collections::BTreeSet;

pub struct Synthesizer {
    config: GeneratorConfig,
    rng_bank: RngBank,
}

impl Synthesizer {
    pub fn new(config: GeneratorConfig) -> NetResult<Self> {
        config.validate()?;
        Ok(Self {
            rng_bank: RngBank::new(config.seed),
            config,
        })
    }

    /// Small, fixed population for tests.
    pub fn build_test(seed: u64) -> NetResult<Self> {
        Self::new(GeneratorConfig::default_test().with_seed(seed))
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run every stage once and return the complete table set.
    pub fn run(&self) -> NetResult<Dataset> {
        let config = &self.config;
        let as_of = config.reference_date;

        let mut population_rng = self.rng_bank.for_stage(StageSlot::Population);
        let mut relationship_rng = self.rng_bank.for_stage(StageSlot::Relationship);

        let mut claimants = generate_claimants(
            config.legitimate_claimants,
            None,
            &config.sharing,
            as_of,
            &mut population_rng,
        )?;
        let mut claimant_relationships = Vec::new();
        for ring in &config.rings {
            let members = generate_claimants(
                ring.size,
                Some(&ring.ring_id),
                &config.sharing,
                as_of,
                &mut population_rng,
            )?;
            claimant_relationships.extend(seed_relationships(
                &members,
                &ring.ring_id,
                config.dedup_relationships,
                &mut relationship_rng,
            )?);
            log::debug!(
                "stage=population ring={} archetype={} members={}",
                ring.ring_id,
                ring.archetype.name(),
                members.len()
            );
            claimants.extend(members);
        }
        let mut seen = BTreeSet::new();
        if let Some(dup) = claimants.iter().find(|c| !seen.insert(c.claimant_id.as_str())) {
            return Err(FraudNetError::InvalidRecord {
                entity: "claimant",
                id: dup.claimant_id.clone(),
                reason: "id generated by more than one group".into(),
            });
        }
        log::info!(
            "stage=population claimants={} ring_members={} relationships={}",
            claimants.len(),
            config.total_ring_members(),
            claimant_relationships.len()
        );

        let policies = generate_policies(
            &claimants,
            config.second_policy_rate,
            as_of,
            &mut self.rng_bank.for_stage(StageSlot::Policy),
        )?;
        let vehicles =
            generate_vehicles(&policies, &mut self.rng_bank.for_stage(StageSlot::Vehicle))?;
        log::info!("stage=policy policies={} vehicles={}", policies.len(), vehicles.len());

        let counterparties = Counterparties::generate(
            &config.counterparties,
            &mut self.rng_bank.for_stage(StageSlot::Counterparty),
        )?;
        let pools = counterparties.pools();
        log::info!(
            "stage=counterparty shops={} providers={} lawyers={}",
            counterparties.repair_shops.len(),
            counterparties.medical_providers.len(),
            counterparties.lawyers.len()
        );

        let claims = ClaimGenerator::new(config, &pools, &policies, &vehicles)
            .generate(&claimants, &mut self.rng_bank.for_stage(StageSlot::Claim))?;
        log::info!(
            "stage=claim claims={} ring_claims={}",
            claims.len(),
            claims.iter().filter(|c| c.is_fraud_ring).count()
        );

        let witness_tables = generate_witnesses(
            &claims,
            &config.witnesses,
            &mut self.rng_bank.for_stage(StageSlot::Witness),
        )?;
        log::info!(
            "stage=witness witnesses={} links={} unwitnessed={}",
            witness_tables.witnesses.len(),
            witness_tables.claim_witnesses.len(),
            witness_tables.unwitnessed_claims
        );

        Ok(Dataset {
            claimants,
            policies,
            vehicles,
            repair_shops: counterparties.repair_shops,
            medical_providers: counterparties.medical_providers,
            lawyers: counterparties.lawyers,
            claims,
            witnesses: witness_tables.witnesses,
            claim_witnesses: witness_tables.claim_witnesses,
            claimant_relationships,
            unwitnessed_claims: witness_tables.unwitnessed_claims,
        })
    }
}
