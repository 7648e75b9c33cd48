//! Witnesses: a small recurring pool shared across ring claims plus
//! one-off witnesses for everyone else.

use crate::{
    attribute_pool::AttributePool,
    config::WitnessConfig,
    error::NetResult,
    model::{Claim, ClaimWitness, Validate, Witness, WitnessRole},
    rng::StageRng,
};

pub struct WitnessTables {
    /// One-off witnesses in creation order, then the recurring pool.
    pub witnesses: Vec<Witness>,
    pub claim_witnesses: Vec<ClaimWitness>,
    /// Claims that ended up with no witness at all.
    pub unwitnessed_claims: usize,
}

pub fn generate_witnesses(
    claims: &[Claim],
    config: &WitnessConfig,
    rng: &mut StageRng,
) -> NetResult<WitnessTables> {
    let mut counter = 0usize;
    let mut next_witness = |recurring: bool, rng: &mut StageRng| {
        let witness = Witness {
            witness_id: format!("WIT_{counter}"),
            name: AttributePool::full_name(rng),
            phone: AttributePool::phone(rng),
            address: AttributePool::address(rng),
            is_recurring: recurring,
        };
        counter += 1;
        witness.validated()
    };

    let recurring: Vec<Witness> = (0..config.recurring_pool)
        .map(|_| next_witness(true, rng))
        .collect::<NetResult<_>>()?;

    let mut one_offs = Vec::new();
    let mut claim_witnesses = Vec::new();
    let mut unwitnessed_claims = 0;

    for claim in claims {
        let witness_id = if claim.is_fraud_ring
            && !recurring.is_empty()
            && rng.chance(config.recurring_rate)
        {
            rng.pick(&recurring).map(|w| w.witness_id.clone())
        } else if rng.chance(config.one_off_rate) {
            let witness = next_witness(false, rng)?;
            let id = witness.witness_id.clone();
            one_offs.push(witness);
            Some(id)
        } else {
            None
        };

        let Some(witness_id) = witness_id else {
            unwitnessed_claims += 1;
            continue;
        };
        let link = ClaimWitness {
            claim_id: claim.claim_id.clone(),
            witness_id,
            role: *rng.pick(WitnessRole::ALL).unwrap_or(&WitnessRole::Unknown),
        };
        claim_witnesses.push(link.validated()?);
    }

    one_offs.extend(recurring);
    Ok(WitnessTables {
        witnesses: one_offs,
        claim_witnesses,
        unwitnessed_claims,
    })
}
