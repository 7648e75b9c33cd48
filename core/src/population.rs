//! Claimant population: legitimate policyholders and fraud-ring members.
//!
//! Ring members reuse contact details from small per-ring pools. The reuse
//! is partial on purpose: some members share an address, fewer also share
//! a phone, the rest look like anyone else.

use crate::{
    attribute_pool::AttributePool,
    config::SharingConfig,
    error::NetResult,
    model::{Claimant, Validate},
    rng::StageRng,
};
use chrono::NaiveDate;

pub const MIN_AGE: i64 = 18;
pub const MAX_AGE: i64 = 80;

/// Id tag of legitimate claimants (`CLM_LEG_<i>`). No ring may use it.
pub const LEGITIMATE_TAG: &str = "LEG";

/// Generate `count` claimants. `ring_id` None produces legitimate claimants.
pub fn generate_claimants(
    count: usize,
    ring_id: Option<&str>,
    sharing: &SharingConfig,
    as_of: NaiveDate,
    rng: &mut StageRng,
) -> NetResult<Vec<Claimant>> {
    let shared = ring_id.map(|_| SharedContacts::draw(count, rng));
    let mut claimants = Vec::with_capacity(count);

    for i in 0..count {
        let claimant_id = match ring_id {
            Some(ring) => format!("CLM_{ring}_{i}"),
            None => format!("CLM_{LEGITIMATE_TAG}_{i}"),
        };

        let (address, phone) = match &shared {
            Some(pools) if rng.chance(sharing.address_rate) => {
                let address = pools.address(rng);
                let phone = if rng.chance(sharing.phone_rate) {
                    pools.phone(rng)
                } else {
                    AttributePool::phone(rng)
                };
                (address, phone)
            }
            _ => (AttributePool::address(rng), AttributePool::phone(rng)),
        };

        let name = AttributePool::full_name(rng);
        let claimant = Claimant {
            claimant_id,
            national_id: AttributePool::national_id(rng),
            dob: AttributePool::date_of_birth(rng, as_of, MIN_AGE, MAX_AGE),
            email: AttributePool::email(rng, &name),
            license_number: AttributePool::license_number(rng),
            name,
            address,
            phone,
            is_fraud_ring: ring_id.is_some(),
            fraud_ring_id: ring_id.map(str::to_string),
        };
        claimants.push(claimant.validated()?);
    }

    Ok(claimants)
}

/// Per-ring address and phone pools, sized `max(1, n/3)` and `max(1, n/4)`.
struct SharedContacts {
    addresses: Vec<String>,
    phones: Vec<String>,
}

impl SharedContacts {
    fn draw(ring_size: usize, rng: &mut StageRng) -> Self {
        let addresses = (0..(ring_size / 3).max(1))
            .map(|_| AttributePool::address(rng))
            .collect();
        let phones = (0..(ring_size / 4).max(1))
            .map(|_| AttributePool::phone(rng))
            .collect();
        Self { addresses, phones }
    }

    fn address(&self, rng: &mut StageRng) -> String {
        rng.pick(&self.addresses).cloned().unwrap_or_default()
    }

    fn phone(&self, rng: &mut StageRng) -> String {
        rng.pick(&self.phones).cloned().unwrap_or_default()
    }
}
