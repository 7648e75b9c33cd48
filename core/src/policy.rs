//! Policies (one or two per claimant) and exactly one vehicle per policy.

use crate::{
    attribute_pool::AttributePool,
    error::NetResult,
    model::{Claimant, CoverageType, Policy, Validate, Vehicle},
    rng::StageRng,
    types::round_cents,
};
use chrono::{Duration, NaiveDate};

pub const POLICY_TERM_DAYS: i64 = 365;
const PREMIUM_RANGE: (f64, f64) = (800.0, 2500.0);
const MODEL_YEARS: (i64, i64) = (2010, 2024);

pub fn generate_policies(
    claimants: &[Claimant],
    second_policy_rate: f64,
    as_of: NaiveDate,
    rng: &mut StageRng,
) -> NetResult<Vec<Policy>> {
    let mut policies = Vec::with_capacity(claimants.len() + claimants.len() / 8);
    for claimant in claimants {
        let count = if rng.chance(second_policy_rate) { 2 } else { 1 };
        for n in 0..count {
            let start_date = AttributePool::days_before(rng, as_of, 180, 1095);
            let policy = Policy {
                policy_id: format!("POL_{}_{n}", claimant.claimant_id),
                policy_number: format!("PN{}", rng.digits(10)),
                claimant_id: claimant.claimant_id.clone(),
                start_date,
                end_date: start_date + Duration::days(POLICY_TERM_DAYS),
                premium: round_cents(rng.uniform(PREMIUM_RANGE.0, PREMIUM_RANGE.1)),
                coverage_type: *rng
                    .pick(CoverageType::ALL)
                    .unwrap_or(&CoverageType::FullCoverage),
            };
            policies.push(policy.validated()?);
        }
    }
    Ok(policies)
}

pub fn generate_vehicles(policies: &[Policy], rng: &mut StageRng) -> NetResult<Vec<Vehicle>> {
    let mut vehicles = Vec::with_capacity(policies.len());
    for policy in policies {
        let (make, model) = AttributePool::make_and_model(rng);
        let vehicle = Vehicle {
            vehicle_id: format!("VEH_{}", policy.policy_id),
            vin: AttributePool::vin(rng),
            policy_id: policy.policy_id.clone(),
            make: make.into(),
            model: model.into(),
            year: rng.range_inclusive(MODEL_YEARS.0, MODEL_YEARS.1) as i32,
            color: AttributePool::color(rng).into(),
            license_plate: AttributePool::license_plate(rng),
        };
        vehicles.push(vehicle.validated()?);
    }
    Ok(vehicles)
}
