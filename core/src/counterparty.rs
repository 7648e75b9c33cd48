//! Repair shops, medical providers and lawyers.
//!
//! The first `fraud_*` entries of each pool are fraud-involved, so hub ids
//! such as `SHOP_0` and `MED_0` land on a flagged counterparty under the
//! default configuration.

use crate::{
    archetype::CounterpartyPools,
    attribute_pool::AttributePool,
    config::CounterpartyConfig,
    error::NetResult,
    model::{Lawyer, MedicalProvider, RepairShop, Validate},
    rng::StageRng,
};

pub struct Counterparties {
    pub repair_shops: Vec<RepairShop>,
    pub medical_providers: Vec<MedicalProvider>,
    pub lawyers: Vec<Lawyer>,
}

impl Counterparties {
    pub fn generate(config: &CounterpartyConfig, rng: &mut StageRng) -> NetResult<Self> {
        Ok(Self {
            repair_shops: repair_shops(config.repair_shops, config.fraud_repair_shops, rng)?,
            medical_providers: medical_providers(
                config.medical_providers,
                config.fraud_medical_providers,
                rng,
            )?,
            lawyers: lawyers(config.lawyers, config.fraud_lawyers, rng)?,
        })
    }

    /// Split every pool by fraud involvement, keeping generation order.
    pub fn pools(&self) -> CounterpartyPools {
        let mut pools = CounterpartyPools::default();
        for s in &self.repair_shops {
            let bucket = if s.is_fraud_involved { &mut pools.fraud_shops } else { &mut pools.legit_shops };
            bucket.push(s.shop_id.clone());
        }
        for m in &self.medical_providers {
            let bucket = if m.is_fraud_involved {
                &mut pools.fraud_providers
            } else {
                &mut pools.legit_providers
            };
            bucket.push(m.provider_id.clone());
        }
        for l in &self.lawyers {
            let bucket = if l.is_fraud_involved { &mut pools.fraud_lawyers } else { &mut pools.legit_lawyers };
            bucket.push(l.lawyer_id.clone());
        }
        pools
    }
}

pub fn repair_shops(total: usize, fraud: usize, rng: &mut StageRng) -> NetResult<Vec<RepairShop>> {
    (0..total)
        .map(|i| {
            let is_fraud_involved = i < fraud;
            let name = if is_fraud_involved {
                format!("{} Auto Body", AttributePool::company(rng))
            } else {
                format!("{}'s Auto Repair", AttributePool::last_name(rng))
            };
            RepairShop {
                shop_id: format!("SHOP_{i}"),
                name,
                address: AttributePool::address(rng),
                phone: AttributePool::phone(rng),
                license_number: format!("SL{}", rng.digits(8)),
                is_fraud_involved,
            }
            .validated()
        })
        .collect()
}

pub fn medical_providers(
    total: usize,
    fraud: usize,
    rng: &mut StageRng,
) -> NetResult<Vec<MedicalProvider>> {
    (0..total)
        .map(|i| {
            MedicalProvider {
                provider_id: format!("MED_{i}"),
                name: format!("Dr. {}", AttributePool::full_name(rng)),
                specialty: AttributePool::specialty(rng).into(),
                address: AttributePool::address(rng),
                phone: AttributePool::phone(rng),
                npi_number: rng.digits(10),
                is_fraud_involved: i < fraud,
            }
            .validated()
        })
        .collect()
}

pub fn lawyers(total: usize, fraud: usize, rng: &mut StageRng) -> NetResult<Vec<Lawyer>> {
    (0..total)
        .map(|i| {
            Lawyer {
                lawyer_id: format!("LAW_{i}"),
                name: AttributePool::full_name(rng),
                bar_number: format!("BAR{}", rng.digits(7)),
                firm_name: format!("{} & Associates", AttributePool::last_name(rng)),
                address: AttributePool::address(rng),
                phone: AttributePool::phone(rng),
                is_fraud_involved: i < fraud,
            }
            .validated()
        })
        .collect()
}
