use crate::{
    archetype::RingArchetype,
    error::{FraudNetError, NetResult},
    model::ClaimType,
    population::LEGITIMATE_TAG,
    types::RingId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ── Generation ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingConfig {
    pub ring_id: RingId,
    pub size: usize,
    pub archetype: RingArchetype,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimTypeRange {
    pub claim_type: ClaimType,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterpartyConfig {
    pub repair_shops: usize,
    pub fraud_repair_shops: usize,
    pub medical_providers: usize,
    pub fraud_medical_providers: usize,
    pub lawyers: usize,
    pub fraud_lawyers: usize,
}

impl Default for CounterpartyConfig {
    fn default() -> Self {
        Self {
            repair_shops: 50,
            fraud_repair_shops: 5,
            medical_providers: 40,
            fraud_medical_providers: 4,
            lawyers: 30,
            fraud_lawyers: 3,
        }
    }
}

/// Probabilities behind each archetype's counterparty choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub hub_shop_fraud_provider: f64,
    pub hub_provider_fraud_lawyer: f64,
    pub diffuse_fraud_shop: f64,
    pub diffuse_fraud_provider: f64,
    pub diffuse_fraud_lawyer: f64,
    pub legit_provider: f64,
    pub legit_lawyer: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            hub_shop_fraud_provider: 0.5,
            hub_provider_fraud_lawyer: 0.7,
            diffuse_fraud_shop: 0.9,
            diffuse_fraud_provider: 0.8,
            diffuse_fraud_lawyer: 0.85,
            legit_provider: 0.3,
            legit_lawyer: 0.2,
        }
    }
}

/// Contact-detail reuse inside a ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharingConfig {
    /// Chance a member takes an address from the ring's shared pool.
    pub address_rate: f64,
    /// Chance a member with a shared address also takes a shared phone.
    pub phone_rate: f64,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            address_rate: 0.4,
            phone_rate: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WitnessConfig {
    pub recurring_pool: usize,
    pub recurring_rate: f64,
    pub one_off_rate: f64,
}

impl Default for WitnessConfig {
    fn default() -> Self {
        Self {
            recurring_pool: 5,
            recurring_rate: 0.4,
            one_off_rate: 0.3,
        }
    }
}

/// Multipliers on a claim type's ceiling for ring claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountSkew {
    pub low: f64,
    pub high: f64,
}

impl Default for AmountSkew {
    fn default() -> Self {
        Self { low: 0.7, high: 1.3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Dates are generated backwards from this day, never from the wall clock.
    pub reference_date: NaiveDate,
    pub legitimate_claimants: usize,
    pub rings: Vec<RingConfig>,
    pub counterparties: CounterpartyConfig,
    pub claim_rate: f64,
    pub fraud_claim_rate: f64,
    pub claim_types: Vec<ClaimTypeRange>,
    pub ring_amount_skew: AmountSkew,
    pub routing: RoutingConfig,
    pub sharing: SharingConfig,
    pub witnesses: WitnessConfig,
    pub second_policy_rate: f64,
    /// Drop repeated unordered pairs drawn by the relationship seeder.
    pub dedup_relationships: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let sizes = [12, 8, 15, 10, 9, 13, 7, 11];
        let rings = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| RingConfig {
                ring_id: format!("RING_{i}"),
                size,
                archetype: match i {
                    0 | 1 => RingArchetype::HubShop {
                        shop_id: "SHOP_0".into(),
                    },
                    2 | 3 => RingArchetype::HubProvider {
                        provider_id: "MED_0".into(),
                    },
                    _ => RingArchetype::Diffuse,
                },
            })
            .collect();

        Self {
            seed: 42,
            reference_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            legitimate_claimants: 800,
            rings,
            counterparties: CounterpartyConfig::default(),
            claim_rate: 0.15,
            fraud_claim_rate: 0.8,
            claim_types: default_claim_types(),
            ring_amount_skew: AmountSkew::default(),
            routing: RoutingConfig::default(),
            sharing: SharingConfig::default(),
            witnesses: WitnessConfig::default(),
            second_policy_rate: 0.1,
            dedup_relationships: false,
        }
    }
}

fn default_claim_types() -> Vec<ClaimTypeRange> {
    [
        (ClaimType::Collision, 2_000.0, 15_000.0),
        (ClaimType::Comprehensive, 1_000.0, 8_000.0),
        (ClaimType::Liability, 5_000.0, 25_000.0),
        (ClaimType::PersonalInjuryProtection, 3_000.0, 50_000.0),
        (ClaimType::UninsuredMotorist, 4_000.0, 30_000.0),
    ]
    .into_iter()
    .map(|(claim_type, min, max)| ClaimTypeRange { claim_type, min, max })
    .collect()
}

impl GeneratorConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &str) -> NetResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| FraudNetError::io(path, e))?;
        let config: GeneratorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config with a small population for use in tests.
    pub fn default_test() -> Self {
        Self {
            legitimate_claimants: 60,
            rings: vec![
                RingConfig {
                    ring_id: "RING_0".into(),
                    size: 6,
                    archetype: RingArchetype::HubShop {
                        shop_id: "SHOP_0".into(),
                    },
                },
                RingConfig {
                    ring_id: "RING_1".into(),
                    size: 5,
                    archetype: RingArchetype::HubProvider {
                        provider_id: "MED_0".into(),
                    },
                },
                RingConfig {
                    ring_id: "RING_2".into(),
                    size: 7,
                    archetype: RingArchetype::Diffuse,
                },
            ],
            counterparties: CounterpartyConfig {
                repair_shops: 10,
                fraud_repair_shops: 2,
                medical_providers: 8,
                fraud_medical_providers: 2,
                lawyers: 6,
                fraud_lawyers: 2,
            },
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn total_ring_members(&self) -> usize {
        self.rings.iter().map(|r| r.size).sum()
    }

    pub fn ring(&self, ring_id: &str) -> Option<&RingConfig> {
        self.rings.iter().find(|r| r.ring_id == ring_id)
    }

    pub fn validate(&self) -> NetResult<()> {
        let invalid = |msg: String| Err(FraudNetError::InvalidConfig(msg));

        let probabilities = [
            ("claim_rate", self.claim_rate),
            ("fraud_claim_rate", self.fraud_claim_rate),
            ("second_policy_rate", self.second_policy_rate),
            ("sharing.address_rate", self.sharing.address_rate),
            ("sharing.phone_rate", self.sharing.phone_rate),
            ("witnesses.recurring_rate", self.witnesses.recurring_rate),
            ("witnesses.one_off_rate", self.witnesses.one_off_rate),
            ("routing.hub_shop_fraud_provider", self.routing.hub_shop_fraud_provider),
            ("routing.hub_provider_fraud_lawyer", self.routing.hub_provider_fraud_lawyer),
            ("routing.diffuse_fraud_shop", self.routing.diffuse_fraud_shop),
            ("routing.diffuse_fraud_provider", self.routing.diffuse_fraud_provider),
            ("routing.diffuse_fraud_lawyer", self.routing.diffuse_fraud_lawyer),
            ("routing.legit_provider", self.routing.legit_provider),
            ("routing.legit_lawyer", self.routing.legit_lawyer),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{name} = {p} is not a probability"));
            }
        }

        let c = &self.counterparties;
        for (name, fraud, total) in [
            ("repair shops", c.fraud_repair_shops, c.repair_shops),
            ("medical providers", c.fraud_medical_providers, c.medical_providers),
            ("lawyers", c.fraud_lawyers, c.lawyers),
        ] {
            if fraud > total {
                return invalid(format!("{fraud} fraud {name} exceed pool of {total}"));
            }
        }

        if self.claim_types.is_empty() {
            return invalid("claim type table is empty".into());
        }
        for range in &self.claim_types {
            if !(range.min > 0.0 && range.min <= range.max) {
                return invalid(format!(
                    "{} amount range [{}, {}] is not positive and ordered",
                    range.claim_type, range.min, range.max
                ));
            }
        }
        let skew = &self.ring_amount_skew;
        if !(skew.low > 0.0 && skew.low <= skew.high) {
            return invalid(format!("ring amount skew [{}, {}] is invalid", skew.low, skew.high));
        }

        let mut seen = BTreeSet::new();
        for ring in &self.rings {
            if ring.ring_id.trim().is_empty() {
                return invalid("ring id is empty".into());
            }
            if ring.ring_id == LEGITIMATE_TAG {
                return invalid(format!(
                    "ring id {LEGITIMATE_TAG} would collide with legitimate claimant ids"
                ));
            }
            if !seen.insert(ring.ring_id.as_str()) {
                return invalid(format!("duplicate ring id {}", ring.ring_id));
            }
            if ring.size == 0 {
                log::warn!("ring {} is configured with zero members", ring.ring_id);
            }
            match &ring.archetype {
                RingArchetype::HubShop { shop_id } => {
                    if !names_pool_entry(shop_id, "SHOP_", c.repair_shops) {
                        return invalid(format!(
                            "ring {} targets unknown repair shop {shop_id}",
                            ring.ring_id
                        ));
                    }
                }
                RingArchetype::HubProvider { provider_id } => {
                    if !names_pool_entry(provider_id, "MED_", c.medical_providers) {
                        return invalid(format!(
                            "ring {} targets unknown medical provider {provider_id}",
                            ring.ring_id
                        ));
                    }
                }
                RingArchetype::Diffuse => {}
            }
        }
        Ok(())
    }
}

fn names_pool_entry(id: &str, prefix: &str, pool_size: usize) -> bool {
    id.strip_prefix(prefix)
        .and_then(|n| n.parse::<usize>().ok())
        .is_some_and(|n| n < pool_size)
}

// ── Graph store ────────────────────────────────────────────────────

pub const ENV_STORE_URI: &str = "GRAPH_STORE_URI";
pub const ENV_STORE_USER: &str = "GRAPH_STORE_USER";
pub const ENV_STORE_PASSWORD: &str = "GRAPH_STORE_PASSWORD";

#[derive(Clone)]
pub struct StoreConfig {
    pub uri: String,
    pub principal: String,
    pub credential: String,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("uri", &self.uri)
            .field("principal", &self.principal)
            .field("credential", &"<redacted>")
            .finish()
    }
}

impl StoreConfig {
    /// Read the store settings from the process environment.
    pub fn from_env() -> NetResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the store settings through an arbitrary lookup. Every value
    /// is required; a missing or blank one is fatal.
    pub fn from_lookup<F>(lookup: F) -> NetResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |var: &str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| FraudNetError::MissingConfig { var: var.into() })
        };
        Ok(Self {
            uri: require(ENV_STORE_URI)?,
            principal: require(ENV_STORE_USER)?,
            credential: require(ENV_STORE_PASSWORD)?,
        })
    }
}

// ── Loader ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceStrategy {
    /// Compare every unordered pair of claimants.
    AllPairs,
    /// Bucket claimants by attribute, expand pairs per bucket.
    #[default]
    GroupBy,
}

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub data_dir: String,
    pub batch_size: usize,
    pub progress_every: usize,
    pub inference: InferenceStrategy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".into(),
            batch_size: 1000,
            progress_every: 5000,
            inference: InferenceStrategy::default(),
        }
    }
}

impl LoaderConfig {
    pub fn new(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesizer::Synthesizer;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        GeneratorConfig::default().validate().unwrap();
        GeneratorConfig::default_test().validate().unwrap();
        assert_eq!(GeneratorConfig::default().total_ring_members(), 85);
    }

    #[test]
    fn hub_outside_pool_is_rejected() {
        let mut config = GeneratorConfig::default_test();
        config.rings[0].archetype = RingArchetype::HubShop {
            shop_id: "SHOP_99".into(),
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("SHOP_99"), "{err}");
    }

    #[test]
    fn duplicate_ring_ids_are_rejected() {
        let mut config = GeneratorConfig::default_test();
        config.rings[1].ring_id = "RING_0".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn ring_named_like_legitimate_claimants_is_rejected() {
        let mut config = GeneratorConfig::default_test();
        config.rings.push(RingConfig {
            ring_id: "LEG".into(),
            size: 3,
            archetype: RingArchetype::Diffuse,
        });
        let err = config.validate().unwrap_err();
        assert!(matches!(err, FraudNetError::InvalidConfig(_)), "{err}");
        assert!(err.to_string().contains("LEG"), "{err}");
        assert!(Synthesizer::new(config).is_err());
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let config = GeneratorConfig {
            fraud_claim_rate: 1.5,
            ..GeneratorConfig::default_test()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_takes_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"seed": 7, "legitimate_claimants": 10}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.legitimate_claimants, 10);
        assert_eq!(config.rings.len(), 8);
    }

    #[test]
    fn archetype_json_is_tagged() {
        let ring: RingConfig = serde_json::from_str(
            r#"{"ring_id":"R","size":3,"archetype":{"kind":"hub_provider","provider_id":"MED_1"}}"#,
        )
        .unwrap();
        assert_eq!(
            ring.archetype,
            RingArchetype::HubProvider {
                provider_id: "MED_1".into()
            }
        );
    }

    #[test]
    fn every_store_variable_is_required() {
        let full: HashMap<&str, &str> = [
            (ENV_STORE_URI, "sqlite::memory:"),
            (ENV_STORE_USER, "loader"),
            (ENV_STORE_PASSWORD, "secret"),
        ]
        .into_iter()
        .collect();

        let config = StoreConfig::from_lookup(|k| full.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.principal, "loader");

        for missing in [ENV_STORE_URI, ENV_STORE_USER, ENV_STORE_PASSWORD] {
            let err = StoreConfig::from_lookup(|k| {
                (k != missing).then(|| full[k].to_string())
            })
            .unwrap_err();
            assert!(
                matches!(&err, FraudNetError::MissingConfig { var } if var == missing),
                "{err}"
            );
        }
    }

    #[test]
    fn credential_is_not_printed() {
        let config = StoreConfig {
            uri: "sqlite::memory:".into(),
            principal: "p".into(),
            credential: "hunter2".into(),
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
