//! Typed records for every generated entity and edge table.
//!
//! RULE: A record is validated before it leaves a generator and again
//! when the loader reads it back from disk. Column names are the serde
//! field names and must stay stable; the graph loader and any external
//! reader depend on them.

use crate::{
    error::{FraudNetError, NetResult},
    types::{EntityId, RingId},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Longest allowed gap between an incident and the claim filing.
pub const MAX_FILING_DELAY_DAYS: i64 = 7;

// ── Enumerations ───────────────────────────────────────────────────

macro_rules! labelled_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labelled_enum!(CoverageType {
    FullCoverage => "Full Coverage",
    LiabilityOnly => "Liability Only",
    Comprehensive => "Comprehensive",
});

labelled_enum!(ClaimType {
    Collision => "Collision",
    Comprehensive => "Comprehensive",
    Liability => "Liability",
    PersonalInjuryProtection => "Personal Injury Protection",
    UninsuredMotorist => "Uninsured Motorist",
});

labelled_enum!(ClaimStatus {
    Open => "Open",
    UnderInvestigation => "Under Investigation",
    Approved => "Approved",
    Denied => "Denied",
});

labelled_enum!(Weather {
    Clear => "Clear",
    Rain => "Rain",
    Snow => "Snow",
    Fog => "Fog",
});

labelled_enum!(WitnessRole {
    Passenger => "Passenger",
    Bystander => "Bystander",
    OtherDriver => "Other Driver",
    Unknown => "Unknown",
});

labelled_enum!(RelationshipType {
    Family => "family",
    Associate => "associate",
    Friend => "friend",
});

// ── Records ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claimant {
    pub claimant_id: EntityId,
    pub name: String,
    pub national_id: String,
    pub dob: NaiveDate,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub license_number: String,
    pub is_fraud_ring: bool,
    #[serde(default, deserialize_with = "absent_marker")]
    pub fraud_ring_id: Option<RingId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub policy_id: EntityId,
    pub policy_number: String,
    pub claimant_id: EntityId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub premium: f64,
    pub coverage_type: CoverageType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: EntityId,
    pub vin: String,
    pub policy_id: EntityId,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub license_plate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairShop {
    pub shop_id: EntityId,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub license_number: String,
    pub is_fraud_involved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalProvider {
    pub provider_id: EntityId,
    pub name: String,
    pub specialty: String,
    pub address: String,
    pub phone: String,
    pub npi_number: String,
    pub is_fraud_involved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lawyer {
    pub lawyer_id: EntityId,
    pub name: String,
    pub bar_number: String,
    pub firm_name: String,
    pub address: String,
    pub phone: String,
    pub is_fraud_involved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: EntityId,
    pub claim_number: String,
    pub claimant_id: EntityId,
    pub policy_id: EntityId,
    pub vehicle_id: EntityId,
    pub claim_date: NaiveDate,
    pub incident_date: NaiveDate,
    pub claim_amount: f64,
    pub claim_type: ClaimType,
    pub status: ClaimStatus,
    pub description: String,
    pub location: String,
    pub weather_condition: Weather,
    pub repair_shop_id: EntityId,
    #[serde(default, deserialize_with = "absent_marker")]
    pub medical_provider_id: Option<EntityId>,
    #[serde(default, deserialize_with = "absent_marker")]
    pub lawyer_id: Option<EntityId>,
    pub is_fraud_ring: bool,
    #[serde(default, deserialize_with = "absent_marker")]
    pub fraud_ring_id: Option<RingId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Witness {
    pub witness_id: EntityId,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub is_recurring: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimWitness {
    pub claim_id: EntityId,
    pub witness_id: EntityId,
    pub role: WitnessRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimantRelationship {
    pub from_claimant: EntityId,
    pub to_claimant: EntityId,
    pub relationship_type: RelationshipType,
    pub ring_id: RingId,
}

/// Optional id columns accept several spellings of "no value". Tabular
/// exports commonly write a float not-a-number or an empty cell where a
/// foreign key is missing; all of them become `None` here.
fn absent_marker<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => {
            let t = s.trim();
            if t.is_empty() || matches!(t, "NaN" | "nan" | "None" | "null") {
                Ok(None)
            } else {
                Ok(Some(t.to_string()))
            }
        }
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected an id or nothing, got {other}"))),
    }
}

// ── Validation ─────────────────────────────────────────────────────

pub trait Validate {
    const ENTITY: &'static str;

    fn key(&self) -> String;

    fn check(&self) -> Result<(), String>;

    fn validate(&self) -> NetResult<()> {
        self.check().map_err(|reason| FraudNetError::InvalidRecord {
            entity: Self::ENTITY,
            id: self.key(),
            reason,
        })
    }

    fn validated(self) -> NetResult<Self>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} is empty"))
    } else {
        Ok(())
    }
}

fn ring_fields_agree(flag: bool, ring_id: &Option<RingId>) -> Result<(), String> {
    match (flag, ring_id) {
        (true, Some(r)) if !r.is_empty() => Ok(()),
        (false, None) => Ok(()),
        (true, _) => Err("fraud-ring member without a ring id".into()),
        (false, Some(r)) => Err(format!("non-member carries ring id {r}")),
    }
}

impl Validate for Claimant {
    const ENTITY: &'static str = "claimant";

    fn key(&self) -> String {
        self.claimant_id.clone()
    }

    fn check(&self) -> Result<(), String> {
        require("claimant_id", &self.claimant_id)?;
        require("name", &self.name)?;
        require("address", &self.address)?;
        require("phone", &self.phone)?;
        ring_fields_agree(self.is_fraud_ring, &self.fraud_ring_id)
    }
}

impl Validate for Policy {
    const ENTITY: &'static str = "policy";

    fn key(&self) -> String {
        self.policy_id.clone()
    }

    fn check(&self) -> Result<(), String> {
        require("policy_id", &self.policy_id)?;
        require("claimant_id", &self.claimant_id)?;
        if !self.premium.is_finite() || self.premium < 0.0 {
            return Err(format!("premium {} is not a non-negative amount", self.premium));
        }
        if self.end_date < self.start_date {
            return Err("end_date precedes start_date".into());
        }
        Ok(())
    }
}

impl Validate for Vehicle {
    const ENTITY: &'static str = "vehicle";

    fn key(&self) -> String {
        self.vehicle_id.clone()
    }

    fn check(&self) -> Result<(), String> {
        require("vehicle_id", &self.vehicle_id)?;
        require("policy_id", &self.policy_id)?;
        if self.vin.len() != 17 || !self.vin.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!("vin '{}' is not 17 alphanumerics", self.vin));
        }
        if !(1900..=2100).contains(&self.year) {
            return Err(format!("model year {} out of range", self.year));
        }
        Ok(())
    }
}

impl Validate for RepairShop {
    const ENTITY: &'static str = "repair_shop";

    fn key(&self) -> String {
        self.shop_id.clone()
    }

    fn check(&self) -> Result<(), String> {
        require("shop_id", &self.shop_id)?;
        require("name", &self.name)
    }
}

impl Validate for MedicalProvider {
    const ENTITY: &'static str = "medical_provider";

    fn key(&self) -> String {
        self.provider_id.clone()
    }

    fn check(&self) -> Result<(), String> {
        require("provider_id", &self.provider_id)?;
        require("name", &self.name)
    }
}

impl Validate for Lawyer {
    const ENTITY: &'static str = "lawyer";

    fn key(&self) -> String {
        self.lawyer_id.clone()
    }

    fn check(&self) -> Result<(), String> {
        require("lawyer_id", &self.lawyer_id)?;
        require("name", &self.name)
    }
}

impl Validate for Claim {
    const ENTITY: &'static str = "claim";

    fn key(&self) -> String {
        self.claim_id.clone()
    }

    fn check(&self) -> Result<(), String> {
        require("claim_id", &self.claim_id)?;
        require("claimant_id", &self.claimant_id)?;
        require("policy_id", &self.policy_id)?;
        require("vehicle_id", &self.vehicle_id)?;
        require("repair_shop_id", &self.repair_shop_id)?;
        if !self.claim_amount.is_finite() || self.claim_amount <= 0.0 {
            return Err(format!("claim_amount {} is not positive", self.claim_amount));
        }
        if self.claim_date < self.incident_date {
            return Err("claim_date precedes incident_date".into());
        }
        if self.claim_date > self.incident_date + Duration::days(MAX_FILING_DELAY_DAYS) {
            return Err(format!(
                "claim filed more than {MAX_FILING_DELAY_DAYS} days after the incident"
            ));
        }
        ring_fields_agree(self.is_fraud_ring, &self.fraud_ring_id)
    }
}

impl Validate for Witness {
    const ENTITY: &'static str = "witness";

    fn key(&self) -> String {
        self.witness_id.clone()
    }

    fn check(&self) -> Result<(), String> {
        require("witness_id", &self.witness_id)?;
        require("name", &self.name)
    }
}

impl Validate for ClaimWitness {
    const ENTITY: &'static str = "claim_witness";

    fn key(&self) -> String {
        format!("{}->{}", self.claim_id, self.witness_id)
    }

    fn check(&self) -> Result<(), String> {
        require("claim_id", &self.claim_id)?;
        require("witness_id", &self.witness_id)
    }
}

impl Validate for ClaimantRelationship {
    const ENTITY: &'static str = "claimant_relationship";

    fn key(&self) -> String {
        format!("{}->{}", self.from_claimant, self.to_claimant)
    }

    fn check(&self) -> Result<(), String> {
        require("from_claimant", &self.from_claimant)?;
        require("to_claimant", &self.to_claimant)?;
        require("ring_id", &self.ring_id)?;
        if self.from_claimant == self.to_claimant {
            return Err("a claimant cannot be related to itself".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim_json(provider: &str) -> String {
        format!(
            r#"{{"claim_id":"CLAIM_0","claim_number":"CN1","claimant_id":"CLM_LEG_0",
            "policy_id":"POL_CLM_LEG_0_0","vehicle_id":"VEH_POL_CLM_LEG_0_0",
            "claim_date":"2024-06-03","incident_date":"2024-06-01","claim_amount":1200.5,
            "claim_type":"Collision","status":"Open","description":"d","location":"Tulsa",
            "weather_condition":"Rain","repair_shop_id":"SHOP_7",
            "medical_provider_id":{provider},"lawyer_id":null,
            "is_fraud_ring":false,"fraud_ring_id":null}}"#
        )
    }

    #[test]
    fn absent_markers_all_read_as_none() {
        for marker in [r#"null"#, r#""""#, r#""NaN""#, r#""nan""#, r#""None""#] {
            let claim: Claim = serde_json::from_str(&claim_json(marker)).unwrap();
            assert_eq!(claim.medical_provider_id, None, "marker {marker}");
            claim.validate().unwrap();
        }
    }

    #[test]
    fn present_optional_id_is_kept() {
        let claim: Claim = serde_json::from_str(&claim_json(r#""MED_3""#)).unwrap();
        assert_eq!(claim.medical_provider_id.as_deref(), Some("MED_3"));
    }

    #[test]
    fn enums_use_display_labels_on_the_wire() {
        let json = serde_json::to_string(&ClaimType::PersonalInjuryProtection).unwrap();
        assert_eq!(json, "\"Personal Injury Protection\"");
        let role: WitnessRole = serde_json::from_str("\"Other Driver\"").unwrap();
        assert_eq!(role, WitnessRole::OtherDriver);
    }

    #[test]
    fn late_filing_is_rejected() {
        let mut claim: Claim = serde_json::from_str(&claim_json("null")).unwrap();
        claim.claim_date = claim.incident_date + Duration::days(8);
        assert!(claim.validate().is_err());
        claim.claim_date = claim.incident_date - Duration::days(1);
        assert!(claim.validate().is_err());
    }

    #[test]
    fn ring_flag_and_id_must_agree() {
        let mut claim: Claim = serde_json::from_str(&claim_json("null")).unwrap();
        claim.is_fraud_ring = true;
        let err = claim.validate().unwrap_err();
        assert!(err.to_string().contains("ring id"), "{err}");
    }
}
