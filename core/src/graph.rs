//! Projection of table rows onto property-graph nodes and edges.
//!
//! Each entity row becomes one node. Foreign keys on the row become edges
//! and are not repeated as node properties. An absent optional foreign key
//! produces no edge.

use crate::model::{
    Claim, ClaimWitness, Claimant, ClaimantRelationship, Lawyer, MedicalProvider, Policy,
    RepairShop, Vehicle, Witness,
};
use serde_json::{json, Map, Value};

pub type Props = Map<String, Value>;

// ── Schema ─────────────────────────────────────────────────────────

pub mod label {
    pub const CLAIMANT: &str = "Claimant";
    pub const POLICY: &str = "Policy";
    pub const VEHICLE: &str = "Vehicle";
    pub const CLAIM: &str = "Claim";
    pub const REPAIR_SHOP: &str = "RepairShop";
    pub const MEDICAL_PROVIDER: &str = "MedicalProvider";
    pub const LAWYER: &str = "Lawyer";
    pub const WITNESS: &str = "Witness";
}

pub mod rel {
    pub const HAS_POLICY: &str = "HAS_POLICY";
    pub const INSURED_BY: &str = "INSURED_BY";
    pub const FILED_CLAIM: &str = "FILED_CLAIM";
    pub const UNDER_POLICY: &str = "UNDER_POLICY";
    pub const INVOLVES_VEHICLE: &str = "INVOLVES_VEHICLE";
    pub const REPAIRED_AT: &str = "REPAIRED_AT";
    pub const TREATED_BY: &str = "TREATED_BY";
    pub const REPRESENTED_BY: &str = "REPRESENTED_BY";
    pub const HAS_WITNESS: &str = "HAS_WITNESS";
    pub const RELATED_TO: &str = "RELATED_TO";
    pub const SHARES_ADDRESS: &str = "SHARES_ADDRESS";
    pub const SHARES_PHONE: &str = "SHARES_PHONE";

    /// Edge types that are inferred rather than loaded.
    pub const DERIVED: [&str; 2] = [SHARES_ADDRESS, SHARES_PHONE];
}

/// Uniqueness constraints: the key property of every node label.
pub const CONSTRAINTS: [(&str, &str); 8] = [
    (label::CLAIMANT, "claimant_id"),
    (label::POLICY, "policy_id"),
    (label::VEHICLE, "vehicle_id"),
    (label::CLAIM, "claim_id"),
    (label::REPAIR_SHOP, "shop_id"),
    (label::MEDICAL_PROVIDER, "provider_id"),
    (label::LAWYER, "lawyer_id"),
    (label::WITNESS, "witness_id"),
];

/// Secondary lookup indexes, (label, property).
pub const INDEXES: [(&str, &str); 3] = [
    (label::CLAIMANT, "name"),
    (label::CLAIM, "claim_date"),
    (label::CLAIMANT, "fraud_ring_id"),
];

// ── Batch payloads ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeRef {
    pub label: &'static str,
    pub key: String,
}

impl NodeRef {
    pub fn new(label: &'static str, key: impl Into<String>) -> Self {
        Self {
            label,
            key: key.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub label: &'static str,
    pub props: Props,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub rel_type: &'static str,
    pub from: NodeRef,
    pub to: NodeRef,
    pub props: Props,
}

impl EdgeSpec {
    pub fn new(rel_type: &'static str, from: NodeRef, to: NodeRef) -> Self {
        Self {
            rel_type,
            from,
            to,
            props: Props::new(),
        }
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }
}

/// One atomic unit of work: nodes first, then edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphBatch {
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
}

impl GraphBatch {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// A JSON number, or explicit absence for NaN and infinities.
pub fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// An object literal as a property map.
fn props(value: Value) -> Props {
    match value {
        Value::Object(map) => map,
        _ => Props::new(),
    }
}

// ── Row projection ─────────────────────────────────────────────────

/// What a table row contributes to the graph.
pub trait GraphRow {
    fn node(&self) -> Option<NodeSpec> {
        None
    }

    fn edges(&self) -> Vec<EdgeSpec> {
        Vec::new()
    }
}

impl GraphRow for Claimant {
    fn node(&self) -> Option<NodeSpec> {
        Some(NodeSpec {
            label: label::CLAIMANT,
            props: props(json!({
                "claimant_id": self.claimant_id,
                "name": self.name,
                "national_id": self.national_id,
                "dob": self.dob.to_string(),
                "address": self.address,
                "phone": self.phone,
                "email": self.email,
                "license_number": self.license_number,
                "is_fraud_ring": self.is_fraud_ring,
                "fraud_ring_id": self.fraud_ring_id,
            })),
        })
    }
}

impl GraphRow for Policy {
    fn node(&self) -> Option<NodeSpec> {
        Some(NodeSpec {
            label: label::POLICY,
            props: props(json!({
                "policy_id": self.policy_id,
                "policy_number": self.policy_number,
                "start_date": self.start_date.to_string(),
                "end_date": self.end_date.to_string(),
                "premium": number(self.premium),
                "coverage_type": self.coverage_type.as_str(),
            })),
        })
    }

    fn edges(&self) -> Vec<EdgeSpec> {
        vec![EdgeSpec::new(
            rel::HAS_POLICY,
            NodeRef::new(label::CLAIMANT, &self.claimant_id),
            NodeRef::new(label::POLICY, &self.policy_id),
        )]
    }
}

impl GraphRow for Vehicle {
    fn node(&self) -> Option<NodeSpec> {
        Some(NodeSpec {
            label: label::VEHICLE,
            props: props(json!({
                "vehicle_id": self.vehicle_id,
                "vin": self.vin,
                "make": self.make,
                "model": self.model,
                "year": self.year,
                "color": self.color,
                "license_plate": self.license_plate,
            })),
        })
    }

    fn edges(&self) -> Vec<EdgeSpec> {
        vec![EdgeSpec::new(
            rel::INSURED_BY,
            NodeRef::new(label::VEHICLE, &self.vehicle_id),
            NodeRef::new(label::POLICY, &self.policy_id),
        )]
    }
}

impl GraphRow for RepairShop {
    fn node(&self) -> Option<NodeSpec> {
        Some(NodeSpec {
            label: label::REPAIR_SHOP,
            props: props(json!({
                "shop_id": self.shop_id,
                "name": self.name,
                "address": self.address,
                "phone": self.phone,
                "license_number": self.license_number,
                "is_fraud_involved": self.is_fraud_involved,
            })),
        })
    }
}

impl GraphRow for MedicalProvider {
    fn node(&self) -> Option<NodeSpec> {
        Some(NodeSpec {
            label: label::MEDICAL_PROVIDER,
            props: props(json!({
                "provider_id": self.provider_id,
                "name": self.name,
                "specialty": self.specialty,
                "address": self.address,
                "phone": self.phone,
                "npi_number": self.npi_number,
                "is_fraud_involved": self.is_fraud_involved,
            })),
        })
    }
}

impl GraphRow for Lawyer {
    fn node(&self) -> Option<NodeSpec> {
        Some(NodeSpec {
            label: label::LAWYER,
            props: props(json!({
                "lawyer_id": self.lawyer_id,
                "name": self.name,
                "bar_number": self.bar_number,
                "firm_name": self.firm_name,
                "address": self.address,
                "phone": self.phone,
                "is_fraud_involved": self.is_fraud_involved,
            })),
        })
    }
}

impl GraphRow for Witness {
    fn node(&self) -> Option<NodeSpec> {
        Some(NodeSpec {
            label: label::WITNESS,
            props: props(json!({
                "witness_id": self.witness_id,
                "name": self.name,
                "phone": self.phone,
                "address": self.address,
                "is_recurring": self.is_recurring,
            })),
        })
    }
}

impl GraphRow for Claim {
    fn node(&self) -> Option<NodeSpec> {
        Some(NodeSpec {
            label: label::CLAIM,
            props: props(json!({
                "claim_id": self.claim_id,
                "claim_number": self.claim_number,
                "claim_date": self.claim_date.to_string(),
                "incident_date": self.incident_date.to_string(),
                "claim_amount": number(self.claim_amount),
                "claim_type": self.claim_type.as_str(),
                "status": self.status.as_str(),
                "description": self.description,
                "location": self.location,
                "weather_condition": self.weather_condition.as_str(),
                "is_fraud_ring": self.is_fraud_ring,
                "fraud_ring_id": self.fraud_ring_id,
            })),
        })
    }

    fn edges(&self) -> Vec<EdgeSpec> {
        let claim = NodeRef::new(label::CLAIM, &self.claim_id);
        let mut edges = vec![
            EdgeSpec::new(
                rel::FILED_CLAIM,
                NodeRef::new(label::CLAIMANT, &self.claimant_id),
                claim.clone(),
            ),
            EdgeSpec::new(
                rel::UNDER_POLICY,
                claim.clone(),
                NodeRef::new(label::POLICY, &self.policy_id),
            ),
            EdgeSpec::new(
                rel::INVOLVES_VEHICLE,
                claim.clone(),
                NodeRef::new(label::VEHICLE, &self.vehicle_id),
            ),
            EdgeSpec::new(
                rel::REPAIRED_AT,
                claim.clone(),
                NodeRef::new(label::REPAIR_SHOP, &self.repair_shop_id),
            ),
        ];
        if let Some(provider) = &self.medical_provider_id {
            edges.push(EdgeSpec::new(
                rel::TREATED_BY,
                claim.clone(),
                NodeRef::new(label::MEDICAL_PROVIDER, provider),
            ));
        }
        if let Some(lawyer) = &self.lawyer_id {
            edges.push(EdgeSpec::new(
                rel::REPRESENTED_BY,
                claim,
                NodeRef::new(label::LAWYER, lawyer),
            ));
        }
        edges
    }
}

impl GraphRow for ClaimWitness {
    fn edges(&self) -> Vec<EdgeSpec> {
        vec![EdgeSpec::new(
            rel::HAS_WITNESS,
            NodeRef::new(label::CLAIM, &self.claim_id),
            NodeRef::new(label::WITNESS, &self.witness_id),
        )
        .with_props(props(json!({ "role": self.role.as_str() })))]
    }
}

impl GraphRow for ClaimantRelationship {
    fn edges(&self) -> Vec<EdgeSpec> {
        vec![EdgeSpec::new(
            rel::RELATED_TO,
            NodeRef::new(label::CLAIMANT, &self.from_claimant),
            NodeRef::new(label::CLAIMANT, &self.to_claimant),
        )
        .with_props(props(json!({
            "type": self.relationship_type.as_str(),
            "ring_id": self.ring_id,
        })))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_numbers_become_null() {
        assert_eq!(number(f64::NAN), Value::Null);
        assert_eq!(number(f64::INFINITY), Value::Null);
        assert_eq!(number(12.5), json!(12.5));
    }

    #[test]
    fn relationship_edge_carries_type_and_ring() {
        let rel = ClaimantRelationship {
            from_claimant: "CLM_RING_0_0".into(),
            to_claimant: "CLM_RING_0_3".into(),
            relationship_type: crate::model::RelationshipType::Friend,
            ring_id: "RING_0".into(),
        };
        let edges = rel.edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].props["type"], json!("friend"));
        assert_eq!(edges[0].props["ring_id"], json!("RING_0"));
        assert!(rel.node().is_none());
    }
}
