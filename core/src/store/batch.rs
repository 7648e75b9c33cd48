use super::GraphStore;
use crate::{
    error::{FraudNetError, NetResult},
    graph::{GraphBatch, NodeRef, NodeSpec},
};
use rusqlite::{params, OptionalExtension, Transaction};
use serde_json::Value;
use std::collections::BTreeMap;

/// What one committed batch created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub nodes: usize,
    pub edges: usize,
}

impl GraphStore {
    // ── Batch writes ──────────────────────────────────────────────

    /// Apply one batch atomically: every node, then every edge.
    ///
    /// Nodes are created, never merged, so a key that already exists fails
    /// the whole batch. An edge whose endpoint is missing fails the whole
    /// batch with `Referential`.
    pub fn write_batch(&mut self, batch: &GraphBatch) -> NetResult<BatchOutcome> {
        let tx = self.conn.transaction()?;
        let mut key_properties: BTreeMap<&'static str, String> = BTreeMap::new();
        let mut outcome = BatchOutcome::default();

        {
            let mut insert_node = tx.prepare_cached(
                "INSERT INTO node (label, node_key, props) VALUES (?1, ?2, ?3)",
            )?;
            for node in &batch.nodes {
                if !key_properties.contains_key(node.label) {
                    let key = constraint_of(&tx, node.label)?;
                    key_properties.insert(node.label, key);
                }
                let key_property = &key_properties[node.label];
                let key = node_key(node, key_property)?;
                insert_node.execute(params![
                    node.label,
                    key,
                    Value::Object(node.props.clone()).to_string()
                ])?;
                outcome.nodes += 1;
            }
        }

        {
            let mut insert_edge = tx.prepare_cached(
                "INSERT INTO edge (rel_type, src, dst, props) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for edge in &batch.edges {
                let src = resolve(&tx, edge.rel_type, &edge.from)?;
                let dst = resolve(&tx, edge.rel_type, &edge.to)?;
                insert_edge.execute(params![
                    edge.rel_type,
                    src,
                    dst,
                    Value::Object(edge.props.clone()).to_string()
                ])?;
                outcome.edges += 1;
            }
        }

        tx.commit()?;
        Ok(outcome)
    }
}

fn constraint_of(tx: &Transaction<'_>, label: &str) -> NetResult<String> {
    tx.query_row(
        "SELECT key_property FROM node_constraint WHERE label = ?1",
        params![label],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| FraudNetError::UnconstrainedLabel(label.to_string()))
}

fn node_key(node: &NodeSpec, key_property: &str) -> NetResult<String> {
    match node.props.get(key_property) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(FraudNetError::InvalidRecord {
            entity: node.label,
            id: String::new(),
            reason: format!("missing key property {key_property}"),
        }),
    }
}

fn lookup(conn: &rusqlite::Connection, node: &NodeRef) -> NetResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT node_id FROM node WHERE label = ?1 AND node_key = ?2",
            params![node.label, node.key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(id)
}

fn resolve(tx: &Transaction<'_>, rel_type: &str, node: &NodeRef) -> NetResult<i64> {
    lookup(tx, node)?.ok_or_else(|| FraudNetError::Referential {
        rel_type: rel_type.to_string(),
        label: node.label.to_string(),
        key: node.key.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{label, rel, EdgeSpec, Props};
    use serde_json::json;

    fn store() -> GraphStore {
        let store = GraphStore::in_memory().unwrap();
        store.migrate().unwrap();
        store.ensure_schema().unwrap();
        store
    }

    fn claimant(id: &str) -> NodeSpec {
        let mut props = Props::new();
        props.insert("claimant_id".into(), json!(id));
        NodeSpec {
            label: label::CLAIMANT,
            props,
        }
    }

    #[test]
    fn failed_edge_rolls_back_whole_batch() {
        let mut store = store();
        let batch = GraphBatch {
            nodes: vec![claimant("CLM_LEG_0")],
            edges: vec![EdgeSpec::new(
                rel::HAS_POLICY,
                NodeRef::new(label::CLAIMANT, "CLM_LEG_0"),
                NodeRef::new(label::POLICY, "POL_CLM_LEG_0_0"),
            )],
        };
        let err = store.write_batch(&batch).unwrap_err();
        assert!(matches!(err, FraudNetError::Referential { .. }));
        assert_eq!(store.node_props(label::CLAIMANT, "CLM_LEG_0").unwrap(), None);
    }

    #[test]
    fn unconstrained_label_is_rejected() {
        let mut store = GraphStore::in_memory().unwrap();
        store.migrate().unwrap();
        let err = store
            .write_batch(&GraphBatch {
                nodes: vec![claimant("CLM_LEG_0")],
                edges: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, FraudNetError::UnconstrainedLabel(l) if l == "Claimant"));
    }

    #[test]
    fn duplicate_node_key_fails() {
        let mut store = store();
        let batch = GraphBatch {
            nodes: vec![claimant("CLM_LEG_0")],
            edges: vec![],
        };
        assert_eq!(store.write_batch(&batch).unwrap().nodes, 1);
        assert!(matches!(
            store.write_batch(&batch),
            Err(FraudNetError::Database(_))
        ));
    }
}
