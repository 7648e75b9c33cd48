use super::GraphStore;
use crate::{
    error::NetResult,
    graph::{label, rel},
    report::{GraphSummary, BUSY_SHOP_CLAIMS},
};
use rusqlite::params;
use serde_json::Value;
use std::collections::BTreeMap;

impl GraphStore {
    // ── Census ────────────────────────────────────────────────────

    pub fn graph_summary(&self) -> NetResult<GraphSummary> {
        let nodes_by_label = self.grouped_counts("SELECT label, COUNT(*) FROM node GROUP BY label")?;
        let edges_by_type =
            self.grouped_counts("SELECT rel_type, COUNT(*) FROM edge GROUP BY rel_type")?;

        let ring_members = {
            let mut stmt = self.conn.prepare(
                "SELECT json_extract(props, '$.fraud_ring_id'), COUNT(*)
                 FROM node
                 WHERE label = ?1 AND json_extract(props, '$.is_fraud_ring') = 1
                 GROUP BY 1",
            )?;
            let rows = stmt.query_map(params![label::CLAIMANT], |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    row.get::<_, i64>(1)? as usize,
                ))
            })?;
            rows.collect::<Result<BTreeMap<_, _>, _>>()?
        };

        let (busy_repair_shops, max_claims_at_one_shop): (i64, Option<i64>) = self.conn.query_row(
            "SELECT COUNT(*), MAX(n) FROM (
                 SELECT dst, COUNT(*) AS n FROM edge WHERE rel_type = ?1 GROUP BY dst
             ) WHERE n >= ?2",
            params![rel::REPAIRED_AT, BUSY_SHOP_CLAIMS as i64],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;

        let orphan_nodes: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM node n
             WHERE NOT EXISTS (SELECT 1 FROM edge e WHERE e.src = n.node_id OR e.dst = n.node_id)",
            [],
            |r| r.get(0),
        )?;

        Ok(GraphSummary {
            total_nodes: nodes_by_label.values().sum(),
            total_edges: edges_by_type.values().sum(),
            nodes_by_label,
            edges_by_type,
            ring_members,
            claimants_sharing_address: self.claimants_with(rel::SHARES_ADDRESS)?,
            claimants_sharing_phone: self.claimants_with(rel::SHARES_PHONE)?,
            busy_repair_shops: busy_repair_shops as usize,
            max_claims_at_one_shop: max_claims_at_one_shop.unwrap_or(0) as usize,
            orphan_nodes: orphan_nodes as usize,
        })
    }

    /// Properties of one node, if it exists.
    pub fn node_props(&self, label: &str, key: &str) -> NetResult<Option<Value>> {
        use rusqlite::OptionalExtension;
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT props FROM node WHERE label = ?1 AND node_key = ?2",
                params![label, key],
                |r| r.get(0),
            )
            .optional()?;
        raw.map(|s| serde_json::from_str(&s).map_err(Into::into))
            .transpose()
    }

    /// Outgoing edges of one type from a node, as `(target_key, props)`.
    pub fn outgoing(&self, label: &str, key: &str, rel_type: &str) -> NetResult<Vec<(String, Value)>> {
        let mut stmt = self.conn.prepare(
            "SELECT b.node_key, e.props
             FROM edge e
             JOIN node a ON a.node_id = e.src
             JOIN node b ON b.node_id = e.dst
             WHERE a.label = ?1 AND a.node_key = ?2 AND e.rel_type = ?3
             ORDER BY b.node_key",
        )?;
        let rows = stmt.query_map(params![label, key, rel_type], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (target, props) = row?;
            out.push((target, serde_json::from_str(&props)?));
        }
        Ok(out)
    }

    /// Distinct claimants touching at least one edge of `rel_type`.
    fn claimants_with(&self, rel_type: &str) -> NetResult<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM (
                 SELECT src AS id FROM edge WHERE rel_type = ?1
                 UNION
                 SELECT dst FROM edge WHERE rel_type = ?1
             )",
            params![rel_type],
            |r| r.get(0),
        )?;
        Ok(n as usize)
    }

    fn grouped_counts(&self, sql: &str) -> NetResult<BTreeMap<String, usize>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
        })?;
        rows.collect::<Result<BTreeMap<_, _>, _>>().map_err(Into::into)
    }
}
