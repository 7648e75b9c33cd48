use super::GraphStore;
use crate::{
    error::{FraudNetError, NetResult},
    graph::{label, rel},
    types::EntityId,
};
use rusqlite::params;

/// The contact attributes of one loaded claimant node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimantContact {
    pub claimant_id: EntityId,
    pub address: String,
    pub phone: String,
}

impl GraphStore {
    // ── Derived edges ─────────────────────────────────────────────

    /// Every claimant node with its address and phone, ordered by id.
    pub fn claimant_contacts(&self) -> NetResult<Vec<ClaimantContact>> {
        let mut stmt = self.conn.prepare(
            "SELECT node_key,
                    COALESCE(json_extract(props, '$.address'), ''),
                    COALESCE(json_extract(props, '$.phone'), '')
             FROM node WHERE label = ?1
             ORDER BY node_key",
        )?;
        let rows = stmt.query_map(params![label::CLAIMANT], |row| {
            Ok(ClaimantContact {
                claimant_id: row.get(0)?,
                address: row.get(1)?,
                phone: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Create one `rel_type` edge per claimant pair unless it already exists.
    /// Returns how many edges were new.
    pub fn merge_derived_edges(
        &mut self,
        rel_type: &str,
        pairs: &[(EntityId, EntityId)],
    ) -> NetResult<usize> {
        if !rel::DERIVED.contains(&rel_type) {
            return Err(FraudNetError::InvalidConfig(format!(
                "{rel_type} is not a derived relationship type"
            )));
        }

        let tx = self.conn.transaction()?;
        let mut created = 0;
        {
            let mut merge = tx.prepare_cached(
                "INSERT OR IGNORE INTO edge (rel_type, src, dst)
                 SELECT ?1, a.node_id, b.node_id
                 FROM node a, node b
                 WHERE a.label = ?2 AND a.node_key = ?3
                   AND b.label = ?2 AND b.node_key = ?4",
            )?;
            for (from, to) in pairs {
                created += merge.execute(params![rel_type, label::CLAIMANT, from, to])?;
            }
        }
        tx.commit()?;
        Ok(created)
    }

    /// `(from_key, to_key)` of every edge of one type, ordered.
    pub fn edges_of_type(&self, rel_type: &str) -> NetResult<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.node_key, b.node_key
             FROM edge e
             JOIN node a ON a.node_id = e.src
             JOIN node b ON b.node_id = e.dst
             WHERE e.rel_type = ?1
             ORDER BY a.node_key, b.node_key",
        )?;
        let rows = stmt.query_map(params![rel_type], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loaded_edge_types_cannot_be_merged() {
        let mut store = GraphStore::in_memory().unwrap();
        store.migrate().unwrap();
        let err = store
            .merge_derived_edges(rel::FILED_CLAIM, &[])
            .unwrap_err();
        assert!(matches!(err, FraudNetError::InvalidConfig(_)));
    }
}
