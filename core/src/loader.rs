//! Graph loader: projects the generated tables into the graph store.
//!
//! EXECUTION ORDER (every edge's endpoints exist before the edge):
//!   1. claimants
//!   2. policies            + HAS_POLICY
//!   3. vehicles            + INSURED_BY
//!   4. repair shops, medical providers, lawyers, witnesses
//!   5. claims              + FILED_CLAIM, UNDER_POLICY, INVOLVES_VEHICLE,
//!                            REPAIRED_AT, TREATED_BY?, REPRESENTED_BY?
//!   6. claim witnesses     HAS_WITNESS
//!   7. relationships       RELATED_TO
//!   8. derived edges       SHARES_ADDRESS, SHARES_PHONE
//!
//! RULES:
//!   - A missing table file is logged and that entity type is skipped.
//!   - A row that fails validation is logged and not loaded.
//!   - A failed batch aborts the load. Nothing is retried here; the caller
//!     resets the store and runs the whole load again.

use crate::{
    config::LoaderConfig,
    derived::infer_shared_attributes,
    error::NetResult,
    graph::{GraphBatch, GraphRow},
    model::{
        Claim, ClaimWitness, Claimant, ClaimantRelationship, Lawyer, MedicalProvider, Policy,
        RepairShop, Vehicle, Validate, Witness,
    },
    report::{EntityLoad, LoadReport},
    store::GraphStore,
    table::{read_rows, Table},
};
use serde::de::DeserializeOwned;
use std::path::Path;
use uuid::Uuid;

pub struct GraphLoader<'s> {
    config: LoaderConfig,
    store: &'s mut GraphStore,
    load_id: String,
}

impl<'s> GraphLoader<'s> {
    pub fn new(config: LoaderConfig, store: &'s mut GraphStore) -> Self {
        Self {
            config,
            store,
            load_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn load_id(&self) -> &str {
        &self.load_id
    }

    /// Load every table from the data directory, then infer derived edges.
    pub fn run(&mut self) -> NetResult<LoadReport> {
        log::info!(
            "load_id={} start: data_dir={} batch_size={}",
            self.load_id,
            self.config.data_dir,
            self.config.batch_size
        );
        self.store.ensure_schema()?;

        let entities = vec![
            self.load_table::<Claimant>(Table::Claimants)?,
            self.load_table::<Policy>(Table::Policies)?,
            self.load_table::<Vehicle>(Table::Vehicles)?,
            self.load_table::<RepairShop>(Table::RepairShops)?,
            self.load_table::<MedicalProvider>(Table::MedicalProviders)?,
            self.load_table::<Lawyer>(Table::Lawyers)?,
            self.load_table::<Witness>(Table::Witnesses)?,
            self.load_table::<Claim>(Table::Claims)?,
            self.load_table::<ClaimWitness>(Table::ClaimWitnesses)?,
            self.load_table::<ClaimantRelationship>(Table::ClaimantRelationships)?,
        ];

        let derived = infer_shared_attributes(self.store, self.config.inference)?;
        log::info!("load_id={} done", self.load_id);

        Ok(LoadReport {
            load_id: self.load_id.clone(),
            entities,
            shares_address: derived.shares_address,
            shares_phone: derived.shares_phone,
        })
    }

    fn load_table<T>(&mut self, table: Table) -> NetResult<EntityLoad>
    where
        T: DeserializeOwned + Validate + GraphRow,
    {
        let path = table.path_in(Path::new(&self.config.data_dir));
        match read_rows::<T>(&path)? {
            Some(rows) => self.load_rows(table.name(), &rows),
            None => {
                log::error!(
                    "load_id={} {}: file not found: {}; skipping",
                    self.load_id,
                    table.name(),
                    path.display()
                );
                Ok(EntityLoad {
                    entity: table.name().to_string(),
                    attempted: 0,
                    loaded: 0,
                    edges: 0,
                    skipped: true,
                })
            }
        }
    }

    /// Write `rows` in chunks of `batch_size`, one transaction per chunk.
    pub fn load_rows<T>(&mut self, entity: &str, rows: &[T]) -> NetResult<EntityLoad>
    where
        T: Validate + GraphRow,
    {
        let batch_size = self.config.batch_size.max(1);
        let progress_every = self.config.progress_every.max(1);
        let mut report = EntityLoad {
            entity: entity.to_string(),
            attempted: rows.len(),
            loaded: 0,
            edges: 0,
            skipped: false,
        };

        let mut processed = 0;
        for chunk in rows.chunks(batch_size) {
            let mut batch = GraphBatch::default();
            let mut accepted = 0;
            for row in chunk {
                if let Err(e) = row.validate() {
                    log::warn!("load_id={} {entity}: rejected row: {e}", self.load_id);
                    continue;
                }
                batch.nodes.extend(row.node());
                batch.edges.extend(row.edges());
                accepted += 1;
            }

            if !batch.is_empty() {
                let outcome = self.store.write_batch(&batch)?;
                report.edges += outcome.edges;
            }
            report.loaded += accepted;

            let before = processed;
            processed += chunk.len();
            if processed / progress_every > before / progress_every {
                log::info!(
                    "load_id={} {entity}: processed {processed}/{}",
                    self.load_id,
                    rows.len()
                );
            }
        }

        log::info!(
            "load_id={} {entity}: attempted={} loaded={} edges={}",
            self.load_id,
            report.attempted,
            report.loaded,
            report.edges
        );
        Ok(report)
    }
}
