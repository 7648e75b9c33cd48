//! Flat-file interchange: one JSON Lines file per table plus `summary.json`.
//!
//! Each line is one row; keys are the record's column names. Files are
//! written in generation order so identical datasets give identical bytes.

use crate::{
    dataset::{Dataset, GenerationSummary},
    error::{FraudNetError, NetResult},
};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Table {
    Claimants,
    Policies,
    Vehicles,
    RepairShops,
    MedicalProviders,
    Lawyers,
    Witnesses,
    Claims,
    ClaimWitnesses,
    ClaimantRelationships,
}

impl Table {
    pub const ALL: [Table; 10] = [
        Table::Claimants,
        Table::Policies,
        Table::Vehicles,
        Table::RepairShops,
        Table::MedicalProviders,
        Table::Lawyers,
        Table::Witnesses,
        Table::Claims,
        Table::ClaimWitnesses,
        Table::ClaimantRelationships,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Claimants => "claimants",
            Self::Policies => "policies",
            Self::Vehicles => "vehicles",
            Self::RepairShops => "repair_shops",
            Self::MedicalProviders => "medical_providers",
            Self::Lawyers => "lawyers",
            Self::Witnesses => "witnesses",
            Self::Claims => "claims",
            Self::ClaimWitnesses => "claim_witnesses",
            Self::ClaimantRelationships => "claimant_relationships",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.jsonl", self.name())
    }

    pub fn path_in(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(self.file_name())
    }
}

pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> NetResult<()> {
    let display = path.display().to_string();
    let file = File::create(path).map_err(|e| FraudNetError::io(&display, e))?;
    let mut out = BufWriter::new(file);
    for row in rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n").map_err(|e| FraudNetError::io(&display, e))?;
    }
    out.flush().map_err(|e| FraudNetError::io(&display, e))?;
    Ok(())
}

/// Read every row of a table file. `Ok(None)` when the file does not exist.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> NetResult<Option<Vec<T>>> {
    let display = path.display().to_string();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(FraudNetError::io(display, e)),
    };

    let mut rows = Vec::new();
    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| FraudNetError::io(&display, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let row = serde_json::from_str(&line)
            .map_err(|e| anyhow::anyhow!("{display} line {}: {e}", n + 1))?;
        rows.push(row);
    }
    Ok(Some(rows))
}

impl Dataset {
    /// Write every table and the summary record into `dir`, creating it.
    pub fn write_tables(&self, dir: impl AsRef<Path>) -> NetResult<GenerationSummary> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| FraudNetError::io(dir.display().to_string(), e))?;

        write_rows(&Table::Claimants.path_in(dir), &self.claimants)?;
        write_rows(&Table::Policies.path_in(dir), &self.policies)?;
        write_rows(&Table::Vehicles.path_in(dir), &self.vehicles)?;
        write_rows(&Table::RepairShops.path_in(dir), &self.repair_shops)?;
        write_rows(&Table::MedicalProviders.path_in(dir), &self.medical_providers)?;
        write_rows(&Table::Lawyers.path_in(dir), &self.lawyers)?;
        write_rows(&Table::Witnesses.path_in(dir), &self.witnesses)?;
        write_rows(&Table::Claims.path_in(dir), &self.claims)?;
        write_rows(&Table::ClaimWitnesses.path_in(dir), &self.claim_witnesses)?;
        write_rows(&Table::ClaimantRelationships.path_in(dir), &self.claimant_relationships)?;

        let summary = self.summary();
        let summary_path = dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(&summary_path, json)
            .map_err(|e| FraudNetError::io(summary_path.display().to_string(), e))?;
        log::info!("wrote {} tables to {}", Table::ALL.len(), dir.display());
        Ok(summary)
    }

    /// Read a complete table set back. Every table file must exist.
    pub fn read_tables(dir: impl AsRef<Path>) -> NetResult<Self> {
        let dir = dir.as_ref();
        fn required<T: DeserializeOwned>(dir: &Path, table: Table) -> NetResult<Vec<T>> {
            let path = table.path_in(dir);
            read_rows(&path)?.ok_or_else(|| {
                FraudNetError::io(
                    path.display().to_string(),
                    std::io::Error::from(std::io::ErrorKind::NotFound),
                )
            })
        }

        let claims: Vec<crate::model::Claim> = required(dir, Table::Claims)?;
        let claim_witnesses: Vec<crate::model::ClaimWitness> = required(dir, Table::ClaimWitnesses)?;
        let witnessed: std::collections::BTreeSet<&str> =
            claim_witnesses.iter().map(|cw| cw.claim_id.as_str()).collect();
        let unwitnessed_claims = claims
            .iter()
            .filter(|c| !witnessed.contains(c.claim_id.as_str()))
            .count();

        Ok(Dataset {
            claimants: required(dir, Table::Claimants)?,
            policies: required(dir, Table::Policies)?,
            vehicles: required(dir, Table::Vehicles)?,
            repair_shops: required(dir, Table::RepairShops)?,
            medical_providers: required(dir, Table::MedicalProviders)?,
            lawyers: required(dir, Table::Lawyers)?,
            witnesses: required(dir, Table::Witnesses)?,
            claimant_relationships: required(dir, Table::ClaimantRelationships)?,
            unwitnessed_claims,
            claims,
            claim_witnesses,
        })
    }
}
