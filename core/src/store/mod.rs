//! SQLite-backed property graph.
//!
//! RULE: Only the store talks to the database.
//! The loader and the inference pass call store methods; they never
//! execute SQL directly.
//!
//! Nodes carry a label, a key (the value of the label's constrained id
//! property) and a JSON property object. Edges are typed and directed and
//! reference nodes by rowid, so an edge can only be written once both
//! endpoints exist.

use crate::{
    config::StoreConfig,
    error::{FraudNetError, NetResult},
    graph::{CONSTRAINTS, INDEXES},
};
use rusqlite::{params, Connection};

mod batch;
mod derived;
mod summary;

pub use batch::BatchOutcome;
pub use derived::ClaimantContact;

const MEMORY_URI: &str = "sqlite::memory:";
const FILE_SCHEME: &str = "sqlite://";

pub struct GraphStore {
    conn: Connection,
}

impl GraphStore {
    pub fn open(path: &str) -> NetResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory store (used in tests).
    pub fn in_memory() -> NetResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open the store named by a validated configuration and apply the schema.
    ///
    /// The embedded backend has no user accounts; the principal is recorded
    /// in the log so load runs remain attributable.
    pub fn connect(config: &StoreConfig) -> NetResult<Self> {
        let store = if config.uri == MEMORY_URI {
            Self::in_memory()?
        } else if let Some(path) = config.uri.strip_prefix(FILE_SCHEME) {
            if path.is_empty() {
                return Err(FraudNetError::UnsupportedStoreUri(config.uri.clone()));
            }
            Self::open(path)?
        } else {
            return Err(FraudNetError::UnsupportedStoreUri(config.uri.clone()));
        };
        store.migrate()?;
        log::info!("connected to graph store {} as {}", config.uri, config.principal);
        Ok(store)
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> NetResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_graph.sql"))?;
        Ok(())
    }

    /// Register the uniqueness constraint of every node label and create
    /// the secondary property indexes. Safe to repeat.
    pub fn ensure_schema(&self) -> NetResult<()> {
        for (label, key_property) in CONSTRAINTS {
            self.conn.execute(
                "INSERT INTO node_constraint (label, key_property) VALUES (?1, ?2)
                 ON CONFLICT(label) DO UPDATE SET key_property = excluded.key_property",
                params![label, key_property],
            )?;
        }
        for (label, property) in INDEXES {
            let sql = format!(
                "CREATE INDEX IF NOT EXISTS idx_{}_{} ON node(json_extract(props, '$.{}'))
                 WHERE label = '{}'",
                label.to_ascii_lowercase(),
                property,
                property,
                label
            );
            self.conn.execute_batch(&sql)?;
        }
        log::info!(
            "schema ready: {} constraints, {} indexes",
            CONSTRAINTS.len(),
            INDEXES.len()
        );
        Ok(())
    }

    /// Delete every node and edge. Constraints and indexes survive.
    pub fn reset(&self) -> NetResult<()> {
        log::warn!("clearing graph store");
        self.conn.execute_batch("DELETE FROM edge; DELETE FROM node;")?;
        Ok(())
    }
}
