use thiserror::Error;

#[derive(Error, Debug)]
pub enum FraudNetError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing required configuration: {var}")]
    MissingConfig { var: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported graph store URI '{0}' (expected sqlite://<path> or sqlite::memory:)")]
    UnsupportedStoreUri(String),

    #[error("Invalid {entity} record '{id}': {reason}")]
    InvalidRecord {
        entity: &'static str,
        id: String,
        reason: String,
    },

    #[error("Referential error: {rel_type} endpoint {label} '{key}' does not exist")]
    Referential {
        rel_type: String,
        label: String,
        key: String,
    },

    #[error("No uniqueness constraint registered for label '{0}'")]
    UnconstrainedLabel(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FraudNetError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Errors worth a full reset-and-reload by the caller.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Io { .. } => true,
            Self::Database(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

pub type NetResult<T> = Result<T, FraudNetError>;
