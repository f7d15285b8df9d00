use std::path::PathBuf;

/// Errors surfaced by persistence, configuration and schedule parsing.
///
/// In-memory store mutations never fail; only the edges (device storage,
/// config files, user-typed times) produce a `StoreError`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON under key {key:?}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("could not serialize config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("invalid class time {0:?}, expected HH:MM")]
    InvalidTime(String),

    #[error("unknown subject {0:?}")]
    UnknownSubject(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
