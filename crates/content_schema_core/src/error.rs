use thiserror::Error;

use crate::ports::HostError;

/// Request-level failures. Anything raised here aborts the request; per-field
/// problems never surface as a `SchemaError`.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("section id {id} resolves to '{actual}', not '{expected}'")]
    Mismatch {
        id: i64,
        expected: String,
        actual: String,
    },

    #[error("host: {0}")]
    Host(#[from] HostError),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl SchemaError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Mismatch { .. } => 400,
            Self::Host(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// True for errors caused by the request itself rather than the host.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status())
    }
}
