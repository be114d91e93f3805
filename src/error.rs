use crate::domain::authorization::Action;
use crate::domain::identity::Role;
use crate::domain::lifecycle::rejection_reason;
use crate::domain::payment::{PaymentId, PaymentStatus};
use crate::domain::validation::Violations;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Forbidden: role '{role}' may not {action}")]
    Forbidden { role: Role, action: Action },
    #[error("Validation failed: {0}")]
    ValidationFailed(Violations),
    #[error("Payment {0} not found")]
    NotFound(PaymentId),
    #[error(
        "Invalid transition for payment {id}: {}",
        rejection_reason(.current, .attempted)
    )]
    InvalidTransition {
        id: PaymentId,
        current: PaymentStatus,
        attempted: Action,
    },
    #[error("Payment store unavailable: {0}")]
    StoreUnavailable(Box<dyn std::error::Error + Send + Sync>),
    #[error("Malformed command: {0}")]
    MalformedCommand(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] toml::de::Error),
}

impl PaymentError {
    /// Collaborator failures are the only errors a caller may retry; every
    /// other variant is deterministic given the current state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::StoreUnavailable(_))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for PaymentError {
    fn from(err: rocksdb::Error) -> Self {
        PaymentError::StoreUnavailable(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
