use super::identity::{OwnerProfile, UserId};
use super::lifecycle::Transition;
use super::payment::{Payment, PaymentDraft, PaymentId, PaymentStatus};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of a status-guarded write.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Payment),
    /// The record was no longer in the expected status; carries what was seen.
    Conflict(PaymentStatus),
    Missing,
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn get(&self, id: PaymentId) -> Result<Option<Payment>>;
    /// Persists a draft as a new `pending` payment under a fresh id.
    async fn create(&self, draft: PaymentDraft) -> Result<Payment>;
    /// Applies `transition` only if the stored status still equals `expected`.
    ///
    /// Implementations must make the status check and the write atomic with
    /// respect to other updates of the same id.
    async fn conditional_update(
        &self,
        id: PaymentId,
        expected: PaymentStatus,
        transition: Transition,
    ) -> Result<UpdateOutcome>;
    async fn list_by_status(&self, status: PaymentStatus) -> Result<Vec<Payment>>;
    async fn all(&self) -> Result<Vec<Payment>>;
}

#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn profile(&self, user_id: UserId) -> Result<Option<OwnerProfile>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditEvent {
    Created,
    Verified,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub actor: UserId,
    pub payment_id: PaymentId,
    pub event: AuditEvent,
    pub at: DateTime<Utc>,
}

/// Append-only trail of state-changing actions. Callers treat it as
/// fire-and-forget.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: AuditRecord) -> Result<()>;
}

pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type IdentityDirectoryBox = Box<dyn IdentityDirectory>;
pub type AuditSinkRef = Arc<dyn AuditSink>;
