use crate::domain::identity::{OwnerProfile, UserId};
use crate::domain::lifecycle::Transition;
use crate::domain::payment::{Payment, PaymentDraft, PaymentId, PaymentStatus};
use crate::domain::ports::{IdentityDirectory, PaymentStore, UpdateOutcome};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Payments {
    last_id: u64,
    records: BTreeMap<PaymentId, Payment>,
}

/// A thread-safe in-memory store for payments.
///
/// Uses `Arc<RwLock<..>>` so clones share the same records. Conditional
/// updates run entirely under the write lock, which makes the status check
/// and the write a single step for concurrent callers.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<Payments>>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn get(&self, id: PaymentId) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.records.get(&id).cloned())
    }

    async fn create(&self, draft: PaymentDraft) -> Result<Payment> {
        let mut payments = self.payments.write().await;
        payments.last_id += 1;
        let payment = Payment::from_draft(PaymentId(payments.last_id), draft);
        payments.records.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn conditional_update(
        &self,
        id: PaymentId,
        expected: PaymentStatus,
        transition: Transition,
    ) -> Result<UpdateOutcome> {
        let mut payments = self.payments.write().await;
        let Some(payment) = payments.records.get_mut(&id) else {
            return Ok(UpdateOutcome::Missing);
        };
        if payment.status != expected {
            return Ok(UpdateOutcome::Conflict(payment.status));
        }
        transition.apply(payment)?;
        Ok(UpdateOutcome::Updated(payment.clone()))
    }

    async fn list_by_status(&self, status: PaymentStatus) -> Result<Vec<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .records
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect())
    }

    async fn all(&self) -> Result<Vec<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.records.values().cloned().collect())
    }
}

/// Owner profiles held in memory, usually loaded from the settings file.
#[derive(Default, Clone)]
pub struct InMemoryDirectory {
    profiles: Arc<RwLock<HashMap<UserId, OwnerProfile>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = (UserId, OwnerProfile)>) -> Self {
        Self {
            profiles: Arc::new(RwLock::new(profiles.into_iter().collect())),
        }
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryDirectory {
    async fn profile(&self, user_id: UserId) -> Result<Option<OwnerProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&user_id).cloned())
    }
}
