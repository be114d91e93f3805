use chrono::Utc;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::authorization::{Action, authorize};
use crate::domain::identity::{Identity, OwnerProfile};
use crate::domain::lifecycle::Transition;
use crate::domain::payment::{Payment, PaymentId, PaymentStatus};
use crate::domain::ports::{
    AuditEvent, AuditRecord, AuditSinkRef, IdentityDirectoryBox, PaymentStoreBox, UpdateOutcome,
};
use crate::domain::validation::{PaymentFields, Validator};
use crate::error::{PaymentError, Result};

/// A pending payment joined with its owner's display fields.
///
/// `owner` is `None` when the directory has no entry for the customer; the
/// payment is still listed so staff can act on it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPayment {
    pub payment: Payment,
    pub owner: Option<OwnerProfile>,
}

/// The entry point for every caller action on payments.
///
/// `PaymentService` checks the authorization table first, validates fields on
/// creation, and drives staff transitions through the store's conditional
/// update. It keeps no payment state between calls: every operation re-reads
/// the record it acts on. The only thing it holds on to is the handles of
/// audit writes still in flight, so callers can wait for them with
/// [`PaymentService::flush_audit`].
pub struct PaymentService {
    store: PaymentStoreBox,
    directory: IdentityDirectoryBox,
    audit: AuditSinkRef,
    validator: Validator,
    audit_tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl PaymentService {
    /// Creates a new `PaymentService`.
    ///
    /// # Arguments
    ///
    /// * `store` - Durable payment records.
    /// * `directory` - Owner profiles for the staff review queue.
    /// * `audit` - Destination for audit records; failures there never fail an operation.
    /// * `validator` - Field rules applied on creation.
    pub fn new(
        store: PaymentStoreBox,
        directory: IdentityDirectoryBox,
        audit: AuditSinkRef,
        validator: Validator,
    ) -> Self {
        Self {
            store,
            directory,
            audit,
            validator,
            audit_tasks: Mutex::default(),
        }
    }

    #[tracing::instrument(skip(self, request), fields(customer = %identity.id))]
    pub async fn create_payment(
        &self,
        identity: &Identity,
        request: &PaymentFields,
    ) -> Result<Payment> {
        authorize(identity, Action::Create)?;

        let draft = self
            .validator
            .validate(identity.id, request)
            .map_err(PaymentError::ValidationFailed)?;
        let payment = self.store.create(draft).await?;

        info!(payment = %payment.id, amount = %payment.amount, currency = %payment.currency, "payment created");
        self.emit_audit(identity, payment.id, AuditEvent::Created);
        Ok(payment)
    }

    #[tracing::instrument(skip(self), fields(actor = %identity.id))]
    pub async fn list_pending(&self, identity: &Identity) -> Result<Vec<PendingPayment>> {
        authorize(identity, Action::List)?;

        let payments = self.store.list_by_status(PaymentStatus::Pending).await?;
        let mut queue = Vec::with_capacity(payments.len());
        for payment in payments {
            let owner = self.directory.profile(payment.customer_id).await?;
            if owner.is_none() {
                debug!(customer = %payment.customer_id, "no profile for payment owner");
            }
            queue.push(PendingPayment { payment, owner });
        }

        debug!(count = queue.len(), "listed pending payments");
        Ok(queue)
    }

    #[tracing::instrument(skip(self), fields(actor = %identity.id))]
    pub async fn verify_payment(&self, identity: &Identity, id: PaymentId) -> Result<Payment> {
        authorize(identity, Action::Verify)?;

        let payment = self
            .transition(id, Transition::Verify { by: identity.id })
            .await?;

        info!(payment = %payment.id, "payment verified");
        self.emit_audit(identity, payment.id, AuditEvent::Verified);
        Ok(payment)
    }

    #[tracing::instrument(skip(self), fields(actor = %identity.id))]
    pub async fn submit_payment(&self, identity: &Identity, id: PaymentId) -> Result<Payment> {
        authorize(identity, Action::Submit)?;

        let payment = self
            .transition(id, Transition::Submit { at: Utc::now() })
            .await?;

        info!(payment = %payment.id, provider = %payment.provider, "payment submitted to provider");
        self.emit_audit(identity, payment.id, AuditEvent::Submitted);
        Ok(payment)
    }

    pub async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>> {
        self.store.get(id).await
    }

    /// Every stored payment ordered by id, for reporting.
    pub async fn all_payments(&self) -> Result<Vec<Payment>> {
        let mut payments = self.store.all().await?;
        payments.sort_by_key(|p| p.id);
        Ok(payments)
    }

    /// Waits until every audit record emitted so far has reached the sink.
    ///
    /// Sink failures were already logged by the audit task itself.
    pub async fn flush_audit(&self) {
        let pending = std::mem::take(&mut *self.pending_audits());
        for handle in pending {
            if let Err(e) = handle.await {
                warn!(error = %e, "audit task did not complete");
            }
        }
    }

    async fn transition(&self, id: PaymentId, transition: Transition) -> Result<Payment> {
        let current = self
            .store
            .get(id)
            .await?
            .ok_or(PaymentError::NotFound(id))?;
        transition.check(&current)?;

        match self
            .store
            .conditional_update(id, current.status, transition)
            .await?
        {
            UpdateOutcome::Updated(payment) => Ok(payment),
            UpdateOutcome::Conflict(observed) => {
                debug!(payment = %id, %observed, "lost race on status update");
                Err(PaymentError::InvalidTransition {
                    id,
                    current: observed,
                    attempted: transition.action(),
                })
            }
            UpdateOutcome::Missing => Err(PaymentError::NotFound(id)),
        }
    }

    fn emit_audit(&self, identity: &Identity, payment_id: PaymentId, event: AuditEvent) {
        let record = AuditRecord {
            actor: identity.id,
            payment_id,
            event,
            at: Utc::now(),
        };
        let sink = self.audit.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = sink.record(record).await {
                warn!(payment = %payment_id, error = %e, "failed to write audit record");
            }
        });

        let mut pending = self.pending_audits();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    fn pending_audits(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.audit_tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
