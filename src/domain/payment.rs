use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::identity::UserId;

/// Store-assigned payment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(pub u64);

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a positive monetary amount for a payment instruction.
///
/// Construction fails for zero or negative values, so any `Amount` held by a
/// `Payment` is already known to be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Option<Self> {
        (value > Decimal::ZERO).then_some(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = String;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "amount must be greater than zero".to_string())
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Submitted,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Verified => "verified",
            PaymentStatus::Submitted => "submitted",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated creation fields, ready to be persisted as a new payment.
///
/// Only the validator produces these; the store turns a draft into a
/// `Payment` by assigning its id.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub customer_id: UserId,
    pub amount: Amount,
    pub currency: String,
    pub provider: String,
    pub payee_account: String,
    pub routing_code: String,
    pub created_at: DateTime<Utc>,
}

/// A single customer-initiated instruction to transfer funds through a
/// settlement provider.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Payment {
    pub id: PaymentId,
    pub customer_id: UserId,
    pub amount: Amount,
    pub currency: String,
    pub provider: String,
    pub payee_account: String,
    pub routing_code: String,
    pub status: PaymentStatus,
    /// Staff member who moved the payment out of `pending`.
    pub verified_by: Option<UserId>,
    /// Set once, when the payment is released to the provider.
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Materializes a draft as a fresh `pending` payment.
    pub fn from_draft(id: PaymentId, draft: PaymentDraft) -> Self {
        Self {
            id,
            customer_id: draft.customer_id,
            amount: draft.amount,
            currency: draft.currency,
            provider: draft.provider,
            payee_account: draft.payee_account,
            routing_code: draft.routing_code,
            status: PaymentStatus::Pending,
            verified_by: None,
            submitted_at: None,
            created_at: draft.created_at,
        }
    }

    /// Checks that the optional stamps agree with the current status.
    pub fn is_consistent(&self) -> bool {
        let verified = matches!(
            self.status,
            PaymentStatus::Verified | PaymentStatus::Submitted
        );
        let submitted = self.status == PaymentStatus::Submitted;
        self.verified_by.is_some() == verified && self.submitted_at.is_some() == submitted
    }
}
