//! Legal status transitions for a payment.
//!
//! Each staff action is a `Transition` value carrying everything it stamps on
//! the record. Stores apply it with `Transition::apply` inside their
//! conditional update, so the guard and the write see the same state.

use chrono::{DateTime, Utc};

use super::authorization::Action;
use super::identity::UserId;
use super::payment::{Payment, PaymentStatus};
use crate::error::{PaymentError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// pending -> verified, recording the reviewing staff member.
    Verify { by: UserId },
    /// verified -> submitted, recording the release time.
    Submit { at: DateTime<Utc> },
}

impl Transition {
    pub fn action(&self) -> Action {
        match self {
            Transition::Verify { .. } => Action::Verify,
            Transition::Submit { .. } => Action::Submit,
        }
    }

    /// The only status this transition may start from.
    pub fn source_status(&self) -> PaymentStatus {
        match self {
            Transition::Verify { .. } => PaymentStatus::Pending,
            Transition::Submit { .. } => PaymentStatus::Verified,
        }
    }

    pub fn target_status(&self) -> PaymentStatus {
        match self {
            Transition::Verify { .. } => PaymentStatus::Verified,
            Transition::Submit { .. } => PaymentStatus::Submitted,
        }
    }

    pub fn check(&self, payment: &Payment) -> Result<()> {
        if payment.status == self.source_status() {
            Ok(())
        } else {
            Err(PaymentError::InvalidTransition {
                id: payment.id,
                current: payment.status,
                attempted: self.action(),
            })
        }
    }

    /// Moves the payment to the next status and sets the matching stamp.
    ///
    /// Leaves the payment untouched when the guard fails.
    pub fn apply(&self, payment: &mut Payment) -> Result<()> {
        self.check(payment)?;
        match *self {
            Transition::Verify { by } => payment.verified_by = Some(by),
            Transition::Submit { at } => payment.submitted_at = Some(at),
        }
        payment.status = self.target_status();
        Ok(())
    }
}

/// Human-readable cause for a rejected transition.
pub fn rejection_reason(current: &PaymentStatus, attempted: &Action) -> String {
    match (attempted, current) {
        (Action::Verify, PaymentStatus::Verified) => "payment is already verified".to_string(),
        (_, PaymentStatus::Submitted) => "payment is already submitted".to_string(),
        (Action::Submit, PaymentStatus::Pending) => {
            "payment must be verified first".to_string()
        }
        (action, status) => format!("cannot {action} a {status} payment"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::{Amount, PaymentDraft, PaymentId};
    use rust_decimal_macros::dec;

    fn pending() -> Payment {
        Payment::from_draft(
            PaymentId(1),
            PaymentDraft {
                customer_id: UserId(42),
                amount: Amount::new(dec!(150.00)).unwrap(),
                currency: "USD".to_string(),
                provider: "SWIFT".to_string(),
                payee_account: "123456789".to_string(),
                routing_code: "ABCD1234".to_string(),
                created_at: Utc::now(),
            },
        )
    }

    #[test]
    fn test_verify_then_submit() {
        let mut payment = pending();
        Transition::Verify { by: UserId(7) }.apply(&mut payment).unwrap();
        assert_eq!(payment.status, PaymentStatus::Verified);
        assert_eq!(payment.verified_by, Some(UserId(7)));
        assert!(payment.is_consistent());

        let at = Utc::now();
        Transition::Submit { at }.apply(&mut payment).unwrap();
        assert_eq!(payment.status, PaymentStatus::Submitted);
        assert_eq!(payment.submitted_at, Some(at));
        assert_eq!(payment.verified_by, Some(UserId(7)));
        assert!(payment.is_consistent());
    }

    #[test]
    fn test_submit_pending_rejected_without_mutation() {
        let mut payment = pending();
        let before = payment.clone();
        let err = Transition::Submit { at: Utc::now() }
            .apply(&mut payment)
            .unwrap_err();
        assert!(matches!(
            err,
            PaymentError::InvalidTransition {
                current: PaymentStatus::Pending,
                attempted: Action::Submit,
                ..
            }
        ));
        assert_eq!(payment, before);
    }

    #[test]
    fn test_no_reentry_into_prior_state() {
        let mut payment = pending();
        Transition::Verify { by: UserId(7) }.apply(&mut payment).unwrap();
        Transition::Submit { at: Utc::now() }.apply(&mut payment).unwrap();

        assert!(Transition::Verify { by: UserId(8) }.apply(&mut payment).is_err());
        assert!(Transition::Submit { at: Utc::now() }.apply(&mut payment).is_err());
        assert_eq!(payment.verified_by, Some(UserId(7)));
    }

    #[test]
    fn test_rejection_reasons() {
        assert_eq!(
            rejection_reason(&PaymentStatus::Verified, &Action::Verify),
            "payment is already verified"
        );
        assert_eq!(
            rejection_reason(&PaymentStatus::Submitted, &Action::Verify),
            "payment is already submitted"
        );
        assert_eq!(
            rejection_reason(&PaymentStatus::Pending, &Action::Submit),
            "payment must be verified first"
        );
    }
}
