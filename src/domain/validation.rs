//! Field rules guarding payment creation.
//!
//! The validator is pure: it never touches a store and never looks at the
//! caller. It either returns a complete `PaymentDraft` or every rule the input
//! broke, so a client can fix all fields in one round trip.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::identity::UserId;
use super::payment::{Amount, PaymentDraft};

const PAYEE_ACCOUNT_LEN: std::ops::RangeInclusive<usize> = 6..=20;
const ROUTING_CODE_LEN: std::ops::RangeInclusive<usize> = 8..=11;

/// Raw creation fields as received from the boundary layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentFields {
    pub amount: String,
    pub currency: String,
    pub provider: String,
    pub payee_account: String,
    pub routing_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Amount,
    Currency,
    Provider,
    PayeeAccount,
    RoutingCode,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Amount => "amount",
            Field::Currency => "currency",
            Field::Provider => "provider",
            Field::PayeeAccount => "payee_account",
            Field::RoutingCode => "routing_code",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: Field,
    pub reason: String,
}

/// Every rule a set of creation fields failed, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    fn push(&mut self, field: Field, reason: impl Into<String>) {
        self.0.push(Violation {
            field,
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    pub fn fields(&self) -> BTreeSet<Field> {
        self.0.iter().map(|v| v.field).collect()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.reason)?;
        }
        Ok(())
    }
}

/// Whitelists for the enumerated fields.
///
/// Membership is exact-match, so `usd` is not `USD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    pub currencies: BTreeSet<String>,
    pub providers: BTreeSet<String>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            currencies: ["ZAR", "USD", "EUR"].into_iter().map(String::from).collect(),
            providers: ["SWIFT"].into_iter().map(String::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    policy: ValidationPolicy,
}

impl Validator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Checks all fields and builds a draft owned by `customer_id`.
    pub fn validate(
        &self,
        customer_id: UserId,
        fields: &PaymentFields,
    ) -> Result<PaymentDraft, Violations> {
        let mut violations = Violations::default();

        let amount = match parse_amount(&fields.amount) {
            Some(value) => {
                let amount = Amount::new(value);
                if amount.is_none() {
                    violations.push(Field::Amount, "must be greater than zero");
                }
                amount
            }
            None => {
                violations.push(Field::Amount, "must be a number");
                None
            }
        };

        if !self.policy.currencies.contains(&fields.currency) {
            violations.push(
                Field::Currency,
                format!("'{}' is not an accepted currency", fields.currency),
            );
        }

        if !self.policy.providers.contains(&fields.provider) {
            violations.push(
                Field::Provider,
                format!("'{}' is not an accepted provider", fields.provider),
            );
        }

        if !is_payee_account(&fields.payee_account) {
            violations.push(Field::PayeeAccount, "must be 6 to 20 digits");
        }

        if !is_routing_code(&fields.routing_code) {
            violations.push(
                Field::RoutingCode,
                "must be 8 to 11 letters or digits",
            );
        }

        match amount {
            Some(amount) if violations.is_empty() => Ok(PaymentDraft {
                customer_id,
                amount,
                currency: fields.currency.clone(),
                provider: fields.provider.clone(),
                payee_account: fields.payee_account.clone(),
                routing_code: fields.routing_code.clone(),
                created_at: Utc::now(),
            }),
            _ => Err(violations),
        }
    }
}

/// Plain decimal notation only. `Decimal::from_str` also takes `_` digit
/// separators, which an amount field must not.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    Decimal::from_str(raw).ok()
}

fn is_payee_account(value: &str) -> bool {
    PAYEE_ACCOUNT_LEN.contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_routing_code(value: &str) -> bool {
    ROUTING_CODE_LEN.contains(&value.len()) && value.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_fields() -> PaymentFields {
        PaymentFields {
            amount: "150.00".to_string(),
            currency: "USD".to_string(),
            provider: "SWIFT".to_string(),
            payee_account: "123456789".to_string(),
            routing_code: "ABCD1234".to_string(),
        }
    }

    #[test]
    fn test_valid_fields_produce_draft() {
        let draft = Validator::default()
            .validate(UserId(42), &valid_fields())
            .unwrap();
        assert_eq!(draft.customer_id, UserId(42));
        assert_eq!(draft.amount.value(), dec!(150.00));
        assert_eq!(draft.currency, "USD");
        assert_eq!(draft.routing_code, "ABCD1234");
    }

    #[test]
    fn test_amount_rules() {
        let validator = Validator::default();
        for bad in ["0", "-1.50", "abc", "", "1_000", "1e3", "+"] {
            let fields = PaymentFields {
                amount: bad.to_string(),
                ..valid_fields()
            };
            let violations = validator.validate(UserId(1), &fields).unwrap_err();
            assert_eq!(violations.fields(), BTreeSet::from([Field::Amount]), "{bad}");
        }

        for (good, expected) in [("+5", dec!(5)), (" 12.50 ", dec!(12.50))] {
            let fields = PaymentFields {
                amount: good.to_string(),
                ..valid_fields()
            };
            let draft = validator.validate(UserId(1), &fields).unwrap();
            assert_eq!(draft.amount.value(), expected, "{good}");
        }
    }

    #[test]
    fn test_currency_outside_whitelist() {
        let fields = PaymentFields {
            currency: "GBP".to_string(),
            ..valid_fields()
        };
        let violations = Validator::default().validate(UserId(1), &fields).unwrap_err();
        assert!(violations.contains(Field::Currency));

        let fields = PaymentFields {
            currency: "usd".to_string(),
            ..valid_fields()
        };
        assert!(Validator::default().validate(UserId(1), &fields).is_err());
    }

    #[test]
    fn test_payee_account_length_bounds() {
        let validator = Validator::default();
        let with_account = |account: &str| PaymentFields {
            payee_account: account.to_string(),
            ..valid_fields()
        };

        assert!(validator.validate(UserId(1), &with_account("12345")).is_err());
        assert!(validator.validate(UserId(1), &with_account("123456")).is_ok());
        assert!(validator
            .validate(UserId(1), &with_account("12345678901234567890"))
            .is_ok());
        assert!(validator
            .validate(UserId(1), &with_account("123456789012345678901"))
            .is_err());
        assert!(validator.validate(UserId(1), &with_account("12345a")).is_err());
        assert!(validator.validate(UserId(1), &with_account("１２３４５６")).is_err());
    }

    #[test]
    fn test_routing_code_rules() {
        let validator = Validator::default();
        let with_code = |code: &str| PaymentFields {
            routing_code: code.to_string(),
            ..valid_fields()
        };

        assert!(validator.validate(UserId(1), &with_code("abcd1234")).is_ok());
        assert!(validator.validate(UserId(1), &with_code("ABCDZAJJXXX")).is_ok());
        assert!(validator.validate(UserId(1), &with_code("ABC1234")).is_err());
        assert!(validator.validate(UserId(1), &with_code("ABCDZAJJXXXX")).is_err());
        assert!(validator.validate(UserId(1), &with_code("ABCD-234")).is_err());
    }

    #[test]
    fn test_collects_every_violation() {
        let fields = PaymentFields {
            amount: "0".to_string(),
            currency: "JPY".to_string(),
            provider: "ACH".to_string(),
            payee_account: "12345".to_string(),
            routing_code: "X".to_string(),
        };
        let violations = Validator::default().validate(UserId(1), &fields).unwrap_err();
        assert_eq!(violations.iter().count(), 5);
        assert_eq!(
            violations.fields(),
            BTreeSet::from([
                Field::Amount,
                Field::Currency,
                Field::Provider,
                Field::PayeeAccount,
                Field::RoutingCode,
            ])
        );
    }

    #[test]
    fn test_policy_is_injectable() {
        let policy = ValidationPolicy {
            currencies: BTreeSet::from(["GBP".to_string()]),
            providers: BTreeSet::from(["SWIFT".to_string(), "SEPA".to_string()]),
        };
        let validator = Validator::new(policy);

        let fields = PaymentFields {
            currency: "GBP".to_string(),
            provider: "SEPA".to_string(),
            ..valid_fields()
        };
        assert!(validator.validate(UserId(1), &fields).is_ok());
        assert!(validator.validate(UserId(1), &valid_fields()).is_err());
    }

    #[test]
    fn test_violations_display() {
        let fields = PaymentFields {
            payee_account: "12345".to_string(),
            ..valid_fields()
        };
        let violations = Validator::default().validate(UserId(1), &fields).unwrap_err();
        assert_eq!(violations.to_string(), "payee_account: must be 6 to 20 digits");
    }
}
