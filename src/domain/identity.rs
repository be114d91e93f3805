use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Employee,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Customer => f.write_str("customer"),
            Role::Employee => f.write_str("employee"),
        }
    }
}

/// The authenticated caller, as vouched for by the identity provider.
///
/// No credential checking happens past this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub role: Role,
}

impl Identity {
    pub fn customer(id: u64) -> Self {
        Self {
            id: UserId(id),
            role: Role::Customer,
        }
    }

    pub fn employee(id: u64) -> Self {
        Self {
            id: UserId(id),
            role: Role::Employee,
        }
    }
}

/// Display fields for a payment owner, shown in the staff review queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerProfile {
    pub full_name: String,
    pub account_number: String,
    pub username: String,
}
