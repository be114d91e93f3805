use serde::{Deserialize, Serialize};
use std::fmt;

use super::identity::{Identity, Role};
use crate::error::{PaymentError, Result};

/// A caller action that the service guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    List,
    Verify,
    Submit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Create => "create",
            Action::List => "list",
            Action::Verify => "verify",
            Action::Submit => "submit",
        };
        f.write_str(name)
    }
}

/// Required role per action. Nothing outside this table grants access.
pub const POLICY: &[(Action, Role)] = &[
    (Action::Create, Role::Customer),
    (Action::List, Role::Employee),
    (Action::Verify, Role::Employee),
    (Action::Submit, Role::Employee),
];

pub fn allow(role: Role, action: Action) -> bool {
    POLICY
        .iter()
        .any(|&(allowed_action, required)| allowed_action == action && required == role)
}

pub fn authorize(identity: &Identity, action: Action) -> Result<()> {
    if allow(identity.role, action) {
        Ok(())
    } else {
        Err(PaymentError::Forbidden {
            role: identity.role,
            action,
        })
    }
}
