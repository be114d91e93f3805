//! Settings loaded from an optional TOML file.

use crate::domain::identity::{OwnerProfile, UserId};
use crate::domain::validation::ValidationPolicy;
use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// A directory entry for a known user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserEntry {
    pub id: u64,
    pub full_name: String,
    pub account_number: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub policy: ValidationPolicy,
    pub users: Vec<UserEntry>,
}

impl Settings {
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads settings from `path`, or falls back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_toml(&std::fs::read_to_string(path)?),
            None => Ok(Self::default()),
        }
    }

    pub fn profiles(&self) -> impl Iterator<Item = (UserId, OwnerProfile)> + '_ {
        self.users.iter().map(|user| {
            (
                UserId(user.id),
                OwnerProfile {
                    full_name: user.full_name.clone(),
                    account_number: user.account_number.clone(),
                    username: user.username.clone(),
                },
            )
        })
    }
}
