//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifier of a customer row.
///
/// Assigned by the store (`serial` in Postgres), never by clients.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i32);

impl CustomerId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

impl core::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i32> for CustomerId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<CustomerId> for i32 {
    fn from(value: CustomerId) -> Self {
        value.0
    }
}

/// Parses the same textual forms Postgres accepts for an `int4` cast:
/// optional surrounding whitespace and an optional sign.
impl FromStr for CustomerId {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("invalid input syntax for type integer: \"{s}\"")))
    }
}
