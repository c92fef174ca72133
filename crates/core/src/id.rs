//! Strongly-typed identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const HYPHENATED_LEN: usize = 36;

/// Identifier of a customer document.
///
/// Assigned by the document store when the customer is created and never
/// changed afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

impl CustomerId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Stores that generate ids themselves do not
    /// need this; it exists for in-process stores and tests.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for CustomerId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<CustomerId> for Uuid {
    fn from(value: CustomerId) -> Self {
        value.0
    }
}

impl FromStr for CustomerId {
    type Err = DomainError;

    /// Accepts only the hyphenated form (`8-4-4-4-12`), so every customer
    /// has exactly one spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.len() != HYPHENATED_LEN {
            return Err(DomainError::invalid_id(format!(
                "CustomerId '{s}': expected a hyphenated UUID"
            )));
        }
        let uuid = Uuid::try_parse(raw)
            .map_err(|e| DomainError::invalid_id(format!("CustomerId '{s}': {e}")))?;
        Ok(Self(uuid))
    }
}
