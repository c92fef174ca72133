//! Required-field rules for customer documents.
//!
//! Validation runs before anything reaches a store, so the same inputs fail
//! the same way regardless of the storage engine behind it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use clientele_core::{DomainError, DomainResult};

use crate::customer::CustomerFields;

/// Untyped document body (JSON object) as persisted by a document store.
pub type Document = Map<String, Value>;

/// Collection holding customer documents.
pub const COLLECTION: &str = "customers";

/// Wire names of the fields every stored customer must carry, non-empty.
pub const REQUIRED_FIELDS: [&str; 4] = ["firstName", "lastName", "email", "phoneNumber"];

/// Inbound field set for creating a customer.
///
/// Every field is optional at this stage so that a missing required field is
/// reported by [`CustomerDraft::validate`] instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

impl CustomerDraft {
    /// Check the required fields and produce the field set to persist.
    pub fn validate(self) -> DomainResult<CustomerFields> {
        let missing: Vec<&str> = REQUIRED_FIELDS
            .into_iter()
            .zip([&self.first_name, &self.last_name, &self.email, &self.phone_number])
            .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
            .map(|(name, _)| name)
            .collect();

        if !missing.is_empty() {
            return Err(DomainError::validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }

        Ok(CustomerFields {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone_number: self.phone_number.unwrap_or_default(),
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            country: self.country,
        })
    }
}

/// Partial update for an existing customer.
///
/// `None` keeps the stored value. Identity is not part of the patch; an `_id`
/// key in the request body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl CustomerPatch {
    /// Reject a patch whose merge would leave a required field empty.
    ///
    /// Stored documents always satisfy the required-field rule, so only the
    /// values the patch overwrites need checking.
    pub fn validate(&self) -> DomainResult<()> {
        let emptied: Vec<&str> = REQUIRED_FIELDS
            .into_iter()
            .zip([&self.first_name, &self.last_name, &self.email, &self.phone_number])
            .filter(|(_, value)| value.as_deref().is_some_and(str::is_empty))
            .map(|(name, _)| name)
            .collect();

        if emptied.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "required field(s) cannot be empty: {}",
                emptied.join(", ")
            )))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_document().is_empty()
    }

    /// Keys to overwrite in the stored document.
    pub fn to_document(&self) -> Document {
        let entries = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("phoneNumber", &self.phone_number),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.zip_code),
            ("country", &self.country),
        ];
        entries
            .into_iter()
            .filter_map(|(name, value)| {
                value
                    .as_ref()
                    .map(|v| (name.to_string(), Value::String(v.clone())))
            })
            .collect()
    }
}
