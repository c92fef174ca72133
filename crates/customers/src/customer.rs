use serde::{Deserialize, Serialize};
use serde_json::Value;

use clientele_core::CustomerId;

use crate::schema::Document;

/// Field set of a stored customer.
///
/// The four contact fields are required and never empty once persisted; the
/// postal fields are optional and omitted from JSON when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl CustomerFields {
    /// Untyped document body as handed to a document store.
    pub fn to_document(&self) -> Document {
        let entries = [
            ("firstName", Some(&self.first_name)),
            ("lastName", Some(&self.last_name)),
            ("email", Some(&self.email)),
            ("phoneNumber", Some(&self.phone_number)),
            ("address", self.address.as_ref()),
            ("city", self.city.as_ref()),
            ("state", self.state.as_ref()),
            ("zipCode", self.zip_code.as_ref()),
            ("country", self.country.as_ref()),
        ];
        entries
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), Value::String(v.clone()))))
            .collect()
    }
}

/// A persisted customer: store-assigned identity plus its fields.
///
/// Serializes flat, with the identifier under `_id`:
///
/// ```json
/// { "_id": "0190…", "firstName": "Jane", "lastName": "Doe", "email": "…", "phoneNumber": "…" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: CustomerId,
    #[serde(flatten)]
    pub fields: CustomerFields,
}

impl Customer {
    /// Rebuild a customer from a stored document body.
    ///
    /// Keys outside the schema are ignored.
    pub fn from_document(id: CustomerId, body: Document) -> Result<Self, serde_json::Error> {
        let fields = serde_json::from_value(Value::Object(body))?;
        Ok(Self { id, fields })
    }
}
