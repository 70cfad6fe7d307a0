use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::field::FieldId;
use crate::field::FormFields;

/// The parameters of a certificate request, as posted to the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub authority: String,
    pub common_name: String,
    pub owner: String,
    pub validity_start: String,
    pub validity_end: String,
}

impl CertificateRequest {
    pub fn read(fields: &impl FormFields) -> Self {
        Self {
            authority: fields.value(FieldId::Authority),
            common_name: fields.value(FieldId::CommonName),
            owner: fields.value(FieldId::Owner),
            validity_start: fields.value(FieldId::ValidityStart),
            validity_end: fields.value(FieldId::ValidityEnd),
        }
    }

    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::Authority => &self.authority,
            FieldId::CommonName => &self.common_name,
            FieldId::Owner => &self.owner,
            FieldId::ValidityStart => &self.validity_start,
            FieldId::ValidityEnd => &self.validity_end,
        }
    }

    /// The fields that are empty strings. No trimming.
    pub fn missing_fields(&self) -> Vec<FieldId> {
        FieldId::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }
}

/// The issued certificate. Each field is opaque PEM text.
///
/// Missing or `null` keys deserialize to empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chain: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pubcert: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub privatekey: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
