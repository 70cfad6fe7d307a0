use serde::Deserialize;

use crate::auth_token::AUTH_COOKIE;

/// Where the form lives on the page and where requests go.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Path of the certificate-issuance endpoint.
    pub endpoint: String,

    /// Cookie holding the `Authorization` token.
    pub auth_cookie: String,

    pub container_id: String,
    pub submit_id: String,
    pub clear_id: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            endpoint: "/v1/createcert".to_owned(),
            auth_cookie: AUTH_COOKIE.to_owned(),
            container_id: "certificate-data".to_owned(),
            submit_id: "submit".to_owned(),
            clear_id: "clear".to_owned(),
        }
    }
}

impl FormConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
