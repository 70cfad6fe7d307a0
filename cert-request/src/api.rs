use nameth::NamedEnumValues as _;
use nameth::nameth;

use crate::certificate::CertificateRequest;
use crate::certificate::CertificateResponse;

#[cfg(feature = "client")]
pub mod client;

/// The certificate-issuance endpoint.
pub trait CertificateService {
    /// Posts the request once. No retry.
    fn create_cert(
        &self,
        auth_token: &str,
        request: &CertificateRequest,
    ) -> impl Future<Output = Result<CertificateResponse, CreateCertError>>;
}

impl<T: CertificateService + ?Sized> CertificateService for &T {
    fn create_cert(
        &self,
        auth_token: &str,
        request: &CertificateRequest,
    ) -> impl Future<Output = Result<CertificateResponse, CreateCertError>> {
        (**self).create_cert(auth_token, request)
    }
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum CreateCertError {
    #[error("[{n}] Failed to encode the request: {0}", n = self.name())]
    InvalidRequest(serde_json::Error),

    #[error("[{n}] {message}", n = self.name())]
    Transport { message: String },

    #[error("[{n}][{status}] {body}", n = self.name())]
    Rejected { status: u16, body: String },

    #[error("[{n}] Invalid response: {error}", n = self.name())]
    InvalidResponse {
        body: String,
        error: serde_json::Error,
    },
}

impl CreateCertError {
    /// The raw body returned by the server, if the request got that far.
    pub fn response_text(&self) -> Option<&str> {
        match self {
            Self::Rejected { body, .. } | Self::InvalidResponse { body, .. } => Some(body),
            Self::InvalidRequest { .. } | Self::Transport { .. } => None,
        }
    }

    /// What the user is shown: the raw server body verbatim, or the error itself.
    pub fn user_message(&self) -> String {
        match self.response_text() {
            Some(body) => body.to_owned(),
            None => self.to_string(),
        }
    }
}

/// Maps a settled HTTP response to the certificate, keeping the raw body on failure.
pub fn check_response(
    ok: bool,
    status: u16,
    body: String,
) -> Result<CertificateResponse, CreateCertError> {
    if !ok {
        return Err(CreateCertError::Rejected { status, body });
    }
    return parse_response(body);
}

/// Decodes the body of a successful response.
pub fn parse_response(body: String) -> Result<CertificateResponse, CreateCertError> {
    serde_json::from_str(&body).map_err(|error| CreateCertError::InvalidResponse { body, error })
}
