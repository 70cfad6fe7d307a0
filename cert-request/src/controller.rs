//! Gates and dispatches certificate requests.
//!
//! ```text
//! Idle -> Validating -> Idle                       (empty field, alert shown)
//!                    -> Submitting -> Idle + panels (success, inputs cleared)
//!                                  -> Idle + alert  (failure, body shown verbatim)
//! ```
//!
//! Submissions are not de-duplicated: clicking again while a request is in flight
//! sends another request, and [SubmitState::Submitting] counts both.

use std::cell::Cell;

use nameth::NamedEnumValues as _;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::api::CertificateService;
use crate::api::CreateCertError;
use crate::auth_token::CookieJar;
use crate::auth_token::read_cookie;
use crate::certificate::CertificateRequest;
use crate::field::FieldId;
use crate::field::FormFields;
use crate::render::PanelContainer;
use crate::render::render;

#[cfg(test)]
mod tests;

pub const VALIDATION_MESSAGE: &str =
    "This form requires Authority, CommonName (you), Owner (email), StartDate and EndDate!";

/// Shows blocking messages to the user.
pub trait Notifier {
    fn alert(&self, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn alert(&self, message: &str) {
        (**self).alert(message)
    }
}

/// Returns false if any of the five fields is an empty string.
pub fn validate(request: &CertificateRequest) -> bool {
    FieldId::ALL
        .into_iter()
        .all(|field| !request.get(field).is_empty())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting { in_flight: usize },
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Some fields were empty, nothing was sent.
    Rejected { missing: Vec<FieldId> },

    /// The panels show the new certificate and the inputs were cleared.
    Rendered,

    /// The request failed, the inputs were kept.
    Failed(CreateCertError),
}

pub struct FormController<F, P, N, C, S> {
    fields: F,
    panels: P,
    notifier: N,
    cookies: C,
    service: S,
    auth_cookie: String,
    in_flight: Cell<usize>,
}

impl<F, P, N, C, S> FormController<F, P, N, C, S>
where
    F: FormFields,
    P: PanelContainer,
    N: Notifier,
    C: CookieJar,
    S: CertificateService,
{
    pub fn new(
        fields: F,
        panels: P,
        notifier: N,
        cookies: C,
        service: S,
        auth_cookie: impl Into<String>,
    ) -> Self {
        Self {
            fields,
            panels,
            notifier,
            cookies,
            service,
            auth_cookie: auth_cookie.into(),
            in_flight: Cell::new(0),
        }
    }

    pub fn state(&self) -> SubmitState {
        match self.in_flight.get() {
            0 => SubmitState::Idle,
            in_flight => SubmitState::Submitting { in_flight },
        }
    }

    pub fn read_auth_token(&self) -> String {
        read_cookie(&self.cookies.cookies(), &self.auth_cookie)
    }

    /// Validates the inputs and, if they are all set, posts them.
    pub async fn submit(&self) -> SubmitOutcome {
        let request = CertificateRequest::read(&self.fields);
        if !validate(&request) {
            let missing = request.missing_fields();
            let names: Vec<_> = missing.iter().map(|field| field.name()).collect();
            debug!(missing = ?names, "Incomplete certificate request");
            self.notifier.alert(VALIDATION_MESSAGE);
            return SubmitOutcome::Rejected { missing };
        }

        let auth_token = self.read_auth_token();
        if auth_token.is_empty() {
            debug!("No '{}' cookie", self.auth_cookie);
        }

        let result = {
            self.in_flight.set(self.in_flight.get() + 1);
            let _in_flight = scopeguard::guard((), |()| {
                self.in_flight.set(self.in_flight.get() - 1);
            });
            debug!(state = ?self.state(), common_name = %request.common_name, "Submitting");
            self.service.create_cert(&auth_token, &request).await
        };

        match result {
            Ok(response) => {
                info!(common_name = %request.common_name, "Certificate issued");
                render(&self.panels, &response);
                self.fields.clear_all();
                SubmitOutcome::Rendered
            }
            Err(error) => {
                match (&error, error.response_text()) {
                    (CreateCertError::Rejected { status, .. }, Some(body)) => {
                        warn!(status, "Certificate request rejected: {body}")
                    }
                    (_, Some(body)) => warn!(error = error.name(), "{body}"),
                    (_, None) => warn!("Certificate request failed: {error}"),
                }
                self.notifier.alert(&error.user_message());
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Removes the rendered panels. The inputs are left as they are.
    pub fn clear(&self) {
        debug!("Clear certificate panels");
        self.panels.clear();
    }
}
