use nameth::NamedEnumValues as _;
use nameth::nameth;
use tracing::debug;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::Headers;
use web_sys::Request;
use web_sys::RequestInit;
use web_sys::RequestMode;
use web_sys::Response;

use super::CertificateService;
use super::CreateCertError;
use super::check_response;
use crate::certificate::CertificateRequest;
use crate::certificate::CertificateResponse;

const APPLICATION_JSON: &str = "application/json";
const AUTHORIZATION: &str = "Authorization";

/// Posts certificate requests with `window.fetch`.
pub struct FetchCertificateService {
    endpoint: String,
}

impl FetchCertificateService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl CertificateService for FetchCertificateService {
    async fn create_cert(
        &self,
        auth_token: &str,
        request: &CertificateRequest,
    ) -> Result<CertificateResponse, CreateCertError> {
        let body = serde_json::to_string(request).map_err(CreateCertError::InvalidRequest)?;
        let headers = json_headers(auth_token)?;
        debug!(endpoint = %self.endpoint, "Sending certificate request");
        let response = send_request(Method::POST, &self.endpoint, move |request| {
            request.set_headers(headers.as_ref());
            request.set_body(&JsValue::from_str(&body));
        })
        .await?;
        let status = response.status();
        let body = response_text(&response).await?;
        debug!(status, len = body.len(), "Certificate response");
        return check_response(response.ok(), status, body);
    }
}

async fn send_request(
    method: Method,
    url: &str,
    on_request: impl FnOnce(&RequestInit),
) -> Result<Response, SendRequestError> {
    let request = RequestInit::new();
    request.set_method(method.name());
    request.set_mode(RequestMode::SameOrigin);
    on_request(&request);
    let request = Request::new_with_str_and_init(url, &request);
    let request = request.map_err(|error| SendRequestError::InvalidUrl {
        url: url.to_owned(),
        error,
    })?;
    let window = web_sys::window().ok_or(SendRequestError::MissingWindow)?;
    let promise = window.fetch_with_request(&request);
    let response = JsFuture::from(promise)
        .await
        .map_err(|error| SendRequestError::RequestError { error })?;
    let response: Response = response
        .dyn_into()
        .map_err(|error| SendRequestError::UnexpectedResponseObject { error })?;
    return Ok(response);
}

async fn response_text(response: &Response) -> Result<String, SendRequestError> {
    let text = response
        .text()
        .map_err(|_| SendRequestError::MissingResponseBody)?;
    let text = JsFuture::from(text)
        .await
        .map_err(|_| SendRequestError::FailedResponseBody)?;
    text.as_string().ok_or(SendRequestError::InvalidUtf8)
}

fn json_headers(auth_token: &str) -> Result<Headers, SendRequestError> {
    let headers = Headers::new().map_err(|error| SendRequestError::Headers { error })?;
    headers
        .set("content-type", APPLICATION_JSON)
        .map_err(|error| SendRequestError::Headers { error })?;
    headers
        .set(AUTHORIZATION, auth_token)
        .map_err(|error| SendRequestError::Headers { error })?;
    Ok(headers)
}

#[nameth]
#[derive(Clone, Copy)]
#[allow(clippy::upper_case_acronyms)]
enum Method {
    POST,
}

#[nameth]
#[derive(thiserror::Error, Debug)]
enum SendRequestError {
    #[error("[{}] Invalid url='{url}': {error:?}", self.name())]
    InvalidUrl { url: String, error: JsValue },

    #[error("[{}] Invalid headers: {error:?}", self.name())]
    Headers { error: JsValue },

    #[error("[{}] No window", self.name())]
    MissingWindow,

    #[error("[{}] {error:?}", self.name())]
    RequestError { error: JsValue },

    #[error("[{}] Unexpected {error:?}", self.name())]
    UnexpectedResponseObject { error: JsValue },

    #[error("[{}] Missing response body", self.name())]
    MissingResponseBody,

    #[error("[{}] Failed to download the response body", self.name())]
    FailedResponseBody,

    #[error("[{}] The response body is not a valid UTF-8 string", self.name())]
    InvalidUtf8,
}

impl From<SendRequestError> for CreateCertError {
    fn from(error: SendRequestError) -> Self {
        Self::Transport {
            message: error.to_string(),
        }
    }
}
