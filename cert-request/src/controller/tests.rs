#![cfg(not(target_arch = "wasm32"))]

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::VecDeque;

use futures::poll;

use super::FormController;
use super::Notifier;
use super::SubmitOutcome;
use super::SubmitState;
use super::VALIDATION_MESSAGE;
use crate::api::CertificateService;
use crate::api::CreateCertError;
use crate::certificate::CertificateRequest;
use crate::certificate::CertificateResponse;
use crate::field::FieldId;
use crate::field::FormFields;
use crate::render::tests::RecordingContainer;

#[derive(Default)]
struct Inputs(RefCell<HashMap<FieldId, String>>);

impl Inputs {
    fn filled() -> Self {
        let inputs = Self::default();
        inputs.set_value(FieldId::Authority, "LemurRootCA");
        inputs.set_value(FieldId::CommonName, "alice");
        inputs.set_value(FieldId::Owner, "alice@example.com");
        inputs.set_value(FieldId::ValidityStart, "2026-10-19");
        inputs.set_value(FieldId::ValidityEnd, "2027-10-19");
        inputs
    }
}

impl FormFields for Inputs {
    fn value(&self, field: FieldId) -> String {
        self.0.borrow().get(&field).cloned().unwrap_or_default()
    }

    fn set_value(&self, field: FieldId, value: &str) {
        self.0.borrow_mut().insert(field, value.to_owned());
    }
}

#[derive(Default)]
struct Alerts(RefCell<Vec<String>>);

impl Notifier for Alerts {
    fn alert(&self, message: &str) {
        self.0.borrow_mut().push(message.to_owned());
    }
}

/// Records every call and answers from a queue of canned results.
#[derive(Default)]
struct FakeService {
    calls: RefCell<Vec<(String, CertificateRequest)>>,
    results: RefCell<VecDeque<Result<CertificateResponse, CreateCertError>>>,
    active: Cell<usize>,
    max_active: Cell<usize>,
}

impl FakeService {
    fn answering(
        results: impl IntoIterator<Item = Result<CertificateResponse, CreateCertError>>,
    ) -> Self {
        Self {
            results: RefCell::new(results.into_iter().collect()),
            ..Self::default()
        }
    }
}

impl CertificateService for FakeService {
    async fn create_cert(
        &self,
        auth_token: &str,
        request: &CertificateRequest,
    ) -> Result<CertificateResponse, CreateCertError> {
        self.calls
            .borrow_mut()
            .push((auth_token.to_owned(), request.clone()));
        self.active.set(self.active.get() + 1);
        self.max_active
            .set(self.max_active.get().max(self.active.get()));
        tokio::task::yield_now().await;
        self.active.set(self.active.get() - 1);
        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(CertificateResponse::default()))
    }
}

fn issued() -> CertificateResponse {
    CertificateResponse {
        chain: "A".into(),
        pubcert: "B".into(),
        privatekey: "C".into(),
    }
}

fn setup_logs() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .try_init();
}

const COOKIES: &str = "foo=bar; auth=abc123; baz=qux";

#[tokio::test]
async fn any_empty_field_blocks_submission() {
    setup_logs();
    for mask in 0u32..0b11111 {
        let inputs = Inputs::filled();
        for (i, field) in FieldId::ALL.into_iter().enumerate() {
            if mask & (1 << i) == 0 {
                inputs.set_value(field, "");
            }
        }
        let container = RecordingContainer::default();
        let alerts = Alerts::default();
        let service = FakeService::default();
        let controller =
            FormController::new(&inputs, &container, &alerts, COOKIES, &service, "auth");

        let outcome = controller.submit().await;

        let missing = match outcome {
            SubmitOutcome::Rejected { missing } => missing,
            outcome => panic!("mask={mask:05b}: {outcome:?}"),
        };
        assert!(!missing.is_empty());
        assert!(service.calls.borrow().is_empty(), "mask={mask:05b}");
        assert_eq!(vec![VALIDATION_MESSAGE.to_owned()], *alerts.0.borrow());
        assert_eq!(0, *container.clear_count.borrow());
        assert_eq!(SubmitState::Idle, controller.state());
    }
}

#[tokio::test]
async fn whitespace_is_not_empty() {
    setup_logs();
    let inputs = Inputs::filled();
    inputs.set_value(FieldId::Owner, " ");
    let container = RecordingContainer::default();
    let alerts = Alerts::default();
    let service = FakeService::answering([Ok(issued())]);
    let controller = FormController::new(&inputs, &container, &alerts, COOKIES, &service, "auth");

    assert!(matches!(controller.submit().await, SubmitOutcome::Rendered));
    assert_eq!(" ", service.calls.borrow()[0].1.owner);
}

#[tokio::test]
async fn success_posts_once_renders_and_clears() {
    setup_logs();
    let inputs = Inputs::filled();
    let container = RecordingContainer::default();
    let alerts = Alerts::default();
    let service = FakeService::answering([Ok(issued())]);
    let controller = FormController::new(&inputs, &container, &alerts, COOKIES, &service, "auth");

    let outcome = controller.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Rendered));
    let calls = service.calls.borrow();
    assert_eq!(1, calls.len());
    let (auth_token, request) = &calls[0];
    assert_eq!("abc123", auth_token);
    assert_eq!(
        CertificateRequest {
            authority: "LemurRootCA".into(),
            common_name: "alice".into(),
            owner: "alice@example.com".into(),
            validity_start: "2026-10-19".into(),
            validity_end: "2027-10-19".into(),
        },
        *request
    );
    assert_eq!(
        vec![
            ("Certificate Chain", "A".to_owned()),
            ("Public Certificate", "B".to_owned()),
            ("Private Key", "C".to_owned()),
        ],
        container.snapshot()
    );
    for field in FieldId::ALL {
        assert_eq!("", inputs.value(field), "{field}");
    }
    assert!(alerts.0.borrow().is_empty());
}

#[tokio::test]
async fn missing_cookie_sends_empty_token() {
    setup_logs();
    let inputs = Inputs::filled();
    let container = RecordingContainer::default();
    let alerts = Alerts::default();
    let service = FakeService::answering([Ok(issued())]);
    let controller = FormController::new(&inputs, &container, &alerts, "foo=bar", &service, "auth");

    let _ = controller.submit().await;
    assert_eq!("", service.calls.borrow()[0].0);
}

#[tokio::test]
async fn failure_shows_body_and_keeps_inputs() {
    setup_logs();
    let inputs = Inputs::filled();
    let container = RecordingContainer::default();
    let alerts = Alerts::default();
    let service = FakeService::answering([
        Ok(issued()),
        Err(CreateCertError::Rejected {
            status: 500,
            body: "false".into(),
        }),
    ]);
    let controller = FormController::new(&inputs, &container, &alerts, COOKIES, &service, "auth");
    let _ = controller.submit().await;
    let inputs_after_success: Vec<_> = FieldId::ALL.iter().map(|f| inputs.value(*f)).collect();
    assert!(inputs_after_success.iter().all(String::is_empty));

    let filled = Inputs::filled();
    for field in FieldId::ALL {
        inputs.set_value(field, &filled.value(field));
    }
    let outcome = controller.submit().await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed(CreateCertError::Rejected { status: 500, .. })
    ));
    assert_eq!(vec!["false".to_owned()], *alerts.0.borrow());
    assert_eq!("alice", inputs.value(FieldId::CommonName));
    assert_eq!(3, container.snapshot().len(), "previous panels are kept");
    assert_eq!(SubmitState::Idle, controller.state());
}

#[tokio::test]
async fn transport_failure_shows_error() {
    setup_logs();
    let inputs = Inputs::filled();
    let container = RecordingContainer::default();
    let alerts = Alerts::default();
    let service = FakeService::answering([Err(CreateCertError::Transport {
        message: "offline".into(),
    })]);
    let controller = FormController::new(&inputs, &container, &alerts, COOKIES, &service, "auth");

    let outcome = controller.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(vec!["[Transport] offline".to_owned()], *alerts.0.borrow());
    assert!(container.snapshot().is_empty());
}

#[tokio::test]
async fn missing_private_key_renders_empty_panel() {
    setup_logs();
    let inputs = Inputs::filled();
    let container = RecordingContainer::default();
    let alerts = Alerts::default();
    let response: CertificateResponse =
        serde_json::from_str(r#"{"chain":"A","pubcert":"B"}"#).unwrap();
    let service = FakeService::answering([Ok(response)]);
    let controller = FormController::new(&inputs, &container, &alerts, COOKIES, &service, "auth");

    let _ = controller.submit().await;

    assert_eq!(("Private Key", String::new()), container.snapshot()[2]);
}

#[tokio::test]
async fn submitting_state_is_visible() {
    setup_logs();
    let inputs = Inputs::filled();
    let container = RecordingContainer::default();
    let alerts = Alerts::default();
    let service = FakeService::answering([Ok(issued())]);
    let controller = FormController::new(&inputs, &container, &alerts, COOKIES, &service, "auth");

    let mut submit = std::pin::pin!(controller.submit());
    assert!(poll!(submit.as_mut()).is_pending());
    assert_eq!(SubmitState::Submitting { in_flight: 1 }, controller.state());
    let outcome = submit.await;

    assert!(matches!(outcome, SubmitOutcome::Rendered));
    assert_eq!(SubmitState::Idle, controller.state());
}

#[tokio::test]
async fn dropped_submission_leaves_idle() {
    setup_logs();
    let inputs = Inputs::filled();
    let container = RecordingContainer::default();
    let alerts = Alerts::default();
    let service = FakeService::default();
    let controller = FormController::new(&inputs, &container, &alerts, COOKIES, &service, "auth");

    {
        let mut submit = Box::pin(controller.submit());
        assert!(poll!(submit.as_mut()).is_pending());
        assert_eq!(SubmitState::Submitting { in_flight: 1 }, controller.state());
    }
    assert_eq!(SubmitState::Idle, controller.state());
    assert!(container.snapshot().is_empty());
}

/// Overlapping clicks are not de-duplicated: both requests go out.
#[tokio::test]
async fn overlapping_submissions_both_sent() {
    setup_logs();
    let inputs = Inputs::filled();
    let container = RecordingContainer::default();
    let alerts = Alerts::default();
    let service = FakeService::answering([
        Ok(issued()),
        Ok(CertificateResponse {
            chain: "X".into(),
            pubcert: "Y".into(),
            privatekey: "Z".into(),
        }),
    ]);
    let controller = FormController::new(&inputs, &container, &alerts, COOKIES, &service, "auth");

    let mut first = std::pin::pin!(controller.submit());
    let mut second = std::pin::pin!(controller.submit());
    assert!(poll!(first.as_mut()).is_pending());
    assert!(poll!(second.as_mut()).is_pending());
    assert_eq!(SubmitState::Submitting { in_flight: 2 }, controller.state());

    let (first, second) = futures::join!(first, second);

    assert!(matches!(first, SubmitOutcome::Rendered));
    assert!(matches!(second, SubmitOutcome::Rendered));
    assert_eq!(2, service.calls.borrow().len());
    assert_eq!(2, service.max_active.get());
    let bodies: Vec<_> = container.snapshot().into_iter().map(|(_, b)| b).collect();
    assert_eq!(vec!["X", "Y", "Z"], bodies, "last response wins");
    assert_eq!(SubmitState::Idle, controller.state());
}

#[test]
fn clear_removes_panels_only() {
    let inputs = Inputs::filled();
    let container = RecordingContainer::default();
    let alerts = Alerts::default();
    let service = FakeService::default();
    let controller = FormController::new(&inputs, &container, &alerts, COOKIES, &service, "auth");
    crate::render::render(&container, &issued());

    controller.clear();

    assert!(container.snapshot().is_empty());
    assert_eq!("alice", inputs.value(FieldId::CommonName));
    assert!(service.calls.borrow().is_empty());
}

#[test]
fn custom_auth_cookie() {
    let inputs = Inputs::default();
    let container = RecordingContainer::default();
    let alerts = Alerts::default();
    let service = FakeService::default();
    let controller = FormController::new(
        &inputs,
        &container,
        &alerts,
        "auth=wrong; session=right",
        &service,
        "session",
    );
    assert_eq!("right", controller.read_auth_token());
}
