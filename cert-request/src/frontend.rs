use std::rc::Rc;

use nameth::NamedEnumValues as _;
use nameth::nameth;
use tracing::debug;
use tracing::info;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::Document;
use web_sys::Element;
use web_sys::Event;
use web_sys::HtmlDocument;
use web_sys::HtmlInputElement;
use web_sys::HtmlSelectElement;
use web_sys::HtmlTextAreaElement;
use web_sys::Window;

use crate::api::client::FetchCertificateService;
use crate::auth_token::CookieJar;
use crate::config::FormConfig;
use crate::controller::FormController;
use crate::controller::Notifier;
use crate::field::FieldId;
use crate::field::FormFields;
use crate::logging::setup_logging;
use crate::render::Panel;
use crate::render::PanelContainer;

type Controller = FormController<
    DomFields,
    DomPanelContainer,
    WindowNotifier,
    DocumentCookies,
    FetchCertificateService,
>;

/// Binds the form with the default element ids and endpoint.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    Ok(run(FormConfig::default())?)
}

/// Binds the form, `config` is a JSON [FormConfig].
#[wasm_bindgen]
pub fn start_with_config(config: &str) -> Result<(), JsValue> {
    let config = FormConfig::from_json(config).map_err(FrontendError::InvalidConfig)?;
    Ok(run(config)?)
}

fn run(config: FormConfig) -> Result<(), FrontendError> {
    setup_logging();
    info!("Starting client");

    let window = web_sys::window().ok_or(FrontendError::MissingWindow)?;
    let document = window.document().ok_or(FrontendError::MissingDocument)?;

    let controller: Rc<Controller> = Rc::new(FormController::new(
        DomFields::new(&document)?,
        DomPanelContainer::new(&document, &config.container_id)?,
        WindowNotifier(window),
        DocumentCookies::new(&document)?,
        FetchCertificateService::new(config.endpoint),
        config.auth_cookie,
    ));

    on_click(&document, &config.submit_id, {
        let controller = controller.clone();
        move || {
            let controller = controller.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = controller.submit().await;
                debug!(?outcome, "Submission settled");
            });
        }
    })?;
    on_click(&document, &config.clear_id, move || controller.clear())?;
    Ok(())
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, FrontendError> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| FrontendError::MissingElement { id: id.to_owned() })?;
    element
        .dyn_into()
        .map_err(|_| FrontendError::WrongElementType {
            id: id.to_owned(),
            expected: std::any::type_name::<T>(),
        })
}

fn on_click(
    document: &Document,
    id: &str,
    mut handler: impl FnMut() + 'static,
) -> Result<(), FrontendError> {
    let element: Element = element_by_id(document, id)?;
    let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        handler()
    });
    element
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .map_err(|error| FrontendError::AddListener {
            id: id.to_owned(),
            error: format!("{error:?}"),
        })?;
    closure.forget();
    Ok(())
}

/// The form controls bound to each [FieldId].
struct DomFields {
    controls: Vec<(FieldId, Control)>,
}

enum Control {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
    Select(HtmlSelectElement),
}

impl DomFields {
    fn new(document: &Document) -> Result<Self, FrontendError> {
        let controls = FieldId::ALL
            .into_iter()
            .map(|field| Ok((field, Control::find(document, field)?)))
            .collect::<Result<_, FrontendError>>()?;
        Ok(Self { controls })
    }

    fn control(&self, field: FieldId) -> Option<&Control> {
        self.controls
            .iter()
            .find_map(|(f, control)| (*f == field).then_some(control))
    }
}

impl Control {
    fn find(document: &Document, field: FieldId) -> Result<Self, FrontendError> {
        let id = field.id();
        let element: Element = element_by_id(document, id)?;
        let element = match element.dyn_into::<HtmlInputElement>() {
            Ok(input) => return Ok(Self::Input(input)),
            Err(element) => element,
        };
        let element = match element.dyn_into::<HtmlTextAreaElement>() {
            Ok(text_area) => return Ok(Self::TextArea(text_area)),
            Err(element) => element,
        };
        match element.dyn_into::<HtmlSelectElement>() {
            Ok(select) => Ok(Self::Select(select)),
            Err(_) => Err(FrontendError::WrongElementType {
                id: id.to_owned(),
                expected: "input, textarea or select",
            }),
        }
    }

    fn value(&self) -> String {
        match self {
            Self::Input(input) => input.value(),
            Self::TextArea(text_area) => text_area.value(),
            Self::Select(select) => select.value(),
        }
    }

    fn set_value(&self, value: &str) {
        match self {
            Self::Input(input) => input.set_value(value),
            Self::TextArea(text_area) => text_area.set_value(value),
            Self::Select(select) => select.set_value(value),
        }
    }
}

impl FormFields for DomFields {
    fn value(&self, field: FieldId) -> String {
        self.control(field).map(Control::value).unwrap_or_default()
    }

    fn set_value(&self, field: FieldId, value: &str) {
        if let Some(control) = self.control(field) {
            control.set_value(value);
        }
    }
}

/// Renders panels as
/// `div.panel.panel-default > (div.panel-heading > h3.panel-title, div.panel-body > pre)`.
struct DomPanelContainer {
    document: Document,
    container: Element,
}

impl DomPanelContainer {
    fn new(document: &Document, id: &str) -> Result<Self, FrontendError> {
        Ok(Self {
            document: document.clone(),
            container: element_by_id(document, id)?,
        })
    }

    fn try_append(&self, panel: Panel<'_>) -> Result<(), JsValue> {
        let wrapper = self.create("div", "panel panel-default")?;
        let heading = self.create("div", "panel-heading")?;
        let title = self.create("h3", "panel-title")?;
        title.set_text_content(Some(panel.title()));
        heading.append_child(&title)?;

        let body = self.create("div", "panel-body")?;
        let pre = self.document.create_element("pre")?;
        pre.set_text_content(Some(panel.body));
        body.append_child(&pre)?;

        wrapper.append_child(&heading)?;
        wrapper.append_child(&body)?;
        self.container.append_child(&wrapper)?;
        Ok(())
    }

    fn create(&self, tag: &str, class: &str) -> Result<Element, JsValue> {
        let element = self.document.create_element(tag)?;
        element.set_class_name(class);
        Ok(element)
    }
}

impl PanelContainer for DomPanelContainer {
    fn clear(&self) {
        self.container.set_text_content(None);
    }

    fn append(&self, panel: Panel<'_>) {
        if let Err(error) = self.try_append(panel) {
            warn!("Failed to render '{}': {error:?}", panel.title());
        }
    }
}

struct WindowNotifier(Window);

impl Notifier for WindowNotifier {
    fn alert(&self, message: &str) {
        if let Err(error) = self.0.alert_with_message(message) {
            warn!("Failed to show alert: {error:?}");
        }
    }
}

struct DocumentCookies(HtmlDocument);

impl DocumentCookies {
    fn new(document: &Document) -> Result<Self, FrontendError> {
        let document = document
            .clone()
            .dyn_into()
            .map_err(|_| FrontendError::NotHtmlDocument)?;
        Ok(Self(document))
    }
}

impl CookieJar for DocumentCookies {
    fn cookies(&self) -> String {
        self.0.cookie().unwrap_or_else(|error| {
            warn!("Failed to read cookies: {error:?}");
            String::default()
        })
    }
}

#[nameth]
#[derive(thiserror::Error, Debug)]
enum FrontendError {
    #[error("[{n}] Invalid config: {0}", n = self.name())]
    InvalidConfig(serde_json::Error),

    #[error("[{n}] No window", n = self.name())]
    MissingWindow,

    #[error("[{n}] No document", n = self.name())]
    MissingDocument,

    #[error("[{n}] The document does not support cookies", n = self.name())]
    NotHtmlDocument,

    #[error("[{n}] #{id} not found", n = self.name())]
    MissingElement { id: String },

    #[error("[{n}] #{id} is not {expected}", n = self.name())]
    WrongElementType { id: String, expected: &'static str },

    #[error("[{n}] Failed to listen to clicks on #{id}: {error}", n = self.name())]
    AddListener { id: String, error: String },
}

impl From<FrontendError> for JsValue {
    fn from(error: FrontendError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}
