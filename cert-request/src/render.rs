//! Renders a [CertificateResponse] as three stacked panels.

use tracing::debug;

use crate::certificate::CertificateResponse;

/// The artifacts returned by the server, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelKind {
    Chain,
    PublicCertificate,
    PrivateKey,
}

impl PanelKind {
    pub const ALL: [Self; 3] = [Self::Chain, Self::PublicCertificate, Self::PrivateKey];

    pub fn title(self) -> &'static str {
        match self {
            Self::Chain => "Certificate Chain",
            Self::PublicCertificate => "Public Certificate",
            Self::PrivateKey => "Private Key",
        }
    }

    pub fn content(self, response: &CertificateResponse) -> &str {
        match self {
            Self::Chain => &response.chain,
            Self::PublicCertificate => &response.pubcert,
            Self::PrivateKey => &response.privatekey,
        }
    }
}

/// A header with a title and a body with preformatted text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Panel<'t> {
    pub kind: PanelKind,
    pub body: &'t str,
}

impl Panel<'_> {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// The element that holds the rendered panels.
pub trait PanelContainer {
    /// Removes all the children.
    fn clear(&self);

    /// Appends a panel after the existing children.
    fn append(&self, panel: Panel<'_>);
}

impl<T: PanelContainer + ?Sized> PanelContainer for &T {
    fn clear(&self) {
        (**self).clear()
    }

    fn append(&self, panel: Panel<'_>) {
        (**self).append(panel)
    }
}

/// Replaces the content of the container with one panel per artifact.
pub fn render(container: &impl PanelContainer, response: &CertificateResponse) {
    container.clear();
    for kind in PanelKind::ALL {
        let body = kind.content(response);
        debug!(panel = kind.title(), len = body.len(), "Render panel");
        container.append(Panel { kind, body });
    }
}
