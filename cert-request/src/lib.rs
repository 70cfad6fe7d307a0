//! Certificate request form.
//!
//! Collects the authority, common name, owner and validity window from the page,
//! posts them to the certificate-issuance endpoint and renders the returned
//! chain, public certificate and private key.
//!
//! The core ([controller], [render], [auth_token]) only talks to the page through
//! the traits in [field], [render] and [api], so it runs and is tested natively.
//! The browser bindings are behind the `client` feature.

pub mod api;
pub mod auth_token;
pub mod certificate;
pub mod config;
pub mod controller;
pub mod field;
pub mod render;

#[cfg(feature = "client")]
mod frontend;
#[cfg(feature = "client")]
mod logging;

#[cfg(feature = "client")]
pub use self::frontend::start;
#[cfg(feature = "client")]
pub use self::frontend::start_with_config;
