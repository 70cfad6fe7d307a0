//! Extracts the bearer token from the document cookies.

use tracing::warn;

/// Name of the cookie holding the token forwarded in the `Authorization` header.
pub const AUTH_COOKIE: &str = "auth";

/// Source of the document's cookie string, e.g. `"foo=bar; auth=abc123"`.
pub trait CookieJar {
    fn cookies(&self) -> String;
}

impl CookieJar for str {
    fn cookies(&self) -> String {
        self.to_owned()
    }
}

impl CookieJar for String {
    fn cookies(&self) -> String {
        self.clone()
    }
}

impl<T: CookieJar + ?Sized> CookieJar for &T {
    fn cookies(&self) -> String {
        (**self).cookies()
    }
}

/// Returns the value of the [AUTH_COOKIE], or an empty string.
pub fn read_auth_token(cookies: &str) -> String {
    read_cookie(cookies, AUTH_COOKIE)
}

/// Returns the percent-decoded value of the first `name=value` segment, or an empty string.
///
/// Segments are separated by `;`. Leading spaces of each segment are skipped and
/// the segment must start with exactly `name=`.
pub fn read_cookie(cookies: &str, name: &str) -> String {
    cookies
        .split(';')
        .map(|segment| segment.trim_start_matches(' '))
        .find_map(|segment| segment.strip_prefix(name)?.strip_prefix('='))
        .map(decode)
        .unwrap_or_default()
}

fn decode(value: &str) -> String {
    match urlencoding::decode(value) {
        Ok(decoded) => decoded.into_owned(),
        Err(error) => {
            warn!("Cookie value is not valid percent-encoding: {error}");
            value.to_owned()
        }
    }
}
