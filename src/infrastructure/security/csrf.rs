//! Double-submit CSRF protection.
//!
//! The token is issued in an HttpOnly cookie and in the response body; the
//! client echoes the body copy in the `x-csrf-token` header. A request is
//! genuine when both copies are present and identical. Nothing is stored
//! server-side.

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{http::header, HttpRequest};
use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;

use crate::constants::{CSRF_COOKIE_NAME, CSRF_HEADER_NAME, CSRF_TOKEN_BYTES, CSRF_TOKEN_TTL_SECS};

/// 32 bytes from the OS CSPRNG as 64 lowercase hex characters.
pub fn generate_token() -> String {
    let mut bytes = [0u8; CSRF_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);

    hex::encode(bytes)
}

pub fn build_csrf_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(CSRF_COOKIE_NAME, token.to_string())
        .path("/")
        .same_site(SameSite::Strict)
        .secure(true)
        .http_only(true)
        .max_age(CookieDuration::seconds(CSRF_TOKEN_TTL_SECS))
        .finish()
}

/// Looks up `name` in a Cookie header. Segments without a key or a value are
/// skipped.
pub fn find_cookie<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|segment| segment.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// True only when both tokens are present, non-empty, and byte-identical.
pub fn tokens_match(cookie_token: Option<&str>, header_token: Option<&str>) -> bool {
    match (cookie_token, header_token) {
        (Some(cookie), Some(header)) if !cookie.is_empty() && !header.is_empty() => {
            cookie.len() == header.len() && bool::from(cookie.as_bytes().ct_eq(header.as_bytes()))
        }
        _ => false,
    }
}

pub fn verify_request(req: &HttpRequest) -> bool {
    // HTTP/2 clients may split cookies across several headers.
    let cookie_header = req
        .headers()
        .get_all(header::COOKIE)
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");

    let header_token = req
        .headers()
        .get(CSRF_HEADER_NAME)
        .and_then(|value| value.to_str().ok())
        .map(str::trim);

    tokens_match(find_cookie(&cookie_header, CSRF_COOKIE_NAME), header_token)
}
