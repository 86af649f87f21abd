use axum::http::header::{InvalidHeaderValue, COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use polymesh_shared::{cookie_value, CSRF_COOKIE, CSRF_HEADER};
use uuid::Uuid;

pub fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookies| cookie_value(cookies, CSRF_COOKIE))
}

pub fn set_cookie_value(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!("{CSRF_COOKIE}={token}; Path=/; SameSite=Lax"))
}

/// Double-submit check: the header must echo the cookie.
pub fn verify(headers: &HeaderMap) -> bool {
    let Some(cookie) = cookie_token(headers) else {
        return false;
    };
    headers
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|header| header == cookie)
        .unwrap_or(false)
}
