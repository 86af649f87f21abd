use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, Document, Headers, HtmlDocument, Request, RequestInit, Response, Window};

use polymesh_shared::{
    cookie_value, decode_mesh_response, Edge, MeshRequest, CSRF_COOKIE, CSRF_HEADER,
    MESH_ENDPOINT,
};

use crate::dom::input_value;
use crate::error::SubmitError;

const CSRF_INPUT_ID: &str = "csrf_token";

pub fn csrf_token(document: &Document) -> Option<String> {
    let cookies = document
        .dyn_ref::<HtmlDocument>()
        .and_then(|document| document.cookie().ok())
        .unwrap_or_default();
    pick_token(input_value(document, CSRF_INPUT_ID), &cookies)
}

/// The page-embedded token wins over the cookie.
fn pick_token(input: Option<String>, cookies: &str) -> Option<String> {
    input.or_else(|| cookie_value(cookies, CSRF_COOKIE))
}

/// Posts the polygon and decodes the reply. Failure bodies arrive with 4xx/5xx
/// statuses, so the body is decoded whatever the status.
pub async fn post_mesh(
    window: &Window,
    request: &MeshRequest,
    csrf: Option<&str>,
    signal: Option<&AbortSignal>,
) -> Result<Vec<Edge>, SubmitError> {
    let body = serde_json::to_string(request)
        .map_err(|error| SubmitError::TransportFailure(error.to_string()))?;
    let (status, text) = send_json(window, &body, csrf, signal)
        .await
        .map_err(|error| SubmitError::TransportFailure(format!("{error:?}")))?;
    let response = decode_mesh_response(&text).map_err(|error| {
        SubmitError::TransportFailure(format!("status {status}: undecodable body: {error}"))
    })?;
    response.into_result().map_err(SubmitError::ServiceRejected)
}

async fn send_json(
    window: &Window,
    body: &str,
    csrf: Option<&str>,
    signal: Option<&AbortSignal>,
) -> Result<(u16, String), JsValue> {
    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;
    if let Some(token) = csrf {
        headers.set(CSRF_HEADER, token)?;
    }

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(body));
    init.set_signal(signal);

    let request = Request::new_with_str_and_init(MESH_ENDPOINT, &init)?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    let text = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("Response body is not text"))?;
    Ok((response.status(), text))
}

#[cfg(test)]
mod tests {
    use super::pick_token;

    #[test]
    fn input_token_takes_precedence() {
        assert_eq!(
            pick_token(Some("from-input".into()), "csrftoken=from-cookie"),
            Some("from-input".to_string())
        );
    }

    #[test]
    fn falls_back_to_cookie() {
        assert_eq!(
            pick_token(None, "theme=dark; csrftoken=from-cookie"),
            Some("from-cookie".to_string())
        );
        assert_eq!(pick_token(None, "theme=dark"), None);
    }
}
