//! Scoring backend client.
//!
//! One request/response pair: POST the analysis text, decode tokens plus
//! the attention tensor. Every failure path collapses into a display
//! string; callers surface it and leave the previous analysis in place.

use attention::{AnalyzeRequest, AnalyzeResponse};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

/// Same-origin scoring endpoint; `attention-serve` proxies it to the
/// backend.
pub const SCORING_ENDPOINT: &str = "/get_attention";

/// POST the analysis text and decode the `{tokens, attention}` payload.
pub async fn fetch_attention(text: &str) -> Result<AnalyzeResponse, String> {
    let window = web_sys::window().ok_or("no window")?;

    let body = serde_json::to_string(&AnalyzeRequest { text })
        .map_err(|err| format!("failed to encode request: {}", err))?;

    let headers = Headers::new().map_err(describe)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(describe)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_headers(headers.as_ref());
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(SCORING_ENDPOINT, &opts).map_err(describe)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| "network error reaching the scoring backend".to_string())?
        .dyn_into()
        .map_err(|_| "unexpected fetch result".to_string())?;

    if !response.ok() {
        return Err(format!(
            "scoring request failed: {} {}",
            response.status(),
            response.status_text()
        ));
    }

    let payload = JsFuture::from(response.text().map_err(describe)?)
        .await
        .map_err(describe)?
        .as_string()
        .ok_or("scoring response was not text")?;

    serde_json::from_str(&payload).map_err(|err| format!("malformed scoring response: {}", err))
}

fn describe(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}
