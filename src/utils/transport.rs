//! HTTP transport seam.
//!
//! The content client only needs three request shapes, so the transport is
//! a small trait. The browser implementation sends cookies along with every
//! request, since the storage session lives in a server cookie.

use serde_json::Value;

use crate::core::error::FetchError;

/// Asynchronous HTTP requests issued by the content client.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// GET `url` and parse the body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;

    /// POST `fields` form-encoded to `url`, returning the body text.
    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<String, FetchError>;

    /// GET `url`, returning the body text.
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTransport;

#[cfg(target_arch = "wasm32")]
mod browser {
    use serde_json::Value;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestCredentials, RequestInit, RequestMode, Response};

    use super::Transport;
    use crate::core::error::FetchError;
    use crate::utils::dom;

    /// Transport over the browser Fetch API.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct BrowserTransport;

    impl Transport for BrowserTransport {
        async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
            let text = fetch_text("GET", url, None).await?;
            serde_json::from_str(&text).map_err(|e| FetchError::JsonParseError(e.to_string()))
        }

        async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<String, FetchError> {
            let body = fields
                .iter()
                .map(|(name, value)| format!("{}={}", encode(name), encode(value)))
                .collect::<Vec<_>>()
                .join("&");
            fetch_text("POST", url, Some(body)).await
        }

        async fn get_text(&self, url: &str) -> Result<String, FetchError> {
            fetch_text("GET", url, None).await
        }
    }

    fn encode(component: &str) -> String {
        String::from(js_sys::encode_uri_component(component))
    }

    async fn fetch_text(method: &str, url: &str, body: Option<String>) -> Result<String, FetchError> {
        let window = dom::window()
            .ok_or_else(|| FetchError::NetworkError("window not available".to_string()))?;

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        opts.set_credentials(RequestCredentials::Include);
        if let Some(body) = body {
            let headers = Headers::new().map_err(|_| FetchError::RequestCreationFailed)?;
            headers
                .set("Content-Type", "application/x-www-form-urlencoded")
                .map_err(|_| FetchError::RequestCreationFailed)?;
            opts.set_headers(&headers);
            opts.set_body(&JsValue::from_str(&body));
        }

        let request = Request::new_with_str_and_init(url, &opts)
            .map_err(|_| FetchError::RequestCreationFailed)?;

        let result = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| {
                FetchError::NetworkError(e.as_string().unwrap_or_else(|| "Unknown error".to_string()))
            })?;
        let resp: Response = result
            .dyn_into()
            .map_err(|_| FetchError::ResponseReadFailed)?;

        if !resp.ok() {
            return Err(FetchError::HttpError {
                status: resp.status(),
                status_text: resp.status_text(),
            });
        }

        let text = JsFuture::from(resp.text().map_err(|_| FetchError::ResponseReadFailed)?)
            .await
            .map_err(|_| FetchError::ResponseReadFailed)?;

        text.as_string().ok_or(FetchError::ResponseReadFailed)
    }
}
