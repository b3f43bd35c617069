// src/render/zenrows.rs

use std::collections::HashMap;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};

use super::renderer::{RenderError, RenderRequest, Renderer};
use crate::config::Config;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

const ENDPOINT: &str = "https://api.zenrows.com/v1/";

/// Renders pages through the ZenRows API: ZenRows drives the headless
/// browser, honors `wait_for`, and returns the settled document.
pub struct ZenRowsRenderer {
    client: Client,
    api_key: String,
}

impl ZenRowsRenderer {
    /// Reads `ZENROWS_API_KEY`; a missing key fails here rather than on
    /// the first fetch.
    pub fn from_env(config: &Config) -> Result<Self, RenderError> {
        let api_key = std::env::var("ZENROWS_API_KEY").map_err(|_| {
            RenderError::Config("ZENROWS_API_KEY environment variable not set".into())
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.render_timeout)
            .build()
            .map_err(|e| RenderError::Network(e.to_string()))?;

        Ok(Self { client, api_key })
    }
}

impl Renderer for ZenRowsRenderer {
    fn render(&self, request: &RenderRequest) -> Result<String, RenderError> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));

        let mut params = HashMap::new();
        params.insert("url", request.url.clone());
        params.insert("apikey", self.api_key.clone());
        params.insert("js_render", "true".to_string());
        params.insert("wait_for", request.wait_for.clone());
        params.insert("original_status", "true".to_string());

        let resp = self
            .client
            .get(ENDPOINT)
            .headers(headers)
            .query(&params)
            .send()
            .map_err(|e| RenderError::Network(e.to_string()))?;

        let status = resp.status();

        // ZenRows reports the upstream site's status in a response header.
        let original_status = resp
            .headers()
            .iter()
            .find(|(k, _)| k.as_str().to_ascii_lowercase().contains("original"))
            .map(|(_, v)| v.to_str().unwrap_or("?").to_string())
            .unwrap_or_else(|| "<none>".to_string());

        let text = resp
            .text()
            .map_err(|e| RenderError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(RenderError::Upstream(format!(
                "HTTP {} (upstream {}): {}",
                status,
                original_status,
                truncate(&text, 300)
            )));
        }

        // A JSON body with a "code" field is the API reporting a failure
        // despite the 200.
        if text.starts_with('{') {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&text) {
                if json.get("code").is_some() {
                    return Err(RenderError::Upstream(format!(
                        "API error (upstream {}): {}",
                        original_status,
                        truncate(&text, 300)
                    )));
                }
            }
        }

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "zenrows"
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}
