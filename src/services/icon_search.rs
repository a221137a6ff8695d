use nanoid::nanoid;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;

use crate::configuration::IconSearchSettings;
use crate::errors::IconSearchError;
use crate::services::signing;

/// Client for the third-party icon database. One signed request per lookup,
/// `limit=1`, no retry, no cache. The consumer credential never leaves the
/// process.
#[derive(Clone, Debug)]
pub struct NounProjectClient {
    http: reqwest::Client,
    endpoint: String,
    consumer_key: String,
    consumer_secret: SecretString,
}

impl NounProjectClient {
    pub fn new(settings: &IconSearchSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            consumer_key: settings.consumer_key.clone(),
            consumer_secret: settings.consumer_secret.clone(),
        }
    }

    /// Best single match for the query, `Ok(None)` when the upstream has no
    /// results.
    #[instrument(name = "Icon search: upstream query", skip(self))]
    pub async fn search(&self, query: &str) -> Result<Option<String>, IconSearchError> {
        let nonce = nanoid!(32);
        let timestamp = chrono::Utc::now().timestamp() as u64;
        let auth_header = signing::authorization_header(
            "GET",
            &self.endpoint,
            &[("query", query), ("limit", "1")],
            &self.consumer_key,
            self.consumer_secret.expose_secret(),
            &nonce,
            timestamp,
        );

        let url = format!(
            "{}?query={}&limit=1",
            self.endpoint,
            urlencoding::encode(query)
        );
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, auth_header)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Icon search request failed: {:?}", e);
                IconSearchError::Upstream(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(IconSearchError::Upstream(format!(
                "upstream returned {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| IconSearchError::Upstream(e.to_string()))?;

        Ok(extract_icon_url(&body))
    }
}

/// First result's thumbnail, falling back to its preview image.
fn extract_icon_url(body: &Value) -> Option<String> {
    let icon = body.get("icons").and_then(|icons| icons.get(0))?;
    let pick = |key: &str| {
        icon.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };
    pick("thumbnail_url")
        .or_else(|| pick("preview_url"))
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_the_thumbnail_url() {
        let body = json!({
            "icons": [{ "thumbnail_url": "https://t.example/1.png", "preview_url": "https://p.example/1.png" }]
        });
        assert_eq!(
            extract_icon_url(&body),
            Some("https://t.example/1.png".to_string())
        );
    }

    #[test]
    fn falls_back_to_the_preview_url() {
        let body = json!({
            "icons": [{ "thumbnail_url": "", "preview_url": "https://p.example/1.png" }]
        });
        assert_eq!(
            extract_icon_url(&body),
            Some("https://p.example/1.png".to_string())
        );
    }

    #[test]
    fn zero_results_yield_none() {
        assert_eq!(extract_icon_url(&json!({ "icons": [] })), None);
        assert_eq!(extract_icon_url(&json!({})), None);
    }
}
