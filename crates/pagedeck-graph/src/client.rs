use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::token_cache::TokenCache;
use crate::{GraphApi, TokenScope};

/// HTTP-backed [`GraphApi`].
///
/// Holds the user token for the process lifetime and caches page tokens per
/// instance. No retries: a failed call is logged and reported as `None`.
pub struct GraphClient {
    http: Client,
    base_url: String,
    user_token: String,
    page_tokens: TokenCache,
}

impl GraphClient {
    pub fn new(base_url: &str, user_token: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_token: user_token.to_string(),
            page_tokens: TokenCache::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn lookup_page_token(&self, page_id: &str) -> Option<String> {
        let params = [("fields", "access_token".to_string())];
        let body = self.request(page_id, &params, TokenScope::User).await?;
        let token = body.get("access_token").and_then(Value::as_str);
        if token.is_none() {
            warn!("No access_token in token lookup for page {}", page_id);
        }
        token.map(str::to_string)
    }
}

#[async_trait]
impl GraphApi for GraphClient {
    async fn request(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        scope: TokenScope<'_>,
    ) -> Option<Value> {
        let token = match scope {
            TokenScope::User => self.user_token.as_str(),
            TokenScope::Page(token) => token,
        };
        let url = format!("{}/{}", self.base_url, endpoint);

        debug!("GET {} ({} token)", endpoint, scope_label(scope));

        let resp = match self
            .http
            .get(&url)
            .query(params)
            .query(&[("access_token", token)])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                // Strip the URL: it carries the access token
                warn!("Request to {} failed: {}", endpoint, e.without_url());
                return None;
            }
        };

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                "Request to {} returned {}: {}",
                endpoint,
                status,
                api_error_message(&body)
            );
            return None;
        }

        match resp.json::<Value>().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("Undecodable response from {}: {}", endpoint, e.without_url());
                None
            }
        }
    }

    async fn page_token(&self, page_id: &str) -> Option<String> {
        self.page_tokens
            .get_or_fetch(page_id, || self.lookup_page_token(page_id))
            .await
    }

    fn user_token(&self) -> &str {
        &self.user_token
    }
}

fn scope_label(scope: TokenScope<'_>) -> &'static str {
    match scope {
        TokenScope::User => "user",
        TokenScope::Page(_) => "page",
    }
}

/// `error.message` from an API error body, or the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_extracted_from_api_body() {
        let body = r#"{"error":{"message":"(#10) Requires pages_read_engagement","type":"OAuthException","code":10}}"#;
        assert_eq!(api_error_message(body), "(#10) Requires pages_read_engagement");
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = GraphClient::new(
            "https://graph.example.test/v18.0/",
            "token",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url(), "https://graph.example.test/v18.0");
        assert_eq!(client.user_token(), "token");
    }
}
