//! Canned-response [`GraphApi`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::{GraphApi, TokenScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeScope {
    User,
    Page,
}

impl From<TokenScope<'_>> for FakeScope {
    fn from(scope: TokenScope<'_>) -> Self {
        match scope {
            TokenScope::User => FakeScope::User,
            TokenScope::Page(_) => FakeScope::Page,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: String,
    pub fields: Option<String>,
    pub scope: FakeScope,
}

struct Route {
    endpoint: String,
    fields: Option<String>,
    scope: Option<FakeScope>,
    body: Value,
}

impl Route {
    /// Number of constraints met, or `None` if any constraint fails.
    fn specificity(&self, endpoint: &str, fields: Option<&str>, scope: FakeScope) -> Option<u8> {
        if self.endpoint != endpoint {
            return None;
        }
        let mut score = 0;
        if let Some(expected) = &self.fields {
            if fields != Some(expected.as_str()) {
                return None;
            }
            score += 1;
        }
        if let Some(expected) = self.scope {
            if expected != scope {
                return None;
            }
            score += 1;
        }
        Some(score)
    }
}

/// Answers requests from registered routes; unrouted requests get `None`,
/// like a failed call. Every request is recorded.
pub struct FakeGraph {
    routes: Vec<Route>,
    page_tokens: HashMap<String, String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            page_tokens: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Respond to `endpoint` regardless of fields or token.
    pub fn route(self, endpoint: &str, body: Value) -> Self {
        self.add(endpoint, None, None, body)
    }

    pub fn route_fields(self, endpoint: &str, fields: &str, body: Value) -> Self {
        self.add(endpoint, Some(fields), None, body)
    }

    pub fn route_scoped(self, endpoint: &str, fields: &str, scope: FakeScope, body: Value) -> Self {
        self.add(endpoint, Some(fields), Some(scope), body)
    }

    pub fn with_page_token(mut self, page_id: &str, token: &str) -> Self {
        self.page_tokens.insert(page_id.to_string(), token.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls().iter().filter(|c| c.endpoint == endpoint).count()
    }

    fn add(mut self, endpoint: &str, fields: Option<&str>, scope: Option<FakeScope>, body: Value) -> Self {
        self.routes.push(Route {
            endpoint: endpoint.to_string(),
            fields: fields.map(str::to_string),
            scope,
            body,
        });
        self
    }
}

impl Default for FakeGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphApi for FakeGraph {
    async fn request(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        scope: TokenScope<'_>,
    ) -> Option<Value> {
        let fields = params
            .iter()
            .find(|(key, _)| *key == "fields")
            .map(|(_, value)| value.as_str());
        let scope = FakeScope::from(scope);

        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedCall {
                endpoint: endpoint.to_string(),
                fields: fields.map(str::to_string),
                scope,
            });

        self.routes
            .iter()
            .filter_map(|route| Some((route.specificity(endpoint, fields, scope)?, route)))
            .max_by_key(|(score, _)| *score)
            .map(|(_, route)| route.body.clone())
    }

    async fn page_token(&self, page_id: &str) -> Option<String> {
        self.page_tokens.get(page_id).cloned()
    }

    fn user_token(&self) -> &str {
        "fake-user-token"
    }
}
