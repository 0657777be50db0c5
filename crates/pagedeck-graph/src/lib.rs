pub mod client;
pub mod comments;
pub mod permissions;
pub mod token_cache;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

use async_trait::async_trait;
use serde_json::Value;

pub use client::GraphClient;

pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v18.0";

const ACCOUNTS_LIMIT: u32 = 100;
const POSTS_LIMIT: u32 = 25;
const COMMENTS_LIMIT: u32 = 100;
const CONVERSATIONS_LIMIT: u32 = 25;
const MESSAGES_LIMIT: u32 = 50;

const PAGE_FIELDS: &str = "id,name,category,followers_count,fan_count";
const POST_FIELDS: &str = "id,message,story,created_time,reactions.summary(total_count),likes.summary(true),comments.summary(true),shares";
const CONVERSATION_FIELDS: &str = "id,snippet,updated_time,message_count,unread_count,participants";
const MESSAGE_FIELDS: &str = "id,message,from,created_time,attachments";
const INSIGHT_METRICS: &str = "page_fans,page_impressions,page_engaged_users";

/// Which credential a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenScope<'a> {
    /// The process-wide user token.
    User,
    /// A token scoped to one page, from [`GraphApi::page_token`].
    Page(&'a str),
}

/// Read access to the social-graph API.
///
/// Every call degrades to `None` on failure; implementations log the cause.
/// Callers treat `None` as "skip this resource", never as fatal.
#[async_trait]
pub trait GraphApi: Send + Sync {
    /// GET `{base}/{endpoint}` with `params` plus the scope's access token.
    async fn request(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        scope: TokenScope<'_>,
    ) -> Option<Value>;

    /// Page-scoped token for `page_id`.
    async fn page_token(&self, page_id: &str) -> Option<String>;

    fn user_token(&self) -> &str;

    // -- Resource helpers --

    /// Pages managed by the user.
    async fn pages(&self) -> Option<Value> {
        let params = [
            ("fields", "id,name,category".to_string()),
            ("limit", ACCOUNTS_LIMIT.to_string()),
        ];
        self.request("me/accounts", &params, TokenScope::User).await
    }

    async fn page_info(&self, page_id: &str, scope: TokenScope<'_>) -> Option<Value> {
        let params = [("fields", PAGE_FIELDS.to_string())];
        self.request(page_id, &params, scope).await
    }

    /// Posts with reactions, likes, comments and shares summaries embedded.
    async fn page_posts(&self, page_id: &str, token: &str) -> Option<Value> {
        let params = [
            ("fields", POST_FIELDS.to_string()),
            ("limit", POSTS_LIMIT.to_string()),
        ];
        self.request(&format!("{page_id}/posts"), &params, TokenScope::Page(token))
            .await
    }

    async fn page_posts_simple(&self, page_id: &str, scope: TokenScope<'_>) -> Option<Value> {
        let params = [
            ("fields", "id,message,created_time".to_string()),
            ("limit", POSTS_LIMIT.to_string()),
        ];
        self.request(&format!("{page_id}/posts"), &params, scope).await
    }

    async fn page_feed(&self, page_id: &str, scope: TokenScope<'_>) -> Option<Value> {
        let params = [
            ("fields", "id,message,story,created_time".to_string()),
            ("limit", POSTS_LIMIT.to_string()),
        ];
        self.request(&format!("{page_id}/feed"), &params, scope).await
    }

    async fn post_comments(
        &self,
        post_id: &str,
        fields: &str,
        scope: TokenScope<'_>,
    ) -> Option<Value> {
        let params = [
            ("fields", fields.to_string()),
            ("limit", COMMENTS_LIMIT.to_string()),
        ];
        self.request(&format!("{post_id}/comments"), &params, scope).await
    }

    /// Single-comment lookup returning only its `from` edge.
    async fn comment_author(&self, comment_id: &str, scope: TokenScope<'_>) -> Option<Value> {
        let params = [("fields", "from".to_string())];
        self.request(comment_id, &params, scope).await
    }

    async fn page_conversations(&self, page_id: &str, token: &str) -> Option<Value> {
        let params = [
            ("fields", CONVERSATION_FIELDS.to_string()),
            ("limit", CONVERSATIONS_LIMIT.to_string()),
        ];
        self.request(
            &format!("{page_id}/conversations"),
            &params,
            TokenScope::Page(token),
        )
        .await
    }

    async fn conversation_messages(&self, conversation_id: &str, token: &str) -> Option<Value> {
        let params = [
            ("fields", MESSAGE_FIELDS.to_string()),
            ("limit", MESSAGES_LIMIT.to_string()),
        ];
        self.request(
            &format!("{conversation_id}/messages"),
            &params,
            TokenScope::Page(token),
        )
        .await
    }

    async fn page_insights(&self, page_id: &str, scope: TokenScope<'_>) -> Option<Value> {
        let params = [
            ("metric", INSIGHT_METRICS.to_string()),
            ("period", "day".to_string()),
        ];
        self.request(&format!("{page_id}/insights"), &params, scope).await
    }

    // -- Introspection --

    async fn permissions(&self) -> Option<Value> {
        self.request("me/permissions", &[], TokenScope::User).await
    }

    async fn debug_token(&self) -> Option<Value> {
        let params = [("input_token", self.user_token().to_string())];
        self.request("debug_token", &params, TokenScope::User).await
    }

    async fn me(&self) -> Option<Value> {
        let params = [("fields", "id,name".to_string())];
        self.request("me", &params, TokenScope::User).await
    }
}
