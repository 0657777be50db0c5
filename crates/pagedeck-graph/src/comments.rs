//! Comment fetching with layered fallbacks.
//!
//! Comment authors are often withheld depending on token type and app review
//! status, so the same listing is requested several ways. Strategies run in
//! [`COMMENT_STRATEGIES`] order and the first one returning a non-empty `data`
//! array wins.

use serde_json::Value;
use tracing::debug;

use crate::{GraphApi, TokenScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStrategy {
    /// Full field set with a nested author selection, page token.
    Rich,
    /// Plain `from` edge, page token.
    Reduced,
    /// No author fields; each comment's author is looked up separately.
    MinimalEnriched,
    /// Plain `from` edge, user token.
    UserToken,
}

pub const COMMENT_STRATEGIES: [CommentStrategy; 4] = [
    CommentStrategy::Rich,
    CommentStrategy::Reduced,
    CommentStrategy::MinimalEnriched,
    CommentStrategy::UserToken,
];

impl CommentStrategy {
    pub fn fields(self) -> &'static str {
        match self {
            CommentStrategy::Rich => "id,message,from{id,name},created_time,like_count",
            CommentStrategy::Reduced | CommentStrategy::UserToken => "id,message,from,created_time",
            CommentStrategy::MinimalEnriched => "id,message,created_time",
        }
    }

    pub fn scope(self, page_token: &str) -> TokenScope<'_> {
        match self {
            CommentStrategy::UserToken => TokenScope::User,
            _ => TokenScope::Page(page_token),
        }
    }
}

#[derive(Debug)]
pub struct FetchedComments {
    pub strategy: CommentStrategy,
    pub items: Vec<Value>,
}

/// Raw comment objects for `post_id`, or `None` if every strategy came back
/// empty or failed.
pub async fn fetch_comments(
    api: &dyn GraphApi,
    post_id: &str,
    page_token: &str,
) -> Option<FetchedComments> {
    for strategy in COMMENT_STRATEGIES {
        let body = api
            .post_comments(post_id, strategy.fields(), strategy.scope(page_token))
            .await;

        let items = match body.as_ref().and_then(|b| b.get("data")).and_then(Value::as_array) {
            Some(items) if !items.is_empty() => items.clone(),
            _ => {
                debug!("Comment strategy {:?} empty for post {}", strategy, post_id);
                continue;
            }
        };

        let items = if strategy == CommentStrategy::MinimalEnriched {
            enrich_authors(api, items, page_token).await
        } else {
            items
        };

        return Some(FetchedComments { strategy, items });
    }

    None
}

/// Fill in `from` for comments that lack it, one lookup per comment.
async fn enrich_authors(api: &dyn GraphApi, mut items: Vec<Value>, page_token: &str) -> Vec<Value> {
    for item in items.iter_mut() {
        if item.get("from").is_some() {
            continue;
        }
        let Some(comment_id) = item.get("id").and_then(Value::as_str).map(str::to_string) else {
            continue;
        };

        let author = api
            .comment_author(&comment_id, TokenScope::Page(page_token))
            .await
            .and_then(|body| body.get("from").cloned());

        if let (Some(author), Some(obj)) = (author, item.as_object_mut()) {
            obj.insert("from".to_string(), author);
        }
    }
    items
}
