//! Response schema of the social-graph API.
//!
//! Every field the API may withhold is an `Option`. Accessors on each payload
//! apply the defaulting rules the sync routine relies on, so callers never
//! walk raw JSON.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Items of a `{ "data": [...] }` envelope that deserialized cleanly.
#[derive(Debug)]
pub struct Listing<T> {
    pub items: Vec<T>,
    /// Entries skipped because they did not match the schema.
    pub malformed: usize,
}

/// Parse the `data` array of a listing body.
///
/// Returns `None` when the body has no `data` array at all, which callers
/// treat as a failed listing rather than an empty one.
pub fn parse_listing<T: DeserializeOwned>(body: &Value) -> Option<Listing<T>> {
    let raw = body.get("data")?.as_array()?;
    Some(parse_items(raw))
}

pub fn parse_items<T: DeserializeOwned>(raw: &[Value]) -> Listing<T> {
    let mut items = Vec::with_capacity(raw.len());
    let mut malformed = 0;
    for entry in raw {
        match serde_json::from_value::<T>(entry.clone()) {
            Ok(item) => items.push(item),
            Err(_) => malformed += 1,
        }
    }
    Listing { items, malformed }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// -- Pages --

/// One entry of `me/accounts`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountEntry {
    pub id: String,
    pub name: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageDetail {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub followers_count: Option<i64>,
    pub fan_count: Option<i64>,
}

impl PageDetail {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    /// `followers_count` unless absent or zero, then `fan_count`.
    pub fn follower_count(&self) -> i64 {
        self.followers_count
            .filter(|n| *n != 0)
            .or(self.fan_count)
            .unwrap_or(0)
            .max(0)
    }
}

// -- Posts --

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Summary {
    pub total_count: Option<i64>,
}

/// An edge requested with `.summary(...)`, e.g. `reactions` or `comments`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryEdge {
    pub summary: Option<Summary>,
}

impl SummaryEdge {
    pub fn total(&self) -> i64 {
        self.summary
            .as_ref()
            .and_then(|s| s.total_count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Shares {
    pub count: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostPayload {
    pub id: String,
    pub message: Option<String>,
    pub story: Option<String>,
    pub created_time: Option<String>,
    pub reactions: Option<SummaryEdge>,
    pub likes: Option<SummaryEdge>,
    pub comments: Option<SummaryEdge>,
    pub shares: Option<Shares>,
}

impl PostPayload {
    /// `message`, else `story`, else empty.
    pub fn text(&self) -> &str {
        non_empty(&self.message)
            .or_else(|| non_empty(&self.story))
            .unwrap_or_default()
    }

    pub fn reactions_count(&self) -> i64 {
        self.reactions.as_ref().map(SummaryEdge::total).unwrap_or(0)
    }

    pub fn legacy_likes_count(&self) -> i64 {
        self.likes.as_ref().map(SummaryEdge::total).unwrap_or(0)
    }

    /// The larger of the reactions total and the legacy likes total.
    pub fn final_like_count(&self) -> i64 {
        self.reactions_count()
            .max(self.legacy_likes_count())
            .max(0)
    }

    pub fn comments_count(&self) -> i64 {
        self.comments.as_ref().map(SummaryEdge::total).unwrap_or(0).max(0)
    }

    pub fn shares_count(&self) -> i64 {
        self.shares
            .as_ref()
            .and_then(|s| s.count)
            .unwrap_or(0)
            .max(0)
    }
}

// -- Comments & messages --

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Author {
    pub fn id(&self) -> Option<&str> {
        non_empty(&self.id)
    }

    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn email(&self) -> Option<&str> {
        non_empty(&self.email)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentPayload {
    pub id: String,
    pub message: Option<String>,
    pub from: Option<Author>,
    pub created_time: Option<String>,
}

impl CommentPayload {
    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    pub fn author_name(&self) -> Option<&str> {
        self.from.as_ref().and_then(Author::name)
    }

    pub fn author_id(&self) -> Option<&str> {
        self.from.as_ref().and_then(Author::id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationPayload {
    pub id: String,
    pub snippet: Option<String>,
    pub updated_time: Option<String>,
    pub message_count: Option<i64>,
    pub unread_count: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attachment {
    pub name: Option<String>,
    pub mime_type: Option<String>,
}

impl Attachment {
    pub fn label(&self) -> &str {
        non_empty(&self.name)
            .or_else(|| non_empty(&self.mime_type))
            .unwrap_or("file")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentList {
    #[serde(default)]
    pub data: Vec<Attachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagePayload {
    pub id: String,
    pub message: Option<String>,
    pub from: Option<Author>,
    pub created_time: Option<String>,
    pub attachments: Option<AttachmentList>,
}

impl MessagePayload {
    /// Message text, or an `[Attachments: ...]` label when the text is empty.
    pub fn text(&self) -> String {
        if let Some(text) = non_empty(&self.message) {
            return text.to_string();
        }
        match self.attachments.as_ref().map(|a| a.data.as_slice()) {
            Some(list) if !list.is_empty() => {
                let labels: Vec<&str> = list.iter().map(Attachment::label).collect();
                format!("[Attachments: {}]", labels.join(", "))
            }
            _ => String::new(),
        }
    }

    pub fn sender_name(&self) -> &str {
        self.from
            .as_ref()
            .and_then(|f| f.name().or_else(|| f.email()))
            .unwrap_or("Unknown")
    }

    pub fn sender_id(&self) -> &str {
        self.from.as_ref().and_then(Author::id).unwrap_or_default()
    }
}

// -- Introspection --

#[derive(Debug, Clone, Deserialize)]
pub struct PermissionEntry {
    pub permission: String,
    pub status: String,
}
