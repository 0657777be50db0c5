use serde::{Deserialize, Serialize};

// -- Permissions --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionStatus {
    pub permission: String,
    pub description: String,
}

/// Required permissions split by whether the user token holds them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionReport {
    pub missing: Vec<PermissionStatus>,
    pub granted: Vec<PermissionStatus>,
}

impl PermissionReport {
    pub fn missing_names(&self) -> Vec<String> {
        self.missing.iter().map(|p| p.permission.clone()).collect()
    }

    pub fn granted_names(&self) -> Vec<String> {
        self.granted.iter().map(|p| p.permission.clone()).collect()
    }
}

// -- Flash messages --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

// -- Dashboard --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
    pub page_id: String,
    pub name: String,
    pub category: String,
    pub followers_count: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub post_id: String,
    pub page_name: String,
    pub message: String,
    pub created_time: String,
    pub likes_count: i64,
    pub comments_count: i64,
    pub shares_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub comment_id: String,
    pub post_id: String,
    pub message: String,
    pub from_name: String,
    pub from_id: String,
    pub created_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub message_id: String,
    pub page_name: String,
    pub from_name: String,
    pub from_id: String,
    pub message: String,
    pub created_time: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardTotals {
    pub total_posts: i64,
    pub total_comments: i64,
    pub total_messages: i64,
    pub total_likes: i64,
    pub total_shares: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub flashes: Vec<Flash>,
    pub pages: Vec<PageView>,
    pub posts: Vec<PostView>,
    pub comments: Vec<CommentView>,
    pub messages: Vec<MessageView>,
    pub totals: DashboardTotals,
    pub recent_posts: Vec<PostView>,
    pub recent_comments: Vec<CommentView>,
    pub recent_messages: Vec<MessageView>,
    pub missing_permissions: Vec<PermissionStatus>,
    pub granted_permissions: Vec<PermissionStatus>,
}
