/// Database row types, mapped directly from SQLite rows.
/// Distinct from pagedeck-types view models to keep the DB layer independent.

pub struct PageRow {
    pub id: i64,
    pub page_id: String,
    pub name: String,
    pub category: String,
    pub followers_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Post joined with the owning page's name.
pub struct PostRow {
    pub id: i64,
    pub post_id: String,
    pub page_name: String,
    pub message: String,
    pub created_time: String,
    pub likes_count: i64,
    pub comments_count: i64,
    pub shares_count: i64,
}

/// Comment joined with the owning post's external id.
pub struct CommentRow {
    pub id: i64,
    pub comment_id: String,
    pub post_id: String,
    pub message: String,
    pub from_name: String,
    pub from_id: String,
    pub from_placeholder: bool,
    pub created_time: String,
}

pub struct MessageRow {
    pub id: i64,
    pub message_id: String,
    pub page_name: String,
    pub from_name: String,
    pub from_id: String,
    pub message: String,
    pub created_time: String,
}

// -- Upsert inputs --

pub struct NewPage<'a> {
    pub page_id: &'a str,
    pub name: &'a str,
    pub category: &'a str,
    pub followers_count: i64,
}

pub struct NewPost<'a> {
    pub post_id: &'a str,
    pub message: &'a str,
    pub created_time: &'a str,
    pub likes_count: i64,
    pub comments_count: i64,
    pub shares_count: i64,
}

pub struct NewComment<'a> {
    pub comment_id: &'a str,
    pub message: &'a str,
    pub from_name: &'a str,
    pub from_id: &'a str,
    /// `from_name` was synthesized rather than supplied by the API.
    pub from_placeholder: bool,
    pub created_time: &'a str,
}

pub struct NewMessage<'a> {
    pub message_id: &'a str,
    pub from_name: &'a str,
    pub from_id: &'a str,
    pub message: &'a str,
    pub created_time: &'a str,
}

/// Outcome of a get-or-create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upserted {
    pub id: i64,
    pub created: bool,
}
