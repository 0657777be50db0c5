use crate::Database;
use crate::models::{
    CommentRow, MessageRow, NewComment, NewMessage, NewPage, NewPost, PageRow, PostRow, Upserted,
};
use anyhow::Result;
use pagedeck_types::api::DashboardTotals;
use rusqlite::{Connection, params};

impl Database {
    // -- Pages --

    pub fn upsert_page(&self, page: &NewPage<'_>) -> Result<Upserted> {
        self.with_conn(|conn| {
            let existing = find_id(conn, "SELECT id FROM pages WHERE page_id = ?1", page.page_id)?;

            if let Some(id) = existing {
                conn.execute(
                    "UPDATE pages
                     SET name = ?2, category = ?3, followers_count = ?4,
                         updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
                     WHERE id = ?1",
                    params![id, page.name, page.category, page.followers_count],
                )?;
                return Ok(Upserted { id, created: false });
            }

            conn.execute(
                "INSERT INTO pages (page_id, name, category, followers_count) VALUES (?1, ?2, ?3, ?4)",
                params![page.page_id, page.name, page.category, page.followers_count],
            )?;
            Ok(Upserted {
                id: conn.last_insert_rowid(),
                created: true,
            })
        })
    }

    pub fn get_page(&self, page_id: &str) -> Result<Option<PageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, page_id, name, category, followers_count, created_at, updated_at
                 FROM pages WHERE page_id = ?1",
            )?;
            let row = stmt.query_row([page_id], map_page).optional()?;
            Ok(row)
        })
    }

    pub fn list_pages(&self) -> Result<Vec<PageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, page_id, name, category, followers_count, created_at, updated_at
                 FROM pages ORDER BY name",
            )?;
            let rows = stmt
                .query_map([], map_page)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Posts --

    pub fn upsert_post(&self, page_ref: i64, post: &NewPost<'_>) -> Result<Upserted> {
        self.with_conn(|conn| {
            let existing = find_id(conn, "SELECT id FROM posts WHERE post_id = ?1", post.post_id)?;

            if let Some(id) = existing {
                conn.execute(
                    "UPDATE posts
                     SET page_ref = ?2, message = ?3, created_time = ?4,
                         likes_count = ?5, comments_count = ?6, shares_count = ?7,
                         updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
                     WHERE id = ?1",
                    params![
                        id,
                        page_ref,
                        post.message,
                        post.created_time,
                        post.likes_count,
                        post.comments_count,
                        post.shares_count,
                    ],
                )?;
                return Ok(Upserted { id, created: false });
            }

            conn.execute(
                "INSERT INTO posts (post_id, page_ref, message, created_time, likes_count, comments_count, shares_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    post.post_id,
                    page_ref,
                    post.message,
                    post.created_time,
                    post.likes_count,
                    post.comments_count,
                    post.shares_count,
                ],
            )?;
            Ok(Upserted {
                id: conn.last_insert_rowid(),
                created: true,
            })
        })
    }

    pub fn get_post(&self, post_id: &str) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{POST_SELECT} WHERE p.post_id = ?1"))?;
            let row = stmt.query_row([post_id], map_post).optional()?;
            Ok(row)
        })
    }

    /// Most recent posts first.
    pub fn recent_posts(&self, limit: u32) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{POST_SELECT} ORDER BY p.created_time DESC, p.id DESC LIMIT ?1"
            ))?;
            let rows = stmt
                .query_map([limit], map_post)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Comments --

    /// Get-or-create a comment.
    ///
    /// An existing synthesized author is replaced by whatever the new data
    /// carries, but a real stored author is never downgraded to a placeholder.
    pub fn upsert_comment(&self, post_ref: i64, comment: &NewComment<'_>) -> Result<Upserted> {
        self.with_conn(|conn| {
            let existing: Option<(i64, bool)> = conn
                .query_row(
                    "SELECT id, from_placeholder FROM comments WHERE comment_id = ?1",
                    [comment.comment_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            if let Some((id, stored_placeholder)) = existing {
                conn.execute(
                    "UPDATE comments
                     SET post_ref = ?2, message = ?3, created_time = ?4,
                         updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
                     WHERE id = ?1",
                    params![id, post_ref, comment.message, comment.created_time],
                )?;

                if stored_placeholder || !comment.from_placeholder {
                    conn.execute(
                        "UPDATE comments SET from_name = ?2, from_id = ?3, from_placeholder = ?4 WHERE id = ?1",
                        params![id, comment.from_name, comment.from_id, comment.from_placeholder],
                    )?;
                }
                return Ok(Upserted { id, created: false });
            }

            conn.execute(
                "INSERT INTO comments (comment_id, post_ref, message, from_name, from_id, from_placeholder, created_time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    comment.comment_id,
                    post_ref,
                    comment.message,
                    comment.from_name,
                    comment.from_id,
                    comment.from_placeholder,
                    comment.created_time,
                ],
            )?;
            Ok(Upserted {
                id: conn.last_insert_rowid(),
                created: true,
            })
        })
    }

    pub fn get_comment(&self, comment_id: &str) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{COMMENT_SELECT} WHERE c.comment_id = ?1"))?;
            let row = stmt.query_row([comment_id], map_comment).optional()?;
            Ok(row)
        })
    }

    pub fn recent_comments(&self, limit: u32) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{COMMENT_SELECT} ORDER BY c.created_time DESC, c.id DESC LIMIT ?1"
            ))?;
            let rows = stmt
                .query_map([limit], map_comment)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Messages --

    pub fn upsert_message(&self, page_ref: i64, message: &NewMessage<'_>) -> Result<Upserted> {
        self.with_conn(|conn| {
            let existing = find_id(
                conn,
                "SELECT id FROM messages WHERE message_id = ?1",
                message.message_id,
            )?;

            if let Some(id) = existing {
                conn.execute(
                    "UPDATE messages
                     SET page_ref = ?2, from_name = ?3, from_id = ?4, message = ?5, created_time = ?6,
                         updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
                     WHERE id = ?1",
                    params![
                        id,
                        page_ref,
                        message.from_name,
                        message.from_id,
                        message.message,
                        message.created_time,
                    ],
                )?;
                return Ok(Upserted { id, created: false });
            }

            conn.execute(
                "INSERT INTO messages (message_id, page_ref, from_name, from_id, message, created_time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    message.message_id,
                    page_ref,
                    message.from_name,
                    message.from_id,
                    message.message,
                    message.created_time,
                ],
            )?;
            Ok(Upserted {
                id: conn.last_insert_rowid(),
                created: true,
            })
        })
    }

    pub fn get_message(&self, message_id: &str) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{MESSAGE_SELECT} WHERE m.message_id = ?1"))?;
            let row = stmt.query_row([message_id], map_message).optional()?;
            Ok(row)
        })
    }

    pub fn recent_messages(&self, limit: u32) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{MESSAGE_SELECT} ORDER BY m.created_time DESC, m.id DESC LIMIT ?1"
            ))?;
            let rows = stmt
                .query_map([limit], map_message)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Aggregates --

    pub fn totals(&self) -> Result<DashboardTotals> {
        self.with_conn(|conn| {
            let (total_posts, total_likes, total_shares) = conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(likes_count), 0), COALESCE(SUM(shares_count), 0) FROM posts",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;
            let total_comments = conn.query_row("SELECT COUNT(*) FROM comments", [], |r| r.get(0))?;
            let total_messages = conn.query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0))?;

            Ok(DashboardTotals {
                total_posts,
                total_comments,
                total_messages,
                total_likes,
                total_shares,
            })
        })
    }
}

const POST_SELECT: &str = "SELECT p.id, p.post_id, pg.name, p.message, p.created_time,
        p.likes_count, p.comments_count, p.shares_count
     FROM posts p
     JOIN pages pg ON pg.id = p.page_ref";

const COMMENT_SELECT: &str = "SELECT c.id, c.comment_id, p.post_id, c.message, c.from_name,
        c.from_id, c.from_placeholder, c.created_time
     FROM comments c
     JOIN posts p ON p.id = c.post_ref";

const MESSAGE_SELECT: &str = "SELECT m.id, m.message_id, pg.name, m.from_name, m.from_id,
        m.message, m.created_time
     FROM messages m
     JOIN pages pg ON pg.id = m.page_ref";

fn find_id(conn: &Connection, sql: &str, external_id: &str) -> Result<Option<i64>> {
    conn.query_row(sql, [external_id], |row| row.get(0)).optional()
}

fn map_page(row: &rusqlite::Row<'_>) -> rusqlite::Result<PageRow> {
    Ok(PageRow {
        id: row.get(0)?,
        page_id: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        followers_count: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn map_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        post_id: row.get(1)?,
        page_name: row.get(2)?,
        message: row.get(3)?,
        created_time: row.get(4)?,
        likes_count: row.get(5)?,
        comments_count: row.get(6)?,
        shares_count: row.get(7)?,
    })
}

fn map_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        comment_id: row.get(1)?,
        post_id: row.get(2)?,
        message: row.get(3)?,
        from_name: row.get(4)?,
        from_id: row.get(5)?,
        from_placeholder: row.get(6)?,
        created_time: row.get(7)?,
    })
}

fn map_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        message_id: row.get(1)?,
        page_name: row.get(2)?,
        from_name: row.get(3)?,
        from_id: row.get(4)?,
        message: row.get(5)?,
        created_time: row.get(6)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(db: &Database, page_id: &str) -> i64 {
        db.upsert_page(&NewPage {
            page_id,
            name: "Corner Bakery",
            category: "Bakery",
            followers_count: 120,
        })
        .unwrap()
        .id
    }

    fn post<'a>(post_id: &'a str, created_time: &'a str, likes: i64) -> NewPost<'a> {
        NewPost {
            post_id,
            message: "Fresh bread today",
            created_time,
            likes_count: likes,
            comments_count: 0,
            shares_count: 1,
        }
    }

    fn comment<'a>(name: &'a str, placeholder: bool) -> NewComment<'a> {
        NewComment {
            comment_id: "100_200",
            message: "Looks great",
            from_name: name,
            from_id: if placeholder { "" } else { "42" },
            from_placeholder: placeholder,
            created_time: "2024-03-01T09:00:00Z",
        }
    }

    #[test]
    fn page_upsert_is_idempotent() {
        let db = Database::open_in_memory().unwrap();

        let first = db
            .upsert_page(&NewPage { page_id: "p1", name: "Old", category: "", followers_count: 1 })
            .unwrap();
        assert!(first.created);

        let second = db
            .upsert_page(&NewPage { page_id: "p1", name: "New", category: "Shop", followers_count: 9 })
            .unwrap();
        assert!(!second.created);
        assert_eq!(first.id, second.id);

        let pages = db.list_pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "New");
        assert_eq!(pages[0].category, "Shop");
        assert_eq!(pages[0].followers_count, 9);
    }

    #[test]
    fn post_upsert_overwrites_counts() {
        let db = Database::open_in_memory().unwrap();
        let page_ref = page(&db, "p1");

        db.upsert_post(page_ref, &post("p1_1", "2024-03-01T08:00:00Z", 3)).unwrap();
        let again = db.upsert_post(page_ref, &post("p1_1", "2024-03-01T08:00:00Z", 8)).unwrap();
        assert!(!again.created);

        let row = db.get_post("p1_1").unwrap().unwrap();
        assert_eq!(row.likes_count, 8);
        assert_eq!(row.page_name, "Corner Bakery");
        assert_eq!(db.totals().unwrap().total_posts, 1);
    }

    #[test]
    fn placeholder_author_replaced_by_real_name() {
        let db = Database::open_in_memory().unwrap();
        let page_ref = page(&db, "p1");
        let post_ref = db.upsert_post(page_ref, &post("p1_1", "2024-03-01T08:00:00Z", 0)).unwrap().id;

        db.upsert_comment(post_ref, &comment("Commenter_Looksgreat_1a2b3c4d", true)).unwrap();
        db.upsert_comment(post_ref, &comment("Dana Reyes", false)).unwrap();

        let row = db.get_comment("100_200").unwrap().unwrap();
        assert_eq!(row.from_name, "Dana Reyes");
        assert_eq!(row.from_id, "42");
        assert!(!row.from_placeholder);
    }

    #[test]
    fn real_author_not_downgraded_to_placeholder() {
        let db = Database::open_in_memory().unwrap();
        let page_ref = page(&db, "p1");
        let post_ref = db.upsert_post(page_ref, &post("p1_1", "2024-03-01T08:00:00Z", 0)).unwrap().id;

        db.upsert_comment(post_ref, &comment("Dana Reyes", false)).unwrap();
        db.upsert_comment(post_ref, &comment("Commenter_Looksgreat_1a2b3c4d", true)).unwrap();

        let row = db.get_comment("100_200").unwrap().unwrap();
        assert_eq!(row.from_name, "Dana Reyes");
        assert_eq!(db.totals().unwrap().total_comments, 1);
    }

    #[test]
    fn totals_sum_likes_and_shares() {
        let db = Database::open_in_memory().unwrap();
        let page_ref = page(&db, "p1");
        for (i, likes) in [1, 2, 3].into_iter().enumerate() {
            let id = format!("p1_{i}");
            db.upsert_post(page_ref, &post(&id, "2024-03-01T08:00:00Z", likes)).unwrap();
        }

        let totals = db.totals().unwrap();
        assert_eq!(totals.total_posts, 3);
        assert_eq!(totals.total_likes, 6);
        assert_eq!(totals.total_shares, 3);
        assert_eq!(totals.total_messages, 0);
    }

    #[test]
    fn recent_lists_newest_first_and_limited() {
        let db = Database::open_in_memory().unwrap();
        let page_ref = page(&db, "p1");
        db.upsert_post(page_ref, &post("a", "2024-01-01T00:00:00Z", 0)).unwrap();
        db.upsert_post(page_ref, &post("b", "2024-03-01T00:00:00Z", 0)).unwrap();
        db.upsert_post(page_ref, &post("c", "2024-02-01T00:00:00Z", 0)).unwrap();

        let ids: Vec<String> = db.recent_posts(2).unwrap().into_iter().map(|p| p.post_id).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn deleting_page_cascades() {
        let db = Database::open_in_memory().unwrap();
        let page_ref = page(&db, "p1");
        let post_ref = db.upsert_post(page_ref, &post("p1_1", "2024-03-01T08:00:00Z", 0)).unwrap().id;
        db.upsert_comment(post_ref, &comment("Dana Reyes", false)).unwrap();
        db.upsert_message(
            page_ref,
            &NewMessage {
                message_id: "m_1",
                from_name: "Sam",
                from_id: "9",
                message: "Are you open Sunday?",
                created_time: "2024-03-02T10:00:00Z",
            },
        )
        .unwrap();

        db.with_conn(|conn| {
            conn.execute("DELETE FROM pages WHERE id = ?1", [page_ref])?;
            Ok(())
        })
        .unwrap();

        let totals = db.totals().unwrap();
        assert_eq!(totals, DashboardTotals::default());
    }
}
