use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE pages (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                page_id         TEXT NOT NULL UNIQUE,
                name            TEXT NOT NULL,
                category        TEXT NOT NULL DEFAULT '',
                followers_count INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
                updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
            );

            CREATE TABLE posts (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id         TEXT NOT NULL UNIQUE,
                page_ref        INTEGER NOT NULL REFERENCES pages(id) ON DELETE CASCADE,
                message         TEXT NOT NULL DEFAULT '',
                created_time    TEXT NOT NULL,
                likes_count     INTEGER NOT NULL DEFAULT 0 CHECK (likes_count >= 0),
                comments_count  INTEGER NOT NULL DEFAULT 0 CHECK (comments_count >= 0),
                shares_count    INTEGER NOT NULL DEFAULT 0 CHECK (shares_count >= 0),
                updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
            );

            CREATE INDEX idx_posts_created ON posts(created_time);

            CREATE TABLE comments (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                comment_id          TEXT NOT NULL UNIQUE,
                post_ref            INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                message             TEXT NOT NULL DEFAULT '',
                from_name           TEXT NOT NULL,
                from_id             TEXT NOT NULL DEFAULT '',
                from_placeholder    INTEGER NOT NULL DEFAULT 0,
                created_time        TEXT NOT NULL,
                updated_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
            );

            CREATE INDEX idx_comments_created ON comments(created_time);

            CREATE TABLE messages (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                message_id      TEXT NOT NULL UNIQUE,
                page_ref        INTEGER NOT NULL REFERENCES pages(id) ON DELETE CASCADE,
                from_name       TEXT NOT NULL,
                from_id         TEXT NOT NULL DEFAULT '',
                message         TEXT NOT NULL DEFAULT '',
                created_time    TEXT NOT NULL,
                updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
            );

            CREATE INDEX idx_messages_created ON messages(created_time);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
