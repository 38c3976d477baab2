use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS profiles (
            id              TEXT PRIMARY KEY,
            display_name    TEXT,
            avatar_url      TEXT,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS bookmarks (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES profiles(id),
            name            TEXT NOT NULL,
            surah_number    INTEGER NOT NULL,
            verse_number    INTEGER NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_bookmarks_user
            ON bookmarks(user_id, updated_at);

        CREATE TABLE IF NOT EXISTS groups (
            id              TEXT PRIMARY KEY,
            name            TEXT NOT NULL,
            group_code      TEXT NOT NULL UNIQUE,
            created_by      TEXT NOT NULL REFERENCES profiles(id),
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            deleted_at      TEXT
        );

        CREATE TABLE IF NOT EXISTS group_members (
            id                  TEXT PRIMARY KEY,
            group_id            TEXT NOT NULL REFERENCES groups(id),
            user_id             TEXT NOT NULL REFERENCES profiles(id),
            role                TEXT NOT NULL DEFAULT 'member',
            current_bookmark_id TEXT REFERENCES bookmarks(id),
            created_at          TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(group_id, user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_members_user
            ON group_members(user_id);

        -- Append-only; never updated or deleted by normal flow.
        CREATE TABLE IF NOT EXISTS reading_logs (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES profiles(id),
            group_id        TEXT REFERENCES groups(id),
            character_count INTEGER NOT NULL,
            period_start    TEXT,
            period_end      TEXT,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_logs_group
            ON reading_logs(group_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
