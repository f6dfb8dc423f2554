use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Idempotent: safe to run against an existing database on every start.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS stories (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT    NOT NULL,
            text        TEXT    NOT NULL,
            created_at  TEXT    NOT NULL DEFAULT (datetime('now')),
            flagged     INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_stories_flagged
            ON stories(flagged, id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
