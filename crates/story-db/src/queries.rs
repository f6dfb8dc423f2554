use crate::Database;
use crate::models::{StoryCounts, StoryRow};
use anyhow::Result;
use rusqlite::{Connection, Row};

const STORY_COLUMNS: &str = "id, username, text, created_at, flagged";

impl Database {
    // -- Stories --

    /// Insert a story and return its newly assigned id.
    pub fn create_story(&self, username: &str, text: &str, flagged: bool) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO stories (username, text, flagged) VALUES (?1, ?2, ?3)",
                rusqlite::params![username, text, flagged],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Unflagged stories, newest first.
    pub fn list_visible(&self, limit: u32, offset: u64) -> Result<Vec<StoryRow>> {
        self.with_conn(|conn| query_visible(conn, limit, offset))
    }

    /// Every flagged story, newest first.
    pub fn list_flagged(&self) -> Result<Vec<StoryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {STORY_COLUMNS} FROM stories WHERE flagged = 1 ORDER BY id DESC"
            ))?;

            let rows = stmt
                .query_map([], map_story)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn count_stories(&self) -> Result<StoryCounts> {
        self.with_conn(|conn| {
            let (visible, flagged): (i64, i64) = conn.query_row(
                "SELECT
                    COALESCE(SUM(CASE WHEN flagged = 0 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN flagged = 1 THEN 1 ELSE 0 END), 0)
                 FROM stories",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            Ok(StoryCounts {
                visible: visible as u64,
                flagged: flagged as u64,
            })
        })
    }
}

fn query_visible(conn: &Connection, limit: u32, offset: u64) -> Result<Vec<StoryRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {STORY_COLUMNS} FROM stories
         WHERE flagged = 0
         ORDER BY id DESC
         LIMIT ?1 OFFSET ?2"
    ))?;

    let rows = stmt
        .query_map(rusqlite::params![limit, offset as i64], map_story)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_story(row: &Row<'_>) -> rusqlite::Result<StoryRow> {
    Ok(StoryRow {
        id: row.get(0)?,
        username: row.get(1)?,
        text: row.get(2)?,
        created_at: row.get(3)?,
        flagged: row.get(4)?,
    })
}
