/// Database row types, mapping directly to SQLite rows.
/// Distinct from the story-types wire models to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct StoryRow {
    pub id: i64,
    pub username: String,
    pub text: String,
    /// As stored by SQLite: "YYYY-MM-DD HH:MM:SS", UTC.
    pub created_at: String,
    pub flagged: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoryCounts {
    pub visible: u64,
    pub flagged: u64,
}
