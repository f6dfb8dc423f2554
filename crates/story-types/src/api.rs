use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::flag_as_int;

// -- Stories --

/// Body of `POST /api/stories`. Every field is optional on the wire so that
/// missing values reach the handler's own validation instead of failing
/// deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitStoryRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Client-asserted consent. Any JSON value is accepted here and judged
    /// by `is_age_confirmed`.
    #[serde(default, rename = "ageConfirmed")]
    pub age_confirmed: Option<Value>,
}

impl SubmitStoryRequest {
    /// Truthiness the way a browser client means it: absent, `null`, `false`,
    /// `0`, `NaN`-like numbers and `""` are not consent; every other value is.
    pub fn is_age_confirmed(&self) -> bool {
        match &self.age_confirmed {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitStoryResponse {
    pub ok: bool,
    pub id: i64,
    #[serde(serialize_with = "flag_as_int")]
    pub flagged: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub stories: u64,
    pub flagged: u64,
}

// -- Pagination --

pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 50;

/// Raw `?limit=&offset=` values. Kept as strings so junk input falls back to
/// defaults rather than rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u64,
}

impl Pagination {
    /// Non-numeric or non-positive `limit` gives the default, anything above
    /// `MAX_LIMIT` is clamped. Non-numeric or negative `offset` gives 0.
    pub fn from_query(query: &ListQuery) -> Self {
        let limit = match parse_int(query.limit.as_deref()) {
            Some(n) if n > 0 => n.min(i64::from(MAX_LIMIT)) as u32,
            _ => DEFAULT_LIMIT,
        };
        let offset = parse_int(query.offset.as_deref()).unwrap_or(0).max(0) as u64;

        Self { limit, offset }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse().ok()
}
