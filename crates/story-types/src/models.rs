use serde::{Serialize, Serializer};

/// A story as served to clients.
///
/// `created_at` is passed through exactly as the store wrote it
/// ("YYYY-MM-DD HH:MM:SS", UTC). `flagged` goes over the wire as `0`/`1`,
/// matching how it is stored.
#[derive(Debug, Clone, Serialize)]
pub struct Story {
    pub id: i64,
    pub username: String,
    pub text: String,
    pub created_at: String,
    #[serde(serialize_with = "flag_as_int")]
    pub flagged: bool,
}

pub fn flag_as_int<S: Serializer>(flagged: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flagged))
}
