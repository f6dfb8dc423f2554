use std::collections::HashSet;
use std::sync::LazyLock;

use ammonia::Builder;

/// Upper bound on any sanitized field, in characters.
pub const MAX_INPUT_CHARS: usize = 2000;

/// No tag or attribute survives; script and style bodies go with their tags.
static STRIP_ALL: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::empty();
    builder.clean_content_tags(HashSet::from(["script", "style"]));
    builder
});

/// Strip all markup from free-form input, trim it and cap its length.
/// `None` is treated as the empty string.
pub fn clean_input(input: Option<&str>) -> String {
    let raw = input.unwrap_or_default();

    let cleaned = STRIP_ALL.clean(raw).to_string();

    truncate_chars(cleaned.trim(), MAX_INPUT_CHARS)
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
