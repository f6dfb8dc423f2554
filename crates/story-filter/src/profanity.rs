use regex::{Regex, RegexBuilder};
use tracing::debug;

const DEFAULT_WORDS: &str = include_str!("words.txt");

/// Word-list classifier deciding whether a submission gets auto-flagged.
///
/// All words are folded into one case-insensitive alternation anchored on
/// word boundaries, so "Shit!" matches but "Scunthorpe" does not.
pub struct ProfanityFilter {
    pattern: Regex,
    word_count: usize,
}

impl ProfanityFilter {
    pub fn new() -> Result<Self, regex::Error> {
        Self::with_extra_words(std::iter::empty::<&str>())
    }

    /// Default list plus `extra`. Blank entries are skipped.
    pub fn with_extra_words<I, S>(extra: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = DEFAULT_WORDS
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_lowercase)
            .collect();

        words.extend(
            extra
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        words.sort();
        words.dedup();

        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
            .case_insensitive(true)
            .build()?;

        debug!("Profanity filter loaded with {} words", words.len());
        Ok(Self {
            pattern,
            word_count: words.len(),
        })
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_profane(&self, s: &str) -> bool {
        self.pattern.is_match(s)
    }

    /// A story is flagged when either its display name or its body is profane.
    pub fn classify(&self, username: &str, text: &str) -> bool {
        self.is_profane(username) || self.is_profane(text)
    }
}
