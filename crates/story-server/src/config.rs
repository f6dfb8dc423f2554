use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
    pub extra_blocked_words: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or empty keys take defaults;
    /// set but unparsable numbers are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = parse_or(get("PORT"), "PORT", 4000)?;
        let rate_limit_max: u32 = parse_or(get("STORY_RATE_LIMIT_MAX"), "STORY_RATE_LIMIT_MAX", 20)?;
        let window_secs: u64 = parse_or(
            get("STORY_RATE_LIMIT_WINDOW_SECS"),
            "STORY_RATE_LIMIT_WINDOW_SECS",
            60,
        )?;
        ensure_nonzero(u64::from(rate_limit_max), "STORY_RATE_LIMIT_MAX")?;
        ensure_nonzero(window_secs, "STORY_RATE_LIMIT_WINDOW_SECS")?;

        let extra_blocked_words = get("STORY_EXTRA_BLOCKED_WORDS")
            .map(|v| {
                v.split(',')
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: get("STORY_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: get("STORY_DB_PATH")
                .unwrap_or_else(|| "./stories.db".into())
                .into(),
            rate_limit_max,
            rate_limit_window: Duration::from_secs(window_secs),
            extra_blocked_words,
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", key, v)),
        None => Ok(default),
    }
}

fn ensure_nonzero(value: u64, key: &str) -> Result<()> {
    if value == 0 {
        bail!("{} must be greater than zero", key);
    }
    Ok(())
}
