//! Article model and decoding of the article-list payload
//!
//! Pure functions that turn the raw response body of the articles endpoint
//! into a list of [`Article`] values with unique identifiers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Placeholder shown when an article has no usable title
pub const NO_TITLE: &str = "No Title";

/// Article as returned by the Dev.to articles API
///
/// Only the fields the cards display are kept; everything else in the payload
/// is ignored during deserialization. The `id` is an opaque key (number or
/// string). Any other field with an unexpected type decodes as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reading_time_minutes: Option<i64>,
    #[serde(
        rename = "public_reactions_count",
        alias = "reactions_count",
        default,
        deserialize_with = "lenient_count"
    )]
    pub reactions_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<ArticleAuthor>,
}

/// Accept a non-empty string or an integer as the article key
fn opaque_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) if !id.trim().is_empty() => Ok(id.trim().to_string()),
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or integer id, got {}",
            json_kind(&other)
        ))),
    }
}

/// Decode a field, mapping a value of the wrong shape to `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode a count from an integer, a float (truncated) or a numeric string
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let count = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().map(|f| f as i64)),
        _ => None,
    };
    Ok(count)
}

/// Author block nested in each article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleAuthor {
    pub name: Option<String>,
    pub username: Option<String>,
}

impl Article {
    /// Title to display, falling back to [`NO_TITLE`] when missing or blank
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(NO_TITLE)
    }

    /// Author display name, if the payload carried a non-blank one
    pub fn author_name(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|user| user.name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Reading time in minutes, only when strictly positive
    pub fn reading_time(&self) -> Option<i64> {
        self.reading_time_minutes.filter(|minutes| *minutes > 0)
    }

    /// Reaction count, only when strictly positive
    pub fn reactions(&self) -> Option<i64> {
        self.reactions_count.filter(|count| *count > 0)
    }
}

/// Error type for decoding the article-list payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    InvalidJson(String),
    NotAList(&'static str),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::InvalidJson(msg) => write!(f, "Response is not valid JSON: {}", msg),
            DecodeError::NotAList(kind) => {
                write!(f, "Expected a JSON array of articles, got {}", kind)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Decode the response body of the articles endpoint
///
/// The body must be a JSON array. Entries without a usable `id` are skipped,
/// and later entries repeating an earlier `id` are dropped.
pub fn decode_articles(body: &str) -> Result<Vec<Article>, DecodeError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

    let entries = match value {
        serde_json::Value::Array(entries) => entries,
        other => return Err(DecodeError::NotAList(json_kind(&other))),
    };

    let articles = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<Article>(entry).ok())
        .collect();

    Ok(dedupe_articles(articles))
}

/// Keep the first article for every `id`, preserving order
pub fn dedupe_articles(articles: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| seen.insert(article.id.clone()))
        .collect()
}

/// Format a publish timestamp as "Month Day, Year" in UTC
///
/// Accepts RFC 3339 timestamps as well as bare `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM-DD` values. Returns `None` when the input can't be parsed.
pub fn format_published_date(published_at: Option<&str>) -> Option<String> {
    let raw = published_at.map(str::trim).filter(|s| !s.is_empty())?;

    let date = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.with_timezone(&Utc).date_naive()
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        naive.date()
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?
    };

    Some(date.format("%B %-d, %Y").to_string())
}

#[allow(clippy::too_many_arguments)]
fn demo_article(
    id: &str,
    title: &str,
    description: &str,
    slug: &str,
    published_at: &str,
    reading_time_minutes: i64,
    reactions_count: i64,
    author: &str,
) -> Article {
    Article {
        id: id.to_string(),
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        url: Some(format!("https://dev.to/devcards/{slug}")),
        published_at: Some(published_at.to_string()),
        cover_image: None,
        reading_time_minutes: Some(reading_time_minutes),
        reactions_count: Some(reactions_count),
        user: Some(ArticleAuthor {
            name: Some(author.to_string()),
            username: Some("devcards".to_string()),
        }),
    }
}

/// Fixed sample dataset used when the live source is unreachable and the
/// demo fallback policy is selected
pub fn demo_articles() -> Vec<Article> {
    vec![
        demo_article(
            "1",
            "Understanding Ownership in Rust",
            "A gentle walk through moves, borrows and lifetimes.",
            "understanding-ownership-in-rust",
            "2024-01-15T10:30:00Z",
            7,
            42,
            "Sample Author",
        ),
        demo_article(
            "2",
            "Building a CLI with clap",
            "Derive-based argument parsing with environment fallbacks.",
            "building-a-cli-with-clap",
            "2024-01-14T08:00:00Z",
            5,
            18,
            "Sample Author",
        ),
        demo_article(
            "3",
            "Async Rust with Tokio",
            "Tasks, channels and timeouts in practice.",
            "async-rust-with-tokio",
            "2024-01-13T16:45:00Z",
            9,
            31,
            "Sample Author",
        ),
        demo_article(
            "4",
            "Serializing Data with Serde",
            "Renames, aliases and lenient deserializers.",
            "serializing-data-with-serde",
            "2024-01-12T12:00:00Z",
            6,
            12,
            "Sample Author",
        ),
        demo_article(
            "5",
            "Escaping HTML Safely",
            "Text, attribute and rich-text contexts each need their own rules.",
            "escaping-html-safely",
            "2024-01-11T09:15:00Z",
            4,
            27,
            "Sample Author",
        ),
    ]
}
