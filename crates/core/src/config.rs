//! Render configuration and its normalization
//!
//! Configuration arrives from loosely-typed sources (block attributes JSON,
//! query strings, CLI flags), so every field is parsed leniently and falls
//! back to its default instead of failing.

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Grid column count, always 2 or 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Columns(u8);

impl Columns {
    pub const TWO: Columns = Columns(2);
    pub const THREE: Columns = Columns(3);

    pub fn get(self) -> u8 {
        self.0
    }

    /// Resolve an integer, keeping 2 and 3 and mapping anything else to 3
    pub fn from_int(value: i64) -> Self {
        match value {
            2 => Self::TWO,
            _ => Self::THREE,
        }
    }

    /// Resolve a raw string such as a query parameter or CLI value
    pub fn from_raw(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map(Self::from_int)
            .unwrap_or_default()
    }

    /// Resolve an arbitrary JSON value
    ///
    /// Integral numbers and integral strings are honoured; floats with a
    /// fractional part, booleans, null and everything else become 3.
    pub fn from_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                })
                .map(Self::from_int)
                .unwrap_or_default(),
            serde_json::Value::String(s) => Self::from_raw(s),
            _ => Self::default(),
        }
    }
}

impl Default for Columns {
    fn default() -> Self {
        Self::THREE
    }
}

impl std::fmt::Display for Columns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Columns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Columns::from_value(&value))
    }
}

/// Parse a loosely-typed boolean
///
/// Returns `None` for values that don't clearly mean true or false.
pub fn parse_flag(value: &serde_json::Value) -> Option<bool> {
    match value {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn flag_or_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(parse_flag(&value).unwrap_or(true))
}

/// Display options for a block render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub columns: Columns,
    #[serde(deserialize_with = "flag_or_true")]
    pub show_image: bool,
    #[serde(deserialize_with = "flag_or_true")]
    pub show_reading_time: bool,
    #[serde(deserialize_with = "flag_or_true")]
    pub show_reactions: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            columns: Columns::default(),
            show_image: true,
            show_reading_time: true,
            show_reactions: true,
        }
    }
}

impl RenderConfig {
    /// Build a configuration from block attributes
    ///
    /// Anything other than a JSON object yields the default configuration.
    pub fn from_attributes(attributes: &serde_json::Value) -> Self {
        if !attributes.is_object() {
            return Self::default();
        }
        serde_json::from_value(attributes.clone()).unwrap_or_default()
    }
}

/// What to show when the live source failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Render the standard warning notice
    #[default]
    Warn,
    /// Render the fixed demo dataset
    Demo,
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(FallbackPolicy::Warn),
            "demo" => Ok(FallbackPolicy::Demo),
            other => Err(format!(
                "Invalid fallback policy: {other}. Valid policies: warn, demo"
            )),
        }
    }
}

impl std::fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackPolicy::Warn => write!(f, "warn"),
            FallbackPolicy::Demo => write!(f, "demo"),
        }
    }
}
