//! Frontmatter extraction from YAML (`---`) or TOML (`+++`) blocks.
//!
//! The result is an untyped map; shaping it into a [`Post`](super::Post)
//! is the schema's job.

use serde_json::{Map, Value};
use thiserror::Error;

/// Untyped frontmatter fields.
pub type RawFields = Map<String, Value>;

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("no frontmatter block (expected `---` or `+++` on the first line)")]
    Missing,

    #[error("frontmatter block is not closed")]
    Unterminated,

    #[error("invalid YAML frontmatter")]
    Yaml(#[source] serde_yaml_ng::Error),

    #[error("invalid TOML frontmatter")]
    Toml(#[source] toml::de::Error),

    #[error("frontmatter must be a mapping of fields")]
    NotAMapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
}

/// Split `content` into its frontmatter fields and body.
pub fn extract(content: &str) -> Result<(RawFields, &str), FrontmatterError> {
    let (format, block, body) = detect(content)?;
    let value = match format {
        Format::Yaml => parse_yaml(block)?,
        Format::Toml => parse_toml(block)?,
    };
    match value {
        Value::Object(map) => Ok((map, body)),
        // An empty block parses to null
        Value::Null => Ok((RawFields::new(), body)),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

/// Returns `(format, frontmatter, body)`.
fn detect(content: &str) -> Result<(Format, &str, &str), FrontmatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let trimmed = content.trim_start_matches(['\n', '\r']);

    let (format, fence) = if trimmed.starts_with("---") {
        (Format::Yaml, "---")
    } else if trimmed.starts_with("+++") {
        (Format::Toml, "+++")
    } else {
        return Err(FrontmatterError::Missing);
    };

    let after_open = &trimmed[3..];
    let closing = format!("\n{fence}");
    let end = after_open
        .find(&closing)
        .ok_or(FrontmatterError::Unterminated)?;

    let block = after_open[..end].trim();
    let body = after_open[end + closing.len()..].trim_start_matches(['\n', '\r']);
    Ok((format, block, body))
}

fn parse_yaml(block: &str) -> Result<Value, FrontmatterError> {
    if block.is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml_ng::from_str(block).map_err(FrontmatterError::Yaml)
}

fn parse_toml(block: &str) -> Result<Value, FrontmatterError> {
    let table: toml::Table = toml::from_str(block).map_err(FrontmatterError::Toml)?;
    Ok(toml_to_json(toml::Value::Table(table)))
}

/// TOML datetimes become their textual form so date coercion sees a string.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
