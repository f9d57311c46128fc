//! Blog post schema: validate and coerce raw frontmatter into a [`Post`].
//!
//! | Field         | Type          | Coercion                               |
//! |---------------|---------------|----------------------------------------|
//! | `title`       | string        | none                                   |
//! | `description` | string        | none                                   |
//! | `pubDate`     | date          | text or epoch milliseconds -> UTC date |
//! | `updatedDate` | date          | same as `pubDate`                      |
//! | `heroImage`   | image         | resolved, dimensions read              |
//! | `socialImage` | image         | resolved, dimensions read              |
//! | `imageAlt`    | string        | none                                   |
//! | `tags`        | string array  | none, order kept                       |
//!
//! Every field is required. Unknown keys are ignored. Validation reports
//! every failing field, not just the first.

use super::frontmatter::RawFields;
use crate::image::{AssetResolver, ImageAsset, ImageError};
use crate::utils::date::DateTimeUtc;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use thiserror::Error;

pub mod fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const PUB_DATE: &str = "pubDate";
    pub const UPDATED_DATE: &str = "updatedDate";
    pub const HERO_IMAGE: &str = "heroImage";
    pub const SOCIAL_IMAGE: &str = "socialImage";
    pub const IMAGE_ALT: &str = "imageAlt";
    pub const TAGS: &str = "tags";
    pub const SLUG: &str = "slug";
}

/// A validated blog post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    pub description: String,
    pub pub_date: DateTimeUtc,
    pub updated_date: DateTimeUtc,
    pub hero_image: ImageAsset,
    pub social_image: ImageAsset,
    pub image_alt: String,
    pub tags: Vec<String>,
}

/// Frontmatter split into the schema's fields, still untyped.
///
/// `null` counts as absent.
#[derive(Debug, Default, Clone)]
pub struct RawPost {
    pub title: Option<Value>,
    pub description: Option<Value>,
    pub pub_date: Option<Value>,
    pub updated_date: Option<Value>,
    pub hero_image: Option<Value>,
    pub social_image: Option<Value>,
    pub image_alt: Option<Value>,
    pub tags: Option<Value>,
    /// Explicit slug, overriding the one derived from the entry path.
    pub slug: Option<Value>,
}

impl RawPost {
    pub fn from_fields(mut raw: RawFields) -> Self {
        let mut take = |key: &str| raw.remove(key).filter(|v| !v.is_null());
        Self {
            title: take(fields::TITLE),
            description: take(fields::DESCRIPTION),
            pub_date: take(fields::PUB_DATE),
            updated_date: take(fields::UPDATED_DATE),
            hero_image: take(fields::HERO_IMAGE),
            social_image: take(fields::SOCIAL_IMAGE),
            image_alt: take(fields::IMAGE_ALT),
            tags: take(fields::TAGS),
            slug: take(fields::SLUG),
        }
    }
}

// ============================================================================
// errors
// ============================================================================

/// What is wrong with one field.
#[derive(Debug, Error)]
pub enum IssueKind {
    #[error("required")]
    Missing,

    #[error("expected {expected}, found {found}")]
    InvalidType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("{0}")]
    Image(ImageError),
}

#[derive(Debug, Error)]
#[error("{field}: {kind}")]
pub struct SchemaIssue {
    pub field: &'static str,
    pub kind: IssueKind,
}

/// An entry whose frontmatter does not match the schema.
#[derive(Debug)]
pub struct SchemaError {
    pub entry: String,
    pub issues: Vec<SchemaIssue>,
}

impl SchemaError {
    #[cfg(test)]
    pub fn has_issue(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: invalid frontmatter", self.entry)?;
        for issue in &self.issues {
            write!(f, "\n  - {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

// ============================================================================
// validation
// ============================================================================

impl Post {
    /// Validate `raw` for the entry `entry` stored at `entry_path`.
    ///
    /// Image references are resolved relative to `entry_path`.
    pub fn validate(
        entry: &str,
        raw: &RawPost,
        entry_path: &Path,
        resolver: &dyn AssetResolver,
    ) -> Result<Self, SchemaError> {
        let mut issues = Vec::new();
        let i = &mut issues;

        let title = check(i, fields::TITLE, string(raw.title.as_ref()));
        let description = check(i, fields::DESCRIPTION, string(raw.description.as_ref()));
        let pub_date = check(i, fields::PUB_DATE, date(raw.pub_date.as_ref()));
        let updated_date = check(i, fields::UPDATED_DATE, date(raw.updated_date.as_ref()));
        let hero_image = check(
            i,
            fields::HERO_IMAGE,
            image(raw.hero_image.as_ref(), entry_path, resolver),
        );
        let social_image = check(
            i,
            fields::SOCIAL_IMAGE,
            image(raw.social_image.as_ref(), entry_path, resolver),
        );
        let image_alt = check(i, fields::IMAGE_ALT, string(raw.image_alt.as_ref()));
        let tags = check(i, fields::TAGS, string_array(raw.tags.as_ref()));

        match (
            title,
            description,
            pub_date,
            updated_date,
            hero_image,
            social_image,
            image_alt,
            tags,
        ) {
            (
                Some(title),
                Some(description),
                Some(pub_date),
                Some(updated_date),
                Some(hero_image),
                Some(social_image),
                Some(image_alt),
                Some(tags),
            ) => Ok(Self {
                title,
                description,
                pub_date,
                updated_date,
                hero_image,
                social_image,
                image_alt,
                tags,
            }),
            _ => Err(SchemaError {
                entry: entry.to_string(),
                issues,
            }),
        }
    }
}

/// Record a failed field, returning the value when it passed.
fn check<T>(
    issues: &mut Vec<SchemaIssue>,
    field: &'static str,
    result: Result<T, IssueKind>,
) -> Option<T> {
    result
        .map_err(|kind| issues.push(SchemaIssue { field, kind }))
        .ok()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn string(value: Option<&Value>) -> Result<String, IssueKind> {
    match value {
        None => Err(IssueKind::Missing),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(IssueKind::InvalidType {
            expected: "string",
            found: type_name(other),
        }),
    }
}

fn string_array(value: Option<&Value>) -> Result<Vec<String>, IssueKind> {
    let items = match value {
        None => return Err(IssueKind::Missing),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(IssueKind::InvalidType {
                expected: "array",
                found: type_name(other),
            });
        }
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(IssueKind::InvalidType {
                expected: "array of strings",
                found: type_name(other),
            }),
        })
        .collect()
}

/// Text is parsed as a date; integers are epoch milliseconds.
fn date(value: Option<&Value>) -> Result<DateTimeUtc, IssueKind> {
    match value {
        None => Err(IssueKind::Missing),
        Some(Value::String(s)) => {
            DateTimeUtc::parse(s).ok_or_else(|| IssueKind::InvalidDate(s.clone()))
        }
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| DateTimeUtc::from_unix(ms.div_euclid(1000)))
            .ok_or_else(|| IssueKind::InvalidDate(n.to_string())),
        Some(other) => Err(IssueKind::InvalidType {
            expected: "date",
            found: type_name(other),
        }),
    }
}

fn image(
    value: Option<&Value>,
    entry_path: &Path,
    resolver: &dyn AssetResolver,
) -> Result<ImageAsset, IssueKind> {
    let reference = string(value)?;
    resolver
        .resolve(&reference, entry_path)
        .map_err(IssueKind::Image)
}
