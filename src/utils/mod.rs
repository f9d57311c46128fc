//! Shared utilities.

pub mod date;
pub mod mime;

/// `"1 post"`, `"3 posts"`.
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
