//! Content collections.
//!
//! ```text
//! content/
//! ├── frontmatter  # YAML / TOML block -> untyped fields
//! ├── schema       # untyped fields -> validated Post
//! ├── slug         # entry path -> URL slug
//! └── collection   # directory walk, parallel validation, fail-closed load
//! ```

mod collection;
mod frontmatter;
mod schema;
mod slug;

pub use collection::{Collection, CollectionError, Entry};

#[cfg(test)]
pub(crate) use schema::{
    Post, RawPost,
    tests::{FakeResolver, valid_fields},
};
