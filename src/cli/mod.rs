//! Command-line interface module.

mod args;
pub mod build;
pub mod check;
mod common;
pub mod serve;

pub use args::{BuildArgs, Cli, Commands};
