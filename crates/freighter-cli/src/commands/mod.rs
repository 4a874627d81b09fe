//! CLI commands

pub mod discover;
pub mod source_url;
