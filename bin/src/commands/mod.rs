//! CLI command implementations.

pub(crate) mod crawl;
pub(crate) mod file;
