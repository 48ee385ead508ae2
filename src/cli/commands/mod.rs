//! CLI command implementations.

pub mod ask;
pub mod chat;
pub mod threads;

use std::path::Path;

use anyhow::Result;

use crate::domain::models::Config;
use crate::infrastructure::ConfigLoader;

/// Directory holding one JSON snapshot per conversation thread.
pub(crate) const THREADS_DIR: &str = ".lara/threads";

pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}
