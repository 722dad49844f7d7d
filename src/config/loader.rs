use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::StagepipeConfig;
use crate::errors::{PipelineError, Result};

pub const CONFIG_FILE_NAME: &str = ".stagepipe.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse configuration from a TOML string
pub fn parse_config(contents: &str) -> Result<StagepipeConfig> {
    toml::from_str::<StagepipeConfig>(contents)
        .map_err(|e| PipelineError::config(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e)))
}

/// Load configuration from an explicit path, reporting every failure
pub fn load_config_from_path(path: &Path) -> Result<StagepipeConfig> {
    let contents = read_config_file(path).map_err(|e| {
        PipelineError::config_with_path(format!("Failed to read config: {}", e), path)
    })?;
    parse_config(&contents).map_err(|e| match e {
        PipelineError::Config { message, .. } => PipelineError::config_with_path(message, path),
        other => other,
    })
}

/// Try loading config from a specific path, logging anything but "not found"
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<StagepipeConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{} ({}). Using defaults.", e, config_path.display());
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for the first usable config file
pub fn load_config_from(start: PathBuf) -> StagepipeConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            StagepipeConfig::default()
        })
}

pub fn load_config() -> StagepipeConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            StagepipeConfig::default()
        }
    }
}
