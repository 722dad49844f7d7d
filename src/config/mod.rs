//! Configuration for pipelines, read from `.stagepipe.toml`.
//!
//! ```toml
//! [pipeline]
//! index_policy = "strict"
//! log_stages = true
//! ```

mod core;
mod loader;

pub use self::core::{IndexPolicy, PipelineConfig, StagepipeConfig};

pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path, parse_config,
    CONFIG_FILE_NAME,
};
