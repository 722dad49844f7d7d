use serde::{Deserialize, Serialize};

/// Root configuration structure for stagepipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StagepipeConfig {
    /// Pipeline construction and evaluation settings
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Settings applied to every pipeline derived from a configured root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    /// How an insertion index past the end of a list is treated
    #[serde(default)]
    pub index_policy: IndexPolicy,

    /// Log every stage invocation at debug level
    #[serde(default)]
    pub log_stages: bool,
}

impl PipelineConfig {
    pub fn strict() -> Self {
        Self {
            index_policy: IndexPolicy::Strict,
            ..Self::default()
        }
    }

    pub fn with_stage_logging(mut self, enabled: bool) -> Self {
        self.log_stages = enabled;
        self
    }
}

/// Handling of out-of-range insertion indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndexPolicy {
    /// Indices past the end append
    #[default]
    Clamp,
    /// Indices past the end are rejected
    Strict,
}

impl IndexPolicy {
    /// Resolve `index` against a list of length `len`.
    ///
    /// `None` means "append" and always resolves to `len`.
    pub fn resolve(self, index: Option<usize>, len: usize) -> crate::errors::Result<usize> {
        match (index, self) {
            (None, _) => Ok(len),
            (Some(i), _) if i <= len => Ok(i),
            (Some(_), IndexPolicy::Clamp) => Ok(len),
            (Some(i), IndexPolicy::Strict) => {
                Err(crate::errors::PipelineError::IndexOutOfRange { index: i, len })
            }
        }
    }
}
