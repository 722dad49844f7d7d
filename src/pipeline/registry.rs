//! Named stage lookup.
//!
//! Lets callers compose pipelines from stage names (e.g. read from user input)
//! while still rejecting anything that is not a registered callable at the
//! moment the pipeline is built, not when it is evaluated.

use super::stage::{Stage, StageRef};
use crate::errors::{PipelineError, Result};
use im::OrdMap;
use std::sync::Arc;

/// Immutable map of stage name to stage.
pub struct StageRegistry<V: Clone> {
    stages: OrdMap<String, StageRef<V>>,
}

impl<V: Clone> Clone for StageRegistry<V> {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
        }
    }
}

impl<V: Clone> Default for StageRegistry<V> {
    fn default() -> Self {
        Self {
            stages: OrdMap::new(),
        }
    }
}

impl<V: Clone> StageRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `stage` under its own name, replacing any previous entry.
    pub fn register(&mut self, stage: StageRef<V>) {
        let name = stage.name().to_string();
        if self.stages.insert(name.clone(), stage).is_some() {
            log::debug!("Replaced registered stage '{}'", name);
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_stage(mut self, stage: StageRef<V>) -> Self {
        self.register(stage);
        self
    }

    pub fn get(&self, name: &str) -> Option<StageRef<V>> {
        self.stages.get(name).map(Arc::clone)
    }

    /// Look up a stage, failing with [`PipelineError::InvalidArgument`] when
    /// `name` does not refer to a registered stage.
    pub fn resolve(&self, name: &str) -> Result<StageRef<V>> {
        self.get(name).ok_or_else(|| {
            PipelineError::invalid_argument(format!("'{}' is not a registered stage", name))
        })
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.stages.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stage::unary;
    use crate::value::{args, Output};

    fn registry() -> StageRegistry<i32> {
        StageRegistry::new()
            .with_stage(unary("double", |x: i32| x * 2))
            .with_stage(unary("inc", |x: i32| x + 1))
    }

    #[test]
    fn test_resolve_known_stage() {
        let stage = registry().resolve("double").unwrap();
        assert_eq!(stage.call(args([4])).unwrap(), Output::Single(8));
    }

    #[test]
    fn test_resolve_unknown_stage_is_invalid_argument() {
        let err = registry().resolve("square").err().unwrap();
        assert!(matches!(err, PipelineError::InvalidArgument(_)));
        assert!(err.to_string().contains("square"));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = registry();
        registry.register(unary("inc", |x: i32| x + 10));
        assert_eq!(registry.len(), 2);
        let stage = registry.resolve("inc").unwrap();
        assert_eq!(stage.call(args([1])).unwrap(), Output::Single(11));
    }

    #[test]
    fn test_names_are_sorted() {
        assert_eq!(registry().names(), vec!["double", "inc"]);
        assert!(StageRegistry::<i32>::new().is_empty());
    }
}
