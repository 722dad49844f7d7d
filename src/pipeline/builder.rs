//! Immutable pipeline builder.
//!
//! A [`Pipeline`] holds the current argument tuple and a [`Composer`] over the
//! ordered list of staged transformations. Every builder
//! method borrows the receiver and returns a new pipeline, so a pipeline can be
//! branched freely and shared across threads.
//!
//! # Example
//!
//! ```rust
//! use stagepipe::pipeline::{unary, Pipeline};
//! use stagepipe::value::Output;
//!
//! let result = Pipeline::single(2)
//!     .enqueue(unary("double", |x: i64| x * 2), None)?
//!     .enqueue(unary("add_two", |x: i64| x + 2), None)?
//!     .finalize_with(unary("square", |x: i64| x * x), None)?;
//! assert_eq!(result, Output::Single(36));
//! # Ok::<(), stagepipe::errors::PipelineError>(())
//! ```

use super::composer::Composer;
use super::registry::StageRegistry;
use super::stage::{Stage, StageRef};
use crate::config::PipelineConfig;
use crate::errors::Result;
use crate::value::{Args, Output};
use std::fmt;

/// Deferred, composable transformation over an argument tuple.
pub struct Pipeline<V: Clone> {
    args: Args<V>,
    pending: Composer<V>,
    config: PipelineConfig,
}

impl<V: Clone> Clone for Pipeline<V> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
            pending: self.pending.clone(),
            config: self.config.clone(),
        }
    }
}

impl<V: Clone + fmt::Debug + 'static> fmt::Debug for Pipeline<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("args", &self.args)
            .field("stages", &self.stage_names())
            .field("config", &self.config)
            .finish()
    }
}

impl<V: Clone + 'static> Pipeline<V> {
    /// Create a pipeline over the given initial arguments with nothing staged.
    pub fn new(initial_args: impl IntoIterator<Item = V>) -> Self {
        Self {
            args: initial_args.into_iter().collect(),
            pending: Composer::identity(),
            config: PipelineConfig::default(),
        }
    }

    /// Pipeline over a single initial argument.
    pub fn single(value: V) -> Self {
        Self::new([value])
    }

    /// Pipeline with no initial arguments.
    pub fn empty() -> Self {
        Self::new([])
    }

    /// Same arguments and stages under a different configuration.
    pub fn with_config(&self, config: PipelineConfig) -> Self {
        Self {
            args: self.args.clone(),
            pending: self.pending.clone(),
            config,
        }
    }

    /// Run `stage` against the current arguments right away.
    ///
    /// The normalized result becomes the new argument tuple. Already-staged
    /// transformations are kept and will run on the new arguments at
    /// evaluation time.
    pub fn apply_now(&self, stage: StageRef<V>) -> Result<Self> {
        log::debug!(
            "Applying stage '{}' eagerly to {} argument(s)",
            stage.name(),
            self.args.len()
        );
        let args = Composer::wrap(stage)
            .call_logged(self.args.clone(), self.config.log_stages)?
            .normalize();
        Ok(Self {
            args,
            pending: self.pending.clone(),
            config: self.config.clone(),
        })
    }

    /// Stage `stage` for deferred evaluation.
    ///
    /// With `index == None` the stage runs after everything already staged.
    /// With `Some(i)` it is spliced into the stage list at position `i`;
    /// evaluation order always matches list order.
    pub fn enqueue(&self, stage: StageRef<V>, index: Option<usize>) -> Result<Self> {
        let len = self.stage_count();
        let position = self.config.index_policy.resolve(index, len)?;
        log::debug!(
            "Staging '{}' at position {} of {}",
            stage.name(),
            position,
            len + 1
        );

        Ok(Self {
            args: self.args.clone(),
            pending: self.pending.inserted(position, stage),
            config: self.config.clone(),
        })
    }

    /// Stage the registered stage called `name`.
    ///
    /// Fails immediately with
    /// [`PipelineError::InvalidArgument`](crate::errors::PipelineError::InvalidArgument)
    /// when no such stage is registered.
    pub fn enqueue_named(
        &self,
        registry: &StageRegistry<V>,
        name: &str,
        index: Option<usize>,
    ) -> Result<Self> {
        let stage = registry.resolve(name)?;
        self.enqueue(stage, index)
    }

    /// Add `value` to the argument tuple, at the end or at `index`.
    pub fn insert_argument(&self, value: V, index: Option<usize>) -> Result<Self> {
        let len = self.args.len();
        let position = self.config.index_policy.resolve(index, len)?;
        log::trace!("Inserting argument at position {} of {}", position, len + 1);

        let mut args = self.args.clone();
        args.insert(position, value);
        Ok(Self {
            args,
            pending: self.pending.clone(),
            config: self.config.clone(),
        })
    }

    /// Apply the builder conditionally.
    ///
    /// ```rust
    /// use stagepipe::pipeline::{unary, Pipeline};
    /// use stagepipe::value::Output;
    ///
    /// let scaled = true;
    /// let result = Pipeline::single(3)
    ///     .when(scaled, |p| p.enqueue(unary("times_ten", |x: i32| x * 10), None))?
    ///     .evaluate()?;
    /// assert_eq!(result, Output::Single(30));
    /// # Ok::<(), stagepipe::errors::PipelineError>(())
    /// ```
    pub fn when<F>(&self, condition: bool, f: F) -> Result<Self>
    where
        F: FnOnce(&Self) -> Result<Self>,
    {
        if condition {
            f(self)
        } else {
            Ok(self.clone())
        }
    }

    /// Run every staged transformation against the stored arguments.
    ///
    /// A one-element result is returned as [`Output::Single`]; any other
    /// length comes back as [`Output::Many`].
    pub fn evaluate(&self) -> Result<Output<V>> {
        let result = self
            .pending
            .call_logged(self.args.clone(), self.config.log_stages)?
            .normalize();
        Ok(Output::from_args(result))
    }

    /// `enqueue(stage, index)` followed by `evaluate()`.
    pub fn finalize_with(&self, stage: StageRef<V>, index: Option<usize>) -> Result<Output<V>> {
        self.enqueue(stage, index)?.evaluate()
    }

    /// `insert_argument(value, index)` followed by `evaluate()`.
    pub fn insert_argument_and_evaluate(&self, value: V, index: Option<usize>) -> Result<Output<V>> {
        self.insert_argument(value, index)?.evaluate()
    }

    /// Current argument tuple.
    pub fn args(&self) -> &Args<V> {
        &self.args
    }

    pub fn stage_count(&self) -> usize {
        self.pending.depth()
    }

    /// Names of the staged transformations in evaluation order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.pending.stages().iter().map(|s| s.name()).collect()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

impl<V: Clone + 'static> Default for Pipeline<V> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PipelineError;
    use crate::pipeline::stage::{fallible, identity, pure, unary};
    use crate::value::args;
    use pretty_assertions::assert_eq;

    fn sum_prod() -> StageRef<i64> {
        pure("sum_prod", |a: Args<i64>| {
            let sum: i64 = a.iter().sum();
            let product: i64 = a.iter().product();
            Output::many([sum, product])
        })
    }

    #[test]
    fn test_enqueue_runs_in_append_order() {
        let result = Pipeline::single(2)
            .enqueue(unary("double", |x: i64| x * 2), None)
            .unwrap()
            .enqueue(unary("add_two", |x: i64| x + 2), None)
            .unwrap()
            .enqueue(unary("square", |x: i64| x * x), None)
            .unwrap()
            .evaluate()
            .unwrap();
        assert_eq!(result, Output::Single(36));
    }

    #[test]
    fn test_tuple_results_are_spread() {
        let once = Pipeline::new([1, 2]).enqueue(sum_prod(), None).unwrap();
        assert_eq!(once.evaluate().unwrap(), Output::many([3, 2]));

        let twice = once.enqueue(sum_prod(), None).unwrap();
        assert_eq!(twice.evaluate().unwrap(), Output::many([5, 6]));
    }

    #[test]
    fn test_singleton_is_unwrapped() {
        let result = Pipeline::single(5)
            .enqueue(identity(), None)
            .unwrap()
            .evaluate()
            .unwrap();
        assert_eq!(result, Output::Single(5));
    }

    #[test]
    fn test_evaluate_without_stages_returns_arguments() {
        assert_eq!(Pipeline::new([1, 2]).evaluate().unwrap(), Output::many([1, 2]));
        assert_eq!(Pipeline::single(1).evaluate().unwrap(), Output::Single(1));
        assert_eq!(Pipeline::<i64>::empty().evaluate().unwrap(), Output::many([]));
    }

    #[test]
    fn test_derivation_leaves_parent_untouched() {
        let p1 = Pipeline::single(3)
            .enqueue(unary("inc", |x: i64| x + 1), None)
            .unwrap();
        let before = p1.evaluate().unwrap();

        let p2 = p1.enqueue(unary("double", |x: i64| x * 2), None).unwrap();
        let p3 = p1.enqueue(unary("double", |x: i64| x * 2), Some(0)).unwrap();

        assert_eq!(p1.evaluate().unwrap(), before);
        assert_eq!(p1.stage_count(), 1);
        assert_eq!(p2.evaluate().unwrap(), Output::Single(8));
        assert_eq!(p3.evaluate().unwrap(), Output::Single(7));
    }

    #[test]
    fn test_indexed_enqueue_reorders_evaluation() {
        let sub = unary("sub", |x: i64| x - 1);
        let mul = unary("mul", |x: i64| x * 2);

        let appended = Pipeline::single(10)
            .enqueue(sub.clone(), None)
            .unwrap()
            .enqueue(mul.clone(), None)
            .unwrap();
        assert_eq!(appended.evaluate().unwrap(), Output::Single(18));

        let inserted = Pipeline::single(10)
            .enqueue(sub, None)
            .unwrap()
            .enqueue(mul, Some(0))
            .unwrap();
        assert_eq!(inserted.stage_names(), vec!["mul", "sub"]);
        assert_eq!(inserted.evaluate().unwrap(), Output::Single(19));
    }

    #[test]
    fn test_indexed_enqueue_in_the_middle() {
        let p = Pipeline::single(1)
            .enqueue(unary("a", |x: i64| x * 10), None)
            .unwrap()
            .enqueue(unary("c", |x: i64| x * 3), None)
            .unwrap()
            .enqueue(unary("b", |x: i64| x + 1), Some(1))
            .unwrap();
        assert_eq!(p.stage_names(), vec!["a", "b", "c"]);
        assert_eq!(p.evaluate().unwrap(), Output::Single(33));
    }

    #[test]
    fn test_eager_matches_deferred() {
        let double = unary("double", |x: i64| x * 2);
        let eager = Pipeline::single(2).apply_now(double.clone()).unwrap();
        let deferred = Pipeline::single(2).enqueue(double, None).unwrap();

        assert_eq!(eager.args(), &args([4]));
        assert_eq!(eager.stage_count(), 0);
        assert_eq!(eager.evaluate().unwrap(), deferred.evaluate().unwrap());
        assert_eq!(eager.evaluate().unwrap(), Output::Single(4));
    }

    #[test]
    fn test_apply_now_runs_ahead_of_staged_work() {
        let f1 = unary("f1", |x: i64| x * 2);
        let f2 = unary("f2", |x: i64| x + 2);
        let f3 = unary("f3", |x: i64| x * x);

        let p = Pipeline::single(1)
            .apply_now(f1.clone())
            .unwrap()
            .enqueue(f2.clone(), None)
            .unwrap()
            .apply_now(f1)
            .unwrap()
            .apply_now(f3.clone())
            .unwrap()
            .enqueue(f3, None)
            .unwrap();
        assert_eq!(p.args(), &args([16]));
        assert_eq!(p.finalize_with(f2, None).unwrap(), Output::Single(326));
    }

    #[test]
    fn test_argument_insertion() {
        let result = Pipeline::single(1)
            .insert_argument(2, None)
            .unwrap()
            .enqueue(sum_prod(), None)
            .unwrap()
            .evaluate()
            .unwrap();
        assert_eq!(result, Output::many([3, 2]));
    }

    #[test]
    fn test_insert_argument_and_evaluate() {
        let p = Pipeline::single(1).enqueue(sum_prod(), None).unwrap();
        assert_eq!(
            p.insert_argument_and_evaluate(2, None).unwrap(),
            Output::many([3, 2])
        );
        let p = p.insert_argument(2, None).unwrap();
        assert_eq!(
            p.insert_argument_and_evaluate(3, None).unwrap(),
            Output::many([6, 6])
        );
    }

    #[test]
    fn test_insert_argument_at_index() {
        let p = Pipeline::new([1, 3]).insert_argument(2, Some(1)).unwrap();
        assert_eq!(p.args(), &args([1, 2, 3]));
    }

    #[test]
    fn test_clamped_index_appends() {
        let p = Pipeline::new([1]).insert_argument(2, Some(99)).unwrap();
        assert_eq!(p.args(), &args([1, 2]));

        let p = Pipeline::single(10)
            .enqueue(unary("sub", |x: i64| x - 1), None)
            .unwrap()
            .enqueue(unary("mul", |x: i64| x * 2), Some(7))
            .unwrap();
        assert_eq!(p.evaluate().unwrap(), Output::Single(18));
    }

    #[test]
    fn test_strict_index_policy_rejects_out_of_range() {
        let p = Pipeline::single(1).with_config(PipelineConfig::strict());
        let err = p.insert_argument(2, Some(5)).unwrap_err();
        assert!(matches!(err, PipelineError::IndexOutOfRange { index: 5, len: 1 }));

        let err = p.enqueue(identity(), Some(1)).unwrap_err();
        assert!(matches!(err, PipelineError::IndexOutOfRange { index: 1, len: 0 }));
    }

    #[test]
    fn test_with_config_keeps_stages() {
        let p = Pipeline::single(4)
            .enqueue(unary("inc", |x: i64| x + 1), None)
            .unwrap()
            .with_config(PipelineConfig::default().with_stage_logging(true));
        assert!(p.config().log_stages);
        assert_eq!(p.evaluate().unwrap(), Output::Single(5));
    }

    #[test]
    fn test_stage_failure_propagates() {
        let p = Pipeline::single(1)
            .enqueue(unary("inc", |x: i64| x + 1), None)
            .unwrap()
            .enqueue(
                fallible("reject", |_: Args<i64>| Err(anyhow::anyhow!("rejected"))),
                None,
            )
            .unwrap();
        let err = p.evaluate().unwrap_err();
        assert_eq!(err.stage_name(), Some("reject"));
        assert_eq!(err.into_stage_source().unwrap().to_string(), "rejected");
    }

    #[test]
    fn test_apply_now_failure_propagates() {
        let err = Pipeline::<i64>::empty()
            .apply_now(unary("inc", |x: i64| x + 1))
            .unwrap_err();
        assert!(err.is_stage_failure());
    }

    #[test]
    fn test_enqueue_named() {
        let registry = StageRegistry::new().with_stage(unary("double", |x: i64| x * 2));
        let p = Pipeline::single(21)
            .enqueue_named(&registry, "double", None)
            .unwrap();
        assert_eq!(p.evaluate().unwrap(), Output::Single(42));

        let err = p.enqueue_named(&registry, "triple", None).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidArgument(_)));
    }

    #[test]
    fn test_when() {
        let base = Pipeline::single(2);
        let with_extra = base
            .when(true, |p| p.enqueue(unary("add_ten", |x: i64| x + 10), None))
            .unwrap();
        let without_extra = base
            .when(false, |p| p.enqueue(unary("add_ten", |x: i64| x + 10), None))
            .unwrap();
        assert_eq!(with_extra.evaluate().unwrap(), Output::Single(12));
        assert_eq!(without_extra.evaluate().unwrap(), Output::Single(2));
    }

    #[test]
    fn test_pipeline_is_shareable_across_threads() {
        let p = Pipeline::single(7)
            .enqueue(unary("double", |x: i64| x * 2), None)
            .unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let p = p.clone();
                std::thread::spawn(move || p.evaluate().unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Output::Single(14));
        }
    }
}
