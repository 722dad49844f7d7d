//! Stage abstractions for composable pipelines.
//!
//! A stage is a named callable that accepts a tuple of positional values and
//! returns either one value or a tuple. Stages are never inspected for arity
//! or types: whatever they receive is whatever the previous stage produced.

use crate::value::{Args, Output};
use anyhow::bail;
use std::marker::PhantomData;
use std::sync::Arc;

/// A pipeline stage that transforms an argument tuple.
///
/// Failures are reported through `anyhow` and surface unchanged from
/// [`Pipeline::evaluate`](crate::pipeline::Pipeline::evaluate).
pub trait Stage<V: Clone>: Send + Sync {
    /// Execute this stage with the given positional arguments.
    fn call(&self, args: Args<V>) -> anyhow::Result<Output<V>>;

    /// Get the stage name for logging and error reporting.
    fn name(&self) -> &str;
}

/// Shared, type-erased stage handle.
pub type StageRef<V> = Arc<dyn Stage<V>>;

impl<V: Clone, S: Stage<V> + ?Sized> Stage<V> for Arc<S> {
    fn call(&self, args: Args<V>) -> anyhow::Result<Output<V>> {
        (**self).call(args)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A stage built from a closure.
///
/// # Example
///
/// ```rust
/// use stagepipe::pipeline::{FnStage, Stage};
/// use stagepipe::value::{args, Output};
///
/// let sum = FnStage::new("sum", |a: stagepipe::value::Args<i64>| {
///     Ok(Output::Single(a.iter().sum()))
/// });
/// assert_eq!(sum.call(args([1, 2, 3])).unwrap(), Output::Single(6));
/// ```
pub struct FnStage<F, V> {
    name: String,
    func: F,
    _phantom: PhantomData<fn(V) -> V>,
}

impl<F, V> FnStage<F, V>
where
    V: Clone,
    F: Fn(Args<V>) -> anyhow::Result<Output<V>> + Send + Sync,
{
    /// Create a new stage with a name and transformation function.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, V> Stage<V> for FnStage<F, V>
where
    V: Clone,
    F: Fn(Args<V>) -> anyhow::Result<Output<V>> + Send + Sync,
{
    fn call(&self, args: Args<V>) -> anyhow::Result<Output<V>> {
        (self.func)(args)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Infallible stage over the whole argument tuple.
pub fn pure<V, F>(name: impl Into<String>, func: F) -> StageRef<V>
where
    V: Clone + 'static,
    F: Fn(Args<V>) -> Output<V> + Send + Sync + 'static,
{
    Arc::new(FnStage::new(name, move |args: Args<V>| Ok(func(args))))
}

/// Fallible stage over the whole argument tuple.
pub fn fallible<V, F>(name: impl Into<String>, func: F) -> StageRef<V>
where
    V: Clone + 'static,
    F: Fn(Args<V>) -> anyhow::Result<Output<V>> + Send + Sync + 'static,
{
    Arc::new(FnStage::new(name, func))
}

/// Single-value stage: receives exactly one positional argument and returns
/// one value. Any other arity is a stage failure.
pub fn unary<V, F>(name: impl Into<String>, func: F) -> StageRef<V>
where
    V: Clone + 'static,
    F: Fn(V) -> V + Send + Sync + 'static,
{
    let name = name.into();
    let label = name.clone();
    Arc::new(FnStage::new(name, move |mut args: Args<V>| {
        let arity = args.len();
        match args.pop_front() {
            Some(value) if arity == 1 => Ok(Output::Single(func(value))),
            _ => bail!("stage '{}' expects one argument, got {}", label, arity),
        }
    }))
}

/// Stage returning its inputs unchanged.
pub fn identity<V: Clone + 'static>() -> StageRef<V> {
    pure("identity", Output::Many)
}
