//! Composition of stages into a single deferred callable.
//!
//! `a.then(&b)` reads "after `b`, apply `a`": invoking the result runs `b`
//! first, normalizes its output into a tuple, and spreads that tuple into `a`.
//! Composition is associative but not commutative.
//!
//! A composer keeps its stages as a flat ordered list and runs them in a loop,
//! so invoking or dropping a long chain uses constant stack.

use super::stage::{Stage, StageRef};
use crate::errors::{PipelineError, Result};
use crate::value::{Args, Output};
use im::Vector;
use std::fmt;

/// Immutable, cheaply clonable composed transformation.
pub struct Composer<V: Clone> {
    stages: Vector<StageRef<V>>,
}

impl<V: Clone> Clone for Composer<V> {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
        }
    }
}

impl<V: Clone> fmt::Debug for Composer<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("depth", &self.stages.len())
            .finish()
    }
}

impl<V: Clone + 'static> Composer<V> {
    /// Composer that returns its inputs unchanged, as a tuple.
    pub fn identity() -> Self {
        Self {
            stages: Vector::new(),
        }
    }

    /// Composer invoking `stage` directly.
    ///
    /// A stage failure is reported as [`PipelineError::Stage`] carrying the
    /// stage name, with the stage's own error kept as the source.
    pub fn wrap(stage: StageRef<V>) -> Self {
        Self {
            stages: Vector::unit(stage),
        }
    }

    /// Compose so that `other` runs first and `self` consumes its normalized
    /// result. Neither operand is modified.
    pub fn then(&self, other: &Composer<V>) -> Self {
        let mut stages = other.stages.clone();
        stages.append(self.stages.clone());
        Self { stages }
    }

    /// Fold an ordered stage list into one Composer, earliest stage innermost.
    ///
    /// An empty list yields [`Composer::identity`].
    pub fn fold<'a, I>(stages: I) -> Self
    where
        I: IntoIterator<Item = &'a StageRef<V>>,
    {
        Self {
            stages: stages.into_iter().cloned().collect(),
        }
    }

    /// Same stages with `stage` spliced in at `position` (at most `len`).
    pub(crate) fn inserted(&self, position: usize, stage: StageRef<V>) -> Self {
        let mut stages = self.stages.clone();
        stages.insert(position, stage);
        Self { stages }
    }

    /// Invoke the composed transformation.
    pub fn call(&self, args: Args<V>) -> Result<Output<V>> {
        self.call_logged(args, false)
    }

    pub(crate) fn call_logged(&self, args: Args<V>, log_calls: bool) -> Result<Output<V>> {
        let mut stages = self.stages.iter();
        let Some(first) = stages.next() else {
            return Ok(Output::Many(args));
        };
        let mut output = invoke(first, args, log_calls)?;
        for stage in stages {
            output = invoke(stage, output.normalize(), log_calls)?;
        }
        Ok(output)
    }

    /// Stages in evaluation order.
    pub fn stages(&self) -> &Vector<StageRef<V>> {
        &self.stages
    }

    /// Number of stages folded into this Composer.
    pub fn depth(&self) -> usize {
        self.stages.len()
    }
}

fn invoke<V: Clone>(stage: &StageRef<V>, args: Args<V>, log_calls: bool) -> Result<Output<V>> {
    if log_calls {
        log::debug!(
            "Invoking stage '{}' with {} argument(s)",
            stage.name(),
            args.len()
        );
    }
    stage
        .call(args)
        .map_err(|source| PipelineError::stage(stage.name(), source))
}
