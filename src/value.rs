//! Argument tuples and stage results.
//!
//! Every stage receives an [`Args`] tuple and hands back an [`Output`]: either
//! a single value or a tuple of values. Before the next stage runs, an output
//! is normalized into a tuple so it can be spread as positional arguments.
//! Only the final result of an evaluation collapses a one-element tuple back
//! to a bare value.

use im::Vector;
use serde::{Deserialize, Serialize};

/// Ordered, immutable tuple of positional arguments.
///
/// Backed by a persistent vector so deriving a pipeline with one more argument
/// shares structure with its parent.
pub type Args<V> = Vector<V>;

/// Build an [`Args`] tuple from anything iterable.
pub fn args<V: Clone>(values: impl IntoIterator<Item = V>) -> Args<V> {
    values.into_iter().collect()
}

/// Result of a stage or of a whole evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Output<V: Clone> {
    /// The producer returned one value
    Single(V),
    /// The producer returned a tuple (possibly of length one or zero)
    Many(Args<V>),
}

impl<V: Clone> Output<V> {
    /// Tuple result from any iterable.
    pub fn many(values: impl IntoIterator<Item = V>) -> Self {
        Self::Many(values.into_iter().collect())
    }

    /// Turn the output into positional arguments for the next stage.
    ///
    /// A single value becomes a one-element tuple; a tuple is passed through
    /// as is, including one-element tuples.
    pub fn normalize(self) -> Args<V> {
        match self {
            Self::Single(value) => Vector::unit(value),
            Self::Many(values) => values,
        }
    }

    /// Final-consumption view of a tuple: exactly one element unwraps to
    /// [`Output::Single`], any other length stays a tuple.
    pub fn from_args(values: Args<V>) -> Self {
        if values.len() == 1 {
            match values.into_iter().next() {
                Some(value) => Self::Single(value),
                None => Self::Many(Vector::new()),
            }
        } else {
            Self::Many(values)
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    /// Number of values carried.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_single(&self) -> Option<&V> {
        match self {
            Self::Single(value) => Some(value),
            Self::Many(_) => None,
        }
    }

    pub fn into_single(self) -> Option<V> {
        match self {
            Self::Single(value) => Some(value),
            Self::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&Args<V>> {
        match self {
            Self::Single(_) => None,
            Self::Many(values) => Some(values),
        }
    }
}

impl<V: Clone> From<V> for Output<V> {
    fn from(value: V) -> Self {
        Self::Single(value)
    }
}
