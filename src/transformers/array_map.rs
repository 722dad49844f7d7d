//! Mapping a stage across a list of inputs.

use crate::errors::{PipelineError, Result};
use crate::pipeline::{Stage, StageRef};
use crate::value::{Args, Output};

/// One element of a mapped list: spread as a tuple or passed as one argument.
#[derive(Debug, Clone, PartialEq)]
pub enum MapInput<V: Clone> {
    Tuple(Args<V>),
    Scalar(V),
}

impl<V: Clone> MapInput<V> {
    fn into_args(self) -> Args<V> {
        match self {
            Self::Tuple(args) => args,
            Self::Scalar(value) => Args::unit(value),
        }
    }
}

impl<V: Clone> From<V> for MapInput<V> {
    fn from(value: V) -> Self {
        Self::Scalar(value)
    }
}

/// Truthiness used to drop empty results.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

macro_rules! impl_truthy_for_numbers {
    ($($t:ty),*) => {
        $(impl Truthy for $t {
            fn is_truthy(&self) -> bool {
                *self != (0 as $t)
            }
        })*
    };
}

impl_truthy_for_numbers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for &str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for serde_json::Value {
    fn is_truthy(&self) -> bool {
        use serde_json::Value;
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
        }
    }
}

impl<V: Clone + Truthy> Truthy for Output<V> {
    fn is_truthy(&self) -> bool {
        match self {
            Output::Single(value) => value.is_truthy(),
            Output::Many(values) => !values.is_empty(),
        }
    }
}

/// Invoke `stage` once per input, in order, and collect the results.
///
/// With `except_none` set, results that are not [truthy](Truthy) are dropped.
/// The first failing call aborts the whole map.
pub fn map_over<V, I>(
    stage: &StageRef<V>,
    inputs: I,
    except_none: bool,
) -> Result<Vec<Output<V>>>
where
    V: Clone + Truthy,
    I: IntoIterator<Item = MapInput<V>>,
{
    let mut results = Vec::new();
    for input in inputs {
        let output = stage
            .call(input.into_args())
            .map_err(|source| PipelineError::stage(stage.name(), source))?;
        if !except_none || output.is_truthy() {
            results.push(output);
        }
    }
    log::debug!(
        "Mapped stage '{}' to {} result(s)",
        stage.name(),
        results.len()
    );
    Ok(results)
}
