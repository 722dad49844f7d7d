//! Deferred, composable transformation pipelines.
//!
//! A [`Pipeline`] carries a tuple of arguments and a list of staged
//! transformations. Stages either run immediately ([`Pipeline::apply_now`]) or
//! are composed for later ([`Pipeline::enqueue`]); [`Pipeline::evaluate`] runs
//! whatever is staged, spreading each tuple result into the next stage.
//!
//! ```rust
//! use stagepipe::{pure, unary, Output, Pipeline};
//!
//! let sum_prod = pure("sum_prod", |a: stagepipe::Args<i64>| {
//!     Output::many([a[0] + a[1], a[0] * a[1]])
//! });
//!
//! let p = Pipeline::new([1, 2]).enqueue(sum_prod.clone(), None)?;
//! assert_eq!(p.evaluate()?, Output::many([3, 2]));
//! assert_eq!(p.finalize_with(sum_prod, None)?, Output::many([5, 6]));
//!
//! let single = Pipeline::single(5).finalize_with(unary("inc", |x: i64| x + 1), None)?;
//! assert_eq!(single, Output::Single(6));
//! # Ok::<(), stagepipe::PipelineError>(())
//! ```

pub mod config;
pub mod errors;
pub mod io;
pub mod pipeline;
pub mod transformers;
pub mod value;

// Re-export commonly used types
pub use crate::config::{IndexPolicy, PipelineConfig, StagepipeConfig};
pub use crate::errors::PipelineError;
pub use crate::pipeline::{
    fallible, identity, pure, unary, Composer, FnStage, Pipeline, Stage, StageRef, StageRegistry,
};
pub use crate::transformers::{map_over, MapInput, Truthy};
pub use crate::value::{args, Args, Output};
