//! Deferred composition of stages over argument tuples.
//!
//! Stages are staged with [`Pipeline::enqueue`] or run right away with
//! [`Pipeline::apply_now`]; nothing deferred runs until
//! [`Pipeline::evaluate`].

pub mod builder;
pub mod composer;
pub mod registry;
pub mod stage;

pub use builder::Pipeline;
pub use composer::Composer;
pub use registry::StageRegistry;
pub use stage::{fallible, identity, pure, unary, FnStage, Stage, StageRef};
