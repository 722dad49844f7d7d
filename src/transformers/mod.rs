pub mod array_map;

pub use array_map::{map_over, MapInput, Truthy};
