//! File-name helpers used to pick a loader for tabular input.

pub mod extension;

pub use extension::{extension, is_csv, is_xlsx, TableFormat};
