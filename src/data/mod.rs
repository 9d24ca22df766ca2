pub mod source;
pub mod stats;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export key types for convenience
pub use source::{
    bezeichnung, column_as_f64, column_as_string, column_values, format_number, Dataset, Typ,
    Values,
};
pub use stats::Extent;
