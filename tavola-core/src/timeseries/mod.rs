//! Series alignment engine.
//!
//! Modules include:
//! - `fields`: pick the value field out of a provider frame
//! - `align`: normalize dates and build the common axis
//! - `fill`: forward/backward gap filling
//! - `change`: percent-change derived columns
//! - `columns`: deterministic, paired column order
//! - `assemble`: the composed pipeline
/// Composed pipeline from raw series to a final table.
pub mod assemble;
/// Calendar normalization and common-axis alignment.
pub mod align;
/// Percent-change computation.
pub mod change;
/// Output column planning.
pub mod columns;
/// Value-field fallback lookup.
pub mod fields;
/// Gap filling.
pub mod fill;
