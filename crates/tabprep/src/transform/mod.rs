//! Table transformation operators.
//!
//! Each operator is a pure function from a table and its parameters to a new
//! table; the caller's table is never modified.

mod convert;
mod encode;
mod engine;
mod missing;
mod operations;
mod scale;

pub use convert::convert_type;
pub(crate) use convert::{to_datetime, to_number};
pub use encode::{label_encode, one_hot_encode};
pub use engine::TransformEngine;
pub use missing::{drop_nulls, fill_missing};
pub use operations::{FillStrategy, Operation, TargetType, TransformOutcome};
pub(crate) use scale::check_bins;
pub use scale::{DEFAULT_BINS, MAX_BINS, discretize, equal_width_edges, normalize};
