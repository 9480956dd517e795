//! Type inference, cell parsing and column statistics.

mod parse;
mod statistics;

pub use parse::{
    build_column, infer_type, is_null_marker, parse_bool, parse_cell, parse_datetime,
    parse_float, parse_integer,
};
pub use statistics::{Moments, median, mode};
