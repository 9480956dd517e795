//! Strongly-typed column store.

mod column;
#[allow(clippy::module_inception)]
mod table;
mod types;
mod value;

pub use column::Column;
pub use table::Table;
pub use types::ColumnType;
pub use value::{DATETIME_FORMAT, Value};
