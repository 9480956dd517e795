//! Views derived from the working table.

mod analysis;
mod resolver;
mod summary;

pub use analysis::{CrossCount, Preview, crosstab, preview, value_counts};
pub use resolver::ViewResolver;
pub use summary::{ColumnKind, ColumnSummary, DerivedView};
