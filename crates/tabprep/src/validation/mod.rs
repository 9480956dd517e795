//! Pre-flight checks for table operations.

mod validators;

pub use validators::{
    ColumnValidator, ConversionValidator, DiscretizeValidator, FillValidator,
    NormalizeValidator, ValidationEngine, Validator, require_column,
};
