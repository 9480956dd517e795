//! API request handlers.

mod export;
mod operations;
mod sessions;
mod views;

pub use export::*;
pub use operations::*;
pub use sessions::*;
pub use views::*;
