pub mod dictionary;
pub mod error;
pub mod logging;
pub mod prune;
pub mod stream;
pub mod text;

pub use error::{HvuError, Result};
