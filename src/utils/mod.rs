//! Utility modules

pub mod memory_source;
pub mod parse;
pub mod validation;

pub use memory_source::*;
pub use parse::*;
pub use validation::*;
