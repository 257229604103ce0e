//! Normalization of raw tables into canonical transaction sequences

pub mod columns;
pub mod header;
pub mod statement;

pub use columns::*;
pub use header::*;
pub use statement::*;
