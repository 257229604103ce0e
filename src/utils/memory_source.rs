//! In-memory table source for testing

use crate::traits::*;
use crate::types::*;

/// In-memory table source for tests, demos and callers that already hold the grid
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    table: RawTable,
}

impl MemorySource {
    /// Create a new source over an existing table
    pub fn new(name: impl Into<String>, table: RawTable) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }

    /// Create a source from raw text rows
    pub fn from_text_rows<R, S>(name: impl Into<String>, rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(name, RawTable::from_text_rows(rows))
    }
}

impl TableSource for MemorySource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn load(&self) -> ReconResult<RawTable> {
        Ok(self.table.clone())
    }
}
