//! # Statement Reconciler
//!
//! Reconciles a bank statement against the internal accounting ledger.
//!
//! ## Features
//!
//! - **Header detection**: finds the label row below bank preambles
//! - **Column normalization**: debit/credit/date detection by Spanish synonyms, signed amounts rounded to cents
//! - **Exact matching**: one pair per distinct amount, deterministic first-occurrence pairing
//! - **Partial matching**: one bank movement explained as the sum of several ledger entries
//! - **Reporting**: sectioned report with JSON and (feature `xlsx`) spreadsheet export
//! - **Sources**: CSV files, and workbooks with the `xlsx` feature
//!
//! ## Quick Start
//!
//! ```rust
//! use statement_reconciler::{RawTable, ReconciliationEngine, SectionKind};
//!
//! let bank = RawTable::from_text_rows(vec![
//!     vec!["Banco Ejemplo", ""],
//!     vec!["fecha", "débito", "crédito"],
//!     vec!["2024-01-02", "", "300"],
//! ]);
//! let ledger = RawTable::from_text_rows(vec![
//!     vec!["fecha", "debe", "haber"],
//!     vec!["2024-01-02", "", "100"],
//!     vec!["2024-01-02", "", "200"],
//! ]);
//!
//! let report = ReconciliationEngine::new().reconcile_tables(&bank, &ledger).unwrap();
//! assert_eq!(report.summary.matched, 0);
//! assert_eq!(report.section(SectionKind::PartialMatches).unwrap().rows.len(), 2);
//! ```

pub mod config;
pub mod normalize;
pub mod reconciliation;
pub mod report;
pub mod sources;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use normalize::*;
pub use reconciliation::*;
pub use report::*;
pub use sources::*;
pub use traits::*;
pub use types::*;
pub use utils::*;
