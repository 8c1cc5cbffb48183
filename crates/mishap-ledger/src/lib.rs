//! Mishap Ledger - Append-only record of resolved actions
//!
//! This crate stores the immutable history the engine produces:
//!
//! - **LedgerStore**: the append-only storage contract
//! - **MemoryLedger** / **JsonlLedger**: in-memory and JSON-lines backends
//! - **LedgerQuery** / **Auditor**: filtering and summary statistics
//! - **Exporter**: RON, JSON, CSV and text output for narrative consumers
//!
//! # Example
//!
//! ```rust,ignore
//! use mishap_ledger::{Auditor, Exporter, ExportFormat, JsonlLedger, LedgerQuery, LedgerStore};
//! use mishap_core::Outcome;
//!
//! let ledger = JsonlLedger::open("ledger.jsonl")?;
//! let failures = LedgerQuery::new()
//!     .by_outcome(Outcome::Failure)
//!     .run(&ledger)?;
//!
//! println!("{}", Auditor::new(&failures).generate_report());
//! let csv = Exporter::new(&failures).export(ExportFormat::Csv)?;
//! ```

mod error;
mod exporter;
mod jsonl;
mod memory;
mod query;
mod store;

pub use error::{Error, Result};
pub use exporter::{ExportFormat, Exporter};
pub use jsonl::JsonlLedger;
pub use memory::MemoryLedger;
pub use query::{AuditReport, Auditor, LedgerQuery};
pub use store::{LedgerStore, TimeRange};
