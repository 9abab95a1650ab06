//! gridcalc-core - UI-agnostic cell store + storage.

pub mod document;
pub mod error;
pub mod storage;
mod spreadsheet;

pub use document::{CellContents, CellValue, DEFAULT_VERSION, Document, SheetConfig};
pub use error::{GridcalcError, ReadWriteError, Result};
pub use spreadsheet::Spreadsheet;

pub use gridcalc_engine::engine::{CellRef, Formula, FormulaError};
