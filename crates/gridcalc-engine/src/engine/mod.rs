//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`Formula`], [`Token`], [`Operator`] - Validated, canonical arithmetic formulas
//! - [`Formula::evaluate`] - Two-stack evaluation against a variable lookup
//! - [`DependencyIndex`] - Bidirectional "references" relation between names
//! - [`affected_set`] - Recalculation set with circular dependency detection
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`canonical_number`], [`format_number`] - Number rendering

mod cell_ref;
mod cycle;
mod deps;
mod error;
mod eval;
mod format;
mod formula;

pub use cell_ref::{CellRef, compare_names};
pub use cycle::affected_set;
pub use deps::DependencyIndex;
pub use error::{CycleError, FormulaError, FormulaFormatError};
pub use format::{canonical_number, format_number};
pub use formula::{Formula, Operator, Token, is_variable_name};
