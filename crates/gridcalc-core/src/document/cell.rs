//! Cell data structures.
//!
//! - [`CellContents`] - What the user entered: a number, text, or a formula
//! - [`CellValue`] - What the cell evaluates to
//! - `Cell` - Contents plus the cached value, owned by the document

use std::fmt;

use gridcalc_engine::engine::{Formula, FormulaError, canonical_number, format_number};

/// The content stored in a non-empty cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContents {
    Number(f64),
    Text(String),
    Formula(Formula),
}

impl CellContents {
    /// The text that recreates these contents when entered again.
    pub fn to_input_string(&self) -> String {
        match self {
            CellContents::Number(n) => canonical_number(*n),
            CellContents::Text(s) => s.clone(),
            CellContents::Formula(f) => format!("={}", f),
        }
    }

    pub fn as_formula(&self) -> Option<&Formula> {
        match self {
            CellContents::Formula(f) => Some(f),
            _ => None,
        }
    }
}

/// The evaluated value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl CellValue {
    /// The value of a cell that has never been set.
    pub fn empty() -> CellValue {
        CellValue::Text(String::new())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Error(e) => write!(f, "#ERR: {}", e),
        }
    }
}

/// A non-empty cell. The cache is cleared by the document whenever this
/// cell or anything it depends on changes.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    pub contents: CellContents,
    pub cached_value: Option<CellValue>,
}

impl Cell {
    pub fn new(contents: CellContents) -> Cell {
        Cell {
            contents,
            cached_value: None,
        }
    }
}
