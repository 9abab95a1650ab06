//! Error types for Gridcalc core.

use thiserror::Error;

use gridcalc_engine::engine::{CycleError, FormulaFormatError};

/// Errors that reject an operation on a [`Document`](crate::Document).
///
/// Every variant is raised before any state changes, or after the change
/// has been rolled back.
#[derive(Error, Debug)]
pub enum GridcalcError {
    #[error("Invalid cell name: {0}")]
    InvalidName(String),

    #[error("Invalid formula: {0}")]
    FormulaFormat(#[from] FormulaFormatError),

    #[error(transparent)]
    CircularDependency(#[from] CycleError),

    #[error("Read/write error: {0}")]
    ReadWrite(#[from] ReadWriteError),
}

/// Save/load failures.
#[derive(Error, Debug)]
pub enum ReadWriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("No version attribute found")]
    MissingVersion,

    #[error("Version mismatch: expected '{expected}', found '{found}'")]
    VersionMismatch { expected: String, found: String },

    #[error("Cell {cell}: {source}")]
    InvalidCell {
        cell: String,
        #[source]
        source: Box<GridcalcError>,
    },
}

impl From<std::io::Error> for GridcalcError {
    fn from(err: std::io::Error) -> Self {
        GridcalcError::ReadWrite(ReadWriteError::Io(err))
    }
}

pub type Result<T> = std::result::Result<T, GridcalcError>;
