//! Document state and logic (UI-agnostic).

mod cell;
mod config;
mod eval;
mod io;
mod ops;
mod state;

pub use cell::{CellContents, CellValue};
pub use config::{DEFAULT_VERSION, SheetConfig};
pub use state::Document;
