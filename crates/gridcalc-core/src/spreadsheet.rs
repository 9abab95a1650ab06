//! Front-end facing interface over a spreadsheet store.

use std::io::Write;

use crate::document::{CellContents, CellValue, Document};
use crate::error::Result;

/// What a front end needs from a spreadsheet: edit cells, read them back,
/// and persist. Implemented by [`Document`].
pub trait Spreadsheet {
    /// Set a cell from user input; returns the cells needing a refresh.
    fn set_contents(&mut self, name: &str, input: &str) -> Result<Vec<String>>;

    fn contents(&self, name: &str) -> Result<Option<&CellContents>>;

    fn value(&mut self, name: &str) -> Result<CellValue>;

    fn names_of_nonempty(&self) -> Vec<String>;

    fn is_modified(&self) -> bool;

    fn version(&self) -> &str;

    fn save(&mut self, writer: &mut dyn Write) -> Result<()>;
}

impl Spreadsheet for Document {
    fn set_contents(&mut self, name: &str, input: &str) -> Result<Vec<String>> {
        Document::set_contents(self, name, input)
    }

    fn contents(&self, name: &str) -> Result<Option<&CellContents>> {
        Document::contents(self, name)
    }

    fn value(&mut self, name: &str) -> Result<CellValue> {
        Document::value(self, name)
    }

    fn names_of_nonempty(&self) -> Vec<String> {
        Document::names_of_nonempty(self)
    }

    fn is_modified(&self) -> bool {
        Document::is_modified(self)
    }

    fn version(&self) -> &str {
        Document::version(self)
    }

    fn save(&mut self, writer: &mut dyn Write) -> Result<()> {
        self.save_to(writer)
    }
}
