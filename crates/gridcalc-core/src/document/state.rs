use std::collections::HashMap;

use gridcalc_engine::engine::{DependencyIndex, compare_names};

use super::cell::{Cell, CellContents};
use super::config::SheetConfig;
use crate::error::Result;

/// UI-agnostic spreadsheet state.
///
/// Owns every non-empty cell and the dependency index between them. A single
/// owner drives it; independent documents share nothing.
#[derive(Debug)]
pub struct Document {
    /// Non-empty cells keyed by normalized name
    pub(crate) cells: HashMap<String, Cell>,
    /// Which cells' formulas mention which names
    pub(crate) deps: DependencyIndex,
    /// Name rules and version tag
    pub(crate) config: SheetConfig,
    /// Whether a committed edit happened since creation or the last save
    pub(crate) modified: bool,
}

impl Document {
    /// Create an empty document with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SheetConfig::default())
    }

    pub fn with_config(config: SheetConfig) -> Self {
        Document {
            cells: HashMap::new(),
            deps: DependencyIndex::new(),
            config,
            modified: false,
        }
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn version(&self) -> &str {
        self.config.version()
    }

    /// Whether the document has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Names of all non-empty cells, A1 references first in row/column order.
    pub fn names_of_nonempty(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cells.keys().cloned().collect();
        names.sort_by(|a, b| compare_names(a, b));
        names
    }

    /// Stored contents of `name`, or `None` if the cell is empty.
    pub fn contents(&self, name: &str) -> Result<Option<&CellContents>> {
        let name = self.config.resolve_name(name)?;
        Ok(self.cells.get(&name).map(|cell| &cell.contents))
    }

    /// Cells whose formula mentions `name` directly.
    pub fn direct_referencers(&self, name: &str) -> Result<Vec<String>> {
        let name = self.config.resolve_name(name)?;
        Ok(self.deps.referencers(&name))
    }

    /// Names mentioned by the formula in `name` (empty for non-formula cells).
    pub fn referenced(&self, name: &str) -> Result<Vec<String>> {
        let name = self.config.resolve_name(name)?;
        Ok(self.deps.references(&name))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
