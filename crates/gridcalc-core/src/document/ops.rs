use gridcalc_engine::engine::{Formula, affected_set};

use super::Document;
use super::cell::{Cell, CellContents};
use crate::error::Result;

impl Document {
    /// Classify raw input: empty clears, numbers and `=formulas` are parsed,
    /// anything else is text.
    fn parse_input(&self, input: &str) -> Result<Option<CellContents>> {
        if input.is_empty() {
            return Ok(None);
        }

        if let Ok(n) = input.trim().parse::<f64>()
            && n.is_finite()
        {
            return Ok(Some(CellContents::Number(n)));
        }

        if let Some(formula) = input.strip_prefix('=') {
            let formula = Formula::parse_with(
                formula,
                |name| self.config.normalize(name),
                |name| self.config.is_valid(name),
            )?;
            return Ok(Some(CellContents::Formula(formula)));
        }

        Ok(Some(CellContents::Text(input.to_string())))
    }

    /// Set the contents of a cell from user input.
    ///
    /// Returns the cell itself followed by every cell that (transitively)
    /// depends on it, in recalculation order. Their cached values are
    /// cleared. If the new contents would create a circular dependency the
    /// document is left exactly as it was and the cycle is returned as an error.
    pub fn set_contents(&mut self, name: &str, input: &str) -> Result<Vec<String>> {
        let name = self.config.resolve_name(name)?;
        let contents = self.parse_input(input)?;

        let unchanged = self.cells.get(&name).map(|cell| &cell.contents) == contents.as_ref();

        let referenced: Vec<String> = contents
            .as_ref()
            .and_then(CellContents::as_formula)
            .map(|f| f.variables().to_vec())
            .unwrap_or_default();

        let previous = self.deps.references(&name);
        self.deps.replace_references(&name, &referenced);

        let affected = match affected_set(&self.deps, &name) {
            Ok(affected) => affected,
            Err(cycle) => {
                self.deps.replace_references(&name, &previous);
                log::warn!("rejected edit to {}: {}", name, cycle);
                return Err(cycle.into());
            }
        };

        match contents {
            Some(contents) => {
                self.cells.insert(name.clone(), Cell::new(contents));
            }
            None => {
                self.cells.remove(&name);
            }
        }

        for dependent in &affected {
            if let Some(cell) = self.cells.get_mut(dependent) {
                cell.cached_value = None;
            }
        }

        if !unchanged {
            self.modified = true;
        }

        log::debug!(
            "set {} (unchanged: {}), {} cell(s) invalidated",
            name,
            unchanged,
            affected.len()
        );
        Ok(affected)
    }

    /// Clear a cell. Same as setting it to the empty string.
    pub fn clear_cell(&mut self, name: &str) -> Result<Vec<String>> {
        self.set_contents(name, "")
    }
}
