use super::Document;
use super::cell::{CellContents, CellValue};
use crate::error::Result;

/// What to do with the cell on top of the evaluation stack.
enum Step {
    Cache(CellValue),
    Descend(Vec<String>),
}

impl Document {
    /// Get the value of a cell, computing and caching it if needed.
    ///
    /// Numbers and text evaluate to themselves. A formula evaluates each
    /// referenced cell first; any reference whose value is not a number
    /// (text, an error, or an empty cell) makes the formula an error value.
    /// Empty cells evaluate to empty text.
    pub fn value(&mut self, name: &str) -> Result<CellValue> {
        let name = self.config.resolve_name(name)?;
        Ok(self.resolve(&name))
    }

    fn cached(&self, name: &str) -> Option<&CellValue> {
        self.cells.get(name).and_then(|cell| cell.cached_value.as_ref())
    }

    fn needs_evaluation(&self, name: &str) -> bool {
        self.cells
            .get(name)
            .is_some_and(|cell| cell.cached_value.is_none())
    }

    /// Evaluate `name` and everything it depends on, deepest first.
    ///
    /// Uses an explicit stack instead of recursion so long reference chains
    /// cannot exhaust the call stack. Terminates because `set_contents`
    /// never commits a cycle.
    fn resolve(&mut self, name: &str) -> CellValue {
        if let Some(value) = self.cached(name) {
            log::trace!("cache hit for {}", name);
            return value.clone();
        }

        let mut stack = vec![name.to_string()];
        while let Some(current) = stack.last() {
            let step = match self.cells.get(current) {
                None => None,
                Some(cell) if cell.cached_value.is_some() => None,
                Some(cell) => Some(match &cell.contents {
                    CellContents::Number(n) => Step::Cache(CellValue::Number(*n)),
                    CellContents::Text(s) => Step::Cache(CellValue::Text(s.clone())),
                    CellContents::Formula(formula) => {
                        let pending: Vec<String> = formula
                            .variables()
                            .iter()
                            .filter(|v| self.needs_evaluation(v))
                            .cloned()
                            .collect();
                        if pending.is_empty() {
                            log::trace!("evaluating {} = {}", current, formula);
                            let result = formula.evaluate(|v| self.cached(v).and_then(CellValue::as_number));
                            Step::Cache(match result {
                                Ok(n) => CellValue::Number(n),
                                Err(e) => CellValue::Error(e),
                            })
                        } else {
                            Step::Descend(pending)
                        }
                    }
                }),
            };

            match step {
                Some(Step::Descend(pending)) => stack.extend(pending),
                Some(Step::Cache(value)) => {
                    if let Some(current) = stack.pop()
                        && let Some(cell) = self.cells.get_mut(&current)
                    {
                        cell.cached_value = Some(value);
                    }
                }
                None => {
                    stack.pop();
                }
            }
        }

        self.cached(name).cloned().unwrap_or_else(CellValue::empty)
    }
}
