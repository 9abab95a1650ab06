use std::fmt;

use gridcalc_engine::engine::is_variable_name;

use crate::error::{GridcalcError, Result};

/// Version tag used when none is configured.
pub const DEFAULT_VERSION: &str = "default";

type Validator = Box<dyn Fn(&str) -> bool>;
type Normalizer = Box<dyn Fn(&str) -> String>;

/// Construction options for a [`Document`](super::Document).
///
/// - `validator`: extra check every normalized name must pass (default: accept all)
/// - `normalizer`: maps names to their canonical spelling (default: identity)
/// - `version`: tag written on save and required on load
pub struct SheetConfig {
    validator: Validator,
    normalizer: Normalizer,
    version: String,
}

impl SheetConfig {
    pub fn new() -> Self {
        SheetConfig {
            validator: Box::new(|_: &str| true),
            normalizer: Box::new(|name: &str| name.to_string()),
            version: DEFAULT_VERSION.to_string(),
        }
    }

    pub fn with_validator(mut self, validator: impl Fn(&str) -> bool + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn with_normalizer(mut self, normalizer: impl Fn(&str) -> String + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn normalize(&self, name: &str) -> String {
        (self.normalizer)(name)
    }

    /// Whether an already-normalized name is usable as a cell name.
    pub fn is_valid(&self, name: &str) -> bool {
        is_variable_name(name) && (self.validator)(name)
    }

    /// Normalize `name` and check it, returning the normalized form.
    pub(crate) fn resolve_name(&self, name: &str) -> Result<String> {
        let normalized = self.normalize(name);
        if self.is_valid(&normalized) {
            Ok(normalized)
        } else {
            Err(GridcalcError::InvalidName(name.to_string()))
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SheetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetConfig")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
