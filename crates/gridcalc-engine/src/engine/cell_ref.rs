//! A1-style cell references.
//!
//! Cell names in a sheet are free-form variable
//! names, but most sheets use spreadsheet notation ("A1", "B2", "AA100").
//! This module converts between that notation and zero-indexed coordinates,
//! which front ends use to validate names and to lay cells out in order.
//!
//! # Examples
//!
//! ```
//! use gridcalc_engine::engine::CellRef;
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 1); // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

fn a1_re() -> &'static Regex {
    static A1_RE: OnceLock<Regex> = OnceLock::new();
    A1_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").expect("A1 reference regex must compile")
    })
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "B2", "AA10").
    /// Returns None if the input is invalid.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        Self::parse_a1(name)
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = a1_re().captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;

        let row = numbers.parse::<usize>().ok()?.checked_sub(1)?;

        Some(CellRef::new(col, row))
    }

    /// Whether `name` is a well-formed A1 reference.
    pub fn is_a1_name(name: &str) -> bool {
        Self::parse_a1(name).is_some()
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

/// Order cell names for output: A1 references by row then column, anything
/// else lexically after them.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    match (CellRef::from_str(a), CellRef::from_str(b)) {
        (Some(x), Some(y)) => x.row.cmp(&y.row).then(x.col.cmp(&y.col)).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_columns() {
        assert_eq!(CellRef::from_str("A1"), Some(CellRef::new(0, 0)));
        assert_eq!(CellRef::from_str("Z1").map(|c| c.col), Some(25));
        assert_eq!(CellRef::from_str("AA1").map(|c| c.col), Some(26));
        assert_eq!(CellRef::from_str("BA1").map(|c| c.col), Some(52));
    }

    #[test]
    fn test_from_str_rows_and_case() {
        assert_eq!(CellRef::from_str("A100").map(|c| c.row), Some(99));
        assert_eq!(CellRef::from_str("aA1").map(|c| c.col), Some(26));
    }

    #[test]
    fn test_from_str_invalid_inputs() {
        for bad in ["", "123", "ABC", "A0", "1A", "A 1", "A1_"] {
            assert!(CellRef::from_str(bad).is_none(), "{}", bad);
            assert!(!CellRef::is_a1_name(bad));
        }
    }

    #[test]
    fn test_parse_a1_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellRef::from_str(&huge).is_none());
    }

    #[test]
    fn test_display_round_trip() {
        for name in ["A1", "Z26", "AB3", "XFD1048576"] {
            assert_eq!(CellRef::from_str(name).unwrap().to_string(), name);
        }
    }

    #[test]
    fn test_col_to_letters_handles_max_usize() {
        let letters = CellRef::col_to_letters(usize::MAX);
        assert!(!letters.is_empty());
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_compare_names() {
        let mut names = vec!["total", "B2", "A10", "C1", "A2", "_x"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["C1", "A2", "B2", "A10", "_x", "total"]);
    }
}
