//! Parser for .grd file format

use crate::error::ReadWriteError;

/// A cell line from a .grd file, as the text that recreates it.
#[derive(Clone, Debug, PartialEq)]
pub struct SavedCell {
    /// 1-based line number in the source
    pub line: usize,
    pub name: String,
    /// Input string for `set_contents`
    pub contents: String,
}

/// The decoded contents of a .grd file.
#[derive(Clone, Debug, PartialEq)]
pub struct SavedSheet {
    pub version: String,
    pub cells: Vec<SavedCell>,
}

fn parse_error(line: usize, message: impl Into<String>) -> ReadWriteError {
    ReadWriteError::Parse {
        line,
        message: message.into(),
    }
}

/// Parse .grd content from a string.
///
/// Only the syntax is checked here. Names and formulas are validated when
/// the cells are replayed into a document.
pub fn parse_grd_content(content: &str) -> Result<SavedSheet, ReadWriteError> {
    let mut version: Option<String> = None;
    let mut cells = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(attribute) = line.strip_prefix('@') {
            let (key, value) = split_line(attribute, line_num)?;
            if key != "version" {
                return Err(parse_error(line_num, format!("Unknown attribute: @{}", key)));
            }
            if version.is_some() {
                return Err(parse_error(line_num, "Duplicate version attribute"));
            }
            if !cells.is_empty() {
                return Err(parse_error(line_num, "Version attribute must precede all cells"));
            }
            let Some(tag) = unquote(value) else {
                return Err(parse_error(line_num, "Version must be a quoted string"));
            };
            version = Some(tag);
            continue;
        }

        let (name, value) = split_line(line, line_num)?;
        if name.is_empty() {
            return Err(parse_error(line_num, "Missing cell name"));
        }
        let contents = parse_cell_value(value, line_num)?;
        cells.push(SavedCell {
            line: line_num,
            name: name.to_string(),
            contents,
        });
    }

    let version = version.ok_or(ReadWriteError::MissingVersion)?;
    Ok(SavedSheet { version, cells })
}

/// Read only the version attribute, stopping at the first cell line.
pub fn read_grd_version(content: &str) -> Result<String, ReadWriteError> {
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(attribute) = line.strip_prefix('@') else {
            break;
        };
        let (key, value) = split_line(attribute, line_num + 1)?;
        if key == "version" {
            return unquote(value)
                .ok_or_else(|| parse_error(line_num + 1, "Version must be a quoted string"));
        }
    }
    Err(ReadWriteError::MissingVersion)
}

// Parse "KEY: VALUE" format
fn split_line(line: &str, line_num: usize) -> Result<(&str, &str), ReadWriteError> {
    let Some((key, value)) = line.split_once(':') else {
        return Err(parse_error(line_num, "Expected 'NAME: VALUE' format"));
    };
    Ok((key.trim(), value.trim()))
}

/// Turn a stored value back into the input string that produced it.
fn parse_cell_value(value: &str, line_num: usize) -> Result<String, ReadWriteError> {
    if value.is_empty() {
        return Err(parse_error(line_num, "Missing value"));
    }

    // Formula: starts with '='
    if value.starts_with('=') {
        return Ok(value.to_string());
    }

    if value.starts_with('"') {
        return unquote(value)
            .ok_or_else(|| parse_error(line_num, format!("Unterminated text: {}", value)));
    }

    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(value.to_string()),
        _ => Err(parse_error(
            line_num,
            format!("Invalid value: {}. Use quotes for text.", value),
        )),
    }
}

/// Strip the surrounding quotes from `"..."` and decode escapes.
fn unquote(value: &str) -> Option<String> {
    let inner = value.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next()? {
                '\\' => out.push('\\'),
                '"' => out.push('"'),
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            },
            // an unescaped quote ends the string early
            '"' => return None,
            _ => out.push(ch),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(body: &str) -> SavedSheet {
        parse_grd_content(&format!("@version: \"1.0\"\n{}", body)).unwrap()
    }

    #[test]
    fn test_parse_number() {
        let parsed = sheet("A1: 42");
        assert_eq!(parsed.version, "1.0");
        assert_eq!(parsed.cells[0].name, "A1");
        assert_eq!(parsed.cells[0].contents, "42");
        assert_eq!(parsed.cells[0].line, 2);
    }

    #[test]
    fn test_parse_text() {
        let parsed = sheet(r#"A1: "Hello""#);
        assert_eq!(parsed.cells[0].contents, "Hello");
    }

    #[test]
    fn test_parse_text_escapes() {
        let parsed = sheet(r#"A1: "He said \"hi\"\nthen \\left""#);
        assert_eq!(parsed.cells[0].contents, "He said \"hi\"\nthen \\left");
    }

    #[test]
    fn test_parse_formula() {
        let parsed = sheet("A1: =B1 + C1");
        assert_eq!(parsed.cells[0].contents, "=B1 + C1");
    }

    #[test]
    fn test_text_value_may_contain_colons() {
        let parsed = sheet(r#"note: "at 10:30""#);
        assert_eq!(parsed.cells[0].name, "note");
        assert_eq!(parsed.cells[0].contents, "at 10:30");
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let parsed = parse_grd_content("# header\n\n@version: \"v\"\n# note\nB2: 1\n").unwrap();
        assert_eq!(parsed.cells.len(), 1);
        assert_eq!(parsed.cells[0].line, 5);
    }

    #[test]
    fn test_missing_version() {
        let err = parse_grd_content("A1: 1\n").unwrap_err();
        assert!(matches!(err, ReadWriteError::MissingVersion));
    }

    #[test]
    fn test_version_after_cells_rejected() {
        let err = parse_grd_content("A1: 1\n@version: \"1\"\n").unwrap_err();
        assert!(matches!(err, ReadWriteError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_duplicate_version_rejected() {
        let err = parse_grd_content("@version: \"1\"\n@version: \"2\"\n").unwrap_err();
        assert!(matches!(err, ReadWriteError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        let err = parse_grd_content("@author: \"me\"\n").unwrap_err();
        assert!(matches!(err, ReadWriteError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_unquoted_text_rejected() {
        let content = "@version: \"1\"\nA1: hello\n";
        match parse_grd_content(content) {
            Err(ReadWriteError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("Use quotes"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_number_rejected() {
        assert!(parse_grd_content("@version: \"1\"\nA1: inf\n").is_err());
        assert!(parse_grd_content("@version: \"1\"\nA1: NaN\n").is_err());
    }

    #[test]
    fn test_missing_separator() {
        let err = parse_grd_content("@version: \"1\"\nA1 42\n").unwrap_err();
        assert!(matches!(err, ReadWriteError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_unterminated_text() {
        assert!(parse_grd_content("@version: \"1\"\nA1: \"open\n").is_err());
        assert!(parse_grd_content("@version: \"1\"\nA1: \"a\"b\"\n").is_err());
    }

    #[test]
    fn test_read_version_only() {
        assert_eq!(read_grd_version("# x\n@version: \"2.1\"\nA1: =bad(\n").unwrap(), "2.1");
        assert!(matches!(
            read_grd_version("A1: 1\n@version: \"2.1\"\n"),
            Err(ReadWriteError::MissingVersion)
        ));
    }
}
