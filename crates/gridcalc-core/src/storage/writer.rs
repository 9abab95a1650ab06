//! Writer for .grd file format

use crate::document::CellContents;

pub(crate) const GRD_HEADER: &str = "# gridcalc spreadsheet";

/// Write cells to a .grd format string.
///
/// `cells` is written in the order given; callers pass them sorted.
pub fn write_grd_content(version: &str, cells: &[(&str, &CellContents)]) -> String {
    let mut lines = vec![
        GRD_HEADER.to_string(),
        format!("@version: \"{}\"", escape_grd_text(version)),
    ];

    for (name, contents) in cells {
        let value_str = match contents {
            CellContents::Text(s) => format!("\"{}\"", escape_grd_text(s)),
            CellContents::Number(_) | CellContents::Formula(_) => contents.to_input_string(),
        };
        lines.push(format!("{}: {}", name, value_str));
    }

    lines.join("\n") + "\n"
}

fn escape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}
