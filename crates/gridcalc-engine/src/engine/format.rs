/// Render a number in canonical form.
///
/// Uses the shortest decimal that parses back to the same `f64`, switching to
/// scientific notation for very large or very small magnitudes. Literals that
/// denote the same value (`2.0`, `2.000`, `2e0`) all render as `2`.
pub fn canonical_number(n: f64) -> String {
    let abs = n.abs();
    if abs != 0.0 && !(1e-5..1e15).contains(&abs) {
        format!("{:e}", n)
    } else if n == 0.0 {
        // Collapse -0 onto 0.
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

/// Format a number for display.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else {
        canonical_number(n)
    }
}
