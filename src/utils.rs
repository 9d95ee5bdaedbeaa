//! Formatting helpers for the text output of the CLI.

/// Formats an optional f64 to 4 decimal places, or returns "—" if None or non-finite.
pub fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.4}"),
        _ => "—".to_owned(),
    }
}

/// Formats a percentage in `[0, 100]` with one decimal.
pub fn fmt_pct(pct: f64) -> String {
    if pct.is_finite() {
        format!("{pct:.1}%")
    } else {
        "—".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(1.0)), "1.0000");
        assert_eq!(fmt_opt(Some(f64::NAN)), "—");
        assert_eq!(fmt_opt(None), "—");
    }

    #[test]
    fn test_fmt_pct() {
        assert_eq!(fmt_pct(12.345), "12.3%");
        assert_eq!(fmt_pct(f64::INFINITY), "—");
    }
}
