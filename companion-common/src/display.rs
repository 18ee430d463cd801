//! Display formatting for catalog values
//!
//! Provides consistent rendering of weights, hour volumes and enumerations
//! across the catalog views.

/// Connector used between the last two items of an enumeration
const AND_CONNECTOR: &str = "et";

/// Format an evaluation weight.
///
/// Whole numbers render without a decimal point, fractional weights keep
/// their decimals.
///
/// # Examples
///
/// ```
/// use companion_common::display::format_weight;
///
/// assert_eq!(format_weight(20.0), "20");
/// assert_eq!(format_weight(12.5), "12.5");
/// ```
pub fn format_weight(weight: f64) -> String {
    if weight.is_finite() && weight.fract() == 0.0 && weight.abs() < i64::MAX as f64 {
        format!("{}", weight as i64)
    } else {
        format!("{}", weight)
    }
}

/// Format per-term hour volumes as `"Q1 30h | Q2 15h"`.
///
/// Blank or absent terms are left out; `None` when neither term has a value.
///
/// # Examples
///
/// ```
/// use companion_common::display::format_hours;
///
/// assert_eq!(format_hours(Some("30"), Some("15h")).as_deref(), Some("Q1 30h | Q2 15h"));
/// assert_eq!(format_hours(None, Some("24")).as_deref(), Some("Q2 24h"));
/// assert_eq!(format_hours(Some(" "), None), None);
/// ```
pub fn format_hours(q1: Option<&str>, q2: Option<&str>) -> Option<String> {
    let term = |label: &str, value: Option<&str>| {
        value
            .filter(|v| !v.trim().is_empty())
            .map(|v| format!("{} {}", label, ensure_hours_suffix(v)))
    };

    match (term("Q1", q1), term("Q2", q2)) {
        (Some(first), Some(second)) => Some(format!("{} | {}", first, second)),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

/// Append an `h` unit unless the value already ends with one (any case)
pub fn ensure_hours_suffix(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.to_lowercase().ends_with('h') {
        trimmed.to_string()
    } else {
        format!("{}h", trimmed)
    }
}

/// Join items as a French enumeration.
///
/// # Examples
///
/// ```
/// use companion_common::display::join_with_and;
///
/// assert_eq!(join_with_and(&["TP1"]), "TP1");
/// assert_eq!(join_with_and(&["TP1", "TP2"]), "TP1 et TP2");
/// assert_eq!(join_with_and(&["A", "B", "C"]), "A, B et C");
/// ```
pub fn join_with_and<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [head @ .., last] => {
            let head: Vec<&str> = head.iter().map(|item| item.as_ref()).collect();
            format!("{} {} {}", head.join(", "), AND_CONNECTOR, last.as_ref())
        }
    }
}
