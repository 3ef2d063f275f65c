//! Cell text conventions shared by every renderer and the document export.
//!
//! A count of exactly zero is shown as an empty cell. The stored value stays
//! what the service sent; this only affects display.

/// Text for a question count cell.
///
/// ```
/// use specmatrix_core::presentation::count_cell;
///
/// assert_eq!(count_cell(0.0), "");
/// assert_eq!(count_cell(1.0), "1");
/// assert_eq!(count_cell(1.5), "1.5");
/// ```
#[must_use]
pub fn count_cell(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        value.to_string()
    }
}

/// Text for a per-level percentage cell; zero is shown empty.
#[must_use]
pub fn percent_cell(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        format_percent(value)
    }
}

/// Text for the combined basic/advanced percentage cells, always shown.
#[must_use]
pub fn general_percent_cell(value: f64) -> String {
    format_percent(value)
}

// f64 Display already drops a zero fractional part ("30" for 30.0)
fn format_percent(value: f64) -> String {
    format!("{value}%")
}
