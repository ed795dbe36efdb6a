//! Date values.
//!
//! `date` keys store `YYYY-MM-DD`. Imports also accept the layouts below,
//! tried in order, plus `today` and `now`.
//!
//! | Layout | Example |
//! |--------|---------|
//! | `%Y-%m-%d` | `2013-04-30` |
//! | `%d/%m/%Y` | `30/04/2013` |
//! | `%d/%m/%y` | `30/04/13` |
//! | `%Y/%m/%d` | `2013/04/30` |

use chrono::{Local, NaiveDate};

const STORED_FORMAT: &str = "%Y-%m-%d";

/// `(layout, separator, index of the year field, digits in the year)`.
const LAYOUTS: &[(&str, char, usize, usize)] = &[
    ("%Y-%m-%d", '-', 0, 4),
    ("%d/%m/%Y", '/', 2, 4),
    ("%d/%m/%y", '/', 2, 2),
    ("%Y/%m/%d", '/', 0, 4),
];

/// Normalizes a date value to `YYYY-MM-DD`, resolving `today` against the
/// local clock. Returns `None` if no layout matches.
///
/// # Example
///
/// ```rust
/// use hostinfo_catalog::normalize_date;
///
/// assert_eq!(normalize_date("30/04/2013").as_deref(), Some("2013-04-30"));
/// assert_eq!(normalize_date("next tuesday"), None);
/// ```
pub fn normalize_date(value: &str) -> Option<String> {
    normalize_date_on(value, Local::now().date_naive())
}

/// Like [`normalize_date`], with `today` and `now` meaning `today`.
pub fn normalize_date_on(value: &str, today: NaiveDate) -> Option<String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("today") || value.eq_ignore_ascii_case("now") {
        return Some(today.format(STORED_FORMAT).to_string());
    }
    LAYOUTS
        .iter()
        .find_map(|&(layout, separator, year_field, digits)| {
            // chrono's %Y takes any width; pin it so 13/04/30 is not year 13.
            let year = value.split(separator).nth(year_field)?;
            if year.len() != digits {
                return None;
            }
            NaiveDate::parse_from_str(value, layout).ok()
        })
        .map(|date| date.format(STORED_FORMAT).to_string())
}
