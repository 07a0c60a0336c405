//! Human-readable punishment durations
//!
//! Months are approximated as 30 days and years as 365 days.

const SECONDS_PER_DAY: i64 = 86_400;
const DAYS_PER_YEAR: i64 = 365;
const DAYS_PER_MONTH: i64 = 30;
const DAYS_PER_WEEK: i64 = 7;

/// Format a duration in seconds as e.g. `1 month, 1 week, 3 days`
///
/// Units with a zero value are left out, so durations shorter than a day
/// (including zero and negative ones) produce an empty string.
#[must_use]
pub fn format_duration(seconds: i64) -> String {
    let total_days = seconds.div_euclid(SECONDS_PER_DAY);
    if total_days <= 0 {
        return String::new();
    }

    let years = total_days / DAYS_PER_YEAR;
    let rest = total_days % DAYS_PER_YEAR;
    let months = rest / DAYS_PER_MONTH;
    let rest = rest % DAYS_PER_MONTH;
    let weeks = rest / DAYS_PER_WEEK;
    let days = rest % DAYS_PER_WEEK;

    [(years, "year"), (months, "month"), (weeks, "week"), (days, "day")]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| {
            let plural = if value > 1 { "s" } else { "" };
            format!("{value} {unit}{plural}")
        })
        .collect::<Vec<_>>()
        .join(", ")
}
