use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

const MINUTES_PER_DAY: i64 = 24 * 60;

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d{1,2}:\d{2})\s*([AP]M)\s*-\s*(\d{1,2}:\d{2})\s*([AP]M)\s*$")
        .expect("time range pattern is valid")
});

static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2}:\d{2}(?:\s*[AP]M)?)\s*(?:to|[-\u{2013}\u{2014}])\s*(\d{1,2}:\d{2})")
        .expect("separator pattern is valid")
});

/// Rewrites the separator between the two clock times of a range so that
/// it reads `<start> - <end>`. The word `to` and any dash variant are
/// replaced; text outside a clock-to-clock span is left alone.
pub fn normalize_time_range(text: &str) -> String {
    SEPARATOR.replace_all(text, "${1} - ${2}").trim().to_string()
}

/// Length of a `9:00 AM - 10:30 AM` style range in hours, rounded to two
/// decimals. An end earlier than the start is read as crossing midnight.
/// Returns `None` when the text is not such a range.
pub fn calculate_hours(text: &str) -> Option<f64> {
    let captures = TIME_RANGE.captures(text)?;
    let start = parse_clock(&captures[1], &captures[2])?;
    let end = parse_clock(&captures[3], &captures[4])?;

    let mut minutes = end.signed_duration_since(start).num_minutes();
    if minutes < 0 {
        minutes += MINUTES_PER_DAY;
    }
    Some(round_hundredths(minutes as f64 / 60.0))
}

fn parse_clock(clock: &str, meridiem: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(&format!("{clock} {}", meridiem.to_uppercase()), "%I:%M %p").ok()
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_day_ranges() {
        assert_eq!(calculate_hours("9:00 AM - 10:30 AM"), Some(1.5));
        assert_eq!(calculate_hours("2:00 PM - 3:00 PM"), Some(1.0));
        assert_eq!(calculate_hours("11:00 AM - 1:00 PM"), Some(2.0));
        assert_eq!(calculate_hours("09:15am-10:35am"), Some(1.33));
        assert_eq!(calculate_hours("10:00 AM - 10:00 AM"), Some(0.0));
    }

    #[test]
    fn overnight_range_wraps_past_midnight() {
        assert_eq!(calculate_hours("11:30 PM - 12:15 AM"), Some(0.75));
        assert_eq!(calculate_hours("10:00 PM - 2:00 AM"), Some(4.0));
    }

    #[test]
    fn unmatched_or_invalid_ranges_have_no_duration() {
        assert_eq!(calculate_hours("garbage"), None);
        assert_eq!(calculate_hours(""), None);
        assert_eq!(calculate_hours("9:00 - 10:00"), None);
        assert_eq!(calculate_hours("13:00 PM - 2:00 PM"), None);
        assert_eq!(calculate_hours("9:75 AM - 10:00 AM"), None);
    }

    #[test]
    fn separators_are_normalized() {
        assert_eq!(normalize_time_range("9:00 AM to 10:00 AM"), "9:00 AM - 10:00 AM");
        assert_eq!(normalize_time_range("9:00 AM TO 10:00 AM"), "9:00 AM - 10:00 AM");
        assert_eq!(normalize_time_range("9:00 AM-10:00 AM"), "9:00 AM - 10:00 AM");
        assert_eq!(normalize_time_range("9:00 AM \u{2013} 10:00 AM"), "9:00 AM - 10:00 AM");
        assert_eq!(normalize_time_range("  2:00 PM - 3:00 PM "), "2:00 PM - 3:00 PM");
        assert_eq!(normalize_time_range("Tomorrow"), "Tomorrow");
        assert_eq!(normalize_time_range("9:00 - 10:00"), "9:00 - 10:00");
    }

    #[test]
    fn to_without_spaces_still_separates() {
        assert_eq!(normalize_time_range("9:00 AM to10:00 AM"), "9:00 AM - 10:00 AM");
        assert_eq!(normalize_time_range("9:00AMto10:00AM"), "9:00AM - 10:00AM");
        assert_eq!(calculate_hours(&normalize_time_range("9:00 AM to10:00 AM")), Some(1.0));
        assert_eq!(calculate_hours(&normalize_time_range("9:00AMto10:00AM")), Some(1.0));
    }

    #[test]
    fn dashes_outside_a_time_range_are_kept() {
        assert_eq!(normalize_time_range("Self-paced make-up"), "Self-paced make-up");
        assert_eq!(
            normalize_time_range("Make-up: 9:00 AM-10:00 AM"),
            "Make-up: 9:00 AM - 10:00 AM"
        );
    }
}
