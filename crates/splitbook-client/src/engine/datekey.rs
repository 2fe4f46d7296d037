use chrono::{DateTime, Datelike, NaiveDate};

/// Marker stored when a submission carries no order date.
pub const NO_DATE_MARKER: &str = "无日期";

/// Bucket name for order dates no rule can read a month out of.
pub const UNKNOWN_BUCKET: &str = "Unknown";

const BEIJING_OFFSET_MS: i64 = 8 * 3_600 * 1_000;

/// Strips whitespace and the common date separators, leaving the digits and
/// any other characters in place. Two free-text dates compare equal when their
/// stripped forms match.
pub fn comparable_key(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !ch.is_whitespace() && !matches!(ch, '.' | '/' | '-'))
        .collect()
}

/// Whether a date belongs to the "no date" class: blank once stripped, or the
/// explicit no-date marker.
pub fn is_empty_class(raw: &str) -> bool {
    let key = comparable_key(raw);
    key.is_empty() || key == NO_DATE_MARKER
}

pub fn keys_equal(left: &str, right: &str) -> bool {
    let left_empty = is_empty_class(left);
    let right_empty = is_empty_class(right);
    if left_empty || right_empty {
        return left_empty && right_empty;
    }
    comparable_key(left) == comparable_key(right)
}

/// Reads a `YYYY-MM` month key out of a free-text order date, trying each rule
/// in order against the first position it matches anywhere in the string:
///
/// 1. four-digit year, separator, one or two digit month
/// 2. one or two digit month, separator, one or two digit day (reference year)
/// 3. `YYYY年MM月`
/// 4. `MM月`, optionally followed by a day (reference year)
///
/// The month number is taken verbatim, so a nonsense value like `23` still
/// buckets. Returns `None` when no rule matches.
pub fn month_bucket(raw: &str, reference_year: i32) -> Option<String> {
    let chars: Vec<char> = raw.chars().collect();

    if let Some((year, month)) = scan_year_sep_month(&chars) {
        return Some(format_month_key(year, month));
    }
    if let Some(month) = scan_month_sep_day(&chars) {
        return Some(format_month_key(reference_year, month));
    }
    if let Some((year, month)) = scan_cjk_year_month(&chars) {
        return Some(format_month_key(year, month));
    }
    if let Some(month) = scan_cjk_month(&chars) {
        return Some(format_month_key(reference_year, month));
    }

    None
}

pub fn format_month_key(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

/// Year in fixed UTC+8 for the given instant.
pub fn reference_year(now_ms: i64) -> i32 {
    beijing_date(now_ms).year()
}

/// `YYYY-MM` for the current month in fixed UTC+8.
pub fn current_month_key(now_ms: i64) -> String {
    let date = beijing_date(now_ms);
    format_month_key(date.year(), date.month())
}

fn beijing_date(now_ms: i64) -> NaiveDate {
    let shifted_seconds = (now_ms + BEIJING_OFFSET_MS).div_euclid(1_000);
    DateTime::from_timestamp(shifted_seconds, 0)
        .map(|instant| instant.date_naive())
        .unwrap_or(NaiveDate::MIN)
}

fn is_separator(ch: char) -> bool {
    matches!(ch, '.' | '/' | '-')
}

fn digit_run(chars: &[char], start: usize, length: usize) -> Option<u32> {
    if start + length > chars.len() {
        return None;
    }
    let slice = &chars[start..start + length];
    if !slice.iter().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    slice
        .iter()
        .collect::<String>()
        .parse::<u32>()
        .ok()
}

fn scan_year_sep_month(chars: &[char]) -> Option<(i32, u32)> {
    for start in 0..chars.len() {
        let Some(year) = digit_run(chars, start, 4) else {
            continue;
        };
        let separator_index = start + 4;
        if separator_index >= chars.len() || !is_separator(chars[separator_index]) {
            continue;
        }
        for month_length in [2usize, 1] {
            if let Some(month) = digit_run(chars, separator_index + 1, month_length) {
                return Some((year as i32, month));
            }
        }
    }
    None
}

fn scan_month_sep_day(chars: &[char]) -> Option<u32> {
    for start in 0..chars.len() {
        for month_length in [2usize, 1] {
            let Some(month) = digit_run(chars, start, month_length) else {
                continue;
            };
            let separator_index = start + month_length;
            if separator_index >= chars.len() || !is_separator(chars[separator_index]) {
                continue;
            }
            for day_length in [2usize, 1] {
                if digit_run(chars, separator_index + 1, day_length).is_some() {
                    return Some(month);
                }
            }
        }
    }
    None
}

fn scan_cjk_year_month(chars: &[char]) -> Option<(i32, u32)> {
    for start in 0..chars.len() {
        let Some(year) = digit_run(chars, start, 4) else {
            continue;
        };
        let marker_index = start + 4;
        if marker_index >= chars.len() || chars[marker_index] != '年' {
            continue;
        }
        for month_length in [2usize, 1] {
            if let Some(month) = digit_run(chars, marker_index + 1, month_length) {
                let month_marker = marker_index + 1 + month_length;
                if month_marker < chars.len() && chars[month_marker] == '月' {
                    return Some((year as i32, month));
                }
            }
        }
    }
    None
}

fn scan_cjk_month(chars: &[char]) -> Option<u32> {
    for start in 0..chars.len() {
        for month_length in [2usize, 1] {
            let Some(month) = digit_run(chars, start, month_length) else {
                continue;
            };
            let marker_index = start + month_length;
            if marker_index < chars.len() && chars[marker_index] == '月' {
                return Some(month);
            }
        }
    }
    None
}
