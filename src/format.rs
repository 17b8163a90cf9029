//! Human-facing value formatting and lenient parsing.
//!
//! Small helpers for status output: byte counts, compact durations,
//! percentages, truncation with an ellipsis, and the permissive boolean
//! parsing used for settings values.

/// Formats a byte count with binary-prefixed units and two decimals.
///
/// ```
/// use slirc_text::format::to_byte_str;
///
/// assert_eq!(to_byte_str(512), "512 B");
/// assert_eq!(to_byte_str(2048), "2.00 KiB");
/// assert_eq!(to_byte_str(5 * 1024 * 1024 + 262144), "5.25 MiB");
/// ```
pub fn to_byte_str(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;
    const TIB: u64 = GIB * 1024;

    if bytes > TIB {
        format!("{:.2} TiB", bytes as f64 / TIB as f64)
    } else if bytes > GIB {
        format!("{:.2} GiB", bytes as f64 / GIB as f64)
    } else if bytes > MIB {
        format!("{:.2} MiB", bytes as f64 / MIB as f64)
    } else if bytes > KIB {
        format!("{:.2} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Formats a duration in seconds as a compact `1y 2w 3d 4h 5m 6s` span,
/// omitting zero units.
///
/// ```
/// use slirc_text::format::to_time_str;
///
/// assert_eq!(to_time_str(0), "0s");
/// assert_eq!(to_time_str(61), "1m 1s");
/// assert_eq!(to_time_str(90061), "1d 1h 1m 1s");
/// ```
pub fn to_time_str(seconds: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = MINUTE * 60;
    const DAY: u64 = HOUR * 24;
    const WEEK: u64 = DAY * 7;
    const YEAR: u64 = DAY * 365;

    let mut left = seconds;
    let mut out = String::new();

    for (span, label) in [
        (YEAR, "y"),
        (WEEK, "w"),
        (DAY, "d"),
        (HOUR, "h"),
        (MINUTE, "m"),
        (1, "s"),
    ] {
        if left >= span {
            out.push_str(&format!("{}{} ", left / span, label));
            left %= span;
        }
    }

    if out.is_empty() {
        return "0s".to_string();
    }

    out.pop();
    out
}

/// Formats a ratio as a percentage with two decimals.
///
/// ```
/// use slirc_text::format::to_percent;
///
/// assert_eq!(to_percent(42.0), "42.00%");
/// assert_eq!(to_percent(12.5), "12.50%");
/// ```
pub fn to_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Shortens `text` to at most `max` bytes, ending in `...` when truncated.
///
/// Widths below four are filled with dots. Truncation never splits a
/// multi-byte character; the result may come up short instead.
///
/// ```
/// use slirc_text::format::ellipsize;
///
/// assert_eq!(ellipsize("short", 10), "short");
/// assert_eq!(ellipsize("a longer text", 9), "a long...");
/// assert_eq!(ellipsize("anything", 2), "..");
/// ```
pub fn ellipsize(text: &str, max: usize) -> String {
    if max >= text.len() {
        return text.to_string();
    }
    if max < 4 {
        return ".".repeat(max);
    }

    let mut end = max - 3;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &text[..end])
}

/// Interprets a settings value as a boolean.
///
/// Whitespace, runs of `0`, and `"false"` (any case) are false; everything
/// else is true.
///
/// ```
/// use slirc_text::format::parse_bool;
///
/// assert!(parse_bool("true"));
/// assert!(parse_bool("yes"));
/// assert!(!parse_bool(" 0 "));
/// assert!(!parse_bool("FALSE"));
/// ```
pub fn parse_bool(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.trim_matches('0').is_empty() && !trimmed.eq_ignore_ascii_case("false")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_strings() {
        assert_eq!(to_byte_str(0), "0 B");
        assert_eq!(to_byte_str(1024), "1024 B");
        assert_eq!(to_byte_str(1025), "1.00 KiB");
        assert_eq!(to_byte_str(1536), "1.50 KiB");
        assert_eq!(to_byte_str(3 * 1024 * 1024 * 1024), "3.00 GiB");
        assert_eq!(to_byte_str(2 * 1024 * 1024 * 1024 * 1024), "2.00 TiB");
    }

    #[test]
    fn time_strings() {
        assert_eq!(to_time_str(0), "0s");
        assert_eq!(to_time_str(59), "59s");
        assert_eq!(to_time_str(60), "1m");
        assert_eq!(to_time_str(3600 * 24 * 7), "1w");
        assert_eq!(to_time_str(3600 * 24 * 365 + 1), "1y 1s");
    }

    #[test]
    fn percent_strings() {
        assert_eq!(to_percent(0.0), "0.00%");
        assert_eq!(to_percent(33.333), "33.33%");
    }

    #[test]
    fn ellipsize_bounds() {
        assert_eq!(ellipsize("", 5), "");
        assert_eq!(ellipsize("abcd", 4), "abcd");
        assert_eq!(ellipsize("abcde", 4), "a...");
        assert_eq!(ellipsize("abcde", 0), "");
        assert_eq!(ellipsize("abcde", 3), "...");
    }

    #[test]
    fn ellipsize_respects_char_boundaries() {
        // the 4-byte emoji cannot be split by the cut at max - 3
        let text = "ab\u{1F44B}cdef";
        let short = ellipsize(text, 6);
        assert!(short.ends_with("..."));
        assert!(short.is_char_boundary(short.len()));
        assert_eq!(short, "ab...");
    }

    #[test]
    fn bool_parsing() {
        assert!(parse_bool("1"));
        assert!(parse_bool("10"));
        assert!(parse_bool("on"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("000"));
        assert!(!parse_bool(""));
        assert!(!parse_bool("  "));
        assert!(!parse_bool("False"));
    }
}
