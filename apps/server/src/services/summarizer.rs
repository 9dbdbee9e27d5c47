//! Remarks truncation.

/// Default character budget for key remarks.
pub const DEFAULT_MAX_REMARK_CHARS: usize = 400;

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max_chars` characters plus an ellipsis.
///
/// Text within budget is returned unchanged. Otherwise the `max_chars` prefix
/// is cut back to just after its last period, keeping the period. A prefix
/// with no period is kept whole. Lengths are counted in `char`s.
///
/// Any `.` counts as a sentence end, including a decimal point such as the one
/// in "9.8 ppg", so the cut can land inside a number.
pub fn summarize_remarks(text: &str, max_chars: usize) -> String {
    let prefix_end = match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => byte_idx,
        None => return text.to_string(),
    };

    let prefix = &text[..prefix_end];
    let kept = match prefix.rfind('.') {
        Some(period) => &prefix[..=period],
        None => prefix,
    };

    format!("{}{}", kept, ELLIPSIS)
}
