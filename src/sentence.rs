// src/sentence.rs

/// Cuts `text` after its first `.`, keeping the period.
///
/// Text without a period is returned whole. Only `.` counts as a boundary,
/// so `?`, `!` and abbreviations such as "Mr." are not treated specially.
pub fn truncate_at_sentence(text: &str) -> &str {
    match text.find('.') {
        Some(idx) => &text[..=idx],
        None => text,
    }
}
