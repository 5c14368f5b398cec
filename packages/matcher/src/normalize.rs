//! Name normalization with offset back-mapping.
//!
//! Normalization is applied symmetrically to record fields and target
//! names: lowercase, treat `.` as a word separator (transliterated name
//! abbreviations such as "MD." and "A.K."), collapse separator runs to a
//! single space, trim. Highlight placement needs the reverse direction
//! too, so the normalizer also reports, for every character of the
//! normalized string, which character of the original produced it.

/// Normalizes a name for matching.
#[must_use]
pub fn normalize(input: &str) -> String {
    normalize_with_offsets(input).0
}

/// Normalizes a name and returns, for each char of the normalized string,
/// the char index in `input` it was derived from.
///
/// A collapsed separator run maps to the index of its first character.
/// Lowercasing can expand one char into several (rare outside ASCII); all
/// expansion chars map back to the single original char.
#[must_use]
pub fn normalize_with_offsets(input: &str) -> (String, Vec<usize>) {
    let mut normalized = String::with_capacity(input.len());
    let mut offsets = Vec::with_capacity(input.len());
    let mut separator_start: Option<usize> = None;

    for (index, ch) in input.chars().enumerate() {
        if ch == '.' || ch.is_whitespace() {
            separator_start.get_or_insert(index);
            continue;
        }
        if let Some(sep) = separator_start.take() {
            // Leading separators are dropped rather than collapsed.
            if !normalized.is_empty() {
                normalized.push(' ');
                offsets.push(sep);
            }
        }
        for lower in ch.to_lowercase() {
            normalized.push(lower);
            offsets.push(index);
        }
    }

    (normalized, offsets)
}

/// Maps a char offset in the normalized form of `input` back to a char
/// offset in `input` itself.
///
/// Offsets at or past the end of the normalized string map to the end of
/// the original.
#[must_use]
pub fn original_offset(input: &str, normalized_offset: usize) -> usize {
    let (_, offsets) = normalize_with_offsets(input);
    offsets
        .get(normalized_offset)
        .copied()
        .unwrap_or_else(|| input.chars().count())
}
