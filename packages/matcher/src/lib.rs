#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fuzzy name matching and highlight placement for death records.
//!
//! Given one record and a target name, decides whether the target matches
//! one of the record's name fields and which substring(s) of the original
//! field text to highlight. Two passes run per field:
//!
//! 1. **Exact substring**: the normalized field contains the normalized
//!    target contiguously. Scores [`EXACT_MATCH_SCORE`] and highlights one
//!    span starting at the match, extended by [`HIGHLIGHT_SLACK`] trailing
//!    characters to pick up honorific fragments.
//! 2. **Word overlap**: fallback when no contiguous match exists. A field
//!    word counts as matched when it contains, or is contained in, any
//!    target word. Carries no numeric score (absent, not zero; the two
//!    passes' confidences are not comparable) and highlights each matched
//!    word individually.
//!
//! The whole module is pure string work: deterministic, no I/O, no error
//! conditions.

pub mod normalize;

use registry_watch_record_models::DeathRecord;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Score reported for an exact-substring match.
pub const EXACT_MATCH_SCORE: u32 = 100;

/// Trailing characters appended to an exact-substring highlight so that
/// suffixes directly following the match (e.g., honorific fragments) stay
/// visible. Clamped to the field length.
pub const HIGHLIGHT_SLACK: usize = 5;

/// Which record field a target name matched.
///
/// Ordering here is the matching priority: the first field that matches
/// wins for a given target name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum MatchedField {
    /// The deceased's own name.
    Name,
    /// Father's name.
    FathersName,
    /// Mother's name.
    MothersName,
}

/// A substring range within a field's original (un-normalized) text to be
/// visually emphasized as the matched portion.
///
/// Offsets count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSpan {
    /// Char index of the first highlighted character.
    pub start: usize,
    /// Number of highlighted characters.
    pub len: usize,
}

impl HighlightSpan {
    /// Returns the highlighted slice of `field`.
    #[must_use]
    pub fn text(self, field: &str) -> &str {
        let start = byte_at(field, self.start);
        let end = byte_at(field, self.start + self.len);
        &field[start..end]
    }
}

fn byte_at(s: &str, char_offset: usize) -> usize {
    s.char_indices().nth(char_offset).map_or(s.len(), |(b, _)| b)
}

/// One target name's match against one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameMatch {
    /// The target name that matched, as configured (un-normalized).
    pub target: String,
    /// The record field it matched in.
    pub field: MatchedField,
    /// `Some(100)` for an exact-substring match; `None` for a word-overlap
    /// match. Never `Some(0)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// Spans to highlight in the matched field's original text. One span
    /// for exact-substring matches, one per matched word otherwise.
    pub highlights: Vec<HighlightSpan>,
}

/// Matches a single target name against a record.
///
/// Fields are tried in priority order (name, father's name, mother's
/// name); the first field with any match wins. Returns `None` for an
/// empty or separator-only target, and when no field matches.
#[must_use]
pub fn match_target(record: &DeathRecord, target: &str) -> Option<NameMatch> {
    let target_norm = normalize::normalize(target);
    if target_norm.is_empty() {
        return None;
    }

    let fields = [
        (MatchedField::Name, record.name.as_str()),
        (MatchedField::FathersName, record.fathers_name.as_str()),
        (MatchedField::MothersName, record.mothers_name.as_str()),
    ];

    for (field, value) in fields {
        if let Some((score, highlights)) = match_field(value, &target_norm) {
            return Some(NameMatch {
                target: target.to_string(),
                field,
                score,
                highlights,
            });
        }
    }

    None
}

/// Matches every target name against a record independently.
///
/// A record may match several targets; each produces its own annotation.
#[must_use]
pub fn match_targets(record: &DeathRecord, targets: &[String]) -> Vec<NameMatch> {
    targets
        .iter()
        .filter_map(|target| match_target(record, target))
        .collect()
}

/// Runs both passes for one field value against an already-normalized
/// target. Exact substring takes precedence when both would apply.
fn match_field(value: &str, target_norm: &str) -> Option<(Option<u32>, Vec<HighlightSpan>)> {
    if value.is_empty() {
        return None;
    }
    let (field_norm, offsets) = normalize::normalize_with_offsets(value);
    if field_norm.is_empty() {
        return None;
    }

    if let Some(byte_idx) = field_norm.find(target_norm) {
        let norm_start = field_norm[..byte_idx].chars().count();
        let start = offsets[norm_start];
        let field_chars = value.chars().count();
        let len = (target_norm.chars().count() + HIGHLIGHT_SLACK).min(field_chars - start);
        return Some((
            Some(EXACT_MATCH_SCORE),
            vec![HighlightSpan { start, len }],
        ));
    }

    let target_words: Vec<&str> = target_norm.split(' ').collect();
    let mut spans = Vec::new();
    let mut norm_pos = 0usize;
    for word in field_norm.split(' ') {
        let word_chars = word.chars().count();
        let overlaps = target_words
            .iter()
            .any(|t| t.contains(word) || word.contains(t));
        if overlaps {
            spans.push(HighlightSpan {
                start: offsets[norm_pos],
                len: word_chars,
            });
        }
        norm_pos += word_chars + 1;
    }

    if spans.is_empty() {
        None
    } else {
        Some((None, spans))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, fathers: &str, mothers: &str) -> DeathRecord {
        DeathRecord {
            name: name.to_string(),
            gender: "Male".to_string(),
            date_of_death: "05/03/2024".to_string(),
            fathers_name: fathers.to_string(),
            mothers_name: mothers.to_string(),
        }
    }

    #[test]
    fn exact_substring_scores_100_through_a_dot() {
        let rec = record("JOHN.SMITH", "", "");
        let m = match_target(&rec, "John Smith").unwrap();
        assert_eq!(m.field, MatchedField::Name);
        assert_eq!(m.score, Some(EXACT_MATCH_SCORE));
        assert_eq!(m.highlights.len(), 1);
        // Slack would extend past the field; clamped to the full text.
        assert_eq!(m.highlights[0], HighlightSpan { start: 0, len: 10 });
        assert_eq!(m.highlights[0].text("JOHN.SMITH"), "JOHN.SMITH");
    }

    #[test]
    fn exact_highlight_carries_trailing_slack() {
        let rec = record("JOHN SMITHSON JUNIOR", "", "");
        let m = match_target(&rec, "john smith").unwrap();
        assert_eq!(m.score, Some(EXACT_MATCH_SCORE));
        // 10 target chars + 5 slack.
        assert_eq!(m.highlights[0], HighlightSpan { start: 0, len: 15 });
        assert_eq!(m.highlights[0].text("JOHN SMITHSON JUNIOR"), "JOHN SMITHSON J");
    }

    #[test]
    fn exact_match_start_maps_back_through_stripped_run() {
        // "MD. RAHIM UDDIN" -> "md rahim uddin"; the match at normalized
        // offset 3 starts at original char 4.
        let rec = record("MD. RAHIM UDDIN", "", "");
        let m = match_target(&rec, "Rahim").unwrap();
        assert_eq!(m.score, Some(EXACT_MATCH_SCORE));
        assert_eq!(m.highlights[0].start, 4);
        assert_eq!(m.highlights[0].len, 10);
        assert_eq!(m.highlights[0].text("MD. RAHIM UDDIN"), "RAHIM UDDI");
    }

    #[test]
    fn word_overlap_matches_without_a_score() {
        let rec = record("Mary Ann Jones", "", "");
        let m = match_target(&rec, "Maryann").unwrap();
        assert_eq!(m.field, MatchedField::Name);
        assert_eq!(m.score, None);
        // "mary" and "ann" are both substrings of "maryann"; "jones" is not.
        assert_eq!(
            m.highlights,
            vec![
                HighlightSpan { start: 0, len: 4 },
                HighlightSpan { start: 5, len: 3 },
            ]
        );
        assert_eq!(m.highlights[0].text("Mary Ann Jones"), "Mary");
        assert_eq!(m.highlights[1].text("Mary Ann Jones"), "Ann");
    }

    #[test]
    fn word_overlap_is_bidirectional() {
        // Target word contains the field word and vice versa both count.
        let rec = record("Ann Smith", "", "");
        let m = match_target(&rec, "Maryann Smythe").unwrap();
        assert_eq!(m.score, None);
        assert_eq!(m.highlights, vec![HighlightSpan { start: 0, len: 3 }]);
    }

    #[test]
    fn field_priority_prefers_name_over_parents() {
        let rec = record("Rahim Uddin", "Rahim Uddin", "");
        let m = match_target(&rec, "Rahim").unwrap();
        assert_eq!(m.field, MatchedField::Name);
    }

    #[test]
    fn falls_through_to_fathers_then_mothers_name() {
        let rec = record("Karim Mia", "Rahim Uddin", "Amina Begum");
        let m = match_target(&rec, "Rahim").unwrap();
        assert_eq!(m.field, MatchedField::FathersName);

        let m = match_target(&rec, "Amina").unwrap();
        assert_eq!(m.field, MatchedField::MothersName);
    }

    #[test]
    fn first_matching_field_wins_even_if_unscored() {
        // Word-overlap on the name beats an exact match further down the
        // priority order.
        let rec = record("Mary Ann Jones", "Maryann Khan", "");
        let m = match_target(&rec, "Maryann").unwrap();
        assert_eq!(m.field, MatchedField::Name);
        assert_eq!(m.score, None);
    }

    #[test]
    fn empty_target_never_matches() {
        let rec = record("John Smith", "", "");
        assert!(match_target(&rec, "").is_none());
        assert!(match_target(&rec, " . . ").is_none());
    }

    #[test]
    fn empty_field_never_matches() {
        let rec = record("", "", "");
        assert!(match_target(&rec, "John").is_none());
    }

    #[test]
    fn no_overlap_yields_no_match() {
        let rec = record("Karim Mia", "Abdul Jabbar", "Amina Begum");
        assert!(match_target(&rec, "Rahman").is_none());
    }

    #[test]
    fn record_can_match_multiple_targets_independently() {
        let rec = record("John Smith", "Robert Smith", "Mary Ann Smith");
        let targets = vec![
            "Smith".to_string(),
            "Robert".to_string(),
            "Nobody".to_string(),
        ];
        let matches = match_targets(&rec, &targets);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].target, "Smith");
        assert_eq!(matches[0].field, MatchedField::Name);
        assert_eq!(matches[1].target, "Robert");
        assert_eq!(matches[1].field, MatchedField::FathersName);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let rec = record("JOHN SMITH", "", "");
        let m = match_target(&rec, "john smith").unwrap();
        assert_eq!(m.score, Some(EXACT_MATCH_SCORE));
    }

    #[test]
    fn matched_field_serializes_camel_case() {
        let v = serde_json::to_value(MatchedField::FathersName).unwrap();
        assert_eq!(v, "fathersName");
        assert_eq!(MatchedField::FathersName.to_string(), "fathersName");
    }

    #[test]
    fn unscored_match_omits_the_score_field() {
        let rec = record("Mary Ann Jones", "", "");
        let m = match_target(&rec, "Maryann").unwrap();
        let v = serde_json::to_value(&m).unwrap();
        assert!(v.get("score").is_none());
    }
}
