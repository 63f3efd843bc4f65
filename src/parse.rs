//! Parsing of user-supplied page and time expressions.
//!
//! Every parser validates each token and reports malformed input as
//! [`MfmError::InvalidInput`]; nothing here panics on user input.
//!
//! | Input                  | Parser                     | Result            |
//! |------------------------|----------------------------|-------------------|
//! | `"3"`, `"50"`          | [`parse_page_bounds`]      | `(3, 10)` clamped |
//! | `"5"`, `"1,3"`, `"2-4"`| [`parse_page_selector`]    | zero-based indices|
//! | `"01:00"`, `"02:30"`   | [`parse_duration_seconds`] | `"90"`            |

use crate::error::MfmError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of document pages, 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// A single page (1-indexed).
    Single(usize),
    /// A contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Specific pages (1-indexed, may contain duplicates).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Parse the selector mini-syntax: `"N"`, `"A,B,C"` or `"A-B"`.
    ///
    /// Shapes are tried in order: one character, comma list, hyphen range,
    /// then a multi-digit single page. Page `0`, empty tokens, non-digits
    /// and `A > B` ranges are rejected.
    pub fn parse(spec: &str) -> Result<Self, MfmError> {
        let s = spec.trim();
        if s.is_empty() {
            return Err(MfmError::invalid(spec, "page selection is empty"));
        }

        if s.chars().count() == 1 {
            return Ok(PageSelection::Single(page_number(spec, s)?));
        }

        if s.contains(',') {
            let pages = s
                .split(',')
                .map(|tok| page_number(spec, tok.trim()))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(PageSelection::Set(pages));
        }

        if let Some((start, end)) = s.split_once('-') {
            let start = page_number(spec, start.trim())?;
            let end = page_number(spec, end.trim())?;
            if start > end {
                return Err(MfmError::invalid(
                    spec,
                    format!("range start {start} is after end {end}"),
                ));
            }
            return Ok(PageSelection::Range(start, end));
        }

        Ok(PageSelection::Single(page_number(spec, s)?))
    }

    /// Expand into sorted, deduplicated 0-indexed page numbers.
    ///
    /// A `Range` is expanded in full; bound it first with
    /// [`PageSelection::to_indices_within`] when the page count is known.
    pub fn to_indices(&self) -> Vec<usize> {
        let set: BTreeSet<usize> = match self {
            PageSelection::Single(p) => p.checked_sub(1).into_iter().collect(),
            PageSelection::Range(start, end) => ((*start).max(1) - 1..*end).collect(),
            PageSelection::Set(pages) => pages.iter().filter_map(|p| p.checked_sub(1)).collect(),
        };
        set.into_iter().collect()
    }

    /// Like [`PageSelection::to_indices`], keeping only pages that exist in
    /// a document of `page_count` pages.
    pub fn to_indices_within(&self, page_count: usize) -> Vec<usize> {
        let bounded = match self {
            PageSelection::Range(start, end) => {
                PageSelection::Range(*start, (*end).min(page_count))
            }
            other => other.clone(),
        };
        bounded
            .to_indices()
            .into_iter()
            .filter(|&i| i < page_count)
            .collect()
    }

    /// Number of pages a `Range` spans; `1` or the set length otherwise.
    fn span(&self) -> usize {
        match self {
            PageSelection::Single(_) => 1,
            PageSelection::Range(start, end) => end.saturating_sub(*start).saturating_add(1),
            PageSelection::Set(pages) => pages.len(),
        }
    }
}

/// Widest range [`parse_page_selector`] expands without a page count.
pub const MAX_SELECTOR_PAGES: usize = 100_000;

/// Parse a selector into the zero-based page indices it denotes.
///
/// `"5"` → `[4]`, `"1,3,3,5"` → `[0, 2, 4]`, `"2-4"` → `[1, 2, 3]`.
///
/// Ranges spanning more than [`MAX_SELECTOR_PAGES`] pages are rejected; use
/// [`parse_page_selector_for`] when the document is known.
pub fn parse_page_selector(spec: &str) -> Result<Vec<usize>, MfmError> {
    let selection = PageSelection::parse(spec)?;
    if selection.span() > MAX_SELECTOR_PAGES {
        return Err(MfmError::invalid(
            spec,
            format!("range covers more than {MAX_SELECTOR_PAGES} pages"),
        ));
    }
    Ok(selection.to_indices())
}

/// [`parse_page_selector`] for a document of `doc_page_count` pages.
///
/// Pages past the end are dropped, so `"3-999999"` on a 5-page document is
/// `[2, 3, 4]`.
pub fn parse_page_selector_for(
    doc_page_count: usize,
    spec: &str,
) -> Result<Vec<usize>, MfmError> {
    Ok(PageSelection::parse(spec)?.to_indices_within(doc_page_count))
}

/// Parse a `(start, end)` page pair for a document of `doc_page_count` pages.
///
/// Each bound is clamped to the page count, however many digits it has; the
/// pair is then ordered so the result is always ascending. Both are 1-based.
pub fn parse_page_bounds(
    doc_page_count: usize,
    start: &str,
    end: &str,
) -> Result<(usize, usize), MfmError> {
    if doc_page_count == 0 {
        return Err(MfmError::invalid(
            format!("{start}-{end}"),
            "document has no pages",
        ));
    }
    let start = page_number(start, start)?.min(doc_page_count);
    let end = page_number(end, end)?.min(doc_page_count);
    Ok(if start > end { (end, start) } else { (start, end) })
}

/// Elapsed seconds between two timestamps, as text.
///
/// Both sides must use the same shape: `SS`, `MM:SS` or `HH:MM:SS`.
/// Components are weighted from the right (seconds, minutes, hours) and the
/// per-position differences summed, so components need not be normalised
/// (`"0:90"` is 90 seconds). An end before the start is rejected.
pub fn parse_duration_seconds(start: &str, end: &str) -> Result<String, MfmError> {
    let s = time_components(start)?;
    let e = time_components(end)?;
    if s.len() != e.len() {
        return Err(MfmError::invalid(
            format!("{start} / {end}"),
            "start and end time must use the same format",
        ));
    }

    let diff: i64 = s
        .iter()
        .rev()
        .zip(e.iter().rev())
        .zip(WEIGHTS)
        .map(|((s, e), w)| (*e as i64 - *s as i64) * w)
        .sum();

    if diff < 0 {
        return Err(MfmError::invalid(
            format!("{start} / {end}"),
            "end time is before start time",
        ));
    }
    Ok(diff.to_string())
}

/// Total seconds of one `SS`, `MM:SS` or `HH:MM:SS` timestamp.
pub fn parse_timestamp_seconds(ts: &str) -> Result<u64, MfmError> {
    let parts = time_components(ts)?;
    Ok(parts
        .iter()
        .rev()
        .zip(WEIGHTS)
        .map(|(v, w)| u64::from(*v) * w as u64)
        .sum())
}

const WEIGHTS: [i64; 3] = [1, 60, 3600];

fn time_components(ts: &str) -> Result<Vec<u32>, MfmError> {
    let parts: Vec<&str> = ts.split(':').collect();
    if parts.len() > WEIGHTS.len() {
        return Err(MfmError::invalid(ts, "expected SS, MM:SS or HH:MM:SS"));
    }
    parts
        .iter()
        .map(|p| {
            digits(p)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| MfmError::invalid(ts, "time is not specified correctly"))
        })
        .collect()
}

/// A 1-based page number from a token of decimal digits.
///
/// Numbers too large for `usize` saturate to `usize::MAX`; callers clamp.
fn page_number(input: &str, token: &str) -> Result<usize, MfmError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MfmError::invalid(input, format!("'{token}' is not a page number")));
    }
    let n = token.parse::<usize>().unwrap_or(usize::MAX);
    if n == 0 {
        return Err(MfmError::invalid(input, "pages are 1-indexed, minimum is 1"));
    }
    Ok(n)
}

/// Parse a non-empty all-ASCII-digit string. Signs and whitespace are rejected.
fn digits(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_invalid<T: std::fmt::Debug>(r: Result<T, MfmError>) -> bool {
        matches!(r, Err(MfmError::InvalidInput { .. }))
    }

    // ── page bounds ──────────────────────────────────────────────────────

    #[test]
    fn bounds_in_order() {
        assert_eq!(parse_page_bounds(10, "3", "7").unwrap(), (3, 7));
    }

    #[test]
    fn bounds_swapped() {
        assert_eq!(parse_page_bounds(10, "7", "3").unwrap(), (3, 7));
    }

    #[test]
    fn bounds_clamped() {
        assert_eq!(parse_page_bounds(10, "3", "50").unwrap(), (3, 10));
        assert_eq!(parse_page_bounds(10, "80", "50").unwrap(), (10, 10));
    }

    #[test]
    fn bounds_clamp_then_swap() {
        // 50 clamps to 10, then (10, 4) is reordered.
        assert_eq!(parse_page_bounds(10, "50", "4").unwrap(), (4, 10));
    }

    #[test]
    fn bounds_reject_non_digits() {
        assert!(is_invalid(parse_page_bounds(10, "3a", "7")));
        assert!(is_invalid(parse_page_bounds(10, "-3", "7")));
        assert!(is_invalid(parse_page_bounds(10, " 3", "7")));
        assert!(is_invalid(parse_page_bounds(10, "3", "")));
    }

    #[test]
    fn bounds_clamp_numbers_wider_than_usize() {
        let huge = "9999999999999999999999999";
        assert_eq!(parse_page_bounds(10, "3", huge).unwrap(), (3, 10));
        assert_eq!(parse_page_bounds(10, huge, "3").unwrap(), (3, 10));
        assert!(is_invalid(parse_page_bounds(10, "0000000000000000000000000", "3")));
    }

    #[test]
    fn bounds_reject_zero_and_empty_document() {
        assert!(is_invalid(parse_page_bounds(10, "0", "3")));
        assert!(is_invalid(parse_page_bounds(0, "1", "1")));
    }

    // ── page selector ────────────────────────────────────────────────────

    #[test]
    fn selector_single() {
        assert_eq!(parse_page_selector("5").unwrap(), vec![4]);
        assert_eq!(parse_page_selector(" 5 ").unwrap(), vec![4]);
    }

    #[test]
    fn selector_set_is_deduplicated() {
        assert_eq!(parse_page_selector("1,3,3,5").unwrap(), vec![0, 2, 4]);
        assert_eq!(parse_page_selector("5, 1").unwrap(), vec![0, 4]);
    }

    #[test]
    fn selector_range_is_inclusive() {
        assert_eq!(parse_page_selector("2-4").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_page_selector("7-7").unwrap(), vec![6]);
    }

    #[test]
    fn selector_multi_digit_single_page() {
        assert_eq!(parse_page_selector("12").unwrap(), vec![11]);
    }

    #[test]
    fn selector_shape_priority() {
        // Comma shape wins, and "2-3" is not a page number.
        assert!(is_invalid(PageSelection::parse("1,2-3")));
        assert_eq!(PageSelection::parse("9").unwrap(), PageSelection::Single(9));
        assert_eq!(
            PageSelection::parse("2-4").unwrap(),
            PageSelection::Range(2, 4)
        );
    }

    #[test]
    fn selector_rejects_unbounded_ranges() {
        assert!(is_invalid(parse_page_selector("1-18446744073709551615")));
        assert!(is_invalid(parse_page_selector("1-99999999999999999999999")));
        assert_eq!(parse_page_selector("1-100000").unwrap().len(), MAX_SELECTOR_PAGES);
    }

    #[test]
    fn selector_for_document_drops_missing_pages() {
        assert_eq!(
            parse_page_selector_for(5, "3-18446744073709551615").unwrap(),
            vec![2, 3, 4]
        );
        assert_eq!(parse_page_selector_for(5, "1,4,9").unwrap(), vec![0, 3]);
        assert!(parse_page_selector_for(5, "7").unwrap().is_empty());
        assert!(is_invalid(parse_page_selector_for(5, "4-2")));
    }

    #[test]
    fn selector_rejects_malformed() {
        for bad in ["", "0", "x", "1,,3", "1,a", "-4", "3-", "4-2", "0-2", "1.5"] {
            assert!(is_invalid(parse_page_selector(bad)), "{bad:?} should fail");
        }
    }

    // ── durations ────────────────────────────────────────────────────────

    #[test]
    fn duration_hms() {
        assert_eq!(parse_duration_seconds("00:01:00", "00:02:30").unwrap(), "90");
        assert_eq!(parse_duration_seconds("01:00:00", "02:00:01").unwrap(), "3601");
    }

    #[test]
    fn duration_ms_and_s() {
        assert_eq!(parse_duration_seconds("1:15", "2:00").unwrap(), "45");
        assert_eq!(parse_duration_seconds("10", "25").unwrap(), "15");
    }

    #[test]
    fn duration_per_position_borrowing() {
        // 1:50 → 2:10 is 20 s: (2-1)*60 + (10-50).
        assert_eq!(parse_duration_seconds("1:50", "2:10").unwrap(), "20");
    }

    #[test]
    fn duration_mismatched_granularity() {
        assert!(is_invalid(parse_duration_seconds("10", "1:00")));
        assert!(is_invalid(parse_duration_seconds("90", "01:30")));
    }

    #[test]
    fn duration_rejects_bad_components() {
        assert!(is_invalid(parse_duration_seconds("1:x", "2:00")));
        assert!(is_invalid(parse_duration_seconds("1:", "2:00")));
        assert!(is_invalid(parse_duration_seconds("1:00:00:00", "2:00:00:00")));
    }

    #[test]
    fn duration_negative_is_rejected() {
        assert!(is_invalid(parse_duration_seconds("00:02:00", "00:01:00")));
        assert_eq!(parse_duration_seconds("5", "5").unwrap(), "0");
    }

    #[test]
    fn timestamp_seconds() {
        assert_eq!(parse_timestamp_seconds("01:02:03").unwrap(), 3723);
        assert_eq!(parse_timestamp_seconds("45").unwrap(), 45);
        assert!(parse_timestamp_seconds("a:b").is_err());
    }
}
