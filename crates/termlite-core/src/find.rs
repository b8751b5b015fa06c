//! Regex search over a terminal text buffer
//!
//! Lines are given oldest first with scrollback included. Positions are cell
//! columns, so wide characters count twice.

use regex::Regex;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// A cell position in the buffer, ordered row-major
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextPoint {
    pub row: usize,
    pub col: usize,
}

impl TextPoint {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A single-line match, `end` exclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSpan {
    pub row: usize,
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn start_point(&self) -> TextPoint {
        TextPoint::new(self.row, self.start)
    }

    pub fn end_point(&self) -> TextPoint {
        TextPoint::new(self.row, self.end)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row == self.row && col >= self.start && col < self.end
    }
}

/// Cell column of byte offset `byte` within `line`
pub fn column_of(line: &str, byte: usize) -> usize {
    line.get(..byte).map_or(0, UnicodeWidthStr::width)
}

/// Byte offset of the character occupying cell column `col`, or `line.len()`
pub fn byte_at_column(line: &str, col: usize) -> usize {
    let mut width = 0;
    for (idx, ch) in line.char_indices() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if col < width + w.max(1) {
            return idx;
        }
        width += w;
    }
    line.len()
}

/// Non-empty matches of `regex` in one line, as spans on `row`
pub fn line_matches<'a>(
    row: usize,
    line: &'a str,
    regex: &'a Regex,
) -> impl Iterator<Item = MatchSpan> + 'a {
    regex
        .find_iter(line)
        .filter(|m| !m.as_str().is_empty())
        .map(move |m| MatchSpan {
            row,
            start: column_of(line, m.start()),
            end: column_of(line, m.end()),
        })
}

fn all_matches<'a>(lines: &'a [String], regex: &'a Regex) -> impl Iterator<Item = MatchSpan> + 'a {
    lines
        .iter()
        .enumerate()
        .flat_map(move |(row, line)| line_matches(row, line, regex))
}

/// Find the next match from `from` in `direction`, wrapping around the buffer
///
/// Forward returns the first match starting at or after `from`; backward the
/// last match starting strictly before it.
pub fn find(
    lines: &[String],
    regex: &Regex,
    from: TextPoint,
    direction: SearchDirection,
) -> Option<MatchSpan> {
    match direction {
        SearchDirection::Forward => all_matches(lines, regex)
            .find(|m| m.start_point() >= from)
            .or_else(|| all_matches(lines, regex).next()),
        SearchDirection::Backward => all_matches(lines, regex)
            .take_while(|m| m.start_point() < from)
            .last()
            .or_else(|| all_matches(lines, regex).last()),
    }
}

/// Where a search in `direction` starts, given the selected `(start, end)`
/// range with `end` exclusive
pub fn search_anchor(
    selection: Option<(TextPoint, TextPoint)>,
    viewport_top: usize,
    line_count: usize,
    direction: SearchDirection,
) -> TextPoint {
    match (selection, direction) {
        (Some((_, end)), SearchDirection::Forward) => end,
        (Some((start, _)), SearchDirection::Backward) => start,
        (None, SearchDirection::Forward) => TextPoint::new(viewport_top, 0),
        (None, SearchDirection::Backward) => TextPoint::new(line_count, 0),
    }
}

/// Text covered by `span` in `lines`
pub fn span_text(lines: &[String], span: MatchSpan) -> Option<String> {
    let line = lines.get(span.row)?;
    let start = byte_at_column(line, span.start);
    let end = byte_at_column(line, span.end);
    line.get(start..end).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn forward_finds_first_match_after_anchor() {
        let lines = buffer(&["xxfooyy", "foo", "bar foo"]);
        let re = Regex::new("foo").unwrap();
        let m = find(&lines, &re, TextPoint::new(0, 3), SearchDirection::Forward).unwrap();
        assert_eq!(m, MatchSpan { row: 1, start: 0, end: 3 });
    }

    #[test]
    fn forward_wraps_to_top() {
        let lines = buffer(&["foo", "nothing", "here"]);
        let re = Regex::new("foo").unwrap();
        let m = find(&lines, &re, TextPoint::new(1, 0), SearchDirection::Forward).unwrap();
        assert_eq!(m.row, 0);
    }

    #[test]
    fn backward_finds_last_match_before_anchor() {
        let lines = buffer(&["foo foo", "x", "foo"]);
        let re = Regex::new("foo").unwrap();
        let m = find(&lines, &re, TextPoint::new(2, 0), SearchDirection::Backward).unwrap();
        assert_eq!(m, MatchSpan { row: 0, start: 4, end: 7 });
    }

    #[test]
    fn backward_wraps_to_bottom() {
        let lines = buffer(&["abc", "foo"]);
        let re = Regex::new("foo").unwrap();
        let m = find(&lines, &re, TextPoint::new(0, 0), SearchDirection::Backward).unwrap();
        assert_eq!(m.row, 1);
    }

    #[test]
    fn repeated_forward_search_advances() {
        let lines = buffer(&["foo foo foo"]);
        let re = Regex::new("foo").unwrap();
        let first = find(&lines, &re, TextPoint::default(), SearchDirection::Forward).unwrap();
        let second = find(&lines, &re, first.end_point(), SearchDirection::Forward).unwrap();
        let third = find(&lines, &re, second.end_point(), SearchDirection::Forward).unwrap();
        let wrapped = find(&lines, &re, third.end_point(), SearchDirection::Forward).unwrap();
        assert_eq!([first.start, second.start, third.start, wrapped.start], [0, 4, 8, 0]);
    }

    #[test]
    fn empty_matches_are_skipped() {
        let lines = buffer(&["abc"]);
        let re = Regex::new("x*").unwrap();
        assert!(find(&lines, &re, TextPoint::default(), SearchDirection::Forward).is_none());
    }

    #[test]
    fn no_match_in_empty_buffer() {
        let re = Regex::new("foo").unwrap();
        assert!(find(&[], &re, TextPoint::default(), SearchDirection::Backward).is_none());
    }

    #[test]
    fn columns_account_for_wide_characters() {
        let lines = buffer(&["日本 foo"]);
        let re = Regex::new("foo").unwrap();
        let m = find(&lines, &re, TextPoint::default(), SearchDirection::Forward).unwrap();
        assert_eq!((m.start, m.end), (5, 8));
        assert_eq!(span_text(&lines, m).as_deref(), Some("foo"));
    }

    #[test]
    fn anchor_follows_selection() {
        let span = MatchSpan { row: 3, start: 2, end: 5 };
        let span = (span.start_point(), span.end_point());
        assert_eq!(search_anchor(Some(span), 0, 10, SearchDirection::Forward), TextPoint::new(3, 5));
        assert_eq!(search_anchor(Some(span), 0, 10, SearchDirection::Backward), TextPoint::new(3, 2));
        assert_eq!(search_anchor(None, 4, 10, SearchDirection::Forward), TextPoint::new(4, 0));
        assert_eq!(search_anchor(None, 4, 10, SearchDirection::Backward), TextPoint::new(10, 0));
    }

    #[test]
    fn byte_at_column_clamps_to_end() {
        assert_eq!(byte_at_column("abc", 1), 1);
        assert_eq!(byte_at_column("abc", 9), 3);
        assert_eq!(byte_at_column("日本", 1), 0);
        assert_eq!(byte_at_column("日本", 2), 3);
    }
}
