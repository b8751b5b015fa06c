//! Selection state machine and logic
//!
//! Positions are `(row, col)` with rows counted from the oldest scrollback
//! line. Completed selections are inclusive at both ends.

use std::time::Instant;

use crate::constants::CLICK_TIMEOUT_MS;
use crate::find::{byte_at_column, MatchSpan, TextPoint};

/// Selection State Machine
#[derive(Debug, Clone, Copy, PartialEq)]
enum SelectionState {
    /// No selection active
    Idle,
    /// Mouse button pressed, waiting to see if it's a click or drag
    Pressed { start: (usize, usize), timestamp: Instant },
    /// Actively dragging to extend selection
    Dragging { start: (usize, usize), current: (usize, usize) },
    /// Selection is complete and visible
    Complete { start: (usize, usize), end: (usize, usize) },
}

#[derive(Debug, Clone)]
pub struct Selection {
    state: SelectionState,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, SelectionState::Idle)
    }

    pub fn get_bounds(&self) -> Option<((usize, usize), (usize, usize))> {
        match self.state {
            SelectionState::Pressed { start, .. } => Some((start, start)),
            SelectionState::Dragging { start, current } => Some((start, current)),
            SelectionState::Complete { start, end } => Some((start, end)),
            SelectionState::Idle => None,
        }
    }

    pub fn get_normalized_bounds(&self) -> Option<((usize, usize), (usize, usize))> {
        let (start, end) = self.get_bounds()?;
        Some(if start <= end { (start, end) } else { (end, start) })
    }

    pub fn is_position_selected(&self, row: usize, col: usize) -> bool {
        let Some(((min_row, min_col), (max_row, max_col))) = self.get_normalized_bounds() else {
            return false;
        };

        if row < min_row || row > max_row {
            return false;
        }

        if row == min_row && row == max_row {
            col >= min_col && col <= max_col
        } else if row == min_row {
            col >= min_col
        } else if row == max_row {
            col <= max_col
        } else {
            true
        }
    }

    // State machine transitions
    pub fn clear(&mut self) {
        self.state = SelectionState::Idle;
    }

    pub fn start(&mut self, row: usize, col: usize, timestamp: Instant) {
        self.state = SelectionState::Pressed {
            start: (row, col),
            timestamp,
        };
    }

    pub fn update(&mut self, row: usize, col: usize) {
        self.state = match self.state {
            SelectionState::Pressed { start, .. } | SelectionState::Dragging { start, .. } => {
                SelectionState::Dragging { start, current: (row, col) }
            }
            other => other,
        };
    }

    /// Finish a press or drag; returns whether a selection now exists
    pub fn complete(&mut self, row: usize, col: usize, timestamp: Instant) -> bool {
        match self.state {
            SelectionState::Pressed { start, timestamp: press_time } => {
                // A quick click selects nothing
                if timestamp.duration_since(press_time).as_millis() < CLICK_TIMEOUT_MS {
                    self.state = SelectionState::Idle;
                    false
                } else {
                    self.state = SelectionState::Complete { start, end: start };
                    true
                }
            }
            SelectionState::Dragging { start, .. } => {
                self.state = SelectionState::Complete { start, end: (row, col) };
                true
            }
            _ => false,
        }
    }

    /// Select a search match
    pub fn select_span(&mut self, span: MatchSpan) {
        self.select_range(span.start_point(), span.end_point());
    }

    /// Select from `start` up to the exclusive `end`, which may sit on a later row
    pub fn select_range(&mut self, start: TextPoint, end: TextPoint) {
        if end <= start || end.col == 0 {
            self.clear();
            return;
        }
        self.state = SelectionState::Complete {
            start: (start.row, start.col),
            end: (end.row, end.col - 1),
        };
    }

    /// Completed selection as `(start, end)` with `end` exclusive
    pub fn range(&self) -> Option<(TextPoint, TextPoint)> {
        if !self.has_selection() {
            return None;
        }
        let ((r0, c0), (r1, c1)) = self.get_normalized_bounds()?;
        Some((TextPoint::new(r0, c0), TextPoint::new(r1, c1 + 1)))
    }

    /// Text covered by the completed selection, rows joined with `\n`
    pub fn text_in(&self, lines: &[String]) -> Option<String> {
        let (start, end) = self.range()?;
        let mut out = String::new();

        for row in start.row..=end.row {
            let line = lines.get(row).map(String::as_str).unwrap_or("");
            let from = if row == start.row { byte_at_column(line, start.col) } else { 0 };
            let to = if row == end.row { byte_at_column(line, end.col) } else { line.len() };
            if row > start.row {
                out.push('\n');
            }
            if from < to {
                out.push_str(&line[from..to]);
            }
        }

        Some(out)
    }

    // Query methods
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SelectionState::Dragging { .. })
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.state, SelectionState::Pressed { .. } | SelectionState::Dragging { .. })
    }

    pub fn has_selection(&self) -> bool {
        matches!(self.state, SelectionState::Complete { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_selection_creation() {
        let selection = Selection::new();
        assert_eq!(selection.state, SelectionState::Idle);
        assert!(!selection.is_active());
        assert!(selection.get_bounds().is_none());
        assert!(selection.range().is_none());
    }

    #[test]
    fn test_quick_click_clears_selection() {
        let mut selection = Selection::new();
        let timestamp = Instant::now();

        selection.start(1, 2, timestamp);
        let completed = selection.complete(1, 2, timestamp + Duration::from_millis(50));
        assert!(!completed);
        assert_eq!(selection.state, SelectionState::Idle);
    }

    #[test]
    fn test_long_press_creates_selection() {
        let mut selection = Selection::new();
        let timestamp = Instant::now();

        selection.start(2, 3, timestamp);
        assert!(selection.complete(2, 3, timestamp + Duration::from_millis(300)));
        assert!(selection.has_selection());
    }

    #[test]
    fn test_drag_selection_is_normalized() {
        let mut selection = Selection::new();
        let timestamp = Instant::now();

        selection.start(5, 7, timestamp);
        selection.update(2, 3);
        assert!(selection.is_dragging());
        selection.complete(2, 3, timestamp + Duration::from_millis(1000));

        assert_eq!(selection.get_normalized_bounds(), Some(((2, 3), (5, 7))));
        assert!(selection.is_position_selected(3, 0));
        assert!(!selection.is_position_selected(2, 2));
        assert!(!selection.is_position_selected(5, 8));
    }

    #[test]
    fn select_span_covers_exactly_the_match() {
        let mut selection = Selection::new();
        selection.select_span(MatchSpan { row: 0, start: 2, end: 5 });

        let buffer = lines(&["xxfooyy"]);
        assert_eq!(selection.text_in(&buffer).as_deref(), Some("foo"));
        assert!(!selection.is_position_selected(0, 5));
        assert_eq!(
            selection.range(),
            Some((TextPoint::new(0, 2), TextPoint::new(0, 5)))
        );
    }

    #[test]
    fn multi_row_text_joins_lines() {
        let mut selection = Selection::new();
        let timestamp = Instant::now();
        selection.start(0, 3, timestamp);
        selection.update(2, 1);
        selection.complete(2, 1, timestamp);

        let buffer = lines(&["abcdef", "middle", "xyz"]);
        assert_eq!(selection.text_in(&buffer).as_deref(), Some("def\nmiddle\nxy"));
    }

    #[test]
    fn select_range_spans_rows() {
        let mut selection = Selection::new();
        selection.select_range(TextPoint::new(0, 7), TextPoint::new(1, 3));

        assert!(selection.is_position_selected(0, 9));
        assert!(selection.is_position_selected(1, 2));
        assert!(!selection.is_position_selected(1, 3));
        assert_eq!(
            selection.range(),
            Some((TextPoint::new(0, 7), TextPoint::new(1, 3)))
        );
    }

    #[test]
    fn empty_span_clears() {
        let mut selection = Selection::new();
        selection.select_span(MatchSpan { row: 0, start: 1, end: 5 });
        selection.select_span(MatchSpan { row: 0, start: 3, end: 3 });
        assert!(!selection.is_active());
    }
}
