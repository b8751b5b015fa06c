//! Headless backend for exercising the controller without GTK
//!
//! Each collaborator records what was asked of it so tests can assert on the
//! exact sequence of effects.

use std::cell::{Cell, RefCell};

use crate::error::TerminalError;
use crate::find::{self, MatchSpan, SearchDirection};
use crate::matches::{MatchId, MatchPattern, MatchRegistry};
use crate::search::SearchPattern;
use crate::selection::Selection;
use crate::traits::{DialogHandle, Padding, TerminalSurface, UrlLauncher, WindowingToolkit};

/// In-memory terminal surface over a fixed set of lines
#[derive(Debug)]
pub struct MemorySurface {
    lines: Vec<String>,
    viewport_rows: usize,
    selection: Selection,
    search: Option<SearchPattern>,
    matches: MatchRegistry,
    primary: Option<String>,
    clipboard: Option<String>,
    primary_copies: usize,
    pasted: Vec<String>,
    cell_width: f64,
    cell_height: f64,
    padding: Padding,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            viewport_rows: 24,
            selection: Selection::new(),
            search: None,
            matches: MatchRegistry::new(),
            primary: None,
            clipboard: None,
            primary_copies: 0,
            pasted: Vec::new(),
            cell_width: 8.0,
            cell_height: 16.0,
            padding: Padding::default(),
        }
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lines(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_cell_size(mut self, width: f64, height: f64) -> Self {
        self.cell_width = width;
        self.cell_height = height;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_viewport_rows(mut self, rows: usize) -> Self {
        self.viewport_rows = rows.max(1);
        self
    }

    pub fn push_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    pub fn set_clipboard(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }

    /// First buffer row shown in the viewport
    pub fn viewport_top(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport_rows)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The selection as a single-row span, if it is one
    pub fn selected_span(&self) -> Option<MatchSpan> {
        let (start, end) = self.selection.range()?;
        (start.row == end.row).then_some(MatchSpan {
            row: start.row,
            start: start.col,
            end: end.col,
        })
    }

    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub fn primary_copies(&self) -> usize {
        self.primary_copies
    }

    pub fn pastes(&self) -> usize {
        self.pasted.len()
    }

    pub fn pasted(&self) -> &[String] {
        &self.pasted
    }

    fn find(&mut self, direction: SearchDirection) -> bool {
        let Some(pattern) = &self.search else {
            return false;
        };
        let anchor = find::search_anchor(
            self.selection.range(),
            self.viewport_top(),
            self.lines.len(),
            direction,
        );
        match find::find(&self.lines, pattern.regex(), anchor, direction) {
            Some(span) => {
                self.selection.select_span(span);
                true
            }
            None => false,
        }
    }
}

impl TerminalSurface for MemorySurface {
    fn set_search_pattern(&mut self, pattern: Option<SearchPattern>) -> Option<SearchPattern> {
        std::mem::replace(&mut self.search, pattern)
    }

    fn search_pattern(&self) -> Option<SearchPattern> {
        self.search.clone()
    }

    fn find_next(&mut self) -> bool {
        self.find(SearchDirection::Forward)
    }

    fn find_previous(&mut self) -> bool {
        self.find(SearchDirection::Backward)
    }

    fn copy_clipboard(&mut self) {
        if let Some(text) = self.selection.text_in(&self.lines) {
            self.clipboard = Some(text);
        }
    }

    fn copy_primary(&mut self) {
        if let Some(text) = self.selection.text_in(&self.lines) {
            self.primary = Some(text);
            self.primary_copies += 1;
        }
    }

    fn paste_clipboard(&mut self) {
        self.pasted.push(self.clipboard.clone().unwrap_or_default());
    }

    fn register_match(&mut self, pattern: MatchPattern) -> MatchId {
        self.matches.register(pattern)
    }

    fn match_at_cell(&self, col: usize, row: usize) -> Option<String> {
        let line = self.lines.get(self.viewport_top() + row)?;
        self.matches.match_at(line, col).map(|(_, text)| text)
    }

    fn cell_width(&self) -> f64 {
        self.cell_width
    }

    fn cell_height(&self) -> f64 {
        self.cell_height
    }

    fn inner_padding(&self) -> Padding {
        self.padding
    }
}

/// Dialog handle produced by [`RecordingToolkit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDialog {
    pub id: u64,
    pub title: String,
}

/// Toolkit that only counts dialogs
#[derive(Debug, Default)]
pub struct RecordingToolkit {
    presented: usize,
    destroyed: usize,
}

impl RecordingToolkit {
    pub fn presented(&self) -> usize {
        self.presented
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    pub fn live_dialogs(&self) -> usize {
        self.presented - self.destroyed
    }
}

impl DialogHandle for RecordedDialog {
    fn id(&self) -> u64 {
        self.id
    }
}

impl WindowingToolkit for RecordingToolkit {
    type Dialog = RecordedDialog;

    fn present_search_dialog(&mut self, title: &str) -> Self::Dialog {
        self.presented += 1;
        RecordedDialog {
            id: self.presented as u64,
            title: title.to_string(),
        }
    }

    fn destroy_dialog(&mut self, _dialog: Self::Dialog) {
        self.destroyed += 1;
    }
}

/// Launcher that records instead of spawning
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    launched: RefCell<Vec<(String, String)>>,
    attempts: Cell<usize>,
    fail: bool,
}

impl RecordingLauncher {
    /// A launcher whose every launch fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn launched(&self) -> Vec<(String, String)> {
        self.launched.borrow().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

impl UrlLauncher for RecordingLauncher {
    fn launch(&self, command: &str, url: &str) -> Result<(), TerminalError> {
        self.attempts.set(self.attempts.get() + 1);
        if self.fail {
            return Err(TerminalError::SpawnFailed {
                program: command.to_string(),
                message: "launcher configured to fail".into(),
            });
        }
        self.launched
            .borrow_mut()
            .push((command.to_string(), url.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_shows_the_last_rows() {
        let mut surface = MemorySurface::new().with_viewport_rows(2);
        for line in ["one", "two", "three"] {
            surface.push_line(line);
        }
        assert_eq!(surface.viewport_top(), 1);
    }

    #[test]
    fn replacing_the_pattern_returns_the_old_one() {
        let mut surface = MemorySurface::new();
        assert!(surface.set_search_pattern(Some(SearchPattern::new("a").unwrap())).is_none());
        let old = surface.set_search_pattern(Some(SearchPattern::new("b").unwrap()));
        assert_eq!(old.unwrap().as_str(), "a");
    }

    #[test]
    fn paste_records_clipboard_text() {
        let mut surface = MemorySurface::new();
        surface.set_clipboard("echo hi");
        surface.paste_clipboard();
        assert_eq!(surface.pasted(), ["echo hi".to_string()]);
    }

    #[test]
    fn copy_without_selection_does_nothing() {
        let mut surface = MemorySurface::with_lines(&["text"]);
        surface.copy_primary();
        surface.copy_clipboard();
        assert_eq!(surface.primary_copies(), 0);
        assert!(surface.clipboard().is_none());
    }
}
