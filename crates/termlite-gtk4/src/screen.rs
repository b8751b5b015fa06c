//! Emulator state shared by the view, the surface and the input handlers
//!
//! Rows are addressed two ways. Viewport rows count from the top of what is
//! currently drawn. Buffer rows count from the oldest scrollback line, so a
//! selection or a search hit keeps its place while the view scrolls.

use std::ops::Range;

use termlite_core::find::{self, column_of, search_anchor};
use termlite_core::{
    MatchId, MatchPattern, MatchRegistry, MatchSpan, Padding, SearchDirection, SearchPattern, Selection,
    TextPoint,
};
use tracing::debug;

/// Terminal events raised by the emulator while processing output
#[derive(Debug, Default)]
pub struct Notifications {
    audible_bells: usize,
    visual_bells: usize,
    title: Option<String>,
}

impl vt100::Callbacks for Notifications {
    fn audible_bell(&mut self, _: &mut vt100::Screen) {
        self.audible_bells += 1;
    }

    fn visual_bell(&mut self, _: &mut vt100::Screen) {
        self.visual_bells += 1;
    }

    fn set_window_title(&mut self, _: &mut vt100::Screen, title: &[u8]) {
        self.title = Some(String::from_utf8_lossy(title).into_owned());
    }
}

/// What a chunk of PTY output changed besides the cells
#[derive(Debug, Default, PartialEq)]
pub struct OutputEffects {
    pub bell: bool,
    pub visual_bell: bool,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BufferRow {
    text: String,
    wrapped: bool,
}

/// Buffer rows regrouped into the lines programs wrote
///
/// A row that wraps is padded to the full width before the next row is
/// appended, so logical column `c` of a line sits `c / cols` rows below its
/// first row at column `c % cols`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedText {
    lines: Vec<String>,
    first_rows: Vec<usize>,
    base_row: usize,
    row_count: usize,
    cols: usize,
}

impl WrappedText {
    fn join(rows: Vec<BufferRow>, cols: usize, base_row: usize) -> Self {
        let cols = cols.max(1);
        let row_count = rows.len();
        let mut lines: Vec<String> = Vec::new();
        let mut first_rows = Vec::new();
        let mut continues = false;

        for (i, row) in rows.into_iter().enumerate() {
            let mut text = row.text;
            if row.wrapped {
                let width = column_of(&text, text.len());
                text.extend(std::iter::repeat_n(' ', cols.saturating_sub(width)));
            }
            match lines.last_mut() {
                Some(line) if continues => line.push_str(&text),
                _ => {
                    lines.push(text);
                    first_rows.push(base_row + i);
                }
            }
            continues = row.wrapped;
        }

        Self { lines, first_rows, base_row, row_count, cols }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Buffer rows covered
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Logical position of buffer `point`; points past the end map past the last line
    pub fn to_logical(&self, point: TextPoint) -> TextPoint {
        if point.row < self.base_row || point.row >= self.base_row + self.row_count {
            let line = if point.row < self.base_row { 0 } else { self.lines.len() };
            return TextPoint::new(line, 0);
        }
        let line = self.first_rows.partition_point(|&first| first <= point.row) - 1;
        let col = (point.row - self.first_rows[line]) * self.cols + point.col;
        TextPoint::new(line, col)
    }

    /// Buffer cell holding logical column `col` of `line`
    pub fn to_buffer(&self, line: usize, col: usize) -> TextPoint {
        let first = self.first_rows.get(line).copied().unwrap_or(self.base_row + self.row_count);
        TextPoint::new(first + col / self.cols, col % self.cols)
    }

    /// Buffer `(start, end)` of a logical match, `end` exclusive and on the row of the last cell
    pub fn buffer_range(&self, span: MatchSpan) -> (TextPoint, TextPoint) {
        let start = self.to_buffer(span.row, span.start);
        let last = self.to_buffer(span.row, span.end.saturating_sub(1).max(span.start));
        (start, TextPoint::new(last.row, last.col + 1))
    }
}

pub struct ScreenState {
    parser: vt100::Parser<Notifications>,
    selection: Selection,
    search: Option<SearchPattern>,
    matches: MatchRegistry,
    metrics: CellMetrics,
    padding: Padding,
    scroll_on_output: bool,
}

impl ScreenState {
    pub fn new(
        rows: u16,
        cols: u16,
        scrollback_lines: usize,
        metrics: CellMetrics,
        padding: Padding,
        scroll_on_output: bool,
    ) -> Self {
        Self {
            parser: vt100::Parser::new_with_callbacks(
                rows.max(1),
                cols.max(1),
                scrollback_lines,
                Notifications::default(),
            ),
            selection: Selection::new(),
            search: None,
            matches: MatchRegistry::new(),
            metrics,
            padding,
            scroll_on_output,
        }
    }

    pub fn screen(&self) -> &vt100::Screen {
        self.parser.screen()
    }

    /// Feed PTY output to the emulator
    pub fn process(&mut self, bytes: &[u8]) -> OutputEffects {
        self.parser.process(bytes);
        if self.scroll_on_output {
            self.parser.screen_mut().set_scrollback(0);
        }

        let notes = std::mem::take(self.parser.callbacks_mut());
        OutputEffects {
            bell: notes.audible_bells > 0,
            visual_bell: notes.visual_bells > 0,
            title: notes.title,
        }
    }

    pub fn size(&self) -> (u16, u16) {
        self.parser.screen().size()
    }

    /// Grid size that fits a widget of `width` x `height` pixels
    pub fn grid_for(&self, width: i32, height: i32) -> (u16, u16) {
        let usable_w = (f64::from(width) - self.padding.horizontal()).max(0.0);
        let usable_h = (f64::from(height) - self.padding.vertical()).max(0.0);
        let cols = (usable_w / self.metrics.width).floor().clamp(1.0, f64::from(u16::MAX));
        let rows = (usable_h / self.metrics.height).floor().clamp(1.0, f64::from(u16::MAX));
        (rows as u16, cols as u16)
    }

    /// Resize the grid; returns whether the size changed
    pub fn resize(&mut self, rows: u16, cols: u16) -> bool {
        if self.size() == (rows, cols) {
            return false;
        }
        let offset = self.parser.screen().scrollback();
        self.parser.screen_mut().set_size(rows, cols);
        self.parser.screen_mut().set_scrollback(offset);
        true
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Lines of history above the live screen
    pub fn history_len(&mut self) -> usize {
        let offset = self.parser.screen().scrollback();
        self.parser.screen_mut().set_scrollback(usize::MAX);
        let len = self.parser.screen().scrollback();
        self.parser.screen_mut().set_scrollback(offset);
        len
    }

    pub fn scroll_offset(&self) -> usize {
        self.parser.screen().scrollback()
    }

    /// Buffer row shown at the top of the viewport
    pub fn viewport_top(&mut self) -> usize {
        self.history_len() - self.scroll_offset()
    }

    /// Scroll towards history for positive `delta`; returns whether the view moved
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let current = self.scroll_offset();
        let next = if delta >= 0 {
            current.saturating_add(delta.unsigned_abs())
        } else {
            current.saturating_sub(delta.unsigned_abs())
        };
        self.parser.screen_mut().set_scrollback(next);
        self.scroll_offset() != current
    }

    pub fn scroll_to_bottom(&mut self) -> bool {
        let moved = self.scroll_offset() != 0;
        self.parser.screen_mut().set_scrollback(0);
        moved
    }

    /// Scroll the least distance that brings buffer `row` into view
    pub fn scroll_to_row(&mut self, row: usize) {
        let history = self.history_len();
        let rows = usize::from(self.size().0);
        let top = history - self.scroll_offset();

        let offset = if row < top {
            history.saturating_sub(row)
        } else if row >= top + rows {
            (history + rows).saturating_sub(row + 1)
        } else {
            return;
        };
        self.parser.screen_mut().set_scrollback(offset);
    }

    /// Screen rows `range` of the buffer, history first
    fn buffer_rows(&mut self, range: Range<usize>) -> Vec<BufferRow> {
        let (rows, cols) = self.size();
        let saved = self.scroll_offset();
        let history = self.history_len();
        let end = range.end.min(history + usize::from(rows));

        let mut out = Vec::with_capacity(end.saturating_sub(range.start));
        let mut next = range.start;
        while next < end {
            let offset = history.saturating_sub(next);
            self.parser.screen_mut().set_scrollback(offset);
            let top = history - offset;
            let screen = self.parser.screen();
            for (i, text) in screen.rows(0, cols).enumerate() {
                if top + i == next && next < end {
                    let wrapped = screen.row_wrapped(i as u16);
                    out.push(BufferRow { text, wrapped });
                    next += 1;
                }
            }
            if offset == 0 {
                break;
            }
        }

        self.parser.screen_mut().set_scrollback(saved);
        out
    }

    /// Every buffer row, history first, trailing blanks trimmed per row
    pub fn lines(&mut self) -> Vec<String> {
        self.buffer_rows(0..usize::MAX)
            .into_iter()
            .map(|row| row.text)
            .collect()
    }

    /// The whole buffer with soft-wrapped rows joined
    pub fn wrapped_text(&mut self) -> WrappedText {
        let cols = usize::from(self.size().1);
        WrappedText::join(self.buffer_rows(0..usize::MAX), cols, 0)
    }

    /// The line holding buffer `row`, followed across soft wraps both ways
    fn wrapped_line_at(&mut self, row: usize) -> WrappedText {
        let cols = usize::from(self.size().1);
        let is_wrapped = |state: &mut Self, row: usize| {
            state.buffer_rows(row..row + 1).first().is_some_and(|r| r.wrapped)
        };

        let mut first = row;
        while first > 0 && is_wrapped(self, first - 1) {
            first -= 1;
        }
        let mut last = row;
        while is_wrapped(self, last) {
            last += 1;
        }
        WrappedText::join(self.buffer_rows(first..last + 1), cols, first)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn selected_text(&mut self) -> Option<String> {
        if !self.selection.has_selection() {
            return None;
        }
        let (start, end) = self.selection.range()?;
        let text = self.wrapped_text();

        let mut logical = Selection::new();
        logical.select_range(text.to_logical(start), text.to_logical(end));
        logical.text_in(text.lines()).filter(|text| !text.is_empty())
    }

    pub fn set_search_pattern(&mut self, pattern: Option<SearchPattern>) -> Option<SearchPattern> {
        std::mem::replace(&mut self.search, pattern)
    }

    pub fn search_pattern(&self) -> Option<&SearchPattern> {
        self.search.as_ref()
    }

    /// Select the next hit of the active pattern and bring it into view
    pub fn find(&mut self, direction: SearchDirection) -> bool {
        let Some(regex) = self.search.as_ref().map(|p| p.regex().clone()) else {
            return false;
        };

        let text = self.wrapped_text();
        let top = self.viewport_top();
        let anchor = search_anchor(self.selection.range(), top, text.row_count(), direction);

        match find::find(text.lines(), &regex, text.to_logical(anchor), direction) {
            Some(span) => {
                let (start, end) = text.buffer_range(span);
                debug!(row = start.row, col = start.col, end_row = end.row, "search hit");
                self.selection.select_range(start, end);
                self.scroll_to_row(start.row);
                true
            }
            None => false,
        }
    }

    pub fn register_match(&mut self, pattern: MatchPattern) -> MatchId {
        self.matches.register(pattern)
    }

    /// Registered match covering the cell at viewport (`col`, `row`)
    pub fn match_at(&mut self, col: usize, row: usize) -> Option<String> {
        if self.matches.is_empty() || row >= usize::from(self.size().0) {
            return None;
        }
        let point = TextPoint::new(self.viewport_top() + row, col);
        let text = self.wrapped_line_at(point.row);
        let logical = text.to_logical(point);
        let line = text.lines().get(logical.row)?;
        self.matches.match_at(line, logical.col).map(|(_, text)| text)
    }

    /// Viewport cell under widget coordinates, clamped to the grid
    pub fn cell_at(&self, x: f64, y: f64) -> (usize, usize) {
        let (rows, cols) = self.size();
        let col = ((x - self.padding.left) / self.metrics.width).floor().max(0.0) as usize;
        let row = ((y - self.padding.top) / self.metrics.height).floor().max(0.0) as usize;
        (
            row.min(usize::from(rows).saturating_sub(1)),
            col.min(usize::from(cols).saturating_sub(1)),
        )
    }
}
