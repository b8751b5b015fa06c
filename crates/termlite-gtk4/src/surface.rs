//! `TerminalSurface` over the live view

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::gdk;
use gtk4::prelude::*;
use gtk4::DrawingArea;
use termlite_core::{MatchId, MatchPattern, Padding, SearchDirection, SearchPattern, TerminalSurface};
use tracing::{debug, warn};

use crate::pty::PtyWriter;
use crate::screen::ScreenState;

/// Short-lived handle built per event; holds no borrow between calls
pub struct GtkSurface {
    area: DrawingArea,
    state: Rc<RefCell<ScreenState>>,
    writer: PtyWriter,
}

impl GtkSurface {
    pub fn new(area: DrawingArea, state: Rc<RefCell<ScreenState>>, writer: PtyWriter) -> Self {
        Self { area, state, writer }
    }

    fn find(&mut self, direction: SearchDirection) -> bool {
        let found = self.state.borrow_mut().find(direction);
        if found {
            self.area.queue_draw();
        }
        found
    }

    fn selected_text(&self) -> Option<String> {
        self.state.borrow_mut().selected_text()
    }
}

impl TerminalSurface for GtkSurface {
    fn set_search_pattern(&mut self, pattern: Option<SearchPattern>) -> Option<SearchPattern> {
        self.state.borrow_mut().set_search_pattern(pattern)
    }

    fn search_pattern(&self) -> Option<SearchPattern> {
        self.state.borrow().search_pattern().cloned()
    }

    fn find_next(&mut self) -> bool {
        self.find(SearchDirection::Forward)
    }

    fn find_previous(&mut self) -> bool {
        self.find(SearchDirection::Backward)
    }

    fn copy_clipboard(&mut self) {
        let Some(text) = self.selected_text() else {
            return;
        };
        match gdk::Display::default() {
            Some(display) => display.clipboard().set_text(&text),
            None => warn!("no display for clipboard copy"),
        }
    }

    fn copy_primary(&mut self) {
        let Some(text) = self.selected_text() else {
            return;
        };
        match gdk::Display::default() {
            Some(display) => display.primary_clipboard().set_text(&text),
            None => warn!("no display for primary selection"),
        }
    }

    fn paste_clipboard(&mut self) {
        let Some(display) = gdk::Display::default() else {
            warn!("no display for clipboard paste");
            return;
        };
        let writer = self.writer.clone();
        display
            .clipboard()
            .read_text_async(None::<&gtk4::gio::Cancellable>, move |res| match res {
                Ok(Some(text)) => writer.write(text.as_bytes()),
                Ok(None) => debug!("clipboard holds no text"),
                Err(err) => warn!("clipboard read failed: {err}"),
            });
    }

    fn register_match(&mut self, pattern: MatchPattern) -> MatchId {
        self.state.borrow_mut().register_match(pattern)
    }

    fn match_at_cell(&self, col: usize, row: usize) -> Option<String> {
        self.state.borrow_mut().match_at(col, row)
    }

    fn cell_width(&self) -> f64 {
        self.state.borrow().metrics().width
    }

    fn cell_height(&self) -> f64 {
        self.state.borrow().metrics().height
    }

    fn inner_padding(&self) -> Padding {
        self.state.borrow().padding()
    }
}
