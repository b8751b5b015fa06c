use crate::error::TerminalError;
use crate::matches::{MatchId, MatchPattern};
use crate::search::SearchPattern;

/// Inner border between the widget edge and the first cell, in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Padding {
    pub fn uniform(px: f64) -> Self {
        Self {
            left: px,
            right: px,
            top: px,
            bottom: px,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// The terminal rendering surface the controller drives
///
/// Implementations own the active search pattern, the selection, the
/// clipboards and the registered match patterns. Rows passed to
/// [`match_at_cell`](TerminalSurface::match_at_cell) are viewport rows.
pub trait TerminalSurface {
    /// Install `pattern` as the active search pattern and hand back the one
    /// it replaces.
    fn set_search_pattern(&mut self, pattern: Option<SearchPattern>) -> Option<SearchPattern>;
    fn search_pattern(&self) -> Option<SearchPattern>;

    /// Select the next match of the active pattern, wrapping at the end
    fn find_next(&mut self) -> bool;
    /// Select the previous match of the active pattern, wrapping at the start
    fn find_previous(&mut self) -> bool;

    fn copy_clipboard(&mut self);
    fn copy_primary(&mut self);
    fn paste_clipboard(&mut self);

    fn register_match(&mut self, pattern: MatchPattern) -> MatchId;
    fn match_at_cell(&self, col: usize, row: usize) -> Option<String>;

    fn cell_width(&self) -> f64;
    fn cell_height(&self) -> f64;
    fn inner_padding(&self) -> Padding;
}

/// A dialog handle that knows which dialog it is
///
/// Toolkits tag every response with this id so a response can be matched
/// against the dialog that is open when it arrives.
pub trait DialogHandle {
    fn id(&self) -> u64;
}

/// Dialog construction for the search prompt
pub trait WindowingToolkit {
    /// Handle of an open dialog; dropping it must not leave a window behind
    /// unless it is passed to [`destroy_dialog`](WindowingToolkit::destroy_dialog).
    type Dialog;

    /// Present a modal dialog, transient for the surface's top-level window,
    /// holding one focused text entry whose activation accepts the dialog.
    fn present_search_dialog(&mut self, title: &str) -> Self::Dialog;

    fn destroy_dialog(&mut self, dialog: Self::Dialog);
}

/// Fire-and-forget launcher for the URL handler
pub trait UrlLauncher {
    fn launch(&self, command: &str, url: &str) -> Result<(), TerminalError>;
}
