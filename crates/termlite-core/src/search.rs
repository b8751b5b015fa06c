//! Interactive search: pattern compilation, the dialog session and find dispatch

use regex::{Regex, RegexBuilder};
use tracing::{debug, trace};

use crate::error::{TerminalError, TerminalResult};
use crate::find::SearchDirection;
use crate::traits::TerminalSurface;

/// A compiled, case-sensitive search regex that remembers its source text
#[derive(Clone, Debug)]
pub struct SearchPattern {
    source: String,
    regex: Regex,
}

impl SearchPattern {
    pub fn new(pattern: &str) -> TerminalResult<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(false)
            .multi_line(false)
            .build()
            .map_err(|source| TerminalError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl PartialEq for SearchPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// State of the search prompt for one terminal surface
///
/// `D` is the toolkit's dialog handle. The session exists for the whole
/// process; it is reset between searches rather than recreated.
#[derive(Debug)]
pub struct SearchSession<D> {
    direction: SearchDirection,
    dialog: Option<D>,
}

impl<D> Default for SearchSession<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> SearchSession<D> {
    pub fn new() -> Self {
        Self {
            direction: SearchDirection::Forward,
            dialog: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    pub fn dialog(&self) -> Option<&D> {
        self.dialog.as_ref()
    }

    /// Record a freshly presented dialog. Returns `false` and leaves the
    /// session untouched when one is already open.
    pub(crate) fn open(&mut self, direction: SearchDirection, dialog: D) -> bool {
        if self.is_open() {
            return false;
        }
        self.direction = direction;
        self.dialog = Some(dialog);
        true
    }

    /// Close the session, handing back the dialog for teardown
    pub(crate) fn close(&mut self) -> Option<D> {
        self.dialog.take()
    }
}

/// Run the surface's find in `direction`, copying a hit to the primary selection
pub fn find_and_copy(surface: &mut dyn TerminalSurface, direction: SearchDirection) -> bool {
    let found = match direction {
        SearchDirection::Forward => surface.find_next(),
        SearchDirection::Backward => surface.find_previous(),
    };

    if found {
        surface.copy_primary();
    } else {
        trace!(?direction, "no match");
    }
    found
}

/// Compile `pattern`, make it the surface's active search and find once
///
/// On a compile failure the surface keeps its previous pattern and the error
/// is returned. Otherwise returns whether a match was found.
pub fn execute_search(
    surface: &mut dyn TerminalSurface,
    pattern: &str,
    direction: SearchDirection,
) -> TerminalResult<bool> {
    let compiled = SearchPattern::new(pattern)?;

    if let Some(previous) = surface.set_search_pattern(Some(compiled)) {
        debug!(previous = previous.as_str(), "replacing search pattern");
        drop(previous);
    }

    let found = find_and_copy(surface, direction);
    debug!(pattern, ?direction, found, "search executed");
    Ok(found)
}
