//! Registered match patterns (clickable URLs and similar)

use regex::{Regex, RegexBuilder};

use crate::error::{TerminalError, TerminalResult};
use crate::find::column_of;

/// Identifier handed out by [`MatchRegistry::register`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MatchId(pub usize);

/// A case-insensitive regex whose matches are reported at cell positions
#[derive(Clone, Debug)]
pub struct MatchPattern {
    regex: Regex,
}

impl MatchPattern {
    pub fn new(pattern: &str) -> TerminalResult<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| TerminalError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

#[derive(Clone, Debug, Default)]
pub struct MatchRegistry {
    patterns: Vec<MatchPattern>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, pattern: MatchPattern) -> MatchId {
        self.patterns.push(pattern);
        MatchId(self.patterns.len() - 1)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The match covering column `col` of `line`, earliest registration first
    pub fn match_at(&self, line: &str, col: usize) -> Option<(MatchId, String)> {
        self.patterns.iter().enumerate().find_map(|(idx, pattern)| {
            pattern
                .regex
                .find_iter(line)
                .filter(|m| !m.as_str().is_empty())
                .find(|m| column_of(line, m.start()) <= col && col < column_of(line, m.end()))
                .map(|m| (MatchId(idx), m.as_str().to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::URL_REGEX;

    #[test]
    fn url_pattern_matches_case_insensitively() {
        let mut registry = MatchRegistry::new();
        let id = registry.register(MatchPattern::new(URL_REGEX).unwrap());
        let line = "see HTTPS://Example.org/x for details";

        let (found, text) = registry.match_at(line, 6).unwrap();
        assert_eq!(found, id);
        assert_eq!(text, "HTTPS://Example.org/x");
    }

    #[test]
    fn no_match_outside_the_span() {
        let mut registry = MatchRegistry::new();
        registry.register(MatchPattern::new(URL_REGEX).unwrap());
        let line = "see http://a.b here";
        assert!(registry.match_at(line, 0).is_none());
        assert!(registry.match_at(line, 14).is_none());
        assert!(registry.match_at(line, 13).is_some());
    }

    #[test]
    fn first_registered_pattern_wins() {
        let mut registry = MatchRegistry::new();
        let first = registry.register(MatchPattern::new("foo").unwrap());
        registry.register(MatchPattern::new("fo+bar").unwrap());
        let (id, text) = registry.match_at("foobar", 1).unwrap();
        assert_eq!(id, first);
        assert_eq!(text, "foo");
    }

    #[test]
    fn invalid_match_pattern_is_rejected() {
        assert!(matches!(
            MatchPattern::new("(ftp"),
            Err(TerminalError::InvalidPattern { .. })
        ));
    }
}
