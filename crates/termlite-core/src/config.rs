// src/config.rs
use bitflags::bitflags;

use crate::color::Color;
use crate::constants::{
    AUDIBLE_BELL, COLOR_PALETTE, DEFAULT_BG, DEFAULT_FG, DEFAULT_FONT, DEFAULT_TERM,
    DEFAULT_WINDOW_TITLE, FALLBACK_SHELL, MOUSE_AUTOHIDE, SCROLLBACK_LINES, SCROLL_ON_KEYSTROKE,
    SCROLL_ON_OUTPUT, URL_COMMAND, URL_REGEX, VISIBLE_BELL,
};
use crate::error::TerminalError;

bitflags! {
    /// Optional behaviours, selected once at startup
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        /// Clicking a registered URL match launches the URL command
        const CLICKABLE_URL = 1 << 0;
        /// A bell in an unfocused window asks for the user's attention
        const URGENT_ON_BEEP = 1 << 1;
        /// The window title follows the terminal title
        const DYNAMIC_TITLE = 1 << 2;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Clone, Debug)]
pub struct TerminalConfig {
    pub font: String,
    pub scrollback_lines: usize,
    pub scroll_on_output: bool,
    pub scroll_on_keystroke: bool,
    pub audible_bell: bool,
    pub visible_bell: bool,
    pub mouse_autohide: bool,
    pub term: String,
    pub url_command: String,
    pub url_regex: String,
    pub foreground: Color,
    pub background: Color,
    pub palette: [Color; 16],
    /// 0.0 is opaque, 1.0 fully transparent
    pub transparency: Option<f64>,
    pub capabilities: Capabilities,
    pub window_title: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            scrollback_lines: SCROLLBACK_LINES,
            scroll_on_output: SCROLL_ON_OUTPUT,
            scroll_on_keystroke: SCROLL_ON_KEYSTROKE,
            audible_bell: AUDIBLE_BELL,
            visible_bell: VISIBLE_BELL,
            mouse_autohide: MOUSE_AUTOHIDE,
            term: DEFAULT_TERM.to_string(),
            url_command: URL_COMMAND.to_string(),
            url_regex: URL_REGEX.to_string(),
            foreground: DEFAULT_FG,
            background: DEFAULT_BG,
            palette: COLOR_PALETTE,
            transparency: None,
            capabilities: Capabilities::default(),
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
        }
    }
}

impl TerminalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font: &str) -> Self {
        self.font = font.to_string();
        self
    }

    pub fn with_scrollback_lines(mut self, lines: usize) -> Self {
        self.scrollback_lines = lines;
        self
    }

    pub fn with_foreground_color(mut self, color: Color) -> Self {
        self.foreground = color;
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn without_capability(mut self, capability: Capabilities) -> Self {
        self.capabilities.remove(capability);
        self
    }

    /// Transparency must lie in 0.0..=1.0
    pub fn with_transparency(mut self, transparency: f64) -> Result<Self, TerminalError> {
        if !(0.0..=1.0).contains(&transparency) {
            return Err(TerminalError::ConfigurationError {
                field: "transparency".into(),
                value: transparency.to_string(),
            });
        }
        self.transparency = Some(transparency);
        Ok(self)
    }

    /// Background as painted, with transparency applied
    pub fn effective_background(&self) -> Color {
        match self.transparency {
            Some(t) => self.background.with_alpha(1.0 - t),
            None => self.background,
        }
    }

    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }
}

/// Command to run when none was given: the user's shell, else `/bin/sh`
pub fn default_command(shell: Option<&str>) -> Vec<String> {
    let shell = shell
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_SHELL);
    vec![shell.to_string()]
}

/// Resolve the argv to spawn from the command line remainder
pub fn resolve_command(args: &[String], shell: Option<&str>) -> Vec<String> {
    if args.is_empty() {
        default_command(shell)
    } else {
        args.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_every_capability() {
        let config = TerminalConfig::default();
        assert!(config.has(Capabilities::CLICKABLE_URL));
        assert!(config.has(Capabilities::URGENT_ON_BEEP));
        assert!(config.has(Capabilities::DYNAMIC_TITLE));
        assert_eq!(config.scrollback_lines, SCROLLBACK_LINES);
        assert_eq!(config.url_regex, URL_REGEX);
    }

    #[test]
    fn capabilities_can_be_removed() {
        let config = TerminalConfig::new().without_capability(Capabilities::CLICKABLE_URL);
        assert!(!config.has(Capabilities::CLICKABLE_URL));
        assert!(config.has(Capabilities::DYNAMIC_TITLE));
    }

    #[test]
    fn transparency_is_validated() {
        assert!(TerminalConfig::new().with_transparency(1.5).is_err());
        let config = TerminalConfig::new().with_transparency(0.25).unwrap();
        assert!((config.effective_background().a - 0.75).abs() < 1e-9);
    }

    #[test]
    fn opaque_background_without_transparency() {
        let config = TerminalConfig::new();
        assert_eq!(config.effective_background(), config.background);
    }

    #[test]
    fn command_falls_back_to_shell_then_sh() {
        assert_eq!(resolve_command(&[], Some("/bin/zsh")), vec!["/bin/zsh"]);
        assert_eq!(resolve_command(&[], Some("  ")), vec![FALLBACK_SHELL]);
        assert_eq!(resolve_command(&[], None), vec![FALLBACK_SHELL]);
    }

    #[test]
    fn explicit_command_is_kept_verbatim() {
        let args = vec!["htop".to_string(), "-d".to_string(), "10".to_string()];
        assert_eq!(resolve_command(&args, Some("/bin/zsh")), args);
    }
}
