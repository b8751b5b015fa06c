// src/constants.rs
use crate::color::Color;

// Display constants
pub const DEFAULT_FONT: &str = "Monospace 9";
pub const DEFAULT_WINDOW_TITLE: &str = "termlite";
pub const DEFAULT_WIDTH: i32 = 800;
pub const DEFAULT_HEIGHT: i32 = 600;
pub const INNER_PADDING: f64 = 2.0;

pub const SCROLLBACK_LINES: usize = 1000;
pub const DEFAULT_TERM: &str = "xterm-256color";
pub const FALLBACK_SHELL: &str = "/bin/sh";

// Behaviour
pub const SCROLL_ON_OUTPUT: bool = false;
pub const SCROLL_ON_KEYSTROKE: bool = true;
pub const AUDIBLE_BELL: bool = false;
pub const VISIBLE_BELL: bool = false;
pub const MOUSE_AUTOHIDE: bool = false;

// Timing constants
pub const CLICK_TIMEOUT_MS: u128 = 200;
pub const VISIBLE_BELL_MS: u64 = 100;

// Lines moved per wheel notch
pub const SCROLL_STEP: usize = 3;

// URL handling
pub const URL_COMMAND: &str = "xdg-open";
pub const URL_REGEX: &str = r"(ftp|http)s?://[-a-zA-Z0-9.?$%&/=_~#.,:;+]*";

pub const SEARCH_DIALOG_TITLE: &str = "Search";

// Color constants
pub const DEFAULT_FG: Color = Color::from_rgb8(0xdc, 0xdc, 0xcc);
pub const DEFAULT_BG: Color = Color::from_rgb8(0x3f, 0x3f, 0x3f);
pub const SELECTION_BG: Color = Color { r: 0.3, g: 0.5, b: 0.8, a: 0.7 };

// 16-color ANSI palette
pub const COLOR_PALETTE: [Color; 16] = [
    // Basic 8 colors
    Color::from_rgb8(0x3f, 0x3f, 0x3f), // Black
    Color::from_rgb8(0x70, 0x50, 0x50), // Red
    Color::from_rgb8(0x60, 0xb4, 0x8a), // Green
    Color::from_rgb8(0xdf, 0xaf, 0x8f), // Yellow
    Color::from_rgb8(0x9a, 0xb8, 0xd7), // Blue
    Color::from_rgb8(0xdc, 0x8c, 0xc3), // Magenta
    Color::from_rgb8(0x8c, 0xd0, 0xd3), // Cyan
    Color::from_rgb8(0xdc, 0xdc, 0xcc), // White
    // Bright colors
    Color::from_rgb8(0x70, 0x90, 0x80), // Bright Black (Gray)
    Color::from_rgb8(0xdc, 0xa3, 0xa3), // Bright Red
    Color::from_rgb8(0x72, 0xd5, 0xa3), // Bright Green
    Color::from_rgb8(0xf0, 0xdf, 0xaf), // Bright Yellow
    Color::from_rgb8(0x94, 0xbf, 0xf3), // Bright Blue
    Color::from_rgb8(0xec, 0x93, 0xd3), // Bright Magenta
    Color::from_rgb8(0x93, 0xe0, 0xe3), // Bright Cyan
    Color::from_rgb8(0xff, 0xff, 0xff), // Bright White
];
