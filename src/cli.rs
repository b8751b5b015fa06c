//! Command-line interface

use clap::Parser;
use termlite_core::config::resolve_command;
use termlite_core::{Capabilities, Color, TerminalConfig, TerminalResult};

#[derive(Parser, Debug)]
#[command(
    name = "termlite",
    version,
    about = "Minimal keyboard-centric terminal with regex search and clickable URLs"
)]
pub struct Cli {
    /// Font description, e.g. "Monospace 9"
    #[arg(long, value_name = "FONT")]
    pub font: Option<String>,

    /// Lines of history kept above the screen
    #[arg(long, value_name = "LINES")]
    pub scrollback_lines: Option<usize>,

    /// Text color as #rgb, #rrggbb or #rrrrggggbbbb
    #[arg(long, value_name = "COLOR")]
    pub foreground: Option<Color>,

    /// Background color as #rgb, #rrggbb or #rrrrggggbbbb
    #[arg(long, value_name = "COLOR")]
    pub background: Option<Color>,

    /// Background transparency from 0.0 (opaque) to 1.0
    #[arg(long, value_name = "LEVEL")]
    pub transparency: Option<f64>,

    /// Do not open URLs on click
    #[arg(long)]
    pub no_clickable_url: bool,

    /// Do not request attention when the terminal beeps
    #[arg(long)]
    pub no_urgent_on_beep: bool,

    /// Keep the window title fixed
    #[arg(long)]
    pub no_dynamic_title: bool,

    /// Command to run instead of the login shell
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    pub fn to_config(&self) -> TerminalResult<TerminalConfig> {
        let mut config = TerminalConfig::new();

        if let Some(font) = &self.font {
            config = config.with_font(font);
        }
        if let Some(lines) = self.scrollback_lines {
            config = config.with_scrollback_lines(lines);
        }
        if let Some(fg) = self.foreground {
            config = config.with_foreground_color(fg);
        }
        if let Some(bg) = self.background {
            config = config.with_background_color(bg);
        }
        if let Some(level) = self.transparency {
            config = config.with_transparency(level)?;
        }

        for (disabled, capability) in [
            (self.no_clickable_url, Capabilities::CLICKABLE_URL),
            (self.no_urgent_on_beep, Capabilities::URGENT_ON_BEEP),
            (self.no_dynamic_title, Capabilities::DYNAMIC_TITLE),
        ] {
            if disabled {
                config = config.without_capability(capability);
            }
        }

        Ok(config)
    }

    /// Argv of the child: the trailing command, else `shell`, else `/bin/sh`
    pub fn argv(&self, shell: Option<&str>) -> Vec<String> {
        resolve_command(&self.command, shell)
    }
}
