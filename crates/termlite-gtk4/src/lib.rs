//! termlite GTK4 - the terminal widget and its toolkit adapters
//!
//! [`TerminalView`] runs a child on a PTY, feeds its output through a vt100
//! emulator and paints the grid with cairo. Search, key chords and URL clicks
//! are handed to the core controller through [`GtkSurface`], [`GtkToolkit`]
//! and [`GioLauncher`].

mod dialog;
mod drawing;
mod input;
mod launcher;
mod pty;
mod render;
mod screen;
mod surface;
mod terminal;

pub use dialog::{GtkToolkit, SearchDialog};
pub use drawing::FontSpec;
pub use launcher::GioLauncher;
pub use surface::GtkSurface;
pub use terminal::{TerminalSignal, TerminalView};

// Re-export termlite-core types for convenience
pub use termlite_core::*;
