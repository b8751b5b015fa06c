//! termlite core - GTK-agnostic search and match dispatch
//!
//! This crate holds everything in the terminal front-end that has behaviour of
//! its own: the search session and its dialog lifecycle, key-chord dispatch,
//! URL click handling, the buffer search engine and configuration. Terminal
//! emulation and the GUI toolkit are reached only through the traits in
//! [`traits`], so every piece here runs headless against [`dummy_backend`].

pub mod color;
pub mod config;
pub mod constants;
pub mod controller;
pub mod dummy_backend;
pub mod error;
pub mod event;
pub mod find;
pub mod keybindings;
pub mod matches;
pub mod search;
pub mod selection;
pub mod traits;
pub mod url;

// Re-export main types
pub use color::Color;
pub use config::{Capabilities, TerminalConfig};
pub use controller::SearchAndMatchController;
pub use error::{TerminalError, TerminalResult};
pub use event::{ButtonEvent, ClickKind, DialogResponse, KeyEvent, Modifiers, TerminalEvent};
pub use find::{MatchSpan, SearchDirection, TextPoint};
pub use keybindings::KeyAction;
pub use matches::{MatchId, MatchPattern, MatchRegistry};
pub use search::{SearchPattern, SearchSession};
pub use selection::Selection;
pub use traits::*;
