//! termlite - a minimal keyboard-centric terminal
//!
//! The binary parses its flags with [`cli`], then hands the resulting
//! configuration and command line to [`app::run`].

pub mod app;
pub mod cli;
