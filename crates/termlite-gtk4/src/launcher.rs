use std::ffi::OsStr;

use gtk4::gio;
use termlite_core::{TerminalError, UrlLauncher};

/// Runs the URL handler as a detached subprocess; glib reaps it on exit
#[derive(Debug, Default, Clone, Copy)]
pub struct GioLauncher;

impl UrlLauncher for GioLauncher {
    fn launch(&self, command: &str, url: &str) -> Result<(), TerminalError> {
        let argv = [OsStr::new(command), OsStr::new(url)];
        gio::Subprocess::newv(&argv, gio::SubprocessFlags::NONE)
            .map(drop)
            .map_err(|err| TerminalError::SpawnFailed {
                program: command.to_string(),
                message: err.to_string(),
            })
    }
}
