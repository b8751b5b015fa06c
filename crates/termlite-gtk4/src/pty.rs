//! PTY spawning and the reader thread

use std::io::{Read, Write};
use std::sync::{Arc, Mutex};
use std::thread;

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use termlite_core::{TerminalError, TerminalResult};
use tracing::{debug, info, warn};

/// Output of the child as seen from the main loop
#[derive(Debug)]
pub enum PtyEvent {
    Output(Vec<u8>),
    Exited(Option<u32>),
}

/// Cloneable handle on the PTY input side
#[derive(Clone)]
pub struct PtyWriter {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl PtyWriter {
    fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    pub fn write(&self, data: &[u8]) {
        let result = match self.inner.lock() {
            Ok(mut w) => w.write_all(data).and_then(|()| w.flush()),
            Err(_) => {
                warn!("pty writer lock poisoned");
                return;
            }
        };
        if let Err(err) = result {
            warn!("pty write failed: {err}");
        }
    }
}

pub struct Pty {
    master: Box<dyn MasterPty + Send>,
    writer: PtyWriter,
}

impl Pty {
    /// Open a PTY of `rows` x `cols` and run `argv` on its slave side
    ///
    /// Output is delivered as [`PtyEvent`]s on `events` from a reader thread;
    /// the last event is always [`PtyEvent::Exited`].
    pub fn spawn(
        argv: &[String],
        term: &str,
        rows: u16,
        cols: u16,
        events: async_channel::Sender<PtyEvent>,
    ) -> TerminalResult<Self> {
        let Some((program, args)) = argv.split_first() else {
            return Err(TerminalError::SpawnFailed {
                program: String::new(),
                message: "empty command line".to_string(),
            });
        };

        let pair = native_pty_system()
            .openpty(pty_size(rows, cols))
            .map_err(|err| TerminalError::PtyCreationFailed {
                message: err.to_string(),
            })?;

        let mut cmd = CommandBuilder::new(program);
        cmd.args(args);
        cmd.env("TERM", term);
        if let Ok(cwd) = std::env::current_dir() {
            cmd.cwd(cwd);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|err| TerminalError::SpawnFailed {
                program: program.clone(),
                message: err.to_string(),
            })?;
        drop(pair.slave);
        info!(%program, pid = ?child.process_id(), "child spawned");

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|err| TerminalError::PtyCreationFailed {
                message: err.to_string(),
            })?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|err| TerminalError::PtyCreationFailed {
                message: err.to_string(),
            })?;

        start_reader_thread(reader, child, events);

        Ok(Self {
            master: pair.master,
            writer: PtyWriter::new(writer),
        })
    }

    pub fn writer(&self) -> PtyWriter {
        self.writer.clone()
    }

    pub fn resize(&self, rows: u16, cols: u16) {
        if let Err(err) = self.master.resize(pty_size(rows, cols)) {
            warn!("pty resize to {cols}x{rows} failed: {err}");
        }
    }
}

fn pty_size(rows: u16, cols: u16) -> PtySize {
    PtySize {
        rows,
        cols,
        pixel_width: 0,
        pixel_height: 0,
    }
}

fn start_reader_thread(
    mut reader: Box<dyn Read + Send>,
    mut child: Box<dyn Child + Send + Sync>,
    events: async_channel::Sender<PtyEvent>,
) {
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if events.send_blocking(PtyEvent::Output(buf[..n].to_vec())).is_err() {
                        debug!("view gone, stopping pty reader");
                        return;
                    }
                }
                Err(err) => {
                    debug!("pty read ended: {err}");
                    break;
                }
            }
        }

        let code = match child.wait() {
            Ok(status) => Some(status.exit_code()),
            Err(err) => {
                warn!("waiting for child failed: {err}");
                None
            }
        };
        info!(?code, "child exited");
        let _ = events.send_blocking(PtyEvent::Exited(code));
    });
}
