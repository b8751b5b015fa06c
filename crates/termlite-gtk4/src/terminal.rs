//! Terminal widget - coordinates GTK, the PTY and rendering

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use async_channel::Receiver;
use gtk4::gdk;
use gtk4::prelude::*;
use gtk4::DrawingArea;
use termlite_core::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH, INNER_PADDING, VISIBLE_BELL_MS};
use termlite_core::{
    ButtonEvent, Capabilities, KeyEvent, MatchPattern, Padding, SearchAndMatchController, TerminalConfig,
    TerminalError, TerminalResult, TerminalSurface,
};
use tracing::{debug, info, warn};

use crate::dialog::{GtkToolkit, SearchDialog, TaggedResponse};
use crate::drawing::{DrawingCache, FontSpec};
use crate::input;
use crate::launcher::GioLauncher;
use crate::pty::{Pty, PtyEvent, PtyWriter};
use crate::render::{self, Palette};
use crate::screen::{CellMetrics, ScreenState};
use crate::surface::GtkSurface;

/// What the widget reports to the application window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalSignal {
    ChildExited(Option<u32>),
    Bell,
    TitleChanged(String),
}

type Controller = SearchAndMatchController<SearchDialog>;

/// Shared handles every input handler works through
#[derive(Clone)]
pub(crate) struct ViewContext {
    area: DrawingArea,
    state: Rc<RefCell<ScreenState>>,
    writer: PtyWriter,
    controller: Rc<RefCell<Controller>>,
    toolkit: GtkToolkit,
    launcher: GioLauncher,
    config: Rc<TerminalConfig>,
    pointer_hidden: Rc<Cell<bool>>,
    flash: Rc<Cell<bool>>,
}

impl ViewContext {
    pub(crate) fn area(&self) -> &DrawingArea {
        &self.area
    }

    fn surface(&self) -> GtkSurface {
        GtkSurface::new(self.area.clone(), Rc::clone(&self.state), self.writer.clone())
    }

    pub(crate) fn handle_key(&self, event: KeyEvent) -> bool {
        let mut surface = self.surface();
        let mut toolkit = self.toolkit.clone();
        self.controller
            .borrow_mut()
            .handle_key_chord(&event, &mut surface, &mut toolkit)
    }

    pub(crate) fn handle_button(&self, event: ButtonEvent) -> bool {
        let mut surface = self.surface();
        self.controller
            .borrow_mut()
            .handle_button_press(&event, &mut surface, &self.launcher)
    }

    pub(crate) fn send_input(&self, bytes: &[u8]) {
        if self.config.scroll_on_keystroke && self.state.borrow_mut().scroll_to_bottom() {
            self.area.queue_draw();
        }
        self.writer.write(bytes);
    }

    pub(crate) fn page_lines(&self) -> isize {
        (self.state.borrow().size().0 as isize).max(1)
    }

    pub(crate) fn scroll_by(&self, lines: isize) {
        if self.state.borrow_mut().scroll_by(lines) {
            self.area.queue_draw();
        }
    }

    fn buffer_cell(&self, x: f64, y: f64) -> (usize, usize) {
        let mut state = self.state.borrow_mut();
        let (row, col) = state.cell_at(x, y);
        (state.viewport_top() + row, col)
    }

    pub(crate) fn start_selection(&self, x: f64, y: f64, now: Instant) {
        let (row, col) = self.buffer_cell(x, y);
        self.state.borrow_mut().selection_mut().start(row, col, now);
        self.area.queue_draw();
    }

    pub(crate) fn update_selection(&self, x: f64, y: f64) {
        if !self.state.borrow().selection().is_selecting() {
            return;
        }
        let (row, col) = self.buffer_cell(x, y);
        self.state.borrow_mut().selection_mut().update(row, col);
        self.area.queue_draw();
    }

    pub(crate) fn complete_selection(&self, x: f64, y: f64, now: Instant) {
        if !self.state.borrow().selection().is_selecting() {
            return;
        }
        let (row, col) = self.buffer_cell(x, y);
        let selected = self.state.borrow_mut().selection_mut().complete(row, col, now);
        if selected {
            self.surface().copy_primary();
        }
        self.area.queue_draw();
    }

    pub(crate) fn paste_primary(&self) {
        let Some(display) = gdk::Display::default() else {
            return;
        };
        let ctx = self.clone();
        display
            .primary_clipboard()
            .read_text_async(None::<&gtk4::gio::Cancellable>, move |res| match res {
                Ok(Some(text)) => ctx.send_input(text.as_bytes()),
                Ok(None) => {}
                Err(err) => debug!("primary selection unavailable: {err}"),
            });
    }

    /// Pointer cursor over a clickable match, text cursor elsewhere
    pub(crate) fn update_hover(&self, x: f64, y: f64) {
        if !self.config.has(Capabilities::CLICKABLE_URL) {
            return;
        }
        let over_match = termlite_core::url::check_match_at_coordinate(&self.surface(), x, y).is_some();
        self.area
            .set_cursor_from_name(Some(if over_match { "pointer" } else { "text" }));
    }

    pub(crate) fn hide_pointer(&self) {
        if self.config.mouse_autohide && !self.pointer_hidden.replace(true) {
            self.area.set_cursor_from_name(Some("none"));
        }
    }

    pub(crate) fn show_pointer(&self) {
        if self.pointer_hidden.replace(false) {
            self.area.set_cursor_from_name(Some("text"));
        }
    }
}

/// Main terminal widget
pub struct TerminalView {
    area: DrawingArea,
    _pty: Rc<Pty>,
}

impl TerminalView {
    /// Build the widget and start `argv` on a fresh PTY
    ///
    /// Signals for the application arrive on the returned receiver.
    pub fn new(config: TerminalConfig, argv: &[String]) -> TerminalResult<(Self, Receiver<TerminalSignal>)> {
        let area = DrawingArea::new();
        area.set_focusable(true);
        area.set_hexpand(true);
        area.set_vexpand(true);
        area.set_cursor_from_name(Some("text"));

        let font = FontSpec::parse(&config.font);
        let cache = DrawingCache::new(&font).map_err(|err| TerminalError::ConfigurationError {
            field: "font".to_string(),
            value: format!("{} ({err})", config.font),
        })?;
        info!(family = %font.family, size_px = font.size_px, "font loaded");

        let metrics = CellMetrics {
            width: cache.char_width(),
            height: cache.char_height(),
            ascent: cache.ascent(),
        };
        let mut state = ScreenState::new(
            1,
            1,
            config.scrollback_lines,
            metrics,
            Padding::uniform(INNER_PADDING),
            config.scroll_on_output,
        );
        let (rows, cols) = state.grid_for(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        state.resize(rows, cols);

        let (pty_tx, pty_rx) = async_channel::unbounded::<PtyEvent>();
        let pty = Rc::new(Pty::spawn(argv, &config.term, rows, cols, pty_tx)?);

        let (signal_tx, signal_rx) = async_channel::unbounded::<TerminalSignal>();
        let (response_tx, response_rx) = async_channel::unbounded::<TaggedResponse>();

        let config = Rc::new(config);
        let ctx = ViewContext {
            area: area.clone(),
            state: Rc::new(RefCell::new(state)),
            writer: pty.writer(),
            controller: Rc::new(RefCell::new(Controller::from_config(&config))),
            toolkit: GtkToolkit::new(&area, response_tx),
            launcher: GioLauncher,
            config: Rc::clone(&config),
            pointer_hidden: Rc::new(Cell::new(false)),
            flash: Rc::new(Cell::new(false)),
        };

        if config.has(Capabilities::CLICKABLE_URL) {
            let pattern = MatchPattern::new(&config.url_regex)?;
            ctx.surface().register_match(pattern);
        }

        Self::setup_drawing(&ctx, cache);
        Self::setup_resize(&ctx, Rc::clone(&pty));
        Self::spawn_output_pump(&ctx, pty_rx, signal_tx);
        Self::spawn_response_loop(&ctx, response_rx);
        input::setup_keyboard(&ctx);
        input::setup_mouse(&ctx);

        Ok((Self { area, _pty: pty }, signal_rx))
    }

    fn setup_drawing(ctx: &ViewContext, cache: DrawingCache) {
        let state = Rc::clone(&ctx.state);
        let config = Rc::clone(&ctx.config);
        let flash = Rc::clone(&ctx.flash);
        ctx.area.set_draw_func(move |_, cr, _w, _h| {
            let mut state = state.borrow_mut();
            let top = state.viewport_top();
            let palette = Palette::from_config(&config);
            if let Err(err) = render::draw(cr, &state, top, &cache, &palette, flash.get()) {
                warn!("draw failed: {err}");
            }
        });
    }

    fn setup_resize(ctx: &ViewContext, pty: Rc<Pty>) {
        let state = Rc::clone(&ctx.state);
        ctx.area.connect_resize(move |area, width, height| {
            let mut state = state.borrow_mut();
            let (rows, cols) = state.grid_for(width, height);
            if state.resize(rows, cols) {
                debug!(rows, cols, "terminal resized");
                pty.resize(rows, cols);
                area.queue_draw();
            }
        });
    }

    fn spawn_output_pump(
        ctx: &ViewContext,
        events: Receiver<PtyEvent>,
        signals: async_channel::Sender<TerminalSignal>,
    ) {
        let ctx = ctx.clone();
        glib::MainContext::default().spawn_local(async move {
            while let Ok(event) = events.recv().await {
                match event {
                    PtyEvent::Output(bytes) => {
                        let effects = ctx.state.borrow_mut().process(&bytes);
                        if effects.bell || effects.visual_bell {
                            ctx.ring_bell();
                            let _ = signals.send(TerminalSignal::Bell).await;
                        }
                        if let Some(title) = effects.title {
                            let _ = signals.send(TerminalSignal::TitleChanged(title)).await;
                        }
                        ctx.area.queue_draw();
                    }
                    PtyEvent::Exited(code) => {
                        let _ = signals.send(TerminalSignal::ChildExited(code)).await;
                        break;
                    }
                }
            }
        });
    }

    fn spawn_response_loop(ctx: &ViewContext, responses: Receiver<TaggedResponse>) {
        let ctx = ctx.clone();
        glib::MainContext::default().spawn_local(async move {
            while let Ok((id, response)) = responses.recv().await {
                let mut surface = ctx.surface();
                let mut toolkit = ctx.toolkit.clone();
                let delivered = ctx
                    .controller
                    .borrow_mut()
                    .on_tagged_response(id, &mut surface, &mut toolkit, response);
                if delivered {
                    ctx.area.grab_focus();
                }
            }
        });
    }

    pub fn widget(&self) -> &DrawingArea {
        &self.area
    }
}

impl ViewContext {
    fn ring_bell(&self) {
        if self.config.audible_bell {
            self.area.display().beep();
        }
        if self.config.visible_bell && !self.flash.replace(true) {
            self.area.queue_draw();
            let area = self.area.clone();
            let flash = Rc::clone(&self.flash);
            glib::timeout_add_local_once(Duration::from_millis(VISIBLE_BELL_MS), move || {
                flash.set(false);
                area.queue_draw();
            });
        }
    }
}
