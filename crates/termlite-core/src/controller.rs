//! Search and match controller - the single owner of the search session
//!
//! Every handler takes the collaborators by reference; nothing here holds on
//! to the surface or the toolkit between events.

use tracing::{debug, info, warn};

use crate::config::{Capabilities, TerminalConfig};
use crate::constants::{SEARCH_DIALOG_TITLE, URL_COMMAND, URL_REGEX};
use crate::event::{ButtonEvent, ClickKind, DialogResponse, KeyEvent, TerminalEvent};
use crate::find::SearchDirection;
use crate::keybindings::KeyAction;
use crate::search::{execute_search, find_and_copy, SearchSession};
use crate::traits::{DialogHandle, TerminalSurface, UrlLauncher, WindowingToolkit};
use crate::url::check_match_at_coordinate;

pub struct SearchAndMatchController<D> {
    session: SearchSession<D>,
    capabilities: Capabilities,
    url_command: String,
    url_regex: String,
}

impl<D> Default for SearchAndMatchController<D> {
    fn default() -> Self {
        Self::new(Capabilities::default(), URL_COMMAND, URL_REGEX)
    }
}

impl<D> SearchAndMatchController<D> {
    pub fn new(capabilities: Capabilities, url_command: &str, url_regex: &str) -> Self {
        Self {
            session: SearchSession::new(),
            capabilities,
            url_command: url_command.to_string(),
            url_regex: url_regex.to_string(),
        }
    }

    pub fn from_config(config: &TerminalConfig) -> Self {
        Self::new(config.capabilities, &config.url_command, &config.url_regex)
    }

    pub fn session(&self) -> &SearchSession<D> {
        &self.session
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Open the search prompt unless one is already showing
    pub fn open_search_dialog(
        &mut self,
        toolkit: &mut dyn WindowingToolkit<Dialog = D>,
        direction: SearchDirection,
    ) {
        if self.session.is_open() {
            debug!(?direction, "search dialog already open");
            return;
        }

        let dialog = toolkit.present_search_dialog(SEARCH_DIALOG_TITLE);
        self.session.open(direction, dialog);
        debug!(?direction, "search dialog opened");
    }

    /// Finish the open dialog: search on accept, always tear the dialog down
    pub fn on_dialog_response(
        &mut self,
        surface: &mut dyn TerminalSurface,
        toolkit: &mut dyn WindowingToolkit<Dialog = D>,
        response: DialogResponse,
    ) {
        let Some(dialog) = self.session.close() else {
            debug!(?response, "dialog response without an open dialog");
            return;
        };

        if let DialogResponse::Accepted(text) = &response {
            if let Err(err) = execute_search(surface, text, self.session.direction()) {
                warn!("search not performed: {err}");
            }
        }

        toolkit.destroy_dialog(dialog);
        debug!(?response, "search dialog closed");
    }

    /// Dispatch a Ctrl+Shift chord; returns whether the key was consumed
    pub fn handle_key_chord(
        &mut self,
        event: &KeyEvent,
        surface: &mut dyn TerminalSurface,
        toolkit: &mut dyn WindowingToolkit<Dialog = D>,
    ) -> bool {
        let Some(action) = KeyAction::from_event(event) else {
            return false;
        };
        debug!(?action, "key chord");

        match action {
            KeyAction::CopyClipboard => surface.copy_clipboard(),
            KeyAction::PasteClipboard => surface.paste_clipboard(),
            KeyAction::FindPrevious => {
                find_and_copy(surface, SearchDirection::Backward);
            }
            KeyAction::FindNext => {
                find_and_copy(surface, SearchDirection::Forward);
            }
            KeyAction::OpenSearch(direction) => self.open_search_dialog(toolkit, direction),
            KeyAction::UrlSearch(direction) => {
                if let Err(err) = execute_search(surface, &self.url_regex, direction) {
                    warn!("URL search not performed: {err}");
                }
            }
        }
        true
    }

    /// Open a clicked URL; returns whether the click was consumed
    pub fn handle_button_press(
        &mut self,
        event: &ButtonEvent,
        surface: &mut dyn TerminalSurface,
        launcher: &dyn UrlLauncher,
    ) -> bool {
        if !self.capabilities.contains(Capabilities::CLICKABLE_URL) {
            return false;
        }
        if event.button != ButtonEvent::PRIMARY || event.click != ClickKind::Single {
            return false;
        }

        let Some(url) = check_match_at_coordinate(surface, event.x, event.y) else {
            return false;
        };

        info!(command = %self.url_command, %url, "opening match");
        if let Err(err) = launcher.launch(&self.url_command, &url) {
            warn!("failed to launch URL handler: {err}");
        }
        true
    }

    /// Route a structured event to its handler
    pub fn dispatch(
        &mut self,
        event: TerminalEvent,
        surface: &mut dyn TerminalSurface,
        toolkit: &mut dyn WindowingToolkit<Dialog = D>,
        launcher: &dyn UrlLauncher,
    ) -> bool {
        match event {
            TerminalEvent::Key(key) => self.handle_key_chord(&key, surface, toolkit),
            TerminalEvent::ButtonPress(button) => self.handle_button_press(&button, surface, launcher),
            TerminalEvent::DialogResponse(response) => {
                self.on_dialog_response(surface, toolkit, response);
                true
            }
        }
    }
}

impl<D: DialogHandle> SearchAndMatchController<D> {
    /// Deliver a response sent by dialog `id`; returns whether it reached the open dialog
    ///
    /// A response from any other dialog is dropped, including the `Closed` a
    /// toolkit reports while destroying a dialog this controller already finished.
    pub fn on_tagged_response(
        &mut self,
        id: u64,
        surface: &mut dyn TerminalSurface,
        toolkit: &mut dyn WindowingToolkit<Dialog = D>,
        response: DialogResponse,
    ) -> bool {
        if self.session.dialog().map(DialogHandle::id) != Some(id) {
            debug!(id, ?response, "response from a dismissed search dialog");
            return false;
        }
        self.on_dialog_response(surface, toolkit, response);
        true
    }
}
