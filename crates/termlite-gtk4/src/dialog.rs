//! Search prompt window

use std::cell::Cell;
use std::rc::Rc;

use async_channel::Sender;
use gtk4::prelude::*;
use gtk4::{gdk, Align, Button, DrawingArea, Entry, EventControllerKey, Orientation};
use termlite_core::{DialogHandle, DialogResponse, WindowingToolkit};
use tracing::debug;

/// A response tagged with the dialog that produced it
pub type TaggedResponse = (u64, DialogResponse);

/// Handle on a presented search window
#[derive(Debug)]
pub struct SearchDialog {
    id: u64,
    window: gtk4::Window,
}

impl DialogHandle for SearchDialog {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Builds search windows transient for the terminal's top-level
///
/// Every response, including the `Closed` sent when a window is destroyed,
/// arrives on the channel given to [`GtkToolkit::new`].
#[derive(Clone)]
pub struct GtkToolkit {
    anchor: DrawingArea,
    responses: Sender<TaggedResponse>,
    next_id: Rc<Cell<u64>>,
}

impl GtkToolkit {
    pub fn new(anchor: &DrawingArea, responses: Sender<TaggedResponse>) -> Self {
        Self {
            anchor: anchor.clone(),
            responses,
            next_id: Rc::new(Cell::new(1)),
        }
    }

    fn parent_window(&self) -> Option<gtk4::Window> {
        self.anchor.root()?.downcast::<gtk4::Window>().ok()
    }
}

/// Escape dismisses the window; other keys go to the entry
fn key_response(keyval: gdk::Key) -> Option<DialogResponse> {
    (keyval == gdk::Key::Escape).then_some(DialogResponse::Cancelled)
}

fn send(tx: &Sender<TaggedResponse>, id: u64, response: DialogResponse) {
    if tx.send_blocking((id, response)).is_err() {
        debug!(id, "search response dropped, view is gone");
    }
}

impl WindowingToolkit for GtkToolkit {
    type Dialog = SearchDialog;

    fn present_search_dialog(&mut self, title: &str) -> SearchDialog {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let window = gtk4::Window::builder()
            .title(title)
            .modal(true)
            .destroy_with_parent(true)
            .resizable(false)
            .build();
        window.set_transient_for(self.parent_window().as_ref());

        let entry = Entry::new();
        entry.set_hexpand(true);

        let ok = Button::with_label("OK");
        ok.set_halign(Align::End);

        let content = gtk4::Box::new(Orientation::Vertical, 6);
        content.set_margin_top(8);
        content.set_margin_bottom(8);
        content.set_margin_start(8);
        content.set_margin_end(8);
        content.append(&entry);
        content.append(&ok);
        window.set_child(Some(&content));
        window.set_default_widget(Some(&ok));

        {
            let tx = self.responses.clone();
            let field = entry.clone();
            ok.connect_clicked(move |_| {
                send(&tx, id, DialogResponse::Accepted(field.text().to_string()));
            });
        }

        {
            let tx = self.responses.clone();
            entry.connect_activate(move |entry| {
                send(&tx, id, DialogResponse::Accepted(entry.text().to_string()));
            });
        }

        {
            let tx = self.responses.clone();
            let keys = EventControllerKey::new();
            keys.connect_key_pressed(move |_, keyval, _, _| match key_response(keyval) {
                Some(response) => {
                    send(&tx, id, response);
                    glib::Propagation::Stop
                }
                None => glib::Propagation::Proceed,
            });
            window.add_controller(keys);
        }

        {
            let tx = self.responses.clone();
            window.connect_destroy(move |_| send(&tx, id, DialogResponse::Closed));
        }

        window.present();
        entry.grab_focus();
        debug!(id, "search window presented");

        SearchDialog { id, window }
    }

    fn destroy_dialog(&mut self, dialog: SearchDialog) {
        dialog.window.destroy();
    }
}
