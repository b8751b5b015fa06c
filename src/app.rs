//! Application window bootstrap

use std::cell::Cell;
use std::rc::Rc;

use async_channel::Receiver;
use gtk4::prelude::*;
use gtk4::{gdk, gio, Application, ApplicationWindow, CssProvider};
use termlite_core::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use termlite_core::{Capabilities, TerminalConfig, TerminalResult};
use termlite_gtk4::{TerminalSignal, TerminalView};
use tracing::{debug, error, info, warn};

const APP_ID: &str = "io.github.termlite";
const ICON_NAME: &str = "terminal";

/// Run the GTK application until the child exits or the window closes
pub fn run(config: TerminalConfig, argv: Vec<String>) -> glib::ExitCode {
    let app = Application::builder()
        .application_id(APP_ID)
        .flags(gio::ApplicationFlags::NON_UNIQUE)
        .build();

    let failed = Rc::new(Cell::new(false));
    {
        let failed = Rc::clone(&failed);
        app.connect_activate(move |app| {
            if let Err(err) = build_window(app, config.clone(), &argv) {
                error!("startup failed: {err}");
                eprintln!("termlite: {err}");
                failed.set(true);
                app.quit();
            }
        });
    }

    // Arguments were already consumed by clap
    let status = app.run_with_args::<&str>(&[]);
    if failed.get() {
        glib::ExitCode::FAILURE
    } else {
        status
    }
}

fn build_window(app: &Application, config: TerminalConfig, argv: &[String]) -> TerminalResult<()> {
    let window = ApplicationWindow::builder()
        .application(app)
        .title(config.window_title.as_str())
        .icon_name(ICON_NAME)
        .default_width(DEFAULT_WIDTH)
        .default_height(DEFAULT_HEIGHT)
        .build();

    if config.transparency.is_some() {
        setup_transparency();
    }

    let capabilities = config.capabilities;
    let fallback_title = config.window_title.clone();
    let (view, signals) = TerminalView::new(config, argv)?;
    window.set_child(Some(view.widget()));

    spawn_signal_loop(app, &window, signals, capabilities, fallback_title);

    let app_weak = app.downgrade();
    window.connect_destroy(move |_| {
        if let Some(app) = app_weak.upgrade() {
            app.quit();
        }
    });

    window.present();
    view.widget().grab_focus();
    Ok(())
}

fn spawn_signal_loop(
    app: &Application,
    window: &ApplicationWindow,
    signals: Receiver<TerminalSignal>,
    capabilities: Capabilities,
    fallback_title: String,
) {
    let app = app.clone();
    let window = window.clone();
    glib::MainContext::default().spawn_local(async move {
        while let Ok(signal) = signals.recv().await {
            match signal {
                TerminalSignal::ChildExited(code) => {
                    info!(?code, "child exited, quitting");
                    app.quit();
                    break;
                }
                TerminalSignal::Bell => {
                    if capabilities.contains(Capabilities::URGENT_ON_BEEP) && !window.is_active() {
                        request_attention(&app, &window);
                    }
                }
                TerminalSignal::TitleChanged(title) => {
                    if capabilities.contains(Capabilities::DYNAMIC_TITLE) {
                        let title = if title.is_empty() { fallback_title.as_str() } else { title.as_str() };
                        window.set_title(Some(title));
                    }
                }
            }
        }
    });
}

/// GTK4 has no urgency hint, so a notification stands in for it
fn request_attention(app: &Application, window: &ApplicationWindow) {
    let title = window.title().map(|t| t.to_string()).unwrap_or_default();
    let notification = gio::Notification::new(&title);
    notification.set_body(Some("Bell"));
    app.send_notification(Some("bell"), &notification);
    debug!("bell in inactive window, attention requested");
}

fn setup_transparency() {
    let css = CssProvider::new();
    css.load_from_data(
        "window { background-color: transparent; }
         drawingarea { background-color: transparent; }",
    );

    let Some(display) = gdk::Display::default() else {
        warn!("no display, transparency not applied");
        return;
    };
    gtk4::style_context_add_provider_for_display(&display, &css, gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION);

    if display.is_composited() {
        info!("compositor available, transparency enabled");
    } else {
        warn!("no compositor detected, transparency may not work");
    }
}
