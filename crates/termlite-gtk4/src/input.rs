//! Keyboard and mouse handling for the terminal widget

use std::time::Instant;

use gtk4::gdk;
use gtk4::prelude::*;
use gtk4::{EventControllerKey, EventControllerMotion, EventControllerScroll, EventControllerScrollFlags, GestureClick};
use termlite_core::constants::SCROLL_STEP;
use termlite_core::{ButtonEvent, ClickKind, KeyEvent, Modifiers};

use crate::terminal::ViewContext;

const MIDDLE_BUTTON: u32 = 2;

/// Accelerator-relevant modifiers of a GDK event state
pub fn modifiers_from_state(state: gdk::ModifierType) -> Modifiers {
    let mut mods = Modifiers::empty();
    for (mask, flag) in [
        (gdk::ModifierType::CONTROL_MASK, Modifiers::CONTROL),
        (gdk::ModifierType::SHIFT_MASK, Modifiers::SHIFT),
        (gdk::ModifierType::ALT_MASK, Modifiers::ALT),
        (gdk::ModifierType::SUPER_MASK, Modifiers::SUPER),
        (gdk::ModifierType::HYPER_MASK, Modifiers::HYPER),
        (gdk::ModifierType::META_MASK, Modifiers::META),
    ] {
        if state.contains(mask) {
            mods |= flag;
        }
    }
    mods
}

fn special_key(keyval: gdk::Key) -> Option<&'static [u8]> {
    use gdk::Key;
    match keyval {
        Key::Return | Key::KP_Enter => Some(b"\r"),
        Key::BackSpace => Some(b"\x7f"),
        Key::Tab => Some(b"\t"),
        Key::ISO_Left_Tab => Some(b"\x1b[Z"),
        Key::Escape => Some(b"\x1b"),
        Key::Home => Some(b"\x1b[H"),
        Key::End => Some(b"\x1b[F"),
        Key::Delete => Some(b"\x1b[3~"),
        Key::Insert => Some(b"\x1b[2~"),
        Key::Page_Up => Some(b"\x1b[5~"),
        Key::Page_Down => Some(b"\x1b[6~"),
        Key::Up => Some(b"\x1b[A"),
        Key::Down => Some(b"\x1b[B"),
        Key::Right => Some(b"\x1b[C"),
        Key::Left => Some(b"\x1b[D"),
        Key::F1 => Some(b"\x1bOP"),
        Key::F2 => Some(b"\x1bOQ"),
        Key::F3 => Some(b"\x1bOR"),
        Key::F4 => Some(b"\x1bOS"),
        Key::F5 => Some(b"\x1b[15~"),
        Key::F6 => Some(b"\x1b[17~"),
        Key::F7 => Some(b"\x1b[18~"),
        Key::F8 => Some(b"\x1b[19~"),
        Key::F9 => Some(b"\x1b[20~"),
        Key::F10 => Some(b"\x1b[21~"),
        Key::F11 => Some(b"\x1b[23~"),
        Key::F12 => Some(b"\x1b[24~"),
        _ => None,
    }
}

fn control_byte(ch: char) -> Option<u8> {
    match ch {
        'a'..='z' | 'A'..='Z' => Some(ch.to_ascii_lowercase() as u8 & 0x1f),
        ' ' | '@' | '2' => Some(0),
        '[' | '3' => Some(0x1b),
        '\\' | '4' => Some(0x1c),
        ']' | '5' => Some(0x1d),
        '^' | '6' => Some(0x1e),
        '_' | '7' | '/' => Some(0x1f),
        '8' | '?' => Some(0x7f),
        _ => None,
    }
}

/// Bytes a key press sends to the child, if any
pub fn key_to_bytes(keyval: gdk::Key, modifiers: Modifiers) -> Option<Vec<u8>> {
    let mut bytes = if let Some(seq) = special_key(keyval) {
        seq.to_vec()
    } else {
        let ch = keyval.to_unicode()?;
        if ch.is_control() {
            return None;
        }
        match modifiers.contains(Modifiers::CONTROL).then(|| control_byte(ch)).flatten() {
            Some(byte) => vec![byte],
            None => ch.to_string().into_bytes(),
        }
    };

    if modifiers.contains(Modifiers::ALT) {
        bytes.insert(0, 0x1b);
    }
    Some(bytes)
}

pub fn setup_keyboard(ctx: &ViewContext) {
    let key_controller = EventControllerKey::new();

    let handler = ctx.clone();
    key_controller.connect_key_pressed(move |_, keyval, _keycode, state| {
        let ctx = &handler;
        let modifiers = modifiers_from_state(state);
        ctx.hide_pointer();

        if let Some(ch) = keyval.to_lower().to_unicode() {
            if ctx.handle_key(KeyEvent::new(ch, modifiers)) {
                return glib::Propagation::Stop;
            }
        }

        if modifiers == Modifiers::SHIFT {
            let lines = match keyval {
                gdk::Key::Page_Up => Some(ctx.page_lines()),
                gdk::Key::Page_Down => Some(-ctx.page_lines()),
                _ => None,
            };
            if let Some(lines) = lines {
                ctx.scroll_by(lines);
                return glib::Propagation::Stop;
            }
        }

        match key_to_bytes(keyval, modifiers) {
            Some(bytes) => {
                ctx.send_input(&bytes);
                glib::Propagation::Stop
            }
            None => glib::Propagation::Proceed,
        }
    });

    ctx.area().add_controller(key_controller);
}

pub fn setup_mouse(ctx: &ViewContext) {
    let click_gesture = GestureClick::new();
    click_gesture.set_button(0);

    let handler = ctx.clone();
    click_gesture.connect_pressed(move |gesture, n_press, x, y| {
        let ctx = &handler;
        ctx.show_pointer();
        ctx.area().grab_focus();

        let event = ButtonEvent {
            button: gesture.current_button(),
            click: ClickKind::from_press_count(n_press),
            x,
            y,
        };
        if ctx.handle_button(event) {
            gesture.set_state(gtk4::EventSequenceState::Claimed);
            return;
        }

        match event.button {
            ButtonEvent::PRIMARY if event.click == ClickKind::Single => ctx.start_selection(x, y, Instant::now()),
            MIDDLE_BUTTON => ctx.paste_primary(),
            _ => {}
        }
    });

    let handler = ctx.clone();
    click_gesture.connect_released(move |gesture, _, x, y| {
        if gesture.current_button() == ButtonEvent::PRIMARY {
            handler.complete_selection(x, y, Instant::now());
        }
    });

    ctx.area().add_controller(click_gesture);

    let motion_controller = EventControllerMotion::new();
    let handler = ctx.clone();
    motion_controller.connect_motion(move |_, x, y| {
        handler.show_pointer();
        handler.update_selection(x, y);
        handler.update_hover(x, y);
    });
    ctx.area().add_controller(motion_controller);

    let scroll_controller = EventControllerScroll::new(EventControllerScrollFlags::VERTICAL);
    let handler = ctx.clone();
    scroll_controller.connect_scroll(move |_, _, dy| {
        let lines = (-dy * SCROLL_STEP as f64).round() as isize;
        handler.scroll_by(lines);
        glib::Propagation::Stop
    });
    ctx.area().add_controller(scroll_controller);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_ignore_lock_state() {
        let state = gdk::ModifierType::CONTROL_MASK | gdk::ModifierType::SHIFT_MASK | gdk::ModifierType::LOCK_MASK;
        assert_eq!(modifiers_from_state(state), Modifiers::CONTROL | Modifiers::SHIFT);
        assert_eq!(modifiers_from_state(gdk::ModifierType::empty()), Modifiers::empty());
    }

    #[test]
    fn test_special_keys() {
        assert_eq!(key_to_bytes(gdk::Key::Return, Modifiers::empty()), Some(b"\r".to_vec()));
        assert_eq!(key_to_bytes(gdk::Key::Up, Modifiers::empty()), Some(b"\x1b[A".to_vec()));
        assert_eq!(key_to_bytes(gdk::Key::F5, Modifiers::empty()), Some(b"\x1b[15~".to_vec()));
    }

    #[test]
    fn test_printable_and_control() {
        assert_eq!(key_to_bytes(gdk::Key::a, Modifiers::empty()), Some(b"a".to_vec()));
        assert_eq!(key_to_bytes(gdk::Key::c, Modifiers::CONTROL), Some(vec![0x03]));
        assert_eq!(key_to_bytes(gdk::Key::bracketleft, Modifiers::CONTROL), Some(vec![0x1b]));
    }

    #[test]
    fn test_alt_prefixes_escape() {
        assert_eq!(key_to_bytes(gdk::Key::x, Modifiers::ALT), Some(b"\x1bx".to_vec()));
    }

    #[test]
    fn test_modifier_only_keys_send_nothing() {
        assert_eq!(key_to_bytes(gdk::Key::Shift_L, Modifiers::SHIFT), None);
        assert_eq!(key_to_bytes(gdk::Key::Control_L, Modifiers::CONTROL), None);
    }

    #[test]
    fn test_control_byte_table() {
        assert_eq!(control_byte('A'), Some(0x01));
        assert_eq!(control_byte('@'), Some(0x00));
        assert_eq!(control_byte('?'), Some(0x7f));
        assert_eq!(control_byte('1'), None);
    }
}
