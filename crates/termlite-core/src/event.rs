//! Structured input events delivered to the controller

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifiers that take part in accelerators
    ///
    /// Lock-style modifiers (caps lock, num lock) are never represented, so a
    /// chord matches regardless of their state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const CONTROL = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
        const HYPER = 1 << 4;
        const META = 1 << 5;
    }
}

/// A key press carrying a printable key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: char,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: char, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Ctrl+Shift+`key`
    pub fn ctrl_shift(key: char) -> Self {
        Self::new(key, Modifiers::CONTROL | Modifiers::SHIFT)
    }
}

/// Press multiplicity as reported by the toolkit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickKind {
    Single,
    Double,
    Triple,
}

impl ClickKind {
    pub fn from_press_count(n_press: i32) -> Self {
        match n_press {
            i32::MIN..=1 => ClickKind::Single,
            2 => ClickKind::Double,
            _ => ClickKind::Triple,
        }
    }
}

/// Mouse button press in widget pixel coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonEvent {
    pub button: u32,
    pub click: ClickKind,
    pub x: f64,
    pub y: f64,
}

impl ButtonEvent {
    pub const PRIMARY: u32 = 1;

    pub fn primary(x: f64, y: f64) -> Self {
        Self {
            button: Self::PRIMARY,
            click: ClickKind::Single,
            x,
            y,
        }
    }
}

/// How the search dialog was dismissed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogResponse {
    /// Confirmed with the entered text
    Accepted(String),
    /// Dismissed from inside the dialog
    Cancelled,
    /// Closed or destroyed from outside (window manager, parent teardown)
    Closed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    ButtonPress(ButtonEvent),
    DialogResponse(DialogResponse),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_counts_map_to_click_kinds() {
        assert_eq!(ClickKind::from_press_count(1), ClickKind::Single);
        assert_eq!(ClickKind::from_press_count(2), ClickKind::Double);
        assert_eq!(ClickKind::from_press_count(3), ClickKind::Triple);
        assert_eq!(ClickKind::from_press_count(7), ClickKind::Triple);
    }

    #[test]
    fn ctrl_shift_helper() {
        let event = KeyEvent::ctrl_shift('f');
        assert_eq!(event.modifiers, Modifiers::CONTROL | Modifiers::SHIFT);
        assert_eq!(event.key, 'f');
    }
}
