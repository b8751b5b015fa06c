//! Ctrl+Shift key-chord table

use crate::event::{KeyEvent, Modifiers};
use crate::find::SearchDirection;

/// What a recognised chord does
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    CopyClipboard,
    PasteClipboard,
    FindPrevious,
    FindNext,
    OpenSearch(SearchDirection),
    UrlSearch(SearchDirection),
}

impl KeyAction {
    /// Every bound key with its action
    pub const BINDINGS: [(char, KeyAction); 8] = [
        ('c', KeyAction::CopyClipboard),
        ('v', KeyAction::PasteClipboard),
        ('p', KeyAction::FindPrevious),
        ('n', KeyAction::FindNext),
        ('f', KeyAction::OpenSearch(SearchDirection::Forward)),
        ('b', KeyAction::OpenSearch(SearchDirection::Backward)),
        ('j', KeyAction::UrlSearch(SearchDirection::Forward)),
        ('k', KeyAction::UrlSearch(SearchDirection::Backward)),
    ];

    pub fn chord_modifiers() -> Modifiers {
        Modifiers::CONTROL | Modifiers::SHIFT
    }

    /// Look up the action for `event`; only exact Ctrl+Shift chords qualify
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        if event.modifiers != Self::chord_modifiers() {
            return None;
        }
        let key = event.key.to_lowercase().next()?;
        Self::BINDINGS
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, action)| *action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_binding_resolves_under_ctrl_shift() {
        for (key, action) in KeyAction::BINDINGS {
            assert_eq!(KeyAction::from_event(&KeyEvent::ctrl_shift(key)), Some(action));
        }
    }

    #[test]
    fn letters_are_case_insensitive() {
        assert_eq!(
            KeyAction::from_event(&KeyEvent::ctrl_shift('F')),
            Some(KeyAction::OpenSearch(SearchDirection::Forward))
        );
        assert_eq!(
            KeyAction::from_event(&KeyEvent::ctrl_shift('K')),
            Some(KeyAction::UrlSearch(SearchDirection::Backward))
        );
    }

    #[test]
    fn other_modifier_sets_do_not_match() {
        let sets = [
            Modifiers::empty(),
            Modifiers::CONTROL,
            Modifiers::SHIFT,
            Modifiers::CONTROL | Modifiers::SHIFT | Modifiers::ALT,
            Modifiers::CONTROL | Modifiers::SHIFT | Modifiers::SUPER,
            Modifiers::CONTROL | Modifiers::ALT,
        ];
        for modifiers in sets {
            for (key, _) in KeyAction::BINDINGS {
                assert_eq!(KeyAction::from_event(&KeyEvent::new(key, modifiers)), None);
            }
        }
    }

    #[test]
    fn unbound_keys_do_not_match() {
        for key in ['a', 'x', '1', ' '] {
            assert_eq!(KeyAction::from_event(&KeyEvent::ctrl_shift(key)), None);
        }
    }
}
