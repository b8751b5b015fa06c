// tests/search_scenarios.rs
//! End-to-end scenarios for the search and URL-match dispatch, run against
//! the headless backend

use termlite_core::constants::{URL_COMMAND, URL_REGEX};
use termlite_core::dummy_backend::{MemorySurface, RecordingLauncher, RecordingToolkit};
use termlite_core::{
    ButtonEvent, DialogResponse, KeyEvent, MatchPattern, Modifiers, SearchAndMatchController,
    SearchDirection, SearchPattern, TerminalEvent, TerminalSurface, WindowingToolkit,
};

type Controller = SearchAndMatchController<<RecordingToolkit as WindowingToolkit>::Dialog>;

struct Harness {
    controller: Controller,
    surface: MemorySurface,
    toolkit: RecordingToolkit,
    launcher: RecordingLauncher,
}

impl Harness {
    fn new(lines: &[&str]) -> Self {
        let mut surface = MemorySurface::with_lines(lines).with_cell_size(10.0, 20.0);
        surface.register_match(MatchPattern::new(URL_REGEX).unwrap());
        Self {
            controller: Controller::default(),
            surface,
            toolkit: RecordingToolkit::default(),
            launcher: RecordingLauncher::default(),
        }
    }

    fn send(&mut self, event: TerminalEvent) -> bool {
        self.controller
            .dispatch(event, &mut self.surface, &mut self.toolkit, &self.launcher)
    }

    fn chord(&mut self, key: char) -> bool {
        self.send(TerminalEvent::Key(KeyEvent::ctrl_shift(key)))
    }

    fn respond(&mut self, response: DialogResponse) {
        self.send(TerminalEvent::DialogResponse(response));
    }

    fn respond_from(&mut self, id: u64, response: DialogResponse) -> bool {
        self.controller
            .on_tagged_response(id, &mut self.surface, &mut self.toolkit, response)
    }
}

#[test]
fn forward_search_selects_and_copies_foo() {
    let mut h = Harness::new(&["xxfooyy"]);

    assert!(h.chord('f'));
    h.respond(DialogResponse::Accepted("foo".into()));

    assert_eq!(h.surface.primary(), Some("foo"));
    assert_eq!(h.surface.primary_copies(), 1);
    assert!(!h.controller.session().is_open());
}

#[test]
fn each_accepted_search_copies_once_in_either_direction() {
    for (key, direction) in [('f', SearchDirection::Forward), ('b', SearchDirection::Backward)] {
        let mut h = Harness::new(&["foo", "bar", "foo"]);
        h.chord(key);
        assert_eq!(h.controller.session().direction(), direction);
        h.respond(DialogResponse::Accepted("foo".into()));
        assert_eq!(h.surface.primary_copies(), 1, "direction {direction:?}");
    }
}

#[test]
fn double_trigger_opens_one_dialog() {
    let mut h = Harness::new(&["text"]);
    h.chord('f');
    h.chord('f');
    h.chord('b');

    assert!(h.controller.session().is_open());
    assert_eq!(h.controller.session().direction(), SearchDirection::Forward);
    assert_eq!(h.toolkit.presented(), 1);
}

#[test]
fn dialog_can_be_reopened_after_closing() {
    let mut h = Harness::new(&["text"]);
    h.chord('f');
    h.respond(DialogResponse::Closed);
    h.chord('b');

    assert!(h.controller.session().is_open());
    assert_eq!(h.controller.session().direction(), SearchDirection::Backward);
    assert_eq!(h.toolkit.presented(), 2);
    assert_eq!(h.toolkit.live_dialogs(), 1);
}

#[test]
fn closed_from_teardown_of_finished_dialog_is_dropped() {
    let mut h = Harness::new(&["xxfooyy"]);
    h.chord('f');
    assert!(h.respond_from(1, DialogResponse::Accepted("foo".into())));
    assert_eq!(h.toolkit.destroyed(), 1);

    // destroying the window reports Closed for the same dialog
    assert!(!h.respond_from(1, DialogResponse::Closed));
    assert_eq!(h.toolkit.destroyed(), 1);
    assert_eq!(h.surface.primary_copies(), 1);
}

#[test]
fn stale_response_does_not_close_the_new_dialog() {
    let mut h = Harness::new(&["xxfooyy"]);
    h.chord('f');
    h.respond_from(1, DialogResponse::Cancelled);
    h.chord('b');

    assert!(!h.respond_from(1, DialogResponse::Closed));
    assert!(!h.respond_from(7, DialogResponse::Accepted("foo".into())));
    assert!(h.controller.session().is_open());
    assert_eq!(h.surface.primary_copies(), 0);

    assert!(h.respond_from(2, DialogResponse::Accepted("foo".into())));
    assert!(!h.controller.session().is_open());
    assert_eq!(h.surface.primary(), Some("foo"));
    assert_eq!(h.toolkit.live_dialogs(), 0);
}

#[test]
fn invalid_pattern_leaves_active_pattern_unchanged() {
    let mut h = Harness::new(&["abc"]);
    h.surface
        .set_search_pattern(Some(SearchPattern::new("b").unwrap()));

    h.chord('f');
    h.respond(DialogResponse::Accepted("(".into()));

    assert_eq!(h.surface.search_pattern().unwrap().as_str(), "b");
    assert!(!h.controller.session().is_open());
    assert_eq!(h.surface.primary_copies(), 0);
}

#[test]
fn set_then_get_pattern_round_trips() {
    let mut surface = MemorySurface::new();
    for source in ["foo", "^\\s+$", "[a-z]{2,}", "(ftp|http)s?://"] {
        surface.set_search_pattern(Some(SearchPattern::new(source).unwrap()));
        assert_eq!(surface.search_pattern().unwrap().as_str(), source);
    }
}

#[test]
fn chord_table_is_exclusive_to_ctrl_shift() {
    let mut h = Harness::new(&["foo"]);
    let others = [
        Modifiers::empty(),
        Modifiers::CONTROL,
        Modifiers::SHIFT,
        Modifiers::ALT | Modifiers::SHIFT,
        Modifiers::CONTROL | Modifiers::SHIFT | Modifiers::META,
    ];

    for key in ['c', 'v', 'p', 'n', 'j', 'k'] {
        assert!(h.chord(key), "ctrl+shift+{key} should be handled");
        for modifiers in others {
            let event = TerminalEvent::Key(KeyEvent::new(key, modifiers));
            assert!(!h.send(event), "{key} with {modifiers:?} should fall through");
        }
    }
}

#[test]
fn find_next_and_previous_wrap_through_scrollback() {
    let mut lines = vec!["match 0"];
    lines.extend(std::iter::repeat("filler").take(40));
    lines.push("match 1");
    let mut h = Harness::new(&lines);
    h.surface
        .set_search_pattern(Some(SearchPattern::new(r"match \d").unwrap()));

    // Forward starts at the viewport, which only shows "match 1"
    h.chord('n');
    assert_eq!(h.surface.primary(), Some("match 1"));
    h.chord('n');
    assert_eq!(h.surface.primary(), Some("match 0"));
    h.chord('p');
    assert_eq!(h.surface.primary(), Some("match 1"));
}

#[test]
fn clicking_a_url_spawns_the_handler_once() {
    let mut h = Harness::new(&["open https://example.org/page please"]);

    let on_url = ButtonEvent::primary(10.0 * 8.0 + 3.0, 5.0);
    assert!(h.send(TerminalEvent::ButtonPress(on_url)));

    let off_url = ButtonEvent::primary(3.0, 5.0);
    assert!(!h.send(TerminalEvent::ButtonPress(off_url)));

    assert_eq!(
        h.launcher.launched(),
        vec![(URL_COMMAND.to_string(), "https://example.org/page".to_string())]
    );
}

#[test]
fn url_chord_then_copy_puts_url_on_clipboard() {
    let mut h = Harness::new(&["see http://one.example and http://two.example"]);

    h.chord('k');
    assert_eq!(h.surface.primary(), Some("http://two.example"));
    h.chord('c');
    assert_eq!(h.surface.clipboard(), Some("http://two.example"));
}
