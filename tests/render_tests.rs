//! Render tests using RenderHarness

use pokebattle::{
    components::{
        BattleScreen, BattleScreenProps, Component, DetailViewer, DetailViewerProps,
        EMPTY_SLOT_MARK,
    },
    record::{BaseStats, Feed, Record},
    slots::SlotLabel,
    state::AppState,
    viewer::DisplayMode,
};
use tui_dispatch::testing::*;

fn charizard() -> Record {
    Record {
        name: "Charizard".into(),
        stats: BaseStats {
            hp: 78,
            attack: 84,
            defense: 78,
            special_attack: 109,
            special_defense: 85,
            speed: 100,
        },
        types: vec!["Fire".into(), "Flying".into()],
        height: 1.7,
        weight: 90.5,
        abilities: vec!["Blaze".into(), "Solar Power".into()],
        image: None,
    }
}

/// Narrowest supported terminal and a roomy one.
const WIDTHS: [u16; 2] = [80, 100];

fn render_screen(state: &AppState, width: u16) -> String {
    let mut render = RenderHarness::new(width, 32);
    let mut screen = BattleScreen::new();
    render.render_to_string_plain(|frame| {
        let props = BattleScreenProps {
            state,
            is_focused: true,
        };
        screen.render(frame, frame.area(), props);
    })
}

#[test]
fn test_render_both_feeds_failed() {
    let mut state = AppState::default();
    for feed in [Feed::Ranked, Feed::Gallery] {
        let generation = state.store.begin_load(feed);
        state
            .store
            .apply_failed(feed, generation, "HTTP status 503".into());
    }

    for width in WIDTHS {
        let output = render_screen(&state, width);

        let placeholders: usize = output
            .lines()
            .map(|line| line.matches(EMPTY_SLOT_MARK).count())
            .sum();
        assert_eq!(placeholders, 2, "expected two empty slots:\n{output}");
        assert!(output.contains("The gallery list is unavailable"), "{output}");
        assert!(output.contains("ranked: failed"), "{width} cols:\n{output}");
        assert!(output.contains("gallery: failed"), "{width} cols:\n{output}");
    }
}

#[test]
fn test_render_loading_state() {
    let mut state = AppState::default();
    state.store.begin_load(Feed::Ranked);
    state.store.begin_load(Feed::Gallery);

    for width in WIDTHS {
        let output = render_screen(&state, width);

        assert!(output.contains("Loading ranked list..."), "{output}");
        assert!(output.contains("Loading gallery list..."), "{output}");
        assert!(output.contains("ranked: | loading"), "{width} cols:\n{output}");
    }
}

#[test]
fn test_render_filled_slot() {
    let mut state = AppState::default();
    state.slots.set(SlotLabel::B, charizard());

    let output = render_screen(&state, 100);

    assert!(output.contains("Charizard"));
    assert!(output.contains("Fire, Flying"));
    let placeholders: usize = output
        .lines()
        .map(|line| line.matches(EMPTY_SLOT_MARK).count())
        .sum();
    assert_eq!(placeholders, 1);
}

#[test]
fn test_render_status_bar() {
    let mut state = AppState::default();
    for width in WIDTHS {
        let output = render_screen(&state, width);

        assert!(output.contains("ranked: idle"), "{width} cols:\n{output}");
        assert!(output.contains("gallery: idle"), "{width} cols:\n{output}");
        assert!(output.contains("autoscroll on"), "{width} cols:\n{output}");
        assert!(output.contains("quit"), "{width} cols:\n{output}");
    }

    state.autoscroll_enabled = false;
    for width in WIDTHS {
        let output = render_screen(&state, width);
        assert!(output.contains("autoscroll off"), "{width} cols:\n{output}");
    }
}

#[test]
fn test_render_viewer_modes() {
    let mut state = AppState::default();
    let generation = state.store.begin_load(Feed::Ranked);
    state
        .store
        .apply_loaded(Feed::Ranked, generation, vec![charizard()]);
    state
        .viewer
        .open_for(Feed::Ranked, 1, 0, Some(SlotLabel::A));

    let mut render = RenderHarness::new(90, 30);
    let mut viewer = DetailViewer::new();
    let mut draw = |state: &AppState| {
        render.render_to_string_plain(|frame| {
            let Some(session) = state.viewer.session() else {
                return;
            };
            let props = DetailViewerProps {
                session,
                record: state.viewed_record(),
                len: state.store.len(session.feed),
                is_focused: true,
            };
            viewer.render(frame, frame.area(), props);
        })
    };

    let stats = draw(&state);
    assert!(stats.contains("Charizard"), "{stats}");
    assert!(stats.contains("109"));
    assert!(stats.contains("[no image]"));
    assert!(stats.contains("Enter pick for FIGHTER 1"), "{stats}");

    state.viewer.toggle_display_mode();
    assert_eq!(state.viewer.mode(), Some(DisplayMode::Descriptive));
    let info = draw(&state);
    assert!(info.contains("1.7 m"), "{info}");
    assert!(info.contains("90.5 kg"));
    assert!(info.contains("• Solar Power"));
}
