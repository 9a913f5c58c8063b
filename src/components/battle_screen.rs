use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::theme::{ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use super::{
    BattleBoard, BattleBoardProps, Component, GalleryStrip, GalleryStripProps, RosterList,
    RosterListProps,
};
use crate::action::Action;
use crate::record::Feed;
use crate::state::{AppState, Focus};
use crate::store::FetchStatus;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Everything below the viewer modal: board, roster, gallery, key hints and
/// status bar.
pub struct BattleScreen {
    board: BattleBoard,
    roster: RosterList,
    gallery: GalleryStrip,
    hint_bar: StatusBar,
    status_bar: StatusBar,
}

pub struct BattleScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Default for BattleScreen {
    fn default() -> Self {
        Self {
            board: BattleBoard,
            roster: RosterList::new(),
            gallery: GalleryStrip,
            hint_bar: StatusBar::new(),
            status_bar: StatusBar::new(),
        }
    }
}

impl BattleScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn delegate(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        match state.focus {
            Focus::Board => self
                .board
                .handle_event(
                    event,
                    BattleBoardProps {
                        state,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect(),
            Focus::Roster => self
                .roster
                .handle_event(
                    event,
                    RosterListProps {
                        records: state.store.collection(Feed::Ranked),
                        status: state.store.status(Feed::Ranked),
                        selected: state.roster_selected,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect(),
            Focus::Gallery => self
                .gallery
                .handle_event(event, gallery_props(state, true))
                .into_iter()
                .collect(),
        }
    }
}

fn gallery_props(state: &AppState, is_focused: bool) -> GalleryStripProps<'_> {
    GalleryStripProps {
        records: state.store.collection(Feed::Gallery),
        status: state.store.status(Feed::Gallery),
        cursor: state.gallery_cursor,
        offset: state.autoscroll.offset,
        autoscroll: state.autoscroll_enabled,
        is_focused,
    }
}

/// Short per-feed status shown in the status bar.
pub fn feed_status_text(state: &AppState, feed: Feed) -> String {
    let label = feed.label();
    match state.store.status(feed) {
        FetchStatus::Idle => format!("{label}: idle"),
        FetchStatus::Loading => {
            let frame = SPINNER[state.tick_count as usize % SPINNER.len()];
            format!("{label}: {frame} loading")
        }
        FetchStatus::Ready => format!("{label}: {}", state.store.len(feed)),
        FetchStatus::Failed(_) => format!("{label}: failed"),
    }
}

fn feed_status_style(status: &FetchStatus) -> Style {
    match status {
        FetchStatus::Failed(_) => Style::default().fg(ACCENT_RED),
        FetchStatus::Loading => Style::default().fg(ACCENT_GOLD),
        FetchStatus::Idle | FetchStatus::Ready => Style::default().fg(TEXT_DIM),
    }
}

fn focus_hints(focus: Focus) -> Vec<StatusBarHint<'static>> {
    let mut hints = vec![StatusBarHint::new("Tab", "focus")];
    match focus {
        Focus::Board => hints.extend([
            StatusBarHint::new("1/2", "slot"),
            StatusBarHint::new("Enter", "pick"),
        ]),
        Focus::Roster => hints.extend([
            StatusBarHint::new("↑/↓", "move"),
            StatusBarHint::new("Enter", "view"),
        ]),
        Focus::Gallery => hints.extend([
            StatusBarHint::new("←/→", "card"),
            StatusBarHint::new("Enter", "view"),
        ]),
    }
    hints.extend([
        StatusBarHint::new("s", "scroll"),
        StatusBarHint::new("r", "reload"),
        StatusBarHint::new("q", "quit"),
    ]);
    hints
}

fn status_bar_style() -> StatusBarStyle {
    StatusBarStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: None,
        },
        text: Style::default().fg(TEXT_MAIN),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    }
}

impl Component<Action> for BattleScreen {
    type Props<'a> = BattleScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Tab => vec![Action::FocusNext],
            KeyCode::BackTab => vec![Action::FocusPrev],
            KeyCode::Char('s') => vec![Action::AutoscrollToggle],
            KeyCode::Char('r') | KeyCode::F(5) => vec![Action::FeedsReload],
            KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
            _ => self.delegate(event, props.state),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let chunks = Layout::vertical([
            Constraint::Length(14), // Slots and title
            Constraint::Min(6),     // Ranked roster
            Constraint::Length(7),  // Gallery strip
            Constraint::Length(1),  // Key hints
            Constraint::Length(1),  // Fetch and scroll status
        ])
        .split(area);

        self.board.render(
            frame,
            chunks[0],
            BattleBoardProps {
                state,
                is_focused: props.is_focused && state.focus == Focus::Board,
            },
        );
        self.roster.render(
            frame,
            chunks[1],
            RosterListProps {
                records: state.store.collection(Feed::Ranked),
                status: state.store.status(Feed::Ranked),
                selected: state.roster_selected,
                is_focused: props.is_focused && state.focus == Focus::Roster,
            },
        );
        self.gallery.render(
            frame,
            chunks[2],
            gallery_props(state, props.is_focused && state.focus == Focus::Gallery),
        );

        let hints = focus_hints(state.focus);
        Component::<Action>::render(
            &mut self.hint_bar,
            frame,
            chunks[3],
            StatusBarProps {
                left: StatusBarSection::hints(&hints).with_separator(" "),
                center: StatusBarSection::empty(),
                right: StatusBarSection::empty(),
                style: status_bar_style(),
                is_focused: false,
            },
        );

        // Hints take the whole left section, so fetch status gets its own row.
        let ranked_text = feed_status_text(state, Feed::Ranked);
        let gallery_text = feed_status_text(state, Feed::Gallery);
        let feed_items = [
            StatusBarItem::span(Span::styled(
                ranked_text.as_str(),
                feed_status_style(state.store.status(Feed::Ranked)),
            )),
            StatusBarItem::span(Span::styled(
                gallery_text.as_str(),
                feed_status_style(state.store.status(Feed::Gallery)),
            )),
        ];
        let scroll_text = if state.autoscroll_enabled {
            "autoscroll on"
        } else {
            "autoscroll off"
        };
        let scroll_items = [StatusBarItem::span(Span::styled(
            scroll_text,
            Style::default().fg(ACCENT_GOLD),
        ))];

        Component::<Action>::render(
            &mut self.status_bar,
            frame,
            chunks[4],
            StatusBarProps {
                left: StatusBarSection::items(&feed_items).with_separator("  "),
                center: StatusBarSection::empty(),
                right: StatusBarSection::items(&scroll_items),
                style: status_bar_style(),
                is_focused: false,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn press(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn actions_for(event: EventKind, state: &AppState) -> Vec<Action> {
        let mut screen = BattleScreen::new();
        screen
            .handle_event(
                &event,
                BattleScreenProps {
                    state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect()
    }

    #[test]
    fn global_keys_work_from_any_focus() {
        for focus in [Focus::Board, Focus::Roster, Focus::Gallery] {
            let state = AppState {
                focus,
                ..Default::default()
            };
            actions_for(press(KeyCode::Tab), &state).assert_first(Action::FocusNext);
            actions_for(press(KeyCode::BackTab), &state).assert_first(Action::FocusPrev);
            actions_for(EventKind::Key(key("s")), &state).assert_first(Action::AutoscrollToggle);
            actions_for(EventKind::Key(key("r")), &state).assert_first(Action::FeedsReload);
            actions_for(EventKind::Key(key("q")), &state).assert_first(Action::Quit);
        }
    }

    #[test]
    fn enter_goes_to_focused_child() {
        let mut state = AppState {
            focus: Focus::Gallery,
            gallery_cursor: 1,
            ..Default::default()
        };
        let generation = state.store.begin_load(Feed::Gallery);
        state.store.apply_loaded(
            Feed::Gallery,
            generation,
            vec![Record::default(), Record::default()],
        );
        actions_for(press(KeyCode::Enter), &state).assert_first(Action::ViewerOpenGallery(1));

        state.focus = Focus::Board;
        actions_for(press(KeyCode::Enter), &state)
            .assert_first(Action::ViewerOpenSlot(state.active_slot));
    }

    #[test]
    fn unfocused_screen_ignores_keys() {
        let state = AppState::default();
        let mut screen = BattleScreen::new();
        let actions: Vec<_> = screen
            .handle_event(
                &EventKind::Key(key("q")),
                BattleScreenProps {
                    state: &state,
                    is_focused: false,
                },
            )
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn feed_status_text_follows_fetch_status() {
        let mut state = AppState::default();
        assert_eq!(feed_status_text(&state, Feed::Ranked), "ranked: idle");

        let generation = state.store.begin_load(Feed::Ranked);
        assert!(feed_status_text(&state, Feed::Ranked).ends_with("loading"));

        state.store.apply_failed(Feed::Ranked, generation, "boom".into());
        assert_eq!(feed_status_text(&state, Feed::Ranked), "ranked: failed");
    }

    fn render_at(state: &AppState, width: u16) -> String {
        let mut screen = BattleScreen::new();
        let mut render = RenderHarness::new(width, 34);
        render.render_to_string_plain(|frame| {
            screen.render(
                frame,
                frame.area(),
                BattleScreenProps {
                    state,
                    is_focused: true,
                },
            );
        })
    }

    #[test]
    fn renders_placeholders_when_both_feeds_fail() {
        let mut state = AppState::default();
        for feed in [Feed::Ranked, Feed::Gallery] {
            let generation = state.store.begin_load(feed);
            state.store.apply_failed(feed, generation, "offline".into());
        }

        for width in [80, 100] {
            let output = render_at(&state, width);

            let placeholder_row = output
                .lines()
                .find(|line| line.contains(crate::components::EMPTY_SLOT_MARK))
                .unwrap_or_default();
            assert!(output.contains("FIGHTER 1"));
            assert!(output.contains("FIGHTER 2"));
            assert_eq!(
                placeholder_row
                    .matches(crate::components::EMPTY_SLOT_MARK)
                    .count(),
                2
            );
            assert!(output.contains("The gallery list is unavailable: offline"));
            assert!(output.contains("The ranked list is unavailable: offline"));
            assert!(output.contains("ranked: failed"), "{width} cols:\n{output}");
            assert!(output.contains("gallery: failed"), "{width} cols:\n{output}");
        }
    }

    #[test]
    fn hints_and_fetch_status_share_no_row() {
        let mut state = AppState::default();
        state.store.begin_load(Feed::Gallery);

        for width in [80, 100] {
            let output = render_at(&state, width);
            let hint_row = output
                .lines()
                .find(|line| line.contains("quit"))
                .unwrap_or_default();
            let status_row = output
                .lines()
                .find(|line| line.contains("ranked: idle"))
                .unwrap_or_default();

            assert!(!hint_row.contains("ranked:"), "{width} cols:\n{output}");
            assert!(status_row.contains("gallery: | loading"), "{width} cols:\n{output}");
            assert!(status_row.contains("autoscroll on"), "{width} cols:\n{output}");
        }
    }
}
