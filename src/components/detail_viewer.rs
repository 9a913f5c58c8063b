use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::theme::{self, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL_ALT};
use super::Component;
use crate::action::Action;
use crate::record::Record;
use crate::sprite_backend::{place_sprite, SPRITE_ID_VIEWER};
use crate::viewer::{DisplayMode, ViewerSession};

pub struct DetailViewer {
    modal: Modal,
}

pub struct DetailViewerProps<'a> {
    pub session: &'a ViewerSession,
    pub record: Option<&'a Record>,
    pub len: usize,
    pub is_focused: bool,
}

impl Default for DetailViewer {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl DetailViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Area the modal occupies inside `area`.
    pub fn modal_area(area: Rect) -> Rect {
        centered_rect(64, 22, area)
    }
}

fn stat_cell(label: &str, value: u16) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!("{label:<9}"), theme::dim()),
        Span::styled(format!("{value:>4}"), theme::strong()),
    ]
}

fn stat_row(left: (&str, u16), right: (&str, u16)) -> Line<'static> {
    let mut spans = stat_cell(left.0, left.1);
    spans.push(Span::raw("      "));
    spans.extend(stat_cell(right.0, right.1));
    Line::from(spans)
}

/// Base stats as three rows of two columns.
pub fn stats_lines(record: &Record) -> Vec<Line<'static>> {
    let stats = record.stats;
    vec![
        stat_row(("HP", stats.hp), ("Speed", stats.speed)),
        stat_row(("Attack", stats.attack), ("Defense", stats.defense)),
        stat_row(
            ("Sp. Atk", stats.special_attack),
            ("Sp. Def", stats.special_defense),
        ),
    ]
}

pub fn descriptive_lines(record: &Record) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Type     ", theme::dim()),
            Span::styled(record.type_line(), theme::strong()),
        ]),
        Line::from(vec![
            Span::styled("Height   ", theme::dim()),
            Span::styled(format!("{:.1} m", record.height), theme::strong()),
            Span::styled("    Weight   ", theme::dim()),
            Span::styled(format!("{:.1} kg", record.weight), theme::strong()),
        ]),
        Line::from(Span::styled("Abilities", theme::dim())),
    ];
    lines.extend(
        record
            .abilities
            .iter()
            .map(|ability| Line::from(format!("  • {ability}"))),
    );
    lines
}

fn render_body(frame: &mut Frame, area: Rect, props: &DetailViewerProps<'_>) {
    let title = format!(" {} ", props.session.feed.label());
    let block = theme::panel(&title, props.is_focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(record) = props.record else {
        let empty = Paragraph::new("Nothing to show").style(theme::dim());
        frame.render_widget(empty, inner);
        return;
    };

    let body = match props.session.mode {
        DisplayMode::Stats => stats_lines(record),
        DisplayMode::Descriptive => descriptive_lines(record),
    };
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(body.len() as u16),
        Constraint::Length(1),
    ])
    .split(inner);

    let header = Line::from(vec![
        Span::styled("<  ", Style::default().fg(ACCENT_TEAL)),
        Span::styled(record.name.clone(), theme::strong()),
        Span::styled("  >", Style::default().fg(ACCENT_TEAL)),
        Span::styled(
            format!("   {}/{}", props.session.index + 1, props.len),
            theme::dim(),
        ),
    ]);
    frame.render_widget(Paragraph::new(header).alignment(Alignment::Center), rows[0]);

    let placed = record
        .image
        .as_ref()
        .is_some_and(|sprite| place_sprite(SPRITE_ID_VIEWER, rows[1], sprite, 0));
    if !placed {
        let missing = Paragraph::new("[no image]")
            .style(theme::dim())
            .alignment(Alignment::Center);
        frame.render_widget(missing, rows[1]);
    }

    frame.render_widget(Paragraph::new(body), rows[2]);

    let pick = match props.session.slot_target {
        Some(label) => format!("Enter pick for {}", label.title()),
        None => String::new(),
    };
    let toggle = match props.session.mode {
        DisplayMode::Stats => "i info",
        DisplayMode::Descriptive => "i stats",
    };
    let footer = Line::from(Span::styled(
        format!("←/→ page   {toggle}   {pick}   Esc close"),
        Style::default().fg(ACCENT_GOLD),
    ));
    frame.render_widget(Paragraph::new(footer).alignment(Alignment::Center), rows[3]);
}

impl Component<Action> for DetailViewer {
    type Props<'a> = DetailViewerProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left | KeyCode::Char('h') => Some(Action::ViewerPrev),
                KeyCode::Right | KeyCode::Char('l') => Some(Action::ViewerNext),
                KeyCode::Char('i') => Some(Action::ViewerToggleMode),
                KeyCode::Enter => Some(Action::ViewerConfirm),
                KeyCode::Esc => Some(Action::ViewerClose),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let modal_area = Self::modal_area(area);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            render_body(frame, content_area, &props);
        };
        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(BG_PANEL_ALT),
                        padding: Padding::default(),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::ViewerClose,
                render_content: &mut render_content,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BaseStats, Feed};
    use crate::slots::SlotLabel;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn pikachu() -> Record {
        Record {
            name: "Pikachu".into(),
            stats: BaseStats {
                hp: 35,
                attack: 55,
                defense: 40,
                special_attack: 50,
                special_defense: 50,
                speed: 90,
            },
            types: vec!["Electric".into()],
            height: 0.4,
            weight: 6.0,
            abilities: vec!["Static".into(), "Lightning Rod".into()],
            image: None,
        }
    }

    fn session(mode: DisplayMode) -> ViewerSession {
        ViewerSession {
            feed: Feed::Ranked,
            index: 0,
            slot_target: Some(SlotLabel::A),
            mode,
        }
    }

    fn render(mode: DisplayMode) -> String {
        let record = pikachu();
        let session = session(mode);
        let mut viewer = DetailViewer::new();
        let mut harness = RenderHarness::new(80, 26);
        harness.render_to_string_plain(|frame| {
            viewer.render(
                frame,
                frame.area(),
                DetailViewerProps {
                    session: &session,
                    record: Some(&record),
                    len: 3,
                    is_focused: true,
                },
            );
        })
    }

    #[test]
    fn stats_mode_shows_paired_stats() {
        let output = render(DisplayMode::Stats);
        assert!(output.contains("Pikachu"));
        assert!(output.contains("1/3"));
        assert!(output.contains("HP"));
        assert!(output.contains("Speed"));
        assert!(output.contains("Sp. Def"));
        assert!(!output.contains("Abilities"));
    }

    #[test]
    fn descriptive_mode_shows_types_and_abilities() {
        let output = render(DisplayMode::Descriptive);
        assert!(output.contains("Electric"));
        assert!(output.contains("0.4 m"));
        assert!(output.contains("6.0 kg"));
        assert!(output.contains("• Lightning Rod"));
        assert!(!output.contains("Sp. Atk"));
    }

    #[test]
    fn keys_map_to_viewer_actions() {
        let record = pikachu();
        let session = session(DisplayMode::Stats);
        let mut viewer = DetailViewer::new();
        let mut send = |code: KeyCode| -> Vec<Action> {
            viewer
                .handle_event(
                    &EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE)),
                    DetailViewerProps {
                        session: &session,
                        record: Some(&record),
                        len: 3,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect()
        };
        send(KeyCode::Left).assert_first(Action::ViewerPrev);
        send(KeyCode::Char('l')).assert_first(Action::ViewerNext);
        send(KeyCode::Char('i')).assert_first(Action::ViewerToggleMode);
        send(KeyCode::Enter).assert_first(Action::ViewerConfirm);
        send(KeyCode::Esc).assert_first(Action::ViewerClose);
        send(KeyCode::Char('z')).assert_empty();
    }
}
