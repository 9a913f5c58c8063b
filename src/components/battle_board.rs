use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::theme::{ACCENT_GOLD, TEXT_DIM};
use super::{Component, SlotCard, SlotCardProps, VsTitle, VsTitleProps};
use crate::action::Action;
use crate::slots::SlotLabel;
use crate::state::AppState;

pub const START_BATTLE_LABEL: &str = "Start Battle";

/// The two slot cards, the title between them and the start button.
#[derive(Default)]
pub struct BattleBoard;

pub struct BattleBoardProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Component<Action> for BattleBoard {
    type Props<'a> = BattleBoardProps<'a>;

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
                KeyCode::Char('1') | KeyCode::Left => Some(Action::SlotSelect(SlotLabel::A)),
                KeyCode::Char('2') | KeyCode::Right => Some(Action::SlotSelect(SlotLabel::B)),
                KeyCode::Enter => Some(Action::ViewerOpenSlot(props.state.active_slot)),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let rows = Layout::vertical([Constraint::Min(4), Constraint::Length(3)]).split(area);
        let columns = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(12),
            Constraint::Fill(1),
        ])
        .split(rows[0]);

        for (label, column) in [(SlotLabel::A, columns[0]), (SlotLabel::B, columns[2])] {
            let card = SlotCardProps {
                label,
                record: state.slots.get(label),
                is_active: state.active_slot == label,
                is_focused: props.is_focused,
            };
            SlotCard.render(frame, column, card);
        }

        let [vs_area] = Layout::vertical([Constraint::Length(6)])
            .flex(Flex::Center)
            .areas(columns[1]);
        VsTitle.render(
            frame,
            vs_area,
            VsTitleProps {
                flash: state.title_flash(),
            },
        );

        // No key starts a battle; the button only lights up once both slots are set.
        let color = if state.slots.both_filled() {
            ACCENT_GOLD
        } else {
            TEXT_DIM
        };
        let [button_area] = Layout::horizontal([Constraint::Length(20)])
            .flex(Flex::Center)
            .areas(rows[1]);
        let button = Paragraph::new(START_BATTLE_LABEL)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Thick)
                    .border_style(Style::default().fg(color)),
            );
        frame.render_widget(button, button_area);
    }
}
