use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::theme::{self, ACCENT_GOLD};
use super::Component;
use crate::action::Action;
use crate::record::Record;
use crate::slots::SlotLabel;
use crate::sprite_backend::{place_sprite, slot_sprite_id};

/// Drawn in place of a record while the slot is empty.
pub const EMPTY_SLOT_MARK: &str = "+";

pub struct SlotCard;

pub struct SlotCardProps<'a> {
    pub label: SlotLabel,
    pub record: Option<&'a Record>,
    /// Roster and gallery picks go to this slot.
    pub is_active: bool,
    pub is_focused: bool,
}

impl Component<Action> for SlotCard {
    type Props<'a> = SlotCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let title = if props.is_active {
            format!(" {} * ", props.label.title())
        } else {
            format!(" {} ", props.label.title())
        };
        let block = theme::panel(&title, props.is_focused && props.is_active);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(record) = props.record else {
            let rows = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .split(inner);
            let mark = Paragraph::new(Line::from(Span::styled(
                EMPTY_SLOT_MARK,
                Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(mark, rows[1]);
            return;
        };

        let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        let placed = record
            .image
            .as_ref()
            .is_some_and(|sprite| place_sprite(slot_sprite_id(props.label), rows[0], sprite, 0));
        if !placed {
            let types = Line::from(Span::styled(record.type_line(), theme::dim()));
            frame.render_widget(Paragraph::new(types).alignment(Alignment::Center), rows[0]);
        }
        let name = Line::from(Span::styled(record.name.as_str(), theme::strong()));
        frame.render_widget(Paragraph::new(name).alignment(Alignment::Center), rows[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    #[test]
    fn empty_slot_shows_placeholder() {
        let mut render = RenderHarness::new(24, 8);
        let output = render.render_to_string_plain(|frame| {
            let props = SlotCardProps {
                label: SlotLabel::A,
                record: None,
                is_active: false,
                is_focused: false,
            };
            SlotCard.render(frame, frame.area(), props);
        });
        assert!(output.contains("FIGHTER 1"));
        assert!(output.contains(EMPTY_SLOT_MARK));
    }

    #[test]
    fn filled_slot_shows_name_and_marks_active() {
        let record = Record {
            name: "Gengar".into(),
            types: vec!["Ghost".into(), "Poison".into()],
            ..Default::default()
        };
        let mut render = RenderHarness::new(24, 8);
        let output = render.render_to_string_plain(|frame| {
            let props = SlotCardProps {
                label: SlotLabel::B,
                record: Some(&record),
                is_active: true,
                is_focused: true,
            };
            SlotCard.render(frame, frame.area(), props);
        });
        assert!(output.contains("FIGHTER 2 *"));
        assert!(output.contains("Gengar"));
        assert!(output.contains("Ghost, Poison"));
        assert!(!output.contains(EMPTY_SLOT_MARK));
    }
}
