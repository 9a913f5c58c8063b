use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;

use super::roster_list::empty_message;
use super::theme::{self, ACCENT_GOLD, ACCENT_TEAL, TEXT_MAIN};
use super::Component;
use crate::action::Action;
use crate::record::{Feed, Record};
use crate::state::GALLERY_CARD_WIDTH;
use crate::store::FetchStatus;

pub const GALLERY_CARD_HEIGHT: u16 = 5;

/// Horizontal row of fixed-width cards, shifted left by the autoscroll offset.
pub struct GalleryStrip;

pub struct GalleryStripProps<'a> {
    pub records: &'a [Record],
    pub status: &'a FetchStatus,
    pub cursor: usize,
    pub offset: u32,
    pub autoscroll: bool,
    pub is_focused: bool,
}

fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

fn card_lines(record: &Record) -> [String; GALLERY_CARD_HEIGHT as usize] {
    let inner = usize::from(GALLERY_CARD_WIDTH) - 2;
    let rule = "─".repeat(inner);
    [
        format!("╭{rule}╮"),
        format!("│{}│", fit(&record.name, inner)),
        format!("│{}│", fit(&record.type_line(), inner)),
        format!("│{}│", fit(&format!("BST {}", record.stats.total()), inner)),
        format!("╰{rule}╯"),
    ]
}

impl Component<Action> for GalleryStrip {
    type Props<'a> = GalleryStripProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || props.records.is_empty() {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left | KeyCode::Char('h') => Some(Action::GalleryCursorPrev),
                KeyCode::Right | KeyCode::Char('l') => Some(Action::GalleryCursorNext),
                KeyCode::Enter => Some(Action::ViewerOpenGallery(props.cursor)),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let marker = if props.autoscroll { "auto" } else { "paused" };
        let title = format!(" Gallery ({}) [{marker}] ", props.records.len());
        let block = theme::panel(&title, props.is_focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if props.records.is_empty() {
            let message = Paragraph::new(empty_message(Feed::Gallery, props.status))
                .style(theme::dim())
                .alignment(Alignment::Center);
            frame.render_widget(message, inner);
            return;
        }

        let card_width = u32::from(GALLERY_CARD_WIDTH);
        let view_start = props.offset;
        let view_end = view_start + u32::from(inner.width);
        let rows = inner.height.min(GALLERY_CARD_HEIGHT);
        let buffer = frame.buffer_mut();

        for (index, record) in props.records.iter().enumerate() {
            let card_start = index as u32 * card_width;
            let card_end = card_start + card_width;
            if card_end <= view_start {
                continue;
            }
            if card_start >= view_end {
                break;
            }
            let cut_left = view_start.saturating_sub(card_start) as usize;
            let visible_end = card_end.min(view_end);
            let visible = (visible_end - card_start.max(view_start)) as usize;
            let x = inner.x + (card_start.max(view_start) - view_start) as u16;

            let style = if index == props.cursor && props.is_focused {
                Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD)
            } else if index == props.cursor {
                Style::default().fg(ACCENT_TEAL)
            } else {
                Style::default().fg(TEXT_MAIN)
            };
            for (row, line) in card_lines(record).iter().take(rows as usize).enumerate() {
                let clipped: String = line.chars().skip(cut_left).take(visible).collect();
                buffer.set_stringn(x, inner.y + row as u16, clipped, visible, style);
            }
        }
    }
}
