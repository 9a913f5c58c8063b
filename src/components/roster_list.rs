use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle,
};

use super::theme::{self, ACCENT_GOLD, BG_HIGHLIGHT, TEXT_MAIN};
use super::Component;
use crate::action::Action;
use crate::record::{Feed, Record};
use crate::store::FetchStatus;

/// Ranked records, one per row; Enter opens the viewer on the row.
pub struct RosterList {
    list: SelectList,
}

pub struct RosterListProps<'a> {
    pub records: &'a [Record],
    pub status: &'a FetchStatus,
    pub selected: usize,
    pub is_focused: bool,
}

impl Default for RosterList {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
        }
    }
}

impl RosterList {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(records: &[Record]) -> Vec<Line<'static>> {
        records
            .iter()
            .enumerate()
            .map(|(rank, record)| {
                Line::from(vec![
                    Span::styled(format!("{:>3} ", rank + 1), theme::dim()),
                    Span::styled(format!("{:<14}", record.name), theme::strong()),
                    Span::styled(format!("{:<18}", record.type_line()), theme::dim()),
                    Span::styled(
                        format!("BST {}", record.stats.total()),
                        Style::default().fg(ACCENT_GOLD),
                    ),
                ])
            })
            .collect()
    }
}

fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        scrollbar: Default::default(),
    }
}

fn list_behavior() -> SelectListBehavior {
    SelectListBehavior {
        show_scrollbar: true,
        wrap_navigation: false,
    }
}

/// Text shown instead of the list when there is nothing to list.
pub fn empty_message(feed: Feed, status: &FetchStatus) -> String {
    match status {
        FetchStatus::Loading => format!("Loading {} list...", feed.label()),
        FetchStatus::Failed(error) => format!("The {} list is unavailable: {error}", feed.label()),
        FetchStatus::Idle | FetchStatus::Ready => format!("No {} records", feed.label()),
    }
}

impl Component<Action> for RosterList {
    type Props<'a> = RosterListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || props.records.is_empty() {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        if key.code == KeyCode::Enter {
            return vec![Action::ViewerOpenRoster(props.selected)];
        }
        let items = Self::items(props.records);
        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: props.selected.min(items.len().saturating_sub(1)),
            is_focused: true,
            style: list_style(),
            behavior: list_behavior(),
            on_select: Action::RosterSelect,
            render_item: &|item| item.clone(),
        };
        self.list
            .handle_event(event, list_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let title = format!(" Ranked ({}) ", props.records.len());
        let block = theme::panel(&title, props.is_focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if props.records.is_empty() {
            let message = Paragraph::new(empty_message(Feed::Ranked, props.status))
                .style(theme::dim())
                .alignment(Alignment::Center);
            frame.render_widget(message, inner);
            return;
        }

        let items = Self::items(props.records);
        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: props.selected.min(items.len().saturating_sub(1)),
            is_focused: props.is_focused,
            style: list_style(),
            behavior: list_behavior(),
            on_select: Action::RosterSelect,
            render_item: &|item| item.clone(),
        };
        self.list.render(frame, inner, list_props);
    }
}
