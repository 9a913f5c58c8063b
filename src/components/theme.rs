use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

pub const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub const BG_PANEL_ALT: Color = Color::Rgb(26, 40, 58);
pub const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
pub const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
pub const ACCENT_RED: Color = Color::Rgb(232, 86, 74);

pub fn panel(title: &str, is_focused: bool) -> Block<'_> {
    let border = if is_focused { ACCENT_TEAL } else { TEXT_DIM };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(border))
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn strong() -> Style {
    Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD)
}
