use artbox::{
    fonts, integrations::ratatui::ArtBox, Alignment as ArtAlignment, Color as ArtColor, ColorStop,
    Fill, LinearGradient, Renderer,
};
use ratatui::{layout::Rect, Frame};

use super::Component;
use crate::action::Action;

/// Big "VS" between the two slot cards; the gradient swaps on every tick.
pub struct VsTitle;

pub struct VsTitleProps {
    pub flash: bool,
}

fn flicker_fill(flash: bool) -> Fill {
    let red = ArtColor::rgb(232, 86, 74);
    let gold = ArtColor::rgb(228, 176, 88);
    let (from, to) = if flash { (red, gold) } else { (gold, red) };
    Fill::Linear(LinearGradient::new(
        90.0,
        vec![ColorStop::new(0.0, from), ColorStop::new(1.0, to)],
    ))
}

impl Component<Action> for VsTitle {
    type Props<'a> = VsTitleProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(flicker_fill(props.flash));
        frame.render_widget(ArtBox::new(&renderer, "VS"), area);
    }
}
