use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::layout::ShellRects;

/// Per-frame data for the shell chrome.
pub struct ShellView<'a> {
    pub widget_title: &'a str,
    pub status_line: &'a str,
    pub hints: Vec<String>,
    pub status: Vec<String>,
}

/// Draw the top bar, the hero content via callback, and the footer.
pub fn render_shell(
    f: &mut Frame,
    rects: ShellRects,
    view: ShellView<'_>,
    hero: impl FnOnce(&mut Frame, Rect),
) {
    let top = Paragraph::new(Line::from(format!(
        "TELLURION | {} | {}",
        view.widget_title, view.status_line
    )))
    .style(Style::default().fg(Color::Gray));
    f.render_widget(top, rects.top);

    hero(f, rects.hero);

    let hints = Text::from(view.hints.into_iter().map(Line::from).collect::<Vec<_>>());
    f.render_widget(
        Paragraph::new(hints).block(Block::default().borders(Borders::ALL).title("KEYS")),
        rects.footer_left,
    );

    let status = Text::from(view.status.into_iter().map(Line::from).collect::<Vec<_>>());
    f.render_widget(
        Paragraph::new(status).block(Block::default().borders(Borders::ALL).title("STATE")),
        rects.footer_right,
    );
}
