use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// How long the privacy notice stays up before dismissing itself.
pub const NOTICE_DURATION: Duration = Duration::from_secs(8);

/// Lifetime of the one-shot privacy notice overlay.
#[derive(Debug, Clone, Copy)]
pub struct NoticeState {
    shown_at: Instant,
}

impl NoticeState {
    pub fn new(now: Instant) -> Self {
        Self { shown_at: now }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTICE_DURATION
    }
}

/// Draw the privacy notice in the top-right corner.
pub fn render_notice(f: &mut Frame, area: Rect) {
    let width = 44.min(area.width);
    let height = 6.min(area.height);
    if width < 10 || height < 4 {
        return;
    }
    let overlay = Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height,
    };

    f.render_widget(Clear, overlay);

    let lines = vec![
        Line::from("Location display uses IP geolocation"),
        Line::from("for general area only. No personal"),
        Line::from("data is stored or tracked."),
        Line::from(Span::styled(
            "esc to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let notice = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    " PRIVACY ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
        );
    f.render_widget(notice, overlay);
}
