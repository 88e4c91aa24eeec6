use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use tellurion_core::config::StrategyKind;

use crate::strategy::{DisplayLine, LineKind, RenderPhase, RenderStrategy, WidgetView};

/// Blink period of the trailing block cursor.
const CURSOR_BLINK: Duration = Duration::from_millis(600);

/// Styled terminal-text backend: the prompt/output/warning line set with a
/// blinking block cursor.
pub struct TerminalText {
    cursor_on: bool,
    last_blink: Instant,
}

impl TerminalText {
    pub fn new(now: Instant) -> Self {
        Self {
            cursor_on: true,
            last_blink: now,
        }
    }
}

impl RenderStrategy for TerminalText {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Text
    }

    fn advance(&mut self, now: Instant, _phase: RenderPhase) {
        if let Some(mut dt) = now.checked_duration_since(self.last_blink) {
            while dt >= CURSOR_BLINK {
                self.cursor_on = !self.cursor_on;
                self.last_blink += CURSOR_BLINK;
                dt -= CURSOR_BLINK;
            }
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, view: &WidgetView<'_>) {
        let block = Block::default().borders(Borders::ALL).title("LOCATION");
        let inner = block.inner(area);
        f.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if !view.disclosed {
            let hint = Paragraph::new(Line::from(Span::styled(
                view.reveal_hint.to_string(),
                Style::default().fg(Color::DarkGray),
            )));
            f.render_widget(hint, inner);
            return;
        }

        let mut lines: Vec<Line> = view.lines.iter().map(style_line).collect();
        if view.phase == RenderPhase::Loading {
            lines.push(Line::from(Span::styled(
                "resolving location…",
                Style::default().fg(Color::DarkGray),
            )));
        }
        if self.cursor_on {
            lines.push(Line::from(Span::styled(
                "█",
                Style::default().fg(Color::Green),
            )));
        }

        f.render_widget(Paragraph::new(lines), inner);
    }
}

/// Map a formatted line to its terminal styling.
///
/// Prompt lines get the two-tone prompt/command split the source styled
/// with separate spans; output is cyan-ish, warnings amber.
pub(crate) fn style_line(line: &DisplayLine) -> Line<'static> {
    match line.kind {
        LineKind::Prompt => {
            let text = line.text.clone();
            match text.find("$ ") {
                Some(split) => {
                    let (prompt, command) = text.split_at(split + 1);
                    Line::from(vec![
                        Span::styled(
                            prompt.to_string(),
                            Style::default()
                                .fg(Color::Green)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(command.to_string(), Style::default().fg(Color::White)),
                    ])
                }
                None => Line::from(Span::styled(
                    text,
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )),
            }
        }
        LineKind::Output => Line::from(Span::styled(
            line.text.clone(),
            Style::default().fg(Color::Cyan),
        )),
        LineKind::Warning => Line::from(Span::styled(
            line.text.clone(),
            Style::default().fg(Color::Yellow),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(
        width: u16,
        height: u16,
        view: &WidgetView<'_>,
        strategy: &TerminalText,
    ) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| strategy.render(f, f.area(), view))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol().to_string())
            .collect()
    }

    fn sample_lines() -> Vec<DisplayLine> {
        vec![
            DisplayLine::prompt("visitor@example:~$ whoami --location"),
            DisplayLine::output("Rotterdam, South Holland"),
            DisplayLine::output("Timezone: Europe/Amsterdam"),
        ]
    }

    #[test]
    fn disclosed_view_renders_lines() {
        let lines = sample_lines();
        let view = WidgetView {
            phase: RenderPhase::Ready,
            lines: &lines,
            record: None,
            disclosed: true,
            reveal_hint: "",
        };
        let text = buffer_text(50, 10, &view, &TerminalText::new(Instant::now()));
        assert!(text.contains("Rotterdam, South Holland"));
        assert!(text.contains("whoami --location"));
    }

    #[test]
    fn hidden_view_renders_hint_only() {
        let lines = sample_lines();
        let view = WidgetView {
            phase: RenderPhase::Ready,
            lines: &lines,
            record: None,
            disclosed: false,
            reveal_hint: "[enter] reveal location",
        };
        let text = buffer_text(50, 10, &view, &TerminalText::new(Instant::now()));
        assert!(text.contains("[enter] reveal location"));
        assert!(!text.contains("Rotterdam"));
    }

    #[test]
    fn loading_phase_shows_progress_line() {
        let lines = vec![DisplayLine::prompt("visitor@example:~$ whoami --location")];
        let view = WidgetView {
            phase: RenderPhase::Loading,
            lines: &lines,
            record: None,
            disclosed: true,
            reveal_hint: "",
        };
        let text = buffer_text(50, 10, &view, &TerminalText::new(Instant::now()));
        assert!(text.contains("resolving location"));
    }

    #[test]
    fn cursor_blinks_on_advance() {
        let now = Instant::now();
        let mut strategy = TerminalText::new(now);
        assert!(strategy.cursor_on);
        strategy.advance(now + CURSOR_BLINK, RenderPhase::Ready);
        assert!(!strategy.cursor_on);
        // Catch-up over a long gap flips the parity the right number of times.
        strategy.advance(now + CURSOR_BLINK * 3, RenderPhase::Ready);
        assert!(strategy.cursor_on);
    }

    #[test]
    fn zero_area_does_not_panic() {
        let lines = sample_lines();
        let view = WidgetView {
            phase: RenderPhase::Ready,
            lines: &lines,
            record: None,
            disclosed: true,
            reveal_hint: "",
        };
        let _ = buffer_text(2, 2, &view, &TerminalText::new(Instant::now()));
    }

    #[test]
    fn prompt_line_splits_into_two_spans() {
        let line = style_line(&DisplayLine::prompt("visitor@x:~$ whoami --location"));
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content, "visitor@x:~$");
        assert_eq!(line.spans[1].content, " whoami --location");
    }
}
