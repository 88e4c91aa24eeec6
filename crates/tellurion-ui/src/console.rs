use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use unicode_width::UnicodeWidthStr;

use tellurion_core::console::Console;
use tellurion_core::logging::LogLevel;

/// Render the drop-down console overlay covering the top half of the screen.
///
/// Three bands: title bar (label, TPS, close hint), colour-coded log area
/// with scroll support, and the command input line with cursor.
pub fn render_console(f: &mut Frame, area: Rect, console: &Console, tps: f64) {
    let overlay_height = (area.height / 2).max(3);
    let overlay = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: overlay_height.min(area.height),
    };

    f.render_widget(Clear, overlay);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title bar
            Constraint::Min(1),    // log area
            Constraint::Length(1), // input line
        ])
        .split(overlay);

    let title = Line::from(vec![
        Span::styled(
            " CONSOLE ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  TPS: {tps:.1}  ")),
        Span::styled("~ to close", Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(
        Paragraph::new(title).style(Style::default().bg(Color::DarkGray).fg(Color::White)),
        chunks[0],
    );

    let log_lines = console.log_lines();
    let visible_height = chunks[1].height as usize;
    let total = log_lines.len();
    let scroll_offset = console.scroll_offset();

    let start = if total > visible_height + scroll_offset {
        total - visible_height - scroll_offset
    } else {
        0
    };
    let end = total.saturating_sub(scroll_offset);

    let lines: Vec<Line> = log_lines
        .iter()
        .skip(start)
        .take(end.saturating_sub(start))
        .map(|entry| {
            let level_color = match entry.level {
                LogLevel::Error => Color::Red,
                LogLevel::Warn => Color::Yellow,
                LogLevel::Info => Color::Green,
                LogLevel::Debug => Color::Cyan,
                LogLevel::Trace => Color::DarkGray,
            };
            Line::from(vec![
                Span::styled(
                    format!(" {:5} ", entry.level),
                    Style::default()
                        .fg(level_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("[{}] ", entry.target),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(&entry.message),
            ])
        })
        .collect();

    let log_block = Block::default()
        .borders(Borders::LEFT | Borders::RIGHT)
        .style(Style::default().bg(Color::Black));

    f.render_widget(
        Paragraph::new(lines)
            .block(log_block)
            .wrap(Wrap { trim: false }),
        chunks[1],
    );

    let input_line = Line::from(vec![
        Span::styled(
            "> ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(&console.input_buffer),
    ]);
    f.render_widget(
        Paragraph::new(input_line).style(Style::default().bg(Color::Black).fg(Color::White)),
        chunks[2],
    );

    let display_col = console.input_buffer[..console.cursor_pos].width() as u16;
    f.set_cursor_position((chunks[2].x + 2 + display_col, chunks[2].y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use tellurion_core::logging::LogEntry;

    fn console_with_logs(count: usize) -> Console {
        let mut console = Console::default();
        for i in 0..count {
            console.push_log(LogEntry {
                level: LogLevel::Info,
                target: "test".into(),
                message: format!("line {i}"),
            });
        }
        console
    }

    fn render_to_text(console: &Console) -> String {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| render_console(f, f.area(), console, 10.0))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol().to_string())
            .collect()
    }

    #[test]
    fn shows_title_and_recent_logs() {
        let console = console_with_logs(3);
        let text = render_to_text(&console);
        assert!(text.contains("CONSOLE"));
        assert!(text.contains("TPS: 10.0"));
        assert!(text.contains("line 2"));
    }

    #[test]
    fn shows_input_buffer() {
        let mut console = console_with_logs(0);
        for ch in "help".chars() {
            console.insert_char(ch);
        }
        let text = render_to_text(&console);
        assert!(text.contains("> help"));
    }

    #[test]
    fn scrolled_view_hides_newest_lines() {
        let mut console = console_with_logs(50);
        console.scroll_up(10);
        let text = render_to_text(&console);
        assert!(!text.contains("line 49"));
    }
}
