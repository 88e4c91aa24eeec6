use std::time::{Duration, Instant};

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use tellurion_core::config::StrategyKind;

use crate::strategy::{RenderPhase, RenderStrategy, WidgetView};
use crate::text::style_line;

/// Default interval between animation frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(300);

/// Rotating globe, one meridian step per frame.
const READY_FRAMES: [&[&str]; 4] = [
    &[
        r#"    .-""""-.    "#,
        r#"   /  ###   \   "#,
        r#"  |  ####  . |  "#,
        r#"  |   ##  ## |  "#,
        r#"   \  . ### /   "#,
        r#"    '-....-'    "#,
    ],
    &[
        r#"    .-""""-.    "#,
        r#"   / ###    \   "#,
        r#"  | ####  .  |  "#,
        r#"  |  ##  ##  |  "#,
        r#"   \ . ###  /   "#,
        r#"    '-....-'    "#,
    ],
    &[
        r#"    .-""""-.    "#,
        r#"   /###     \   "#,
        r#"  |####  .   |  "#,
        r#"  | ##  ##   |  "#,
        r#"   \. ###   /   "#,
        r#"    '-....-'    "#,
    ],
    &[
        r#"    .-""""-.    "#,
        r#"   /##    # \   "#,
        r#"  |###  .  # |  "#,
        r#"  |##  ##    |  "#,
        r#"   \ ###   . /  "#,
        r#"    '-....-'    "#,
    ],
];

/// Sweep dots while the lookup is in flight.
const LOADING_FRAMES: [&[&str]; 3] = [
    &[
        r#"    .-""""-.    "#,
        r#"   /        \   "#,
        r#"  |  ·       |  "#,
        r#"  |          |  "#,
        r#"   \        /   "#,
        r#"    '-....-'    "#,
    ],
    &[
        r#"    .-""""-.    "#,
        r#"   /        \   "#,
        r#"  |    ·    |   "#,
        r#"  |          |  "#,
        r#"   \        /   "#,
        r#"    '-....-'    "#,
    ],
    &[
        r#"    .-""""-.    "#,
        r#"   /        \   "#,
        r#"  |       ·  |  "#,
        r#"  |          |  "#,
        r#"   \        /   "#,
        r#"    '-....-'    "#,
    ],
];

/// Static-ish globe for a degraded widget.
const DEGRADED_FRAMES: [&[&str]; 2] = [
    &[
        r#"    .-""""-.    "#,
        r#"   /        \   "#,
        r#"  |    ?     |  "#,
        r#"  |          |  "#,
        r#"   \        /   "#,
        r#"    '-....-'    "#,
    ],
    &[
        r#"    .-""""-.    "#,
        r#"   /        \   "#,
        r#"  |          |  "#,
        r#"  |    ?     |  "#,
        r#"   \        /   "#,
        r#"    '-....-'    "#,
    ],
];

fn frames_for(phase: RenderPhase) -> &'static [&'static [&'static str]] {
    match phase {
        RenderPhase::Loading => &LOADING_FRAMES,
        RenderPhase::Ready => &READY_FRAMES,
        RenderPhase::Degraded => &DEGRADED_FRAMES,
    }
}

/// Drives frame cycling keyed on the widget's phase.
///
/// Switching phase resets to frame 0; within a phase, frames advance on a
/// fixed interval with catch-up when ticks arrive late.
struct FrameEngine {
    phase: RenderPhase,
    frame_index: usize,
    interval: Duration,
    last_advance: Instant,
}

impl FrameEngine {
    fn new(now: Instant) -> Self {
        Self {
            phase: RenderPhase::Loading,
            frame_index: 0,
            interval: FRAME_INTERVAL,
            last_advance: now,
        }
    }

    fn set_phase(&mut self, phase: RenderPhase, now: Instant) {
        if self.phase == phase {
            return;
        }
        self.phase = phase;
        self.frame_index = 0;
        self.last_advance = now;
    }

    fn tick(&mut self, now: Instant) {
        let count = frames_for(self.phase).len();
        if let Some(mut dt) = now.checked_duration_since(self.last_advance) {
            while dt >= self.interval {
                self.frame_index = (self.frame_index + 1) % count;
                self.last_advance += self.interval;
                dt -= self.interval;
            }
        }
    }

    fn current(&self) -> &'static [&'static str] {
        frames_for(self.phase)[self.frame_index]
    }
}

/// ASCII-frame backend: a looping pre-drawn globe with the location lines
/// as a caption.
pub struct AsciiFrames {
    engine: FrameEngine,
}

impl AsciiFrames {
    pub fn new(now: Instant) -> Self {
        Self {
            engine: FrameEngine::new(now),
        }
    }
}

impl RenderStrategy for AsciiFrames {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Frames
    }

    fn advance(&mut self, now: Instant, phase: RenderPhase) {
        self.engine.set_phase(phase, now);
        self.engine.tick(now);
    }

    fn render(&self, f: &mut Frame, area: Rect, view: &WidgetView<'_>) {
        let block = Block::default().borders(Borders::ALL).title("GLOBE");
        let inner = block.inner(area);
        f.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let caption_height = if view.disclosed {
            view.lines.len() as u16
        } else {
            1
        };
        let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(caption_height)])
            .split(inner);

        let color = match view.phase {
            RenderPhase::Ready => Color::Green,
            RenderPhase::Loading => Color::DarkGray,
            RenderPhase::Degraded => Color::Gray,
        };
        let art: Vec<Line> = self
            .engine
            .current()
            .iter()
            .map(|row| Line::from(Span::styled(*row, Style::default().fg(color))))
            .collect();
        f.render_widget(
            Paragraph::new(art).alignment(ratatui::layout::Alignment::Center),
            rows[0],
        );

        if view.disclosed {
            let caption: Vec<Line> = view.lines.iter().map(style_line).collect();
            f.render_widget(Paragraph::new(caption), rows[1]);
        } else {
            f.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    view.reveal_hint.to_string(),
                    Style::default().fg(Color::DarkGray),
                ))),
                rows[1],
            );
        }
    }
}
