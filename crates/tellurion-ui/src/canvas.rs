use std::time::{Duration, Instant};

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as MeridianLine, Map, MapResolution, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

use tellurion_core::config::StrategyKind;

use crate::strategy::{RenderPhase, RenderStrategy, WidgetView};
use crate::text::style_line;

/// Animation step cadence.
const SWEEP_INTERVAL: Duration = Duration::from_millis(150);
/// Longitude degrees the scan meridian moves per step.
const SWEEP_STEP: f64 = 4.0;
/// Steps per marker pulse flip.
const PULSE_STEPS: u64 = 4;

/// Reference-point coordinates drawn on the map as `(longitude, latitude)`.
const REFERENCE_CITIES: [(f64, f64); 6] = [
    (-74.0060, 40.7128),  // New York
    (-0.1278, 51.5074),   // London
    (139.6503, 35.6762),  // Tokyo
    (151.2093, -33.8688), // Sydney
    (37.6173, 55.7558),   // Moscow
    (-99.1332, 19.4326),  // Mexico City
];

/// World-map canvas backend: a braille world map with a sweeping scan
/// meridian, reference-city dots, and a pulsing visitor marker.
///
/// The drawing backend owns the lat/lon→cell projection; this strategy
/// only hands it 2-D coordinates.
pub struct BlockCanvas {
    sweep_lon: f64,
    steps: u64,
    last_advance: Instant,
}

impl BlockCanvas {
    pub fn new(now: Instant) -> Self {
        Self {
            sweep_lon: -180.0,
            steps: 0,
            last_advance: now,
        }
    }

    fn pulse_on(&self) -> bool {
        (self.steps / PULSE_STEPS) % 2 == 0
    }
}

impl RenderStrategy for BlockCanvas {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Canvas
    }

    fn advance(&mut self, now: Instant, _phase: RenderPhase) {
        if let Some(mut dt) = now.checked_duration_since(self.last_advance) {
            while dt >= SWEEP_INTERVAL {
                self.steps += 1;
                self.sweep_lon += SWEEP_STEP;
                if self.sweep_lon > 180.0 {
                    self.sweep_lon = -180.0;
                }
                self.last_advance += SWEEP_INTERVAL;
                dt -= SWEEP_INTERVAL;
            }
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, view: &WidgetView<'_>) {
        let caption_height = if view.disclosed {
            view.lines.len() as u16
        } else {
            1
        };
        let rows =
            Layout::vertical([Constraint::Min(5), Constraint::Length(caption_height)]).split(area);

        let map_color = match view.phase {
            RenderPhase::Ready => Color::Gray,
            _ => Color::DarkGray,
        };
        let marker = view.record.and_then(|r| r.coordinates());
        let pulse = self.pulse_on();
        let sweep = self.sweep_lon;

        let canvas = Canvas::default()
            .block(Block::default().borders(Borders::ALL).title("GLOBE"))
            .x_bounds([-180.0, 180.0])
            .y_bounds([-90.0, 90.0])
            .paint(move |ctx| {
                ctx.draw(&Map {
                    color: map_color,
                    resolution: MapResolution::High,
                });
                ctx.draw(&Points {
                    coords: &REFERENCE_CITIES,
                    color: Color::DarkGray,
                });
                ctx.draw(&MeridianLine {
                    x1: sweep,
                    y1: -90.0,
                    x2: sweep,
                    y2: 90.0,
                    color: Color::DarkGray,
                });
                if let Some((lat, lon)) = marker {
                    let glyph = if pulse { "◉" } else { "○" };
                    ctx.print(
                        lon,
                        lat,
                        Line::from(Span::styled(glyph, Style::default().fg(Color::Green))),
                    );
                }
            });
        f.render_widget(canvas, rows[0]);

        if rows[1].height == 0 {
            return;
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::DisplayLine;
    use ratatui::{backend::TestBackend, Terminal};
    use tellurion_geo::{FallbackReason, LocationRecord};

    fn render_text(view: &WidgetView<'_>, strategy: &BlockCanvas) -> String {
        let backend = TestBackend::new(60, 20);
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

    fn resolved_record() -> LocationRecord {
        let mut rec = LocationRecord::fallback(FallbackReason::HttpError);
        rec.latitude = Some(51.92);
        rec.longitude = Some(4.48);
        rec
    }

    #[test]
    fn sweep_wraps_around_the_date_line() {
        let now = Instant::now();
        let mut strategy = BlockCanvas::new(now);
        // Enough steps to cross +180 at least once.
        strategy.advance(now + SWEEP_INTERVAL * 200, RenderPhase::Ready);
        assert!((-180.0..=180.0).contains(&strategy.sweep_lon));
        assert_eq!(strategy.steps, 200);
    }

    #[test]
    fn pulse_alternates_over_steps() {
        let now = Instant::now();
        let mut strategy = BlockCanvas::new(now);
        let initial = strategy.pulse_on();
        strategy.advance(now + SWEEP_INTERVAL * PULSE_STEPS as u32, RenderPhase::Ready);
        assert_ne!(strategy.pulse_on(), initial);
    }

    #[test]
    fn renders_map_with_caption_when_disclosed() {
        let record = resolved_record();
        let lines = vec![DisplayLine::output("Rotterdam, South Holland")];
        let view = WidgetView {
            phase: RenderPhase::Ready,
            lines: &lines,
            record: Some(&record),
            disclosed: true,
            reveal_hint: "",
        };
        let text = render_text(&view, &BlockCanvas::new(Instant::now()));
        assert!(text.contains("GLOBE"));
        assert!(text.contains("Rotterdam, South Holland"));
    }

    #[test]
    fn hidden_panel_shows_hint_not_location() {
        let record = resolved_record();
        let lines = vec![DisplayLine::output("Rotterdam, South Holland")];
        let view = WidgetView {
            phase: RenderPhase::Ready,
            lines: &lines,
            record: Some(&record),
            disclosed: false,
            reveal_hint: "[enter] reveal location",
        };
        let text = render_text(&view, &BlockCanvas::new(Instant::now()));
        assert!(text.contains("[enter] reveal location"));
        assert!(!text.contains("Rotterdam"));
    }

    #[test]
    fn renders_without_record() {
        let view = WidgetView {
            phase: RenderPhase::Loading,
            lines: &[],
            record: None,
            disclosed: true,
            reveal_hint: "",
        };
        let text = render_text(&view, &BlockCanvas::new(Instant::now()));
        assert!(text.contains("GLOBE"));
    }
}
