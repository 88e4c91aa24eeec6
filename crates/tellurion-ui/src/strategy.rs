use std::time::Instant;

use ratatui::{layout::Rect, Frame};

use tellurion_core::config::StrategyKind;
use tellurion_geo::LocationRecord;

use crate::canvas::BlockCanvas;
use crate::frames::AsciiFrames;
use crate::text::TerminalText;

/// Lifecycle phase of the owning widget, as far as rendering cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Loading,
    Ready,
    Degraded,
}

/// Styling class of one formatted display line.
///
/// These mirror the fixed class set the widget guarantees to its styling
/// collaborator; strategies map them to terminal styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Shell-prompt line (`visitor@host:~$ ...`).
    Prompt,
    /// Regular output line.
    Output,
    /// Fallback warning line.
    Warning,
}

/// One pre-formatted line of location output.
///
/// Produced by the widget's formatter — the single place privacy policy is
/// applied. Strategies render these verbatim and never derive location
/// text themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub kind: LineKind,
    pub text: String,
}

impl DisplayLine {
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Prompt,
            text: text.into(),
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Output,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Warning,
            text: text.into(),
        }
    }
}

/// Read-only view of a widget handed to its strategy each frame.
pub struct WidgetView<'a> {
    pub phase: RenderPhase,
    /// The formatted line set; the only source of location text.
    pub lines: &'a [DisplayLine],
    /// Record for glyph placement (the canvas marker). Strategies read
    /// coordinates from it, never format its fields into text.
    pub record: Option<&'a LocationRecord>,
    /// Whether the location panel is currently disclosed.
    pub disclosed: bool,
    /// Affordance hint shown while the panel is hidden.
    pub reveal_hint: &'a str,
}

/// A render backend for the location widget.
///
/// The widget drives [`advance`](RenderStrategy::advance) from `Tick`
/// events and calls [`render`](RenderStrategy::render) once per frame;
/// strategies keep only cosmetic animation state of their own.
pub trait RenderStrategy {
    fn kind(&self) -> StrategyKind;

    /// Advance animation clocks. Purely cosmetic. The owning widget's
    /// current phase is passed so phase-keyed animations can switch frame
    /// sets without re-deriving lifecycle state.
    fn advance(&mut self, now: Instant, phase: RenderPhase);

    /// Draw into the widget's slot rect.
    fn render(&self, f: &mut Frame, area: Rect, view: &WidgetView<'_>);
}

/// Construct the strategy for a configured backend kind.
pub fn make_strategy(kind: StrategyKind, now: Instant) -> Box<dyn RenderStrategy> {
    match kind {
        StrategyKind::Canvas => Box::new(BlockCanvas::new(now)),
        StrategyKind::Frames => Box::new(AsciiFrames::new(now)),
        StrategyKind::Text => Box::new(TerminalText::new(now)),
    }
}
