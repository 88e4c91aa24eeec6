use tellurion_ui::strategy::RenderPhase;

/// Presentation state machine of a location widget.
///
/// `Mounting → Loading → {Ready, Degraded}`. Entry into `Mounting` happens
/// at creation; the transition to `Loading` is unconditional once the
/// scaffold exists, so a slow network never delays visible UI. `Ready` and
/// `Degraded` are terminal with respect to the lookup — there is no retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Mounting,
    Loading,
    Ready,
    Degraded,
}

impl WidgetState {
    /// Whether the lookup has settled, one way or the other.
    pub fn is_settled(&self) -> bool {
        matches!(self, WidgetState::Ready | WidgetState::Degraded)
    }

    /// Collapse onto the phases rendering distinguishes.
    pub fn render_phase(&self) -> RenderPhase {
        match self {
            WidgetState::Mounting | WidgetState::Loading => RenderPhase::Loading,
            WidgetState::Ready => RenderPhase::Ready,
            WidgetState::Degraded => RenderPhase::Degraded,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WidgetState::Mounting => "mounting",
            WidgetState::Loading => "loading",
            WidgetState::Ready => "ready",
            WidgetState::Degraded => "degraded",
        }
    }
}
