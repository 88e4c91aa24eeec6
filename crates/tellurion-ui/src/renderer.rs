use ratatui::{layout::Rect, Frame};

/// Trait for widgets that render content into their mount slot.
///
/// Implement this alongside [`tellurion_core::widget::Widget`]. The shell
/// wires renderers to widgets at mount time via [`std::any::Any`]
/// downcasting — no rendering types leak into tellurion-core.
pub trait SlotRenderer {
    /// Render the widget's slot rect. Called each frame while mounted.
    fn render_slot(&self, f: &mut Frame, area: Rect);
}
