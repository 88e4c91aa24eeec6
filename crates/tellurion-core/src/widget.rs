use std::any::Any;

use crate::event::Event;

/// Lines a widget contributes to the shell's footer band.
#[derive(Default)]
pub struct FooterContribution {
    /// Key hints rendered in the left footer column.
    pub hints: Vec<String>,
    /// Status lines rendered in the right footer column.
    pub status: Vec<String>,
}

/// A tellurion widget instance.
///
/// A widget owns its presentation state exclusively and is attached to one
/// named mount slot via [`crate::registry::WidgetRegistry`]. It receives
/// events through registry broadcast and is drawn each frame inside its
/// slot's rect — never outside it.
///
/// Rendering itself is wired by the shell at mount time through
/// [`as_any`](Widget::as_any) downcasting, so no drawing types leak into
/// this crate.
pub trait Widget {
    /// Mount-slot id this instance is attached to.
    fn slot(&self) -> &str;

    /// Human-readable display name shown in the top bar.
    fn title(&self) -> &'static str;

    /// Handle an incoming event. Called by the registry during broadcast.
    fn handle_event(&mut self, _ev: &Event) {}

    /// Release owned resources: cancel in-flight work, drop timers.
    ///
    /// Called by the registry on unmount. Must tolerate being called more
    /// than once and before initialization has completed.
    fn teardown(&mut self) {}

    /// Contribution to the shell footer while this widget is focused.
    fn footer(&self) -> FooterContribution {
        FooterContribution::default()
    }

    /// `self` as `&dyn Any`, for type-aware rendering in the shell.
    fn as_any(&self) -> &dyn Any;

    /// `self` as `&mut dyn Any`, for commands that reconfigure a widget.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
