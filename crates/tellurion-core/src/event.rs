use std::time::Instant;

/// Events flowing through the bus each frame.
#[derive(Debug, Clone)]
pub enum Event {
    Tick { now: Instant },
    Key(crossterm::event::KeyEvent),
    Resize { cols: u16, rows: u16 },
    /// A widget was attached to the named mount slot.
    WidgetMounted { slot: String },
    /// The widget in the named mount slot was detached.
    WidgetUnmounted { slot: String },
    Quit,
}
