use std::collections::VecDeque;

use crate::event::Event;

/// A simple FIFO event queue.
///
/// The shell loop uses the bus in a three-phase cycle:
/// 1. **Publish** — input polling and timers push events into the queue.
/// 2. **Drain** — all pending events are pulled out in order.
/// 3. **Broadcast** — each event is dispatched to widgets via the registry.
pub struct EventBus {
    queue: VecDeque<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create an empty event bus.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Enqueue an event at the back of the queue.
    pub fn publish(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Enqueue a batch of events, preserving their order.
    pub fn publish_all(&mut self, events: impl IntoIterator<Item = Event>) {
        self.queue.extend(events);
    }

    /// Remove and return all pending events, preserving insertion order.
    pub fn drain(&mut self) -> Vec<Event> {
        self.queue.drain(..).collect()
    }

    /// Return `true` if the queue contains at least one event.
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn publish_enqueues_events() {
        let mut bus = EventBus::new();
        bus.publish(Event::Tick {
            now: Instant::now(),
        });
        bus.publish(Event::Quit);
        assert!(bus.has_pending());
    }

    #[test]
    fn drain_returns_all_and_empties() {
        let mut bus = EventBus::new();
        bus.publish(Event::Tick {
            now: Instant::now(),
        });
        bus.publish(Event::Quit);
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert!(!bus.has_pending());
    }

    #[test]
    fn drain_on_empty_returns_empty() {
        let mut bus = EventBus::new();
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn publish_all_preserves_order() {
        let mut bus = EventBus::new();
        bus.publish_all([
            Event::WidgetMounted { slot: "hero".into() },
            Event::WidgetUnmounted { slot: "hero".into() },
            Event::Quit,
        ]);
        let events = bus.drain();
        assert!(matches!(&events[0], Event::WidgetMounted { slot } if slot == "hero"));
        assert!(matches!(&events[1], Event::WidgetUnmounted { slot } if slot == "hero"));
        assert!(matches!(&events[2], Event::Quit));
    }

    #[test]
    fn has_pending_tracks_queue_state() {
        let mut bus = EventBus::new();
        assert!(!bus.has_pending());
        bus.publish(Event::Quit);
        assert!(bus.has_pending());
        bus.drain();
        assert!(!bus.has_pending());
    }
}
