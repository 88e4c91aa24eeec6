use std::collections::HashMap;

use tracing::warn;

use crate::event::Event;
use crate::widget::Widget;

/// Caller-facing handle for a mounted (or failed-to-mount) widget.
///
/// Mounting never fails loudly: when the requested slot does not exist or
/// is already occupied, the returned handle simply reports unmounted and
/// every later operation through it is a no-op.
#[derive(Debug, Clone)]
pub struct WidgetHandle {
    slot: String,
    mounted: bool,
}

impl WidgetHandle {
    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

/// Owns the widgets attached to the shell's named mount slots.
///
/// The slot set is declared by the host up front; widgets attach to one
/// slot each and are fully independent of one another. Broadcast routing:
/// `Tick`/`Resize` go to every widget, `Key` to the focused widget only,
/// mount lifecycle events to the affected widget.
pub struct WidgetRegistry {
    slots: Vec<String>,
    widgets: Vec<Box<dyn Widget>>,
    index: HashMap<String, usize>,
    focus_idx: Option<usize>,
}

impl WidgetRegistry {
    /// Create a registry with the host's declared mount slots.
    pub fn new<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: slots.into_iter().map(Into::into).collect(),
            widgets: Vec::new(),
            index: HashMap::new(),
            focus_idx: None,
        }
    }

    /// Declared mount slot ids.
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Attach a widget to the slot it names.
    ///
    /// Returns the handle plus any lifecycle events to publish. A missing
    /// or occupied slot logs a warning and yields a non-mounted handle —
    /// never a panic or an error the caller must unwrap.
    pub fn mount(&mut self, widget: Box<dyn Widget>) -> (WidgetHandle, Vec<Event>) {
        let slot = widget.slot().to_string();

        if !self.slots.iter().any(|s| *s == slot) {
            warn!(slot = %slot, "mount slot does not exist, widget not mounted");
            return (
                WidgetHandle {
                    slot,
                    mounted: false,
                },
                Vec::new(),
            );
        }
        if self.index.contains_key(&slot) {
            warn!(slot = %slot, "mount slot already occupied, widget not mounted");
            return (
                WidgetHandle {
                    slot,
                    mounted: false,
                },
                Vec::new(),
            );
        }

        let idx = self.widgets.len();
        self.index.insert(slot.clone(), idx);
        self.widgets.push(widget);
        if self.focus_idx.is_none() {
            self.focus_idx = Some(idx);
        }

        (
            WidgetHandle {
                slot: slot.clone(),
                mounted: true,
            },
            vec![Event::WidgetMounted { slot }],
        )
    }

    /// Detach and tear down the widget behind a handle.
    ///
    /// Idempotent: a non-mounted handle, or a second call for the same
    /// slot, does nothing and returns no events.
    pub fn unmount(&mut self, handle: &WidgetHandle) -> Vec<Event> {
        if !handle.mounted {
            return Vec::new();
        }
        self.unmount_slot(&handle.slot)
    }

    /// Detach the widget in the named slot, if any.
    pub fn unmount_slot(&mut self, slot: &str) -> Vec<Event> {
        let Some(idx) = self.index.remove(slot) else {
            return Vec::new();
        };

        let mut widget = self.widgets.remove(idx);
        widget.teardown();

        // Reindex everything after the removed entry and repair focus.
        for stored in self.index.values_mut() {
            if *stored > idx {
                *stored -= 1;
            }
        }
        self.focus_idx = match self.focus_idx {
            Some(f) if f == idx => {
                if self.widgets.is_empty() {
                    None
                } else {
                    Some(f.min(self.widgets.len() - 1))
                }
            }
            Some(f) if f > idx => Some(f - 1),
            other => other,
        };

        vec![Event::WidgetUnmounted {
            slot: slot.to_string(),
        }]
    }

    pub fn get(&self, slot: &str) -> Option<&dyn Widget> {
        self.index.get(slot).map(|&i| &*self.widgets[i])
    }

    pub fn get_mut(&mut self, slot: &str) -> Option<&mut (dyn Widget + 'static)> {
        self.index.get(slot).copied().map(|i| &mut *self.widgets[i])
    }

    pub fn focused(&self) -> Option<&dyn Widget> {
        self.focus_idx.map(|i| &*self.widgets[i])
    }

    pub fn focused_mut(&mut self) -> Option<&mut (dyn Widget + 'static)> {
        self.focus_idx.map(|i| &mut *self.widgets[i])
    }

    pub fn focused_slot(&self) -> Option<&str> {
        self.focus_idx.map(|i| self.widgets[i].slot())
    }

    /// Move focus to the next mounted widget, wrapping around.
    pub fn cycle_focus(&mut self) {
        if self.widgets.is_empty() {
            return;
        }
        let cur = self.focus_idx.unwrap_or(0);
        self.focus_idx = Some((cur + 1) % self.widgets.len());
    }

    /// Focus the widget in the named slot.
    pub fn focus(&mut self, slot: &str) -> bool {
        match self.index.get(slot) {
            Some(&idx) => {
                self.focus_idx = Some(idx);
                true
            }
            None => false,
        }
    }

    /// `(slot, title)` pairs for every mounted widget, in mount order.
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.widgets.iter().map(|w| (w.slot(), w.title())).collect()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Dispatch an event to widgets according to the routing rules.
    pub fn broadcast(&mut self, event: &Event) {
        match event {
            Event::Tick { .. } | Event::Resize { .. } | Event::Quit => {
                for w in &mut self.widgets {
                    w.handle_event(event);
                }
            }
            Event::Key(_) => {
                if let Some(w) = self.focused_mut() {
                    w.handle_event(event);
                }
            }
            Event::WidgetMounted { slot } | Event::WidgetUnmounted { slot } => {
                if let Some(idx) = self.index.get(slot.as_str()).copied() {
                    self.widgets[idx].handle_event(event);
                }
            }
        }
    }
}
