//! The visitor-location widget.
//!
//! One widget owns the full lifecycle: mount, a single cancellable
//! geolocation lookup bounded by a timeout, render through a pluggable
//! backend, an optional click-to-reveal disclosure toggle with a one-shot
//! privacy notice, and teardown.

pub mod format;
pub mod lifecycle;
mod widget;

pub use lifecycle::WidgetState;
pub use widget::LocationWidget;
