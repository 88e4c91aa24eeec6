//! TUI rendering layer for tellurion.
//!
//! Provides the shell chrome, the console overlay, the privacy-notice
//! overlay, and the render strategies behind the location widget. All
//! rendering uses [`ratatui`] — this crate owns visual presentation while
//! [`tellurion_core`] owns state.

pub mod canvas;
pub mod console;
pub mod frames;
pub mod layout;
pub mod notice;
pub mod renderer;
pub mod shell;
pub mod strategy;
pub mod text;
