//! Visitor geolocation lookup for tellurion widgets.
//!
//! This crate owns the data model ([`LocationRecord`]), the provider
//! response parsing, and the single-attempt cancellable lookup. Every
//! failure mode folds into a fallback record tagged with a
//! [`FallbackReason`] — callers always get something renderable, never an
//! error.

pub mod connectivity;
pub mod fetch;
pub mod provider;
pub mod record;

pub use connectivity::{Connectivity, EnvConnectivity};
pub use fetch::{spawn_lookup, CancelToken, LookupHandle, LookupPoll};
pub use record::{FallbackReason, LocationRecord, SourceStatus};
