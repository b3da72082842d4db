//! Events: draft normalization, the series lifecycle and the upcoming view.

pub mod draft;
pub mod service;
pub mod upcoming;

pub use draft::{DEFAULT_EVENT_TYPE, EventDraft, NormalizedEvent};
pub use service::EventService;
