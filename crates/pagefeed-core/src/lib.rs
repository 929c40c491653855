//! Incremental content loading for scrollable lists.
//!
//! The engine fetches the next "segment" of paginated content as the host
//! approaches the end of what is rendered, keeps a one-slot lookahead cache
//! primed with the following segment, and detects terminal conditions (end
//! of stream, empty result set, permanent errors). Rendering, scroll
//! detection, and indicator UI stay in the host behind the
//! [`collaborator`] traits.

pub mod cache;
pub mod collaborator;
pub mod config;
pub mod cursor;
pub mod engine;
pub mod fetch;
pub mod trigger;

pub use cache::PrefetchCache;
pub use collaborator::{
    Collaborator, IndicatorPresenter, IndicatorView, NoopCollaborator, NoopIndicator,
};
pub use config::EngineConfig;
pub use cursor::SegmentCursor;
pub use engine::{EngineState, InfiniteScrollEngine};
pub use fetch::{FetchController, FetchRequest, FetchTicket};
pub use pagefeed_types::{FetchOutcome, Payload, PayloadKind, TransportError, TransportErrorKind};
pub use trigger::{Geometry, GeometrySource, near_end, page_unfilled};
