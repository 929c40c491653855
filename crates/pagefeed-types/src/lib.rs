//! Shared types for the pagefeed engine: segment payloads and fetch outcomes.

pub mod outcome;
pub mod payload;

pub use outcome::{FetchOutcome, TransportError, TransportErrorKind};
pub use payload::{Payload, PayloadKind};
