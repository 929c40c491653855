//! Host-side collaborator seams.
//!
//! The engine never renders, touches URLs, or shows indicators itself; it
//! pushes those effects through these traits. Every method defaults to a
//! no-op so hosts implement only what they care about.

use pagefeed_types::{Payload, TransportError};

/// Host hooks consumed by the engine during a fetch cycle.
pub trait Collaborator {
    /// Renders one segment's payload into the container.
    fn render(&mut self, payload: &Payload) {
        let _ = payload;
    }

    /// Reports a transport failure (including HTTP 404).
    fn report_error(&mut self, error: &TransportError) {
        let _ = error;
    }

    /// Called exactly once when the very first segment yields nothing.
    fn report_no_results(&mut self) {}

    /// Persists the segment position (typically into the page URL).
    fn persist_param(&mut self, key: &str, value: u64) {
        let _ = (key, value);
    }

    /// Forwards the source's advertised total item count, uninterpreted.
    fn report_count(&mut self, count: u64) {
        let _ = count;
    }

    /// Base query parameters to send with every request, e.g. active
    /// filters. Re-queried once per fetch cycle.
    fn request_params(&mut self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Clears rendered content (used by `reset(remove_contents: true)`).
    fn clear_content(&mut self) {}

    /// Scroll toward the tail of restored content after an initial backfill.
    fn scroll_to_tail(&mut self) {}
}

/// No-op collaborator for hosts that only poll engine state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCollaborator;

impl Collaborator for NoopCollaborator {}

/// Which UI affordances should currently be visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorView {
    /// Spinner shown while a cycle is in progress.
    pub loading: bool,
    /// "Load more" affordance shown when more content may exist.
    pub load_more: bool,
    /// "No results" affordance, only for an empty first segment.
    pub no_results: bool,
}

impl IndicatorView {
    pub const LOADING: Self = Self {
        loading: true,
        load_more: false,
        no_results: false,
    };

    pub const MORE_AVAILABLE: Self = Self {
        loading: false,
        load_more: true,
        no_results: false,
    };

    pub const NO_RESULTS: Self = Self {
        loading: false,
        load_more: false,
        no_results: true,
    };

    pub const HIDDEN: Self = Self {
        loading: false,
        load_more: false,
        no_results: false,
    };
}

/// Receives engine state transitions to toggle loading / "load more" /
/// "no results" affordances. Has no engine-visible return value.
pub trait IndicatorPresenter {
    fn present(&mut self, view: IndicatorView) {
        let _ = view;
    }
}

/// Presenter for hosts without indicator UI.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopIndicator;

impl IndicatorPresenter for NoopIndicator {}
