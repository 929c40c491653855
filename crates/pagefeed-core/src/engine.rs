//! The segment-sequencing and lookahead-prefetch engine.
//!
//! `fetch()` renders the segment resolved by the previous cycle's prefetch
//! (loading it on a cache miss), then immediately primes the slot for the
//! following segment; its return value reports whether more content may
//! exist. The `Locked` state makes cycles mutually exclusive, and terminal
//! conditions (no more content, empty result set, HTTP 404) keep the engine
//! locked until an explicit unlock or reset.

use anyhow::Result;
use pagefeed_types::{FetchOutcome, TransportError};
use tracing::{debug, trace};

use crate::cache::PrefetchCache;
use crate::collaborator::{Collaborator, IndicatorPresenter, IndicatorView};
use crate::config::EngineConfig;
use crate::cursor::SegmentCursor;
use crate::fetch::{FetchController, FetchRequest};
use crate::trigger::{self, GeometrySource};

/// Whether a render/prefetch cycle may start.
///
/// `Locked` covers an in-progress cycle, an explicit caller lock, and every
/// terminal condition; the terminal flags themselves are orthogonal booleans
/// on the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Locked,
}

/// Orchestrates cursor, cache, and fetch controller around host callbacks.
pub struct InfiniteScrollEngine<C: Collaborator, P: IndicatorPresenter> {
    config: EngineConfig,
    cursor: SegmentCursor,
    cache: PrefetchCache,
    fetcher: FetchController,
    collaborator: C,
    indicator: P,
    state: EngineState,
    no_more_content: bool,
    no_results: bool,
    /// Armed while the next fetch should request the initial backfill.
    initial_pending: bool,
    /// Whether any segment has been rendered since construction/reset.
    rendered_any: bool,
}

impl<C: Collaborator, P: IndicatorPresenter> InfiniteScrollEngine<C, P> {
    /// Creates an engine for one scrollable container.
    ///
    /// # Errors
    /// Returns an error when the configuration is invalid (missing or
    /// unparseable route, empty segment parameter name).
    pub fn new(config: EngineConfig, collaborator: C, indicator: P) -> Result<Self> {
        let route = config.validate()?;
        let fetcher = FetchController::new(
            route,
            config.segment_param.clone(),
            config.payload_kind,
        );
        Ok(Self {
            cursor: SegmentCursor::new(config.start_segment),
            cache: PrefetchCache::new(),
            fetcher,
            collaborator,
            indicator,
            state: EngineState::Idle,
            no_more_content: false,
            no_results: false,
            initial_pending: config.fetch_on_init,
            rendered_any: false,
            config,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == EngineState::Locked
    }

    /// Currently displayed segment index.
    pub fn current_segment(&self) -> u64 {
        self.cursor.current()
    }

    /// True once the source declared or produced an end of stream.
    pub fn no_more_content(&self) -> bool {
        self.no_more_content
    }

    /// True when the very first segment yielded nothing at all.
    pub fn no_results(&self) -> bool {
        self.no_results
    }

    /// Access to the host collaborator (e.g. to inspect a recording test
    /// double after a cycle).
    pub fn collaborator(&self) -> &C {
        &self.collaborator
    }

    /// Runs one render/prefetch cycle. Returns whether more content may
    /// exist; `false` also covers the locked-guard no-op.
    pub async fn fetch(&mut self) -> bool {
        if self.state == EngineState::Locked {
            trace!("engine: fetch suppressed while locked");
            return false;
        }
        self.state = EngineState::Locked;
        self.indicator.present(IndicatorView::LOADING);

        let params = self.collaborator.request_params();
        let initial = self.initial_pending;
        if initial {
            self.initial_pending = false;
            // The unconditional advance below must land back on the
            // configured start segment after a backfill.
            self.cursor.rewind_for_initial_fetch();
        }

        // Consume the lookahead primed by the previous cycle, loading
        // synchronously on a miss (first cycle, post-reset, post-error).
        if self.cache.is_empty() {
            let request = FetchRequest {
                segment: self.cursor.next(),
                params: params.clone(),
                initial,
            };
            let ticket = self.fetcher.load(&request).await;
            if !matches!(ticket.outcome, FetchOutcome::Aborted)
                && self.fetcher.is_latest(ticket.generation)
            {
                self.cache.store(ticket.generation, ticket.outcome);
            }
        }
        let Some(outcome) = self.cache.take() else {
            // Superseded before anything was committed; whatever cancelled
            // us owns the next state transition.
            return false;
        };

        match outcome {
            FetchOutcome::Success {
                payload,
                more_available,
                item_count,
            } => {
                self.cursor.advance();
                self.collaborator
                    .persist_param(&self.config.segment_param, self.cursor.current());
                if let Some(count) = item_count {
                    self.collaborator.report_count(count);
                }
                self.collaborator.render(&payload);
                self.rendered_any = true;
                debug!(segment = self.cursor.current(), "engine: rendered segment");

                if !more_available {
                    debug!("engine: source declared end of stream");
                    self.no_more_content = true;
                    self.indicator.present(IndicatorView::HIDDEN);
                    return false;
                }
                self.prime_next(params).await
            }
            FetchOutcome::Empty => {
                if self.rendered_any {
                    self.no_more_content = true;
                    self.indicator.present(IndicatorView::HIDDEN);
                } else {
                    debug!("engine: first segment empty, no results at all");
                    self.no_results = true;
                    self.collaborator.report_no_results();
                    self.indicator.present(IndicatorView::NO_RESULTS);
                }
                false
            }
            FetchOutcome::NotFound => {
                self.collaborator
                    .report_error(&TransportError::http_status(404, ""));
                self.indicator.present(IndicatorView::HIDDEN);
                // Permanent: stays locked until an explicit unlock/reset.
                false
            }
            FetchOutcome::TransportError(error) => {
                self.collaborator.report_error(&error);
                // Transient: unlock so a later trigger may retry.
                self.state = EngineState::Idle;
                self.indicator.present(IndicatorView::HIDDEN);
                false
            }
            FetchOutcome::Aborted => false,
        }
    }

    /// Speculatively fetches the segment after the one just rendered and
    /// settles this cycle on its outcome.
    async fn prime_next(&mut self, params: Vec<(String, String)>) -> bool {
        let request = FetchRequest {
            segment: self.cursor.next(),
            params,
            initial: false,
        };
        let ticket = self.fetcher.load(&request).await;
        if !self.fetcher.is_latest(ticket.generation) {
            // A newer fetch owns the slot and the state transitions.
            return false;
        }

        match ticket.outcome {
            outcome @ FetchOutcome::Success { .. } => {
                self.cache.store(ticket.generation, outcome);
                self.state = EngineState::Idle;
                self.indicator.present(IndicatorView::MORE_AVAILABLE);
                true
            }
            FetchOutcome::Empty => {
                debug!(segment = request.segment, "engine: lookahead found end of stream");
                self.no_more_content = true;
                self.indicator.present(IndicatorView::HIDDEN);
                false
            }
            FetchOutcome::NotFound => {
                self.collaborator
                    .report_error(&TransportError::http_status(404, ""));
                self.indicator.present(IndicatorView::HIDDEN);
                false
            }
            FetchOutcome::Aborted => false,
            FetchOutcome::TransportError(error) => {
                self.collaborator.report_error(&error);
                self.state = EngineState::Idle;
                self.indicator.present(IndicatorView::HIDDEN);
                false
            }
        }
    }

    /// Repeats `fetch()` until the page is filled or the stream ends.
    ///
    /// Bounded by host geometry, not an iteration count: the loop stops as
    /// soon as content exceeds the viewport plus the configured offset, or
    /// `fetch()` reports no more content. A page that is already filled
    /// never fetches.
    pub async fn auto_fill<G: GeometrySource>(&mut self, geometry: &mut G) {
        loop {
            let sample = geometry.sample();
            if !trigger::page_unfilled(&sample, self.config.offset_px) {
                break;
            }
            if !self.fetch().await {
                break;
            }
        }
    }

    /// Runs the construction-time sequence: optional initial backfill, the
    /// auto-scroll hook, then autofill. Returns the last fetch indication.
    pub async fn initialize<G: GeometrySource>(&mut self, geometry: &mut G) -> bool {
        let mut more = true;
        if self.config.fetch_on_init {
            more = self.fetch().await;
            if self.config.auto_scroll && self.config.start_segment > 1 {
                self.collaborator.scroll_to_tail();
            }
            if more && self.config.auto_fill {
                self.auto_fill(geometry).await;
            }
        } else {
            if self.config.auto_scroll && self.config.start_segment > 1 {
                self.collaborator.scroll_to_tail();
            }
            if self.config.auto_fill {
                self.auto_fill(geometry).await;
            }
        }
        more
    }

    /// Explicitly locks or unlocks scroll-triggered fetching.
    pub fn set_lock_infinite_scroll(&mut self, lock: bool) {
        self.state = if lock {
            EngineState::Locked
        } else {
            EngineState::Idle
        };
    }

    /// Overrides the current segment index (clamped to at least 1).
    pub fn set_segment(&mut self, segment: u64) {
        self.cursor.set(segment);
    }

    /// Returns the engine to its freshly constructed state: cancels any
    /// in-flight fetch, clears the lookahead slot and terminal flags, moves
    /// the cursor back to the configured start, and re-arms the initial
    /// backfill for the next `fetch()`.
    pub async fn reset(&mut self, remove_contents: bool) {
        debug!(remove_contents, "engine: reset");
        self.fetcher.cancel_inflight().await;
        self.cache.clear();
        self.cursor.set(self.config.start_segment);
        self.state = EngineState::Idle;
        self.no_more_content = false;
        self.no_results = false;
        self.rendered_any = false;
        self.initial_pending = true;
        if remove_contents {
            self.collaborator.clear_content();
            self.indicator.present(IndicatorView::LOADING);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::collaborator::{NoopCollaborator, NoopIndicator};

    use super::*;

    fn engine() -> InfiniteScrollEngine<NoopCollaborator, NoopIndicator> {
        let config = EngineConfig {
            route: "http://localhost:1/feed".to_string(),
            ..EngineConfig::default()
        };
        InfiniteScrollEngine::new(config, NoopCollaborator, NoopIndicator).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EngineConfig::default();
        assert!(InfiniteScrollEngine::new(config, NoopCollaborator, NoopIndicator).is_err());
    }

    #[tokio::test]
    async fn test_locked_guard_is_a_no_op() {
        let mut engine = engine();
        engine.set_lock_infinite_scroll(true);
        // The guard returns before any request is issued; the route's port
        // is unreachable, so reaching the network would surface as an
        // error report instead of a clean false.
        assert!(!engine.fetch().await);
        assert!(engine.is_locked());
        assert_eq!(engine.current_segment(), 1);
    }

    #[tokio::test]
    async fn test_reset_restores_initial_state() {
        let mut engine = engine();
        engine.set_segment(9);
        engine.set_lock_infinite_scroll(true);
        engine.reset(false).await;
        assert_eq!(engine.current_segment(), 1);
        assert!(!engine.is_locked());
        assert!(!engine.no_more_content());
        assert!(!engine.no_results());
    }

    #[test]
    fn test_set_segment_clamps() {
        let mut engine = engine();
        engine.set_segment(0);
        assert_eq!(engine.current_segment(), 1);
    }
}
