//! Engine configuration.
//!
//! Immutable after construction: runtime state (cursor position, lock,
//! terminal flags) lives in the engine itself, never here. The explicit
//! setters on the engine (`set_segment`, `set_lock_infinite_scroll`,
//! `reset`) mutate that state, not this struct.

use anyhow::{Context, Result};
use pagefeed_types::PayloadKind;
use serde::{Deserialize, Serialize};

/// Default name of the query parameter carrying the segment index.
pub const DEFAULT_SEGMENT_PARAM: &str = "segment";

/// Default distance (px) from the end of content at which a fetch triggers.
pub const DEFAULT_OFFSET_PX: u32 = 100;

/// Configuration for an [`InfiniteScrollEngine`](crate::engine::InfiniteScrollEngine).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Segment index the engine starts on.
    pub start_segment: u64,
    /// Query parameter name for the segment index.
    pub segment_param: String,
    /// Data-source route fetched with GET.
    pub route: String,
    /// Expected response body shape.
    pub payload_kind: PayloadKind,
    /// Trigger distance from the end of content, in pixels.
    pub offset_px: u32,
    /// Keep fetching on initialization until the page is filled.
    pub auto_fill: bool,
    /// Scroll toward the tail of restored content after an initial backfill.
    pub auto_scroll: bool,
    /// Fetch all segments up to `start_segment` on the first `fetch()`.
    pub fetch_on_init: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_segment: 1,
            segment_param: DEFAULT_SEGMENT_PARAM.to_string(),
            route: String::new(),
            payload_kind: PayloadKind::Json,
            offset_px: DEFAULT_OFFSET_PX,
            auto_fill: true,
            auto_scroll: false,
            fetch_on_init: false,
        }
    }
}

impl EngineConfig {
    /// Validates the configuration and returns the parsed route.
    ///
    /// # Errors
    /// Returns an error when the route is missing, not a valid URL, or the
    /// segment parameter name is empty.
    pub fn validate(&self) -> Result<url::Url> {
        if self.segment_param.trim().is_empty() {
            anyhow::bail!("segment_param must not be empty");
        }
        if self.route.trim().is_empty() {
            anyhow::bail!("route must not be empty");
        }
        url::Url::parse(&self.route).with_context(|| format!("Invalid route URL: {}", self.route))
    }
}
