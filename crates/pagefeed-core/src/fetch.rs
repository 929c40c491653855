//! Segment fetching with cancel-and-replace supersession.
//!
//! The controller owns the single outstanding network operation. Issuing a
//! new load cancels the previous one, whose call settles to
//! [`FetchOutcome::Aborted`] rather than disappearing silently, so callers
//! can always tell a supersession apart from a true empty result. Every load
//! carries a generation; callers commit a result only while its generation
//! is still the latest issued.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use pagefeed_types::{FetchOutcome, Payload, PayloadKind, TransportError};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use url::Url;

/// Response headers that end the pagination stream after the current
/// segment. Any boolean-ish truthy value counts.
pub const NO_MORE_CONTENT_HEADERS: [&str; 2] = ["no-more-content", "no-content"];

/// Response header advertising the source's total item count.
pub const CONTENT_COUNTER_HEADER: &str = "content-counter";

/// Longest body snippet carried into a transport error.
const ERROR_BODY_SNIPPET: usize = 300;

/// Parameters for one segment request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Segment index to request (always `current + 1` at call time).
    pub segment: u64,
    /// Caller-supplied base parameters (filters etc.).
    pub params: Vec<(String, String)>,
    /// Marks the initial backfill request (`initial=1`).
    pub initial: bool,
}

/// A settled load together with the generation it was issued under.
#[derive(Debug)]
pub struct FetchTicket {
    pub generation: u64,
    pub outcome: FetchOutcome,
}

struct Shared {
    /// Monotonic count of issued loads; the commit guard.
    generation: AtomicU64,
    /// Token of the load currently in flight, if any.
    inflight: Mutex<Option<CancellationToken>>,
}

/// Issues segment requests and maps transport outcomes to typed results.
///
/// Cheaply cloneable; clones share the generation counter and the in-flight
/// token, so a load issued through one clone supersedes a load issued
/// through another.
#[derive(Clone)]
pub struct FetchController {
    http: reqwest::Client,
    route: Url,
    segment_param: String,
    payload_kind: PayloadKind,
    shared: Arc<Shared>,
}

impl FetchController {
    pub fn new(route: Url, segment_param: String, payload_kind: PayloadKind) -> Self {
        Self {
            http: reqwest::Client::new(),
            route,
            segment_param,
            payload_kind,
            shared: Arc::new(Shared {
                generation: AtomicU64::new(0),
                inflight: Mutex::new(None),
            }),
        }
    }

    /// Latest generation issued so far.
    pub fn latest_generation(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }

    /// Whether `generation` is still the latest issued load.
    pub fn is_latest(&self, generation: u64) -> bool {
        self.latest_generation() == generation
    }

    /// Cancels the in-flight load, if any. The superseded call settles to
    /// [`FetchOutcome::Aborted`]. Already-settled results are unaffected.
    pub async fn cancel_inflight(&self) {
        if let Some(token) = self.shared.inflight.lock().await.take() {
            trace!("fetch: cancelling in-flight load");
            token.cancel();
        }
    }

    /// Issues a GET for `request`, cancelling any previously outstanding
    /// load first. Never returns an error: transport failures are the
    /// [`FetchOutcome::TransportError`] variant, supersession is
    /// [`FetchOutcome::Aborted`].
    pub async fn load(&self, request: &FetchRequest) -> FetchTicket {
        let (generation, token) = self.begin().await;
        debug!(
            segment = request.segment,
            generation,
            initial = request.initial,
            "fetch: issuing"
        );

        let outcome = tokio::select! {
            () = token.cancelled() => FetchOutcome::Aborted,
            outcome = self.perform(request) => outcome,
        };

        // Release the token only if it is still ours; a newer load may
        // already have installed its own. Checked under the same lock that
        // `begin` bumps the generation with.
        {
            let mut inflight = self.shared.inflight.lock().await;
            if self.is_latest(generation) {
                *inflight = None;
            }
        }

        debug!(
            segment = request.segment,
            generation,
            outcome = variant_name(&outcome),
            "fetch: settled"
        );
        FetchTicket {
            generation,
            outcome,
        }
    }

    /// Cancels the previous load and registers a fresh generation + token.
    async fn begin(&self) -> (u64, CancellationToken) {
        let mut inflight = self.shared.inflight.lock().await;
        if let Some(previous) = inflight.take() {
            previous.cancel();
        }
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        *inflight = Some(token.clone());
        (generation, token)
    }

    async fn perform(&self, request: &FetchRequest) -> FetchOutcome {
        let mut query: Vec<(String, String)> = request.params.clone();
        query.push((self.segment_param.clone(), request.segment.to_string()));
        if request.initial {
            query.push(("initial".to_string(), "1".to_string()));
        }

        let response = match self
            .http
            .get(self.route.clone())
            .query(&query)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                return FetchOutcome::TransportError(TransportError::connect(err.to_string()));
            }
        };

        self.map_response(response).await
    }

    /// Maps an HTTP response to a typed outcome.
    ///
    /// 200 + non-empty parseable body is `Success`; 200 + empty body is
    /// `Empty`; 404 is `NotFound` (permanent, unlike transient errors);
    /// anything else is `TransportError`.
    async fn map_response(&self, response: reqwest::Response) -> FetchOutcome {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return FetchOutcome::NotFound;
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return FetchOutcome::TransportError(TransportError::http_status(
                status.as_u16(),
                snippet(&body),
            ));
        }

        let more_available = !NO_MORE_CONTENT_HEADERS.iter().any(|name| {
            response
                .headers()
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .is_some_and(is_truthy)
        });
        let item_count = response
            .headers()
            .get(CONTENT_COUNTER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                return FetchOutcome::TransportError(TransportError::connect(err.to_string()));
            }
        };
        if body.trim().is_empty() {
            return FetchOutcome::Empty;
        }

        let payload = match self.payload_kind {
            PayloadKind::Json => match serde_json::from_str(&body) {
                Ok(value) => Payload::Json(value),
                Err(err) => {
                    return FetchOutcome::TransportError(TransportError::parse(format!(
                        "invalid JSON body: {err}"
                    )));
                }
            },
            PayloadKind::Html => Payload::Html(body),
        };

        if payload.is_empty() {
            return FetchOutcome::Empty;
        }
        FetchOutcome::Success {
            payload,
            more_available,
            item_count,
        }
    }
}

/// Boolean-ish header parse: `0`, `false`, `no`, `off`, and empty are falsy.
fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

fn snippet(body: &str) -> &str {
    match body.char_indices().nth(ERROR_BODY_SNIPPET) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

fn variant_name(outcome: &FetchOutcome) -> &'static str {
    match outcome {
        FetchOutcome::Success { .. } => "success",
        FetchOutcome::Empty => "empty",
        FetchOutcome::NotFound => "not_found",
        FetchOutcome::Aborted => "aborted",
        FetchOutcome::TransportError(_) => "transport_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy_boolean_ish() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("no"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("  "));
    }

    #[test]
    fn test_snippet_limits_length() {
        let long = "x".repeat(1000);
        assert_eq!(snippet(&long).len(), ERROR_BODY_SNIPPET);
        assert_eq!(snippet("short"), "short");
        assert_eq!(snippet(""), "");
    }

    #[test]
    fn test_generation_monotonic() {
        let controller = FetchController::new(
            Url::parse("http://localhost/feed").unwrap(),
            "segment".to_string(),
            PayloadKind::Json,
        );
        assert_eq!(controller.latest_generation(), 0);
        assert!(controller.is_latest(0));
    }
}
