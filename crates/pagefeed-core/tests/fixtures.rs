//! Shared test doubles and response helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use pagefeed_core::{Collaborator, IndicatorPresenter, IndicatorView};
use pagefeed_types::{Payload, TransportError};
use wiremock::ResponseTemplate;

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// 200 response with a JSON array of `n` numbered items.
pub fn items_response(n: usize) -> ResponseTemplate {
    let items: Vec<usize> = (0..n).collect();
    ResponseTemplate::new(200).set_body_json(items)
}

/// 200 response with an empty JSON array.
pub fn empty_items_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(Vec::<usize>::new())
}

/// 200 response with an entirely empty body.
pub fn blank_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string("")
}

/// Everything the engine pushed through its collaborator, recorded for
/// assertions. Cloneable so the test keeps a handle while the engine owns
/// its copy.
#[derive(Debug, Default, Clone)]
pub struct RecordingCollaborator {
    inner: Arc<Mutex<Recorded>>,
}

#[derive(Debug, Default)]
pub struct Recorded {
    pub rendered: Vec<Payload>,
    pub errors: Vec<TransportError>,
    pub no_results_calls: usize,
    pub persisted_params: Vec<(String, u64)>,
    pub counts: Vec<u64>,
    pub clear_calls: usize,
    pub scroll_calls: usize,
}

impl RecordingCollaborator {
    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap()
    }

    pub fn rendered_item_total(&self) -> usize {
        self.recorded().rendered.iter().map(Payload::len).sum()
    }
}

impl Collaborator for RecordingCollaborator {
    fn render(&mut self, payload: &Payload) {
        self.inner.lock().unwrap().rendered.push(payload.clone());
    }

    fn report_error(&mut self, error: &TransportError) {
        self.inner.lock().unwrap().errors.push(error.clone());
    }

    fn report_no_results(&mut self) {
        self.inner.lock().unwrap().no_results_calls += 1;
    }

    fn persist_param(&mut self, key: &str, value: u64) {
        self.inner
            .lock()
            .unwrap()
            .persisted_params
            .push((key.to_string(), value));
    }

    fn report_count(&mut self, count: u64) {
        self.inner.lock().unwrap().counts.push(count);
    }

    fn clear_content(&mut self) {
        self.inner.lock().unwrap().clear_calls += 1;
    }

    fn scroll_to_tail(&mut self) {
        self.inner.lock().unwrap().scroll_calls += 1;
    }
}

/// Records every indicator view the engine presented, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingIndicator {
    views: Arc<Mutex<Vec<IndicatorView>>>,
}

impl RecordingIndicator {
    pub fn views(&self) -> Vec<IndicatorView> {
        self.views.lock().unwrap().clone()
    }

    pub fn last_view(&self) -> Option<IndicatorView> {
        self.views.lock().unwrap().last().copied()
    }
}

impl IndicatorPresenter for RecordingIndicator {
    fn present(&mut self, view: IndicatorView) {
        self.views.lock().unwrap().push(view);
    }
}
