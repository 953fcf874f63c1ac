//! Test doubles for the client's seams.
//!
//! Used by this crate's own tests and by downstream store tests: a scripted
//! transport, recording notifier/navigator, and a token builder.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use crate::notify::{Navigator, Notifier, Redirect};
use crate::request::RequestDescriptor;
use crate::transport::{RawResponse, Transport, TransportError};

/// Builds an unsigned JWT-shaped token expiring `offset_secs` from now.
pub fn make_token(offset_secs: i64) -> String {
    let exp = (Utc::now() + Duration::seconds(offset_secs)).timestamp();
    let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"HS256\",\"typ\":\"JWT\"}");
    let payload = URL_SAFE_NO_PAD.encode(format!("{{\"exp\":{exp}}}").as_bytes());
    format!("{header}.{payload}.signature")
}

/// A standard success envelope body.
pub fn ok_envelope(data: Value) -> RawResponse {
    RawResponse {
        status: 200,
        body: Some(json!({"code": 200, "message": "success", "data": data})),
    }
}

/// An envelope with explicit transport status, code, and message.
pub fn envelope(status: u16, code: i64, message: &str) -> RawResponse {
    RawResponse {
        status,
        body: Some(json!({"code": code, "message": message, "data": null})),
    }
}

/// Transport that replays scripted responses in order and records every
/// request it sees.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: RawResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }

    /// Paths of every request sent so far, in order.
    pub fn request_paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.path.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connect("no scripted response".to_string())))
    }
}

/// Notice severity recorded by [`RecordingNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Notifier that records every surfaced notice.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.of_level(NoticeLevel::Error)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.of_level(NoticeLevel::Warning)
    }

    pub fn successes(&self) -> Vec<String> {
        self.of_level(NoticeLevel::Success)
    }

    fn of_level(&self, level: NoticeLevel) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((NoticeLevel::Success, message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((NoticeLevel::Warning, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((NoticeLevel::Error, message.to_string()));
    }
}

/// Navigator that records every requested redirect.
#[derive(Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<Redirect>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirects(&self) -> Vec<Redirect> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, target: Redirect) {
        self.redirects.lock().unwrap().push(target);
    }
}
