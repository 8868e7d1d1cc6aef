//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Replays queued outcomes in order and records every request it sees.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    outcomes: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_ok(&self, response: HttpResponse) {
        self.outcomes.lock().unwrap().push_back(Ok(response));
    }

    pub(crate) fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_ok(json_response(status, &body.to_string()));
    }

    pub(crate) fn push_err(&self, message: &str) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(TransportError(message.to_string())));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_string())))
    }
}

pub(crate) fn json_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: body.to_string(),
    }
}
