//! Scripted transport for pipeline tests

use async_trait::async_trait;
use gamectl_core::{GameCtlError, Poll, Result, Transport};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// A recorded remote call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

/// Transport answering from per-path scripts and recording every call.
///
/// Unscripted GET/POST calls answer 204.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<HashMap<(&'static str, String), VecDeque<Result<Option<String>>>>>,
    polls: Mutex<VecDeque<Poll>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose service hosts the given instances
    pub fn with_instances(names: &[&str]) -> Self {
        let transport = Self::new();
        let set: serde_json::Map<String, serde_json::Value> = names
            .iter()
            .map(|n| (n.to_string(), serde_json::json!({})))
            .collect();
        transport.respond("GET", "/instances", Some(serde_json::Value::Object(set).to_string()));
        transport
    }

    /// Queue a successful answer
    pub fn respond(&self, method: &'static str, path: &str, body: Option<String>) {
        self.push(method, path, Ok(body));
    }

    /// Queue a remote failure
    pub fn fail(&self, method: &'static str, path: &str, status: u16) {
        self.push(
            method,
            path,
            Err(GameCtlError::Remote {
                status,
                reason: "scripted failure".into(),
            }),
        );
    }

    /// Queue progress polls
    pub fn script_polls(&self, polls: Vec<Poll>) {
        self.polls.lock().unwrap().extend(polls);
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// `METHOD path` for every call made so far
    pub fn call_lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| format!("{} {}", c.method, c.path))
            .collect()
    }

    fn push(&self, method: &'static str, path: &str, answer: Result<Option<String>>) {
        self.responses
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(answer);
    }

    fn answer(
        &self,
        method: &'static str,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Option<String>> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .get_mut(&(method, path.to_string()))
            .and_then(|queue| queue.pop_front())
            .unwrap_or(Ok(None))
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, path: &str) -> Result<Option<String>> {
        self.answer("GET", path, None)
    }

    async fn post(&self, path: &str, body: Option<serde_json::Value>) -> Result<Option<String>> {
        self.answer("POST", path, body)
    }

    async fn poll(&self, path: &str) -> Result<Poll> {
        self.calls.lock().unwrap().push(Call {
            method: "POLL",
            path: path.to_string(),
            body: None,
        });
        Ok(self.polls.lock().unwrap().pop_front().unwrap_or(Poll::Gone))
    }
}

/// Relay collecting lines
#[derive(Default)]
pub struct Lines(pub Mutex<Vec<String>>);

impl gamectl_core::Relay for Lines {
    fn line(&self, line: &str) {
        self.0.lock().unwrap().push(line.to_string());
    }
}

impl Lines {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}
