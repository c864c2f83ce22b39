//! In-process transport that answers from a script.
//!
//! Used by the test suites of every crate above this one and by `--offline`
//! style demos. Responses are queued per `(method, path)`; the last queued
//! response keeps answering once the queue has drained.

use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method};
use async_trait::async_trait;
use rcap_core::error::{RcapError, Result};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Scripted {
    outcome: Result<ApiResponse>,
    delay: Option<Duration>,
}

#[derive(Debug, Default)]
struct Script {
    routes: HashMap<(Method, String), VecDeque<Scripted>>,
    requests: Vec<ApiRequest>,
}

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) {
        self.script()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    /// Queues a JSON response for `method path`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.push(
            method,
            path,
            Scripted {
                outcome: Ok(ApiResponse::json(status, &body)),
                delay: None,
            },
        );
        self
    }

    /// Queues a JSON response that arrives after `delay`.
    pub fn respond_delayed(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: Value,
        delay: Duration,
    ) -> &Self {
        self.push(
            method,
            path,
            Scripted {
                outcome: Ok(ApiResponse::json(status, &body)),
                delay: Some(delay),
            },
        );
        self
    }

    /// Queues a response with no body.
    pub fn respond_empty(&self, method: Method, path: &str, status: u16) -> &Self {
        self.push(
            method,
            path,
            Scripted {
                outcome: Ok(ApiResponse::new(status, Vec::new())),
                delay: None,
            },
        );
        self
    }

    /// Makes `method path` fail without a response.
    pub fn offline(&self, method: Method, path: &str) -> &Self {
        self.push(
            method,
            path,
            Scripted {
                outcome: Err(RcapError::network("connection refused")),
                delay: None,
            },
        );
        self
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.script().requests.clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.script()
            .requests
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .cloned()
            .collect()
    }

    fn next(&self, request: &ApiRequest) -> Option<Scripted> {
        let mut script = self.script();
        script.requests.push(request.clone());
        let queue = script
            .routes
            .get_mut(&(request.method, request.path.clone()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let Some(scripted) = self.next(&request) else {
            tracing::debug!(
                "[ScriptedTransport] No script for {} {}",
                request.method,
                request.path
            );
            return Ok(ApiResponse::json(404, &json!({ "message": "Not found" })));
        };

        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }
        scripted.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_then_sticky_last() {
        let transport = ScriptedTransport::new();
        transport
            .respond(Method::Get, "/auth/user", 200, json!({ "n": 1 }))
            .respond(Method::Get, "/auth/user", 200, json!({ "n": 2 }));

        let mut seen = Vec::new();
        for _ in 0..3 {
            let response = transport.send(ApiRequest::get("/auth/user")).await.unwrap();
            let body: Value = response.decode("/auth/user").unwrap();
            seen.push(body["n"].as_u64().unwrap());
        }

        assert_eq!(seen, vec![1, 2, 2]);
        assert_eq!(transport.requests_to(Method::Get, "/auth/user").len(), 3);
    }

    #[tokio::test]
    async fn test_unscripted_route_is_not_found() {
        let transport = ScriptedTransport::new();
        let response = transport.send(ApiRequest::delete("/anything")).await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_offline_is_network_error() {
        let transport = ScriptedTransport::new();
        transport.offline(Method::Post, "/auth/login");
        let err = transport.send(ApiRequest::post("/auth/login")).await.unwrap_err();
        assert!(err.is_network());
    }
}
