//! Authenticated API client.
//!
//! Every request made by a store goes through [`ApiClient`]. It attaches the
//! bearer token, classifies failed responses into [`RcapError`] variants and
//! raises the matching user notice before handing the error back.

use crate::transport::{ApiRequest, ApiResponse, FormPart, HttpTransport};
use rcap_core::error::{FieldError, RcapError, Result};
use rcap_core::feedback::{Navigator, Notice, Notifier};
use rcap_core::session::{SessionEvent, SessionHandle};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

const FORBIDDEN_NOTICE: &str = "You do not have permission to perform this action";
const VALIDATION_NOTICE: &str = "Validation error";
const SERVER_NOTICE: &str = "Server error. Please try again later.";
const GENERIC_NOTICE: &str = "An error occurred";
const NETWORK_NOTICE: &str = "Network error. Please check your connection.";

/// Error payload as sent by the API: `{ message?, errors?: { field: [msg] } }`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<Map<String, Value>>,
}

impl ErrorBody {
    fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Field errors in the order the server listed them.
    fn field_errors(&self) -> Vec<FieldError> {
        let Some(errors) = &self.errors else {
            return Vec::new();
        };
        errors
            .iter()
            .map(|(field, value)| {
                let messages = match value {
                    Value::Array(items) => items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect(),
                    Value::String(message) => vec![message.clone()],
                    _ => Vec::new(),
                };
                FieldError {
                    field: field.clone(),
                    messages,
                }
            })
            .collect()
    }
}

/// Turns a non-success response into an error and the notice to show for it.
///
/// A 401 never produces a notice.
fn classify(status: u16, body: &[u8]) -> (RcapError, Option<String>) {
    let body = ErrorBody::parse(body);
    match status {
        401 => (
            RcapError::Unauthorized(
                body.message
                    .unwrap_or_else(|| "Unauthenticated".to_string()),
            ),
            None,
        ),
        403 => {
            let message = body
                .message
                .unwrap_or_else(|| FORBIDDEN_NOTICE.to_string());
            (RcapError::Forbidden(message.clone()), Some(message))
        }
        422 => {
            let errors = body.field_errors();
            let notice = errors
                .iter()
                .find_map(|error| error.messages.first().cloned())
                .or_else(|| body.message.clone())
                .unwrap_or_else(|| VALIDATION_NOTICE.to_string());
            let message = body
                .message
                .unwrap_or_else(|| VALIDATION_NOTICE.to_string());
            (RcapError::Validation { message, errors }, Some(notice))
        }
        500 => (
            RcapError::Server {
                status,
                message: body.message.unwrap_or_else(|| SERVER_NOTICE.to_string()),
            },
            Some(SERVER_NOTICE.to_string()),
        ),
        _ => {
            let message = body.message.unwrap_or_else(|| GENERIC_NOTICE.to_string());
            (
                RcapError::Http {
                    status,
                    message: message.clone(),
                },
                Some(message),
            )
        }
    }
}

fn route_path(route: &str) -> &str {
    route.split(['?', '#']).next().unwrap_or_default()
}

pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: Arc<SessionHandle>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    login_route: String,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        session: Arc<SessionHandle>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            session,
            notifier,
            navigator,
            login_route: "/auth/login".to_string(),
        }
    }

    pub fn with_login_route(mut self, login_route: impl Into<String>) -> Self {
        self.login_route = login_route.into();
        self
    }

    pub fn session(&self) -> &Arc<SessionHandle> {
        &self.session
    }

    /// Sends `request` with the current bearer token and returns the raw
    /// response when it succeeded.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        request.bearer = self.session.token().await;
        let method = request.method;
        let path = request.path.clone();
        tracing::debug!("[ApiClient] {} {}", method, path);

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("[ApiClient] {} {} failed without response: {}", method, path, e);
                if e.is_network() {
                    self.notifier.notify(Notice::negative(NETWORK_NOTICE));
                }
                return Err(e);
            }
        };

        if response.is_success() {
            return Ok(response);
        }

        tracing::warn!("[ApiClient] {} {} -> {}", method, path, response.status);
        let (error, notice) = classify(response.status, &response.body);
        if error.is_unauthorized() {
            self.handle_unauthorized().await;
        }
        if let Some(message) = notice {
            self.notifier.notify(Notice::negative(message));
        }
        Err(error)
    }

    async fn handle_unauthorized(&self) {
        if let Err(e) = self.session.end(SessionEvent::Unauthorized).await {
            tracing::error!("[ApiClient] Failed to clear rejected session: {}", e);
        }

        let on_login = self
            .navigator
            .current_route()
            .is_some_and(|current| route_path(&current) == route_path(&self.login_route));
        if !on_login {
            tracing::info!("[ApiClient] Session rejected, redirecting to {}", self.login_route);
            self.navigator.redirect(&self.login_route);
        }
    }

    /// Sends `request` and decodes the body as `T`.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let path = request.path.clone();
        let response = self.send(request).await?;
        response.decode(&path)
    }

    /// Sends `request`, ignoring whatever body comes back.
    pub async fn call(&self, request: ApiRequest) -> Result<()> {
        self.send(request).await.map(|_| ())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(ApiRequest::get(path)).await
    }

    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute(ApiRequest::get(path).with_query(query)?).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::post(path).with_json(body)?).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(ApiRequest::post(path)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::put(path).with_json(body)?).await
    }

    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<FormPart>,
    ) -> Result<T> {
        self.execute(ApiRequest::put(path).with_multipart(parts)).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.call(ApiRequest::delete(path)).await
    }
}
