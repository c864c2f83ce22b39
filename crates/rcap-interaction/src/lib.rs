//! HTTP plumbing for the RCAP client: transports and the authenticated API client.

pub mod client;
pub mod query;
pub mod reqwest_transport;
pub mod scripted;
pub mod transport;

pub use client::ApiClient;
pub use reqwest_transport::ReqwestTransport;
pub use scripted::ScriptedTransport;
pub use transport::{ApiRequest, ApiResponse, FormPart, HttpTransport, Method, RequestBody};
