//! HTTP transport backed by `reqwest`.

use crate::transport::{ApiRequest, ApiResponse, FormPart, HttpTransport, Method, RequestBody};
use async_trait::async_trait;
use rcap_core::config::ClientConfig;
use rcap_core::error::{RcapError, Result};
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};

/// Sends requests to `base_url` with JSON defaults.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), None)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::build(config.api_url.clone(), config.request_timeout())
    }

    fn build(base_url: String, timeout: Option<std::time::Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RcapError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn multipart(parts: Vec<FormPart>) -> Result<Form> {
        let mut form = Form::new();
        for part in parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    file_name,
                    mime,
                    bytes,
                } => {
                    let part = Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&mime)
                        .map_err(|e| RcapError::internal(format!("Invalid MIME type {}: {}", mime, e)))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            Some(RequestBody::Json(body)) => builder.json(&body),
            // reqwest sets the multipart boundary header itself
            Some(RequestBody::Multipart(parts)) => builder.multipart(Self::multipart(parts)?),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| RcapError::network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| RcapError::network(e.to_string()))?;

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalised() {
        let config = ClientConfig::default().with_api_url("https://rcap.example/api/v1/");
        let transport = ReqwestTransport::from_config(&config).unwrap();
        assert_eq!(transport.base_url(), "https://rcap.example/api/v1");
    }

    #[test]
    fn test_multipart_accepts_guessed_mime() {
        let parts = vec![
            FormPart::text("name", "Ada"),
            FormPart::file("profile_picture", "me.jpg", vec![0xff, 0xd8]),
        ];
        assert!(ReqwestTransport::multipart(parts).is_ok());
    }
}
