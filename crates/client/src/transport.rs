//! HTTP transport seam.
//!
//! The transfer state machines only see [`Request`] and [`Response`]. The
//! reqwest-backed [`HttpTransport`] is the production implementation; tests
//! script responses through their own implementations.

use std::future::Future;
use std::pin::Pin;

use mesh_auth::RequestHeaders;
use tracing::trace;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// HTTP methods used by the exchange API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
        }
    }
}

/// One outgoing HTTP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: RequestHeaders,
    pub body: Vec<u8>,
}

impl Request {
    pub fn get(url: String, headers: RequestHeaders) -> Self {
        Self {
            method: Method::Get,
            url,
            headers,
            body: Vec::new(),
        }
    }

    pub fn post(url: String, headers: RequestHeaders, body: Vec<u8>) -> Self {
        Self {
            method: Method::Post,
            url,
            headers,
            body,
        }
    }

    pub fn put(url: String, headers: RequestHeaders) -> Self {
        Self {
            method: Method::Put,
            url,
            headers,
            body: Vec::new(),
        }
    }
}

/// A fully received HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// Header names are lowercase.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as lossy UTF-8, for error reports.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Converts an unexpected status into [`ClientError::Status`].
    pub fn into_status_error(self) -> ClientError {
        ClientError::Status {
            status: self.status,
            body: self.body_text(),
        }
    }
}

/// Sends one request and waits for the complete response.
///
/// Implementations must be safe for concurrent use; independent transfers
/// share one transport.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = Result<Response, ClientError>> + Send + '_>>;
}

/// Transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Builds the HTTP client: per-call timeout and TLS settings.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.tls.accept_invalid_certs);

        if let Some(identity) = &config.tls.identity {
            let mut pem = read_pem(&identity.cert)?;
            pem.push(b'\n');
            pem.extend(read_pem(&identity.key)?);
            let identity = reqwest::Identity::from_pem(&pem).map_err(|e| {
                ClientError::Configuration(format!("invalid client certificate or key: {e}"))
            })?;
            builder = builder.identity(identity);
        }

        if let Some(path) = &config.tls.ca_cert {
            let cert = reqwest::Certificate::from_pem(&read_pem(path)?).map_err(|e| {
                ClientError::Configuration(format!(
                    "invalid CA certificate {}: {e}",
                    path.display()
                ))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|e| ClientError::Configuration(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { http })
    }

    /// Wraps an existing client.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

fn read_pem(path: &std::path::Path) -> Result<Vec<u8>, ClientError> {
    std::fs::read(path)
        .map_err(|e| ClientError::Configuration(format!("cannot read {}: {e}", path.display())))
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = Result<Response, ClientError>> + Send + '_>> {
        Box::pin(async move {
            trace!(method = ?request.method, url = %request.url, "sending request");

            let mut builder = self.http.request(request.method.as_reqwest(), &request.url);
            for (name, value) in request.headers.iter() {
                builder = builder.header(name, value);
            }
            if !request.body.is_empty() || request.method != Method::Get {
                builder = builder.body(request.body);
            }

            let resp = builder.send().await?;
            let status = resp.status().as_u16();
            let headers = resp
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = resp.bytes().await?.to_vec();

            trace!(status, bytes = body.len(), "response received");
            Ok(Response {
                status,
                headers,
                body,
            })
        })
    }
}
