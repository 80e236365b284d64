//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the I/O seam: the sync facade is generic over it so tests
//! can script responses without a server. `HttpTransport` is the production
//! implementation, one pooled `reqwest::Client` built once from
//! `ClientConfig` and reused for every call. Non-2xx statuses come back as
//! data; only "no response at all" is an error here. Nothing is retried.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method};
use tokio_util::io::ReaderStream;

use crate::codec::JSON_CONTENT_TYPE;
use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{FormPart, HttpMethod, HttpRequest, HttpResponse, PartBody, RequestBody};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a single pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::debug!(method = request.method.as_str(), url = %request.path, "dispatching request");

        let mut builder = self.client.request(method(request.method), &request.path);
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Multipart(parts) => builder.multipart(form(parts)?),
        };

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

fn method(m: HttpMethod) -> Method {
    match m {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Build a reqwest form, keeping part order. Stream parts are piped, not buffered.
fn form(parts: Vec<FormPart>) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for part in parts {
        let mut p = match part.body {
            PartBody::Bytes(bytes) => Part::bytes(bytes),
            PartBody::Stream(reader) => Part::stream(Body::wrap_stream(ReaderStream::new(reader))),
        };
        p = p
            .mime_str(&part.content_type)
            .map_err(|e| TransportError::Build(e.to_string()))?;
        if let Some(file_name) = part.file_name {
            p = p.file_name(file_name);
        }
        form = form.part(part.name, p);
    }
    Ok(form)
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_builder() {
        TransportError::Build(e.to_string())
    } else {
        TransportError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_default_config() {
        assert!(HttpTransport::new(&ClientConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn invalid_url_is_a_build_error() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        let request = HttpRequest {
            method: HttpMethod::Get,
            path: "not a url".to_string(),
            body: RequestBody::Empty,
        };
        let err = transport.execute(request).await.unwrap_err();
        assert!(matches!(err, TransportError::Build(_)));
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_error() {
        // Bind then drop to get a port nobody is listening on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        let request = HttpRequest {
            method: HttpMethod::Get,
            path: format!("http://127.0.0.1:{port}/users/1/diaries"),
            body: RequestBody::Empty,
        };
        let err = transport.execute(request).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }

    #[test]
    fn bad_part_content_type_is_a_build_error() {
        let parts = vec![FormPart {
            name: "images".to_string(),
            file_name: None,
            content_type: "not a mime".to_string(),
            body: PartBody::Bytes(Vec::new()),
        }];
        assert!(matches!(form(parts), Err(TransportError::Build(_))));
    }
}
