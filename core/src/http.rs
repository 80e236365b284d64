//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! request builder produces `HttpRequest` values and the parser consumes
//! `HttpResponse` values without touching the network; a `Transport` executes
//! the round-trip in between.
//!
//! Multipart bodies are an ordered list of parts. Part order is the upload
//! order, and the server attaches images in that order, so nothing here may
//! reorder them. Image parts carry a streaming reader rather than a buffer.

use std::fmt;
use std::pin::Pin;

use tokio::io::AsyncRead;

/// A readable byte source for one attachment.
pub type AttachmentStream = Pin<Box<dyn AsyncRead + Send + Sync>>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Contents of a single multipart part.
pub enum PartBody {
    Bytes(Vec<u8>),
    Stream(AttachmentStream),
}

impl fmt::Debug for PartBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartBody::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            PartBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// One named part of a multipart form.
#[derive(Debug)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: String,
    pub body: PartBody,
}

/// Request payload.
#[derive(Debug)]
pub enum RequestBody {
    Empty,
    Multipart(Vec<FormPart>),
}

impl RequestBody {
    /// Parts of a multipart body, empty for any other kind.
    pub fn parts(&self) -> &[FormPart] {
        match self {
            RequestBody::Multipart(parts) => parts,
            _ => &[],
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `DiaryClient::build_*` methods. `path` is the full URL.
#[derive(Debug)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: RequestBody,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then
/// passed to `DiaryClient::parse_*` methods.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
