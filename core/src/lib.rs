//! Diary synchronization client.
//!
//! # Overview
//! Turns local intent (create a diary with photos, fetch a page, like or
//! unlike, delete) into calls against the remote diary service and hands
//! each outcome back as a single `Result`.
//!
//! # Design
//! - `DiaryClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`. No I/O happens there.
//! - `Transport` executes requests; `HttpTransport` is the pooled reqwest
//!   implementation.
//! - `DiarySync` wires the client, a transport and a `ContentResolver`
//!   together into async operations.
//! - There is no local cache. Every call returns a fresh value.

pub mod attachment;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod like;
pub mod resolver;
pub mod sync;
pub mod transport;
pub mod types;

pub use client::DiaryClient;
pub use config::ClientConfig;
pub use error::{SyncError, TransportError};
pub use http::{AttachmentStream, FormPart, HttpMethod, HttpRequest, HttpResponse, PartBody, RequestBody};
pub use like::{LikeAction, LikeState, LikeToggle};
pub use resolver::{ContentResolver, FsResolver};
pub use sync::DiarySync;
pub use transport::{HttpTransport, Transport};
pub use types::{Confirmation, DiaryRecord, DiaryRequest, ImageRef, Page, VisibilityStatus};
