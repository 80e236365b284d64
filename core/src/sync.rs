//! Async facade turning caller intent into diary API calls.
//!
//! # Design
//! `DiarySync` owns its `Transport` and `ContentResolver` (injected, never
//! global) next to a `DiaryClient` that builds and parses the requests. Every
//! operation resolves to exactly one `Result`, issues at most one request and
//! is never retried. The facade is cheap to clone, so callers that must not
//! block can move a clone into `tokio::spawn`.
//!
//! Concurrent calls against the same diary are neither serialized nor
//! deduplicated.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

use crate::attachment::{self, IMAGE_PART_CONTENT_TYPE, IMAGE_PART_NAME};
use crate::client::DiaryClient;
use crate::codec;
use crate::config::ClientConfig;
use crate::error::SyncError;
use crate::http::{AttachmentStream, FormPart, HttpRequest, HttpResponse, PartBody};
use crate::like::LikeAction;
use crate::resolver::ContentResolver;
use crate::transport::Transport;
use crate::types::{Confirmation, DiaryRecord, DiaryRequest, ImageRef, Page, VisibilityStatus};

pub struct DiarySync<T, R> {
    client: DiaryClient,
    transport: Arc<T>,
    resolver: Arc<R>,
    page_size: u32,
}

impl<T, R> Clone for DiarySync<T, R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: Arc::clone(&self.transport),
            resolver: Arc::clone(&self.resolver),
            page_size: self.page_size,
        }
    }
}

impl<T: Transport, R: ContentResolver> DiarySync<T, R> {
    pub fn new(config: &ClientConfig, transport: T, resolver: R) -> Self {
        Self {
            client: DiaryClient::new(&config.base_url),
            transport: Arc::new(transport),
            resolver: Arc::new(resolver),
            page_size: config.default_page_size,
        }
    }

    /// Create a diary with its images attached in the order given.
    ///
    /// Every image stream is opened before anything is sent; if one cannot be
    /// opened the call fails with `AttachmentRead` and no request is made.
    pub async fn create(
        &self,
        owner_id: i64,
        request: &DiaryRequest,
        images: &[ImageRef],
    ) -> Result<DiaryRecord, SyncError> {
        let json = codec::encode_request(request)?;
        let tracker = UploadTracker::default();
        let parts = self.open_attachments(images, &tracker).inspect_err(|e| {
            tracing::warn!(owner_id, error = %e, "create aborted before upload");
        })?;

        let http_request = self.client.build_create(owner_id, json, parts);
        // A stream that broke mid-upload outranks whatever the server said.
        let sent = self.send(http_request).await;
        if let Some(failure) = tracker.take_failure() {
            tracing::warn!(owner_id, error = %failure, "create aborted during upload");
            return Err(failure);
        }
        let response = sent?;
        let record = report("create", self.client.parse_create(response))?;
        tracing::info!(owner_id, diary_id = record.diary_id, images = images.len(), "diary created");
        Ok(record)
    }

    /// Fetch one page of diaries visible under `status`.
    pub async fn list(
        &self,
        owner_id: i64,
        status: VisibilityStatus,
        page: u32,
        size: u32,
    ) -> Result<Page<DiaryRecord>, SyncError> {
        let response = self.send(self.client.build_list(owner_id, status, page, size)).await?;
        let page = report("list", self.client.parse_list(response))?;
        tracing::info!(owner_id, %status, entries = page.content.len(), "loaded diaries");
        Ok(page)
    }

    /// Page 0 with the configured default size.
    pub async fn first_page(&self, owner_id: i64, status: VisibilityStatus) -> Result<Page<DiaryRecord>, SyncError> {
        self.list(owner_id, status, 0, self.page_size).await
    }

    pub async fn delete(&self, owner_id: i64, diary_id: i64) -> Result<Confirmation, SyncError> {
        let response = self.send(self.client.build_delete(owner_id, diary_id)).await?;
        let ack = report("delete", self.client.parse_delete(response))?;
        tracing::info!(owner_id, diary_id, "diary deleted");
        Ok(ack)
    }

    pub async fn like(&self, owner_id: i64, diary_id: i64) -> Result<Confirmation, SyncError> {
        self.set_like(owner_id, diary_id, LikeAction::Like).await
    }

    pub async fn unlike(&self, owner_id: i64, diary_id: i64) -> Result<Confirmation, SyncError> {
        self.set_like(owner_id, diary_id, LikeAction::Unlike).await
    }

    /// Request `action` for a diary. The direction is the caller's decision;
    /// nothing here infers it from server state.
    pub async fn set_like(&self, owner_id: i64, diary_id: i64, action: LikeAction) -> Result<Confirmation, SyncError> {
        let response = self.send(self.client.build_like(owner_id, diary_id, action)).await?;
        let ack = report("like", self.client.parse_like(response))?;
        tracing::debug!(owner_id, diary_id, ?action, "like state confirmed");
        Ok(ack)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SyncError> {
        let method = request.method;
        let url = request.path.clone();
        self.transport.execute(request).await.map_err(|e| {
            tracing::warn!(method = method.as_str(), %url, error = %e, "request failed without a response");
            SyncError::from(e)
        })
    }

    /// Resolve names and open streams for every image, in order.
    fn open_attachments(&self, images: &[ImageRef], tracker: &UploadTracker) -> Result<Vec<FormPart>, SyncError> {
        let resolver = &*self.resolver;
        let opened = panic::catch_unwind(AssertUnwindSafe(|| {
            images
                .iter()
                .enumerate()
                .map(|(index, reference)| {
                    let display_name = resolver.display_name(reference);
                    let mime = resolver.mime_type(reference);
                    let file_name = attachment::file_name(index, display_name.as_deref(), mime.as_deref());
                    let stream = resolver
                        .open_stream(reference)
                        .map_err(|e| SyncError::AttachmentRead {
                            reference: reference.clone(),
                            reason: e.to_string(),
                        })?;
                    Ok(FormPart {
                        name: IMAGE_PART_NAME.to_string(),
                        file_name: Some(file_name),
                        content_type: IMAGE_PART_CONTENT_TYPE.to_string(),
                        body: PartBody::Stream(tracker.wrap(reference.clone(), stream)),
                    })
                })
                .collect::<Result<Vec<_>, SyncError>>()
        }));
        opened.unwrap_or_else(|_| Err(SyncError::Unexpected("content resolver panicked".to_string())))
    }
}

fn report<V>(operation: &'static str, result: Result<V, SyncError>) -> Result<V, SyncError> {
    if let Err(e) = &result {
        tracing::warn!(operation, status = e.status(), error = %e, "diary call failed");
    }
    result
}

/// Remembers which attachment broke while the body was streaming, so an
/// aborted upload is reported against the image rather than the network.
#[derive(Debug, Default)]
struct UploadTracker {
    failed: Arc<Mutex<Option<(ImageRef, String)>>>,
}

impl UploadTracker {
    fn wrap(&self, reference: ImageRef, inner: AttachmentStream) -> AttachmentStream {
        Box::pin(TrackedReader {
            inner,
            reference,
            failed: Arc::clone(&self.failed),
        })
    }

    fn take_failure(&self) -> Option<SyncError> {
        let (reference, reason) = self.failed.lock().ok()?.take()?;
        Some(SyncError::AttachmentRead { reference, reason })
    }
}

struct TrackedReader {
    inner: AttachmentStream,
    reference: ImageRef,
    failed: Arc<Mutex<Option<(ImageRef, String)>>>,
}

impl AsyncRead for TrackedReader {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let poll = this.inner.as_mut().poll_read(cx, buf);
        if let Poll::Ready(Err(e)) = &poll {
            if let Ok(mut slot) = this.failed.lock() {
                slot.get_or_insert_with(|| (this.reference.clone(), e.to_string()));
            }
        }
        poll
    }
}
