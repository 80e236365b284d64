//! Access to locally stored images.
//!
//! The sync client never touches storage directly; it asks a
//! `ContentResolver` for a display name, a MIME type and a byte stream.

use std::io;
use std::path::Path;

use crate::attachment::mime_for_extension;
use crate::http::AttachmentStream;
use crate::types::ImageRef;

pub trait ContentResolver: Send + Sync {
    /// Human-facing file name, if the store knows one.
    fn display_name(&self, reference: &ImageRef) -> Option<String>;

    fn mime_type(&self, reference: &ImageRef) -> Option<String>;

    /// Open the image for reading. The stream is dropped (closed) by the
    /// client once the upload finishes or fails.
    fn open_stream(&self, reference: &ImageRef) -> io::Result<AttachmentStream>;
}

/// Resolver treating each reference as a filesystem path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsResolver;

impl ContentResolver for FsResolver {
    fn display_name(&self, reference: &ImageRef) -> Option<String> {
        Path::new(reference.as_str())
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    }

    fn mime_type(&self, reference: &ImageRef) -> Option<String> {
        Path::new(reference.as_str())
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_for_extension)
            .map(str::to_string)
    }

    /// The open itself is a blocking `std::fs` call made on the calling task.
    /// That is cheap for local files; only the reads are async.
    fn open_stream(&self, reference: &ImageRef) -> io::Result<AttachmentStream> {
        let file = std::fs::File::open(reference.as_str())?;
        Ok(Box::pin(tokio::fs::File::from_std(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[test]
    fn display_name_is_the_file_name() {
        let r = ImageRef::new("/tmp/photos/beach.png");
        assert_eq!(FsResolver.display_name(&r).as_deref(), Some("beach.png"));
        assert_eq!(FsResolver.mime_type(&r).as_deref(), Some("image/png"));
    }

    #[test]
    fn unknown_extension_has_no_mime() {
        let r = ImageRef::new("/tmp/photos/scan.tiff");
        assert!(FsResolver.mime_type(&r).is_none());
    }

    #[test]
    fn missing_file_fails_to_open() {
        let r = ImageRef::new("/definitely/not/here.jpg");
        assert!(FsResolver.open_stream(&r).is_err());
    }

    #[tokio::test]
    async fn open_stream_reads_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.webp");
        std::fs::write(&path, b"RIFFxxxxWEBP").unwrap();

        let r = ImageRef::new(path.to_str().unwrap());
        let mut stream = FsResolver.open_stream(&r).unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"RIFFxxxxWEBP");
    }
}
