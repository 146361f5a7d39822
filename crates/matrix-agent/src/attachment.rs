// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-supplied file attachments.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use matrix_core::error::MatrixError;
use matrix_core::types::{AttachmentPreview, InlineData};
use tracing::debug;

/// A file read into memory and base64-encoded for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    /// Base64 payload without the `data:` prefix.
    pub data: String,
}

impl Attachment {
    /// Reads `path` and encodes it. The MIME type comes from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, MatrixError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| MatrixError::Attachment {
                path: path.display().to_string(),
                source,
            })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let attachment = Self::from_bytes(name, mime_for(path), &bytes);
        debug!(
            name = %attachment.name,
            mime_type = %attachment.mime_type,
            size = bytes.len(),
            "attachment loaded"
        );
        Ok(attachment)
    }

    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// `data:` URL for display.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn preview(&self) -> AttachmentPreview {
        AttachmentPreview {
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            preview: self.data_url(),
        }
    }

    pub fn inline_data(&self) -> InlineData {
        InlineData {
            mime_type: self.mime_type.clone(),
            data: self.data.clone(),
        }
    }
}

/// MIME type inferred from the file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "sol" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_by_extension() {
        assert_eq!(mime_for(Path::new("shot.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("a/b/photo.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("report.pdf")), "application/pdf");
        assert_eq!(mime_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn data_url_and_preview() {
        let a = Attachment::from_bytes("x.png", "image/png", b"hello");
        assert_eq!(a.data, "aGVsbG8=");
        assert_eq!(a.data_url(), "data:image/png;base64,aGVsbG8=");
        assert!(a.is_image());
        let p = a.preview();
        assert_eq!(p.name, "x.png");
        assert_eq!(p.preview, a.data_url());
        assert_eq!(a.inline_data().data, "aGVsbG8=");
    }

    #[tokio::test]
    async fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let a = Attachment::from_path(&path).await.unwrap();
        assert_eq!(a.name, "graph.png");
        assert_eq!(a.mime_type, "image/png");
        assert_eq!(a.data, STANDARD.encode([0x89, b'P', b'N', b'G']));
    }

    #[tokio::test]
    async fn missing_file_is_attachment_error() {
        let err = Attachment::from_path("/nonexistent/matrix/shot.png")
            .await
            .unwrap_err();
        match err {
            MatrixError::Attachment { path, source } => {
                assert!(path.ends_with("shot.png"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
