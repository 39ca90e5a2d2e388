//! Message attachments.

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::error::{SocketLabsError, SocketLabsResult};

use super::CustomHeader;

/// Common attachment MIME types.
pub mod mime_type {
    /// Bitmap image.
    pub const BMP: &str = "image/bmp";
    /// Comma separated values.
    pub const CSV: &str = "text/csv";
    /// Microsoft Word document.
    pub const DOC: &str = "application/msword";
    /// Microsoft Word (OpenXML) document.
    pub const DOCX: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
    /// GIF image.
    pub const GIF: &str = "image/gif";
    /// HTML document.
    pub const HTML: &str = "text/html";
    /// JPEG image.
    pub const JPEG: &str = "image/jpeg";
    /// PDF document.
    pub const PDF: &str = "application/pdf";
    /// PNG image.
    pub const PNG: &str = "image/png";
    /// Microsoft PowerPoint presentation.
    pub const PPT: &str = "application/vnd.ms-powerpoint";
    /// Microsoft PowerPoint (OpenXML) presentation.
    pub const PPTX: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation";
    /// Plain text.
    pub const TEXT: &str = "text/plain";
    /// Microsoft Excel workbook.
    pub const XLS: &str = "application/vnd.ms-excel";
    /// Microsoft Excel (OpenXML) workbook.
    pub const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
    /// XML document.
    pub const XML: &str = "application/xml";
    /// ZIP archive.
    pub const ZIP: &str = "application/x-zip-compressed";
}

/// A file attached to a message.
///
/// The content is held in memory and base64 encoded when the request is built.
/// Setting [`content_id`](Attachment::content_id) lets the HTML body embed the
/// attachment inline with `<img src="cid:...">`.
///
/// # Examples
///
/// ```rust
/// use integrations_socketlabs::types::{mime_type, Attachment};
///
/// let logo = Attachment::new("logo.png", mime_type::PNG, vec![0x89, 0x50, 0x4e, 0x47])
///     .with_content_id("logo");
///
/// assert_eq!(logo.content_id.as_deref(), Some("logo"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
    /// File name shown to the recipient.
    pub name: String,
    /// MIME type of the content.
    pub mime_type: String,
    /// Raw content.
    pub content: Vec<u8>,
    /// Content id for inline references.
    pub content_id: Option<String>,
    /// Headers added to the attachment's MIME part.
    pub custom_headers: Vec<CustomHeader>,
}

impl Attachment {
    /// Create an attachment from in-memory content.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: content.into(),
            content_id: None,
            custom_headers: Vec::new(),
        }
    }

    /// Read an attachment from disk.
    ///
    /// The name is the file name and the MIME type is guessed from the
    /// extension, falling back to `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns `SocketLabsError::Io` if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> SocketLabsResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Self::from_path_with(name, mime_type, path)
    }

    /// Read an attachment from disk with an explicit name and MIME type.
    ///
    /// # Errors
    ///
    /// Returns `SocketLabsError::Io` if the file cannot be read.
    pub fn from_path_with(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> SocketLabsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|e| SocketLabsError::Io {
            message: format!("Failed to read attachment '{}'", path.display()),
            source: e,
        })?;

        Ok(Self::new(name, mime_type, content))
    }

    /// Read an attachment from any reader.
    ///
    /// # Errors
    ///
    /// Returns `SocketLabsError::Io` if reading fails.
    pub fn from_reader(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        mut reader: impl Read,
    ) -> SocketLabsResult<Self> {
        let name = name.into();
        let mut content = Vec::new();
        reader
            .read_to_end(&mut content)
            .map_err(|e| SocketLabsError::Io {
                message: format!("Failed to read attachment '{}'", name),
                source: e,
            })?;

        Ok(Self::new(name, mime_type, content))
    }

    /// Set the content id used for inline references.
    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    /// Add a header to the attachment's MIME part.
    pub fn with_custom_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push(CustomHeader::new(name, value));
        self
    }
}

impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.mime_type)
    }
}
