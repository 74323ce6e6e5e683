//! Uploaded HTML templates

use thiserror::Error;

/// Errors that can occur when accepting an uploaded file
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    /// The declared type is not `text/html`
    #[error("Invalid file type \"{0}\": the file must be HTML (text/html).")]
    InvalidFileType(String),

    /// The file is not UTF-8 text
    #[error("The HTML file is not valid UTF-8 text.")]
    InvalidEncoding,
}

/// An uploaded HTML template
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtmlDocument {
    file_name: Option<String>,
    content: String,
}

impl HtmlDocument {
    /// Accept an upload if its declared content type is HTML.
    ///
    /// Parameters such as `; charset=utf-8` are ignored and the comparison is case
    /// insensitive. A missing content type counts as not HTML.
    pub fn from_upload(
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<Self, UploadError> {
        let content_type = content_type.unwrap_or_default();

        if !is_html(content_type) {
            let declared = if content_type.trim().is_empty() {
                "unknown"
            } else {
                content_type
            };

            return Err(UploadError::InvalidFileType(declared.to_string()));
        }

        let content = String::from_utf8(bytes.to_vec()).map_err(|_| UploadError::InvalidEncoding)?;

        Ok(Self {
            file_name: file_name.map(str::to_string),
            content,
        })
    }

    /// The uploaded file name, if the client sent one
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// The full text of the file
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Split into file name and content
    pub fn into_parts(self) -> (Option<String>, String) {
        (self.file_name, self.content)
    }
}

fn is_html(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case("text/html"))
}
