//! Document loading
//!
//! The engine only ever consumes "file selected → (name, full text)". No
//! format-specific extraction is performed: files with a known binary
//! extension, or content that is not valid UTF-8, are rejected up front
//! instead of being fed to the model as garbled text.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// File extensions we refuse to read as plain text.
const BINARY_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "ppt", "pptx", "xls", "xlsx", "odt", "zip", "gz", "tar", "png", "jpg",
    "jpeg", "gif", "exe", "bin",
];

/// An uploaded document: display name plus full text content.
///
/// Ephemeral — held in memory for the current session only and replaced
/// wholesale on a new upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Display name (the file name, not the full path)
    pub name: String,

    /// Full text content
    pub text: String,
}

/// Errors from document loading
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported format '.{extension}': only plain-text documents can be processed")]
    UnsupportedFormat { extension: String },

    #[error("{name} is not valid UTF-8 text")]
    NotText { name: String },
}

impl Document {
    /// Construct a document directly from a name and text content.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Load a document from a file path.
    ///
    /// Rejects known binary formats by extension before reading, and
    /// non-UTF-8 content after.
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
            let lower = extension.to_ascii_lowercase();
            if BINARY_EXTENSIONS.contains(&lower.as_str()) {
                return Err(DocumentError::UnsupportedFormat { extension: lower });
            }
        }

        let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
            name: name.clone(),
            source,
        })?;

        let text = String::from_utf8(bytes)
            .map_err(|_| DocumentError::NotText { name: name.clone() })?;

        debug!(name = %name, chars = text.len(), "document loaded");

        Ok(Self { name, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_plain_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "meeting notes").unwrap();

        let doc = Document::from_path(&path).unwrap();
        assert_eq!(doc.name, "notes.txt");
        assert_eq!(doc.text, "meeting notes");
    }

    #[test]
    fn test_reject_binary_extension_without_reading() {
        // The file doesn't even exist; extension check fires first.
        let err = Document::from_path(Path::new("/nonexistent/report.pdf")).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::UnsupportedFormat { ref extension } if extension == "pdf"
        ));
    }

    #[test]
    fn test_reject_non_utf8_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x80]).unwrap();

        let err = Document::from_path(&path).unwrap_err();
        assert!(matches!(err, DocumentError::NotText { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Document::from_path(Path::new("/nonexistent/notes.txt")).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        let err = Document::from_path(Path::new("/nonexistent/report.PDF")).unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedFormat { .. }));
    }
}
