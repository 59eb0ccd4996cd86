//! Document loading and emission.
//!
//! Handles loading documents from files, strings, and HTTP URLs, and
//! writing the filtered result back out.

use std::path::Path;

use serde_json::Value;

use crate::error::DocumentError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a document from a file path.
///
/// # Errors
///
/// Returns `DocumentError::FileNotFound` if the file doesn't exist,
/// or `DocumentError::InvalidJson` if the file isn't valid JSON.
pub fn load_document(path: &Path) -> Result<Value, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| DocumentError::InvalidJson { source })
}

/// Load a document from a JSON string.
///
/// # Errors
///
/// Returns `DocumentError::InvalidJson` if the string isn't valid JSON.
pub fn load_document_str(content: &str) -> Result<Value, DocumentError> {
    serde_json::from_str(content).map_err(|source| DocumentError::InvalidJson { source })
}

/// Load a document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default). This only fetches
/// the input document itself; `$ref` targets are never fetched.
///
/// # Errors
///
/// Returns `DocumentError::NetworkError` if the request fails,
/// or `DocumentError::InvalidJson` if the response isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_document_url(url: &str) -> Result<Value, DocumentError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|source| DocumentError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .get(url)
        .send()
        .map_err(|source| DocumentError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let response = response
        .error_for_status()
        .map_err(|source| DocumentError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    response
        .json()
        .map_err(|source| DocumentError::NetworkError {
            url: url.to_string(),
            source,
        })
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a document from a file path or URL.
///
/// Automatically detects whether the source is a URL or file path.
/// URL loading requires the `remote` feature.
pub fn load_document_auto(source: &str) -> Result<Value, DocumentError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_document_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(DocumentError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_document(Path::new(source))
    }
}

/// Write a document to a file.
///
/// Serializes fully to a string before touching the filesystem, so a
/// serialization failure never leaves a partial output file behind.
pub fn write_document(path: &Path, document: &Value, pretty: bool) -> Result<(), DocumentError> {
    let rendered = render_document(document, pretty)?;
    std::fs::write(path, rendered).map_err(|source| DocumentError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a document to a JSON string.
pub fn render_document(document: &Value, pretty: bool) -> Result<String, DocumentError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    };
    rendered.map_err(|source| DocumentError::Serialize { source })
}
