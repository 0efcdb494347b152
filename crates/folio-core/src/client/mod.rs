//! Contract with the media upload and portfolio persistence service.

mod memory;

pub use memory::MemoryMediaClient;

use crate::model::{MediaItem, MediaType};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Base URL of the media service.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Errors reported by a [`MediaClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed with status {0}")]
    Status(u16),
    #[error("Unsupported file type: {0}")]
    UnsupportedMediaType(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A file to upload together with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    /// MIME type of the file.
    pub content_type: String,
    #[serde(default, skip_serializing)]
    pub bytes: Vec<u8>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl UploadRequest {
    /// Media type implied by the content type, if accepted.
    pub fn media_type(&self) -> Option<MediaType> {
        MediaType::from_content_type(&self.content_type)
    }
}

/// The subset of a [`MediaItem`] that is persisted with a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMediaItem {
    pub id: String,
    pub filename: String,
    pub media_type: MediaType,
    pub title: String,
    pub description: String,
    pub category: String,
}

impl From<&MediaItem> for SavedMediaItem {
    fn from(item: &MediaItem) -> Self {
        Self {
            id: item.id.clone(),
            filename: item.filename.clone(),
            media_type: item.media_type,
            title: item.title.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
        }
    }
}

impl SavedMediaItem {
    /// Rebuild a media item, pointing its URL at `base_url`.
    pub fn into_media_item(self, base_url: &str) -> MediaItem {
        let url = resolve_media_url(base_url, None, &self.filename);
        MediaItem {
            id: self.id,
            filename: self.filename,
            media_type: self.media_type,
            title: self.title,
            description: self.description,
            category: self.category,
            date: None,
            url,
        }
    }
}

/// Absolute URL of an asset. Falls back to `/uploads/<filename>` when the
/// service did not report a path.
pub fn resolve_media_url(base_url: &str, path: Option<&str>, filename: &str) -> String {
    let base = base_url.trim_end_matches('/');
    match path.filter(|path| !path.is_empty()) {
        Some(path) => format!("{}{}", base, path),
        None => format!("{}/uploads/{}", base, filename),
    }
}

/// Media service used by the editor.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait MediaClient: Send + Sync {
    /// Upload a file and return its library entry.
    fn upload_file(&self, request: UploadRequest) -> BoxFuture<'_, ClientResult<MediaItem>>;

    /// Persist the media library of `user_id`.
    fn save_portfolio(&self, user_id: &str, items: &[MediaItem]) -> BoxFuture<'_, ClientResult<()>>;

    /// Fetch the saved media library of `user_id`.
    fn load_portfolio(&self, user_id: &str) -> BoxFuture<'_, ClientResult<Vec<MediaItem>>>;
}

/// Media service used by the editor (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait MediaClient {
    /// Upload a file and return its library entry.
    fn upload_file(&self, request: UploadRequest) -> BoxFuture<'_, ClientResult<MediaItem>>;

    /// Persist the media library of `user_id`.
    fn save_portfolio(&self, user_id: &str, items: &[MediaItem]) -> BoxFuture<'_, ClientResult<()>>;

    /// Fetch the saved media library of `user_id`.
    fn load_portfolio(&self, user_id: &str) -> BoxFuture<'_, ClientResult<Vec<MediaItem>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_media_url() {
        assert_eq!(
            resolve_media_url("http://localhost:8000", Some("/uploads/a.png"), "a.png"),
            "http://localhost:8000/uploads/a.png"
        );
        assert_eq!(
            resolve_media_url("http://localhost:8000/", None, "b.mp4"),
            "http://localhost:8000/uploads/b.mp4"
        );
        assert_eq!(
            resolve_media_url("http://host", Some(""), "c.gif"),
            "http://host/uploads/c.gif"
        );
    }

    #[test]
    fn test_saved_item_drops_url_and_date() {
        let item = MediaItem {
            id: "m1".into(),
            filename: "m1.png".into(),
            media_type: MediaType::Image,
            title: "Title".into(),
            description: "Desc".into(),
            category: "Other".into(),
            date: Some("2024-01-01".into()),
            url: "http://elsewhere/m1.png".into(),
        };
        let saved = SavedMediaItem::from(&item);
        let json = serde_json::to_value(&saved).unwrap();
        assert!(json.get("url").is_none());
        assert!(json.get("date").is_none());
        assert_eq!(json["media_type"], "image");
    }
}
