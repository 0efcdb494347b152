//! In-memory media service.

use super::{
    BoxFuture, ClientError, ClientResult, DEFAULT_API_BASE_URL, MediaClient, SavedMediaItem,
    UploadRequest, resolve_media_url,
};
use crate::model::MediaItem;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// In-memory media service for testing and headless use.
///
/// Uploaded bytes are kept per generated filename and portfolios per user.
/// Switching it offline makes every call fail with a transport error.
pub struct MemoryMediaClient {
    base_url: String,
    files: RwLock<HashMap<String, Vec<u8>>>,
    portfolios: RwLock<HashMap<String, Vec<SavedMediaItem>>>,
    offline: AtomicBool,
}

impl Default for MemoryMediaClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl MemoryMediaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            files: RwLock::new(HashMap::new()),
            portfolios: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Simulate an unreachable service.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored files.
    pub fn file_count(&self) -> usize {
        self.files.read().map(|files| files.len()).unwrap_or(0)
    }

    fn check_online(&self) -> ClientResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(ClientError::Transport("service unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

fn lock_error<E: std::fmt::Display>(err: E) -> ClientError {
    ClientError::Transport(format!("Lock error: {}", err))
}

fn extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(index) if index > 0 => &filename[index..],
        _ => "",
    }
}

impl MediaClient for MemoryMediaClient {
    fn upload_file(&self, request: UploadRequest) -> BoxFuture<'_, ClientResult<MediaItem>> {
        Box::pin(async move {
            self.check_online()?;
            let media_type = request
                .media_type()
                .ok_or_else(|| ClientError::UnsupportedMediaType(request.content_type.clone()))?;

            let id = Uuid::new_v4().to_string();
            let filename = format!("{}{}", id, extension(&request.filename));
            self.files
                .write()
                .map_err(lock_error)?
                .insert(filename.clone(), request.bytes);

            let path = format!("/uploads/{}", filename);
            Ok(MediaItem {
                url: resolve_media_url(&self.base_url, Some(&path), &filename),
                id,
                filename,
                media_type,
                title: request.title,
                description: request.description,
                category: request.category,
                date: request.date.filter(|date| !date.is_empty()),
            })
        })
    }

    fn save_portfolio(&self, user_id: &str, items: &[MediaItem]) -> BoxFuture<'_, ClientResult<()>> {
        let user_id = user_id.to_string();
        let items: Vec<SavedMediaItem> = items.iter().map(SavedMediaItem::from).collect();
        Box::pin(async move {
            self.check_online()?;
            self.portfolios
                .write()
                .map_err(lock_error)?
                .insert(user_id, items);
            Ok(())
        })
    }

    fn load_portfolio(&self, user_id: &str) -> BoxFuture<'_, ClientResult<Vec<MediaItem>>> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            self.check_online()?;
            let portfolios = self.portfolios.read().map_err(lock_error)?;
            Ok(portfolios
                .get(&user_id)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|item| item.into_media_item(&self.base_url))
                .collect())
        })
    }
}
