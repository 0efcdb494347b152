//! Media library entries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of uploaded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Classify an upload by its MIME type.
    ///
    /// Only the formats the upload endpoint accepts are recognised.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "image/jpeg" | "image/png" | "image/gif" | "image/webp" => Some(MediaType::Image),
            "video/mp4" | "video/quicktime" | "video/webm" | "video/ogg" => Some(MediaType::Video),
            _ => None,
        }
    }
}

/// An uploaded asset. Elements reference these by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub filename: String,
    pub media_type: MediaType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub url: String,
}

/// Partial update for a [`MediaItem`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaItemUpdate {
    pub filename: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<Option<String>>,
    pub url: Option<String>,
}

impl MediaItem {
    /// Merge a partial update into this item.
    pub fn apply(&mut self, update: MediaItemUpdate) {
        if let Some(filename) = update.filename {
            self.filename = filename;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(url) = update.url {
            self.url = url;
        }
    }
}

/// Insertion-ordered mapping of media items keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaLibrary {
    items: HashMap<String, MediaItem>,
    order: Vec<String>,
}

impl MediaLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library from a list, later duplicates replacing earlier ones.
    pub fn from_items(items: impl IntoIterator<Item = MediaItem>) -> Self {
        let mut library = Self::new();
        for item in items {
            library.insert(item);
        }
        library
    }

    /// Insert or replace an item. Replacing keeps the original position.
    pub fn insert(&mut self, item: MediaItem) {
        if !self.items.contains_key(&item.id) {
            self.order.push(item.id.clone());
        }
        self.items.insert(item.id.clone(), item);
    }

    pub fn remove(&mut self, id: &str) -> Option<MediaItem> {
        self.order.retain(|existing| existing != id);
        self.items.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&MediaItem> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut MediaItem> {
        self.items.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MediaItem> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Items of one media type, in insertion order.
    pub fn of_type(&self, media_type: MediaType) -> impl Iterator<Item = &MediaItem> {
        self.iter().filter(move |item| item.media_type == media_type)
    }

    /// Items grouped under a category, in insertion order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a MediaItem> {
        self.iter().filter(move |item| item.category == category)
    }

    pub fn to_vec(&self) -> Vec<MediaItem> {
        self.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
