//! Free-positioned tiles inside image and video containers.

use crate::model::media::{MediaItem, MediaType};
use crate::style::TextAlign;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Width and height given to items loaded without geometry.
pub const DEFAULT_ITEM_EXTENT: f64 = 100.0;

fn default_extent() -> f64 {
    DEFAULT_ITEM_EXTENT
}

/// Tag of a [`GridItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridItemType {
    Image,
    Video,
    Text,
}

impl From<MediaType> for GridItemType {
    fn from(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Image => GridItemType::Image,
            MediaType::Video => GridItemType::Video,
        }
    }
}

/// Per-kind payload of a [`GridItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum GridItemKind {
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        media_id: Option<String>,
        /// Resolved asset URL.
        #[serde(default)]
        content: String,
    },
    Video {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        media_id: Option<String>,
        #[serde(default)]
        content: String,
    },
    Text {
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_weight: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_family: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text_align: Option<TextAlign>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        background_color: Option<String>,
    },
}

/// A single text style field, used for per-item style edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum TextStyleField {
    FontSize(f64),
    FontWeight(String),
    Color(String),
    FontFamily(String),
    TextAlign(TextAlign),
    BackgroundColor(String),
}

/// An absolutely positioned tile, in pixels relative to the container origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridItem {
    pub id: String,
    #[serde(flatten)]
    pub kind: GridItemKind,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_extent")]
    pub width: f64,
    #[serde(default = "default_extent")]
    pub height: f64,
}

impl GridItem {
    /// Create a media tile referencing `media` by id.
    pub fn from_media(id: impl Into<String>, media: &MediaItem, frame: Rect) -> Self {
        let media_id = Some(media.id.clone());
        let content = media.url.clone();
        let kind = match media.media_type {
            MediaType::Image => GridItemKind::Image { media_id, content },
            MediaType::Video => GridItemKind::Video { media_id, content },
        };
        Self::with_frame(id.into(), kind, frame)
    }

    /// Create a text tile.
    pub fn text(id: impl Into<String>, content: impl Into<String>, frame: Rect) -> Self {
        let kind = GridItemKind::Text {
            content: content.into(),
            font_size: None,
            font_weight: None,
            color: None,
            font_family: None,
            text_align: None,
            background_color: None,
        };
        Self::with_frame(id.into(), kind, frame)
    }

    fn with_frame(id: String, kind: GridItemKind, frame: Rect) -> Self {
        Self {
            id,
            kind,
            x: frame.x0,
            y: frame.y0,
            width: frame.width(),
            height: frame.height(),
        }
    }

    pub fn item_type(&self) -> GridItemType {
        match self.kind {
            GridItemKind::Image { .. } => GridItemType::Image,
            GridItemKind::Video { .. } => GridItemType::Video,
            GridItemKind::Text { .. } => GridItemType::Text,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, GridItemKind::Text { .. })
    }

    pub fn media_id(&self) -> Option<&str> {
        match &self.kind {
            GridItemKind::Image { media_id, .. } | GridItemKind::Video { media_id, .. } => {
                media_id.as_deref()
            }
            GridItemKind::Text { .. } => None,
        }
    }

    /// URL for media tiles, text for text tiles.
    pub fn content(&self) -> &str {
        match &self.kind {
            GridItemKind::Image { content, .. }
            | GridItemKind::Video { content, .. }
            | GridItemKind::Text { content, .. } => content,
        }
    }

    pub fn set_content(&mut self, value: impl Into<String>) {
        match &mut self.kind {
            GridItemKind::Image { content, .. }
            | GridItemKind::Video { content, .. }
            | GridItemKind::Text { content, .. } => *content = value.into(),
        }
    }

    /// Apply a style edit. Returns false for non-text items.
    pub fn set_style(&mut self, field: TextStyleField) -> bool {
        let GridItemKind::Text {
            font_size,
            font_weight,
            color,
            font_family,
            text_align,
            background_color,
            ..
        } = &mut self.kind
        else {
            return false;
        };
        match field {
            TextStyleField::FontSize(v) => *font_size = Some(v),
            TextStyleField::FontWeight(v) => *font_weight = Some(v),
            TextStyleField::Color(v) => *color = Some(v),
            TextStyleField::FontFamily(v) => *font_family = Some(v),
            TextStyleField::TextAlign(v) => *text_align = Some(v),
            TextStyleField::BackgroundColor(v) => *background_color = Some(v),
        }
        true
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn frame(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }

    /// Force non-negative geometry.
    pub fn clamp_non_negative(&mut self) {
        self.x = self.x.max(0.0);
        self.y = self.y.max(0.0);
        self.width = self.width.max(0.0);
        self.height = self.height.max(0.0);
    }

    /// Fit the item inside a container of the given size.
    ///
    /// Size is reduced first (never below `min_size` unless the container
    /// itself is smaller), then the origin is pulled back inside.
    pub fn clamp_to(&mut self, container: Size, min_size: f64) {
        self.clamp_non_negative();
        self.width = fit_extent(self.width, container.width, min_size);
        self.height = fit_extent(self.height, container.height, min_size);
        self.x = self.x.min((container.width - self.width).max(0.0));
        self.y = self.y.min((container.height - self.height).max(0.0));
    }
}

fn fit_extent(extent: f64, available: f64, min_size: f64) -> f64 {
    let floor = min_size.min(available).max(0.0);
    extent.min(available).max(floor)
}
