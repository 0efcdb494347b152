//! Free-position layout inside image and video containers.
//!
//! A container owns an ordered list of absolutely positioned [`GridItem`]s.
//! [`FreeLayout`] drives move/resize gestures over those items, keeps them
//! inside the container bounds, and reports every committed change through
//! an update callback with the complete item list.
//!
//! [`GridItem`]: crate::model::GridItem

mod free_position;
mod selection;

pub use free_position::{FreeLayout, UpdateCallback, apply_move, apply_resize};
pub use selection::{EditKey, EditKeyOutcome, ItemSelection, ItemState, TextEdit};

use crate::model::{ElementType, MediaType};
use crate::snap::SnapMode;
use crate::style::TextAlign;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Where new items are placed.
pub const NEW_ITEM_OFFSET: f64 = 20.0;

/// Size of a freshly added text item.
pub const TEXT_ITEM_SIZE: Size = Size::new(200.0, 80.0);

/// Which container an engine instance serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Image,
    Video,
}

impl ContainerKind {
    pub fn from_element_type(element_type: ElementType) -> Option<Self> {
        match element_type {
            ElementType::Image => Some(ContainerKind::Image),
            ElementType::Video => Some(ContainerKind::Video),
            _ => None,
        }
    }

    /// Media type this container accepts.
    pub fn media_type(self) -> MediaType {
        match self {
            ContainerKind::Image => MediaType::Image,
            ContainerKind::Video => MediaType::Video,
        }
    }

    /// Size of a freshly added media item.
    pub fn media_item_size(self) -> Size {
        match self {
            ContainerKind::Image => Size::new(200.0, 150.0),
            ContainerKind::Video => Size::new(300.0, 200.0),
        }
    }

    /// Default style of a freshly added text item.
    pub fn text_defaults(self) -> TextDefaults {
        match self {
            ContainerKind::Image => TextDefaults {
                color: "#333333",
                font_family: "Inter, sans-serif",
                text_align: TextAlign::Center,
            },
            ContainerKind::Video => TextDefaults {
                color: "#000000",
                font_family: "var(--font-inter)",
                text_align: TextAlign::Left,
            },
        }
    }
}

/// Per-container text item style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextDefaults {
    pub color: &'static str,
    pub font_family: &'static str,
    pub text_align: TextAlign,
}

/// Snap and minimum-size rules shared by every gesture in a container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPolicy {
    #[serde(default)]
    pub snap: SnapMode,
    pub min_size: f64,
}

impl ContainerPolicy {
    pub fn for_kind(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Image => Self {
                snap: SnapMode::grid(),
                min_size: 60.0,
            },
            ContainerKind::Video => Self {
                snap: SnapMode::None,
                min_size: 50.0,
            },
        }
    }
}

/// Resize handle on an item's frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    pub fn moves_north(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NE | ResizeHandle::NW)
    }

    pub fn moves_south(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::SE | ResizeHandle::SW)
    }

    pub fn moves_east(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE)
    }

    pub fn moves_west(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }
}

/// What a drag gesture does to its item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "handle", rename_all = "lowercase")]
pub enum DragMode {
    Move,
    Resize(ResizeHandle),
}
