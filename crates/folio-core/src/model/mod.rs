//! Document model: media library entries, page elements, and grid items.

mod element;
mod grid_item;
mod layout;
mod media;

pub use element::{
    DEFAULT_TEXT_CONTENT, ElementKind, ElementType, ElementUpdate, PortfolioElement, Properties,
    default_properties,
};
pub use grid_item::{DEFAULT_ITEM_EXTENT, GridItem, GridItemKind, GridItemType, TextStyleField};
pub use layout::{ElementLocation, FoundElement, PortfolioLayout};
pub use media::{MediaItem, MediaItemUpdate, MediaLibrary, MediaType};

use uuid::Uuid;

/// Generate a globally unique id with a readable prefix.
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}
