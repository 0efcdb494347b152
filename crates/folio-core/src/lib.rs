//! Folio Core Library
//!
//! Platform-agnostic document model, state reducer and interaction engines
//! for the Folio portfolio page builder.

pub mod capture;
pub mod client;
pub mod config;
pub mod editor;
pub mod input;
pub mod layout;
pub mod model;
pub mod reorder;
pub mod snap;
pub mod store;
pub mod style;

pub use capture::{CaptureGuard, PointerCaptures};
pub use client::{ClientError, MediaClient, MemoryMediaClient, UploadRequest};
pub use config::{ConfigError, EditorConfig};
pub use editor::{ContextMenu, Editor};
pub use input::{PointerDisambiguator, PointerOutcome, TargetNode};
pub use layout::{ContainerKind, ContainerPolicy, DragMode, FreeLayout, ResizeHandle};
pub use model::{
    ElementType, GridItem, MediaItem, MediaLibrary, MediaType, PortfolioElement, PortfolioLayout,
};
pub use reorder::{MoveDirection, ReorderCoordinator, SectionDirection};
pub use snap::{GRID_SIZE, SnapMode};
pub use store::{Action, PortfolioState, PortfolioStore};
