//! Move/resize engine for one container's grid items.

use super::selection::{EditKey, EditKeyOutcome, ItemSelection, ItemState};
use super::{ContainerKind, ContainerPolicy, DragMode, NEW_ITEM_OFFSET, ResizeHandle, TEXT_ITEM_SIZE};
use crate::capture::{CaptureGuard, PointerCaptures};
use crate::model::{DEFAULT_TEXT_CONTENT, GridItem, MediaItem, TextStyleField, new_id};
use kurbo::{Point, Rect, Size, Vec2};
use std::fmt;

/// Receives the complete item list after every committed change.
pub type UpdateCallback = Box<dyn FnMut(Vec<GridItem>)>;

/// Translate a frame by `delta`, snapping the origin and keeping the frame
/// inside the container.
pub fn apply_move(start: Rect, delta: Vec2, container: Size, policy: ContainerPolicy) -> Rect {
    let size = start.size();
    let origin = policy.snap.apply_point(start.origin() + delta);
    let x = clamp_axis(origin.x, container.width - size.width);
    let y = clamp_axis(origin.y, container.height - size.height);
    Rect::from_origin_size(Point::new(x, y), size)
}

/// Resize a frame from `handle` by `delta`.
///
/// Each active edge moves on its own while the opposite edge stays put. The
/// minimum size is applied before the origin is recomputed for north/west
/// edges, and the origin never goes negative.
pub fn apply_resize(
    start: Rect,
    handle: ResizeHandle,
    delta: Vec2,
    container: Size,
    policy: ContainerPolicy,
) -> Rect {
    let (x, width) = resize_axis(
        start.x0,
        start.width(),
        delta.x,
        container.width,
        policy,
        handle.moves_west(),
        handle.moves_east(),
    );
    let (y, height) = resize_axis(
        start.y0,
        start.height(),
        delta.y,
        container.height,
        policy,
        handle.moves_north(),
        handle.moves_south(),
    );
    Rect::from_origin_size(Point::new(x, y), Size::new(width, height))
}

fn resize_axis(
    origin: f64,
    extent: f64,
    delta: f64,
    available: f64,
    policy: ContainerPolicy,
    leading: bool,
    trailing: bool,
) -> (f64, f64) {
    if trailing {
        let limit = (available - origin).max(0.0);
        let extent = policy.snap.apply(extent + delta).max(policy.min_size).min(limit);
        (origin, extent)
    } else if leading {
        // The trailing edge is the anchor
        let anchor = origin + extent;
        let extent = policy.snap.apply(extent - delta).max(policy.min_size).min(anchor);
        (anchor - extent, extent)
    } else {
        (origin, extent)
    }
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    value.clamp(0.0, max.max(0.0))
}

fn set_frame(item: &mut GridItem, frame: Rect) {
    item.x = frame.x0;
    item.y = frame.y0;
    item.width = frame.width();
    item.height = frame.height();
}

/// An in-progress move or resize.
#[derive(Debug)]
struct DragSession {
    item_id: String,
    mode: DragMode,
    pointer_start: Point,
    start_frame: Rect,
    _capture: CaptureGuard,
}

/// Free-position layout engine for one container element.
pub struct FreeLayout {
    container_id: String,
    kind: ContainerKind,
    policy: ContainerPolicy,
    container: Size,
    items: Vec<GridItem>,
    selection: ItemSelection,
    captures: PointerCaptures,
    drag: Option<DragSession>,
    on_update: UpdateCallback,
}

impl fmt::Debug for FreeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreeLayout")
            .field("container_id", &self.container_id)
            .field("kind", &self.kind)
            .field("policy", &self.policy)
            .field("container", &self.container)
            .field("items", &self.items)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

impl FreeLayout {
    /// Create an engine over `items`. Items are fitted into the container
    /// without notifying the callback.
    pub fn new(
        container_id: impl Into<String>,
        kind: ContainerKind,
        container: Size,
        items: Vec<GridItem>,
        captures: PointerCaptures,
        on_update: UpdateCallback,
    ) -> Self {
        let mut layout = Self {
            container_id: container_id.into(),
            kind,
            policy: ContainerPolicy::for_kind(kind),
            container,
            items,
            selection: ItemSelection::new(),
            captures,
            drag: None,
            on_update,
        };
        layout.clamp_items();
        layout
    }

    /// Override the snap/min-size policy.
    pub fn with_policy(mut self, policy: ContainerPolicy) -> Self {
        self.policy = policy;
        self.clamp_items();
        self
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn policy(&self) -> ContainerPolicy {
        self.policy
    }

    pub fn container_size(&self) -> Size {
        self.container
    }

    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&GridItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn item_mut(&mut self, id: &str) -> Option<&mut GridItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    fn commit(&mut self) {
        log::debug!(
            "Container {} committing {} items",
            self.container_id,
            self.items.len()
        );
        (self.on_update)(self.items.clone());
    }

    /// Fit every item into the container. Returns true if anything moved.
    fn clamp_items(&mut self) -> bool {
        let mut changed = false;
        for item in &mut self.items {
            let before = item.frame();
            item.clamp_to(self.container, self.policy.min_size);
            changed |= item.frame() != before;
        }
        changed
    }

    // --- Gestures ---

    /// Start moving or resizing `item_id` from pointer position `pointer`.
    ///
    /// Selects the item and holds a pointer capture until the gesture ends.
    /// A gesture already in progress is cancelled first.
    pub fn begin_drag(&mut self, item_id: &str, mode: DragMode, pointer: Point) -> bool {
        if self.drag.is_some() {
            self.cancel_drag();
        }

        let Some(start_frame) = self.item(item_id).map(GridItem::frame) else {
            log::debug!("Drag on unknown item {} in {}", item_id, self.container_id);
            return false;
        };

        self.selection.select(item_id);
        let capture = self.captures.acquire(&self.container_id);
        log::debug!("Drag of {} holds capture {:?}", item_id, capture.id());
        self.drag = Some(DragSession {
            item_id: item_id.to_string(),
            mode,
            pointer_start: pointer,
            start_frame,
            _capture: capture,
        });
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Item being dragged, if any.
    pub fn drag_item(&self) -> Option<&str> {
        self.drag.as_ref().map(|drag| drag.item_id.as_str())
    }

    /// Apply the cumulative pointer delta since `begin_drag`. Returns the
    /// item's new frame, or `None` when no gesture is active.
    pub fn on_pointer_move(&mut self, delta: Vec2) -> Option<Rect> {
        let drag = self.drag.as_ref()?;
        let frame = match drag.mode {
            DragMode::Move => apply_move(drag.start_frame, delta, self.container, self.policy),
            DragMode::Resize(handle) => {
                apply_resize(drag.start_frame, handle, delta, self.container, self.policy)
            }
        };
        let item_id = drag.item_id.clone();
        let item = self.item_mut(&item_id)?;
        set_frame(item, frame);
        Some(frame)
    }

    /// Like [`on_pointer_move`](Self::on_pointer_move), from an absolute
    /// pointer position.
    pub fn drag_to(&mut self, pointer: Point) -> Option<Rect> {
        let start = self.drag.as_ref()?.pointer_start;
        self.on_pointer_move(pointer - start)
    }

    /// Finish the gesture and commit the item list.
    pub fn end_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        drop(drag);
        self.commit();
        true
    }

    /// Abandon the gesture and restore the item's starting frame.
    pub fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            if let Some(item) = self.item_mut(&drag.item_id) {
                set_frame(item, drag.start_frame);
            }
            log::debug!("Drag of {} cancelled", drag.item_id);
        }
    }

    // --- Selection ---

    pub fn selection(&self) -> &ItemSelection {
        &self.selection
    }

    pub fn item_state(&self, id: &str) -> ItemState {
        self.selection.state(id)
    }

    pub fn select_item(&mut self, id: &str) -> bool {
        if self.item(id).is_none() {
            return false;
        }
        self.selection.select(id);
        true
    }

    /// Click on the empty container background.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Toggle the style popover of a text item. Returns whether it is open.
    pub fn toggle_style_popover(&mut self, id: &str) -> bool {
        if !self.item(id).is_some_and(GridItem::is_text) {
            return false;
        }
        if self.selection.style_popover() == Some(id) {
            self.selection.close_style_popover();
            return false;
        }
        self.selection.select(id);
        self.selection.open_style_popover(id);
        true
    }

    // --- Inline text editing ---

    pub fn begin_text_edit(&mut self, id: &str) -> bool {
        let Some(item) = self.item(id).filter(|item| item.is_text()) else {
            return false;
        };
        let content = item.content().to_string();
        self.selection.begin_edit(id, &content);
        true
    }

    pub fn set_edit_text(&mut self, text: &str) -> bool {
        self.selection.set_buffer(text)
    }

    /// Enter without shift commits, shift+Enter adds a line break, Escape
    /// reverts.
    pub fn handle_edit_key(&mut self, key: EditKey) -> EditKeyOutcome {
        if self.selection.editing().is_none() {
            return EditKeyOutcome::Ignored;
        }
        match key {
            EditKey::Enter { shift: true } => {
                self.selection.push_newline();
                EditKeyOutcome::Continue
            }
            EditKey::Enter { shift: false } => {
                self.commit_text_edit();
                EditKeyOutcome::Committed
            }
            EditKey::Escape => {
                self.cancel_text_edit();
                EditKeyOutcome::Reverted
            }
        }
    }

    /// Commit the edit buffer (blur). Returns true if the item changed.
    pub fn commit_text_edit(&mut self) -> bool {
        let Some(edit) = self.selection.take_edit() else {
            return false;
        };
        let Some(item) = self.item_mut(&edit.item_id) else {
            return false;
        };
        if item.content() == edit.buffer {
            return false;
        }
        item.set_content(edit.buffer);
        self.commit();
        true
    }

    pub fn cancel_text_edit(&mut self) {
        self.selection.take_edit();
    }

    // --- Item operations ---

    /// Add a tile for `media`. Media of the wrong type is refused.
    pub fn add_media_item(&mut self, media: &MediaItem) -> Option<String> {
        if media.media_type != self.kind.media_type() {
            log::debug!(
                "Refusing {:?} media {} in {:?} container",
                media.media_type,
                media.id,
                self.kind
            );
            return None;
        }
        let id = new_id("item");
        let frame = Rect::from_origin_size(
            Point::new(NEW_ITEM_OFFSET, NEW_ITEM_OFFSET),
            self.kind.media_item_size(),
        );
        let mut item = GridItem::from_media(id.clone(), media, frame);
        item.clamp_to(self.container, self.policy.min_size);
        self.items.push(item);
        self.commit();
        Some(id)
    }

    /// Add a text tile styled for this container kind.
    pub fn add_text_item(&mut self) -> String {
        let id = new_id("item");
        let frame = Rect::from_origin_size(Point::new(NEW_ITEM_OFFSET, NEW_ITEM_OFFSET), TEXT_ITEM_SIZE);
        let mut item = GridItem::text(id.clone(), DEFAULT_TEXT_CONTENT, frame);

        let defaults = self.kind.text_defaults();
        for field in [
            TextStyleField::FontSize(16.0),
            TextStyleField::FontWeight("normal".into()),
            TextStyleField::Color(defaults.color.into()),
            TextStyleField::FontFamily(defaults.font_family.into()),
            TextStyleField::TextAlign(defaults.text_align),
            TextStyleField::BackgroundColor("transparent".into()),
        ] {
            item.set_style(field);
        }

        item.clamp_to(self.container, self.policy.min_size);
        self.items.push(item);
        self.commit();
        id
    }

    pub fn delete_item(&mut self, id: &str) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };
        if self.drag_item() == Some(id) {
            self.drag = None;
        }
        self.items.remove(index);
        self.selection.forget(id);
        self.commit();
        true
    }

    /// Change one style field of a text item.
    pub fn set_item_style(&mut self, id: &str, field: TextStyleField) -> bool {
        let applied = self.item_mut(id).is_some_and(|item| item.set_style(field));
        if applied {
            self.commit();
        }
        applied
    }

    /// Replace the items from new props. Does not notify the callback.
    pub fn set_items(&mut self, items: Vec<GridItem>) {
        self.items = items;
        self.clamp_items();

        if let Some(drag_id) = self.drag_item().map(str::to_string) {
            if self.item(&drag_id).is_none() {
                self.drag = None;
            }
        }
        let stale: Vec<String> = [
            self.selection.selected(),
            self.selection.style_popover(),
            self.selection.editing().map(|edit| edit.item_id.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|id| self.item(id).is_none())
        .map(str::to_string)
        .collect();
        for id in stale {
            self.selection.forget(&id);
        }
    }

    /// Change the container size, re-fitting items. Commits if any item
    /// had to move or shrink.
    pub fn set_container_size(&mut self, size: Size) {
        self.container = size;
        if self.clamp_items() {
            self.commit();
        }
    }
}
