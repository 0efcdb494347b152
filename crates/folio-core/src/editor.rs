//! Editing session: user-facing actions on top of the store.
//!
//! [`Editor`] owns the [`PortfolioStore`] and the transient UI state around
//! it: the context menu, collapsed sections, reorder and pointer gestures,
//! and short-lived status messages. Calls to the media service happen here;
//! their failures become status messages and never reach the store.

use crate::capture::PointerCaptures;
use crate::client::{ClientResult, MediaClient, UploadRequest};
use crate::config::EditorConfig;
use crate::input::{DisambiguatorEvent, PointerDisambiguator, PointerOutcome, TargetNode};
use crate::layout::{ContainerKind, FreeLayout};
use crate::model::{
    ElementType, ElementUpdate, GridItem, MediaItem, PortfolioElement, PortfolioLayout,
};
use crate::reorder::{self, DragOverlay, MoveDirection, ReorderCoordinator, SectionDirection};
use crate::store::{Action, PortfolioState, PortfolioStore};
use crate::style::{Insets, SectionStyle, element_margins};
use kurbo::{Point, Size};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

pub const STATUS_NO_ITEMS: &str = "No items to save";
pub const STATUS_SAVED: &str = "Portfolio saved successfully!";
pub const STATUS_SAVE_FAILED: &str = "Failed to save portfolio";
pub const STATUS_LOAD_FAILED: &str = "Failed to load portfolio";
pub const STATUS_CLEARED: &str = "Portfolio cleared";
pub const STATUS_UPLOAD_FAILED: &str = "Failed to upload file";
pub const STATUS_LAST_SECTION: &str = "You must have at least one section in your portfolio.";

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// The open context menu.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub element_id: String,
    pub element_type: ElementType,
    pub position: Point,
}

type ContainerOutbox = Rc<RefCell<Vec<(String, Vec<GridItem>)>>>;

/// An editing session over one portfolio.
pub struct Editor<C: MediaClient> {
    store: PortfolioStore,
    client: Arc<C>,
    config: EditorConfig,
    status: Option<StatusMessage>,
    context_menu: Option<ContextMenu>,
    collapsed_sections: BTreeSet<String>,
    reorder: ReorderCoordinator,
    gestures: HashMap<String, PointerDisambiguator>,
    pressed: Option<String>,
    captures: PointerCaptures,
    container_updates: ContainerOutbox,
}

impl<C: MediaClient> Editor<C> {
    pub fn new(client: Arc<C>, config: EditorConfig) -> Self {
        let state = PortfolioState::new()
            .with_user(config.user_id.clone())
            .with_categories(config.categories.clone());
        Self {
            store: PortfolioStore::new(state),
            client,
            reorder: ReorderCoordinator::new(config.sortable_activation_distance),
            config,
            status: None,
            context_menu: None,
            collapsed_sections: BTreeSet::new(),
            gestures: HashMap::new(),
            pressed: None,
            captures: PointerCaptures::new(),
            container_updates: Rc::default(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &PortfolioStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PortfolioStore {
        &mut self.store
    }

    pub fn state(&self) -> &PortfolioState {
        self.store.state()
    }

    pub fn layout(&self) -> &PortfolioLayout {
        self.store.layout()
    }

    pub fn captures(&self) -> &PointerCaptures {
        &self.captures
    }

    pub fn dispatch(&mut self, action: Action) -> bool {
        self.store.dispatch(action)
    }

    // --- Status messages ---

    fn set_status(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::info!("{}", text);
        self.status = Some(StatusMessage {
            text,
            expires_at: Instant::now() + Duration::from_millis(self.config.status_ttl_ms),
        });
    }

    /// Current status message, if it has not expired.
    pub fn status(&self) -> Option<&str> {
        self.status_at(Instant::now())
    }

    pub fn status_at(&self, now: Instant) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|status| now < status.expires_at)
            .map(|status| status.text.as_str())
    }

    // --- Elements ---

    /// Create an element of `element_type` with its default properties.
    /// Returns its id.
    pub fn add_element(&mut self, element_type: ElementType) -> Option<String> {
        let is_first_section =
            element_type == ElementType::Section && self.layout().sections.is_empty();
        let element = PortfolioElement::with_defaults(element_type, is_first_section);
        let id = element.id.clone();
        self.store
            .dispatch(Action::AddElement(element))
            .then_some(id)
    }

    pub fn update_element(&mut self, id: &str, update: ElementUpdate) -> bool {
        self.store.dispatch(Action::UpdateElement {
            id: id.to_string(),
            updates: update,
        })
    }

    pub fn update_element_property(&mut self, id: &str, property: &str, value: Value) -> bool {
        self.store.dispatch(Action::UpdateElementProperty {
            id: id.to_string(),
            property: property.to_string(),
            value,
        })
    }

    /// Delete an element. Deleting the only section is refused with a
    /// status message.
    pub fn delete_element(&mut self, id: &str) -> bool {
        self.close_context_menu();
        let is_section = self.layout().section_index(id).is_some();
        if is_section && self.layout().sections.len() <= 1 {
            self.set_status(STATUS_LAST_SECTION);
            return false;
        }
        let removed = self.store.dispatch(Action::RemoveElement(id.to_string()));
        if removed {
            self.forget_element(id);
        }
        removed
    }

    fn forget_element(&mut self, id: &str) {
        if let Some(mut gesture) = self.gestures.remove(id) {
            gesture.teardown();
        }
        if self.pressed.as_deref() == Some(id) {
            self.pressed = None;
        }
        self.collapsed_sections.remove(id);
    }

    /// Resolved layout settings of a section.
    pub fn section_style(&self, id: &str) -> Option<SectionStyle> {
        let section = self.layout().section(id)?;
        Some(SectionStyle::from_properties(
            &section.properties,
            self.config.viewport_height,
        ))
    }

    /// Outer margins of an element.
    pub fn element_margins(&self, id: &str) -> Option<Insets> {
        let found = self.layout().find_element(id)?;
        Some(element_margins(&found.element.properties))
    }

    // --- Sections ---

    /// Collapse or expand a section in the editor. Returns true if it is now
    /// collapsed.
    pub fn toggle_section_collapse(&mut self, id: &str) -> bool {
        if self.collapsed_sections.remove(id) {
            false
        } else {
            self.collapsed_sections.insert(id.to_string());
            true
        }
    }

    pub fn is_section_collapsed(&self, id: &str) -> bool {
        self.collapsed_sections.contains(id)
    }

    pub fn toggle_category(&mut self, category: &str) -> bool {
        self.store
            .dispatch(Action::ToggleCategory(category.to_string()))
    }

    pub fn can_move_to_section(&self, id: &str, direction: SectionDirection) -> bool {
        reorder::can_move_to_section(self.layout(), id, direction)
    }

    pub fn move_element_to_section(&mut self, id: &str, direction: SectionDirection) -> bool {
        self.close_context_menu();
        match reorder::move_element_to_section(self.layout(), id, direction) {
            Some(layout) => self.store.dispatch(Action::LoadLayout(layout)),
            None => false,
        }
    }

    pub fn can_move_section(&self, id: &str, direction: MoveDirection) -> bool {
        reorder::can_move_section(self.layout(), id, direction)
    }

    pub fn move_section(&mut self, id: &str, direction: MoveDirection) -> bool {
        self.close_context_menu();
        match reorder::move_section(self.layout(), id, direction) {
            Some(layout) => self.store.dispatch(Action::LoadLayout(layout)),
            None => false,
        }
    }

    // --- Context menu ---

    /// Open the context menu for an element. Image and video containers
    /// manage their own menus and are skipped.
    pub fn open_context_menu(&mut self, id: &str, position: Point) -> bool {
        let Some(found) = self.layout().find_element(id) else {
            return false;
        };
        let element_type = found.element.element_type();
        if element_type.is_container() {
            return false;
        }
        self.context_menu = Some(ContextMenu {
            element_id: id.to_string(),
            element_type,
            position,
        });
        true
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    // --- Pointer gestures ---

    fn gesture(&mut self, id: &str) -> &mut PointerDisambiguator {
        let threshold = self.config.drag_threshold;
        let delay = Duration::from_millis(self.config.context_menu_delay_ms);
        self.gestures
            .entry(id.to_string())
            .or_insert_with(|| PointerDisambiguator::new(threshold, delay))
    }

    /// Pointer pressed over element `id`. `path` runs from the event target
    /// up to the element.
    pub fn pointer_down(
        &mut self,
        id: &str,
        position: Point,
        path: &[TargetNode],
    ) -> PointerOutcome {
        if self.layout().find_element(id).is_none() {
            return PointerOutcome::Ignored;
        }
        let outcome = self.gesture(id).pointer_down(position, path);
        if outcome == PointerOutcome::Pressed {
            self.pressed = Some(id.to_string());
            self.reorder.press(id, position);
        }
        outcome
    }

    pub fn pointer_move(&mut self, position: Point) -> PointerOutcome {
        let Some(id) = self.pressed.clone() else {
            return PointerOutcome::Ignored;
        };
        let outcome = self
            .gestures
            .get_mut(&id)
            .map_or(PointerOutcome::Ignored, |gesture| gesture.pointer_move(position));
        if self.reorder.track(self.store.layout(), position) {
            self.close_context_menu();
        }
        outcome
    }

    /// Pointer released. `over` is the draggable element under the pointer.
    pub fn pointer_up(
        &mut self,
        position: Point,
        path: &[TargetNode],
        over: Option<&str>,
        now: Instant,
    ) -> PointerOutcome {
        let pressed = self.pressed.take();
        if self.reorder.is_dragging() {
            self.reorder.drop_into(&mut self.store, over);
        } else {
            self.reorder.drag_cancel();
        }
        match pressed.and_then(|id| self.gestures.get_mut(&id)) {
            Some(gesture) => gesture.pointer_up(position, path, now),
            None => PointerOutcome::Ignored,
        }
    }

    /// Drop gesture state of elements that are no longer in the layout.
    fn prune_gestures(&mut self) {
        let layout = self.store.layout();
        self.gestures.retain(|id, _| layout.contains(id));
        if self
            .context_menu
            .as_ref()
            .is_some_and(|menu| !layout.contains(&menu.element_id))
        {
            self.context_menu = None;
        }
        if self
            .pressed
            .as_deref()
            .is_some_and(|id| !self.gestures.contains_key(id))
        {
            self.pressed = None;
            self.reorder.drag_cancel();
        }
    }

    pub fn double_click(&mut self, id: &str) -> bool {
        self.gestures
            .get_mut(id)
            .is_some_and(PointerDisambiguator::double_click)
    }

    /// Advance timers: fire due context menus, expire the status message,
    /// and apply pending container edits. Returns true if a menu opened.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.status.as_ref().is_some_and(|status| now >= status.expires_at) {
            self.status = None;
        }
        self.prune_gestures();

        let fired: Vec<(String, Point)> = self
            .gestures
            .iter_mut()
            .filter_map(|(id, gesture)| match gesture.poll(now)? {
                DisambiguatorEvent::OpenContextMenu { position } => Some((id.clone(), position)),
            })
            .collect();
        let mut opened = false;
        for (id, position) in fired {
            opened |= self.open_context_menu(&id, position);
        }

        self.apply_container_updates();
        opened
    }

    // --- Reorder ---

    pub fn begin_reorder(&mut self, id: &str) -> Option<&DragOverlay> {
        self.close_context_menu();
        self.reorder.drag_start(self.store.layout(), id)
    }

    pub fn reorder_overlay(&self) -> Option<&DragOverlay> {
        self.reorder.overlay()
    }

    pub fn finish_reorder(&mut self, over: Option<&str>) -> bool {
        self.reorder.drop_into(&mut self.store, over)
    }

    pub fn cancel_reorder(&mut self) {
        self.reorder.drag_cancel();
    }

    // --- Containers ---

    /// Start a free-position engine for a container element. Committed
    /// edits are applied to the store by [`apply_container_updates`].
    ///
    /// [`apply_container_updates`]: Self::apply_container_updates
    pub fn open_container(&self, id: &str, size: Size) -> Option<FreeLayout> {
        let element = self.layout().find_element(id)?.element;
        let kind = ContainerKind::from_element_type(element.element_type())?;
        let items = element.items()?.to_vec();

        let outbox = Rc::clone(&self.container_updates);
        let container_id = id.to_string();
        let layout = FreeLayout::new(
            id,
            kind,
            size,
            items,
            self.captures.clone(),
            Box::new(move |items| outbox.borrow_mut().push((container_id.clone(), items))),
        )
        .with_policy(self.config.policy(kind));
        Some(layout)
    }

    /// Write committed container edits into the store. Returns how many
    /// were applied.
    pub fn apply_container_updates(&mut self) -> usize {
        let updates = std::mem::take(&mut *self.container_updates.borrow_mut());
        let mut applied = 0;
        for (id, items) in updates {
            if self.store.dispatch(Action::UpdateElement {
                id,
                updates: ElementUpdate::items(items),
            }) {
                applied += 1;
            }
        }
        applied
    }

    // --- Media service workflows ---

    /// Upload files one after another, adding each to the library. Stops at
    /// the first failure.
    pub async fn upload_files(&mut self, requests: Vec<UploadRequest>) -> ClientResult<Vec<MediaItem>> {
        self.store.dispatch(Action::SetLoading(true));
        let client = Arc::clone(&self.client);
        let mut uploaded = Vec::new();
        let mut result = Ok(());

        for request in requests {
            match client.upload_file(request).await {
                Ok(item) => {
                    log::info!("Uploaded {} as {}", item.title, item.id);
                    self.store.dispatch(Action::AddItem(item.clone()));
                    uploaded.push(item);
                }
                Err(err) => {
                    log::error!("Upload failed: {}", err);
                    self.set_status(STATUS_UPLOAD_FAILED);
                    result = Err(err);
                    break;
                }
            }
        }

        self.store.dispatch(Action::SetLoading(false));
        result.map(|()| uploaded)
    }

    /// Save the media library. An empty library is not sent.
    pub async fn save_portfolio(&mut self) -> bool {
        let items = self.state().media.to_vec();
        if items.is_empty() {
            self.set_status(STATUS_NO_ITEMS);
            return false;
        }

        let client = Arc::clone(&self.client);
        let user_id = self.state().user_id.clone();
        match client.save_portfolio(&user_id, &items).await {
            Ok(()) => {
                self.set_status(STATUS_SAVED);
                true
            }
            Err(err) => {
                log::error!("Save failed: {}", err);
                self.set_status(STATUS_SAVE_FAILED);
                false
            }
        }
    }

    /// Replace the media library with the saved one. The layout is kept.
    pub async fn load_portfolio(&mut self) -> bool {
        self.store.dispatch(Action::SetLoading(true));
        let client = Arc::clone(&self.client);
        let user_id = self.state().user_id.clone();
        match client.load_portfolio(&user_id).await {
            Ok(items) => {
                let count = items.len();
                self.store.dispatch(Action::LoadPortfolio(items));
                self.set_status(format!("Loaded {} items", count));
                true
            }
            Err(err) => {
                log::error!("Load failed: {}", err);
                self.store.dispatch(Action::SetLoading(false));
                self.set_status(STATUS_LOAD_FAILED);
                false
            }
        }
    }

    /// Load a saved library at startup, if there is one. Failures are
    /// logged and otherwise ignored.
    pub async fn restore_portfolio(&mut self) -> bool {
        let client = Arc::clone(&self.client);
        let user_id = self.state().user_id.clone();
        match client.load_portfolio(&user_id).await {
            Ok(items) if !items.is_empty() => self.store.dispatch(Action::LoadPortfolio(items)),
            Ok(_) => false,
            Err(err) => {
                log::info!("No saved portfolio restored: {}", err);
                false
            }
        }
    }

    /// Empty library and layout, leaving one fresh section.
    pub fn clear_portfolio(&mut self) {
        self.store.dispatch(Action::ClearPortfolio);
        self.context_menu = None;
        self.collapsed_sections.clear();
        self.gestures.clear();
        self.pressed = None;
        self.reorder.drag_cancel();
        self.set_status(STATUS_CLEARED);
    }
}
