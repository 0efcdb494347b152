//! Portfolio state, actions, and the owning store.
//!
//! Every change to the document goes through an [`Action`]. Actions are
//! applied synchronously and atomically: an action either fully applies or
//! leaves the state untouched. Guard rejections are not errors; they are
//! logged at debug level and reported as "unchanged".

use crate::model::{
    ElementUpdate, MediaItem, MediaItemUpdate, MediaLibrary, PortfolioElement, PortfolioLayout,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// User id used until one is configured.
pub const DEFAULT_USER_ID: &str = "default-user";

/// Media categories offered out of the box.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Photography", "Video Work", "Digital Art", "Other"];

/// Everything the editor knows about the current portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    /// Uploaded media, keyed by id.
    pub media: MediaLibrary,
    pub layout: PortfolioLayout,
    pub categories: Vec<String>,
    /// Categories folded away in the media browser.
    pub collapsed_categories: BTreeSet<String>,
    pub is_loading: bool,
    pub user_id: String,
}

impl Default for PortfolioState {
    fn default() -> Self {
        Self::new()
    }
}

impl PortfolioState {
    /// Empty library and a layout with one default section.
    pub fn new() -> Self {
        Self {
            media: MediaLibrary::new(),
            layout: PortfolioLayout::new(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            collapsed_categories: BTreeSet::new(),
            is_loading: false,
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Apply an action in place. Returns true if the state changed.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::AddItem(item) => {
                self.media.insert(item);
                true
            }
            Action::UpdateItem { id, updates } => match self.media.get_mut(&id) {
                Some(item) => {
                    item.apply(updates);
                    true
                }
                None => {
                    log::debug!("UpdateItem: no media item {}", id);
                    false
                }
            },
            Action::RemoveItem(id) => self.media.remove(&id).is_some(),
            Action::ToggleCategory(category) => {
                if !self.collapsed_categories.remove(&category) {
                    self.collapsed_categories.insert(category);
                }
                true
            }
            Action::SetLoading(loading) => {
                let changed = self.is_loading != loading;
                self.is_loading = loading;
                changed
            }
            Action::LoadPortfolio(items) => {
                self.media = MediaLibrary::from_items(items);
                self.is_loading = false;
                true
            }
            Action::ClearPortfolio => {
                self.media.clear();
                self.layout = PortfolioLayout::new();
                true
            }
            Action::AddElement(element) => self.add_element(element),
            Action::UpdateElement { id, updates } => match self.layout.element_mut(&id) {
                Some(element) => {
                    element.apply(updates);
                    true
                }
                None => {
                    log::debug!("UpdateElement: no element {}", id);
                    false
                }
            },
            Action::UpdateElementProperty { id, property, value } => {
                match self.layout.element_mut(&id) {
                    Some(element) => {
                        element.properties.insert(property, value);
                        true
                    }
                    None => {
                        log::debug!("UpdateElementProperty: no element {}", id);
                        false
                    }
                }
            }
            Action::RemoveElement(id) => self.remove_element(&id),
            Action::LoadLayout(mut layout) => {
                layout.normalize_section_ids();
                self.layout = layout;
                true
            }
        }
    }

    fn add_element(&mut self, mut element: PortfolioElement) -> bool {
        if self.layout.contains(&element.id) {
            log::debug!("AddElement: id {} already in use", element.id);
            return false;
        }

        if element.is_section() {
            element.section_id = None;
            let section_id = element.id.clone();
            if let Some(children) = element.children_mut() {
                children.retain(|child| !child.is_section());
                for child in children.iter_mut() {
                    child.section_id = Some(section_id.clone());
                }
            }
            self.layout.sections.push(element);
            return true;
        }

        if self.layout.sections.is_empty() {
            log::debug!("AddElement: no sections, seeding a default one");
            self.layout.sections.push(PortfolioElement::default_section());
        }
        let Some(first) = self.layout.sections.first_mut() else {
            return false;
        };
        element.section_id = Some(first.id.clone());
        match first.children_mut() {
            Some(children) => {
                children.push(element);
                true
            }
            None => false,
        }
    }

    fn remove_element(&mut self, id: &str) -> bool {
        if self.layout.section_index(id).is_some() && self.layout.sections.len() <= 1 {
            log::debug!("RemoveElement: refusing to remove the last section {}", id);
            return false;
        }
        self.layout.detach(id).is_some()
    }
}

/// A discrete change to [`PortfolioState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    AddItem(MediaItem),
    UpdateItem { id: String, updates: MediaItemUpdate },
    RemoveItem(String),
    ToggleCategory(String),
    SetLoading(bool),
    /// Replace the media library wholesale. The layout is untouched.
    LoadPortfolio(Vec<MediaItem>),
    /// Empty the library and layout, then seed a fresh default section.
    ClearPortfolio,
    /// Sections are appended to the section list; anything else goes to the
    /// end of the first section.
    AddElement(PortfolioElement),
    UpdateElement { id: String, updates: ElementUpdate },
    UpdateElementProperty { id: String, property: String, value: Value },
    /// Refused for the only remaining section.
    RemoveElement(String),
    LoadLayout(PortfolioLayout),
}

/// Pure reducer: the state after `action`, leaving the input untouched.
pub fn reduce(state: &PortfolioState, action: Action) -> PortfolioState {
    let mut next = state.clone();
    next.apply(action);
    next
}

/// Handle returned by [`PortfolioStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Called with the new state after each state-changing dispatch.
pub type Listener = Box<dyn FnMut(&PortfolioState)>;

/// Owns the portfolio state and notifies subscribers of changes.
pub struct PortfolioStore {
    state: PortfolioState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for PortfolioStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for PortfolioStore {
    fn default() -> Self {
        Self::new(PortfolioState::new())
    }
}

impl PortfolioStore {
    pub fn new(state: PortfolioState) -> Self {
        Self {
            state,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &PortfolioState {
        &self.state
    }

    pub fn layout(&self) -> &PortfolioLayout {
        &self.state.layout
    }

    /// Apply an action. Returns true if the state changed, in which case
    /// every listener has been called.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let changed = self.state.apply(action);
        if changed {
            for (_, listener) in &mut self.listeners {
                listener(&self.state);
            }
        }
        changed
    }

    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementType, MediaType};
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn element(element_type: ElementType, id: &str) -> PortfolioElement {
        let mut element = PortfolioElement::with_defaults(element_type, false);
        element.id = id.to_string();
        element
    }

    fn media(id: &str) -> MediaItem {
        MediaItem {
            id: id.into(),
            filename: format!("{id}.png"),
            media_type: MediaType::Image,
            title: id.into(),
            description: String::new(),
            category: "Photography".into(),
            date: None,
            url: format!("/uploads/{id}.png"),
        }
    }

    #[test]
    fn test_initial_state() {
        let state = PortfolioState::new();
        assert_eq!(state.layout.sections.len(), 1);
        assert_eq!(state.user_id, DEFAULT_USER_ID);
        assert_eq!(state.categories.len(), 4);
        assert!(!state.is_loading);
    }

    #[test]
    fn test_add_section_appends_empty_section() {
        let state = PortfolioState::new();
        let next = reduce(&state, Action::AddElement(element(ElementType::Section, "s2")));

        assert_eq!(next.layout.sections.len(), state.layout.sections.len() + 1);
        assert_eq!(next.layout.sections[1].children().map(<[_]>::len), Some(0));
        // Input untouched
        assert_eq!(state.layout.sections.len(), 1);
    }

    #[test]
    fn test_add_element_goes_to_first_section() {
        let mut state = PortfolioState::new();
        state.apply(Action::AddElement(element(ElementType::Section, "s2")));
        state.apply(Action::AddElement(element(ElementType::Text, "t1")));

        let found = state.layout.find_element("t1").unwrap();
        assert_eq!(found.section_index(), Some(0));
        assert_eq!(found.element.section_id.as_deref(), Some(state.layout.sections[0].id.as_str()));
    }

    #[test]
    fn test_add_element_seeds_section_when_none() {
        let mut state = PortfolioState::new();
        state.layout.sections.clear();
        assert!(state.apply(Action::AddElement(element(ElementType::Image, "img"))));

        assert_eq!(state.layout.sections.len(), 1);
        assert_eq!(state.layout.children_of(0)[0].id, "img");
        assert!(state.layout.find_element("img").is_some());
    }

    #[test]
    fn test_add_duplicate_id_rejected() {
        let mut state = PortfolioState::new();
        state.apply(Action::AddElement(element(ElementType::Text, "t1")));
        assert!(!state.apply(Action::AddElement(element(ElementType::Hr, "t1"))));
        assert_eq!(state.layout.child_count(), 1);
    }

    #[test]
    fn test_remove_last_section_is_rejected() {
        let state = PortfolioState::new();
        let only = state.layout.sections[0].id.clone();
        let next = reduce(&state, Action::RemoveElement(only));
        assert_eq!(next, state);
    }

    #[test]
    fn test_remove_section_when_several() {
        let mut state = PortfolioState::new();
        state.apply(Action::AddElement(element(ElementType::Section, "s2")));
        assert!(state.apply(Action::RemoveElement("s2".into())));
        assert_eq!(state.layout.sections.len(), 1);
    }

    #[test]
    fn test_remove_child_and_missing() {
        let mut state = PortfolioState::new();
        state.apply(Action::AddElement(element(ElementType::Text, "t1")));
        assert!(state.apply(Action::RemoveElement("t1".into())));
        assert!(!state.apply(Action::RemoveElement("t1".into())));
        assert_eq!(state.layout.child_count(), 0);
    }

    #[test]
    fn test_update_element_merges_shallowly() {
        let mut state = PortfolioState::new();
        state.apply(Action::AddElement(element(ElementType::Text, "t1")));
        state.apply(Action::UpdateElement {
            id: "t1".into(),
            updates: ElementUpdate::content("Hello"),
        });

        let found = state.layout.find_element("t1").unwrap();
        assert_eq!(found.element.kind, crate::model::ElementKind::Text { content: "Hello".into() });
        assert_eq!(found.element.properties["fontSize"], 16);

        let before = state.clone();
        assert!(!state.apply(Action::UpdateElement {
            id: "missing".into(),
            updates: ElementUpdate::content("x"),
        }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_update_property_keeps_unknown_keys() {
        let mut state = PortfolioState::new();
        let section = state.layout.sections[0].id.clone();
        state.apply(Action::UpdateElementProperty {
            id: section.clone(),
            property: "customThing".into(),
            value: json!({ "nested": true }),
        });
        state.apply(Action::UpdateElementProperty {
            id: section.clone(),
            property: "backgroundColor".into(),
            value: json!("#000000"),
        });

        let props = &state.layout.sections[0].properties;
        assert_eq!(props["customThing"]["nested"], true);
        assert_eq!(props["backgroundColor"], "#000000");
    }

    #[test]
    fn test_media_actions() {
        let mut state = PortfolioState::new();
        state.apply(Action::AddItem(media("a")));
        state.apply(Action::UpdateItem {
            id: "a".into(),
            updates: MediaItemUpdate {
                title: Some("Sunset".into()),
                ..Default::default()
            },
        });
        assert_eq!(state.media.get("a").map(|m| m.title.as_str()), Some("Sunset"));

        state.apply(Action::SetLoading(true));
        state.apply(Action::LoadPortfolio(vec![media("b"), media("c")]));
        assert!(!state.is_loading);
        assert_eq!(state.media.len(), 2);
        assert!(!state.media.contains("a"));

        assert!(state.apply(Action::RemoveItem("b".into())));
        assert!(!state.apply(Action::RemoveItem("b".into())));
    }

    #[test]
    fn test_load_portfolio_leaves_layout() {
        let mut state = PortfolioState::new();
        state.apply(Action::AddElement(element(ElementType::Text, "t1")));
        let layout = state.layout.clone();
        state.apply(Action::LoadPortfolio(vec![media("a")]));
        assert_eq!(state.layout, layout);
    }

    #[test]
    fn test_toggle_category() {
        let mut state = PortfolioState::new();
        state.apply(Action::ToggleCategory("Other".into()));
        assert!(state.collapsed_categories.contains("Other"));
        state.apply(Action::ToggleCategory("Other".into()));
        assert!(state.collapsed_categories.is_empty());
    }

    #[test]
    fn test_clear_reseeds_section() {
        let mut state = PortfolioState::new();
        state.apply(Action::AddItem(media("a")));
        state.apply(Action::AddElement(element(ElementType::Text, "t1")));
        state.apply(Action::ClearPortfolio);

        assert!(state.media.is_empty());
        assert_eq!(state.layout.sections.len(), 1);
        assert_eq!(state.layout.child_count(), 0);
        assert!(state.layout.elements.is_empty());
    }

    #[test]
    fn test_load_layout_rederives_section_ids() {
        let mut layout = PortfolioLayout::new();
        let mut child = element(ElementType::Text, "t1");
        child.section_id = Some("wrong".into());
        layout.sections[0].children_mut().unwrap().push(child);

        let mut state = PortfolioState::new();
        state.apply(Action::LoadLayout(layout));
        let found = state.layout.find_element("t1").unwrap();
        assert_eq!(found.element.section_id.as_deref(), found.section_id);
    }

    #[test]
    fn test_action_wire_shape() {
        let action = Action::UpdateElementProperty {
            id: "e1".into(),
            property: "color".into(),
            value: json!("#fff"),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "UPDATE_ELEMENT_PROPERTY");
        assert_eq!(json["payload"]["property"], "color");

        let clear: Action = serde_json::from_str(r#"{"type":"CLEAR_PORTFOLIO"}"#).unwrap();
        assert_eq!(clear, Action::ClearPortfolio);
    }

    #[test]
    fn test_store_notifies_on_change_only() {
        let mut store = PortfolioStore::default();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let id = store.subscribe(Box::new(move |_| seen.set(seen.get() + 1)));

        let only = store.layout().sections[0].id.clone();
        assert!(!store.dispatch(Action::RemoveElement(only)));
        assert_eq!(calls.get(), 0);

        assert!(store.dispatch(Action::AddElement(element(ElementType::Hr, "hr"))));
        assert_eq!(calls.get(), 1);

        assert!(store.unsubscribe(id));
        store.dispatch(Action::ClearPortfolio);
        assert_eq!(calls.get(), 1);
        assert!(!store.unsubscribe(id));
    }
}
