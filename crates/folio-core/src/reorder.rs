//! Structural reordering of sections and their children.
//!
//! The sortable list sees one flat sequence of draggable ids covering section
//! headers and section children. Drops are interpreted structurally here:
//! same-parent drops reorder, drops onto another section (or one of its
//! children) move the element to the end of that section. Every operation
//! produces a new layout which is applied with [`Action::LoadLayout`].

use crate::model::{ElementLocation, ElementType, PortfolioElement, PortfolioLayout};
use crate::store::{Action, PortfolioStore};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer travel required before a press turns into a reorder drag.
pub const ACTIVATION_DISTANCE: f64 = 8.0;

/// Draggable ids in display order: each section followed by its children.
pub fn draggable_ids(layout: &PortfolioLayout) -> Vec<String> {
    layout
        .sections
        .iter()
        .flat_map(|section| {
            std::iter::once(section.id.clone()).chain(
                section
                    .children()
                    .unwrap_or_default()
                    .iter()
                    .map(|child| child.id.clone()),
            )
        })
        .collect()
}

/// Move the entry at `from` so it ends up at index `to`.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Static preview of the element being dragged. Carries no behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragOverlay {
    pub id: String,
    pub element_type: ElementType,
    pub label: String,
}

impl DragOverlay {
    pub fn from_element(element: &PortfolioElement) -> Self {
        Self {
            id: element.id.clone(),
            element_type: element.element_type(),
            label: element.display_label(),
        }
    }
}

/// Direction for moving a child to a neighbouring section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionDirection {
    Prev,
    Next,
}

/// Direction for moving a section within the section list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

fn neighbour(index: usize, len: usize, forward: bool) -> Option<usize> {
    let target = if forward {
        index.checked_add(1)?
    } else {
        index.checked_sub(1)?
    };
    (target < len).then_some(target)
}

/// Section index and child index of a section child.
fn child_location(layout: &PortfolioLayout, id: &str) -> Option<(usize, usize)> {
    match layout.find_element(id)?.location {
        ElementLocation::Child { section, index } => Some((section, index)),
        _ => None,
    }
}

/// Remove a child and append it to another section.
fn transfer_child(layout: &mut PortfolioLayout, from: usize, index: usize, to: usize) -> Option<()> {
    let target_id = layout.sections.get(to)?.id.clone();
    let mut element = {
        let children = layout.sections.get_mut(from)?.children_mut()?;
        if index >= children.len() {
            return None;
        }
        children.remove(index)
    };
    element.section_id = Some(target_id);
    layout.sections.get_mut(to)?.children_mut()?.push(element);
    Some(())
}

/// Whether a child can move to the previous/next section.
pub fn can_move_to_section(layout: &PortfolioLayout, id: &str, direction: SectionDirection) -> bool {
    child_location(layout, id)
        .and_then(|(section, _)| {
            neighbour(section, layout.sections.len(), direction == SectionDirection::Next)
        })
        .is_some()
}

/// Move a child to the end of the previous/next section.
pub fn move_element_to_section(
    layout: &PortfolioLayout,
    id: &str,
    direction: SectionDirection,
) -> Option<PortfolioLayout> {
    let (section, index) = child_location(layout, id)?;
    let target = neighbour(section, layout.sections.len(), direction == SectionDirection::Next)?;
    let mut next = layout.clone();
    transfer_child(&mut next, section, index, target)?;
    Some(next)
}

/// Whether a section can move up/down.
pub fn can_move_section(layout: &PortfolioLayout, id: &str, direction: MoveDirection) -> bool {
    layout
        .section_index(id)
        .and_then(|index| neighbour(index, layout.sections.len(), direction == MoveDirection::Down))
        .is_some()
}

/// Swap a section with its neighbour.
pub fn move_section(
    layout: &PortfolioLayout,
    id: &str,
    direction: MoveDirection,
) -> Option<PortfolioLayout> {
    let index = layout.section_index(id)?;
    let target = neighbour(index, layout.sections.len(), direction == MoveDirection::Down)?;
    let mut next = layout.clone();
    next.sections.swap(index, target);
    Some(next)
}

/// Resolve a drop of `active` onto `over`. Returns the new layout, or `None`
/// when the drop changes nothing.
pub fn resolve_drop(layout: &PortfolioLayout, active: &str, over: &str) -> Option<PortfolioLayout> {
    if active == over {
        return None;
    }
    let source = layout.find_element(active)?.location;
    let target = layout.find_element(over)?.location;

    let mut next = layout.clone();
    match (source, target) {
        (
            ElementLocation::Child { section: from, index },
            ElementLocation::Child { section: to, index: target_index },
        ) if from == to => {
            let children = next.sections.get_mut(from)?.children_mut()?;
            array_move(children, index, target_index);
        }
        (ElementLocation::Child { section: from, index }, ElementLocation::Child { section: to, .. })
        | (ElementLocation::Child { section: from, index }, ElementLocation::Section { index: to })
            if from != to =>
        {
            transfer_child(&mut next, from, index, to)?;
        }
        // Sections only reorder through move_section
        _ => {
            log::debug!("Drop of {} onto {} ignored", active, over);
            return None;
        }
    }
    Some(next)
}

/// Press that has not yet travelled far enough to become a drag.
#[derive(Debug, Clone, PartialEq)]
struct PendingActivation {
    id: String,
    origin: Point,
}

/// Tracks one reorder gesture from press to drop.
#[derive(Debug, Clone)]
pub struct ReorderCoordinator {
    activation_distance: f64,
    pending: Option<PendingActivation>,
    active: Option<DragOverlay>,
}

impl Default for ReorderCoordinator {
    fn default() -> Self {
        Self::new(ACTIVATION_DISTANCE)
    }
}

impl ReorderCoordinator {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            activation_distance,
            pending: None,
            active: None,
        }
    }

    /// Record a press on a draggable element.
    pub fn press(&mut self, id: &str, position: Point) {
        self.pending = Some(PendingActivation {
            id: id.to_string(),
            origin: position,
        });
    }

    /// Follow the pointer; starts the drag once the activation distance is
    /// reached. Returns true if a drag started on this call.
    pub fn track(&mut self, layout: &PortfolioLayout, position: Point) -> bool {
        let Some(pending) = &self.pending else {
            return false;
        };
        if pending.origin.distance(position) < self.activation_distance {
            return false;
        }
        let id = pending.id.clone();
        self.pending = None;
        self.drag_start(layout, &id).is_some()
    }

    /// Begin dragging `id`. Unknown ids start nothing.
    pub fn drag_start(&mut self, layout: &PortfolioLayout, id: &str) -> Option<&DragOverlay> {
        self.pending = None;
        let Some(found) = layout.find_element(id) else {
            log::debug!("Drag start on unknown element {}", id);
            self.active = None;
            return None;
        };
        self.active = Some(DragOverlay::from_element(found.element));
        self.active.as_ref()
    }

    pub fn overlay(&self) -> Option<&DragOverlay> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Finish the gesture over `over`. Returns the reordered layout, if any.
    pub fn drag_end(&mut self, layout: &PortfolioLayout, over: Option<&str>) -> Option<PortfolioLayout> {
        self.pending = None;
        let active = self.active.take()?;
        resolve_drop(layout, &active.id, over?)
    }

    /// Finish the gesture and apply the result to `store`.
    pub fn drop_into(&mut self, store: &mut PortfolioStore, over: Option<&str>) -> bool {
        match self.drag_end(store.layout(), over) {
            Some(layout) => store.dispatch(Action::LoadLayout(layout)),
            None => false,
        }
    }

    pub fn drag_cancel(&mut self) {
        self.pending = None;
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementType;
    use crate::store::PortfolioState;

    fn element(element_type: ElementType, id: &str) -> PortfolioElement {
        let mut element = PortfolioElement::with_defaults(element_type, false);
        element.id = id.to_string();
        element
    }

    /// Sections A and B; A holds `a_children`, B holds `b_children`.
    fn two_sections(a_children: &[&str], b_children: &[&str]) -> PortfolioLayout {
        let mut a = element(ElementType::Section, "A");
        let mut b = element(ElementType::Section, "B");
        for id in a_children {
            a.children_mut().unwrap().push(element(ElementType::Text, id));
        }
        for id in b_children {
            b.children_mut().unwrap().push(element(ElementType::Text, id));
        }
        let mut layout = PortfolioLayout {
            elements: Vec::new(),
            sections: vec![a, b],
        };
        layout.normalize_section_ids();
        layout
    }

    fn child_ids(layout: &PortfolioLayout, section: usize) -> Vec<&str> {
        layout.children_of(section).iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_draggable_ids_order() {
        let layout = two_sections(&["a1", "a2"], &["b1"]);
        assert_eq!(draggable_ids(&layout), vec!["A", "a1", "a2", "B", "b1"]);
    }

    #[test]
    fn test_array_move_law() {
        let original = vec!["a", "b", "c", "d", "e"];
        for from in 0..original.len() {
            for to in 0..original.len() {
                let mut items = original.clone();
                array_move(&mut items, from, to);
                assert_eq!(items[to], original[from]);
                let mut sorted = items.clone();
                sorted.sort();
                assert_eq!(sorted, original);
            }
        }
    }

    #[test]
    fn test_same_section_drop_reorders() {
        let layout = two_sections(&["a1", "a2", "a3"], &[]);
        let next = resolve_drop(&layout, "a1", "a3").unwrap();
        assert_eq!(child_ids(&next, 0), vec!["a2", "a3", "a1"]);
    }

    #[test]
    fn test_drop_onto_other_section_appends() {
        let layout = two_sections(&["a1"], &["b1"]);
        let next = resolve_drop(&layout, "a1", "B").unwrap();

        assert!(child_ids(&next, 0).is_empty());
        assert_eq!(child_ids(&next, 1), vec!["b1", "a1"]);
        assert_eq!(next.children_of(1)[1].section_id.as_deref(), Some("B"));
    }

    #[test]
    fn test_drop_onto_child_of_other_section_appends() {
        let layout = two_sections(&["a1", "a2"], &["b1", "b2"]);
        let next = resolve_drop(&layout, "a1", "b1").unwrap();

        assert_eq!(child_ids(&next, 0), vec!["a2"]);
        assert_eq!(child_ids(&next, 1), vec!["b1", "b2", "a1"]);
        assert_eq!(next.child_count(), layout.child_count());
    }

    #[test]
    fn test_drop_onto_own_section_is_noop() {
        let layout = two_sections(&["a1"], &[]);
        assert!(resolve_drop(&layout, "a1", "A").is_none());
    }

    #[test]
    fn test_section_drop_changes_nothing() {
        let layout = two_sections(&["a1"], &["b1"]);
        assert!(resolve_drop(&layout, "B", "A").is_none());
        assert!(resolve_drop(&layout, "B", "a1").is_none());
        assert!(resolve_drop(&layout, "A", "b1").is_none());
    }

    #[test]
    fn test_invalid_drops() {
        let layout = two_sections(&["a1"], &["b1"]);
        assert!(resolve_drop(&layout, "a1", "a1").is_none());
        assert!(resolve_drop(&layout, "a1", "ghost").is_none());
        assert!(resolve_drop(&layout, "ghost", "b1").is_none());
    }

    #[test]
    fn test_move_to_section_bounds() {
        let layout = two_sections(&["a1"], &["b1"]);
        assert!(can_move_to_section(&layout, "a1", SectionDirection::Next));
        assert!(!can_move_to_section(&layout, "a1", SectionDirection::Prev));
        assert!(!can_move_to_section(&layout, "b1", SectionDirection::Next));
        assert!(!can_move_to_section(&layout, "A", SectionDirection::Next));

        let next = move_element_to_section(&layout, "b1", SectionDirection::Prev).unwrap();
        assert_eq!(child_ids(&next, 0), vec!["a1", "b1"]);
        assert!(child_ids(&next, 1).is_empty());
    }

    #[test]
    fn test_move_section_swaps() {
        let layout = two_sections(&["a1"], &["b1"]);
        assert!(!can_move_section(&layout, "A", MoveDirection::Up));
        assert!(can_move_section(&layout, "A", MoveDirection::Down));
        assert!(move_section(&layout, "B", MoveDirection::Down).is_none());

        let next = move_section(&layout, "A", MoveDirection::Down).unwrap();
        assert_eq!(next.sections[0].id, "B");
        assert_eq!(child_ids(&next, 1), vec!["a1"]);
    }

    #[test]
    fn test_single_section_move_scenario() {
        let mut store = PortfolioStore::new(PortfolioState::new());
        let text = element(ElementType::Text, "text");
        store.dispatch(Action::AddElement(text));
        store.dispatch(Action::AddElement(element(ElementType::Image, "image")));

        assert!(!can_move_to_section(store.layout(), "text", SectionDirection::Next));
        let before = store.state().clone();
        assert!(move_element_to_section(store.layout(), "text", SectionDirection::Next).is_none());
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_coordinator_cross_section_scenario() {
        let mut store = PortfolioStore::new(PortfolioState::new());
        store.dispatch(Action::LoadLayout(two_sections(&["a1"], &["b1"])));

        let mut coordinator = ReorderCoordinator::default();
        let overlay = coordinator.drag_start(store.layout(), "a1").cloned().unwrap();
        assert_eq!(overlay.element_type, ElementType::Text);

        assert!(coordinator.drop_into(&mut store, Some("B")));
        assert!(!coordinator.is_dragging());
        assert!(child_ids(store.layout(), 0).is_empty());
        assert_eq!(child_ids(store.layout(), 1), vec!["b1", "a1"]);
    }

    #[test]
    fn test_activation_distance() {
        let layout = two_sections(&["a1"], &[]);
        let mut coordinator = ReorderCoordinator::default();
        coordinator.press("a1", Point::new(0.0, 0.0));

        assert!(!coordinator.track(&layout, Point::new(5.0, 0.0)));
        assert!(!coordinator.is_dragging());
        assert!(coordinator.track(&layout, Point::new(8.0, 0.0)));
        assert_eq!(coordinator.overlay().map(|o| o.id.as_str()), Some("a1"));
    }

    #[test]
    fn test_drop_without_target_changes_nothing() {
        let mut store = PortfolioStore::new(PortfolioState::new());
        store.dispatch(Action::LoadLayout(two_sections(&["a1"], &["b1"])));
        let before = store.state().clone();

        let mut coordinator = ReorderCoordinator::default();
        coordinator.drag_start(store.layout(), "a1");
        assert!(!coordinator.drop_into(&mut store, None));
        assert_eq!(store.state(), &before);
    }
}
