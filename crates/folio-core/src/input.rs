//! Gesture disambiguation for draggable page elements.
//!
//! One pointer stream over an element can mean a click meant for a nested
//! control, a settle-click that opens the element's context menu, or the start
//! of a reorder drag owned by the sortable list. [`PointerDisambiguator`]
//! classifies the stream without ever claiming events over interactive
//! controls.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Movement beyond this distance (pixels) turns a press into a drag.
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Delay before a settle-click opens the context menu.
pub const CONTEXT_MENU_DELAY: Duration = Duration::from_millis(100);


/// Tag of a node on the event path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Input,
    TextArea,
    Select,
    Button,
    #[default]
    Other,
}

impl NodeKind {
    pub fn is_form_control(self) -> bool {
        !matches!(self, NodeKind::Other)
    }
}

/// Capabilities of one node on the path from the event target to the root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetNode {
    pub kind: NodeKind,
    pub content_editable: bool,
    /// Marked as a resize handle.
    pub resize_handle: bool,
    /// Marked as an explicit drag handle.
    pub drag_handle: bool,
    /// Inside a region that is currently being resized.
    pub resizing: bool,
}

impl TargetNode {
    /// A plain, non-interactive node.
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn control(kind: NodeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn editable() -> Self {
        Self {
            content_editable: true,
            ..Self::default()
        }
    }

    pub fn resize_handle() -> Self {
        Self {
            resize_handle: true,
            ..Self::default()
        }
    }

    pub fn drag_handle() -> Self {
        Self {
            drag_handle: true,
            ..Self::default()
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.kind.is_form_control()
            || self.content_editable
            || self.resize_handle
            || self.drag_handle
            || self.resizing
    }
}

/// True if the target (first entry) or any of its ancestors is interactive.
pub fn is_interactive(path: &[TargetNode]) -> bool {
    path.iter().any(TargetNode::is_interactive)
}

/// Press tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PressState {
    #[default]
    Idle,
    Pressed { start: Point },
}

/// What a pointer event resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// Nothing changed.
    Ignored,
    /// A press began.
    Pressed,
    /// Movement exceeded the threshold; the sortable list owns the gesture.
    DragHandedOff,
    /// The press ended without opening a menu.
    Released,
    /// The press settled; the context menu opens at `due` unless cancelled.
    ContextMenuScheduled { due: Instant },
}

/// Whether a click event should stop at the draggable wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDisposition {
    Consume,
    FallThrough,
}

/// Deferred action emitted by [`PointerDisambiguator::poll`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisambiguatorEvent {
    OpenContextMenu { position: Point },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingMenu {
    due: Instant,
    position: Point,
}

/// Per-element click/drag/context-menu classifier.
#[derive(Debug, Clone)]
pub struct PointerDisambiguator {
    threshold: f64,
    delay: Duration,
    state: PressState,
    pending: Option<PendingMenu>,
}

impl Default for PointerDisambiguator {
    fn default() -> Self {
        Self::new(DRAG_THRESHOLD, CONTEXT_MENU_DELAY)
    }
}

impl PointerDisambiguator {
    pub fn new(threshold: f64, delay: Duration) -> Self {
        Self {
            threshold,
            delay,
            state: PressState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> PressState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.state, PressState::Pressed { .. })
    }

    /// Deadline of the scheduled context menu, if any.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.due)
    }

    /// Handle pointer-down. `path` runs from the event target up to the root.
    /// Any press outside an interactive subtree is tracked.
    pub fn pointer_down(&mut self, position: Point, path: &[TargetNode]) -> PointerOutcome {
        self.pending = None;

        if is_interactive(path) {
            return PointerOutcome::Ignored;
        }

        self.state = PressState::Pressed { start: position };
        PointerOutcome::Pressed
    }

    /// Handle pointer-move.
    pub fn pointer_move(&mut self, position: Point) -> PointerOutcome {
        let PressState::Pressed { start } = self.state else {
            return PointerOutcome::Ignored;
        };

        if start.distance(position) >= self.threshold {
            self.state = PressState::Idle;
            self.pending = None;
            log::debug!("Press moved past threshold; handing off to drag");
            return PointerOutcome::DragHandedOff;
        }

        PointerOutcome::Ignored
    }

    /// Handle pointer-up. An up without a matching down is ignored.
    pub fn pointer_up(&mut self, position: Point, path: &[TargetNode], now: Instant) -> PointerOutcome {
        let PressState::Pressed { start } = self.state else {
            return PointerOutcome::Ignored;
        };
        self.state = PressState::Idle;

        if is_interactive(path) {
            return PointerOutcome::Released;
        }

        if start.distance(position) < self.threshold {
            let due = now + self.delay;
            self.pending = Some(PendingMenu { due, position });
            return PointerOutcome::ContextMenuScheduled { due };
        }

        PointerOutcome::Released
    }

    /// Handle a platform double-click event. Returns true if a pending
    /// context menu was cancelled.
    pub fn double_click(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Decide whether a click stops at the wrapper or reaches the child.
    pub fn click(&self, path: &[TargetNode]) -> ClickDisposition {
        if is_interactive(path) {
            ClickDisposition::FallThrough
        } else {
            ClickDisposition::Consume
        }
    }

    /// Fire the scheduled context menu once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<DisambiguatorEvent> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;
        Some(DisambiguatorEvent::OpenContextMenu {
            position: pending.position,
        })
    }

    /// Drop all gesture state; used when the element goes away.
    pub fn teardown(&mut self) {
        self.state = PressState::Idle;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Vec<TargetNode> {
        vec![TargetNode::plain(), TargetNode::plain()]
    }

    #[test]
    fn test_settle_click_schedules_menu() {
        let mut d = PointerDisambiguator::default();
        let t0 = Instant::now();

        assert_eq!(d.pointer_down(Point::new(10.0, 10.0), &plain()), PointerOutcome::Pressed);
        d.pointer_move(Point::new(12.0, 11.0));
        let outcome = d.pointer_up(Point::new(12.0, 12.0), &plain(), t0);

        assert_eq!(
            outcome,
            PointerOutcome::ContextMenuScheduled { due: t0 + CONTEXT_MENU_DELAY }
        );
        assert!(!d.is_pressed());
    }

    #[test]
    fn test_menu_fires_after_delay() {
        let mut d = PointerDisambiguator::default();
        let t0 = Instant::now();
        d.pointer_down(Point::new(0.0, 0.0), &plain());
        d.pointer_up(Point::new(1.0, 0.0), &plain(), t0);

        assert_eq!(d.poll(t0 + Duration::from_millis(50)), None);
        assert_eq!(
            d.poll(t0 + Duration::from_millis(100)),
            Some(DisambiguatorEvent::OpenContextMenu { position: Point::new(1.0, 0.0) })
        );
        assert_eq!(d.poll(t0 + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_move_past_threshold_never_schedules() {
        let mut d = PointerDisambiguator::default();
        let t0 = Instant::now();
        d.pointer_down(Point::new(0.0, 0.0), &plain());

        assert_eq!(d.pointer_move(Point::new(4.0, 4.0)), PointerOutcome::DragHandedOff);
        assert_eq!(d.pointer_up(Point::new(0.0, 0.0), &plain(), t0), PointerOutcome::Ignored);
        assert_eq!(d.pending_deadline(), None);
        assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_release_at_threshold_does_not_schedule() {
        let mut d = PointerDisambiguator::default();
        let t0 = Instant::now();
        d.pointer_down(Point::new(0.0, 0.0), &plain());
        assert_eq!(d.pointer_up(Point::new(5.0, 0.0), &plain(), t0), PointerOutcome::Released);
        assert_eq!(d.pending_deadline(), None);
    }

    #[test]
    fn test_interactive_targets_are_never_claimed() {
        let mut d = PointerDisambiguator::default();
        let path = vec![TargetNode::plain(), TargetNode::editable(), TargetNode::plain()];

        assert_eq!(d.pointer_down(Point::ZERO, &path), PointerOutcome::Ignored);
        assert!(!d.is_pressed());
        assert_eq!(d.click(&path), ClickDisposition::FallThrough);
        assert_eq!(d.click(&plain()), ClickDisposition::Consume);
    }

    #[test]
    fn test_release_over_control_does_not_schedule() {
        let mut d = PointerDisambiguator::default();
        let t0 = Instant::now();
        d.pointer_down(Point::ZERO, &plain());
        let path = vec![TargetNode::control(NodeKind::Button)];
        assert_eq!(d.pointer_up(Point::ZERO, &path, t0), PointerOutcome::Released);
        assert_eq!(d.pending_deadline(), None);
    }

    #[test]
    fn test_up_without_down_is_noop() {
        let mut d = PointerDisambiguator::default();
        assert_eq!(d.pointer_up(Point::ZERO, &plain(), Instant::now()), PointerOutcome::Ignored);
        assert_eq!(d.state(), PressState::Idle);
    }

    #[test]
    fn test_double_click_cancels_pending_menu() {
        let mut d = PointerDisambiguator::default();
        let t0 = Instant::now();
        d.pointer_down(Point::ZERO, &plain());
        d.pointer_up(Point::ZERO, &plain(), t0);

        assert!(d.double_click());
        assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_quick_press_after_click_is_tracked() {
        let mut d = PointerDisambiguator::default();
        let t0 = Instant::now();
        d.pointer_down(Point::new(50.0, 50.0), &plain());
        d.pointer_up(Point::new(50.0, 50.0), &plain(), t0);

        assert_eq!(d.pointer_down(Point::new(50.0, 50.0), &plain()), PointerOutcome::Pressed);
        assert_eq!(d.pending_deadline(), None);
        assert_eq!(d.pointer_move(Point::new(50.0, 70.0)), PointerOutcome::DragHandedOff);
        assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_move_exactly_threshold_never_schedules() {
        let mut d = PointerDisambiguator::default();
        let t0 = Instant::now();
        d.pointer_down(Point::ZERO, &plain());

        assert_eq!(d.pointer_move(Point::new(5.0, 0.0)), PointerOutcome::DragHandedOff);
        assert_eq!(d.pointer_up(Point::ZERO, &plain(), t0), PointerOutcome::Ignored);
        assert_eq!(d.pending_deadline(), None);
    }

    #[test]
    fn test_new_press_clears_pending_menu() {
        let mut d = PointerDisambiguator::default();
        let t0 = Instant::now();
        d.pointer_down(Point::ZERO, &plain());
        d.pointer_up(Point::ZERO, &plain(), t0);

        let far = Point::new(300.0, 300.0);
        assert_eq!(d.pointer_down(far, &plain()), PointerOutcome::Pressed);
        assert_eq!(d.pending_deadline(), None);
    }

    #[test]
    fn test_teardown_clears_timer() {
        let mut d = PointerDisambiguator::default();
        let t0 = Instant::now();
        d.pointer_down(Point::ZERO, &plain());
        d.pointer_up(Point::ZERO, &plain(), t0);
        d.teardown();
        assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_interactive_predicate_covers_markers() {
        assert!(is_interactive(&[TargetNode::resize_handle()]));
        assert!(is_interactive(&[TargetNode::plain(), TargetNode::drag_handle()]));
        assert!(is_interactive(&[TargetNode::control(NodeKind::TextArea)]));
        assert!(is_interactive(&[TargetNode { resizing: true, ..TargetNode::plain() }]));
        assert!(!is_interactive(&[TargetNode::plain()]));
        assert!(!is_interactive(&[]));
    }
}
