//! Pointer capture for the lifetime of a drag gesture.
//!
//! A drag needs document-wide pointer-move/pointer-up delivery while it is in
//! progress. [`PointerCaptures`] tracks active registrations and
//! [`CaptureGuard`] releases its registration when dropped, so gesture end and
//! component teardown share the same release path.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Identifier of one capture registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureId(u64);

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    active: BTreeSet<CaptureId>,
}

/// Shared registry of active pointer captures.
///
/// Cloning yields another handle to the same registry.
#[derive(Debug, Clone, Default)]
pub struct PointerCaptures {
    inner: Rc<RefCell<Registry>>,
}

impl PointerCaptures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capture. It stays active until the guard is dropped.
    pub fn acquire(&self, owner: &str) -> CaptureGuard {
        let mut registry = self.inner.borrow_mut();
        let id = CaptureId(registry.next_id);
        registry.next_id += 1;
        registry.active.insert(id);
        log::debug!("Pointer capture {:?} acquired by {}", id, owner);
        CaptureGuard {
            id,
            registry: Rc::clone(&self.inner),
        }
    }

    /// Number of captures currently held.
    pub fn active_count(&self) -> usize {
        self.inner.borrow().active.len()
    }
}

/// Releases its capture on drop.
#[derive(Debug)]
pub struct CaptureGuard {
    id: CaptureId,
    registry: Rc<RefCell<Registry>>,
}

impl CaptureGuard {
    pub fn id(&self) -> CaptureId {
        self.id
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if self.registry.borrow_mut().active.remove(&self.id) {
            log::debug!("Pointer capture {:?} released", self.id);
        }
    }
}
