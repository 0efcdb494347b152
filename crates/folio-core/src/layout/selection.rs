//! Selection and inline text editing state for one container.
//!
//! Items remain pure data. This tracks which item shows resize handles, which
//! item has its style popover open, and which text item is being edited.

/// UI state of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemState {
    #[default]
    Normal,
    /// Shows resize handles.
    Selected,
    /// Text is being edited inline.
    Editing,
}

/// In-progress inline edit of a text item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub item_id: String,
    /// Text as typed so far.
    pub buffer: String,
    /// Text before editing began, restored on Escape.
    pub original: String,
}

/// Keys with special meaning while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter { shift: bool },
    Escape,
}

/// Result of an [`EditKey`] while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKeyOutcome {
    /// No edit in progress.
    Ignored,
    /// Editing continues (shift+Enter inserted a line break).
    Continue,
    Committed,
    Reverted,
}

/// Per-container selection state.
///
/// At most one item is selected. Text editing is tracked separately and does
/// not change the selection.
#[derive(Debug, Clone, Default)]
pub struct ItemSelection {
    selected: Option<String>,
    style_popover: Option<String>,
    editing: Option<TextEdit>,
}

impl ItemSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a single item. Any open style popover is closed.
    pub fn select(&mut self, id: &str) {
        self.selected = Some(id.to_string());
        self.style_popover = None;
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.style_popover = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    /// Open the style popover for `id`. Other popovers close.
    pub fn open_style_popover(&mut self, id: &str) {
        self.style_popover = Some(id.to_string());
    }

    pub fn close_style_popover(&mut self) {
        self.style_popover = None;
    }

    pub fn style_popover(&self) -> Option<&str> {
        self.style_popover.as_deref()
    }

    pub fn state(&self, id: &str) -> ItemState {
        if self.editing.as_ref().is_some_and(|edit| edit.item_id == id) {
            ItemState::Editing
        } else if self.is_selected(id) {
            ItemState::Selected
        } else {
            ItemState::Normal
        }
    }

    pub fn editing(&self) -> Option<&TextEdit> {
        self.editing.as_ref()
    }

    pub fn begin_edit(&mut self, id: &str, current: &str) {
        self.editing = Some(TextEdit {
            item_id: id.to_string(),
            buffer: current.to_string(),
            original: current.to_string(),
        });
    }

    /// Replace the edit buffer. Returns false if nothing is being edited.
    pub fn set_buffer(&mut self, text: &str) -> bool {
        match &mut self.editing {
            Some(edit) => {
                edit.buffer = text.to_string();
                true
            }
            None => false,
        }
    }

    pub fn push_newline(&mut self) {
        if let Some(edit) = &mut self.editing {
            edit.buffer.push('\n');
        }
    }

    /// End editing and hand back the edit.
    pub fn take_edit(&mut self) -> Option<TextEdit> {
        self.editing.take()
    }

    /// Forget everything that refers to `id`.
    pub fn forget(&mut self, id: &str) {
        if self.is_selected(id) {
            self.selected = None;
        }
        if self.style_popover.as_deref() == Some(id) {
            self.style_popover = None;
        }
        if self.editing.as_ref().is_some_and(|edit| edit.item_id == id) {
            self.editing = None;
        }
    }
}
