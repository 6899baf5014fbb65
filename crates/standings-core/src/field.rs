// Inline editable field.
//
// A field shows its committed value until activated, then edits a local
// draft. The draft reaches the owner only on commit (blur, or Enter on a
// single-line field). Escape throws the draft away.
//
//   Display --activate--> Editing --blur / Enter--> commit, Display
//                         Editing --Escape-------> revert, Display

use crate::league::Stat;

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// Declared type of a field binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

/// A committed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(Stat),
}

impl FieldValue {
    /// Build a value of `kind` from raw draft text. Never fails: numbers
    /// that do not parse become `Stat::NAN`.
    pub fn coerce(kind: FieldKind, text: &str) -> FieldValue {
        match kind {
            FieldKind::Text => FieldValue::Text(text.to_string()),
            FieldKind::Number => FieldValue::Number(Stat::coerce(text)),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(_) => FieldKind::Number,
        }
    }

    /// Text as rendered in display mode and used to seed the draft.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<Stat> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Stat> for FieldValue {
    fn from(value: Stat) -> Self {
        FieldValue::Number(value)
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Keys a field reacts to while editing. Frontends translate their own key
/// events into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Enter,
    Escape,
}

/// Result of feeding a key to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// The key was absorbed; nothing to report.
    Continue,
    /// The edit was committed; the owner should store this value.
    Commit(FieldValue),
    /// The edit was discarded.
    Cancel,
}

// ---------------------------------------------------------------------------
// EditableField
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Display,
    Editing,
}

#[derive(Debug, Clone)]
pub struct EditableField {
    kind: FieldKind,
    mode: EditMode,
    /// Last value received from the owner.
    committed: FieldValue,
    draft: String,
    /// Cursor position in chars.
    cursor: usize,
    /// Whole draft selected; the next insertion replaces it.
    selected_all: bool,
}

impl EditableField {
    pub fn new(value: FieldValue) -> Self {
        let draft = value.display();
        EditableField {
            kind: value.kind(),
            mode: EditMode::Display,
            committed: value,
            cursor: draft.chars().count(),
            draft,
            selected_all: false,
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    pub fn committed(&self) -> &FieldValue {
        &self.committed
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_all_selected(&self) -> bool {
        self.selected_all
    }

    /// Text to show: the draft while editing, the committed value otherwise.
    pub fn text(&self) -> String {
        match self.mode {
            EditMode::Editing => self.draft.clone(),
            EditMode::Display => self.committed.display(),
        }
    }

    /// Take a new value from the owner. The draft follows it unless an edit
    /// is in progress.
    pub fn sync(&mut self, value: &FieldValue) {
        if &self.committed != value {
            self.committed = value.clone();
        }
        if !self.is_editing() {
            self.reset_draft();
        }
    }

    /// Switch to editing with the whole draft selected.
    pub fn activate(&mut self) {
        if self.is_editing() {
            return;
        }
        self.mode = EditMode::Editing;
        self.cursor = self.draft.chars().count();
        self.selected_all = true;
    }

    /// Focus left the field. Commits when editing.
    pub fn blur(&mut self) -> FieldOutcome {
        if !self.is_editing() {
            return FieldOutcome::Continue;
        }
        let value = FieldValue::coerce(self.kind, &self.draft);
        self.mode = EditMode::Display;
        // The draft holds the normalized value until the owner answers.
        self.draft = value.display();
        self.cursor = self.draft.chars().count();
        self.selected_all = false;
        FieldOutcome::Commit(value)
    }

    /// Discard the draft and fall back to the committed value.
    pub fn cancel(&mut self) -> FieldOutcome {
        if !self.is_editing() {
            return FieldOutcome::Continue;
        }
        self.mode = EditMode::Display;
        self.reset_draft();
        FieldOutcome::Cancel
    }

    pub fn handle_key(&mut self, key: FieldKey) -> FieldOutcome {
        if !self.is_editing() {
            return FieldOutcome::Continue;
        }
        match key {
            FieldKey::Enter => self.blur(),
            FieldKey::Escape => self.cancel(),
            FieldKey::Char(c) => {
                self.insert(c);
                FieldOutcome::Continue
            }
            FieldKey::Backspace => {
                if self.selected_all {
                    self.clear_draft();
                } else if self.cursor > 0 {
                    self.remove_at(self.cursor - 1);
                    self.cursor -= 1;
                }
                FieldOutcome::Continue
            }
            FieldKey::Delete => {
                if self.selected_all {
                    self.clear_draft();
                } else if self.cursor < self.draft.chars().count() {
                    self.remove_at(self.cursor);
                }
                FieldOutcome::Continue
            }
            FieldKey::Left => {
                self.selected_all = false;
                self.cursor = self.cursor.saturating_sub(1);
                FieldOutcome::Continue
            }
            FieldKey::Right => {
                self.selected_all = false;
                self.cursor = (self.cursor + 1).min(self.draft.chars().count());
                FieldOutcome::Continue
            }
            FieldKey::Home => {
                self.selected_all = false;
                self.cursor = 0;
                FieldOutcome::Continue
            }
            FieldKey::End => {
                self.selected_all = false;
                self.cursor = self.draft.chars().count();
                FieldOutcome::Continue
            }
        }
    }

    fn reset_draft(&mut self) {
        self.draft = self.committed.display();
        self.cursor = self.draft.chars().count();
        self.selected_all = false;
    }

    fn clear_draft(&mut self) {
        self.draft.clear();
        self.cursor = 0;
        self.selected_all = false;
    }

    fn insert(&mut self, c: char) {
        if self.selected_all {
            self.clear_draft();
        }
        let at = byte_offset(&self.draft, self.cursor);
        self.draft.insert(at, c);
        self.cursor += 1;
    }

    fn remove_at(&mut self, char_index: usize) {
        let at = byte_offset(&self.draft, char_index);
        self.draft.remove(at);
    }
}

fn byte_offset(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map_or(s.len(), |(offset, _)| offset)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
