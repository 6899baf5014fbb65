// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (focus moves, draft
// edits, picker navigation).
//
// Modes, highest priority first: notification, quit confirmation, picker,
// editing, normal.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use standings_core::export::ExportFormat;
use standings_core::field::{FieldKey, FieldOutcome};
use standings_core::upload::FilePicker;

use super::focus::{self, FieldId, Move};
use super::{OpenPicker, ViewState};
use crate::protocol::{Notification, UserCommand};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator (a committed edit, a chosen image, an export, Quit).
/// Returns `None` when the key press was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.notification.is_some() {
        if matches!(key_event.code, KeyCode::Enter | KeyCode::Esc) {
            view_state.notification = None;
        }
        return None;
    }

    // Quit confirmation mode: only y/q confirm, n/Esc cancel, everything else blocked
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.picker.is_some() {
        return handle_picker(key_event, view_state);
    }

    if view_state.is_editing() {
        return handle_editing(key_event, view_state);
    }

    handle_normal(key_event, view_state)
}

/// Normal mode: move focus, start edits, export, quit.
fn handle_normal(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Tab => move_focus(view_state, Move::Next),
        KeyCode::BackTab => move_focus(view_state, Move::Prev),
        KeyCode::Up => move_focus(view_state, Move::Up),
        KeyCode::Down => move_focus(view_state, Move::Down),
        KeyCode::Left => move_focus(view_state, Move::Left),
        KeyCode::Right => move_focus(view_state, Move::Right),

        KeyCode::Enter => {
            activate(view_state);
            None
        }

        KeyCode::Char('p') => Some(UserCommand::Export(ExportFormat::Png)),
        KeyCode::Char('j') => Some(UserCommand::Export(ExportFormat::Jpeg)),

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Editing mode: keys go to the focused field. Leaving the field commits.
fn handle_editing(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let id = view_state.focus;
    let field = view_state.fields.get_mut(&id)?;

    let leave = match key_event.code {
        KeyCode::Tab => Some(Move::Next),
        KeyCode::BackTab => Some(Move::Prev),
        KeyCode::Up => Some(Move::Up),
        KeyCode::Down => Some(Move::Down),
        _ => None,
    };
    if let Some(dir) = leave {
        let outcome = field.blur();
        move_focus(view_state, dir);
        return commit(id, outcome);
    }

    let key = match key_event.code {
        KeyCode::Char(c) => FieldKey::Char(c),
        KeyCode::Backspace => FieldKey::Backspace,
        KeyCode::Delete => FieldKey::Delete,
        KeyCode::Left => FieldKey::Left,
        KeyCode::Right => FieldKey::Right,
        KeyCode::Home => FieldKey::Home,
        KeyCode::End => FieldKey::End,
        KeyCode::Enter => FieldKey::Enter,
        KeyCode::Esc => FieldKey::Escape,
        _ => return None,
    };
    let outcome = field.handle_key(key);
    commit(id, outcome)
}

fn commit(id: FieldId, outcome: FieldOutcome) -> Option<UserCommand> {
    match outcome {
        FieldOutcome::Commit(value) => id.command(value),
        FieldOutcome::Continue | FieldOutcome::Cancel => None,
    }
}

/// Handle key events while in quit confirmation mode.
///
/// In quit confirmation mode:
/// - `y` or `q` confirms quit (sends UserCommand::Quit)
/// - `n` or `Esc` cancels (returns to normal mode)
/// - All other keys are blocked (no-op)
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None, // Block all other input
    }
}

/// Picker mode: type to filter, Up/Down to select, Enter to choose, Esc to
/// cancel. The picker closes after either outcome.
fn handle_picker(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let open = view_state.picker.as_mut()?;
    match key_event.code {
        KeyCode::Esc => {
            view_state.picker = None;
            None
        }
        KeyCode::Enter => {
            let open = view_state.picker.take()?;
            let path = open.picker.choose()?;
            Some(UserCommand::PickImage {
                target: open.target,
                path,
            })
        }
        KeyCode::Up => {
            open.picker.move_up();
            None
        }
        KeyCode::Down => {
            open.picker.move_down();
            None
        }
        KeyCode::Backspace => {
            open.picker.pop_filter();
            None
        }
        KeyCode::Char(c) => {
            open.picker.push_filter(c);
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn move_focus(view_state: &mut ViewState, dir: Move) -> Option<UserCommand> {
    if let Some(league) = &view_state.league {
        view_state.focus = focus::step(league, view_state.focus, dir);
    }
    None
}

/// Enter on a focused field: start editing, or open the picker for an
/// image slot.
fn activate(view_state: &mut ViewState) {
    let id = view_state.focus;
    if let Some(target) = id.image_target() {
        match FilePicker::open(&view_state.image_dir) {
            Ok(picker) => view_state.picker = Some(OpenPicker { target, picker }),
            Err(e) => {
                warn!(
                    "Could not list images in {}: {}",
                    view_state.image_dir.display(),
                    e
                );
                view_state.notification = Some(Notification::new(
                    "No images",
                    format!("Could not list {}: {}", view_state.image_dir.display(), e),
                ));
            }
        }
        return;
    }
    if let Some(field) = view_state.fields.get_mut(&id) {
        field.activate();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
