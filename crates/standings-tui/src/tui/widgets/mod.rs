// TUI widget modules for each editor zone, plus the span helpers they share
// to draw a focusable cell.

pub mod footer;
pub mod header;
pub mod help_bar;
pub mod notification;
pub mod picker;
pub mod quit_confirm;
pub mod standings;
pub mod status_bar;
pub mod team_row;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use standings_core::upload::{ImageRef, ImageShape};

use super::focus::FieldId;
use super::ViewState;

/// Accent color of the sheet (side band, points column).
pub const ACCENT: Color = Color::Rgb(0x14, 0xF1, 0xD9);

/// Style of the focused cell when not editing.
pub fn focus_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

/// Spans for one text or number cell.
///
/// Idle cells show the committed value. The focused cell is reversed; while
/// editing, the draft is shown with the cursor (or the whole selection)
/// highlighted.
pub fn field_spans(state: &ViewState, id: FieldId, base: Style) -> Vec<Span<'static>> {
    let Some(field) = state.field(id) else {
        return vec![Span::styled(String::new(), base)];
    };
    let focused = state.focus == id;

    if !field.is_editing() {
        let style = if focused { base.patch(focus_style()) } else { base };
        return vec![Span::styled(field.text(), style)];
    }

    let editing = base.fg(Color::Black).bg(Color::Yellow);
    let draft = field.draft();
    if field.is_all_selected() {
        return vec![Span::styled(draft.to_string(), editing.add_modifier(Modifier::REVERSED))];
    }

    let cursor = field.cursor();
    let before: String = draft.chars().take(cursor).collect();
    let at: String = draft.chars().nth(cursor).map_or(" ".into(), String::from);
    let after: String = draft.chars().skip(cursor + 1).collect();
    vec![
        Span::styled(before, editing),
        Span::styled(at, editing.add_modifier(Modifier::REVERSED)),
        Span::styled(after, editing),
    ]
}

/// Glyph for an image slot: filled when an image is set, hollow otherwise.
pub fn image_span(
    state: &ViewState,
    id: FieldId,
    image: Option<&ImageRef>,
    shape: ImageShape,
) -> Span<'static> {
    let glyph = match (shape, image.is_some()) {
        (ImageShape::Circle, true) => "●",
        (ImageShape::Circle, false) => "○",
        (ImageShape::Rectangle, true) => "■",
        (ImageShape::Rectangle, false) => "□",
    };
    let style = if state.focus == id {
        focus_style()
    } else {
        Style::default().fg(Color::Gray)
    };
    Span::styled(glyph, style)
}

/// Compute a centered rectangle of the given size within `area`.
///
/// If the area is too small, the dialog is clamped to the available space.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width);
    let clamped_height = height.min(area.height);

    let vertical = Layout::vertical([Constraint::Length(clamped_height)])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(clamped_width)])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
