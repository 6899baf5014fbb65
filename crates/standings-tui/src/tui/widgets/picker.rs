// Logo picker overlay: filter line plus the matching PNG/JPEG files.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;
use crate::protocol::ImageTarget;
use crate::tui::OpenPicker;

const DIALOG_WIDTH: u16 = 56;
const DIALOG_HEIGHT: u16 = 16;

pub fn render(frame: &mut Frame, area: Rect, open: &OpenPicker) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let picker = &open.picker;
    let visible = picker.visible();

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Filter: ", Style::default().fg(Color::Gray)),
            Span::styled(picker.filter().to_string(), Style::default().fg(Color::Yellow)),
        ]),
        Line::raw(""),
    ];

    // Border, filter line and spacer take four rows.
    let list_rows = usize::from(dialog_area.height.saturating_sub(4));
    if visible.is_empty() {
        lines.push(Line::styled(
            "  No PNG or JPEG files",
            Style::default().fg(Color::Gray),
        ));
    } else {
        let first = scroll_start(picker.selected(), list_rows);
        for (i, path) in visible.iter().enumerate().skip(first).take(list_rows) {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let style = if i == picker.selected() {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::styled(format!("  {}", name), style));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", title(open.target)),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::styled(
            format!(" {} ", picker.dir().display()),
            Style::default().fg(Color::Gray),
        ));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// Dialog title naming the slot being filled.
pub fn title(target: ImageTarget) -> String {
    match target {
        ImageTarget::TeamLogo { group, team } => {
            format!("Team logo (group {}, row {})", group + 1, team + 1)
        }
        ImageTarget::FooterLogo => "Footer logo 1".to_string(),
        ImageTarget::FooterLogo2 => "Footer logo 2".to_string(),
    }
}

/// First visible index so that `selected` stays on screen.
fn scroll_start(selected: usize, rows: usize) -> usize {
    if rows == 0 {
        return selected;
    }
    (selected + 1).saturating_sub(rows)
}
