// Blocking notification overlay: a titled message the user must dismiss.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::centered_rect;
use crate::protocol::Notification;

const DIALOG_WIDTH: u16 = 60;

pub fn render(frame: &mut Frame, area: Rect, notification: &Notification) {
    let mut lines: Vec<Line> = notification
        .message
        .lines()
        .map(|l| Line::raw(l.to_string()))
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Press Enter to dismiss",
        Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
    ));

    let height = dialog_height(&lines, DIALOG_WIDTH);
    let dialog_area = centered_rect(DIALOG_WIDTH, height, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(Span::styled(
            format!(" {} ", notification.title),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// Rows needed for `lines` wrapped inside a bordered box of `width`.
fn dialog_height(lines: &[Line], width: u16) -> u16 {
    let inner = usize::from(width.saturating_sub(2)).max(1);
    let rows: usize = lines
        .iter()
        .map(|l| l.width().div_ceil(inner).max(1))
        .sum();
    u16::try_from(rows + 2).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_grows_with_wrapping() {
        let short = [Line::raw("one line")];
        assert_eq!(dialog_height(&short, 60), 3);
        let long = [Line::raw("x".repeat(100))];
        assert_eq!(dialog_height(&long, 60), 4);
        let blank = [Line::raw("")];
        assert_eq!(dialog_height(&blank, 60), 3);
    }

    #[test]
    fn render_shows_title_and_message() {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let n = Notification::new(
            "Export failed",
            "Could not export the image. Please try again.\n\ndisk full",
        );
        terminal
            .draw(|frame| render(frame, frame.area(), &n))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = (0..24u16)
            .flat_map(|y| (0..80u16).map(move |x| (x, y)))
            .map(|pos| buffer[pos].symbol().to_string())
            .collect();
        assert!(text.contains("Export failed"));
        assert!(text.contains("Please try again."));
        assert!(text.contains("disk full"));
    }
}
