// Leave-the-editor dialog. The sheet lives only in memory, so quitting
// drops every edit that was not exported.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use standings_core::export::ExportFormat;

use super::centered_rect;

const DIALOG_WIDTH: u16 = 44;

pub fn render(frame: &mut Frame, area: Rect, exporting: Option<ExportFormat>) {
    let lines = body(exporting);
    // Borders plus one blank row above and below the body.
    let height = lines.len() as u16 + 4;
    let dialog_area = centered_rect(DIALOG_WIDTH, height, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " Leave the editor ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));

    let mut text = vec![Line::raw("")];
    text.extend(lines);
    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

fn body(exporting: Option<ExportFormat>) -> Vec<Line<'static>> {
    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let mut lines = vec![Line::styled(
        "  Unexported edits will be lost.",
        Style::default().fg(Color::Gray),
    )];
    if let Some(format) = exporting {
        lines.push(Line::styled(
            format!("  The {format} export has not finished."),
            Style::default().fg(Color::Red),
        ));
    }
    lines.push(Line::from(vec![
        Span::raw("  "),
        key("y", Color::Green),
        Span::raw(" quit   "),
        key("n", Color::Red),
        Span::raw(" keep editing"),
    ]));
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn render_text(exporting: Option<ExportFormat>) -> String {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), exporting))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..24u16)
            .flat_map(|y| (0..80u16).map(move |x| (x, y)))
            .map(|pos| buffer[pos].symbol().to_string())
            .collect()
    }

    #[test]
    fn warns_that_edits_are_lost() {
        let text = render_text(None);
        assert!(text.contains("Leave the editor"));
        assert!(text.contains("Unexported edits will be lost."));
        assert!(text.contains("keep editing"));
        assert!(!text.contains("has not finished"));
    }

    #[test]
    fn mentions_running_export() {
        let text = render_text(Some(ExportFormat::Jpeg));
        assert!(text.contains("The JPG export has not finished."));
    }

    #[test]
    fn render_in_tiny_area_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(10, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), Some(ExportFormat::Png)))
            .unwrap();
    }
}
