// Status bar widget: app name, export state, last status message.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use standings_core::export::ExportFormat;

use super::ACCENT;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [name] [export indicator] [status message]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::styled(
        " STANDINGS ",
        Style::default()
            .fg(Color::White)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD),
    )];

    let (label, color) = export_indicator(state.exporting);
    spans.push(Span::styled(format!(" {} ", label), Style::default().fg(color)));

    if let Some(message) = &state.status_message {
        spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(message.clone(), Style::default().fg(Color::White)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Export state label and its color.
pub fn export_indicator(exporting: Option<ExportFormat>) -> (String, Color) {
    match exporting {
        Some(format) => (format!("Exporting {}...", format), Color::Yellow),
        None => ("Ready".to_string(), Color::Green),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_indicator_states() {
        assert_eq!(export_indicator(None), ("Ready".to_string(), Color::Green));
        let (label, color) = export_indicator(Some(ExportFormat::Jpeg));
        assert_eq!(label, "Exporting JPG...");
        assert_eq!(color, Color::Yellow);
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_shows_status_message() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.status_message = Some("Saved out.png".into());
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let line: String = (0..80u16).map(|x| buffer[(x, 0u16)].symbol().to_string()).collect();
        assert!(line.contains("Saved out.png"));
    }
}
