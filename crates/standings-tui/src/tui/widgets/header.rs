// Header widget: title, sub title, match day and date.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::{field_spans, ACCENT};
use crate::tui::focus::FieldId;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(Color::Gray);

    let mut first = field_spans(state, FieldId::Title, title_style);
    first.push(Span::raw("  "));
    first.extend(field_spans(state, FieldId::SubTitle, title_style));

    let mut second = vec![Span::styled("MATCH DAY ", muted)];
    second.extend(field_spans(
        state,
        FieldId::MatchDay,
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ));
    second.push(Span::styled("   ", muted));
    second.extend(field_spans(state, FieldId::Date, muted));

    let paragraph = Paragraph::new(vec![Line::from(first), Line::from(second)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    );
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use standings_core::league::seed;
    use std::sync::Arc;

    #[test]
    fn render_shows_header_fields() {
        let mut state = ViewState::default();
        state.apply_league(Arc::new(seed()));
        let backend = ratatui::backend::TestBackend::new(80, 4);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row = |y: u16| -> String {
            (0..80u16)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(1).contains("KZDFA"));
        assert!(row(1).contains("1st DIVISION LEAGUE 2025"));
        assert!(row(2).contains("MATCH DAY 1"));
        assert!(row(2).contains("16-Aug-2025"));
    }
}
