// Footer widget: footer text and the two footer logo slots.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use standings_core::upload::ImageShape;

use super::{field_spans, image_span, ACCENT};
use crate::tui::focus::FieldId;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let league = state.league.as_deref();
    let muted = Style::default().fg(Color::Gray);

    let logos = Line::from(vec![
        Span::styled("Logos: ", muted),
        image_span(
            state,
            FieldId::FooterLogo,
            league.and_then(|l| l.footer_logo.as_ref()),
            ImageShape::Rectangle,
        ),
        Span::raw(" "),
        image_span(
            state,
            FieldId::FooterLogo2,
            league.and_then(|l| l.footer_logo_2.as_ref()),
            ImageShape::Rectangle,
        ),
    ]);

    let text = Line::from(field_spans(
        state,
        FieldId::FooterText,
        Style::default().fg(Color::White),
    ));

    let paragraph = Paragraph::new(vec![text, logos])
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title("Footer"),
        );
    frame.render_widget(paragraph, area);
}
