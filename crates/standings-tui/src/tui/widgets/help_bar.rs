// Help bar widget: key hints for the current mode.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        hint(state),
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Key hints for whatever currently owns the keyboard.
pub fn hint(state: &ViewState) -> &'static str {
    if state.notification.is_some() {
        " Enter/Esc:Dismiss"
    } else if state.confirm_quit {
        " y:Quit | n:Stay"
    } else if state.picker.is_some() {
        " type:Filter | Up/Down:Select | Enter:Choose | Esc:Cancel"
    } else if state.is_editing() {
        " Enter:Save | Esc:Revert | Tab/Up/Down:Save and move"
    } else {
        " arrows/Tab:Move | Enter:Edit | p:Export PNG | j:Export JPG | q:Quit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Notification;

    #[test]
    fn hint_follows_mode() {
        let mut state = ViewState::default();
        assert!(hint(&state).contains("p:Export PNG"));
        state.confirm_quit = true;
        assert!(hint(&state).contains("y:Quit"));
        state.notification = Some(Notification::new("t", "m"));
        assert!(hint(&state).contains("Dismiss"));
    }
}
