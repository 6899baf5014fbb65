// Standings table widget: one bordered table per group.
//
// The block title is the editable group name; the header row carries the
// fixed column labels.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use standings_core::league::HEADER_LABELS;

use super::{field_spans, team_row, ACCENT};
use crate::tui::focus::FieldId;
use crate::tui::ViewState;

/// Render group `g` into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, g: usize) {
    let Some(group) = state.league.as_ref().and_then(|l| l.group(g)) else {
        return;
    };

    let title = Line::from(field_spans(
        state,
        FieldId::GroupName(g),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));

    let rows: Vec<Row> = group
        .teams
        .iter()
        .enumerate()
        .map(|(t, team)| team_row::row(state, g, t, team))
        .collect();

    let table = Table::new(rows, team_row::widths())
        .header(header_row())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(title),
        );
    frame.render_widget(table, area);
}

/// Header row: blank logo column, `TEAM`, then the fixed labels.
pub fn header_row() -> Row<'static> {
    let mut cells = vec![Cell::from(""), Cell::from("TEAM")];
    cells.extend(HEADER_LABELS.iter().map(|label| Cell::from(*label)));
    Row::new(cells).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use standings_core::league::{seed, Stat, StatColumn, TeamPatch};
    use std::sync::Arc;

    fn render_text(state: &ViewState, g: usize) -> Vec<String> {
        let backend = ratatui::backend::TestBackend::new(80, 9);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state, g))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        (0..9u16)
            .map(|y| (0..80u16).map(|x| buffer[(x, y)].symbol().to_string()).collect())
            .collect()
    }

    #[test]
    fn renders_name_header_and_teams_in_order() {
        let mut state = ViewState::default();
        state.apply_league(Arc::new(seed()));
        let lines = render_text(&state, 1);
        assert!(lines[0].contains("GROUP B"));
        assert!(lines[1].contains("TEAM"));
        assert!(lines[1].contains("PTS"));
        assert!(lines[2].contains("The PoleStar FC"));
        assert!(lines[6].contains("Team Ten"));
    }

    #[test]
    fn derived_columns_follow_stats() {
        let league = seed()
            .with_team(
                0,
                0,
                &TeamPatch::stat(StatColumn::Won, Stat::new(3))
                    .with_stat(StatColumn::Drawn, Stat::new(2))
                    .with_stat(StatColumn::Lost, Stat::new(1))
                    .with_stat(StatColumn::GoalsFor, Stat::new(10))
                    .with_stat(StatColumn::GoalsAgainst, Stat::new(4)),
            )
            .unwrap();
        let mut state = ViewState::default();
        state.apply_league(Arc::new(league));
        let lines = render_text(&state, 0);
        assert!(lines[2].contains("+6"));
        assert!(lines[2].contains("11"));
    }

    #[test]
    fn missing_group_renders_nothing() {
        let state = ViewState::default();
        let lines = render_text(&state, 0);
        assert!(lines.iter().all(|l| l.trim().is_empty()));
    }

    #[test]
    fn header_row_has_all_labels() {
        // Smoke test: building the row must not panic and the labels are fixed.
        let _ = header_row();
        assert_eq!(HEADER_LABELS, ["P", "W", "D", "L", "F", "A", "GD", "PTS"]);
    }
}
