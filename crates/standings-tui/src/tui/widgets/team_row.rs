// Team row: logo, name, raw statistics and the derived GD and PTS columns.

use ratatui::layout::Constraint;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Cell, Row};

use standings_core::league::{format_goal_difference, StatColumn, Team};
use standings_core::upload::ImageShape;

use super::{field_spans, image_span, ACCENT};
use crate::tui::focus::FieldId;
use crate::tui::ViewState;

/// Column widths of a standings table: logo, name, P W D L F A, GD, PTS.
pub fn widths() -> [Constraint; 10] {
    [
        Constraint::Length(2),
        Constraint::Min(16),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
    ]
}

/// Build the table row for team `t` of group `g`.
pub fn row(state: &ViewState, g: usize, t: usize, team: &Team) -> Row<'static> {
    let plain = Style::default().fg(Color::White);

    let mut cells = vec![
        Cell::from(Line::from(image_span(
            state,
            FieldId::TeamLogo(g, t),
            team.logo.as_ref(),
            ImageShape::Circle,
        ))),
        Cell::from(Line::from(field_spans(state, FieldId::TeamName(g, t), plain))),
    ];
    cells.extend(StatColumn::ALL.iter().map(|&column| {
        Cell::from(Line::from(field_spans(
            state,
            FieldId::TeamStat(g, t, column),
            plain,
        )))
    }));
    cells.push(Cell::from(goal_difference_text(team)).style(Style::default().fg(Color::Gray)));
    cells.push(Cell::from(team.points().to_string()).style(points_style()));

    Row::new(cells)
}

/// GD cell: `+n` when positive, `NaN` when any input is NaN.
pub fn goal_difference_text(team: &Team) -> String {
    format_goal_difference(team.goal_difference())
}

/// Points are the emphasized column.
pub fn points_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use standings_core::league::Stat;

    fn team(w: i64, d: i64, l: i64, f: i64, a: i64) -> Team {
        let mut team = Team::new(1, "Zuchhip FC");
        team.w = Stat::new(w);
        team.d = Stat::new(d);
        team.l = Stat::new(l);
        team.f = Stat::new(f);
        team.a = Stat::new(a);
        team
    }

    #[test]
    fn goal_difference_signs() {
        assert_eq!(goal_difference_text(&team(3, 2, 1, 10, 4)), "+6");
        assert_eq!(goal_difference_text(&team(0, 0, 0, 2, 2)), "0");
        assert_eq!(goal_difference_text(&team(0, 0, 0, 1, 5)), "-4");

        let mut broken = team(0, 0, 0, 1, 0);
        broken.a = Stat::NAN;
        assert_eq!(goal_difference_text(&broken), "NaN");
    }

    #[test]
    fn points_are_bold_accent() {
        let style = points_style();
        assert_eq!(style.fg, Some(ACCENT));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn widths_cover_every_column() {
        // logo + name + six stats + GD + PTS
        assert_eq!(widths().len(), 2 + StatColumn::ALL.len() + 2);
    }
}
