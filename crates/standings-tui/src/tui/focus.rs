// Focusable fields of the sheet and keyboard navigation between them.
//
// Fields are laid out in rows that mirror the screen:
//
//   Title      SubTitle
//   MatchDay   Date
//   GroupName(g)
//   TeamLogo   TeamName   P W D L F A        (one row per team)
//   FooterText
//   FooterLogo FooterLogo2
//
// Tab walks the rows left to right, top to bottom. Up/Down keep the column
// where the target row has one.

use standings_core::field::{FieldKind, FieldValue};
use standings_core::league::{GroupPatch, LeagueData, LeagueUpdate, StatColumn, TeamPatch};

use crate::protocol::{ImageTarget, UserCommand};

/// Identity of one editable element on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    Title,
    SubTitle,
    MatchDay,
    Date,
    GroupName(usize),
    TeamLogo(usize, usize),
    TeamName(usize, usize),
    TeamStat(usize, usize, StatColumn),
    FooterText,
    FooterLogo,
    FooterLogo2,
}

impl FieldId {
    /// Type of the bound value. `None` for image slots.
    pub fn kind(self) -> Option<FieldKind> {
        match self {
            FieldId::MatchDay | FieldId::TeamStat(..) => Some(FieldKind::Number),
            FieldId::TeamLogo(..) | FieldId::FooterLogo | FieldId::FooterLogo2 => None,
            _ => Some(FieldKind::Text),
        }
    }

    pub fn is_image(self) -> bool {
        self.kind().is_none()
    }

    /// Current value of a text or number field in `league`.
    pub fn value(self, league: &LeagueData) -> Option<FieldValue> {
        let value = match self {
            FieldId::Title => FieldValue::from(league.title.as_str()),
            FieldId::SubTitle => FieldValue::from(league.sub_title.as_str()),
            FieldId::MatchDay => FieldValue::from(league.match_day),
            FieldId::Date => FieldValue::from(league.date.as_str()),
            FieldId::GroupName(g) => FieldValue::from(league.group(g)?.name.as_str()),
            FieldId::TeamName(g, t) => FieldValue::from(league.team(g, t)?.name.as_str()),
            FieldId::TeamStat(g, t, column) => FieldValue::from(league.team(g, t)?.stat(column)),
            FieldId::FooterText => FieldValue::from(league.footer_text.as_str()),
            FieldId::TeamLogo(..) | FieldId::FooterLogo | FieldId::FooterLogo2 => return None,
        };
        Some(value)
    }

    pub fn image_target(self) -> Option<ImageTarget> {
        match self {
            FieldId::TeamLogo(group, team) => Some(ImageTarget::TeamLogo { group, team }),
            FieldId::FooterLogo => Some(ImageTarget::FooterLogo),
            FieldId::FooterLogo2 => Some(ImageTarget::FooterLogo2),
            _ => None,
        }
    }

    /// The update a committed value turns into. `None` when the value does
    /// not match the field's kind.
    pub fn command(self, value: FieldValue) -> Option<UserCommand> {
        let text = || value.as_text().map(str::to_string);
        let cmd = match self {
            FieldId::Title => UserCommand::UpdateLeague(LeagueUpdate::Title(text()?)),
            FieldId::SubTitle => UserCommand::UpdateLeague(LeagueUpdate::SubTitle(text()?)),
            FieldId::MatchDay => {
                UserCommand::UpdateLeague(LeagueUpdate::MatchDay(value.as_number()?))
            }
            FieldId::Date => UserCommand::UpdateLeague(LeagueUpdate::Date(text()?)),
            FieldId::FooterText => UserCommand::UpdateLeague(LeagueUpdate::FooterText(text()?)),
            FieldId::GroupName(group) => UserCommand::UpdateGroup {
                group,
                patch: GroupPatch::name(text()?),
            },
            FieldId::TeamName(group, team) => UserCommand::UpdateTeam {
                group,
                team,
                patch: TeamPatch::name(text()?),
            },
            FieldId::TeamStat(group, team, column) => UserCommand::UpdateTeam {
                group,
                team,
                patch: TeamPatch::stat(column, value.as_number()?),
            },
            FieldId::TeamLogo(..) | FieldId::FooterLogo | FieldId::FooterLogo2 => return None,
        };
        Some(cmd)
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Focusable fields of `league`, grouped in screen rows.
pub fn focus_rows(league: &LeagueData) -> Vec<Vec<FieldId>> {
    let mut rows = vec![
        vec![FieldId::Title, FieldId::SubTitle],
        vec![FieldId::MatchDay, FieldId::Date],
    ];
    for (g, group) in league.groups.iter().enumerate() {
        rows.push(vec![FieldId::GroupName(g)]);
        for t in 0..group.teams.len() {
            let mut row = vec![FieldId::TeamLogo(g, t), FieldId::TeamName(g, t)];
            row.extend(StatColumn::ALL.iter().map(|&c| FieldId::TeamStat(g, t, c)));
            rows.push(row);
        }
    }
    rows.push(vec![FieldId::FooterText]);
    rows.push(vec![FieldId::FooterLogo, FieldId::FooterLogo2]);
    rows
}

/// All focusable fields in Tab order.
pub fn focus_order(league: &LeagueData) -> Vec<FieldId> {
    focus_rows(league).into_iter().flatten().collect()
}

/// Direction of a focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Next,
    Prev,
    Left,
    Right,
    Up,
    Down,
}

/// Where focus lands after moving from `from`. Stops at the edges.
pub fn step(league: &LeagueData, from: FieldId, dir: Move) -> FieldId {
    let rows = focus_rows(league);
    let Some((r, c)) = locate(&rows, from) else {
        return rows
            .first()
            .and_then(|row| row.first().copied())
            .unwrap_or(from);
    };

    match dir {
        Move::Next | Move::Prev => {
            let order: Vec<FieldId> = rows.iter().flatten().copied().collect();
            let i = order.iter().position(|&id| id == from).unwrap_or(0);
            let j = match dir {
                Move::Next => (i + 1).min(order.len() - 1),
                _ => i.saturating_sub(1),
            };
            order[j]
        }
        Move::Left => rows[r][c.saturating_sub(1)],
        Move::Right => rows[r][(c + 1).min(rows[r].len() - 1)],
        Move::Up | Move::Down => {
            let target = match dir {
                Move::Up if r > 0 => r - 1,
                Move::Down if r + 1 < rows.len() => r + 1,
                _ => r,
            };
            let row = &rows[target];
            row[c.min(row.len() - 1)]
        }
    }
}

fn locate(rows: &[Vec<FieldId>], id: FieldId) -> Option<(usize, usize)> {
    rows.iter()
        .enumerate()
        .find_map(|(r, row)| row.iter().position(|&f| f == id).map(|c| (r, c)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
