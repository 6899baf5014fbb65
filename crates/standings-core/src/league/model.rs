// League records: Team, Group, LeagueData.
//
// Groups and teams sit behind `Arc` so scoped updates can share every
// untouched branch with the previous snapshot.

use std::sync::Arc;

use crate::league::stat::Stat;
use crate::upload::ImageRef;

// ---------------------------------------------------------------------------
// StatColumn
// ---------------------------------------------------------------------------

/// The six raw statistics a team row carries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatColumn {
    Played,
    Won,
    Drawn,
    Lost,
    GoalsFor,
    GoalsAgainst,
}

impl StatColumn {
    pub const ALL: [StatColumn; 6] = [
        StatColumn::Played,
        StatColumn::Won,
        StatColumn::Drawn,
        StatColumn::Lost,
        StatColumn::GoalsFor,
        StatColumn::GoalsAgainst,
    ];

    /// Header label used on the sheet.
    pub fn label(self) -> &'static str {
        match self {
            StatColumn::Played => "P",
            StatColumn::Won => "W",
            StatColumn::Drawn => "D",
            StatColumn::Lost => "L",
            StatColumn::GoalsFor => "F",
            StatColumn::GoalsAgainst => "A",
        }
    }
}

/// Header labels of a standings table, raw columns followed by derived ones.
pub const HEADER_LABELS: [&str; 8] = ["P", "W", "D", "L", "F", "A", "GD", "PTS"];

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// One competitor in a group.
///
/// Points and goal difference are derived on every call and never stored.
/// The raw counts are not cross-checked: `p` need not equal `w + d + l`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: u32,
    pub logo: Option<ImageRef>,
    pub name: String,
    pub p: Stat,
    pub w: Stat,
    pub d: Stat,
    pub l: Stat,
    pub f: Stat,
    pub a: Stat,
}

impl Team {
    /// A team with no logo and every statistic at zero.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Team {
            id,
            logo: None,
            name: name.into(),
            p: Stat::ZERO,
            w: Stat::ZERO,
            d: Stat::ZERO,
            l: Stat::ZERO,
            f: Stat::ZERO,
            a: Stat::ZERO,
        }
    }

    pub fn stat(&self, column: StatColumn) -> Stat {
        match column {
            StatColumn::Played => self.p,
            StatColumn::Won => self.w,
            StatColumn::Drawn => self.d,
            StatColumn::Lost => self.l,
            StatColumn::GoalsFor => self.f,
            StatColumn::GoalsAgainst => self.a,
        }
    }

    pub(crate) fn stat_mut(&mut self, column: StatColumn) -> &mut Stat {
        match column {
            StatColumn::Played => &mut self.p,
            StatColumn::Won => &mut self.w,
            StatColumn::Drawn => &mut self.d,
            StatColumn::Lost => &mut self.l,
            StatColumn::GoalsFor => &mut self.f,
            StatColumn::GoalsAgainst => &mut self.a,
        }
    }

    /// `3 * won + drawn`.
    pub fn points(&self) -> Stat {
        self.w * 3 + self.d
    }

    /// `goals_for - goals_against`.
    pub fn goal_difference(&self) -> Stat {
        self.f - self.a
    }
}

/// Render a goal difference: `+n` when positive, plain otherwise.
pub fn format_goal_difference(gd: Stat) -> String {
    if gd.is_positive() {
        format!("+{gd}")
    } else {
        gd.to_string()
    }
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// A named, ordered collection of teams ranked together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: u32,
    pub name: String,
    pub teams: Vec<Arc<Team>>,
}

impl Group {
    pub fn new(id: u32, name: impl Into<String>, teams: Vec<Team>) -> Self {
        Group {
            id,
            name: name.into(),
            teams: teams.into_iter().map(Arc::new).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// LeagueData
// ---------------------------------------------------------------------------

/// The whole editable sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueData {
    pub title: String,
    pub sub_title: String,
    pub match_day: Stat,
    /// Free text, never parsed.
    pub date: String,
    pub groups: Vec<Arc<Group>>,
    pub footer_text: String,
    pub footer_logo: Option<ImageRef>,
    pub footer_logo_2: Option<ImageRef>,
}

impl LeagueData {
    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index).map(Arc::as_ref)
    }

    pub fn team(&self, group_index: usize, team_index: usize) -> Option<&Team> {
        self.group(group_index)?
            .teams
            .get(team_index)
            .map(Arc::as_ref)
    }

    /// Iterate over every team in display order with its position.
    pub fn teams(&self) -> impl Iterator<Item = ((usize, usize), &Team)> {
        self.groups.iter().enumerate().flat_map(|(gi, group)| {
            group
                .teams
                .iter()
                .enumerate()
                .map(move |(ti, team)| ((gi, ti), team.as_ref()))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn team_with(w: i64, d: i64, l: i64, f: i64, a: i64) -> Team {
        let mut team = Team::new(1, "Test FC");
        team.p = Stat::new(w + d + l);
        team.w = Stat::new(w);
        team.d = Stat::new(d);
        team.l = Stat::new(l);
        team.f = Stat::new(f);
        team.a = Stat::new(a);
        team
    }

    #[test]
    fn derived_columns_worked_example() {
        let team = team_with(3, 2, 1, 10, 4);
        assert_eq!(team.points(), Stat::new(11));
        assert_eq!(team.goal_difference(), Stat::new(6));
        assert_eq!(format_goal_difference(team.goal_difference()), "+6");
    }

    #[test]
    fn goal_difference_formatting() {
        assert_eq!(format_goal_difference(Stat::ZERO), "0");
        assert_eq!(format_goal_difference(Stat::new(-3)), "-3");
        assert_eq!(format_goal_difference(Stat::new(1)), "+1");
        assert_eq!(format_goal_difference(Stat::NAN), "NaN");
    }

    #[test]
    fn nan_stat_poisons_only_its_derived_column() {
        let mut team = team_with(1, 0, 0, 2, 0);
        team.f = Stat::NAN;
        assert!(team.goal_difference().is_nan());
        assert_eq!(team.points(), Stat::new(3));
    }

    #[test]
    fn played_is_not_validated() {
        let mut team = team_with(2, 1, 0, 0, 0);
        team.p = Stat::new(40);
        assert_eq!(team.points(), Stat::new(7));
    }

    #[test]
    fn stat_accessors_cover_every_column() {
        let team = team_with(3, 2, 1, 10, 4);
        let values: Vec<_> = StatColumn::ALL.iter().map(|c| team.stat(*c)).collect();
        assert_eq!(
            values,
            vec![
                Stat::new(6),
                Stat::new(3),
                Stat::new(2),
                Stat::new(1),
                Stat::new(10),
                Stat::new(4)
            ]
        );
        let labels: Vec<_> = StatColumn::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, HEADER_LABELS[..6]);
    }
}
