// Path-scoped, copy-on-write updates to LeagueData.
//
// Every update returns a new LeagueData. Only the records on the edited path
// are rebuilt; every other group and team `Arc` is shared with the input.

use std::sync::Arc;

use thiserror::Error;

use crate::league::model::{Group, LeagueData, StatColumn, Team};
use crate::league::stat::Stat;
use crate::upload::ImageRef;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeagueError {
    #[error("group index {index} out of range ({len} groups)")]
    GroupOutOfRange { index: usize, len: usize },

    #[error("team index {index} out of range for group {group} ({len} teams)")]
    TeamOutOfRange {
        group: usize,
        index: usize,
        len: usize,
    },
}

// ---------------------------------------------------------------------------
// Update descriptions
// ---------------------------------------------------------------------------

/// Replacement of one top-level league field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeagueUpdate {
    Title(String),
    SubTitle(String),
    MatchDay(Stat),
    Date(String),
    FooterText(String),
    FooterLogo(Option<ImageRef>),
    FooterLogo2(Option<ImageRef>),
}

/// Partial group record. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupPatch {
    pub name: Option<String>,
}

impl GroupPatch {
    pub fn name(name: impl Into<String>) -> Self {
        GroupPatch {
            name: Some(name.into()),
        }
    }

    pub fn apply(&self, group: &Group) -> Group {
        Group {
            id: group.id,
            name: self.name.clone().unwrap_or_else(|| group.name.clone()),
            teams: group.teams.clone(),
        }
    }
}

/// Partial team record. `None` fields are left as they are; `logo` is
/// doubly optional so a patch can clear the logo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamPatch {
    pub logo: Option<Option<ImageRef>>,
    pub name: Option<String>,
    pub stats: Vec<(StatColumn, Stat)>,
}

impl TeamPatch {
    pub fn name(name: impl Into<String>) -> Self {
        TeamPatch {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn logo(logo: Option<ImageRef>) -> Self {
        TeamPatch {
            logo: Some(logo),
            ..Default::default()
        }
    }

    pub fn stat(column: StatColumn, value: Stat) -> Self {
        TeamPatch {
            stats: vec![(column, value)],
            ..Default::default()
        }
    }

    /// Add another statistic to the patch. Later entries win.
    pub fn with_stat(mut self, column: StatColumn, value: Stat) -> Self {
        self.stats.push((column, value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.logo.is_none() && self.name.is_none() && self.stats.is_empty()
    }

    pub fn apply(&self, team: &Team) -> Team {
        let mut next = team.clone();
        if let Some(logo) = &self.logo {
            next.logo = logo.clone();
        }
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        for (column, value) in &self.stats {
            *next.stat_mut(*column) = *value;
        }
        next
    }
}

// ---------------------------------------------------------------------------
// Scoped replacement
// ---------------------------------------------------------------------------

impl LeagueData {
    /// Replace one top-level field. Groups are shared untouched.
    pub fn with_field(&self, update: LeagueUpdate) -> LeagueData {
        let mut next = self.clone();
        match update {
            LeagueUpdate::Title(v) => next.title = v,
            LeagueUpdate::SubTitle(v) => next.sub_title = v,
            LeagueUpdate::MatchDay(v) => next.match_day = v,
            LeagueUpdate::Date(v) => next.date = v,
            LeagueUpdate::FooterText(v) => next.footer_text = v,
            LeagueUpdate::FooterLogo(v) => next.footer_logo = v,
            LeagueUpdate::FooterLogo2(v) => next.footer_logo_2 = v,
        }
        next
    }

    /// Merge `patch` into the group at `group_index`.
    pub fn with_group(
        &self,
        group_index: usize,
        patch: &GroupPatch,
    ) -> Result<LeagueData, LeagueError> {
        let group = self.group_arc(group_index)?;
        Ok(self.replace_group(group_index, patch.apply(group)))
    }

    /// Merge `patch` into the team at `(group_index, team_index)`.
    pub fn with_team(
        &self,
        group_index: usize,
        team_index: usize,
        patch: &TeamPatch,
    ) -> Result<LeagueData, LeagueError> {
        let group = self.group_arc(group_index)?;
        let team = group
            .teams
            .get(team_index)
            .ok_or(LeagueError::TeamOutOfRange {
                group: group_index,
                index: team_index,
                len: group.teams.len(),
            })?;

        let mut teams = group.teams.clone();
        teams[team_index] = Arc::new(patch.apply(team));
        let next_group = Group {
            id: group.id,
            name: group.name.clone(),
            teams,
        };
        Ok(self.replace_group(group_index, next_group))
    }

    fn group_arc(&self, index: usize) -> Result<&Arc<Group>, LeagueError> {
        self.groups.get(index).ok_or(LeagueError::GroupOutOfRange {
            index,
            len: self.groups.len(),
        })
    }

    fn replace_group(&self, index: usize, group: Group) -> LeagueData {
        let mut next = self.clone();
        next.groups[index] = Arc::new(group);
        next
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
