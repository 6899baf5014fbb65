// League data model, derived statistics and scoped updates.

pub mod model;
pub mod stat;
pub mod update;

pub use model::{format_goal_difference, Group, LeagueData, StatColumn, Team, HEADER_LABELS};
pub use stat::Stat;
pub use update::{GroupPatch, LeagueError, LeagueUpdate, TeamPatch};

/// The sheet every session starts from.
pub fn seed() -> LeagueData {
    let group_a = Group::new(
        1,
        "GROUP A",
        vec![
            Team::new(101, "Zuchhip FC"),
            Team::new(102, "Kzl Electric FC"),
            Team::new(103, "KIC Khawzawl FC"),
            Team::new(104, "Vanchengpui GSA"),
            Team::new(105, "Team Five"),
        ],
    );
    let group_b = Group::new(
        2,
        "GROUP B",
        vec![
            Team::new(201, "The PoleStar FC"),
            Team::new(202, "Chalrang GSA"),
            Team::new(203, "Kzl Vengthar GSA FC"),
            Team::new(204, "FC Darngawn"),
            Team::new(205, "Team Ten"),
        ],
    );

    LeagueData {
        title: "KZDFA".to_string(),
        sub_title: "1st DIVISION LEAGUE 2025".to_string(),
        match_day: Stat::new(1),
        date: "16-Aug-2025".to_string(),
        groups: vec![std::sync::Arc::new(group_a), std::sync::Arc::new(group_b)],
        footer_text: "Technical and Registration Committee".to_string(),
        footer_logo: None,
        footer_logo_2: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_shape() {
        let league = seed();
        assert_eq!(league.groups.len(), 2);
        assert_eq!(league.groups[0].name, "GROUP A");
        assert_eq!(league.groups[0].teams.len(), 5);
        assert_eq!(league.groups[0].teams[0].name, "Zuchhip FC");
        assert_eq!(league.groups[1].name, "GROUP B");
        assert_eq!(league.groups[1].teams.len(), 5);
        assert_eq!(league.groups[1].teams[0].name, "The PoleStar FC");
        assert_eq!(league.match_day, Stat::new(1));
        assert!(league.footer_logo.is_none() && league.footer_logo_2.is_none());
    }

    #[test]
    fn seed_derived_columns_are_zero() {
        let league = seed();
        assert_eq!(league.teams().count(), 10);
        for (_, team) in league.teams() {
            assert_eq!(team.points(), Stat::ZERO, "{}", team.name);
            assert_eq!(team.goal_difference(), Stat::ZERO, "{}", team.name);
            assert_eq!(format_goal_difference(team.goal_difference()), "0");
            assert!(team.logo.is_none());
        }
    }

    #[test]
    fn seed_team_ids_are_unique() {
        let league = seed();
        let mut ids: Vec<_> = league.teams().map(|(_, t)| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }
}
