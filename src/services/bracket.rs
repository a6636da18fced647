use crate::config::AppConfig;
use crate::models::{BracketMatchupView, BracketSide, BracketTeam, LeagueTeam, PlayoffMatchup, PlayoffTable};
use crate::services::espn_fetcher::LeagueData;
use crate::services::league_parser::team_score_for_week;
use crate::utils::best_name_match;

/// Find a team by (fuzzy) name, optionally restricted to one league.
pub fn resolve_team<'a>(teams: &'a [LeagueTeam], league: Option<&str>, name: &str) -> Option<&'a LeagueTeam> {
    let pool: Vec<&LeagueTeam> = teams
        .iter()
        .filter(|t| league.map_or(true, |l| t.league_name.eq_ignore_ascii_case(l)))
        .collect();
    let matched = best_name_match(name, pool.iter().map(|t| t.team_name.as_str()))?;
    pool.iter().find(|t| t.team_name == matched).copied()
}

fn week_score(leagues: &[LeagueData], team: &BracketTeam, week: u32) -> Option<f64> {
    leagues
        .iter()
        .find(|l| l.league.id == team.league_id)
        .and_then(|l| l.data.as_ref())
        .and_then(|data| team_score_for_week(data, team.team_id, week))
}

/// Seeds, scores and the current leader for every bracket matchup in `week`.
pub fn bracket_week_view(
    config: &AppConfig,
    matchups: &[PlayoffMatchup],
    week: u32,
    table: Option<&PlayoffTable>,
    leagues: &[LeagueData],
) -> Vec<BracketMatchupView> {
    let side = |team: &BracketTeam| BracketSide {
        team: team.clone(),
        owner: config.owner_of(&team.team_name),
        seed: table.and_then(|t| t.seed_of(&team.team_name, &team.league_name)),
        score: week_score(leagues, team, week),
        winning: false,
    };

    matchups
        .iter()
        .map(|m| {
            let mut team1 = side(&m.team1);
            let mut team2 = side(&m.team2);
            if let (Some(s1), Some(s2)) = (team1.score, team2.score) {
                team1.winning = s1 > s2;
                team2.winning = s2 > s1;
            }
            BracketMatchupView {
                id: m.id,
                week,
                team1,
                team2,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;
    use crate::models::PlayoffEntry;
    use crate::services::espn_fetcher::EspnLeague;
    use crate::services::SeedingRules;
    use chrono::Utc;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn league_team(league: &str, league_id: &str, id: u32, name: &str) -> LeagueTeam {
        LeagueTeam {
            league_name: league.to_string(),
            league_id: league_id.to_string(),
            team_id: id,
            team_name: name.to_string(),
            wins: 5.0,
            losses: 3,
        }
    }

    fn config() -> AppConfig {
        AppConfig {
            leagues: vec![],
            season: 2025,
            api_base: String::new(),
            espn_s2: None,
            espn_swid: None,
            matchups_file: "unused.json".into(),
            owners: HashMap::from([("Booters".to_string(), "Anthony".to_string())]),
            seeding: SeedingRules::default(),
        }
    }

    fn entry(rank: usize, league: &str, name: &str) -> PlayoffEntry {
        PlayoffEntry {
            rank,
            team_name: name.to_string(),
            league: league.to_string(),
            wins: 5.0,
            games_back: 0.0,
            points_for: 0.0,
            points_against: 0.0,
            streak: "-".to_string(),
        }
    }

    #[test]
    fn test_resolve_team() {
        let teams = vec![
            league_team("Doinks", "1", 1, "SMAUX"),
            league_team("Shanks", "2", 4, "SMAUX"),
            league_team("Shanks", "2", 5, "Coffin Corner"),
        ];
        assert_eq!(resolve_team(&teams, Some("shanks"), "smaux").unwrap().team_id, 4);
        assert_eq!(resolve_team(&teams, None, "smaux").unwrap().team_id, 1);
        assert_eq!(resolve_team(&teams, None, "Coffin Corne").unwrap().team_id, 5);
        assert!(resolve_team(&teams, Some("Clunks"), "SMAUX").is_none());
    }

    #[test]
    fn test_week_view_scores_and_seeds() {
        let doinks: EspnLeague = serde_json::from_str(
            r#"{"scoringPeriodId": 16, "teams": [{"id": 1, "name": "SMAUX"}], "schedule": [
                {"matchupPeriodId": 15, "home": {"teamId": 1, "totalPoints": 112.34}, "away": {"teamId": 2, "totalPoints": 80.0}}
            ]}"#,
        )
        .unwrap();
        let shanks: EspnLeague = serde_json::from_str(
            r#"{"scoringPeriodId": 16, "teams": [{"id": 7, "name": "Booters"}], "schedule": [
                {"matchupPeriodId": 15, "home": {"teamId": 8, "totalPoints": 99.0}, "away": {"teamId": 7, "totalPoints": 101.5}}
            ]}"#,
        )
        .unwrap();
        let leagues = vec![
            LeagueData {
                league: LeagueConfig { name: "Doinks".to_string(), id: "1".to_string() },
                data: Some(doinks),
            },
            LeagueData {
                league: LeagueConfig { name: "Shanks".to_string(), id: "2".to_string() },
                data: Some(shanks),
            },
        ];
        let table = PlayoffTable {
            entries: vec![entry(1, "Shanks", "Booters"), entry(2, "Doinks", "SMAUX")],
            qualifiers: vec![],
            bonus: None,
        };
        let matchup = PlayoffMatchup {
            id: Uuid::new_v4(),
            team1: league_team("Doinks", "1", 1, "SMAUX").into(),
            team2: league_team("Shanks", "2", 7, "Booters").into(),
            created_at: Utc::now(),
        };

        let views = bracket_week_view(&config(), &[matchup.clone()], 15, Some(&table), &leagues);
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.id, matchup.id);
        assert_eq!(view.team1.score, Some(112.3));
        assert_eq!(view.team1.seed, Some(2));
        assert!(view.team1.winning);
        assert_eq!(view.team2.score, Some(101.5));
        assert_eq!(view.team2.owner.as_deref(), Some("Anthony"));
        assert!(!view.team2.winning);

        // No game that week: no scores, nobody leads.
        let views = bracket_week_view(&config(), &[matchup], 17, None, &leagues);
        assert_eq!(views[0].team1.score, None);
        assert_eq!(views[0].team1.seed, None);
        assert!(!views[0].team1.winning && !views[0].team2.winning);
    }
}
