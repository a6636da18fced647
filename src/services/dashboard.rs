use crate::config::AppConfig;
use crate::models::{
    Division, DivisionRow, LeagueTeam, MatchupRecord, MatchupSide, PlayoffTable, StandingRecord, TeamProfile,
    WeekMatchup,
};
use crate::services::espn_fetcher::{EspnFetcher, LeagueData};
use crate::services::league_parser::{
    all_matchups, all_standings, all_teams, current_week_across, roster, team_results,
};
use crate::services::seeding::{sort_teams, SeedingEngine};
use crate::utils::format_record;

/// One fetch of every configured league plus everything derived from it.
pub struct Dashboard {
    pub leagues: Vec<LeagueData>,
    pub standings: Vec<StandingRecord>,
    pub matchups: Option<Vec<MatchupRecord>>,
    /// `None` when no league returned standings.
    pub table: Option<PlayoffTable>,
    pub current_week: u32,
}

impl Dashboard {
    pub async fn load(config: &AppConfig, fetcher: &EspnFetcher) -> Self {
        let leagues = fetcher.fetch_all(&config.leagues).await;
        Self::from_leagues(config, leagues)
    }

    pub fn from_leagues(config: &AppConfig, leagues: Vec<LeagueData>) -> Self {
        let standings = all_standings(&leagues);
        let matchups = all_matchups(&leagues);
        let table = SeedingEngine::with_rules(config.seeding).seed(&standings, matchups.as_deref());
        let current_week = current_week_across(&leagues);

        match &table {
            Some(t) => tracing::info!(
                "Seeded {} teams from {} leagues (week {})",
                t.entries.len(),
                leagues.iter().filter(|l| l.data.is_some()).count(),
                current_week
            ),
            None => tracing::warn!("No standings available from any league"),
        }

        Self {
            leagues,
            standings,
            matchups,
            table,
            current_week,
        }
    }

    fn seed_of(&self, team_name: &str, league: &str) -> Option<usize> {
        self.table.as_ref().and_then(|t| t.seed_of(team_name, league))
    }

    /// Per-league standings, leagues in configured order.
    pub fn divisions(&self, config: &AppConfig) -> Vec<Division> {
        let mut sorted = self.standings.clone();
        sort_teams(&mut sorted);

        self.leagues
            .iter()
            .filter(|l| l.data.is_some())
            .map(|l| {
                let teams = sorted
                    .iter()
                    .filter(|s| s.league == l.league.name)
                    .enumerate()
                    .map(|(i, s)| DivisionRow {
                        rank: i + 1,
                        team_name: s.team_name.clone(),
                        owner: config.owner_of(&s.team_name),
                        record: format_record(s.wins, s.losses),
                        points_for: s.points_for,
                        points_against: s.points_against,
                        transactions: s.transactions,
                    })
                    .collect();
                Division {
                    league: l.league.name.clone(),
                    teams,
                }
            })
            .collect()
    }

    /// Every league's games for `week`, each side with its record and overall seed.
    pub fn week_matchups(&self, config: &AppConfig, week: u32) -> Vec<WeekMatchup> {
        let side = |league: &str, team: &str, score: f64, other: f64| MatchupSide {
            team_name: team.to_string(),
            owner: config.owner_of(team),
            score,
            record: self
                .standings
                .iter()
                .find(|s| s.league == league && s.team_name == team)
                .map(|s| format_record(s.wins, s.losses)),
            seed: self.seed_of(team, league),
            winning: score > other,
        };

        self.matchups
            .iter()
            .flatten()
            .filter(|m| m.week == week)
            .map(|m| WeekMatchup {
                league: m.league.clone(),
                week,
                home: side(&m.league, &m.home_team, m.home_score, m.away_score),
                away: side(&m.league, &m.away_team, m.away_score, m.home_score),
            })
            .collect()
    }

    pub fn teams(&self) -> Vec<LeagueTeam> {
        all_teams(&self.leagues)
    }

    /// Look a team up by league name (case-insensitive) and ESPN team id.
    pub fn find_team(&self, league: &str, team_id: u32) -> Option<LeagueTeam> {
        self.teams()
            .into_iter()
            .find(|t| t.league_name.eq_ignore_ascii_case(league) && t.team_id == team_id)
    }

    pub fn team_profile(&self, config: &AppConfig, team: &LeagueTeam) -> TeamProfile {
        let data = self
            .leagues
            .iter()
            .find(|l| l.league.id == team.league_id)
            .and_then(|l| l.data.as_ref());

        TeamProfile {
            team: team.clone(),
            owner: config.owner_of(&team.team_name),
            seed: self.seed_of(&team.team_name, &team.league_name),
            roster: data.map(|d| roster(d, team.team_id)).unwrap_or_default(),
            results: data.map(|d| team_results(d, team.team_id)).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;
    use crate::services::SeedingRules;
    use std::collections::HashMap;

    const DOINKS_JSON: &str = r#"{
        "scoringPeriodId": 2,
        "teams": [
            {"id": 1, "name": "Ray Finkle", "transactionCounter": {"acquisitions": 4},
             "record": {"overall": {"wins": 1, "losses": 0, "pointsFor": 120.0, "pointsAgainst": 95.5}},
             "roster": {"entries": [
                {"lineupSlotId": 17, "playerPoolEntry": {"player": {"fullName": "Kicker Kim", "proTeamId": 12}}},
                {"lineupSlotId": 0, "playerPoolEntry": {"player": {"fullName": "QB Quinn", "proTeamId": 2}}}
             ]}},
            {"id": 2, "name": "SMAUX",
             "record": {"overall": {"wins": 0, "losses": 1, "pointsFor": 95.5, "pointsAgainst": 120.0}}}
        ],
        "schedule": [
            {"matchupPeriodId": 1, "home": {"teamId": 1, "totalPoints": 120.0}, "away": {"teamId": 2, "totalPoints": 95.5}},
            {"matchupPeriodId": 2, "home": {"teamId": 2, "totalPoints": 0.0, "totalPointsLive": 60.0},
                                   "away": {"teamId": 1, "totalPoints": 0.0, "totalPointsLive": 40.0}}
        ]
    }"#;

    const SHANKS_JSON: &str = r#"{
        "scoringPeriodId": 2,
        "teams": [
            {"id": 7, "name": "Booters",
             "record": {"overall": {"wins": 1, "losses": 0, "pointsFor": 131.0, "pointsAgainst": 88.0}}},
            {"id": 8, "name": "Turf Toe",
             "record": {"overall": {"wins": 0, "losses": 1, "pointsFor": 88.0, "pointsAgainst": 131.0}}}
        ],
        "schedule": [
            {"matchupPeriodId": 1, "home": {"teamId": 8, "totalPoints": 88.0}, "away": {"teamId": 7, "totalPoints": 131.0}}
        ]
    }"#;

    fn config() -> AppConfig {
        AppConfig {
            leagues: vec![],
            season: 2025,
            api_base: String::new(),
            espn_s2: None,
            espn_swid: None,
            matchups_file: "unused.json".into(),
            owners: HashMap::from([("SMAUX".to_string(), "Dana".to_string())]),
            seeding: SeedingRules::default(),
        }
    }

    fn league(name: &str, id: &str, json: Option<&str>) -> LeagueData {
        LeagueData {
            league: LeagueConfig {
                name: name.to_string(),
                id: id.to_string(),
            },
            data: json.map(|j| serde_json::from_str(j).unwrap()),
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::from_leagues(
            &config(),
            vec![
                league("Doinks", "10", Some(DOINKS_JSON)),
                league("Shanks", "20", Some(SHANKS_JSON)),
                league("Clunks", "30", None),
            ],
        )
    }

    #[test]
    fn test_seeds_across_loaded_leagues() {
        let dash = dashboard();
        assert_eq!(dash.current_week, 2);
        let table = dash.table.as_ref().unwrap();
        let order: Vec<&str> = table.entries.iter().map(|e| e.team_name.as_str()).collect();
        // Booters' 131.0 is the season high, worth half a win.
        assert_eq!(order, vec!["Booters", "Ray Finkle", "SMAUX", "Turf Toe"]);
        assert_eq!(table.entries[0].wins, 1.5);
    }

    #[test]
    fn test_no_leagues_means_no_table() {
        let dash = Dashboard::from_leagues(&config(), vec![league("Clunks", "30", None)]);
        assert!(dash.table.is_none());
        assert!(dash.divisions(&config()).is_empty());
    }

    #[test]
    fn test_divisions() {
        let divisions = dashboard().divisions(&config());
        let names: Vec<&str> = divisions.iter().map(|d| d.league.as_str()).collect();
        assert_eq!(names, vec!["Doinks", "Shanks"]);

        let doinks = &divisions[0].teams;
        assert_eq!(doinks[0].team_name, "Ray Finkle");
        assert_eq!(doinks[0].record, "1-0");
        assert_eq!(doinks[0].transactions, 4);
        assert_eq!(doinks[1].rank, 2);
        assert_eq!(doinks[1].owner.as_deref(), Some("Dana"));
    }

    #[test]
    fn test_week_matchups() {
        let dash = dashboard();
        let games = dash.week_matchups(&config(), 2);
        assert_eq!(games.len(), 1);
        let game = &games[0];
        assert_eq!(game.home.team_name, "SMAUX");
        assert_eq!(game.home.score, 60.0);
        assert!(game.home.winning);
        assert!(!game.away.winning);
        assert_eq!(game.home.record.as_deref(), Some("0-1"));
        assert_eq!(game.away.seed, Some(2));

        assert_eq!(dash.week_matchups(&config(), 1).len(), 2);
        assert!(dash.week_matchups(&config(), 9).is_empty());
    }

    #[test]
    fn test_team_profile() {
        let dash = dashboard();
        let team = dash.find_team("doinks", 1).unwrap();
        let profile = dash.team_profile(&config(), &team);
        assert_eq!(profile.seed, Some(2));
        assert_eq!(profile.roster.len(), 2);
        assert_eq!(profile.roster[0].name, "QB Quinn");
        assert_eq!(profile.results.len(), 2);

        assert!(dash.find_team("Doinks", 7).is_none());
    }
}
