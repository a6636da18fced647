//! Pure transforms from ESPN league documents into the dashboard's records.

use std::collections::HashMap;

use crate::models::{GameResult, LeagueTeam, MatchupRecord, Position, RosterPlayer, StandingRecord, TeamResult};
use crate::services::espn_fetcher::{EspnLeague, EspnMatchupSide, EspnScheduleItem, EspnTeam, LeagueData};
use crate::utils::{format_streak, round1};

/// NFL abbreviation for an ESPN pro-team id.
pub fn nfl_abbreviation(pro_team_id: u32) -> Option<&'static str> {
    let abbr = match pro_team_id {
        1 => "ATL",
        2 => "BUF",
        3 => "CHI",
        4 => "CIN",
        5 => "CLE",
        6 => "DAL",
        7 => "DEN",
        8 => "DET",
        9 => "GB",
        10 => "TEN",
        11 => "IND",
        12 => "KC",
        13 => "LV",
        14 => "LAR",
        15 => "MIA",
        16 => "MIN",
        17 => "NE",
        18 => "NO",
        19 => "NYG",
        20 => "NYJ",
        21 => "PHI",
        22 => "ARI",
        23 => "PIT",
        24 => "LAC",
        25 => "SF",
        26 => "SEA",
        27 => "TB",
        28 => "WSH",
        29 => "CAR",
        30 => "JAX",
        33 => "BAL",
        34 => "HOU",
        _ => return None,
    };
    Some(abbr)
}

pub fn current_week(league: &EspnLeague) -> u32 {
    league.scoring_period_id.unwrap_or(1)
}

/// Current scoring period of the first league that reports one.
pub fn current_week_across(leagues: &[LeagueData]) -> u32 {
    leagues
        .iter()
        .filter_map(|l| l.data.as_ref())
        .find_map(|d| d.scoring_period_id)
        .unwrap_or(1)
}

fn team_names(league: &EspnLeague) -> HashMap<u32, String> {
    league.teams.iter().map(|t| (t.id, t.name.clone())).collect()
}

/// Live points for the week being played, final points otherwise.
fn side_score(side: &EspnMatchupSide, week: u32, current_week: u32) -> f64 {
    let points = if week == current_week {
        side.total_points_live.unwrap_or(0.0)
    } else {
        side.total_points
    };
    round1(points)
}

pub fn standings(league_name: &str, league: &EspnLeague) -> Vec<StandingRecord> {
    league
        .teams
        .iter()
        .map(|team| {
            let overall = &team.record.overall;
            StandingRecord {
                league: league_name.to_string(),
                team_id: team.id,
                team_name: team.name.clone(),
                wins: overall.wins,
                losses: overall.losses,
                points_for: round1(overall.points_for),
                points_against: round1(overall.points_against),
                transactions: team.transaction_counter.acquisitions,
                streak: format_streak(overall.streak_type.as_deref(), overall.streak_length),
            }
        })
        .collect()
}

/// The away side of a scheduled game; `None` on a bye, including an empty away object.
fn away_side(item: &EspnScheduleItem) -> Option<&EspnMatchupSide> {
    item.away.as_ref().filter(|side| side.team_id.is_some())
}

/// Every scheduled game with an opponent; bye weeks are skipped.
pub fn matchups(league_name: &str, league: &EspnLeague) -> Vec<MatchupRecord> {
    let names = team_names(league);
    let current = current_week(league);
    let name_of = |id: Option<u32>| {
        id.and_then(|id| names.get(&id).cloned())
            .unwrap_or_else(|| "Unknown".to_string())
    };

    league
        .schedule
        .iter()
        .filter_map(|item| {
            let away = away_side(item)?;
            let home = item.home.clone().unwrap_or_default();
            let week = item.matchup_period_id.unwrap_or(0);
            Some(MatchupRecord {
                league: league_name.to_string(),
                week,
                home_team: name_of(home.team_id),
                home_score: side_score(&home, week, current),
                away_team: name_of(away.team_id),
                away_score: side_score(away, week, current),
            })
        })
        .collect()
}

/// Standings from every league that loaded, in configured league order.
pub fn all_standings(leagues: &[LeagueData]) -> Vec<StandingRecord> {
    leagues
        .iter()
        .filter_map(|l| l.data.as_ref().map(|d| standings(&l.league.name, d)))
        .flatten()
        .collect()
}

/// `None` when no league produced a single matchup.
pub fn all_matchups(leagues: &[LeagueData]) -> Option<Vec<MatchupRecord>> {
    let all: Vec<MatchupRecord> = leagues
        .iter()
        .filter_map(|l| l.data.as_ref().map(|d| matchups(&l.league.name, d)))
        .flatten()
        .collect();
    if all.is_empty() {
        None
    } else {
        Some(all)
    }
}

/// All teams across leagues, grouped by league name with the most wins first.
pub fn all_teams(leagues: &[LeagueData]) -> Vec<LeagueTeam> {
    let mut teams: Vec<LeagueTeam> = leagues
        .iter()
        .filter_map(|l| l.data.as_ref().map(|d| (l, d)))
        .flat_map(|(l, d)| {
            d.teams.iter().map(move |t| LeagueTeam {
                league_name: l.league.name.clone(),
                league_id: l.league.id.clone(),
                team_id: t.id,
                team_name: t.name.clone(),
                wins: t.record.overall.wins,
                losses: t.record.overall.losses,
            })
        })
        .collect();

    teams.sort_by(|a, b| {
        a.league_name
            .cmp(&b.league_name)
            .then_with(|| b.wins.total_cmp(&a.wins))
    });
    teams
}

fn find_team(teams: &[EspnTeam], team_id: u32) -> Option<&EspnTeam> {
    teams.iter().find(|t| t.id == team_id)
}

/// Roster ordered QB, K, P, then any other slot.
///
/// Draft-detail teams are used when the league reports them.
pub fn roster(league: &EspnLeague, team_id: u32) -> Vec<RosterPlayer> {
    let draft_teams = league
        .draft_detail
        .as_ref()
        .map(|d| d.teams.as_slice())
        .filter(|teams| !teams.is_empty());
    let teams = draft_teams.unwrap_or(league.teams.as_slice());

    let Some(team) = find_team(teams, team_id) else {
        return Vec::new();
    };

    let mut players: Vec<RosterPlayer> = team
        .roster
        .entries
        .iter()
        .map(|entry| {
            let pool = &entry.player_pool_entry;
            let nfl_team = pool
                .player
                .pro_team_id
                .and_then(nfl_abbreviation)
                .unwrap_or("N/A");
            RosterPlayer {
                name: pool.player.full_name.clone(),
                position: Position::from_lineup_slot(entry.lineup_slot_id),
                nfl_team: nfl_team.to_string(),
                positional_rank: pool
                    .ratings
                    .get("0")
                    .and_then(|r| r.positional_ranking)
                    .filter(|rank| *rank > 0),
            }
        })
        .collect();

    players.sort_by_key(|p| p.position.sort_order());
    players
}

fn involves(item: &EspnScheduleItem, team_id: u32) -> bool {
    let is = |side: &Option<EspnMatchupSide>| side.as_ref().and_then(|s| s.team_id) == Some(team_id);
    is(&item.home) || is(&item.away)
}

/// A team's season, week by week. Future weeks carry no scores.
pub fn team_results(league: &EspnLeague, team_id: u32) -> Vec<TeamResult> {
    let names = team_names(league);
    let current = current_week(league);

    let mut results: Vec<TeamResult> = league
        .schedule
        .iter()
        .filter(|item| involves(item, team_id))
        .filter_map(|item| {
            let away = away_side(item)?;
            let home = item.home.clone().unwrap_or_default();
            let week = item.matchup_period_id.unwrap_or(0);
            let is_home = home.team_id == Some(team_id);
            let (ours, theirs) = if is_home { (&home, away) } else { (away, &home) };

            let opponent = theirs
                .team_id
                .and_then(|id| names.get(&id).cloned())
                .unwrap_or_else(|| "Unknown".to_string());

            if week > current {
                return Some(TeamResult {
                    week,
                    opponent,
                    is_home,
                    result: GameResult::Upcoming,
                    team_score: None,
                    opponent_score: None,
                    is_current: false,
                });
            }

            let team_score = side_score(ours, week, current);
            let opponent_score = side_score(theirs, week, current);
            let result = if team_score > opponent_score {
                GameResult::Win
            } else if team_score < opponent_score {
                GameResult::Loss
            } else {
                GameResult::Tie
            };

            Some(TeamResult {
                week,
                opponent,
                is_home,
                result,
                team_score: Some(team_score),
                opponent_score: Some(opponent_score),
                is_current: week == current,
            })
        })
        .collect();

    results.sort_by_key(|r| r.week);
    results
}

/// A team's score in a given week, `None` when it has no game that week.
pub fn team_score_for_week(league: &EspnLeague, team_id: u32, week: u32) -> Option<f64> {
    let current = current_week(league);
    league
        .schedule
        .iter()
        .filter(|item| item.matchup_period_id == Some(week))
        .find_map(|item| {
            [&item.home, &item.away]
                .into_iter()
                .flatten()
                .find(|side| side.team_id == Some(team_id))
                .map(|side| side_score(side, week, current))
        })
}
