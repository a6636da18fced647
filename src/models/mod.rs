use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRecord {
    pub league: String,
    pub team_id: u32,
    pub team_name: String,
    pub wins: f64, // half-win steps once the weekly bonus is applied
    pub losses: u32,
    pub points_for: f64,
    pub points_against: f64,
    pub transactions: u32,
    pub streak: String, // "W3", "L1" or "-"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupRecord {
    pub league: String,
    pub week: u32,
    pub home_team: String,
    pub home_score: f64,
    pub away_team: String,
    pub away_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffEntry {
    pub rank: usize,
    pub team_name: String,
    pub league: String,
    pub wins: f64,
    pub games_back: f64,
    pub points_for: f64,
    pub points_against: f64,
    pub streak: String,
}

/// How many teams a league placed in the playoff field, plus who got in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueQualifiers {
    pub league: String,
    pub league_winner: String,
    pub teams: Vec<String>,
    pub count: usize,
}

/// The single best weekly score of the season and who earned the half win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusAward {
    pub team_name: String,
    pub league: String,
    pub week: u32,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffTable {
    pub entries: Vec<PlayoffEntry>,
    pub qualifiers: Vec<LeagueQualifiers>,
    pub bonus: Option<BonusAward>,
}

impl PlayoffTable {
    pub fn seed_of(&self, team_name: &str, league: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.team_name == team_name && e.league == league)
            .map(|e| e.rank)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionRow {
    pub rank: usize,
    pub team_name: String,
    pub owner: Option<String>,
    pub record: String, // "7-3"
    pub points_for: f64,
    pub points_against: f64,
    pub transactions: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    pub league: String,
    pub teams: Vec<DivisionRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyHighScore {
    pub week: u32,
    pub team_name: String,
    pub league: String,
    pub score: f64,
    pub opponent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreSummary {
    pub highest: WeeklyHighScore,
    pub average_weekly_high: f64,
    pub most_highs_league: String,
    pub most_highs_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreReport {
    pub weeks: Vec<WeeklyHighScore>, // most recent week first
    pub summary: Option<HighScoreSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupSide {
    pub team_name: String,
    pub owner: Option<String>,
    pub score: f64,
    pub record: Option<String>,
    pub seed: Option<usize>,
    pub winning: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekMatchup {
    pub league: String,
    pub week: u32,
    pub home: MatchupSide,
    pub away: MatchupSide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueTeam {
    pub league_name: String,
    pub league_id: String,
    pub team_id: u32,
    pub team_name: String,
    pub wins: f64,
    pub losses: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    QB,
    K,
    P,
    Slot(u32),
}

impl Position {
    pub fn from_lineup_slot(slot: u32) -> Self {
        match slot {
            0 => Position::QB,
            17 => Position::K,
            18 => Position::P,
            other => Position::Slot(other),
        }
    }

    pub fn sort_order(&self) -> u32 {
        match self {
            Position::QB => 1,
            Position::K => 2,
            Position::P => 3,
            Position::Slot(_) => 99,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Position::QB => "QB".to_string(),
            Position::K => "K".to_string(),
            Position::P => "P".to_string(),
            Position::Slot(n) => format!("SLOT-{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub name: String,
    pub position: Position,
    pub nfl_team: String, // "N/A" when the pro team is unknown
    pub positional_rank: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Win,
    Loss,
    Tie,
    Upcoming,
}

impl GameResult {
    pub fn symbol(&self) -> &'static str {
        match self {
            GameResult::Win => "W",
            GameResult::Loss => "L",
            GameResult::Tie => "T",
            GameResult::Upcoming => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResult {
    pub week: u32,
    pub opponent: String,
    pub is_home: bool,
    pub result: GameResult,
    pub team_score: Option<f64>,
    pub opponent_score: Option<f64>,
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamProfile {
    pub team: LeagueTeam,
    pub owner: Option<String>,
    pub seed: Option<usize>,
    pub roster: Vec<RosterPlayer>,
    pub results: Vec<TeamResult>,
}

/// A team as captured at the moment a bracket matchup was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTeam {
    pub league_name: String,
    pub league_id: String,
    pub team_id: u32,
    pub team_name: String,
    pub wins: f64,
    pub losses: u32,
}

impl BracketTeam {
    pub fn is_same_team(&self, other: &BracketTeam) -> bool {
        self.team_name == other.team_name && self.league_name == other.league_name
    }
}

impl From<LeagueTeam> for BracketTeam {
    fn from(team: LeagueTeam) -> Self {
        Self {
            league_name: team.league_name,
            league_id: team.league_id,
            team_id: team.team_id,
            team_name: team.team_name,
            wins: team.wins,
            losses: team.losses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffMatchup {
    pub id: Uuid,
    pub team1: BracketTeam,
    pub team2: BracketTeam,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketSide {
    pub team: BracketTeam,
    pub owner: Option<String>,
    pub seed: Option<usize>,
    pub score: Option<f64>,
    pub winning: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketMatchupView {
    pub id: Uuid,
    pub week: u32,
    pub team1: BracketSide,
    pub team2: BracketSide,
}

// API Response types
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}
