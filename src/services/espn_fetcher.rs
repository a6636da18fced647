use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::{AppConfig, LeagueConfig};

const LEAGUE_VIEWS: &[&str] = &[
    "mLiveScoring",
    "mMatchupScore",
    "mRoster",
    "mSettings",
    "mStandings",
    "mStatus",
    "mTeam",
    "modular",
    "mNav",
    "mDraftDetail",
];

// ── ESPN league document ─────────────────────────────────────────────────────

fn unknown() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnLeague {
    pub scoring_period_id: Option<u32>,
    #[serde(default)]
    pub teams: Vec<EspnTeam>,
    #[serde(default)]
    pub schedule: Vec<EspnScheduleItem>,
    #[serde(default)]
    pub draft_detail: Option<EspnDraftDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EspnDraftDetail {
    #[serde(default)]
    pub teams: Vec<EspnTeam>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnTeam {
    #[serde(default)]
    pub id: u32,
    #[serde(default = "unknown")]
    pub name: String,
    #[serde(default)]
    pub record: EspnRecord,
    #[serde(default)]
    pub transaction_counter: EspnTransactionCounter,
    #[serde(default)]
    pub roster: EspnRoster,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EspnRecord {
    #[serde(default)]
    pub overall: EspnOverallRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnOverallRecord {
    #[serde(default)]
    pub wins: f64,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub points_for: f64,
    #[serde(default)]
    pub points_against: f64,
    #[serde(default)]
    pub streak_type: Option<String>,
    #[serde(default)]
    pub streak_length: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EspnTransactionCounter {
    #[serde(default)]
    pub acquisitions: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EspnRoster {
    #[serde(default)]
    pub entries: Vec<EspnRosterEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnRosterEntry {
    #[serde(default)]
    pub lineup_slot_id: u32,
    #[serde(default)]
    pub player_pool_entry: EspnPlayerPoolEntry,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EspnPlayerPoolEntry {
    #[serde(default)]
    pub player: EspnPlayer,
    #[serde(default)]
    pub ratings: HashMap<String, EspnRating>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnPlayer {
    #[serde(default = "unknown")]
    pub full_name: String,
    pub pro_team_id: Option<u32>,
}

impl Default for EspnPlayer {
    fn default() -> Self {
        Self {
            full_name: unknown(),
            pro_team_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnRating {
    pub positional_ranking: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnScheduleItem {
    pub matchup_period_id: Option<u32>,
    #[serde(default)]
    pub home: Option<EspnMatchupSide>,
    #[serde(default)]
    pub away: Option<EspnMatchupSide>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnMatchupSide {
    pub team_id: Option<u32>,
    #[serde(default)]
    pub total_points: f64,
    #[serde(default)]
    pub total_points_live: Option<f64>,
}

/// One configured league and its document, `None` when the fetch failed.
#[derive(Debug, Clone)]
pub struct LeagueData {
    pub league: LeagueConfig,
    pub data: Option<EspnLeague>,
}

// ── EspnFetcher ──────────────────────────────────────────────────────────────

pub struct EspnFetcher {
    client: Client,
    api_base: String,
    season: u16,
}

impl EspnFetcher {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let (Some(s2), Some(swid)) = (&config.espn_s2, &config.espn_swid) {
            let cookie = HeaderValue::from_str(&format!("espn_s2={}; SWID={}", s2, swid))
                .map_err(|e| anyhow!("Invalid ESPN cookie values: {}", e))?;
            headers.insert(COOKIE, cookie);
            tracing::debug!("Using ESPN cookies for private leagues");
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            season: config.season,
        })
    }

    pub fn league_url(&self, league_id: &str) -> String {
        let views: Vec<String> = LEAGUE_VIEWS.iter().map(|v| format!("view={}", v)).collect();
        format!(
            "{}/seasons/{}/segments/0/leagues/{}?{}",
            self.api_base,
            self.season,
            league_id,
            views.join("&")
        )
    }

    pub async fn fetch_league(&self, league_id: &str) -> Result<EspnLeague> {
        let url = self.league_url(league_id);
        tracing::info!("Fetching ESPN league {}…", league_id);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("ESPN league {} API error {}: {}", league_id, status, body));
        }

        let data: EspnLeague = response.json().await?;
        tracing::info!(
            "League {}: {} teams, {} scheduled games",
            league_id,
            data.teams.len(),
            data.schedule.len()
        );
        Ok(data)
    }

    /// Fetch every configured league. A failed league is logged and kept as `None`.
    pub async fn fetch_all(&self, leagues: &[LeagueConfig]) -> Vec<LeagueData> {
        let mut all = Vec::with_capacity(leagues.len());

        for league in leagues {
            let data = match self.fetch_league(&league.id).await {
                Ok(data) => Some(data),
                Err(e) => {
                    tracing::error!("Error fetching data for league {} ({}): {}", league.name, league.id, e);
                    None
                }
            };
            all.push(LeagueData {
                league: league.clone(),
                data,
            });
        }

        all
    }
}
