use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use crate::services::SeedingRules;

const DEFAULT_LEAGUES: &str = "Doinks=1629152724,Shanks=464845016,Clunks=112677575";
const DEFAULT_API_BASE: &str = "https://lm-api-reads.fantasy.espn.com/apis/v3/games/ffl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueConfig {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub leagues: Vec<LeagueConfig>,
    pub season: u16,
    pub api_base: String,
    pub espn_s2: Option<String>,
    pub espn_swid: Option<String>,
    pub matchups_file: PathBuf,
    pub owners: HashMap<String, String>,
    pub seeding: SeedingRules,
}

impl AppConfig {
    /// Build the configuration from the process environment (`.env` already loaded).
    pub fn from_env() -> Result<Self> {
        let leagues = parse_leagues(&env::var("LEAGUES").unwrap_or_else(|_| DEFAULT_LEAGUES.to_string()))?;

        let season = env_parse("ESPN_SEASON")?.unwrap_or(2025);
        let api_base = env::var("ESPN_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let matchups_file = env::var("PLAYOFF_MATCHUPS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("playoff_matchups.json"));

        let owners = match env::var("TEAM_OWNERS_FILE") {
            Ok(path) => load_owners(&path)?,
            Err(_) => HashMap::new(),
        };

        let defaults = SeedingRules::default();
        let seeding = SeedingRules {
            min_per_league: env_parse("SEEDING_MIN_PER_LEAGUE")?.unwrap_or(defaults.min_per_league),
            max_per_league: env_parse("SEEDING_MAX_PER_LEAGUE")?.or(defaults.max_per_league),
            playoff_spots: env_parse("PLAYOFF_SPOTS")?.unwrap_or(defaults.playoff_spots),
        };
        if seeding.playoff_spots == 0 {
            return Err(anyhow!("PLAYOFF_SPOTS must be at least 1"));
        }

        Ok(Self {
            leagues,
            season,
            api_base,
            espn_s2: env::var("ESPN_S2").ok().filter(|v| !v.is_empty()),
            espn_swid: env::var("ESPN_SWID").ok().filter(|v| !v.is_empty()),
            matchups_file,
            owners,
            seeding,
        })
    }

    pub fn owner_of(&self, team_name: &str) -> Option<String> {
        self.owners.get(team_name).cloned()
    }
}

/// Parse `Name=id,Name=id` into an ordered league list.
pub fn parse_leagues(raw: &str) -> Result<Vec<LeagueConfig>> {
    let mut leagues = Vec::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, id) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid league entry '{}', expected Name=id", pair))?;
        let (name, id) = (name.trim(), id.trim());
        if name.is_empty() || id.is_empty() {
            return Err(anyhow!("Invalid league entry '{}', expected Name=id", pair));
        }
        if leagues.iter().any(|l: &LeagueConfig| l.name == name) {
            return Err(anyhow!("League '{}' listed twice", name));
        }
        leagues.push(LeagueConfig {
            name: name.to_string(),
            id: id.to_string(),
        });
    }

    if leagues.is_empty() {
        return Err(anyhow!("LEAGUES must name at least one league"));
    }
    Ok(leagues)
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid value for {}: '{}'", key, raw)),
        _ => Ok(None),
    }
}

fn load_owners(path: &str) -> Result<HashMap<String, String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read team owners file {}", path))?;
    let owners: HashMap<String, String> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse team owners file {}", path))?;
    tracing::info!("Loaded {} team owners from {}", owners.len(), path);
    Ok(owners)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leagues_keeps_order() {
        let leagues = parse_leagues("Doinks=1, Shanks=2 ,Clunks=3").unwrap();
        let names: Vec<_> = leagues.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Doinks", "Shanks", "Clunks"]);
        assert_eq!(leagues[1].id, "2");
    }

    #[test]
    fn test_parse_leagues_rejects_bad_entries() {
        assert!(parse_leagues("Doinks").is_err());
        assert!(parse_leagues("=12").is_err());
        assert!(parse_leagues("").is_err());
        assert!(parse_leagues("A=1,A=2").is_err());
    }

    #[test]
    fn test_default_leagues_parse() {
        let leagues = parse_leagues(DEFAULT_LEAGUES).unwrap();
        assert_eq!(leagues.len(), 3);
        assert_eq!(leagues[0].id, "1629152724");
    }
}
