//! User-created playoff matchups, kept in memory and mirrored to a JSON file.

use chrono::Utc;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{BracketTeam, PlayoffMatchup};

/// Weeks a playoff matchup can be scheduled in.
pub const FIRST_WEEK: u32 = 1;
pub const LAST_WEEK: u32 = 18;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot create a matchup with the same team")]
    SameTeam,

    #[error("{0} vs {1} already exists for week {2}")]
    Duplicate(String, String, u32),

    #[error("Week {0} must be between 1 and 18")]
    InvalidWeek(u32),

    #[error("No matchup {0} in week {1}")]
    NotFound(Uuid, u32),
}

#[derive(Debug, Clone)]
pub struct PlayoffMatchupStore {
    path: PathBuf,
    weeks: BTreeMap<u32, Vec<PlayoffMatchup>>,
}

impl PlayoffMatchupStore {
    /// An empty store that will save to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            weeks: BTreeMap::new(),
        }
    }

    /// Read the store from `path`; a missing file yields an empty store.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::new(path);
        match tokio::fs::read_to_string(&store.path).await {
            Ok(raw) => store.weeks = serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            "Loaded {} playoff matchups from {}",
            store.len(),
            store.path.display()
        );
        Ok(store)
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(&self.weeks)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::debug!("Saved playoff matchups to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.weeks.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weeks that currently hold at least one matchup, ascending.
    pub fn weeks(&self) -> Vec<u32> {
        self.weeks
            .iter()
            .filter(|(_, matchups)| !matchups.is_empty())
            .map(|(week, _)| *week)
            .collect()
    }

    pub fn matchups_for_week(&self, week: u32) -> &[PlayoffMatchup] {
        self.weeks.get(&week).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Add a matchup. The same pairing may appear only once per week, in either order.
    pub fn add(&mut self, week: u32, team1: BracketTeam, team2: BracketTeam) -> Result<&PlayoffMatchup> {
        if !(FIRST_WEEK..=LAST_WEEK).contains(&week) {
            return Err(StoreError::InvalidWeek(week));
        }
        if team1.is_same_team(&team2) {
            return Err(StoreError::SameTeam);
        }

        let existing = self.weeks.entry(week).or_default();
        let duplicate = existing.iter().any(|m| {
            (m.team1.is_same_team(&team1) && m.team2.is_same_team(&team2))
                || (m.team1.is_same_team(&team2) && m.team2.is_same_team(&team1))
        });
        if duplicate {
            return Err(StoreError::Duplicate(team1.team_name, team2.team_name, week));
        }

        tracing::info!(
            "Created matchup for week {}: {} vs {}",
            week,
            team1.team_name,
            team2.team_name
        );
        existing.push(PlayoffMatchup {
            id: Uuid::new_v4(),
            team1,
            team2,
            created_at: Utc::now(),
        });
        Ok(&existing[existing.len() - 1])
    }

    pub fn remove(&mut self, week: u32, id: Uuid) -> Result<PlayoffMatchup> {
        let matchups = self
            .weeks
            .get_mut(&week)
            .ok_or(StoreError::NotFound(id, week))?;
        let idx = matchups
            .iter()
            .position(|m| m.id == id)
            .ok_or(StoreError::NotFound(id, week))?;
        let removed = matchups.remove(idx);
        if matchups.is_empty() {
            self.weeks.remove(&week);
        }
        Ok(removed)
    }
}
