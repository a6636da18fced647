use std::cmp::Ordering;

use crate::models::{BonusAward, LeagueQualifiers, MatchupRecord, PlayoffEntry, PlayoffTable, StandingRecord};

/// Half a win for the single best weekly score of the season.
pub const BONUS_WIN: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedingRules {
    /// Teams each league is guaranteed before the field is filled globally.
    pub min_per_league: usize,
    /// Cap applied while filling the remaining spots; `None` means uncapped.
    pub max_per_league: Option<usize>,
    pub playoff_spots: usize,
}

impl Default for SeedingRules {
    fn default() -> Self {
        Self {
            min_per_league: 1,
            max_per_league: None,
            playoff_spots: 8,
        }
    }
}

#[derive(Default)]
pub struct SeedingEngine {
    rules: SeedingRules,
}

impl SeedingEngine {
    pub fn with_rules(rules: SeedingRules) -> Self {
        Self { rules }
    }

    /// Rank every team across all leagues and summarize who made the field.
    ///
    /// Returns `None` when there are no standings at all, which callers must
    /// treat as "data unavailable" rather than as an empty league.
    pub fn seed(&self, standings: &[StandingRecord], matchups: Option<&[MatchupRecord]>) -> Option<PlayoffTable> {
        if standings.is_empty() {
            return None;
        }

        let leagues = leagues_in_order(standings);
        let mut teams = standings.to_vec();

        let bonus = matchups.and_then(find_bonus_award);
        if let Some(award) = &bonus {
            apply_bonus(&mut teams, award);
        }

        sort_teams(&mut teams);

        let qualifiers = self.select_qualifiers(&teams, &leagues);
        let entries = self.rank_entries(&teams);

        tracing::debug!(
            "Seeded {} teams across {} leagues (bonus: {:?})",
            entries.len(),
            qualifiers.len(),
            bonus.as_ref().map(|b| b.team_name.as_str())
        );

        Some(PlayoffTable {
            entries,
            qualifiers,
            bonus,
        })
    }

    /// Pick the playoff field from teams already in global order.
    ///
    /// `leagues` fixes the order of the summary. Only the per-league counts
    /// are kept; the ranked table is never cut.
    fn select_qualifiers(&self, sorted: &[StandingRecord], leagues: &[&str]) -> Vec<LeagueQualifiers> {
        let mut counts = vec![0usize; leagues.len()];
        let mut selected: Vec<usize> = Vec::new();

        let league_slot = |team: &StandingRecord| leagues.iter().position(|l| *l == team.league);

        // League winners are the first team of each league in global order.
        let winners: Vec<usize> = leagues
            .iter()
            .filter_map(|league| sorted.iter().position(|t| &t.league == league))
            .collect();
        for (idx, team) in sorted.iter().enumerate() {
            if winners.contains(&idx) {
                selected.push(idx);
                if let Some(slot) = league_slot(team) {
                    counts[slot] += 1;
                }
            }
        }

        for (slot, league) in leagues.iter().enumerate() {
            for (idx, team) in sorted.iter().enumerate() {
                if counts[slot] >= self.rules.min_per_league {
                    break;
                }
                if &team.league != league || selected.contains(&idx) {
                    continue;
                }
                selected.push(idx);
                counts[slot] += 1;
            }
        }

        for (idx, team) in sorted.iter().enumerate() {
            if selected.len() >= self.rules.playoff_spots {
                break;
            }
            if selected.contains(&idx) {
                continue;
            }
            let Some(slot) = league_slot(team) else { continue };
            if let Some(cap) = self.rules.max_per_league {
                if counts[slot] >= cap {
                    continue;
                }
            }
            selected.push(idx);
            counts[slot] += 1;
        }

        leagues
            .iter()
            .enumerate()
            .map(|(slot, league)| {
                let teams: Vec<String> = selected
                    .iter()
                    .map(|&idx| &sorted[idx])
                    .filter(|t| &t.league == league)
                    .map(|t| t.team_name.clone())
                    .collect();
                LeagueQualifiers {
                    league: league.to_string(),
                    league_winner: sorted[winners[slot]].team_name.clone(),
                    count: teams.len(),
                    teams,
                }
            })
            .collect()
    }

    fn rank_entries(&self, sorted: &[StandingRecord]) -> Vec<PlayoffEntry> {
        // Fewer teams than spots: measure against the last team instead.
        let cutoff = self.rules.playoff_spots.min(sorted.len()).max(1) - 1;
        let cutoff_wins = sorted[cutoff].wins;

        sorted
            .iter()
            .enumerate()
            .map(|(idx, team)| PlayoffEntry {
                rank: idx + 1,
                team_name: team.team_name.clone(),
                league: team.league.clone(),
                wins: team.wins,
                games_back: cutoff_wins - team.wins,
                points_for: team.points_for,
                points_against: team.points_against,
                streak: team.streak.clone(),
            })
            .collect()
    }
}

/// Rank all teams under `rules`; `None` when standings are empty.
pub fn compute_seeding(
    standings: &[StandingRecord],
    matchups: Option<&[MatchupRecord]>,
    rules: SeedingRules,
) -> Option<Vec<PlayoffEntry>> {
    SeedingEngine::with_rules(rules)
        .seed(standings, matchups)
        .map(|table| table.entries)
}

/// Highest strictly positive score across every side of every matchup.
///
/// Zero means the game has not been played. Ties keep the first occurrence.
pub fn find_bonus_award(matchups: &[MatchupRecord]) -> Option<BonusAward> {
    let mut best: Option<BonusAward> = None;

    for m in matchups {
        let sides = [(&m.home_team, m.home_score), (&m.away_team, m.away_score)];
        for (team, score) in sides {
            if score <= 0.0 {
                continue;
            }
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(BonusAward {
                    team_name: team.clone(),
                    league: m.league.clone(),
                    week: m.week,
                    score,
                });
            }
        }
    }

    best
}

fn apply_bonus(teams: &mut [StandingRecord], award: &BonusAward) {
    let mut applied = false;
    for team in teams
        .iter_mut()
        .filter(|t| t.team_name == award.team_name && t.league == award.league)
    {
        team.wins += BONUS_WIN;
        applied = true;
    }

    if applied {
        tracing::debug!(
            "Bonus win to {} ({}) for {:.1} in week {}",
            award.team_name,
            award.league,
            award.score,
            award.week
        );
    } else {
        tracing::warn!(
            "Top score {:.1} belongs to {} ({}) which has no standings row",
            award.score,
            award.team_name,
            award.league
        );
    }
}

/// Stable sort by wins then points for, both descending.
pub fn sort_teams(teams: &mut [StandingRecord]) {
    teams.sort_by(compare_teams);
}

fn compare_teams(a: &StandingRecord, b: &StandingRecord) -> Ordering {
    b.wins
        .total_cmp(&a.wins)
        .then_with(|| b.points_for.total_cmp(&a.points_for))
}

fn leagues_in_order(teams: &[StandingRecord]) -> Vec<&str> {
    let mut leagues: Vec<&str> = Vec::new();
    for team in teams {
        if !leagues.contains(&team.league.as_str()) {
            leagues.push(&team.league);
        }
    }
    leagues
}
