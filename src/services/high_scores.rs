use std::collections::BTreeMap;

use crate::models::{HighScoreReport, HighScoreSummary, MatchupRecord, WeeklyHighScore};

/// Top individual score of each week across every league, most recent week first.
///
/// A week counts once any side has scored; the first of equal scores wins.
pub fn weekly_high_scores(matchups: &[MatchupRecord]) -> Vec<WeeklyHighScore> {
    let mut by_week: BTreeMap<u32, Vec<&MatchupRecord>> = BTreeMap::new();
    for m in matchups {
        by_week.entry(m.week).or_default().push(m);
    }

    let mut highs: Vec<WeeklyHighScore> = by_week
        .into_iter()
        .filter_map(|(week, games)| {
            let mut best: Option<WeeklyHighScore> = None;
            for m in games.iter().filter(|m| m.home_score > 0.0 || m.away_score > 0.0) {
                let sides = [
                    (&m.home_team, m.home_score, &m.away_team),
                    (&m.away_team, m.away_score, &m.home_team),
                ];
                for (team, score, opponent) in sides {
                    if best.as_ref().map_or(true, |b| score > b.score) {
                        best = Some(WeeklyHighScore {
                            week,
                            team_name: team.clone(),
                            league: m.league.clone(),
                            score,
                            opponent: opponent.clone(),
                        });
                    }
                }
            }
            best
        })
        .collect();

    highs.reverse();
    highs
}

/// Season summary over the weekly highs; `None` before any week has been played.
pub fn summarize(highs: &[WeeklyHighScore]) -> Option<HighScoreSummary> {
    let mut highest = highs.first()?;
    for high in highs {
        if high.score > highest.score {
            highest = high;
        }
    }

    let average_weekly_high = highs.iter().map(|h| h.score).sum::<f64>() / highs.len() as f64;

    // Count per league, keeping first-seen order so ties resolve predictably.
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for high in highs {
        match counts.iter_mut().find(|(league, _)| *league == high.league) {
            Some((_, count)) => *count += 1,
            None => counts.push((high.league.as_str(), 1)),
        }
    }
    let (most_highs_league, most_highs_count) = counts
        .iter()
        .fold(None, |best: Option<(&str, usize)>, &(league, count)| match best {
            Some((_, c)) if c >= count => best,
            _ => Some((league, count)),
        })?;

    Some(HighScoreSummary {
        highest: highest.clone(),
        average_weekly_high,
        most_highs_league: most_highs_league.to_string(),
        most_highs_count,
    })
}

pub fn high_score_report(matchups: Option<&[MatchupRecord]>) -> HighScoreReport {
    let weeks = matchups.map(weekly_high_scores).unwrap_or_default();
    let summary = summarize(&weeks);
    HighScoreReport { weeks, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(league: &str, week: u32, home: (&str, f64), away: (&str, f64)) -> MatchupRecord {
        MatchupRecord {
            league: league.to_string(),
            week,
            home_team: home.0.to_string(),
            home_score: home.1,
            away_team: away.0.to_string(),
            away_score: away.1,
        }
    }

    fn season() -> Vec<MatchupRecord> {
        vec![
            game("Doinks", 1, ("Ray Finkle", 120.0), ("SMAUX", 95.5)),
            game("Shanks", 1, ("Booters", 88.0), ("Turf Toe", 131.0)),
            game("Doinks", 2, ("SMAUX", 140.0), ("Ray Finkle", 101.0)),
            game("Clunks", 2, ("Team C", 140.0), ("Graham Guano", 60.0)),
            game("Doinks", 3, ("Ray Finkle", 0.0), ("SMAUX", 0.0)),
            game("Shanks", 4, ("Booters", 0.0), ("Turf Toe", 0.0)),
        ]
    }

    #[test]
    fn test_one_high_per_played_week() {
        let highs = weekly_high_scores(&season());
        let weeks: Vec<u32> = highs.iter().map(|h| h.week).collect();
        assert_eq!(weeks, vec![2, 1]);

        assert_eq!(highs[1].team_name, "Turf Toe");
        assert_eq!(highs[1].opponent, "Booters");
        assert_eq!(highs[1].league, "Shanks");
        // Week 2 tie at 140.0 goes to the first game listed.
        assert_eq!(highs[0].team_name, "SMAUX");
        assert_eq!(highs[0].league, "Doinks");
    }

    #[test]
    fn test_summary() {
        let highs = weekly_high_scores(&season());
        let summary = summarize(&highs).unwrap();
        assert_eq!(summary.highest.team_name, "SMAUX");
        assert_eq!(summary.highest.score, 140.0);
        assert_eq!(summary.average_weekly_high, 135.5);
        // One high each; the first league seen (most recent week) is reported.
        assert_eq!(summary.most_highs_league, "Doinks");
        assert_eq!(summary.most_highs_count, 1);
    }

    #[test]
    fn test_empty_report() {
        let report = high_score_report(None);
        assert!(report.weeks.is_empty());
        assert!(report.summary.is_none());

        let unplayed = vec![game("Doinks", 1, ("A", 0.0), ("B", 0.0))];
        assert!(high_score_report(Some(&unplayed)).summary.is_none());
    }
}
