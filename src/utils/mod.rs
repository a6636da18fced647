use serde::{Deserialize, Serialize};

/// Last seed shown on the bubble before a team is out of the race.
pub const BUBBLE_CUTOFF: usize = 18;

/// Round to one decimal place, as ESPN scores are displayed
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format an ESPN streak (e.g. "WIN", 3) as "W3"; "-" when there is none
pub fn format_streak(streak_type: Option<&str>, length: u32) -> String {
    match streak_type.and_then(|t| t.chars().next()) {
        Some(first) if length > 0 => format!("{}{}", first.to_ascii_uppercase(), length),
        _ => "-".to_string(),
    }
}

/// English ordinal suffix for a seed: 1st, 2nd, 3rd, 4th ...
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedBand {
    Qualified,
    Bubble,
    Out,
}

/// Color band for a seed: in the field, on the bubble, or out
pub fn seed_band(rank: usize, playoff_spots: usize) -> SeedBand {
    if rank <= playoff_spots {
        SeedBand::Qualified
    } else if rank <= BUBBLE_CUTOFF {
        SeedBand::Bubble
    } else {
        SeedBand::Out
    }
}

/// "W-L" record; wins print without decimals unless a half win is involved
pub fn format_record(wins: f64, losses: u32) -> String {
    if wins.fract() == 0.0 {
        format!("{:.0}-{}", wins, losses)
    } else {
        format!("{:.1}-{}", wins, losses)
    }
}

/// Team name followed by the owner in parentheses when one is known
pub fn display_name(team_name: &str, owner: Option<&str>) -> String {
    match owner {
        Some(owner) if !owner.is_empty() => format!("{} ({})", team_name, owner),
        _ => team_name.to_string(),
    }
}

/// Minimum Jaro-Winkler similarity for a fuzzy team name match
pub const FUZZY_THRESHOLD: f64 = 0.85;

/// Pick the candidate closest to `query`, ignoring case and surrounding whitespace.
///
/// Exact (case-insensitive) matches win outright; otherwise the best
/// Jaro-Winkler score at or above [`FUZZY_THRESHOLD`] is returned.
pub fn best_name_match<'a, I>(query: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        let hay = candidate.trim().to_lowercase();
        if hay == needle {
            return Some(candidate);
        }
        let score = strsim::jaro_winkler(&needle, &hay);
        if score >= FUZZY_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best.map(|(name, _)| name)
}
