use anyhow::{anyhow, Context, Result};
use std::path::Path;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::{GameResult, LeagueTeam, PlayoffEntry};
use crate::services::{bracket_week_view, compute_seeding, high_score_report, resolve_team, Dashboard, EspnFetcher};
use crate::store::PlayoffMatchupStore;
use crate::utils::{display_name, format_record, ordinal, seed_band, SeedBand, BUBBLE_CUTOFF};

async fn load_dashboard(config: &AppConfig) -> Result<Dashboard> {
    let fetcher = EspnFetcher::new(config)?;
    println!("📥 Fetching {} leagues for {}...", config.leagues.len(), config.season);
    Ok(Dashboard::load(config, &fetcher).await)
}

fn data_unavailable() {
    println!("❌ League data unavailable. Check the league ids and your ESPN cookies.");
}

fn owned_name(config: &AppConfig, team_name: &str) -> String {
    display_name(team_name, config.owner_of(team_name).as_deref())
}

fn games_back(gb: f64) -> String {
    if gb == 0.0 {
        "-".to_string()
    } else {
        format!("{:.1}", gb)
    }
}

pub async fn show_standings(config: &AppConfig) -> Result<()> {
    let dash = load_dashboard(config).await?;
    if dash.standings.is_empty() {
        data_unavailable();
        return Ok(());
    }

    for division in dash.divisions(config) {
        println!("\n🏆 {}:", division.league);
        for row in division.teams {
            println!(
                "   {:>2}. {:<32} {:>6}  PF {:>7.1}  PA {:>7.1}  Moves {}",
                row.rank,
                display_name(&row.team_name, row.owner.as_deref()),
                row.record,
                row.points_for,
                row.points_against,
                row.transactions
            );
        }
    }

    Ok(())
}

pub async fn show_playoffs(config: &AppConfig, all: bool) -> Result<()> {
    let dash = load_dashboard(config).await?;
    let table = match dash.table {
        Some(table) => table,
        None => {
            data_unavailable();
            return Ok(());
        }
    };

    let spots = config.seeding.playoff_spots;
    println!("\n🏈 Playoff Picture ({} spots):\n", spots);

    let shown = if all { table.entries.len() } else { BUBBLE_CUTOFF };
    for entry in table.entries.iter().take(shown) {
        let marker = match seed_band(entry.rank, spots) {
            SeedBand::Qualified => "🟢",
            SeedBand::Bubble => "🟡",
            SeedBand::Out => "⚪",
        };
        println!(
            "{} {:>4}  {:<32} {:<8} W {:>4.1}  GB {:>4}  PF {:>7.1}  PA {:>7.1}  {}",
            marker,
            ordinal(entry.rank),
            owned_name(config, &entry.team_name),
            entry.league,
            entry.wins,
            games_back(entry.games_back),
            entry.points_for,
            entry.points_against,
            entry.streak
        );
        if entry.rank == spots {
            println!("   {}", "─".repeat(60));
        }
    }

    println!("\n📋 Qualifiers by league:");
    for league in &table.qualifiers {
        println!(
            "   • {}: {} team(s), league winner {}",
            league.league, league.count, league.league_winner
        );
        println!("     {}", league.teams.join(", "));
    }

    if let Some(bonus) = &table.bonus {
        println!(
            "\n⭐ Season high: {} ({}) scored {:.1} in week {} and earns a bonus half win",
            owned_name(config, &bonus.team_name),
            bonus.league,
            bonus.score,
            bonus.week
        );
    }

    Ok(())
}

pub async fn show_high_scores(config: &AppConfig) -> Result<()> {
    let dash = load_dashboard(config).await?;
    let report = high_score_report(dash.matchups.as_deref());

    let summary = match report.summary {
        Some(summary) => summary,
        None => {
            println!("📭 No weeks have been played yet.");
            return Ok(());
        }
    };

    println!("\n🔥 Weekly High Scores:\n");
    for high in &report.weeks {
        println!(
            "   Week {:>2}: {:<32} {:<8} {:>6.1} vs {}",
            high.week,
            owned_name(config, &high.team_name),
            high.league,
            high.score,
            high.opponent
        );
    }

    println!("\n📊 Season:");
    println!(
        "   Highest: {} ({}) {:.1} in week {}",
        owned_name(config, &summary.highest.team_name),
        summary.highest.league,
        summary.highest.score,
        summary.highest.week
    );
    println!("   Average weekly high: {:.1}", summary.average_weekly_high);
    println!(
        "   Most weekly highs: {} ({})",
        summary.most_highs_league, summary.most_highs_count
    );

    Ok(())
}

pub async fn show_matchups(config: &AppConfig, week: Option<u32>) -> Result<()> {
    let dash = load_dashboard(config).await?;
    let week = week.unwrap_or(dash.current_week);
    let games = dash.week_matchups(config, week);

    if games.is_empty() {
        println!("📭 No matchups found for week {}", week);
        return Ok(());
    }

    println!("\n📅 Week {} Matchups:", week);
    let mut league = "";
    for game in &games {
        if game.league != league {
            league = &game.league;
            println!("\n🏆 {}:", league);
        }
        let side = |s: &crate::models::MatchupSide| {
            let seed = s.seed.map(|r| format!(" #{}", r)).unwrap_or_default();
            let record = s.record.as_deref().unwrap_or("0-0");
            let lead = if s.winning { " ✅" } else { "" };
            format!(
                "{} ({}){} {:.1}{}",
                display_name(&s.team_name, s.owner.as_deref()),
                record,
                seed,
                s.score,
                lead
            )
        };
        println!("   {} vs {}", side(&game.home), side(&game.away));
    }

    Ok(())
}

pub async fn show_teams(config: &AppConfig) -> Result<()> {
    let dash = load_dashboard(config).await?;
    let teams = dash.teams();
    if teams.is_empty() {
        data_unavailable();
        return Ok(());
    }

    let mut league = "";
    for team in &teams {
        if team.league_name != league {
            league = &team.league_name;
            println!("\n🏆 {} (league {}):", league, team.league_id);
        }
        println!(
            "   • [{}] {} {}",
            team.team_id,
            owned_name(config, &team.team_name),
            format_record(team.wins, team.losses)
        );
    }

    println!("\n💡 Use 'leaguedash team --name <team_name>' to see a roster");
    Ok(())
}

pub async fn query_team(config: &AppConfig, team_name: &str) -> Result<()> {
    let dash = load_dashboard(config).await?;
    let teams = dash.teams();

    println!("🔍 Searching for team: {}", team_name);

    let team = match resolve_team(&teams, None, team_name) {
        Some(team) => team,
        None => {
            println!("❌ No teams found matching '{}'", team_name);
            println!("\n💡 Available teams:");
            for team in teams.iter().take(10) {
                println!("   • {} ({})", team.team_name, team.league_name);
            }
            return Ok(());
        }
    };

    let profile = dash.team_profile(config, team);

    println!("📊 Team Details:");
    println!("   Name: {}", display_name(&team.team_name, profile.owner.as_deref()));
    println!("   League: {} ({})", team.league_name, team.league_id);
    println!("   Record: {}", format_record(team.wins, team.losses));
    match profile.seed {
        Some(seed) => println!("   Seed: {}", ordinal(seed)),
        None => println!("   Seed: -"),
    }

    println!("\n🧢 Roster:");
    if profile.roster.is_empty() {
        println!("   No roster available");
    }
    for player in &profile.roster {
        let rank = player
            .positional_rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {:<8} {:<28} {:<4} rank {}",
            player.position.label(),
            player.name,
            player.nfl_team,
            rank
        );
    }

    println!("\n📅 Results:");
    for result in &profile.results {
        let venue = if result.is_home { "vs" } else { "at" };
        let score = match (result.team_score, result.opponent_score) {
            (Some(s), Some(o)) if result.result != GameResult::Upcoming => format!("({:.1}-{:.1})", s, o),
            _ => "(TBD)".to_string(),
        };
        let current = if result.is_current { " ⏱️" } else { "" };
        println!(
            "   Week {:>2} {} {} {} {}{}",
            result.week,
            venue,
            result.opponent,
            score,
            result.result.symbol(),
            current
        );
    }

    Ok(())
}

/// "League:Team" picks a team in one league; a bare name searches them all.
fn parse_team_arg<'a>(config: &AppConfig, arg: &'a str) -> (Option<&'a str>, &'a str) {
    match arg.split_once(':') {
        Some((league, name)) if config.leagues.iter().any(|l| l.name.eq_ignore_ascii_case(league.trim())) => {
            (Some(league.trim()), name.trim())
        }
        _ => (None, arg.trim()),
    }
}

fn pick_team<'a>(config: &AppConfig, teams: &'a [LeagueTeam], arg: &str) -> Result<&'a LeagueTeam> {
    let (league, name) = parse_team_arg(config, arg);
    resolve_team(teams, league, name).ok_or_else(|| anyhow!("No team found matching '{}'", arg))
}

pub async fn list_bracket(config: &AppConfig, week: Option<u32>) -> Result<()> {
    let store = PlayoffMatchupStore::load(&config.matchups_file).await?;

    let week = match week {
        Some(week) => week,
        None => {
            if store.is_empty() {
                println!("📭 No playoff matchups yet. Add one with: leaguedash bracket add");
                return Ok(());
            }
            println!("🗓️  Weeks with playoff matchups:");
            for week in store.weeks() {
                println!("   • Week {} ({} matchups)", week, store.matchups_for_week(week).len());
            }
            return Ok(());
        }
    };

    let matchups = store.matchups_for_week(week);
    if matchups.is_empty() {
        println!("📭 No playoff matchups for week {}", week);
        return Ok(());
    }

    let dash = load_dashboard(config).await?;
    println!("\n🏈 Week {} Playoff Matchups:\n", week);
    for view in bracket_week_view(config, matchups, week, dash.table.as_ref(), &dash.leagues) {
        let side = |s: &crate::models::BracketSide| {
            let seed = s.seed.map(|r| format!("#{} ", r)).unwrap_or_default();
            let score = s.score.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string());
            let lead = if s.winning { " ✅" } else { "" };
            format!(
                "{}{} ({}) {}{}",
                seed,
                display_name(&s.team.team_name, s.owner.as_deref()),
                s.team.league_name,
                score,
                lead
            )
        };
        println!("   {} vs {}", side(&view.team1), side(&view.team2));
        println!("     id: {}", view.id);
    }

    Ok(())
}

pub async fn add_matchup(config: &AppConfig, team1: &str, team2: &str, week: u32) -> Result<()> {
    let mut store = PlayoffMatchupStore::load(&config.matchups_file).await?;
    let dash = load_dashboard(config).await?;
    let teams = dash.teams();

    let first = pick_team(config, &teams, team1)?.clone();
    let second = pick_team(config, &teams, team2)?.clone();

    let created = store.add(week, first.into(), second.into())?.clone();
    store.save().await?;

    println!(
        "✅ Week {}: {} ({}) vs {} ({})",
        week,
        created.team1.team_name,
        created.team1.league_name,
        created.team2.team_name,
        created.team2.league_name
    );
    println!("   id: {} (saved to {})", created.id, store.path().display());
    Ok(())
}

pub async fn remove_matchup(config: &AppConfig, week: u32, id: &str) -> Result<()> {
    let id = Uuid::parse_str(id).with_context(|| format!("Invalid matchup id '{}'", id))?;
    let mut store = PlayoffMatchupStore::load(&config.matchups_file).await?;

    let removed = store.remove(week, id)?;
    store.save().await?;

    println!(
        "🗑️  Removed week {} matchup: {} vs {}",
        week, removed.team1.team_name, removed.team2.team_name
    );
    Ok(())
}

/// Write the playoff table as CSV, one row per team in seed order.
pub fn write_playoff_csv(entries: &[PlayoffEntry], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(())
}

pub async fn export_playoffs(config: &AppConfig, output: &Path) -> Result<()> {
    let dash = load_dashboard(config).await?;
    let entries = match compute_seeding(&dash.standings, dash.matchups.as_deref(), config.seeding) {
        Some(entries) => entries,
        None => {
            data_unavailable();
            return Ok(());
        }
    };

    write_playoff_csv(&entries, output)?;
    println!("✅ Exported {} teams to {}", entries.len(), output.display());
    Ok(())
}
