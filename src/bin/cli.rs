//! clubmatch CLI - admin tool for club matching
//!
//! Usage:
//!   clubmatch-cli --data-dir <dir> seed --count 20
//!   clubmatch-cli --data-dir <dir> match [--target-size 5] [--seed 42]
//!   clubmatch-cli --data-dir <dir> match --rerun-last
//!   clubmatch-cli --data-dir <dir> clubs [--run <run_id>]
//!   clubmatch-cli --data-dir <dir> runs
//!
//! Works directly on the JSON collections in the data directory and prints
//! verbose output of each matching run, so groupings and their rationale
//! can be inspected without a UI.

use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clubmatch::synthetic::SyntheticRoster;
use clubmatch::{
    classify_personality, ClubEngine, ExplanationMode, MatchConfig, Result, DEFAULT_TARGET_SIZE,
};

#[derive(Parser)]
#[command(name = "clubmatch-cli")]
#[command(about = "Admin tool for employee club matching", long_about = None)]
struct Cli {
    /// Directory holding the JSON collections
    #[arg(short, long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add synthetic sample profiles
    Seed {
        /// Number of profiles to add
        #[arg(short, long, default_value = "15")]
        count: usize,

        /// RNG seed (defaults to the current time)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Run a new matching round over all profiles
    Match {
        /// Members per club
        #[arg(short, long, default_value_t = DEFAULT_TARGET_SIZE)]
        target_size: usize,

        /// Fixed RNG seed (defaults to one derived from the run id)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Rationale verbosity: simple or detailed
        #[arg(short, long, default_value = "detailed")]
        mode: ExplanationMode,

        /// Reuse the club size of the most recent run
        #[arg(long, conflicts_with = "target_size")]
        rerun_last: bool,
    },

    /// List clubs, optionally from a single run
    Clubs {
        /// Only clubs formed by this run
        #[arg(short, long)]
        run: Option<String>,
    },

    /// List recorded matching runs
    Runs,

    /// Mark a run as superseded by a newer one
    Supersede { run_id: String },

    /// Activate a club and attach its chat link
    Activate {
        club_id: String,

        #[arg(long)]
        chat_link: Option<String>,
    },

    /// Classify a personality from five survey answers (1-5)
    Classify {
        #[arg(num_args = 5, required = true)]
        answers: Vec<u8>,
    },

    /// Submit an activity report for a club
    Report {
        club_id: String,

        /// Activity date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// What the club did
        #[arg(long)]
        text: String,

        #[arg(long, default_value = "")]
        photo: String,

        #[arg(long)]
        participants: Option<u32>,
    },

    /// Verify a report and award points
    Verify {
        report_id: String,

        /// Base points before scoring bonuses
        #[arg(short, long, default_value = "10")]
        points: u32,
    },

    /// Show system analytics and the points table
    Analytics,

    /// Delete clubs, reports and runs; reset profiles to the demo profile
    Reset,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERR] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut engine = ClubEngine::open(&cli.data_dir)?;

    match cli.command {
        Commands::Seed { count, seed } => run_seed(&engine, count, seed),
        Commands::Match {
            target_size,
            seed,
            mode,
            rerun_last,
        } => {
            *engine.config_mut() = MatchConfig {
                target_size,
                seed,
                explanation_mode: mode,
                ..MatchConfig::default()
            };
            run_match(&engine, rerun_last, cli.verbose)
        }
        Commands::Clubs { run } => run_clubs(&engine, run.as_deref(), cli.verbose),
        Commands::Runs => run_runs(&engine),
        Commands::Supersede { run_id } => {
            let run = engine.supersede_run(&run_id)?;
            println!("Superseded: {} ({} clubs)", run.id, run.club_count);
            Ok(())
        }
        Commands::Activate { club_id, chat_link } => {
            let club = engine.clubs.activate(&club_id, chat_link.as_deref())?;
            println!("Activated: {} ({})", club.name, club.id);
            Ok(())
        }
        Commands::Classify { answers } => {
            let personality = classify_personality(&answers)?;
            println!("Personality: {}", personality);
            Ok(())
        }
        Commands::Report {
            club_id,
            date,
            text,
            photo,
            participants,
        } => {
            engine.clubs.get(&club_id)?;
            let report = engine
                .reports
                .submit(&club_id, &date, &photo, &text, participants)?;
            println!("Submitted report {}", report.id);
            println!("  {}", report.formatted_report);
            Ok(())
        }
        Commands::Verify { report_id, points } => {
            let awarded = engine.verify_report(&report_id, points)?;
            println!("Verified {}: {} points", report_id, awarded);
            Ok(())
        }
        Commands::Analytics => run_analytics(&engine),
        Commands::Reset => {
            engine.reset()?;
            println!("Data reset in {}", engine.data_dir().display());
            Ok(())
        }
    }
}

/// Add synthetic profiles
fn run_seed(engine: &ClubEngine, count: usize, seed: Option<u64>) -> Result<()> {
    let existing = engine.profiles.load()?;
    let names: HashSet<String> = existing.iter().map(|p| p.name.clone()).collect();
    let seed = seed.unwrap_or_else(|| chrono::Utc::now().timestamp_millis() as u64);

    let roster = SyntheticRoster {
        count,
        seed,
        start_index: existing.len(),
    };
    let added = engine.profiles.add_many(roster.generate(&names))?;

    println!(
        "Added {} profiles (seed {}), {} total",
        added,
        seed,
        existing.len() + added
    );
    Ok(())
}

/// Run one matching round
fn run_match(engine: &ClubEngine, rerun_last: bool, verbose: bool) -> Result<()> {
    let config = engine.config();
    println!("\n{}", "=".repeat(60));
    println!("CLUB MATCHING");
    println!("{}", "=".repeat(60));
    if rerun_last {
        println!("  Target size: (from last run)");
    } else {
        println!("  Target size: {}", config.target_size);
    }
    println!("  Mode: {:?}", config.explanation_mode);
    if let Some(seed) = config.seed {
        println!("  Seed: {}", seed);
    }

    let summary = if rerun_last {
        engine.rerun_last()?
    } else {
        engine.run_matching()?
    };

    println!("\n{}", "-".repeat(60));
    println!(
        "RESULTS: Run {} formed {} clubs",
        summary.run_id, summary.club_count
    );
    println!("{}", "-".repeat(60));
    println!("  Placed: {}", summary.placed);
    println!("  Unassigned: {}", summary.unassigned.len());

    let clubs = engine.clubs.clubs_for_run(&summary.run_id)?;
    let profiles = engine.profiles.load()?;
    for club in &clubs {
        print_club(club, &profiles, verbose);
    }

    if verbose && !summary.unassigned.is_empty() {
        println!("\n  Unassigned profiles:");
        for id in &summary.unassigned {
            println!("    - {}", id);
        }
    }
    Ok(())
}

/// List stored clubs
fn run_clubs(engine: &ClubEngine, run_id: Option<&str>, verbose: bool) -> Result<()> {
    let clubs = match run_id {
        Some(id) => {
            engine.runs.get(id)?;
            engine.clubs.clubs_for_run(id)?
        }
        None => engine.clubs.load()?,
    };
    let profiles = engine.profiles.load()?;
    println!("{} clubs", clubs.len());
    for club in &clubs {
        print_club(club, &profiles, verbose);
    }
    Ok(())
}

/// List recorded runs, oldest first
fn run_runs(engine: &ClubEngine) -> Result<()> {
    let mut runs = engine.runs.load()?;
    runs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    println!("{} runs", runs.len());
    for (i, run) in runs.iter().enumerate() {
        println!(
            "  #{} {} | {} | size {} | users {} | clubs {}{}",
            i + 1,
            run.id,
            run.created_at,
            run.target_size,
            run.user_count,
            run.club_count,
            if run.superseded { " | superseded" } else { "" }
        );
    }
    Ok(())
}

fn print_club(club: &clubmatch::Club, profiles: &[clubmatch::Profile], verbose: bool) {
    println!(
        "\n  {} [{}] ({:?}{})",
        club.name,
        club.id,
        club.status,
        if club.guaranteed { ", guaranteed" } else { "" }
    );
    println!("    Leader: {}", club.leader_id);
    println!("    Members:");
    for id in &club.member_ids {
        let profile = profiles.iter().find(|p| p.id == *id);
        println!(
            "      - {} ({})",
            id,
            profile.map(|p| p.display_name()).unwrap_or("unknown")
        );
    }

    if verbose {
        if let Some(metrics) = &club.match_score_breakdown {
            println!(
                "    Common interests: {}",
                metrics.common_interests.join(", ")
            );
            println!(
                "    Rank diversity: {} (score {:.2})",
                metrics.rank_diversity, metrics.rank_diversity_score
            );
            println!(
                "    Shannon: interests {:.3}, traits {:.3}",
                metrics.interest_shannon, metrics.trait_shannon
            );
        }
        if let Some(sections) = club.explanations.get(&club.leader_id) {
            for (section, text) in sections {
                println!("    [{}] {}", section, text);
            }
        }
    }
}

/// Print analytics and the points table
fn run_analytics(engine: &ClubEngine) -> Result<()> {
    let analytics = engine.analytics()?;
    println!("\n{}", "=".repeat(60));
    println!("ANALYTICS");
    println!("{}", "=".repeat(60));
    println!("  Users: {}", analytics.total_users);
    println!(
        "  Clubs: {} ({} active)",
        analytics.total_clubs, analytics.active_clubs
    );
    println!("  Match runs: {}", analytics.total_match_runs);
    println!(
        "  Reports: {} pending, {} verified",
        analytics.pending_reports, analytics.verified_reports
    );
    println!("  Points awarded: {}", analytics.total_points_awarded);
    println!("  Avg rank diversity: {:.2}", analytics.avg_rank_diversity);
    println!(
        "  Avg interest variety: {:.2}",
        analytics.avg_interest_variety
    );

    let top = engine.top_clubs(5)?;
    if !top.is_empty() {
        println!("\n  Top clubs:");
        for (i, standing) in top.iter().enumerate() {
            println!("    {}. {} - {} pts", i + 1, standing.label, standing.points);
        }
    }
    Ok(())
}
