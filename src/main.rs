//! socialgraph command-line interface.
//!
//! Mutations print the store outcome (`OK`, `NOT_EXISTS`, ...); queries print
//! JSON to stdout. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use socialgraph::analytics::Analytics;
use socialgraph::config::SocialGraphConfig;
use socialgraph::error::Result;
use socialgraph::graph::store::SocialStore;
use socialgraph::observability::init_logging;
use socialgraph::types::{StoreOutcome, Student, StudentId};

/// Parse and validate a separation threshold (at least 1).
fn parse_threshold(s: &str) -> std::result::Result<u32, String> {
    let n: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("threshold must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// Social-graph analytics for a student network
#[derive(Parser, Debug)]
#[command(name = "socialgraph", version)]
#[command(after_help = "\
Examples:
  socialgraph add-student 1 moshe cs      Register a student in faculty 'cs'
  socialgraph befriend 1 2                Record a friendship
  socialgraph join 1 chess                Join a group
  socialgraph update-faculty 1 math       Move student 1 to faculty 'math'
  socialgraph recommend 1                 People student 1 may know
  socialgraph remote-pairs --threshold 4  Pairs at least 4 hops apart")]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database path (overrides config and SOCIALGRAPH_DB)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a student and enrol them in their faculty group
    AddStudent {
        id: StudentId,
        name: String,
        faculty: String,
    },

    /// Delete a student with their friendships and memberships
    DeleteStudent { id: StudentId },

    /// Record a friendship between two students
    Befriend { a: StudentId, b: StudentId },

    /// Remove a friendship
    Unfriend { a: StudentId, b: StudentId },

    /// Add a student to a group
    Join { id: StudentId, group: String },

    /// Remove a student from a group
    Leave { id: StudentId, group: String },

    /// Move a student to another faculty, joining its group
    UpdateFaculty { id: StudentId, faculty: String },

    /// Friends-of-friends sharing a group with the student
    Recommend {
        id: StudentId,

        /// Print full profiles instead of ids
        #[arg(long)]
        profiles: bool,
    },

    /// Pairs of students whose shortest friendship path is long
    RemotePairs {
        /// Minimum distance (default: analytics.separation_threshold)
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<u32>,

        /// Run BFS sweeps on the calling thread only
        #[arg(long)]
        sequential: bool,
    },

    /// Shortest-path hop count between two students
    Separation { a: StudentId, b: StudentId },

    /// Row counts for the store
    Stats,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = SocialGraphConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database.path = db;
        config.validate()?;
    }

    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() && config.database.path != ":memory:" {
            std::fs::create_dir_all(parent)?;
        }
    }
    let store = SocialStore::new(&config.database.path)?;
    tracing::debug!(db = %config.database.path, "opened store");

    match cli.command {
        Commands::AddStudent { id, name, faculty } => {
            outcome(store.add_student(&Student::new(id, name, faculty))?)
        }
        Commands::DeleteStudent { id } => outcome(store.delete_student(id)?),
        Commands::Befriend { a, b } => outcome(store.make_friends(a, b)?),
        Commands::Unfriend { a, b } => outcome(store.make_not_friends(a, b)?),
        Commands::Join { id, group } => outcome(store.join_group(id, &group)?),
        Commands::Leave { id, group } => outcome(store.leave_group(id, &group)?),
        Commands::UpdateFaculty { id, faculty } => {
            let name = store
                .get_student(id)?
                .map(|s| s.name)
                .unwrap_or_default();
            outcome(store.update_student_faculty(&Student::new(id, name, faculty))?)
        }
        Commands::Recommend { id, profiles } => {
            let analytics = Analytics::with_config(&store, config.analytics);
            if profiles {
                print_json(&analytics.recommend_profiles(id)?)
            } else {
                let (ids, stats) = analytics.recommend_with_stats(id)?;
                tracing::info!(stats = %stats.to_json(), "recommend");
                print_json(&ids)
            }
        }
        Commands::RemotePairs {
            threshold,
            sequential,
        } => {
            let mut settings = config.analytics;
            if sequential {
                settings.parallel = false;
            }
            let threshold = threshold.unwrap_or(settings.separation_threshold);
            let analytics = Analytics::with_config(&store, settings);
            let (pairs, stats) = analytics.pairs_at_least_with_stats(threshold, None)?;
            tracing::info!(stats = %stats.to_json(), "remote pairs");
            print_json(&pairs)
        }
        Commands::Separation { a, b } => {
            let analytics = Analytics::with_config(&store, config.analytics);
            print_json(&analytics.degree_of_separation(a, b)?)
        }
        Commands::Stats => print_json(&store.get_stats()?),
    }
}

fn outcome(result: StoreOutcome) -> Result<ExitCode> {
    println!("{result}");
    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(ExitCode::SUCCESS)
}
