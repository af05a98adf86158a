mod broadcast;
mod completion;
mod db;
mod error;
mod models;
mod progress;
mod session_log;
mod state_machine;
mod store;
mod tracker;
mod tui;

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use broadcast::RefreshBroadcaster;
use db::Database;
use error::TrackerError;
use models::{JsonOutput, ResourceType, Skill, SkillDraft, Status, StatusChange, SubtopicDraft};
use tracker::Tracker;

const DEFAULT_DB_NAME: &str = "skilltrack.db";
const DB_ENV_VAR: &str = "SKILLTRACK_DB";

#[derive(Parser)]
#[command(name = "skilltrack")]
#[command(about = "Track skills, subtopics and study sessions until every subtopic is done")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Database file (overrides SKILLTRACK_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Manage skills
    #[command(subcommand)]
    Skill(SkillCommands),

    /// Change a subtopic's status or plan
    #[command(subcommand)]
    Subtopic(SubtopicCommands),

    /// Log a study session against a subtopic
    Log {
        /// Subtopic ID
        subtopic_id: i64,

        /// Duration in minutes
        #[arg(allow_negative_numbers = true)]
        minutes: f64,

        /// What you covered
        #[arg(long, short)]
        notes: Option<String>,

        /// Session date (YYYY-MM-DD or RFC 3339, defaults to now)
        #[arg(long, short)]
        date: Option<String>,
    },

    /// List the sessions logged for a subtopic
    Sessions {
        /// Subtopic ID
        subtopic_id: i64,
    },

    /// Rate a skill and leave completion notes
    Review {
        /// Skill ID
        skill_id: i64,

        /// Rating from 1 to 5 (0 clears it)
        #[arg(long, short, allow_negative_numbers = true)]
        rating: Option<i64>,

        /// Completion notes
        #[arg(long, short)]
        notes: Option<String>,
    },

    /// Show the learning dashboard
    #[command(alias = "stats")]
    Dashboard,

    /// Compare expected and actual hours per skill
    Analytics,

    /// Launch interactive terminal UI
    Tui,
}

#[derive(Subcommand)]
enum SkillCommands {
    /// List all skills
    List,

    /// Add a new skill
    Add {
        /// Skill name
        name: String,

        /// Category (defaults to the resource type)
        #[arg(long, short)]
        category: Option<String>,

        /// Resource type: course/video/article/tutorial/book
        #[arg(long, short, default_value = "course")]
        resource_type: String,

        /// Where the material lives (Udemy, YouTube, ...)
        #[arg(long, short)]
        platform: Option<String>,

        /// Hours you plan to spend in total
        #[arg(long, short, default_value_t = 0.0, allow_negative_numbers = true)]
        target_hours: f64,

        /// Skill description
        #[arg(long, short)]
        description: Option<String>,

        /// Subtopic as "title" or "title:hours" (repeatable)
        #[arg(long = "subtopic", short, value_parser = parse_subtopic)]
        subtopics: Vec<SubtopicDraft>,
    },

    /// Show skill details with its subtopics
    Show {
        /// Skill ID
        id: i64,
    },

    /// Delete a skill with its subtopics and sessions
    Delete {
        /// Skill ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum SubtopicCommands {
    /// Mark a subtopic in progress
    Start {
        /// Subtopic ID
        id: i64,
    },

    /// Mark a subtopic completed (requires a plan and logged time)
    Complete {
        /// Subtopic ID
        id: i64,
    },

    /// Move a subtopic back to to-learn
    Reset {
        /// Subtopic ID
        id: i64,
    },

    /// Set a subtopic's status explicitly
    Status {
        /// Subtopic ID
        id: i64,

        /// Status: to-learn/in-progress/completed
        status: String,
    },

    /// Set a subtopic's expected hours
    Plan {
        /// Subtopic ID
        id: i64,

        /// Expected hours
        #[arg(long, allow_negative_numbers = true)]
        hours: f64,
    },
}

fn parse_subtopic(s: &str) -> Result<SubtopicDraft, String> {
    if let Some((title, hours)) = s.rsplit_once(':') {
        if let Ok(h) = hours.trim().parse::<f64>() {
            return Ok(SubtopicDraft {
                title: title.trim().to_string(),
                description: None,
                expected_hours: Some(h),
            });
        }
    }
    if s.trim().is_empty() {
        return Err("subtopic title cannot be empty".to_string());
    }
    Ok(SubtopicDraft {
        title: s.trim().to_string(),
        ..Default::default()
    })
}

fn get_db_path(flag: Option<PathBuf>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Ok(path) = std::env::var(DB_ENV_VAR) {
        return PathBuf::from(path);
    }

    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skilltrack");

    std::fs::create_dir_all(&config_dir).ok();
    config_dir.join(DEFAULT_DB_NAME)
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("skilltrack=warn"),
        1 => EnvFilter::new("skilltrack=info"),
        _ => EnvFilter::new("skilltrack=debug"),
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    // The TUI owns the terminal; log lines would corrupt it
    if !matches!(cli.command, Commands::Tui) {
        init_logging(cli.verbose);
    }

    if let Err(e) = run(cli) {
        let msg = match e.downcast_ref::<TrackerError>() {
            Some(err) => {
                tracing::debug!(error = %err, retryable = err.is_retryable(), "command failed");
                err.user_message()
            }
            None => e.to_string(),
        };
        if json {
            match serde_json::to_string(&JsonOutput::<()>::err(&msg)) {
                Ok(out) => println!("{}", out),
                Err(_) => eprintln!("Error: {}", msg),
            }
        } else {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(1);
    }
}

fn print_json<T: Serialize>(data: T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(&JsonOutput::ok(data))?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let db_path = get_db_path(cli.db);
    let db = Database::open(&db_path)?;
    db.init()?;

    let tracker = Tracker::new(db, RefreshBroadcaster::new());

    match cli.command {
        Commands::Init => {
            if cli.json {
                print_json(serde_json::json!({ "path": db_path }))?;
            } else {
                println!("Database initialized at: {}", db_path.display());
            }
        }

        Commands::Skill(skill_cmd) => match skill_cmd {
            SkillCommands::List => {
                let skills = tracker.list_skills()?;
                if cli.json {
                    print_json(&skills)?;
                } else if skills.is_empty() {
                    println!("No skills found.");
                } else {
                    println!(
                        "{:<5} {:<32} {:<12} {:<12} {:>5} {:>13}",
                        "ID", "NAME", "CATEGORY", "STATUS", "DONE", "HOURS"
                    );
                    println!("{}", "-".repeat(84));
                    for skill in skills {
                        println!(
                            "{:<5} {:<32} {:<12} {:<12} {:>4}% {:>13}",
                            skill.id,
                            truncate(&skill.name, 30),
                            truncate(&skill.category, 12),
                            skill.status.label(),
                            skill.progress,
                            format!(
                                "{} / {}",
                                format_hours(skill.learned_hours),
                                format_hours(skill.target_hours)
                            )
                        );
                    }
                }
            }

            SkillCommands::Add {
                name,
                category,
                resource_type,
                platform,
                target_hours,
                description,
                subtopics,
            } => {
                let resource_type = ResourceType::from_str(&resource_type).ok_or_else(|| {
                    TrackerError::validation(format!(
                        "Invalid resource type '{}'. Use: course, video, article, tutorial, or book",
                        resource_type
                    ))
                })?;

                let skill = tracker.create_skill(SkillDraft {
                    name,
                    category,
                    resource_type,
                    platform,
                    target_hours,
                    description,
                    subtopics,
                })?;

                if cli.json {
                    print_json(&skill)?;
                } else {
                    println!(
                        "Added skill '{}' with ID: {} ({} subtopics)",
                        skill.name,
                        skill.id,
                        skill.subtopics.len()
                    );
                    for sub in &skill.subtopics {
                        println!(
                            "  [{}] {} ({} planned)",
                            sub.id,
                            sub.title,
                            format_hours(sub.expected_hours)
                        );
                    }
                }
            }

            SkillCommands::Show { id } => {
                let skill = tracker.get_skill(id)?;
                if cli.json {
                    print_json(&skill)?;
                } else {
                    print_skill(&skill);
                }
            }

            SkillCommands::Delete { id } => {
                tracker.delete_skill(id)?;
                if cli.json {
                    print_json(())?;
                } else {
                    println!("Skill {} deleted.", id);
                }
            }
        },

        Commands::Subtopic(sub_cmd) => match sub_cmd {
            SubtopicCommands::Start { id } => {
                let change = tracker.set_subtopic_status(id, Status::InProgress)?;
                report_change(&change, cli.json)?;
            }
            SubtopicCommands::Complete { id } => {
                let change = tracker.set_subtopic_status(id, Status::Completed)?;
                report_change(&change, cli.json)?;
            }
            SubtopicCommands::Reset { id } => {
                let change = tracker.set_subtopic_status(id, Status::ToLearn)?;
                report_change(&change, cli.json)?;
            }
            SubtopicCommands::Status { id, status } => {
                let status = Status::from_str(&status).ok_or_else(|| {
                    TrackerError::validation(format!(
                        "Invalid status '{}'. Use: to-learn, in-progress, or completed",
                        status
                    ))
                })?;
                let change = tracker.set_subtopic_status(id, status)?;
                report_change(&change, cli.json)?;
            }
            SubtopicCommands::Plan { id, hours } => {
                let sub = tracker.set_expected_hours(id, hours)?;
                if cli.json {
                    print_json(&sub)?;
                } else {
                    println!(
                        "Subtopic '{}' now planned at {}.",
                        sub.title,
                        format_hours(sub.expected_hours)
                    );
                }
            }
        },

        Commands::Log {
            subtopic_id,
            minutes,
            notes,
            date,
        } => {
            let sub =
                tracker.record_session(subtopic_id, minutes, notes.as_deref(), date.as_deref())?;
            if cli.json {
                print_json(&sub)?;
            } else {
                println!(
                    "Logged {} min on '{}'. Total: {} of {} planned.",
                    minutes,
                    sub.title,
                    format_hours(sub.hours_spent),
                    format_hours(sub.expected_hours)
                );
            }
        }

        Commands::Sessions { subtopic_id } => {
            let sub = tracker.get_subtopic(subtopic_id)?;
            let sessions = tracker.list_sessions(subtopic_id)?;
            if cli.json {
                print_json(&sessions)?;
            } else if sessions.is_empty() {
                println!("No sessions logged for '{}'.", sub.title);
            } else {
                println!("Sessions for '{}' ({} total)", sub.title, format_hours(sub.hours_spent));
                println!("{:<5} {:<12} {:>8}  NOTES", "ID", "DATE", "MINUTES");
                println!("{}", "-".repeat(60));
                for s in sessions {
                    println!(
                        "{:<5} {:<12} {:>8}  {}",
                        s.id,
                        date_part(&s.session_date),
                        s.duration_minutes,
                        s.notes.as_deref().unwrap_or("-")
                    );
                }
            }
        }

        Commands::Review {
            skill_id,
            rating,
            notes,
        } => {
            let skill = tracker.record_review(skill_id, rating, notes.as_deref())?;
            if cli.json {
                print_json(&skill)?;
            } else {
                println!("Review saved for '{}': {}", skill.name, skill.rating_stars());
            }
        }

        Commands::Dashboard => {
            let dashboard = tracker.dashboard()?;
            if cli.json {
                print_json(&dashboard)?;
            } else {
                let stats = &dashboard.stats;
                println!("=== Learning Dashboard ===");
                println!("Total skills: {}", stats.total_skills);
                println!("Completed: {}", stats.completed_skills);
                println!("Learning hours: {}", format_hours(stats.total_learning_hours));
                println!("Completion rate: {}%", stats.completion_rate);

                if !dashboard.category_breakdown.is_empty() {
                    println!();
                    println!("--- Categories ---");
                    for (category, count) in &dashboard.category_breakdown {
                        println!("{:<24} {}", category, count);
                    }
                }

                if !dashboard.skills_progress.is_empty() {
                    println!();
                    println!("--- Progress ---");
                    for row in &dashboard.skills_progress {
                        println!(
                            "{:<30} {} {:>3}% ({}/{})",
                            truncate(&row.name, 30),
                            progress_bar(row.progress, 20),
                            row.progress,
                            row.completed_count,
                            row.total_count
                        );
                    }
                }

                if !dashboard.recent_activities.is_empty() {
                    println!();
                    println!("--- Recent Activity ---");
                    for a in &dashboard.recent_activities {
                        println!(
                            "{}  {} min  {} / {}",
                            date_part(&a.session_date),
                            a.duration_minutes,
                            a.skill_name,
                            a.subtopic_title
                        );
                    }
                }
            }
        }

        Commands::Analytics => {
            let dashboard = tracker.dashboard()?;
            if cli.json {
                print_json(&dashboard.skills_progress)?;
            } else if dashboard.skills_progress.is_empty() {
                println!("No skills found.");
            } else {
                println!(
                    "{:<32} {:>10} {:>10} {:>10}",
                    "SKILL", "EXPECTED", "ACTUAL", "DIFF"
                );
                println!("{}", "-".repeat(65));
                for row in &dashboard.skills_progress {
                    println!(
                        "{:<32} {:>10} {:>10} {:>+10.1}",
                        truncate(&row.name, 30),
                        format_hours(row.target_hours),
                        format_hours(row.learned_hours),
                        row.learned_hours - row.target_hours
                    );
                }
            }
        }

        Commands::Tui => {
            tui::run(tracker)?;
        }
    }

    Ok(())
}

fn print_skill(skill: &Skill) {
    println!("Skill: {}", skill.name);
    println!("ID: {}", skill.id);
    println!("Category: {}", skill.category);
    println!("Type: {}", skill.resource_type.label());
    if let Some(platform) = &skill.platform {
        println!("Platform: {}", platform);
    }
    if let Some(desc) = &skill.description {
        println!("Description: {}", desc);
    }
    println!("Status: {}", skill.status.label());
    println!(
        "Progress: {}% ({}/{} subtopics)",
        skill.progress,
        skill.completed_count(),
        skill.subtopics.len()
    );
    println!(
        "Hours: {} of {} target",
        format_hours(skill.learned_hours),
        format_hours(skill.target_hours)
    );
    if skill.rating.is_some() || skill.completion_notes.is_some() {
        println!("Rating: {}", skill.rating_stars());
        if let Some(notes) = &skill.completion_notes {
            println!("Notes: {}", notes);
        }
    }
    println!("Created: {}", skill.created_at);
    if let Some(done) = &skill.completed_at {
        println!("Completed: {}", done);
    }

    if !skill.subtopics.is_empty() {
        println!();
        println!("--- Subtopics ---");
        println!(
            "{:<5} {:<12} {:>9} {:>9}  TITLE",
            "ID", "STATUS", "EXPECTED", "SPENT"
        );
        for sub in &skill.subtopics {
            println!(
                "{:<5} {:<12} {:>9} {:>9}  {}",
                sub.id,
                sub.status.label(),
                format_hours(sub.expected_hours),
                format_hours(sub.hours_spent),
                sub.title
            );
        }
    }
}

fn report_change(change: &StatusChange, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        return print_json(change);
    }

    if !change.changed {
        println!(
            "Subtopic '{}' is already {}.",
            change.subtopic.title,
            change.subtopic.status.label()
        );
        return Ok(());
    }

    println!(
        "Subtopic '{}' is now {}. Skill progress: {}%",
        change.subtopic.title,
        change.subtopic.status.label(),
        change.skill.progress
    );
    if change.skill_completed {
        println!();
        println!("All subtopics of '{}' are complete!", change.skill.name);
        println!("Rate it with:");
        println!(
            "  skilltrack review {} --rating <1-5> --notes <text>",
            change.skill.id
        );
    }
    Ok(())
}

fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{:.0}h", hours)
    } else {
        format!("{:.1}h", hours)
    }
}

fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent as usize * width) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn date_part(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
