//! levelup CLI - take short break challenges and level up.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use levelup_core::{experience_for_level, ChallengeCatalog, Progress};
use levelup_notify::{DesktopNotifier, Notifier, NullNotifier};
use levelup_storage::{load_progress, JsonStorage};
use levelup_tracker::{Completion, Session, TrackerConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "levelup")]
#[command(about = "Break challenges with experience and levels", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Storage path for saved progress
    #[arg(short, long, default_value = ".levelup")]
    storage: PathBuf,

    /// Challenge catalog (JSON); defaults to the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show saved progress
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the challenge catalog
    Catalog {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start an interactive session
    Play {
        /// Seed for challenge selection
        #[arg(long)]
        seed: Option<u64>,
        /// Sound played when a challenge starts
        #[arg(long, default_value = "notification.mp3")]
        sound: PathBuf,
        /// Disable notifications and sounds
        #[arg(short, long)]
        quiet: bool,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    run(Cli::parse()).await
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => {
            let storage = JsonStorage::new(&cli.storage).await?;
            let progress = load_progress(&storage).await.normalized();

            if json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
            } else {
                print_progress(&progress);
            }
        }
        Commands::Catalog { json } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            if json {
                let challenges: Vec<_> = catalog.iter().collect();
                println!("{}", serde_json::to_string_pretty(&challenges)?);
            } else {
                println!("Challenges ({})", catalog.len());
                for challenge in catalog.iter() {
                    println!("  {:>3}xp | {:<4} | {}", challenge.amount, challenge.kind, challenge.description);
                }
            }
        }
        Commands::Play { seed, sound, quiet } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let storage = JsonStorage::new(&cli.storage).await?;
            let notifier: Arc<dyn Notifier> = if quiet {
                Arc::new(NullNotifier)
            } else {
                Arc::new(DesktopNotifier::new("levelup"))
            };
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let session = Session::open(storage, catalog, notifier, rng)
                .await
                .with_tracker_config(TrackerConfig {
                    sound_path: sound,
                    ..TrackerConfig::default()
                });

            play(session).await?;
        }
    }

    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<ChallengeCatalog> {
    match path {
        Some(path) => ChallengeCatalog::from_path(path)
            .with_context(|| format!("Invalid challenge catalog {}", path.display())),
        None => ChallengeCatalog::builtin().context("Invalid built-in challenge catalog"),
    }
}

async fn play(mut session: Session<JsonStorage>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_progress(&session.tracker().progress());
    print_help();

    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim().to_lowercase().as_str() {
            "" => continue,
            "start" | "s" => {
                let challenge = session.start_new_challenge();
                println!("New {} challenge, worth {}xp:", challenge.kind, challenge.amount);
                println!("  {}", challenge.description);
            }
            "complete" | "c" => match session.complete_challenge().await {
                Completion::NoActiveChallenge => {
                    println!("No active challenge. Type 'start' to get one.");
                }
                Completion::Rewarded { amount, .. } => {
                    println!("+{}xp", amount);
                    if session.tracker().is_level_up_visible() {
                        acknowledge_level_up(&mut session, &mut lines).await?;
                    }
                    print_progress(&session.tracker().progress());
                }
            },
            "reset" | "r" => {
                if session.tracker().active_challenge().is_some() {
                    session.reset_challenge();
                    println!("Challenge discarded.");
                } else {
                    println!("No active challenge.");
                }
            }
            "status" => {
                print_progress(&session.tracker().progress());
                if let Some(challenge) = session.tracker().active_challenge() {
                    println!("Active: {} ({}xp)", challenge.description, challenge.amount);
                }
            }
            "help" | "h" | "?" => print_help(),
            "quit" | "q" | "exit" => break,
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }

    let progress = session.tracker().progress();
    info!(
        "Session closed at level {} with {} challenges completed",
        progress.level, progress.challenges_completed
    );
    Ok(())
}

async fn acknowledge_level_up(
    session: &mut Session<JsonStorage>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<()> {
    println!();
    println!("  *** Congratulations! You reached level {} ***", session.tracker().level());
    println!();
    prompt("Press Enter to continue ")?;
    lines.next_line().await?;
    session.close_modal();
    Ok(())
}

fn print_progress(progress: &Progress) {
    let threshold = experience_for_level(progress.level);
    println!(
        "Level {} | {} | {}/{}xp | {} completed",
        progress.level,
        render_bar(progress.current_experience, threshold, 20),
        progress.current_experience,
        threshold,
        progress.challenges_completed
    );
}

fn print_help() {
    println!("Commands: start (s), complete (c), reset (r), status, help, quit (q)");
}

fn prompt(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}

fn render_bar(current: u32, total: u32, width: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        ((u64::from(current) * width as u64) / u64::from(total)).min(width as u64) as usize
    };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(0, 64, 4), "[----]");
        assert_eq!(render_bar(32, 64, 4), "[##--]");
        assert_eq!(render_bar(63, 64, 4), "[###-]");
        assert_eq!(render_bar(500, 64, 4), "[####]");
    }

    #[test]
    fn test_cli_parses_play_flags() {
        let cli = Cli::try_parse_from(["levelup", "--storage", "/tmp/x", "play", "--seed", "5", "-q"]).unwrap();
        assert_eq!(cli.storage, PathBuf::from("/tmp/x"));
        match cli.command {
            Commands::Play { seed, quiet, sound } => {
                assert_eq!(seed, Some(5));
                assert!(quiet);
                assert_eq!(sound, PathBuf::from("notification.mp3"));
            }
            _ => panic!("expected play"),
        }
    }

    #[tokio::test]
    async fn test_status_ignores_invalid_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.json");
        std::fs::write(&catalog, "not json").unwrap();
        let storage = dir.path().join("store");
        let storage = storage.to_str().unwrap();
        let catalog = catalog.to_str().unwrap();

        let status = Cli::try_parse_from(["levelup", "--storage", storage, "--catalog", catalog, "status"]).unwrap();
        assert!(run(status).await.is_ok());

        let listing = Cli::try_parse_from(["levelup", "--storage", storage, "--catalog", catalog, "catalog"]).unwrap();
        let err = run(listing).await.unwrap_err();
        assert!(err.to_string().contains("Invalid challenge catalog"));
    }

    #[test]
    fn test_load_builtin_catalog() {
        let catalog = load_catalog(None).unwrap();
        assert!(!catalog.is_empty());
    }
}
