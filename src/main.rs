use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use quizquest::catalog::QuizCatalog;
use quizquest::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "quizquest")]
#[command(about = "Offline quiz trainer with points, levels, streaks and achievements")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.quizquest/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the progress database (overrides the config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the learner on this device (replaces any existing one)
    Register { name: String, email: String },

    /// List subjects and quizzes
    Subjects,

    /// Take a quiz
    Play {
        /// Quiz id, e.g. bio_001
        quiz_id: String,
    },

    /// Show points, level, streak and recent achievements
    Dashboard,

    /// Show the learner profile with per-subject progress
    Profile,

    /// List every achievement and whether it is earned
    Achievements,

    /// Rebuild points and achievements from the result history
    Recalculate,

    /// Erase all progress for the current learner
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Set the current streak
    Streak { days: u32 },

    /// Show or change app settings
    Settings {
        #[arg(long)]
        dark_mode: Option<bool>,

        #[arg(long)]
        language: Option<String>,
    },

    /// Write a default config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(Config::global_config_path);
    let mut config = Config::load_or_default(&config_path)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = Some(data_dir);
    }

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let open = || cli::open_manager(&config);

    let Some(command) = cli.command else {
        return cli::stats::dashboard_command(&open()?);
    };

    let catalog = QuizCatalog::builtin()?;

    match command {
        Commands::Register { name, email } => {
            cli::learner::register_command(&open()?, &name, &email)?;
        }
        Commands::Subjects => cli::subjects::subjects_command(&catalog),
        Commands::Play { quiz_id } => {
            cli::play::play_command(&open()?, &catalog, &quiz_id)?;
        }
        Commands::Dashboard => cli::stats::dashboard_command(&open()?)?,
        Commands::Profile => cli::stats::profile_command(&open()?, &catalog)?,
        Commands::Achievements => cli::stats::achievements_command(&open()?)?,
        Commands::Recalculate => cli::learner::recalculate_command(&open()?)?,
        Commands::Reset { yes } => cli::learner::reset_command(&open()?, yes)?,
        Commands::Streak { days } => cli::learner::streak_command(&open()?, days)?,
        Commands::Settings {
            dark_mode,
            language,
        } => cli::learner::settings_command(&open()?, dark_mode, language)?,
        Commands::Init { force } => cli::init::init_command(&config_path, force)?,
    }

    Ok(())
}
