//! CLI command implementations

pub mod init;
pub mod learner;
pub mod play;
pub mod stats;
pub mod subjects;

use anyhow::Result;

use quizquest::clock::SystemClock;
use quizquest::config::Config;
use quizquest::progress::ProgressManager;
use quizquest::store::{ProgressDb, Repository};

pub type Manager = ProgressManager<ProgressDb, SystemClock>;

/// Open the progress database named by the config
pub fn open_manager(config: &Config) -> Result<Manager> {
    let db_path = config.database_path();
    tracing::debug!("Opening progress db at {}", db_path.display());
    let db = ProgressDb::open(&db_path)?;
    Ok(ProgressManager::new(Repository::new(db), SystemClock))
}

/// Print the standard hint when nobody has registered yet
pub(crate) fn print_no_learner() {
    println!("No learner registered. Run `quizquest register <name> <email>` first.");
}
