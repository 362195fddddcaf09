//! Command line entry points.
//!
//! Each command ingests from one source into a fresh repository, then hands the
//! repository to a sink.

mod dump_sponds;
mod process_directory;
mod update_google_sheet;

pub use dump_sponds::*;
pub use process_directory::*;
pub use update_google_sheet::*;

use std::path::Path;

use crate::config::Config;
use crate::db::Repository;
use crate::errors::AppError;
use crate::ingest::{process_spond, Outcome};
use crate::source::{Credentials, DirectoryReplay, SpondClient};

/// Counts from one ingestion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub records: usize,
    pub skipped: usize,
}

impl IngestStats {
    fn record(&mut self, outcome: &Outcome) {
        self.records += 1;
        if *outcome == Outcome::Skipped {
            self.skipped += 1;
        }
    }
}

/// Replay a dump directory into the repository, one record at a time.
pub fn ingest_directory(repo: &mut Repository, dir: &Path) -> Result<IngestStats, AppError> {
    let replay = DirectoryReplay::open(dir)?;
    if replay.is_empty() {
        tracing::warn!(directory = %dir.display(), "No spond files found");
    }
    let files = replay.len();

    let mut stats = IngestStats::default();
    for raw in replay {
        let outcome = process_spond(repo, &raw?)?;
        stats.record(&outcome);
    }

    tracing::info!(
        files,
        records = stats.records,
        skipped = stats.skipped,
        "Processed sponds from directory"
    );
    Ok(stats)
}

/// Fetch a group's events from Spond and normalize them as they arrive.
pub async fn ingest_live(
    repo: &mut Repository,
    config: &Config,
    credentials: &Credentials,
    group_name: &str,
) -> Result<IngestStats, AppError> {
    let client =
        SpondClient::login(&config.spond_api_base, config.spond_timeout, credentials).await?;

    let mut stats = IngestStats::default();
    client
        .for_each_spond(group_name, |raw| {
            let outcome = process_spond(repo, raw)?;
            stats.record(&outcome);
            Ok(())
        })
        .await?;

    tracing::info!(
        records = stats.records,
        skipped = stats.skipped,
        "Processed sponds from Spond"
    );
    Ok(stats)
}
