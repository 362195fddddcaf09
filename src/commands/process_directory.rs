//! `process-directory`: replay dumped records into an xlsx workbook.

use std::path::PathBuf;

use clap::Args;

use super::ingest_directory;
use crate::db::Repository;
use crate::errors::AppError;
use crate::export::{build_team_sheets, save_workbook, ExportSummary};
use crate::filters::Selection;

#[derive(Args, Debug, Clone)]
pub struct ProcessDirectoryArgs {
    /// Directory containing Spond JSON files
    pub directory: PathBuf,

    /// Name of the Excel workbook to write
    pub filename: PathBuf,

    /// Only include teams whose name matches this pattern
    #[arg(long)]
    pub team_filter: Option<String>,

    /// Leave out matches whose heading matches this pattern
    #[arg(long)]
    pub exclude_matches: Option<String>,
}

pub fn process_directory(args: &ProcessDirectoryArgs) -> Result<ExportSummary, AppError> {
    let selection =
        Selection::from_patterns(args.team_filter.as_deref(), args.exclude_matches.as_deref())?;

    let mut repo = Repository::new();
    ingest_directory(&mut repo, &args.directory)?;

    let sheets = build_team_sheets(&repo, &selection)?;
    save_workbook(&sheets, &args.filename)
}
