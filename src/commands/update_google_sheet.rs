//! `update-google-sheet`: publish availability to a hosted Google Sheet.

use std::path::PathBuf;

use clap::Args;

use super::{ingest_directory, ingest_live};
use crate::config::Config;
use crate::db::Repository;
use crate::errors::AppError;
use crate::export::{build_team_sheets, update_google_sheet, ExportSummary, SheetsClient};
use crate::filters::{Selection, DEFAULT_EXCLUDED_MATCH_PATTERN, DEFAULT_TEAM_PATTERN};
use crate::source::Credentials;

#[derive(Args, Debug, Clone)]
pub struct UpdateGoogleSheetArgs {
    /// ID of the Google Sheet to update
    #[arg(value_name = "SHEET_ID")]
    pub spreadsheet_id: String,

    /// Email or phone number to log in to Spond with
    #[arg(long, conflicts_with = "source_directory")]
    pub email_or_phone_number: Option<String>,

    /// Group to fetch Sponds for
    #[arg(long, conflicts_with = "source_directory")]
    pub group_name: Option<String>,

    /// Password to log in to Spond with
    #[arg(long, conflicts_with = "source_directory")]
    pub password: Option<String>,

    /// Directory containing Spond JSON files, instead of fetching from Spond
    #[arg(long)]
    pub source_directory: Option<PathBuf>,

    /// JSON file containing the Spond credentials to use
    #[arg(
        long,
        conflicts_with_all = ["email_or_phone_number", "password", "source_directory"]
    )]
    pub spond_credentials_file: Option<PathBuf>,

    /// Only publish teams whose name matches this pattern
    #[arg(long, default_value = DEFAULT_TEAM_PATTERN)]
    pub team_filter: String,

    /// Leave out matches whose heading matches this pattern
    #[arg(long, default_value = DEFAULT_EXCLUDED_MATCH_PATTERN)]
    pub exclude_matches: String,
}

impl UpdateGoogleSheetArgs {
    fn credentials(&self) -> Result<Credentials, AppError> {
        if let Some(path) = &self.spond_credentials_file {
            return Credentials::from_file(path);
        }

        match (&self.email_or_phone_number, &self.password) {
            (Some(email_or_phone_number), Some(password)) => Ok(Credentials {
                email_or_phone_number: email_or_phone_number.clone(),
                password: password.clone(),
            }),
            _ => Err(AppError::Config(
                "Spond credentials are required unless --source-directory is given".to_string(),
            )),
        }
    }
}

pub async fn publish_google_sheet(
    args: &UpdateGoogleSheetArgs,
    config: &Config,
) -> Result<ExportSummary, AppError> {
    let selection = Selection::from_patterns(
        Some(args.team_filter.as_str()),
        Some(args.exclude_matches.as_str()),
    )?;
    let token = config.google_access_token.clone().ok_or_else(|| {
        AppError::Config("GOOGLE_ACCESS_TOKEN is required to update a Google Sheet".to_string())
    })?;
    let client = SheetsClient::new(
        &config.sheets_api_base,
        token,
        config.sheets_rate_limit,
        config.sheets_rate_window,
    )?;

    let mut repo = Repository::new();
    match &args.source_directory {
        Some(dir) => {
            ingest_directory(&mut repo, dir)?;
        }
        None => {
            let group_name = args.group_name.as_deref().ok_or_else(|| {
                AppError::Config(
                    "--group-name is required unless --source-directory is given".to_string(),
                )
            })?;
            ingest_live(&mut repo, config, &args.credentials()?, group_name).await?;
        }
    }

    let sheets = build_team_sheets(&repo, &selection)?;
    let summary = update_google_sheet(&client, &args.spreadsheet_id, &sheets).await?;

    tracing::info!(
        written = summary.written.len(),
        failed = summary.failed.len(),
        "Google Sheet update complete"
    );
    Ok(summary)
}
