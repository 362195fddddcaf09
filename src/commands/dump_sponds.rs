//! `dump-sponds`: save every event of a group as a JSON file.

use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::errors::AppError;
use crate::source::{Credentials, SpondClient, SpondDumper};

#[derive(Args, Debug, Clone)]
pub struct DumpSpondsArgs {
    /// Email or phone number to log in to Spond with
    pub username: String,

    /// Group to get Sponds for
    pub group: String,

    /// Directory to write Spond JSON files in
    pub directory: PathBuf,

    /// Password to log in to Spond with
    #[arg(long, env = "SPOND_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Returns the number of files written.
pub async fn dump_sponds(args: &DumpSpondsArgs, config: &Config) -> Result<usize, AppError> {
    let credentials = Credentials {
        email_or_phone_number: args.username.clone(),
        password: args.password.clone(),
    };

    std::fs::create_dir_all(&args.directory)?;
    let client =
        SpondClient::login(&config.spond_api_base, config.spond_timeout, &credentials).await?;

    let mut dumper = SpondDumper::new(&args.directory);
    client
        .for_each_spond(&args.group, |spond| {
            dumper.dump(spond);
            Ok(())
        })
        .await?;

    tracing::info!(
        directory = %dumper.directory().display(),
        written = dumper.written(),
        "Dumped sponds"
    );
    Ok(dumper.written())
}
