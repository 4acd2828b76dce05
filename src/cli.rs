//! CLI argument parsing.
use std::{env, path::PathBuf};

use clap::{Parser, Subcommand};
use secrecy::SecretString;

use crate::{config::DEFAULT_CONFIG_FILE, error::DevtoolsError, result::Result};

pub const DEFAULT_NUM_PAGES: u64 = 20;

/// Global CLI arguments shared by all subcommands.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    /// Path to the devtools.toml configuration file.
    pub config: PathBuf,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Devtools subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate *_test.html wrapper files from *_test.js sources.
    GenTestHtmls,

    /// Generate the all_tests.js manifest from generated test HTML files.
    GenAllTestsJs,

    /// Generate release notes in Markdown from merged GitHub PRs.
    ReleaseNotes(ReleaseNotesArgs),
}

/// Arguments for the release-notes subcommand.
#[derive(clap::Args, Debug)]
pub struct ReleaseNotesArgs {
    #[arg(long, default_value = "")]
    /// GitHub personal access token. Falls back to GITHUB_TOKEN env var.
    pub token: String,

    #[arg(long, default_value_t = DEFAULT_NUM_PAGES)]
    /// Number of closed-PR pages to fetch before stopping.
    pub num_pages: u64,

    #[arg(long, default_value_t = false)]
    /// Include the pseudo-release "Unreleased" in the output.
    pub output_unreleased: bool,

    #[arg(long, default_value_t = false)]
    /// Include PRs without release-notes labels in the output.
    pub output_without_labels: bool,
}

impl ReleaseNotesArgs {
    /// Resolve the API token from the flag or the environment.
    pub fn resolve_token(&self) -> Result<SecretString> {
        let mut token = self.token.clone();

        if token.is_empty()
            && let Ok(env_var_token) = env::var("GITHUB_TOKEN")
        {
            token = env_var_token;
        }

        if token.is_empty() {
            return Err(DevtoolsError::MissingToken.into());
        }

        Ok(SecretString::from(token))
    }
}
