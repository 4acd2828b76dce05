//! Generate release notes in Markdown from Github PRs.
//!
//! Workflow: draft a changelog with `--output-unreleased
//! --output-without-labels`, apply one of the "release notes: breaking" /
//! "release notes: major" / "release notes: yes" labels to each PR worth
//! mentioning (and fix titles where needed), add "author:@<login>" to the
//! PR body to credit imported changes, then run again without the draft
//! flags and check in the result.
use log::*;

use crate::{
    changelog::{Aggregator, RenderOptions, ancestry::GitMergeBase, render},
    cli,
    config::Config,
    forge::{config::RemoteConfig, github::Github},
    result::Result,
};

pub async fn execute(
    args: &cli::Args,
    cmd: &cli::ReleaseNotesArgs,
) -> Result<()> {
    let config = Config::load(&args.config)?;
    let token = cmd.resolve_token()?;

    let forge = Github::new(RemoteConfig {
        owner: config.repo.owner.clone(),
        repo: config.repo.name.clone(),
        token,
    })?;
    let ancestry = GitMergeBase;

    let aggregator = Aggregator::new(&forge, &ancestry, &config.repo);
    let changelog = aggregator.run(cmd.num_pages).await?;

    if changelog.is_empty() {
        warn!("no merged PRs found: the changelog will be empty");
    }

    let doc = render(
        &changelog,
        &RenderOptions {
            output_unreleased: cmd.output_unreleased,
            output_without_labels: cmd.output_without_labels,
        },
    );

    print!("{doc}");

    Ok(())
}
