//! Implements the Forge trait for Github
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use color_eyre::eyre::{OptionExt, eyre};
use log::*;
use octocrab::{Octocrab, models::repos::Object, params};
use serde::Deserialize;
use url::Url;

use crate::{
    forge::{
        config::RemoteConfig,
        traits::Forge,
        types::{ForgePull, ForgeRelease, PullsPage},
    },
    result::Result,
};

#[derive(Debug, Deserialize)]
struct GitCommitAuthor {
    date: String,
}

#[derive(Debug, Deserialize)]
struct GitCommit {
    author: GitCommitAuthor,
}

/// GitHub forge implementation using Octocrab for release, git-data and
/// pull request endpoints.
pub struct Github {
    config: RemoteConfig,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let instance = Octocrab::builder()
            .personal_token(config.token.clone())
            .build()?;

        Ok(Self { config, instance })
    }
}

#[async_trait]
impl Forge for Github {
    async fn list_releases(&self) -> Result<Vec<ForgeRelease>> {
        // Single page: the repository carries well under the per-page
        // limit of releases.
        let page = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .list()
            .send()
            .await?;

        let releases = page
            .items
            .into_iter()
            .map(|release| ForgeRelease {
                tag_name: release.tag_name,
            })
            .collect::<Vec<ForgeRelease>>();

        debug!("found {} releases", releases.len());

        Ok(releases)
    }

    async fn resolve_tag_ref(&self, tag: String) -> Result<String> {
        let reference = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .get_ref(&params::repos::Reference::Tag(tag.clone()))
            .await?;

        match reference.object {
            Object::Commit { sha, .. } | Object::Tag { sha, .. } => Ok(sha),
            _ => Err(eyre!("unexpected object type for tag ref: {tag}")),
        }
    }

    async fn commit_date(&self, sha: String) -> Result<DateTime<FixedOffset>> {
        let route = format!(
            "/repos/{}/{}/git/commits/{}",
            self.config.owner, self.config.repo, sha
        );

        let commit: GitCommit = self.instance.get(route, None::<&()>).await?;
        let date = DateTime::parse_from_rfc3339(&commit.author.date)?;

        Ok(date)
    }

    async fn closed_pulls_page(&self, url: Option<Url>) -> Result<PullsPage> {
        let page = match url {
            None => {
                self.instance
                    .pulls(&self.config.owner, &self.config.repo)
                    .list()
                    .state(params::State::Closed)
                    .send()
                    .await?
            }
            Some(url) => {
                let uri = Some(
                    url.as_str()
                        .parse()
                        .map_err(|e| eyre!("invalid pagination uri: {e}"))?,
                );
                self.instance
                    .get_page::<octocrab::models::pulls::PullRequest>(&uri)
                    .await?
                    .ok_or_eyre("pagination link did not resolve to a page")?
            }
        };

        let next = page
            .next
            .as_ref()
            .map(|uri| Url::parse(&uri.to_string()))
            .transpose()?;

        let pulls = page
            .items
            .into_iter()
            .map(|pr| ForgePull {
                number: pr.number,
                title: pr.title.unwrap_or_default(),
                body: pr.body.unwrap_or_default(),
                labels: pr
                    .labels
                    .unwrap_or_default()
                    .into_iter()
                    .map(|label| label.name)
                    .collect(),
                submitter: pr.user.map(|user| user.login).unwrap_or_default(),
                merged: pr.merged_at.is_some(),
                merge_commit_sha: pr.merge_commit_sha,
            })
            .collect::<Vec<ForgePull>>();

        Ok(PullsPage { pulls, next })
    }
}
