//! Traits related to the remote git forge.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use url::Url;

use crate::{
    forge::types::{ForgeRelease, PullsPage},
    result::Result,
};

/// The API surface the changelog aggregator needs from a forge. Kept
/// narrow so tests can mock it without network access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    /// Lists published releases.
    async fn list_releases(&self) -> Result<Vec<ForgeRelease>>;

    /// Resolves a tag reference to the sha of the object it points at.
    async fn resolve_tag_ref(&self, tag: String) -> Result<String>;

    /// Fetches the author date of a commit.
    async fn commit_date(&self, sha: String) -> Result<DateTime<FixedOffset>>;

    /// Fetches one page of closed pull requests. `None` requests the first
    /// page; a `Url` from a previous page's `next` link requests that page.
    async fn closed_pulls_page(&self, url: Option<Url>) -> Result<PullsPage>;
}
