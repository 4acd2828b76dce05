//! Request and response types exchanged with the forge.

use url::Url;

/// A published release as listed by the releases endpoint.
#[derive(Debug, Clone)]
pub struct ForgeRelease {
    pub tag_name: String,
}

/// One closed pull request as returned by the pulls endpoint.
#[derive(Debug, Clone)]
pub struct ForgePull {
    pub number: u64,
    pub title: String,
    pub body: String,
    /// Label names attached to the PR.
    pub labels: Vec<String>,
    /// Login of the account that opened the PR.
    pub submitter: String,
    pub merged: bool,
    pub merge_commit_sha: Option<String>,
}

/// One page of closed pull requests plus the pagination link advertised by
/// the response, when any.
#[derive(Debug, Clone)]
pub struct PullsPage {
    pub pulls: Vec<ForgePull>,
    pub next: Option<Url>,
}
