//! Commit ancestry checks against a local git checkout.

use std::process::{Command, Stdio};

use color_eyre::eyre::Context;

use crate::result::Result;

/// Answers whether one commit is reachable from another. Mocked in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Ancestry {
    /// True when `ancestor` is an ancestor of `descendant`.
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool>;
}

/// Ancestry via `git merge-base --is-ancestor`, one subprocess per
/// comparison. Requires running inside a checkout that contains both
/// commits.
pub struct GitMergeBase;

impl Ancestry for GitMergeBase {
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let status = Command::new("git")
            .args(["merge-base", "--is-ancestor", ancestor, descendant])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .wrap_err("failed to invoke git merge-base")?;

        // Exit 1 means "not an ancestor"; unknown commits also land here.
        Ok(status.success())
    }
}
