//! Data carried through one changelog run.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

/// Pseudo-release for PRs not contained in any tagged release.
pub const UNRELEASED: &str = "Unreleased";

/// Priority assigned to a PR from its "release notes: *" labels. Higher
/// levels win when a PR carries several labels; comparison is the derived
/// ordinal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LabelLevel {
    NoLabel,
    /// release notes: yes
    WithLabel,
    /// release notes: major
    MajorFeature,
    /// release notes: breaking
    BreakingChange,
}

impl LabelLevel {
    /// Maps one label name to its level. Unrelated labels map to
    /// [`LabelLevel::NoLabel`].
    pub fn from_label(name: &str) -> Self {
        match name {
            "release notes: yes" => Self::WithLabel,
            "release notes: major" => Self::MajorFeature,
            "release notes: breaking" => Self::BreakingChange,
            _ => Self::NoLabel,
        }
    }

    /// Retains the highest level across all of a PR's labels.
    pub fn for_labels<'a>(
        labels: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        labels
            .into_iter()
            .map(Self::from_label)
            .max()
            .unwrap_or(Self::NoLabel)
    }
}

/// A tagged release with the commit metadata needed to bucket PRs.
#[derive(Debug, Clone)]
pub struct TaggedRelease {
    pub tag: String,
    pub date: DateTime<FixedOffset>,
    /// Abbreviated (7-char) sha of the tagged commit.
    pub short_sha: String,
}

/// One merged PR after classification. Immutable once created.
#[derive(Debug, Clone)]
pub struct PullRecord {
    pub number: u64,
    /// Credited author: the body attribution override when present, else
    /// the submitter.
    pub author: String,
    pub title: String,
    /// Tag name of the owning release, or [`UNRELEASED`].
    pub release: String,
    pub level: LabelLevel,
}

/// The changelog of one release: formatted lines, grouped by label level,
/// append-only.
#[derive(Debug, Default)]
pub struct ReleaseNotes {
    pub breaking_changes: Vec<String>,
    pub major_features: Vec<String>,
    pub with_labels: Vec<String>,
    pub without_labels: Vec<String>,
}

/// Per-release buckets in insertion order. This is the owned accumulator
/// the aggregator returns; callers only read from it.
#[derive(Debug, Default)]
pub struct ChangelogByRelease {
    order: Vec<String>,
    notes: HashMap<String, ReleaseNotes>,
}

impl ChangelogByRelease {
    /// Returns the bucket for `release`, creating it at the end of the
    /// iteration order on first use.
    pub fn bucket(&mut self, release: &str) -> &mut ReleaseNotes {
        if !self.notes.contains_key(release) {
            self.order.push(release.to_string());
        }

        self.notes.entry(release.to_string()).or_default()
    }

    /// Iterates releases and their notes in insertion order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&str, &ReleaseNotes)> {
        self.order.iter().map(|release| {
            (release.as_str(), &self.notes[release])
        })
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Abbreviates a commit sha to its 7-char short form.
pub fn short_sha(sha: &str) -> String {
    sha.chars().take(7).collect()
}
