//! One-pass changelog aggregation over the forge API.

use log::*;
use regex::Regex;

use crate::{
    changelog::{
        ancestry::Ancestry,
        types::{
            ChangelogByRelease, LabelLevel, PullRecord, TaggedRelease,
            UNRELEASED, short_sha,
        },
    },
    config::RepoConfig,
    forge::{traits::Forge, types::ForgePull},
    result::Result,
};

/// Hard-coded exclusion: the repository's first PR predates the earliest
/// tag, so ancestry checks cannot place it.
const SKIPPED_PR: u64 = 1;

/// Titles longer than this are cut and suffixed with an ellipsis marker.
const MAX_TITLE_LEN: usize = 70;

/// Output toggles for [`render`].
#[derive(Debug, Default, Clone)]
pub struct RenderOptions {
    /// Include the pseudo-release "Unreleased".
    pub output_unreleased: bool,
    /// Include PRs carrying no release-notes label.
    pub output_without_labels: bool,
}

/// Fetches releases and merged PRs, classifies each PR by release and
/// label level, and accumulates formatted changelog lines.
pub struct Aggregator<'a> {
    forge: &'a dyn Forge,
    ancestry: &'a dyn Ancestry,
    repo: &'a RepoConfig,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        forge: &'a dyn Forge,
        ancestry: &'a dyn Ancestry,
        repo: &'a RepoConfig,
    ) -> Self {
        Self {
            forge,
            ancestry,
            repo,
        }
    }

    /// Runs the whole pipeline: releases, merged PRs, classification.
    pub async fn run(&self, num_pages: u64) -> Result<ChangelogByRelease> {
        let releases = self.fetch_releases().await?;
        let prs = self.fetch_merged_prs(&releases, num_pages).await?;

        Ok(self.classify(&prs))
    }

    /// Retrieves all releases with their tagged commit's sha and author
    /// date, sorted ascending by date.
    pub async fn fetch_releases(&self) -> Result<Vec<TaggedRelease>> {
        let mut releases = vec![];

        for release in self.forge.list_releases().await? {
            let sha =
                self.forge.resolve_tag_ref(release.tag_name.clone()).await?;
            let date = self.forge.commit_date(sha.clone()).await?;

            releases.push(TaggedRelease {
                tag: release.tag_name,
                date,
                short_sha: short_sha(&sha),
            });
        }

        releases.sort_by_key(|release| release.date);

        info!("found {} tagged releases", releases.len());

        Ok(releases)
    }

    /// Pages through closed PRs, keeping merged ones. Pagination continues
    /// only while the page budget remains and the response advertises a
    /// next link; `num_pages` of zero means no budget.
    pub async fn fetch_merged_prs(
        &self,
        releases: &[TaggedRelease],
        num_pages: u64,
    ) -> Result<Vec<PullRecord>> {
        let mut pages_remaining = if num_pages == 0 {
            u64::MAX
        } else {
            num_pages
        };

        let mut records = vec![];
        let mut next = None;

        loop {
            let page = self.forge.closed_pulls_page(next.take()).await?;

            for pull in page.pulls {
                if pull.number == SKIPPED_PR {
                    continue;
                }

                if !pull.merged {
                    continue;
                }

                let Some(sha) = pull.merge_commit_sha.as_deref() else {
                    warn!(
                        "merged PR #{} has no merge commit sha: skipping",
                        pull.number
                    );
                    continue;
                };

                let level = LabelLevel::for_labels(
                    pull.labels.iter().map(String::as_str),
                );
                let author = credited_author(&pull)?;
                let release =
                    self.resolve_release(releases, &short_sha(sha))?;

                records.push(PullRecord {
                    number: pull.number,
                    author,
                    title: pull.title,
                    release,
                    level,
                });
            }

            pages_remaining -= 1;
            if pages_remaining == 0 {
                break;
            }

            match page.next {
                Some(url) => next = Some(url),
                None => break,
            }
        }

        info!("found {} merged PRs", records.len());

        Ok(records)
    }

    /// Formats each PR into one changelog line and appends it to the
    /// bucket selected by its label level, keyed by its release.
    pub fn classify(&self, prs: &[PullRecord]) -> ChangelogByRelease {
        let mut changelog = ChangelogByRelease::default();

        for pr in prs {
            let line = self.format_line(pr);
            let notes = changelog.bucket(&pr.release);

            match pr.level {
                LabelLevel::BreakingChange => {
                    notes.breaking_changes.push(line)
                }
                LabelLevel::MajorFeature => notes.major_features.push(line),
                LabelLevel::WithLabel => notes.with_labels.push(line),
                LabelLevel::NoLabel => notes.without_labels.push(line),
            }
        }

        changelog
    }

    /// The first release (ascending by date) whose tagged commit contains
    /// the PR's merge commit, or [`UNRELEASED`].
    fn resolve_release(
        &self,
        releases: &[TaggedRelease],
        pr_sha: &str,
    ) -> Result<String> {
        for release in releases {
            if self.ancestry.is_ancestor(pr_sha, &release.short_sha)? {
                return Ok(release.tag.clone());
            }
        }

        Ok(UNRELEASED.to_string())
    }

    fn format_line(&self, pr: &PullRecord) -> String {
        let num = format!(
            "[#{}]({}/{})",
            pr.number,
            self.repo.pulls_url(),
            pr.number
        );

        let title = truncate_title(&pr.title);

        let credit = if self.repo.maintainers.contains(&pr.author) {
            String::new()
        } else {
            format!(" [@{}](https://github.com/{})", pr.author, pr.author)
        };

        format!("- {} {}{}", num, title, credit)
    }
}

/// The body attribution marker wins over the submitting account, so
/// imported changes credit their original author.
fn credited_author(pull: &ForgePull) -> Result<String> {
    let re = Regex::new(r"author: ?@([A-Za-z\d-]+)")?;

    match re.captures(&pull.body) {
        Some(caps) => Ok(caps[1].to_string()),
        None => Ok(pull.submitter.clone()),
    }
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_LEN {
        let cut = title.chars().take(MAX_TITLE_LEN).collect::<String>();
        format!("{cut}...")
    } else {
        title.to_string()
    }
}

/// Renders the accumulated changelog as a Markdown document. Releases
/// appear in bucket insertion order; sections within a release appear in
/// breaking, major, other, unlabeled order.
pub fn render(
    changelog: &ChangelogByRelease,
    opts: &RenderOptions,
) -> String {
    let mut out = String::new();

    out.push_str("[//]: # (GENERATED FILE -- DO NOT EDIT!)\n");
    out.push_str(
        "[//]: # (Regenerate with the release-notes subcommand.)\n",
    );

    for (release, notes) in changelog.iter() {
        if release == UNRELEASED && !opts.output_unreleased {
            continue;
        }

        let mut print_other_changes_heading = false;

        out.push('\n');
        out.push_str(&format!("## {release}\n"));

        if !notes.breaking_changes.is_empty() {
            print_other_changes_heading = true;
            out.push_str("\n### Breaking Changes\n\n");
            for line in &notes.breaking_changes {
                out.push_str(line);
                out.push('\n');
            }
        }

        if !notes.major_features.is_empty() {
            print_other_changes_heading = true;
            out.push_str("\n### Major Features\n\n");
            for line in &notes.major_features {
                out.push_str(line);
                out.push('\n');
            }
        }

        if !notes.with_labels.is_empty() {
            out.push('\n');
            if print_other_changes_heading {
                out.push_str("### Other Changes\n\n");
            }
            for line in &notes.with_labels {
                out.push_str(line);
                out.push('\n');
            }
        }

        if !notes.without_labels.is_empty() && opts.output_without_labels {
            out.push_str("\n### Without Labels\n\n");
            for line in &notes.without_labels {
                out.push_str(line);
                out.push('\n');
            }
        }

        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use url::Url;

    use super::*;
    use crate::{
        changelog::ancestry::MockAncestry,
        forge::{
            traits::MockForge,
            types::{ForgePull, ForgeRelease, PullsPage},
        },
    };

    fn test_repo_config() -> RepoConfig {
        RepoConfig::default()
    }

    fn merged_pull(
        number: u64,
        title: &str,
        labels: &[&str],
        submitter: &str,
        sha: &str,
    ) -> ForgePull {
        ForgePull {
            number,
            title: title.to_string(),
            body: String::new(),
            labels: labels.iter().map(|label| label.to_string()).collect(),
            submitter: submitter.to_string(),
            merged: true,
            merge_commit_sha: Some(sha.to_string()),
        }
    }

    fn record(
        number: u64,
        author: &str,
        title: &str,
        release: &str,
        level: LabelLevel,
    ) -> PullRecord {
        PullRecord {
            number,
            author: author.to_string(),
            title: title.to_string(),
            release: release.to_string(),
            level,
        }
    }

    #[test]
    fn long_titles_are_truncated_with_ellipsis() {
        let title = "x".repeat(75);
        let truncated = truncate_title(&title);
        assert_eq!(truncated.len(), 73);
        assert_eq!(truncated, format!("{}...", "x".repeat(70)));
    }

    #[test]
    fn short_titles_render_unchanged() {
        let title = "y".repeat(70);
        assert_eq!(truncate_title(&title), title);
    }

    #[test]
    fn attribution_marker_overrides_submitter() {
        let mut pull =
            merged_pull(7, "import fix", &[], "wenbozhu", "abc1234");
        pull.body =
            "Imported from internal repo.\n\nauthor: @original-dev".into();

        assert_eq!(credited_author(&pull).unwrap(), "original-dev");
    }

    #[test]
    fn attribution_marker_without_space_is_accepted() {
        let mut pull = merged_pull(7, "fix", &[], "wenbozhu", "abc1234");
        pull.body = "author:@someone".into();

        assert_eq!(credited_author(&pull).unwrap(), "someone");
    }

    #[test]
    fn missing_attribution_marker_falls_back_to_submitter() {
        let pull = merged_pull(7, "fix", &[], "wenbozhu", "abc1234");
        assert_eq!(credited_author(&pull).unwrap(), "wenbozhu");
    }

    #[test]
    fn maintainers_never_get_a_credit_link() {
        let repo = test_repo_config();
        let forge = MockForge::new();
        let ancestry = MockAncestry::new();
        let aggregator = Aggregator::new(&forge, &ancestry, &repo);

        let pr = record(
            42,
            "stanley-cheung",
            "a fix",
            "1.0.0",
            LabelLevel::WithLabel,
        );
        let line = aggregator.format_line(&pr);

        assert_eq!(
            line,
            "- [#42](https://github.com/grpc/grpc-web/pull/42) a fix"
        );
    }

    #[test]
    fn outside_contributors_always_get_a_credit_link() {
        let repo = test_repo_config();
        let forge = MockForge::new();
        let ancestry = MockAncestry::new();
        let aggregator = Aggregator::new(&forge, &ancestry, &repo);

        let pr =
            record(42, "someone", "a fix", "1.0.0", LabelLevel::WithLabel);
        let line = aggregator.format_line(&pr);

        assert_eq!(
            line,
            "- [#42](https://github.com/grpc/grpc-web/pull/42) a fix \
             [@someone](https://github.com/someone)"
        );
    }

    #[tokio::test]
    async fn releases_sort_ascending_by_date() {
        let repo = test_repo_config();
        let ancestry = MockAncestry::new();
        let mut forge = MockForge::new();

        forge.expect_list_releases().returning(|| {
            Ok(vec![
                ForgeRelease {
                    tag_name: "1.1.0".into(),
                },
                ForgeRelease {
                    tag_name: "1.0.0".into(),
                },
            ])
        });

        forge.expect_resolve_tag_ref().returning(|tag| {
            Ok(match tag.as_str() {
                "1.0.0" => "a".repeat(40),
                _ => "b".repeat(40),
            })
        });

        forge.expect_commit_date().returning(|sha| {
            let date = if sha.starts_with('a') {
                "2020-01-01T00:00:00Z"
            } else {
                "2020-06-01T00:00:00Z"
            };
            Ok(DateTime::parse_from_rfc3339(date).unwrap())
        });

        let aggregator = Aggregator::new(&forge, &ancestry, &repo);
        let releases = aggregator.fetch_releases().await.unwrap();

        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].tag, "1.0.0");
        assert_eq!(releases[0].short_sha, "a".repeat(7));
        assert_eq!(releases[1].tag, "1.1.0");
    }

    #[tokio::test]
    async fn pagination_stops_at_page_budget() {
        let repo = test_repo_config();
        let ancestry = MockAncestry::new();
        let mut forge = MockForge::new();

        // Always advertises a next link; only the budget can stop us.
        forge.expect_closed_pulls_page().times(2).returning(|_| {
            Ok(PullsPage {
                pulls: vec![],
                next: Some(
                    Url::parse("https://api.github.com/pulls?page=2")
                        .unwrap(),
                ),
            })
        });

        let aggregator = Aggregator::new(&forge, &ancestry, &repo);
        let records = aggregator.fetch_merged_prs(&[], 2).await.unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn pagination_stops_when_no_next_link_is_advertised() {
        let repo = test_repo_config();
        let ancestry = MockAncestry::new();
        let mut forge = MockForge::new();

        forge.expect_closed_pulls_page().times(1).returning(|_| {
            Ok(PullsPage {
                pulls: vec![],
                next: None,
            })
        });

        let aggregator = Aggregator::new(&forge, &ancestry, &repo);
        let records = aggregator.fetch_merged_prs(&[], 20).await.unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn skips_pr_one_and_unmerged_prs() {
        let repo = test_repo_config();
        let mut ancestry = MockAncestry::new();
        let mut forge = MockForge::new();

        ancestry.expect_is_ancestor().returning(|_, _| Ok(false));

        forge.expect_closed_pulls_page().returning(|_| {
            let mut unmerged =
                merged_pull(9, "never landed", &[], "someone", "ddd1234");
            unmerged.merged = false;
            unmerged.merge_commit_sha = None;

            Ok(PullsPage {
                pulls: vec![
                    merged_pull(1, "initial import", &[], "someone", "eee1234"),
                    unmerged,
                    merged_pull(2, "real change", &[], "someone", "fff1234"),
                ],
                next: None,
            })
        });

        let aggregator = Aggregator::new(&forge, &ancestry, &repo);
        let records = aggregator.fetch_merged_prs(&[], 20).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].number, 2);
        assert_eq!(records[0].release, UNRELEASED);
    }

    /// Three releases, five merged PRs with varying labels, one body
    /// attribution override: the full fetch/classify/render pipeline.
    #[test_log::test(tokio::test)]
    async fn end_to_end_groups_and_renders() {
        let repo = test_repo_config();
        let mut forge = MockForge::new();
        let mut ancestry = MockAncestry::new();

        forge.expect_list_releases().returning(|| {
            Ok(vec![
                ForgeRelease {
                    tag_name: "1.2.0".into(),
                },
                ForgeRelease {
                    tag_name: "1.0.0".into(),
                },
                ForgeRelease {
                    tag_name: "1.1.0".into(),
                },
            ])
        });

        forge.expect_resolve_tag_ref().returning(|tag| {
            Ok(match tag.as_str() {
                "1.0.0" => "a".repeat(40),
                "1.1.0" => "b".repeat(40),
                _ => "c".repeat(40),
            })
        });

        forge.expect_commit_date().returning(|sha| {
            let date = match &sha[..1] {
                "a" => "2020-01-01T00:00:00Z",
                "b" => "2020-06-01T00:00:00Z",
                _ => "2021-01-01T00:00:00Z",
            };
            Ok(DateTime::parse_from_rfc3339(date).unwrap())
        });

        forge.expect_closed_pulls_page().returning(|_| {
            let long_title = format!("breaking change {}", "z".repeat(60));

            let mut imported = merged_pull(
                3,
                "imported major feature",
                &["release notes: major"],
                "stanley-cheung",
                &"3".repeat(40),
            );
            imported.body = "author: @original-dev".into();

            Ok(PullsPage {
                pulls: vec![
                    merged_pull(
                        2,
                        &long_title,
                        &["release notes: breaking"],
                        "outside-dev",
                        &"2".repeat(40),
                    ),
                    imported,
                    merged_pull(
                        4,
                        "another breaking change",
                        &["release notes: yes", "release notes: breaking"],
                        "wenbozhu",
                        &"4".repeat(40),
                    ),
                    merged_pull(
                        5,
                        "small fix",
                        &["release notes: yes"],
                        "fengli79",
                        &"5".repeat(40),
                    ),
                    merged_pull(
                        6,
                        "unlabeled cleanup",
                        &[],
                        "drive-by",
                        &"6".repeat(40),
                    ),
                ],
                next: None,
            })
        });

        // PRs 2 and 3 landed before 1.0.0; PRs 4 and 5 between 1.0.0 and
        // 1.1.0; PR 6 is not contained in any tag.
        ancestry.expect_is_ancestor().returning(
            |ancestor, descendant| {
                Ok(match ancestor {
                    "2222222" | "3333333" => true,
                    "4444444" | "5555555" => {
                        descendant == "b".repeat(7)
                            || descendant == "c".repeat(7)
                    }
                    _ => false,
                })
            },
        );

        let aggregator = Aggregator::new(&forge, &ancestry, &repo);
        let changelog = aggregator.run(20).await.unwrap();

        let releases = changelog
            .iter()
            .map(|(release, _)| release.to_string())
            .collect::<Vec<String>>();
        assert_eq!(releases, vec!["1.0.0", "1.1.0", "Unreleased"]);

        // default options: no Unreleased section, no unlabeled section
        let doc = render(&changelog, &RenderOptions::default());

        assert!(doc.starts_with("[//]: # (GENERATED FILE -- DO NOT EDIT!)"));
        assert!(doc.contains("## 1.0.0"));
        assert!(doc.contains("## 1.1.0"));
        assert!(!doc.contains("## Unreleased"));
        assert!(!doc.contains("### Without Labels"));

        // attribution override credited, submitter not
        assert!(doc.contains("[@original-dev](https://github.com/original-dev)"));
        assert!(!doc.contains("@stanley-cheung"));

        // long title cut at 70 chars
        let expected_cut =
            format!("breaking change {}...", "z".repeat(70 - 16));
        assert!(doc.contains(&expected_cut));

        // sections appear in breaking -> major -> other order per release
        let v100 = doc.find("## 1.0.0").unwrap();
        let v110 = doc.find("## 1.1.0").unwrap();
        assert!(v100 < v110);

        let breaking = doc[v100..v110].find("### Breaking Changes").unwrap();
        let major = doc[v100..v110].find("### Major Features").unwrap();
        assert!(breaking < major);

        // 1.1.0 has breaking + labeled lines, so the labeled lines get the
        // Other Changes heading
        let other = doc[v110..].find("### Other Changes").unwrap();
        let breaking_110 = doc[v110..].find("### Breaking Changes").unwrap();
        assert!(breaking_110 < other);
        assert!(doc.contains("- [#5](https://github.com/grpc/grpc-web/pull/5) small fix"));

        // opt in to both suppressed sections
        let full = render(
            &changelog,
            &RenderOptions {
                output_unreleased: true,
                output_without_labels: true,
            },
        );
        assert!(full.contains("## Unreleased"));
        assert!(full.contains("### Without Labels"));
        assert!(full.contains(
            "- [#6](https://github.com/grpc/grpc-web/pull/6) unlabeled cleanup \
             [@drive-by](https://github.com/drive-by)"
        ));
    }

    #[test]
    fn other_changes_heading_requires_a_higher_section() {
        let repo = test_repo_config();
        let forge = MockForge::new();
        let ancestry = MockAncestry::new();
        let aggregator = Aggregator::new(&forge, &ancestry, &repo);

        // only labeled lines: no Other Changes heading
        let changelog = aggregator.classify(&[record(
            10,
            "fengli79",
            "labeled only",
            "1.0.0",
            LabelLevel::WithLabel,
        )]);
        let doc = render(&changelog, &RenderOptions::default());
        assert!(!doc.contains("### Other Changes"));
        assert!(doc.contains("labeled only"));

        // breaking + labeled: heading appears
        let changelog = aggregator.classify(&[
            record(
                11,
                "fengli79",
                "breaks things",
                "1.0.0",
                LabelLevel::BreakingChange,
            ),
            record(
                12,
                "fengli79",
                "labeled",
                "1.0.0",
                LabelLevel::WithLabel,
            ),
        ]);
        let doc = render(&changelog, &RenderOptions::default());
        assert!(doc.contains("### Other Changes"));
    }
}
