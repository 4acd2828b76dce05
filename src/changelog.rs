//! Release notes aggregation: fetch releases and merged PRs, classify each
//! PR by release and label level, and render a grouped Markdown changelog.

pub mod aggregator;
pub mod ancestry;
pub mod types;

pub use aggregator::{Aggregator, RenderOptions, render};
