//! Configuration loading and parsing for `devtools.toml` files.
//!
//! Every field is optional: a missing file or a partial file falls back to
//! the defaults below, which match the layout of the grpc-web repository.
use std::path::Path;

use log::*;
use serde::Deserialize;

use crate::result::Result;

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "devtools.toml";

/// Directory in which test HTML files are generated.
pub const DEFAULT_GENERATED_TEST_DIR: &str = "generated/test_htmls/";

/// Test HTML wrapper generation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TestgenConfig {
    /// Directories scanned for `*_test.js` sources.
    pub source_dirs: Vec<String>,
    /// Tera template for the test wrapper HTML.
    pub template: String,
    /// Output directory for generated test HTML files.
    pub out_dir: String,
}

impl Default for TestgenConfig {
    fn default() -> Self {
        Self {
            source_dirs: vec!["../../javascript".to_string()],
            template: "./templates/test_html.tera".to_string(),
            out_dir: DEFAULT_GENERATED_TEST_DIR.to_string(),
        }
    }
}

/// Test manifest (all_tests.js) generation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Tera template for the manifest script.
    pub template: String,
    /// Path of the generated manifest file.
    pub out_path: String,
    /// Prefix joined onto each generated HTML path. The test web server
    /// hosts the repository root, so entries must be repo-root relative.
    pub base_dir: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            template: "./templates/all_tests_js.tera".to_string(),
            out_path: "./generated/all_tests.js".to_string(),
            base_dir: "packages/grpc-web".to_string(),
        }
    }
}

/// Repository coordinates and maintainer list for the changelog tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    pub owner: String,
    pub name: String,
    /// Authors in this list never get an appended credit link.
    pub maintainers: Vec<String>,
}

impl RepoConfig {
    /// Base URL for PR links in the rendered changelog.
    pub fn pulls_url(&self) -> String {
        format!("https://github.com/{}/{}/pull", self.owner, self.name)
    }
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            owner: "grpc".to_string(),
            name: "grpc-web".to_string(),
            maintainers: vec![
                "stanley-cheung".to_string(),
                "fengli79".to_string(),
                "vnorigoog".to_string(),
                "wenbozhu".to_string(),
                "jtattermusch".to_string(),
                "srini100".to_string(),
                "hsaliak".to_string(),
            ],
        }
    }
}

/// Root configuration structure for `devtools.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub testgen: TestgenConfig,
    pub manifest: ManifestConfig,
    pub repo: RepoConfig,
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("no configuration found at {}: using default", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }
}
