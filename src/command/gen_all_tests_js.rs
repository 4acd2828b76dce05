//! Generates the all_tests.js manifest for consumption by the browser
//! test runner. Expects gen-test-htmls to have run first.
use std::path::Path;

use log::*;

use crate::{cli, config::Config, files, template, result::Result};

pub fn execute(args: &cli::Args) -> Result<()> {
    let config = Config::load(&args.config)?;
    run(&config)
}

/// Scans the generated test HTML directory and writes the manifest listing
/// every test page. Entry order follows filesystem enumeration order and
/// is not guaranteed to be stable across platforms.
pub fn run(config: &Config) -> Result<()> {
    let template_data =
        files::read_file(Path::new(&config.manifest.template))?;

    let mut test_html_paths = vec![];

    for path in files::collect_files_with_suffix(
        Path::new(&config.testgen.out_dir),
        "_test.html",
    )? {
        let path = path.to_string_lossy().replace('\\', "/");
        test_html_paths
            .push(format!("  '{}/{}',", config.manifest.base_dir, path));
    }

    info!("manifest lists {} test pages", test_html_paths.len());

    let joined = test_html_paths.join("\n");
    let context = template::context_from([("test_html_paths", joined.as_str())]);
    let manifest = template::render(&template_data, &context)?;

    files::write_file(Path::new(&config.manifest.out_path), &manifest)
}
