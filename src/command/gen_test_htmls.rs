//! Generates *_test.html files from *_test.js files.
use std::path::Path;

use color_eyre::eyre::Context;
use log::*;

use crate::{
    cli,
    config::{Config, TestgenConfig},
    files, template, testgen,
    result::Result,
};

pub fn execute(args: &cli::Args) -> Result<()> {
    let config = Config::load(&args.config)?;
    run(&config.testgen)
}

/// Scans the configured source directories and generates one Closure test
/// wrapper HTML per `*_test.js` file. Re-running with unchanged inputs
/// reproduces byte-identical output.
pub fn run(config: &TestgenConfig) -> Result<()> {
    let template_data = files::read_file(Path::new(&config.template))?;

    for directory in &config.source_dirs {
        for entry in
            files::files_with_suffix(Path::new(directory), "_test.js")
        {
            let js_file_path = entry.wrap_err_with(|| {
                format!("failed to scan test directory: {directory}")
            })?;
            gen_test_html(&js_file_path, &template_data, config)?;
        }
    }

    Ok(())
}

/// Generates a Closure test wrapper HTML and saves it to the filesystem.
fn gen_test_html(
    js_file_path: &Path,
    template_data: &str,
    config: &TestgenConfig,
) -> Result<()> {
    let source = files::read_file(js_file_path)?;
    let package = testgen::closure_namespace(js_file_path, &source)?;

    let context = template::context_from([("package", package.as_str())]);
    let generated_html = template::render(template_data, &context)?;

    let out_path = Path::new(&config.out_dir)
        .join(testgen::html_file_name(js_file_path));

    debug!("writing {}", out_path.display());

    files::write_file(&out_path, &generated_html)
}
