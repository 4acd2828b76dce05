//! Closure test wrapper generation: namespace extraction from JS test
//! sources and output-name derivation.

use std::path::Path;

use regex::Regex;

use crate::error::{DevtoolsError, Result};

/// Extracts the Closure namespace from the first `goog.provide()` or
/// `goog.module()` declaration in a JS source. `path` is only used for
/// error reporting.
pub fn closure_namespace(path: &Path, source: &str) -> Result<String> {
    let re = Regex::new(r"goog\.(provide|module)\(\s*'([^']+)'\);")?;

    match re.captures(source) {
        Some(caps) => Ok(caps[2].to_string()),
        None => Err(DevtoolsError::missing_declaration(path)),
    }
}

/// Derives the generated HTML file name from a test source path so that
/// `../../javascript/net/grpc/web/grpcwebclientbase_test.js` becomes
/// `javascript__net__grpc__web__grpcwebclientbase_test.html`.
pub fn html_file_name(js_file_path: &Path) -> String {
    // Backslash paths flatten the same way as forward-slash paths.
    let mut name = js_file_path.to_string_lossy().replace('\\', "/");

    while let Some(stripped) = name.strip_prefix("../") {
        name = stripped.to_string();
    }

    let name = name.replace('/', "__");
    let stem = name.strip_suffix(".js").unwrap_or(&name);

    format!("{stem}.html")
}
