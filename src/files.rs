//! Filesystem helpers shared by the generators: suffix-filtered directory
//! scanning and context-wrapped read/write.

use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::eyre::Context;
use walkdir::WalkDir;

use crate::result::Result;

/// Lazily yields files under `root` (recursive) whose file names end with
/// `suffix`, in filesystem enumeration order. A missing root surfaces the
/// underlying I/O error once the iterator is driven.
pub fn files_with_suffix<'a>(
    root: &Path,
    suffix: &'a str,
) -> impl Iterator<Item = walkdir::Result<PathBuf>> + 'a {
    WalkDir::new(root).into_iter().filter_map(move |entry| {
        match entry {
            Err(err) => Some(Err(err)),
            Ok(entry) => {
                if entry.file_type().is_file()
                    && entry.file_name().to_string_lossy().ends_with(suffix)
                {
                    Some(Ok(entry.into_path()))
                } else {
                    None
                }
            }
        }
    })
}

/// Collects [`files_with_suffix`] into a Vec, failing on the first
/// enumeration error.
pub fn collect_files_with_suffix(
    root: &Path,
    suffix: &str,
) -> Result<Vec<PathBuf>> {
    let mut paths = vec![];

    for entry in files_with_suffix(root, suffix) {
        let path = entry.wrap_err_with(|| {
            format!("failed to scan directory: {}", root.display())
        })?;
        paths.push(path);
    }

    Ok(paths)
}

/// Reads the content of a file.
pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read file: {}", path.display()))
}

/// Writes a string to a file, overwriting existing content; intermediate
/// directories are created if not present.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).wrap_err_with(|| {
            format!("failed to create directory: {}", dir.display())
        })?;
    }

    fs::write(path, content)
        .wrap_err_with(|| format!("failed to write file: {}", path.display()))
}
