//! Concatenation of member files into one artifact

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::bundler::rewrite::rewrite_references;
use crate::domain::ResourceKind;
use crate::error::{Result, file_read_failed, file_write_failed};

/// Marker written before a file's content
pub fn begin_marker(path: &Path) -> String {
    format!("/* ==> {} <== */\n", path.display())
}

/// Marker written after a file's content
pub fn end_marker(path: &Path) -> String {
    format!("/* <== {} ==> */\n", path.display())
}

/// Write `files` to `writer`, each wrapped in begin/end markers
///
/// Stylesheet content has its relative references rewritten so they resolve
/// from `output_dir`. `artifact` names the destination in write errors.
///
/// # Errors
///
/// Returns `AssetError::FileReadFailed` for an unreadable member file and
/// `AssetError::FileWriteFailed` when writing fails.
pub fn concatenate<W: Write>(
    files: &[PathBuf],
    kind: ResourceKind,
    output_dir: &Path,
    writer: &mut W,
    artifact: &Path,
) -> Result<()> {
    for file in files {
        let content = std::fs::read(file).map_err(|e| file_read_failed(file, e))?;

        let content = if kind.rewrites_references() {
            let source_dir = file.parent().unwrap_or_else(|| Path::new(""));
            rewrite_references(&content, source_dir, output_dir)
        } else {
            content
        };

        writer
            .write_all(begin_marker(file).as_bytes())
            .and_then(|()| writer.write_all(&content))
            .and_then(|()| {
                if content.ends_with(b"\n") {
                    Ok(())
                } else {
                    writer.write_all(b"\n")
                }
            })
            .and_then(|()| writer.write_all(end_marker(file).as_bytes()))
            .map_err(|e| file_write_failed(artifact, e))?;
    }

    writer.flush().map_err(|e| file_write_failed(artifact, e))
}
