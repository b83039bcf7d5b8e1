//! Building target output files
//!
//! For one target and one resource kind:
//!
//! ```text
//! member files --concat--> .assetpack-XXXX.js --compress--> .assetpack-XXXX.min.js
//!                                                              |
//!                                          hash, apply pattern, rename
//!                                                              v
//!                                                        all-3f2a...js
//! ```
//!
//! The concatenation artifact is a temporary file and is removed once the
//! compressor has run.

pub mod compress;
pub mod concat;
pub mod rewrite;

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::{ResourceKind, TargetBundle};
use crate::error::{
    Result, compression_failed, compressor_timeout, file_write_failed, unknown_bundle,
};
use crate::hash::{apply_pattern, content_hash};
use crate::resolver::ResolvedBundles;

use compress::CompressFailure;
pub use compress::Compressor;

/// Directory a target's files are written to, relative paths taken from `root`
pub fn output_dir(target: &TargetBundle, root: &Path) -> PathBuf {
    root.join(&target.out_dir)
}

/// Every member file of `kind`, in the target's member order
///
/// # Errors
///
/// Returns `AssetError::UnknownBundle` for a member missing from `resolved`.
pub fn member_files(
    target: &TargetBundle,
    kind: ResourceKind,
    resolved: &ResolvedBundles,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for member in &target.depends {
        let bundle = resolved
            .get(member)
            .ok_or_else(|| unknown_bundle(member.clone()))?;
        files.extend(bundle.qualified_files(kind));
    }
    Ok(files)
}

/// Build the output file of `kind` for `target`
///
/// Returns `None` when the target has no pattern for `kind`, and an empty
/// list when none of its members carry files of that kind. Otherwise the
/// single output file name, relative to the output directory.
///
/// # Errors
///
/// - `AssetError::UnknownBundle` for a member missing from `resolved`
/// - `AssetError::FileReadFailed` / `FileWriteFailed` on file system errors
/// - `AssetError::CompressionFailed` if the compressor fails or leaves no
///   readable output
/// - `AssetError::CompressorTimeout` if the compressor runs too long
pub fn build_target_kind(
    target: &TargetBundle,
    kind: ResourceKind,
    resolved: &ResolvedBundles,
    compressor: &dyn Compressor,
    root: &Path,
) -> Result<Option<Vec<String>>> {
    let Some(pattern) = target.pattern(kind) else {
        debug!(name = %target.name, %kind, "no pattern, skipping");
        return Ok(None);
    };

    let files = member_files(target, kind, resolved)?;
    if files.is_empty() {
        debug!(name = %target.name, %kind, "no member files, nothing to build");
        return Ok(Some(Vec::new()));
    }

    let out_dir = output_dir(target, root);
    std::fs::create_dir_all(&out_dir).map_err(|e| file_write_failed(&out_dir, e))?;

    let mut artifact = tempfile::Builder::new()
        .prefix(".assetpack-")
        .suffix(&format!(".{}", kind.extension()))
        .tempfile_in(&out_dir)
        .map_err(|e| file_write_failed(&out_dir, e))?;
    let artifact_path = artifact.path().to_path_buf();
    {
        let mut writer = BufWriter::new(artifact.as_file_mut());
        concat::concatenate(&files, kind, &out_dir, &mut writer, &artifact_path)?;
    }

    let compressed = artifact_path.with_extension(format!("min.{}", kind.extension()));
    debug!(
        name = %target.name,
        %kind,
        files = files.len(),
        compressor = %compressor.describe(),
        "compressing"
    );
    let outcome = compressor
        .compress(std::slice::from_ref(&artifact_path), &compressed)
        .map_err(|failure| match failure {
            CompressFailure::TimedOut { command, seconds } => compressor_timeout(command, seconds),
            CompressFailure::Failed(reason) => {
                compression_failed(&target.name, compressed.display().to_string(), reason)
            }
        })
        .and_then(|()| finish(target, pattern, &compressed, &out_dir));

    if outcome.is_err() {
        let _ = std::fs::remove_file(&compressed);
    }
    drop(artifact);

    let file_name = outcome?;
    info!(name = %target.name, %kind, file = %file_name, "built");
    Ok(Some(vec![file_name]))
}

/// Hash the compressed output and move it to its final name
fn finish(target: &TargetBundle, pattern: &str, compressed: &Path, out_dir: &Path) -> Result<String> {
    if !compressed.is_file() {
        return Err(compression_failed(
            &target.name,
            compressed.display().to_string(),
            "compressor produced no output file",
        ));
    }

    let hash = content_hash(compressed).map_err(|e| {
        compression_failed(&target.name, compressed.display().to_string(), e.to_string())
    })?;
    let file_name = apply_pattern(pattern, &hash);
    let final_path = out_dir.join(&file_name);

    if let Some(parent) = final_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| file_write_failed(parent, e))?;
    }
    std::fs::rename(compressed, &final_path).map_err(|e| file_write_failed(&final_path, e))?;

    Ok(file_name)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::bundler::compress::FnCompressor;
    use crate::domain::SourceBundle;
    use crate::error::AssetError;
    use crate::hash::HASH_LENGTH;
    use crate::registry::DefinitionRegistry;
    use crate::resolver::resolve;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        resolved: ResolvedBundles,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().expect("temp dir");
        let core_dir = temp.path().join("src/core");
        let widgets_dir = temp.path().join("src/widgets");
        std::fs::create_dir_all(&core_dir).expect("core dir");
        std::fs::create_dir_all(&widgets_dir).expect("widgets dir");
        std::fs::write(core_dir.join("core.js"), "var core = 1;\n").expect("core.js");
        std::fs::write(widgets_dir.join("widgets.js"), "var widgets = 2;\n").expect("widgets.js");
        std::fs::write(widgets_dir.join("widgets.css"), ".w { background: url(w.png) }\n")
            .expect("widgets.css");

        let mut core = SourceBundle::new("core", &core_dir);
        core.scripts = vec![PathBuf::from("core.js")];
        let mut widgets = SourceBundle::new("widgets", &widgets_dir);
        widgets.scripts = vec![PathBuf::from("widgets.js")];
        widgets.styles = vec![PathBuf::from("widgets.css")];
        widgets.depends = vec!["core".to_string()];

        let registry = DefinitionRegistry::from_bundles([core, widgets]).expect("registry");
        let resolved = resolve(&["widgets".to_string()], &registry).expect("resolve");

        Fixture { temp, resolved }
    }

    fn target(depends: &[&str]) -> TargetBundle {
        TargetBundle {
            name: "all".to_string(),
            depends: depends.iter().map(|d| (*d).to_string()).collect(),
            out_dir: "public/build".to_string(),
            out_url: "/build".to_string(),
            script_pattern: Some("all-{hash}.js".to_string()),
            style_pattern: Some("all-{hash}.css".to_string()),
            script_files: Vec::new(),
            style_files: Vec::new(),
        }
    }

    fn output_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("read output dir")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_builds_hashed_file_in_member_order() {
        let fx = fixture();
        let target = target(&["core", "widgets"]);

        let files = build_target_kind(
            &target,
            ResourceKind::Script,
            &fx.resolved,
            &FnCompressor::passthrough(),
            fx.temp.path(),
        )
        .expect("build should succeed")
        .expect("script pattern is set");

        assert_eq!(files.len(), 1);
        let name = &files[0];
        assert!(name.starts_with("all-") && name.ends_with(".js"));
        assert_eq!(name.len(), "all-.js".len() + HASH_LENGTH);

        let out_dir = fx.temp.path().join("public/build");
        let content = std::fs::read_to_string(out_dir.join(name)).expect("output");
        let core_at = content.find("var core").expect("core content");
        let widgets_at = content.find("var widgets").expect("widgets content");
        assert!(core_at < widgets_at);

        let hash = content_hash(&out_dir.join(name)).expect("hash");
        assert_eq!(name, &format!("all-{hash}.js"));
        assert_eq!(output_entries(&out_dir), vec![name.clone()]);
    }

    #[test]
    fn test_style_references_follow_output_dir() {
        let fx = fixture();

        let files = build_target_kind(
            &target(&["core", "widgets"]),
            ResourceKind::Style,
            &fx.resolved,
            &FnCompressor::passthrough(),
            fx.temp.path(),
        )
        .expect("build should succeed")
        .expect("style pattern is set");

        let content = std::fs::read_to_string(fx.temp.path().join("public/build").join(&files[0]))
            .expect("output");
        assert!(content.contains("url(../../src/widgets/w.png)"));
    }

    #[test]
    fn test_no_pattern_skips() {
        let fx = fixture();
        let mut target = target(&["core"]);
        target.style_pattern = None;

        let files = build_target_kind(
            &target,
            ResourceKind::Style,
            &fx.resolved,
            &FnCompressor::passthrough(),
            fx.temp.path(),
        )
        .expect("should skip");

        assert!(files.is_none());
        assert!(!fx.temp.path().join("public/build").exists());
    }

    #[test]
    fn test_no_member_files_builds_nothing() {
        let fx = fixture();

        let files = build_target_kind(
            &target(&["core"]),
            ResourceKind::Style,
            &fx.resolved,
            &FnCompressor::passthrough(),
            fx.temp.path(),
        )
        .expect("should succeed");

        assert_eq!(files, Some(Vec::new()));
    }

    #[test]
    fn test_unknown_member() {
        let fx = fixture();

        let err = build_target_kind(
            &target(&["core", "forms"]),
            ResourceKind::Script,
            &fx.resolved,
            &FnCompressor::passthrough(),
            fx.temp.path(),
        )
        .expect_err("unknown member should fail");

        assert!(matches!(err, AssetError::UnknownBundle { name } if name == "forms"));
    }

    #[test]
    fn test_missing_output_is_compression_error() {
        let fx = fixture();
        let lazy = FnCompressor::new("lazy", |_, _| Ok(()));

        let err = build_target_kind(
            &target(&["core"]),
            ResourceKind::Script,
            &fx.resolved,
            &lazy,
            fx.temp.path(),
        )
        .expect_err("missing output should fail");

        assert!(matches!(err, AssetError::CompressionFailed { target, .. } if target == "all"));
        assert!(output_entries(&fx.temp.path().join("public/build")).is_empty());
    }

    #[test]
    fn test_compressor_receives_concatenated_artifact() {
        let fx = fixture();
        let recorded = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = recorded.clone();
        let compressor = FnCompressor::new("recorder", move |inputs, output| {
            sink.lock().expect("lock").extend(inputs.iter().cloned());
            std::fs::copy(&inputs[0], output).map(|_| ())
        });

        build_target_kind(
            &target(&["core", "widgets"]),
            ResourceKind::Script,
            &fx.resolved,
            &compressor,
            fx.temp.path(),
        )
        .expect("build should succeed");

        let inputs = recorded.lock().expect("lock");
        assert_eq!(inputs.len(), 1);
        assert!(!inputs[0].exists(), "artifact should be removed");
    }
}
