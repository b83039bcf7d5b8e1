//! Rewriting relative `url(...)` references in stylesheets
//!
//! Concatenated stylesheets move from their source directories into the
//! target's output directory. A reference like `url(img/x.png)` written in
//! `a/b/style.css` must point at `a/b/img/x.png` from `a/c/` afterwards,
//! i.e. become `url(../b/img/x.png)`.
//!
//! Content is scanned as bytes. Stylesheets in legacy encodings pass through
//! unchanged apart from the references themselves.

use std::path::{Component, Path};
use std::sync::LazyLock;

use path_clean::PathClean;
use regex::bytes::{Captures, Regex};
use tracing::warn;

/// `url(...)` with a double quoted, single quoted or bare argument
#[allow(clippy::expect_used)]
static URL_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^'"()\s][^'"()]*?))\s*\)"#)
        .expect("url pattern is valid")
});

/// Rewrite every relative `url(...)` in `content` written in `source_dir`
/// so that it resolves the same way from `output_dir`
///
/// References with a scheme (`http:`, `data:`, ...), protocol-relative or
/// root-absolute references and bare fragments are left untouched. The
/// original quoting is kept.
///
/// Both directories must be absolute, or both relative to the same base.
/// When no relative path from `output_dir` to `source_dir` exists the
/// content is returned unchanged.
pub fn rewrite_references(content: &[u8], source_dir: &Path, output_dir: &Path) -> Vec<u8> {
    let Some(prefix) = relocation_prefix(source_dir, output_dir) else {
        warn!(
            source = %source_dir.display(),
            output = %output_dir.display(),
            "cannot relate stylesheet directory to output directory, references left as is"
        );
        return content.to_vec();
    };

    URL_REFERENCE
        .replace_all(content, |caps: &Captures<'_>| {
            let (argument, quote) = if let Some(m) = caps.get(1) {
                (m.as_bytes(), "\"")
            } else if let Some(m) = caps.get(2) {
                (m.as_bytes(), "'")
            } else {
                (caps.get(3).map_or(&b""[..], |m| m.as_bytes()), "")
            };

            match std::str::from_utf8(argument) {
                Ok(reference) if is_relative_reference(reference) => {
                    format!("url({quote}{}{quote})", relocate(&prefix, reference)).into_bytes()
                }
                _ => caps[0].to_vec(),
            }
        })
        .into_owned()
}

/// Whether a reference is relative to the stylesheet's own directory
fn is_relative_reference(reference: &str) -> bool {
    let reference = reference.trim();
    if reference.is_empty() || reference.starts_with('/') || reference.starts_with('#') {
        return false;
    }
    !has_scheme(reference)
}

/// `scheme:` per RFC 3986: a letter followed by letters, digits, `+`, `-` or `.`
fn has_scheme(reference: &str) -> bool {
    let Some((scheme, _)) = reference.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Segments leading from `output_dir` back to `source_dir`
///
/// One `..` per output component below the common prefix, then the source
/// components below it. `None` when `output_dir` climbs out of the common
/// prefix or only `output_dir` is absolute.
fn relocation_prefix(source_dir: &Path, output_dir: &Path) -> Option<Vec<String>> {
    let relative = pathdiff::diff_paths(source_dir.clean(), output_dir.clean())?;
    Some(
        relative
            .components()
            .filter_map(|component| match component {
                Component::ParentDir => Some("..".to_string()),
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect(),
    )
}

/// Append the reference's segments to `prefix`
///
/// A `..` in the reference pops the last real directory off the prefix
/// instead of climbing twice.
fn relocate(prefix: &[String], reference: &str) -> String {
    let mut segments: Vec<&str> = prefix.iter().map(String::as_str).collect();

    for segment in reference.trim().split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    segments.join("/")
}
