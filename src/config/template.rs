//! Template configuration written by `assetpack init`

/// Commented starting point for a new project
pub const TEMPLATE: &str = r"# assetpack build configuration

# Source bundles to build. Their dependencies are pulled in automatically.
bundles:
  - app

# Bundle definitions: a separate file, inline definitions, or both.
# registry: bundles.yaml
definitions:
  core:
    baseDir: assets/core
    scripts: [core.js]
    styles: [core.css]
  app:
    baseDir: assets/app
    scripts: [app.js]
    styles: [app.css]
    depends: [core]

# Output targets. A target without 'depends' absorbs every bundle no other
# target claims; at most one target may do so.
targets:
  site:
    outDir: public/build
    outUrl: /build
    scriptPattern: site-{hash}.min.js
    stylePattern: site-{hash}.min.css

# Shell commands run on the concatenated file. Leave unset to copy as-is.
# scriptCompressor: terser {from} -c -m -o {to}
# styleCompressor: lightningcss --minify {from} -o {to}

# Seconds a single compressor run may take.
compressTimeout: 300
";
