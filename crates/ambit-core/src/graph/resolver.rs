//! Node-style module resolution.
//!
//! Resolves import specifiers the way the Node.js loader does, minus
//! conditional exports: relative/absolute paths with extension and index
//! probing, bare specifiers through ancestor `node_modules` directories,
//! scoped packages, subpath imports, and package.json `main`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::registry::is_core_module;

/// Extensions probed, in order, when a specifier omits one.
const RESOLVE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "ts", "tsx", "jsx"];

/// Outcome of resolving one specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A source file to walk.
    Source(PathBuf),
    /// A Node core module; terminates traversal.
    CoreModule,
    /// Unresolvable or non-source; skipped with a warning by the walker.
    Skipped,
}

/// Resolves specifiers relative to importing files.
pub struct ModuleResolver;

impl ModuleResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, specifier: &str, importer_dir: &Path) -> Resolution {
        if is_core_module(specifier) {
            return Resolution::CoreModule;
        }

        if specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
        {
            let base = if specifier.starts_with('/') {
                PathBuf::from(specifier)
            } else {
                importer_dir.join(specifier)
            };
            return match resolve_file(&base) {
                Some(path) => Resolution::Source(path),
                None => {
                    debug!(specifier, importer = %importer_dir.display(), "unresolved relative import");
                    Resolution::Skipped
                }
            };
        }

        self.resolve_package(specifier, importer_dir)
    }

    /// Bare specifier: walk ancestor directories looking for
    /// `node_modules/<package>`.
    fn resolve_package(&self, specifier: &str, importer_dir: &Path) -> Resolution {
        let (package, subpath) = split_package_specifier(specifier);
        if package.is_empty() {
            return Resolution::Skipped;
        }

        let mut dir = Some(importer_dir);
        while let Some(current) = dir {
            let package_dir = current.join("node_modules").join(package);
            if package_dir.is_dir() {
                let resolved = match subpath {
                    Some(sub) => resolve_file(&package_dir.join(sub)),
                    None => package_entry(&package_dir),
                };
                return match resolved {
                    Some(path) => Resolution::Source(path),
                    None => {
                        debug!(specifier, "package found but entry did not resolve");
                        Resolution::Skipped
                    }
                };
            }
            dir = current.parent();
        }

        debug!(specifier, importer = %importer_dir.display(), "unresolved package import");
        Resolution::Skipped
    }
}

impl Default for ModuleResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a bare specifier into package name and optional subpath, honoring
/// `@scope/name` specifiers.
fn split_package_specifier(specifier: &str) -> (&str, Option<&str>) {
    let segments = if specifier.starts_with('@') { 2 } else { 1 };
    let mut index = 0;
    for _ in 0..segments {
        match specifier[index..].find('/') {
            Some(offset) => index += offset + 1,
            None => return (specifier, None),
        }
    }
    (&specifier[..index - 1], Some(&specifier[index..]))
}

/// Resolve the entry point of a package directory: package.json `main`,
/// falling back to `index.js`.
pub fn package_entry(package_dir: &Path) -> Option<PathBuf> {
    let manifest_path = package_dir.join("package.json");
    if let Ok(raw) = fs::read_to_string(&manifest_path) {
        if let Ok(manifest) = serde_json::from_str::<serde_json::Value>(&raw) {
            if let Some(main) = manifest.get("main").and_then(|m| m.as_str()) {
                if let Some(path) = resolve_file(&package_dir.join(main)) {
                    return Some(path);
                }
            }
        }
    }
    resolve_file(&package_dir.join("index"))
}

/// Probe a base path as Node does: the exact file, then appended
/// extensions, then directory entry points.
fn resolve_file(base: &Path) -> Option<PathBuf> {
    if base.is_file() {
        return Some(canonical(base));
    }

    let raw = base.to_string_lossy();
    for ext in RESOLVE_EXTENSIONS {
        let candidate = PathBuf::from(format!("{raw}.{ext}"));
        if candidate.is_file() {
            return Some(canonical(&candidate));
        }
    }

    if base.is_dir() {
        // a directory can carry its own package.json (nested entry points)
        let manifest_path = base.join("package.json");
        if manifest_path.is_file() {
            return package_entry(base);
        }
        for ext in RESOLVE_EXTENSIONS {
            let candidate = base.join(format!("index.{ext}"));
            if candidate.is_file() {
                return Some(canonical(&candidate));
            }
        }
    }

    None
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
