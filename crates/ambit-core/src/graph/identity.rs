//! Normalized module identity.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Deduplication-ready key for one logical module.
///
/// Everything up to and including the last `node_modules/` marker is
/// stripped, so duplicate physical installs of one logical dependency
/// (hoisted vs. nested) coalesce onto the same identity. Paths outside
/// `node_modules` are made relative to the audit root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleIdentity(String);

impl ModuleIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn from_path(path: &Path, root: &Path) -> Self {
        let normalized = path.to_string_lossy().replace('\\', "/");
        if let Some(index) = normalized.rfind("node_modules/") {
            return Self(normalized[index + "node_modules/".len()..].to_string());
        }
        let relative = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        Self(relative)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_node_modules_prefix() {
        let identity = ModuleIdentity::from_path(
            Path::new("/tmp/work/node_modules/lodash/index.js"),
            Path::new("/tmp/work"),
        );
        assert_eq!(identity.as_str(), "lodash/index.js");
    }

    #[test]
    fn test_nested_installs_coalesce() {
        let hoisted = ModuleIdentity::from_path(
            Path::new("/a/node_modules/ms/index.js"),
            Path::new("/a"),
        );
        let nested = ModuleIdentity::from_path(
            Path::new("/a/node_modules/debug/node_modules/ms/index.js"),
            Path::new("/a"),
        );
        assert_eq!(hoisted, nested);
    }

    #[test]
    fn test_entry_relative_to_root() {
        let identity = ModuleIdentity::from_path(
            Path::new("/tmp/work/src/main.js"),
            Path::new("/tmp/work"),
        );
        assert_eq!(identity.as_str(), "src/main.js");
    }
}
