//! Module graph traversal - resolution, identity, and the walker.
//!
//! The walker discovers every source file reachable from an entry point by
//! following `import`/`require` specifiers, using Node-style resolution.
//! Discovery and classification run in parallel per frontier; aggregator
//! records are serialized behind a mutex.

mod identity;
mod imports;
mod resolver;
mod walker;

pub use identity::ModuleIdentity;
pub use imports::extract_imports;
pub use resolver::{package_entry, ModuleResolver, Resolution};
pub use walker::{GraphWalker, WalkStats};
