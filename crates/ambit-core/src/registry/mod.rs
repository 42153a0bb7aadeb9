//! Builtins registry - the allowlist of ambient names never reported.
//!
//! Two static data sets live here:
//! - known ambient globals, queryable by exact bare name or exact
//!   `object.property` string, loaded once at process start
//! - the fixed list of Node.js core module names recognized in
//!   `require()` calls

mod builtins;
mod node_core;

pub use builtins::BuiltinsRegistry;
pub use node_core::{is_core_module, NODE_CORE_MODULES};
