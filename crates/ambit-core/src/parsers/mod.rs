//! JS/TS source parsing using native tree-sitter.
//!
//! Produces a `ParsedModule`: the syntax tree handle plus everything the
//! scope resolver and classifier need. A module that fails to parse keeps
//! `tree: None`; such a module must never reach the classifier.

use std::path::{Path, PathBuf};

use tree_sitter::{Parser, Tree};

use crate::graph::ModuleIdentity;

/// Source language, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl Language {
    /// Detect the language from a file extension. `None` means the file is
    /// not classifiable source (JSON, CSS, ...) and is skipped by the walker.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            "jsx" => Some(Self::Jsx),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    fn grammar(self) -> tree_sitter::Language {
        match self {
            // The JavaScript grammar handles JSX natively.
            Self::JavaScript | Self::Jsx => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// One parsed module, keyed by its normalized identity.
pub struct ParsedModule {
    pub identity: ModuleIdentity,
    pub path: PathBuf,
    pub language: Language,
    pub source: String,
    /// `None` when tree-sitter could not produce a tree.
    pub tree: Option<Tree>,
}

impl ParsedModule {
    /// Whether this module carries everything classification needs.
    pub fn is_parsed(&self) -> bool {
        self.tree.is_some()
    }
}

/// Stateless front end over the tree-sitter grammars.
pub struct SourceParser;

impl SourceParser {
    /// Parse source text into a `ParsedModule`. Never fails outright: a
    /// grammar or parse failure yields `tree: None` so the caller can apply
    /// its own skip-or-abort policy.
    pub fn parse(
        identity: ModuleIdentity,
        path: &Path,
        language: Language,
        source: String,
    ) -> ParsedModule {
        let mut parser = Parser::new();
        let tree = match parser.set_language(&language.grammar()) {
            Ok(()) => parser.parse(&source, None),
            Err(_) => None,
        };

        ParsedModule {
            identity,
            path: path.to_path_buf(),
            language,
            source,
            tree,
        }
    }
}
