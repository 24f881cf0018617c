//! C++ front-end: parses source with tree-sitter and lowers the concrete
//! syntax tree into a [`TranslationUnit`].
//!
//! Only what the matchers look at is kept: namespaces, records, fields and
//! methods. Quoted `#include`s are followed and the included declarations are
//! spliced in where the directive appears, tagged with their own [`FileId`].
//!
//! [`FileId`]: crate::ast::FileId

mod lower;

use std::path::Path;

use rustc_hash::FxHashSet;
use tree_sitter::{Parser, Tree};

use crate::ast::TranslationUnit;
use crate::config::Config;
use crate::error::{LanguageError, ParseError};

#[derive(Debug, Clone, Default)]
pub struct FrontendOptions {
    /// Resolve quoted `#include "..."` directives relative to the including
    /// file and lower the headers in place.
    pub follow_includes: bool,
    /// Identifiers that, when they appear in a class body, stand for a
    /// macro-generated allocation override.
    pub allocation_macros: FxHashSet<String>,
}

impl FrontendOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            follow_includes: config.follow_includes,
            allocation_macros: config
                .rule_options
                .aligned_operator_new
                .allocation_macros()
                .map(str::to_string)
                .collect(),
        }
    }
}

pub fn parse_translation_unit(
    path: &Path,
    contents: &str,
    options: &FrontendOptions,
) -> anyhow::Result<TranslationUnit> {
    let mut parser = new_parser()?;
    let tree = parse(&mut parser, path, contents)?;
    lower::lower_translation_unit(parser, options, path, contents, &tree)
}

pub(crate) fn new_parser() -> Result<Parser, LanguageError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_cpp::LANGUAGE.into())
        .map_err(|err| LanguageError { message: err.to_string() })?;
    Ok(parser)
}

pub(crate) fn parse(parser: &mut Parser, path: &Path, contents: &str) -> Result<Tree, ParseError> {
    let tree = parser
        .parse(contents, None)
        .ok_or_else(|| ParseError { filename: path.to_path_buf() })?;

    if tree.root_node().has_error() {
        tracing::debug!(
            path = %path.display(),
            "syntax errors found, analysing the parts that could be parsed"
        );
    }

    Ok(tree)
}
