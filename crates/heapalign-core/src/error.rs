use std::path::PathBuf;

use thiserror::Error;

/// Failures when reading bindings after a successful match. These are bugs
/// in the rule that asks for them, never properties of the analysed code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("binding `{name}` is not declared by the matcher registered for this callback")]
    Undeclared { name: String },
    #[error("binding `{name}` was required but the match did not capture it")]
    Unbound { name: String },
    #[error("binding `{name}` is a {found} node, expected a {expected} node")]
    UnexpectedKind {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, Error)]
#[error("Failed to parse {}", filename.display())]
pub struct ParseError {
    pub filename: PathBuf,
}

#[derive(Debug, Error)]
#[error("Failed to load the C++ grammar: {message}")]
pub struct LanguageError {
    pub message: String,
}
