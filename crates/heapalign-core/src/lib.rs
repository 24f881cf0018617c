//! Core functionality for the heapalign C++ linter
//!
//! This crate provides:
//! - a C++ front-end lowering tree-sitter parses into a small declaration AST
//! - matcher combinators and a match finder to run rules over that AST
//! - diagnostic generation and reporting
//! - configuration and file discovery

pub mod analyze;
pub mod ast;
pub mod bindings;
pub mod check;
pub mod checker;
pub mod config;
pub mod diagnostic;
pub mod discovery;
pub mod error;
pub mod finder;
pub mod frontend;
pub mod fs;
pub mod lints;
pub mod location;
pub mod matcher;
pub mod rule_options;
pub mod rule_set;
pub mod settings;
pub mod toml;
pub mod utils;


pub use check::check;
pub use config::{ArgsConfig, Config, build_config};
pub use diagnostic::Diagnostic;
pub use discovery::{DiscoveredSettings, discover_cpp_file_paths, discover_settings};
pub use location::Location;
pub use settings::Settings;
