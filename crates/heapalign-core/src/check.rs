use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::analyze::check_translation_unit;
pub use crate::checker::Checker;
use crate::config::Config;
use crate::diagnostic::*;
use crate::frontend::{FrontendOptions, parse_translation_unit};
use crate::fs::relativize_path;
use crate::utils::*;

pub fn check(config: Config) -> Vec<(String, Result<Vec<Diagnostic>, anyhow::Error>)> {
    // Wrap config in Arc to avoid expensive clones in parallel execution
    let config = Arc::new(config);

    config
        .paths
        .par_iter()
        .map(|file| {
            let res = check_path(file, Arc::clone(&config));
            (relativize_path(file), res)
        })
        .collect()
}

pub fn check_path(path: &PathBuf, config: Arc<Config>) -> Result<Vec<Diagnostic>, anyhow::Error> {
    let path = relativize_path(path);
    let contents = fs::read_to_string(Path::new(&path))
        .with_context(|| format!("Failed to read file: {path}"))?;

    let checks = get_checks(&contents, &PathBuf::from(&path), &config)
        .with_context(|| format!("Failed to get checks for file: {path}"))?;

    Ok(checks)
}

// Takes the C++ code as a string, parses it, and obtains a (possibly empty)
// vector of `Diagnostic`s.
//
// If there are diagnostics to report, this is also where their range in the
// string is converted to their location (row, column).
pub fn get_checks(contents: &str, file: &Path, config: &Config) -> Result<Vec<Diagnostic>> {
    let options = FrontendOptions::from_config(config);
    let unit = parse_translation_unit(file, contents, &options)?;

    let mut checker = Checker::new(config.rules_to_apply.clone(), config.rule_options.clone());
    check_translation_unit(&unit, &mut checker)?;

    let mut diagnostics: Vec<Diagnostic> = checker
        .diagnostics
        .into_iter()
        .map(|mut x| {
            x.filename = file.to_path_buf();
            x
        })
        .collect();
    diagnostics.sort();

    let loc_new_lines = find_new_lines_from_content(contents);
    Ok(compute_lints_location(diagnostics, &loc_new_lines))
}
