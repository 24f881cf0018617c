use std::collections::HashMap;
use std::path::PathBuf;

use colored::Colorize;
use heapalign_core::diagnostic::Diagnostic;

use crate::status::ExitStatus;

pub fn print_statistics(
    diagnostics: &[&Diagnostic],
    parent_config_path: Option<PathBuf>,
) -> anyhow::Result<ExitStatus> {
    if diagnostics.is_empty() {
        println!("All checks passed!");
        return Ok(ExitStatus::Success);
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for diagnostic in diagnostics {
        *counts.entry(diagnostic.message.name.as_str()).or_default() += 1;
    }

    // Most frequent first, ties by name.
    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    for (name, count) in sorted {
        println!("{:>5} {}", count.to_string().bold(), name.bold().red());
    }

    if let Some(config_path) = parent_config_path {
        println!("\nUsed '{}'", config_path.display());
    }

    Ok(ExitStatus::Failure)
}
