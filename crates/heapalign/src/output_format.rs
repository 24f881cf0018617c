use std::collections::HashMap;
use std::fmt::{self, Display};
use std::io::Write;
use std::path::Path;

use annotate_snippets::Renderer;
use clap::ValueEnum;
use colored::Colorize;
use heapalign_core::diagnostic::{Diagnostic, ViolationData, render_diagnostic};
use heapalign_core::location::Location;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Print diagnostics with the annotated source line
    #[default]
    Full,
    /// Print diagnostics in a concise format, one per line
    Concise,
    /// Print diagnostics as JSON
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Concise => write!(f, "concise"),
            Self::Json => write!(f, "json"),
        }
    }
}

pub trait Emitter {
    fn emit<W: Write>(
        &self,
        writer: &mut W,
        diagnostics: &[&Diagnostic],
        errors: &[(String, anyhow::Error)],
    ) -> anyhow::Result<()>;
}

/// Print the files that could not be checked. These go to stderr so that
/// they never interleave with the diagnostics.
pub fn print_errors(errors: &[(String, anyhow::Error)]) {
    for (_path, err) in errors {
        eprintln!("{}: {err:#}", "Error".red().bold());
    }
}

fn concise_line(diagnostic: &Diagnostic) -> String {
    // Columns are stored 0-indexed and shown 1-indexed.
    let (row, col) = diagnostic
        .location
        .map_or((0, 0), |location| (location.row, location.column + 1));

    let mut line = format!(
        "{} [{}:{}] {} {}",
        diagnostic.filename.display().to_string().white(),
        row,
        col,
        diagnostic.message.name.red(),
        diagnostic.message.body
    );
    if let Some(suggestion) = &diagnostic.message.suggestion {
        line.push(' ');
        line.push_str(suggestion);
    }
    line
}

pub struct ConciseEmitter;

impl Emitter for ConciseEmitter {
    fn emit<W: Write>(
        &self,
        writer: &mut W,
        diagnostics: &[&Diagnostic],
        errors: &[(String, anyhow::Error)],
    ) -> anyhow::Result<()> {
        for diagnostic in diagnostics {
            writeln!(writer, "{}", concise_line(diagnostic))?;
        }
        print_errors(errors);
        Ok(())
    }
}

pub struct FullEmitter {
    pub no_color: bool,
}

impl Emitter for FullEmitter {
    fn emit<W: Write>(
        &self,
        writer: &mut W,
        diagnostics: &[&Diagnostic],
        errors: &[(String, anyhow::Error)],
    ) -> anyhow::Result<()> {
        let renderer = if self.no_color || !colored::control::SHOULD_COLORIZE.should_colorize() {
            Renderer::plain()
        } else {
            Renderer::styled()
        };

        // Several diagnostics usually come from the same file.
        let mut sources: HashMap<&Path, Option<String>> = HashMap::new();

        for diagnostic in diagnostics {
            let source = sources
                .entry(diagnostic.filename.as_path())
                .or_insert_with(|| std::fs::read_to_string(&diagnostic.filename).ok());

            match source {
                Some(source) => {
                    let origin = diagnostic.filename.display().to_string();
                    let rendered = render_diagnostic(source, &origin, diagnostic, &renderer);
                    writeln!(writer, "{rendered}\n")?;
                }
                None => {
                    tracing::debug!(
                        path = %diagnostic.filename.display(),
                        "could not re-read file, falling back to the concise format"
                    );
                    writeln!(writer, "{}", concise_line(diagnostic))?;
                }
            }
        }

        print_errors(errors);
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    diagnostics: Vec<JsonDiagnostic<'a>>,
    errors: Vec<JsonError>,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    message: &'a ViolationData,
    filename: String,
    range: [u32; 2],
    highlight: Option<[u32; 2]>,
    location: Option<Location>,
}

#[derive(Serialize)]
struct JsonError {
    file: String,
    error: String,
}

pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn emit<W: Write>(
        &self,
        writer: &mut W,
        diagnostics: &[&Diagnostic],
        errors: &[(String, anyhow::Error)],
    ) -> anyhow::Result<()> {
        let output = JsonOutput {
            diagnostics: diagnostics
                .iter()
                .map(|diagnostic| JsonDiagnostic {
                    message: &diagnostic.message,
                    filename: diagnostic.filename.display().to_string(),
                    range: [
                        diagnostic.range.start().into(),
                        diagnostic.range.end().into(),
                    ],
                    highlight: diagnostic
                        .highlight
                        .map(|range| [range.start().into(), range.end().into()]),
                    location: diagnostic.location,
                })
                .collect(),
            errors: errors
                .iter()
                .map(|(path, err)| JsonError { file: path.clone(), error: format!("{err:#}") })
                .collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)?;
        Ok(())
    }
}

fn section_header(title: &str) -> String {
    let prefix = format!("── {title} ");
    let width = prefix.chars().count();
    format!("{prefix}{}", "─".repeat(49usize.saturating_sub(width)))
}

/// Print the `Summary` section shown after the human-readable formats.
pub fn print_summary(diagnostics: &[&Diagnostic], has_errors: bool) {
    let message = match diagnostics.len() {
        0 if has_errors => "No violations in the files that could be checked.".to_string(),
        0 => "All checks passed!".to_string(),
        1 => "Found 1 error.".to_string(),
        n => format!("Found {n} errors."),
    };
    println!("\n{}\n{}", section_header("Summary").bold(), message);
}

pub fn print_warnings(warnings: &[String]) {
    print_section("Warnings", warnings);
}

pub fn print_notes(notes: &[String]) {
    print_section("Notes", notes);
}

fn print_section(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}", section_header(title).bold());
    for item in items {
        println!("{item}");
    }
}
