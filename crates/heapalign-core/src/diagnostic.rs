use std::cmp::Ordering;
use std::path::PathBuf;

use annotate_snippets::{Level, Renderer, Snippet};
use biome_rowan::TextRange;
use serde::Serialize;

use crate::location::Location;

/// What a rule has to say about one violation.
pub trait Violation {
    fn name(&self) -> String;
    fn body(&self) -> String;
    fn suggestion(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ViolationData {
    pub name: String,
    pub body: String,
    pub suggestion: Option<String>,
}

impl ViolationData {
    pub fn new(name: String, body: String, suggestion: Option<String>) -> Self {
        Self { name, body, suggestion }
    }
}

impl<T: Violation> From<T> for ViolationData {
    fn from(value: T) -> Self {
        Self::new(value.name(), value.body(), value.suggestion())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: ViolationData,
    pub filename: PathBuf,
    /// Where the diagnostic points: a short range, usually a name.
    pub range: TextRange,
    /// The whole construct the diagnostic is about, if it differs from
    /// `range`.
    pub highlight: Option<TextRange>,
    /// Filled in once the whole file has been checked.
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new<T: Into<ViolationData>>(message: T, range: TextRange) -> Self {
        Self {
            message: message.into(),
            filename: PathBuf::new(),
            range,
            highlight: None,
            location: None,
        }
    }

    pub fn with_highlight(mut self, highlight: TextRange) -> Self {
        self.highlight = Some(highlight);
        self
    }
}

impl Ord for Diagnostic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.filename
            .cmp(&other.filename)
            .then_with(|| self.range.start().cmp(&other.range.start()))
            .then_with(|| self.message.name.cmp(&other.message.name))
            .then_with(|| self.range.end().cmp(&other.range.end()))
            .then_with(|| self.message.body.cmp(&other.message.body))
    }
}

impl PartialOrd for Diagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Render one diagnostic with the annotated source line, the way it is shown
/// by the `full` output format.
pub fn render_diagnostic(
    source: &str,
    origin: &str,
    diagnostic: &Diagnostic,
    renderer: &Renderer,
) -> String {
    let start = usize::from(diagnostic.range.start()).min(source.len());
    let end = usize::from(diagnostic.range.end()).clamp(start, source.len());

    let snippet = Snippet::source(source)
        .origin(origin)
        .line_start(1)
        .fold(true)
        .annotation(Level::Warning.span(start..end).label(&diagnostic.message.body));

    let mut message = Level::Warning.title(&diagnostic.message.name).snippet(snippet);
    if let Some(suggestion) = &diagnostic.message.suggestion {
        message = message.footer(Level::Help.title(suggestion));
    }

    renderer.render(message).to_string()
}
