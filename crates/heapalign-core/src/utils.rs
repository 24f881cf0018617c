use std::sync::LazyLock;

use regex::Regex;

use crate::diagnostic::Diagnostic;
use crate::location::Location;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static TIGHT_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(::|<|>|\[|\])\s*").unwrap());
static COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*").unwrap());

/// Normalize the spelling of a type or name so that purely cosmetic
/// differences in whitespace do not affect comparisons.
///
/// - runs of whitespace collapse to a single space;
/// - no whitespace around `::`, `<`, `>`, `[` and `]`;
/// - exactly one space after a comma, none before.
///
/// `operator new` keeps its inner space since it separates two words.
pub fn normalize_spelling(spelling: &str) -> String {
    let collapsed = WHITESPACE.replace_all(spelling.trim(), " ");
    let tightened = TIGHT_PUNCTUATION.replace_all(&collapsed, "$1");
    COMMA.replace_all(&tightened, ", ").into_owned()
}

/// Whether `text` is a plain C identifier, i.e. something that can be
/// spelled as a macro invocation.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Find the positions of the new line characters in the given content.
pub fn find_new_lines_from_content(content: &str) -> Vec<usize> {
    content.match_indices('\n').map(|x| x.0).collect()
}

/// Takes the start of the range of a Diagnostic and the indices for the new
/// lines. Returns the (row, col) position of the Diagnostic in the file.
///
/// The row position is 1 + the number of new line characters before the
/// start of the range.
/// "int x;\nstruct S {};"
/// -> there is one \n so a diagnostic on `S` appears on line 2.
///
/// The col position is the number of bytes between the start of the range
/// and the last new line character before the start of the range.
///
/// Note that the row position is 1-indexed but the column position is 0-indexed.
pub fn find_row_col(start: usize, loc_new_lines: &[usize]) -> (usize, usize) {
    let n_new_lines = loc_new_lines.partition_point(|x| *x < start);
    let col = match n_new_lines.checked_sub(1) {
        Some(last) => start - loc_new_lines[last] - 1,
        None => start,
    };
    (n_new_lines + 1, col)
}

/// Takes a vector of `Diagnostic`s, all of which come with a range, and convert
/// this range into actual (row, col) location using the position of new lines.
pub fn compute_lints_location(
    diagnostics: Vec<Diagnostic>,
    loc_new_lines: &[usize],
) -> Vec<Diagnostic> {
    diagnostics
        .into_iter()
        .map(|mut diagnostic| {
            let start: usize = diagnostic.range.start().into();
            let (row, col) = find_row_col(start, loc_new_lines);
            diagnostic.location = Some(Location::new(row, col));
            diagnostic
        })
        .collect()
}
