use crate::ast::TranslationUnit;
use crate::bindings::BoundNodes;
use crate::checker::Checker;
use crate::lints::Check;
use crate::matcher::{DynMatcher, declared_names};

/// Everything a callback gets to see about one successful root match.
#[derive(Debug)]
pub struct MatchResult<'a> {
    pub nodes: BoundNodes<'a>,
    pub unit: &'a TranslationUnit,
}

struct Registration<'c> {
    matcher: DynMatcher,
    declared: Vec<&'static str>,
    callback: &'c dyn Check,
}

/// Walks a translation unit once and runs every registered root matcher on
/// every node, invoking the matching callbacks synchronously.
///
/// Nodes are visited in pre-order, so callbacks fire in document order of
/// the nodes' opening tokens. For a given node, registrations run in the
/// order they were added.
#[derive(Default)]
pub struct MatchFinder<'c> {
    registrations: Vec<Registration<'c>>,
}

impl<'c> MatchFinder<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_matcher(&mut self, matcher: DynMatcher, callback: &'c dyn Check) {
        let declared = declared_names(matcher.as_ref());
        self.registrations.push(Registration { matcher, declared, callback });
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Returns the number of successful root matches.
    pub fn match_ast(
        &self,
        unit: &TranslationUnit,
        checker: &mut Checker,
    ) -> anyhow::Result<usize> {
        let mut n_matches = 0;

        for node in unit.preorder() {
            for registration in &self.registrations {
                let mut nodes = BoundNodes::new(&registration.declared);
                if !registration.matcher.matches(node, &mut nodes) {
                    continue;
                }
                n_matches += 1;
                tracing::trace!(
                    rule = registration.callback.rule().name(),
                    node = ?node,
                    bindings = nodes.len(),
                    "root matcher matched"
                );
                let result = MatchResult { nodes, unit };
                registration.callback.check(&result, checker)?;
            }
        }

        Ok(n_matches)
    }
}
