use crate::diagnostic::Diagnostic;
use crate::rule_options::ResolvedRuleOptions;
use crate::rule_set::RuleSet;

#[derive(Debug)]
// The object that collects diagnostics while the match finder walks a
// translation unit. One per analyzed file.
pub struct Checker {
    // The diagnostics to report (possibly empty).
    pub diagnostics: Vec<Diagnostic>,
    // The rules to apply.
    pub rule_set: RuleSet,
    // Per-rule options resolved from configuration.
    pub rule_options: ResolvedRuleOptions,
}

impl Checker {
    pub fn new(rule_set: RuleSet, rule_options: ResolvedRuleOptions) -> Self {
        Self { diagnostics: vec![], rule_set, rule_options }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
