pub(crate) mod perf;

use crate::checker::Checker;
use crate::finder::{MatchFinder, MatchResult};
use crate::rule_options::ResolvedRuleOptions;
use crate::rule_set::{Rule, RuleSet};

use perf::aligned_operator_new::aligned_operator_new::AlignedOperatorNewCheck;

/// A rule expressed as root matchers plus a callback deciding, from the
/// bindings of each match, whether to report.
pub trait Check: Send + Sync {
    fn rule(&self) -> Rule;

    /// Called once, before the walk, to register the rule's root matchers.
    fn register_matchers<'c>(&'c self, finder: &mut MatchFinder<'c>);

    /// Called for every successful root match. Errors are bugs in the rule
    /// (e.g. asking for a binding that was never declared) and abort the
    /// analysis of the file.
    fn check(&self, result: &MatchResult<'_>, checker: &mut Checker) -> anyhow::Result<()>;
}

/// Instantiate the checks for every enabled rule, configured with the
/// resolved options.
pub(crate) fn enabled_checks(
    rules: &RuleSet,
    options: &ResolvedRuleOptions,
) -> Vec<Box<dyn Check>> {
    rules
        .iter()
        .map(|rule| -> Box<dyn Check> {
            match rule {
                Rule::AlignedOperatorNew => {
                    Box::new(AlignedOperatorNewCheck::new(&options.aligned_operator_new))
                }
            }
        })
        .collect()
}
