use crate::ast::TranslationUnit;
use crate::checker::Checker;
use crate::finder::MatchFinder;
use crate::lints::enabled_checks;

/// Run every rule enabled in `checker` over the translation unit. Diagnostics
/// end up in `checker.diagnostics`.
pub fn check_translation_unit(unit: &TranslationUnit, checker: &mut Checker) -> anyhow::Result<()> {
    let checks = enabled_checks(&checker.rule_set, &checker.rule_options);

    let mut finder = MatchFinder::new();
    for check in &checks {
        check.register_matchers(&mut finder);
    }
    if finder.is_empty() {
        return Ok(());
    }

    let n_matches = finder.match_ast(unit, checker)?;
    tracing::trace!(
        path = %unit.main_file().path.display(),
        nodes = unit.len(),
        n_matches,
        "analyzed translation unit"
    );

    Ok(())
}
