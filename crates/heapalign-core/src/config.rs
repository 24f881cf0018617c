use std::path::PathBuf;

use anyhow::Result;

use crate::rule_options::ResolvedRuleOptions;
use crate::rule_set::{Category, Rule, RuleSet};
use crate::settings::Settings;

/// Options coming from the command line. Rule lists are comma separated, as
/// typed by the user.
#[derive(Clone, Debug, Default)]
pub struct ArgsConfig {
    pub files: Vec<PathBuf>,
    pub select: String,
    pub extend_select: String,
    pub ignore: String,
    /// `Some(false)` when `--no-follow-includes` was passed.
    pub follow_includes: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// List of paths to analyze.
    pub paths: Vec<PathBuf>,
    /// Rules that survive `select`, `extend-select` and `ignore`.
    pub rules_to_apply: RuleSet,
    pub rule_options: ResolvedRuleOptions,
    /// Lower the headers pulled in with quoted `#include`s.
    pub follow_includes: bool,
}

/// Combine the command line with the settings of the closest
/// `heapalign.toml`. Command line values take precedence: `--select` replaces
/// `select`, while `extend-select` and `ignore` accumulate from both sources.
pub fn build_config(
    check_config: &ArgsConfig,
    settings: Option<&Settings>,
    paths: Vec<PathBuf>,
) -> Result<Config> {
    let default_settings = Settings::default();
    let linter = &settings.unwrap_or(&default_settings).linter;

    let mut rules_to_apply = if !check_config.select.is_empty() {
        parse_rules(split_cli(&check_config.select), "--select")?
    } else if let Some(select) = &linter.select {
        parse_rules(select.iter().map(String::as_str), "select")?
    } else {
        RuleSet::default_rules()
    };

    if let Some(extend_select) = &linter.extend_select {
        rules_to_apply.extend(parse_rules(
            extend_select.iter().map(String::as_str),
            "extend-select",
        )?);
    }
    rules_to_apply.extend(parse_rules(split_cli(&check_config.extend_select), "--extend-select")?);

    let mut ignored = parse_rules(split_cli(&check_config.ignore), "--ignore")?;
    if let Some(ignore) = &linter.ignore {
        ignored.extend(parse_rules(ignore.iter().map(String::as_str), "ignore")?);
    }
    for rule in ignored.iter() {
        rules_to_apply.remove(rule);
    }

    let follow_includes = check_config
        .follow_includes
        .or(linter.follow_includes)
        .unwrap_or(true);

    Ok(Config {
        paths,
        rules_to_apply,
        rule_options: linter.rule_options.clone(),
        follow_includes,
    })
}

fn split_cli(names: &str) -> impl Iterator<Item = &str> {
    names.split(',')
}

/// Turn rule names and category names into a set of rules. Empty names are
/// ignored, unknown names are an error.
fn parse_rules<'a>(names: impl Iterator<Item = &'a str>, option: &str) -> Result<RuleSet> {
    let mut rules = RuleSet::empty();
    let mut unknown = Vec::new();

    for name in names.map(str::trim).filter(|name| !name.is_empty()) {
        if let Some(category) = Category::from_name(name) {
            rules.extend(Rule::all().iter().copied().filter(|rule| rule.is_in_category(category)));
        } else if let Some(rule) = Rule::from_name(name) {
            rules.insert(rule);
        } else {
            unknown.push(name);
        }
    }

    if !unknown.is_empty() {
        return Err(anyhow::anyhow!(
            "Unknown rules in `{option}`: {}",
            unknown.join(", ")
        ));
    }

    Ok(rules)
}
