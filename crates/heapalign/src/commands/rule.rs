use anyhow::Result;
use colored::Colorize;
use heapalign_core::rule_set::Rule;

use crate::args::RuleCommand;
use crate::status::ExitStatus;

pub fn rule(args: RuleCommand) -> Result<ExitStatus> {
    let Some(name) = args.name else {
        for rule in Rule::all() {
            let categories: Vec<&str> = rule.categories().iter().map(|c| c.name()).collect();
            println!(
                "{} [{}] {}",
                rule.name().bold(),
                categories.join(", "),
                rule.summary()
            );
        }
        return Ok(ExitStatus::Success);
    };

    let rule = Rule::from_name(&name).ok_or_else(|| {
        anyhow::anyhow!("Unknown rule `{name}`. Run `heapalign rule` to list the available rules.")
    })?;

    println!("{}\n", rule.name().bold());
    println!("{}", rule.documentation().trim_end());
    Ok(ExitStatus::Success)
}
