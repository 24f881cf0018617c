use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use colored::Colorize;
use heapalign_core::config::{ArgsConfig, build_config};
use heapalign_core::diagnostic::Diagnostic;
use heapalign_core::discovery::{
    SettingsResolver, discover_cpp_file_paths, discover_settings, discover_user_settings,
};

use crate::args::CheckCommand;
use crate::output_format::{
    ConciseEmitter, Emitter, FullEmitter, JsonEmitter, OutputFormat, print_errors, print_notes,
    print_summary, print_warnings,
};
use crate::statistics::print_statistics;
use crate::status::ExitStatus;

type FileResults = Vec<(String, Result<Vec<Diagnostic>>)>;

pub fn check(args: CheckCommand, no_color: bool) -> Result<ExitStatus> {
    let start = args.with_timing.then(Instant::now);

    let ConfiguredResolver { resolver, config_note } = configure_resolver(&args)?;

    let paths: Vec<PathBuf> =
        discover_cpp_file_paths(&args.files, &resolver, args.no_default_exclude)
            .into_iter()
            .filter_map(|entry| {
                entry
                    .inspect_err(|err| {
                        tracing::warn!("Skipping an entry that could not be read: {err}")
                    })
                    .ok()
            })
            .collect();

    if paths.is_empty() {
        println!(
            "{}: {}",
            "Warning".yellow().bold(),
            "No C++ files found under the given path(s).".white().bold()
        );
        return Ok(ExitStatus::Success);
    }
    tracing::info!("checking {} file(s)", paths.len());

    let args_config = ArgsConfig {
        files: args.files.iter().map(PathBuf::from).collect(),
        select: args.select.clone(),
        extend_select: args.extend_select.clone(),
        ignore: args.ignore.clone(),
        follow_includes: args.no_follow_includes.then_some(false),
    };
    let file_results = check_by_configuration(&args_config, &resolver, paths)?;

    let mut errors = Vec::new();
    let mut diagnostics = Vec::new();
    for (path, result) in file_results {
        match result {
            Ok(found) => diagnostics.extend(found),
            Err(err) => errors.push((path, err)),
        }
    }
    errors.sort_by(|a, b| a.0.cmp(&b.0));

    let mut diagnostics: Vec<&Diagnostic> = diagnostics.iter().collect();
    diagnostics.sort();

    if args.statistics {
        print_errors(&errors);
        let status = print_statistics(&diagnostics, config_note)?;
        return Ok(if errors.is_empty() { status } else { ExitStatus::Error });
    }

    let mut stdout = std::io::stdout();
    match args.output_format {
        OutputFormat::Full => FullEmitter { no_color }.emit(&mut stdout, &diagnostics, &errors)?,
        OutputFormat::Concise => ConciseEmitter.emit(&mut stdout, &diagnostics, &errors)?,
        OutputFormat::Json => JsonEmitter.emit(&mut stdout, &diagnostics, &errors)?,
    }

    // JSON consumers only get the JSON document.
    if args.output_format != OutputFormat::Json {
        print_summary(&diagnostics, !errors.is_empty());

        let mut warnings = Vec::new();
        if !errors.is_empty() {
            warnings.push(format!(
                "{} file(s) could not be checked, see the errors above.",
                errors.len()
            ));
        }
        print_warnings(&warnings);

        let mut notes = Vec::new();
        if let Some(start) = start {
            notes.push(format!("Checked files in: {:?}", start.elapsed()));
        }
        if let Some(config_path) = config_note {
            notes.push(format!("Used '{}'", config_path.display()));
        }
        print_notes(&notes);
    }

    Ok(if !errors.is_empty() {
        ExitStatus::Error
    } else if diagnostics.is_empty() {
        ExitStatus::Success
    } else {
        ExitStatus::Failure
    })
}

struct ConfiguredResolver {
    resolver: SettingsResolver,
    /// Configuration worth mentioning in the notes: the only project
    /// configuration when it lives outside the current directory, or the
    /// user configuration when there is no project one.
    config_note: Option<PathBuf>,
}

fn configure_resolver(args: &CheckCommand) -> Result<ConfiguredResolver> {
    let user = discover_user_settings()?;
    let user_config_path = user.as_ref().and_then(|user| user.config_path.clone());

    let mut fallback = user.map(|user| user.settings).unwrap_or_default();
    if args.no_default_exclude {
        fallback.linter.default_exclude = Some(false);
    }
    let mut resolver = SettingsResolver::new(fallback);

    let discovered = discover_settings(&args.files)?;
    let cwd = env::current_dir().ok();

    let config_note = match discovered.as_slice() {
        [] => user_config_path,
        [only] => only
            .config_path
            .as_ref()
            .filter(|path| path.parent() != cwd.as_deref())
            .cloned(),
        _ => None,
    };

    for mut found in discovered {
        if args.no_default_exclude {
            found.settings.linter.default_exclude = Some(false);
        }
        resolver.add(&found.directory, found.settings);
    }

    Ok(ConfiguredResolver { resolver, config_note })
}

/// Files sharing their nearest `heapalign.toml` are checked together with a
/// single `Config`.
fn check_by_configuration(
    args_config: &ArgsConfig,
    resolver: &SettingsResolver,
    paths: Vec<PathBuf>,
) -> Result<FileResults> {
    let mut groups: BTreeMap<Option<PathBuf>, Vec<PathBuf>> = BTreeMap::new();
    for path in paths {
        let directory = resolver.resolve(&path).map(|item| item.path().to_path_buf());
        groups.entry(directory).or_default().push(path);
    }

    let mut results = Vec::new();
    for (directory, group) in groups {
        let settings = match &directory {
            Some(directory) => resolver.resolve_or_fallback(directory),
            None => resolver.fallback(),
        };
        let config = build_config(args_config, Some(settings), group)?;
        results.extend(heapalign_core::check::check(config));
    }
    Ok(results)
}
