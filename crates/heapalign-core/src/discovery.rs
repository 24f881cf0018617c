use std::path::{Path, PathBuf};

use anyhow::Context;
use etcetera::BaseStrategy;
use ignore::WalkBuilder;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use path_absolutize::Absolutize;

use crate::fs::has_cpp_extension;
use crate::settings::Settings;
use crate::toml::parse_heapalign_toml;

pub const CONFIG_FILE_NAME: &str = "heapalign.toml";

/// Patterns excluded unless `default-exclude = false` or
/// `--no-default-exclude`. Gitignore syntax.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] =
    &["build/", "third_party/", "external/", "vendor/", ".git/"];

#[derive(Debug)]
pub struct DiscoveredSettings {
    /// Directory the settings apply to.
    pub directory: PathBuf,
    pub settings: Settings,
    pub config_path: Option<PathBuf>,
}

/// Find the `heapalign.toml` files that apply to `paths`: the closest one
/// above each path, plus any found inside the directories being checked.
pub fn discover_settings<P: AsRef<Path>>(paths: &[P]) -> anyhow::Result<Vec<DiscoveredSettings>> {
    let mut config_paths: Vec<PathBuf> = Vec::new();

    for path in paths {
        let path = absolutize(path.as_ref());

        let start = if path.is_dir() { Some(path.as_path()) } else { path.parent() };
        if let Some(config) = start
            .into_iter()
            .flat_map(Path::ancestors)
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|config| config.is_file())
        {
            config_paths.push(config);
        }

        if path.is_dir() {
            let nested = WalkBuilder::new(&path)
                .build()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_name() == CONFIG_FILE_NAME)
                .map(|entry| entry.into_path());
            config_paths.extend(nested);
        }
    }

    config_paths.sort();
    config_paths.dedup();

    let mut discovered = Vec::with_capacity(config_paths.len());
    for config_path in config_paths {
        let Some(directory) = config_path.parent().map(Path::to_path_buf) else {
            continue;
        };
        tracing::debug!(config = %config_path.display(), "found configuration");
        let settings = parse_heapalign_toml(&config_path)?
            .into_settings()
            .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;
        discovered.push(DiscoveredSettings { directory, settings, config_path: Some(config_path) });
    }

    Ok(discovered)
}

/// Settings from `<config dir>/heapalign/heapalign.toml`, used for files
/// that have no project configuration.
pub fn discover_user_settings() -> anyhow::Result<Option<DiscoveredSettings>> {
    let Ok(strategy) = etcetera::choose_base_strategy() else {
        return Ok(None);
    };
    let directory = strategy.config_dir().join("heapalign");
    let config_path = directory.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        return Ok(None);
    }

    tracing::debug!(config = %config_path.display(), "found user configuration");
    let settings = parse_heapalign_toml(&config_path)?
        .into_settings()
        .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;
    Ok(Some(DiscoveredSettings { directory, settings, config_path: Some(config_path) }))
}

#[derive(Debug)]
pub struct ResolverItem {
    path: PathBuf,
    value: Settings,
}

impl ResolverItem {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn value(&self) -> &Settings {
        &self.value
    }
}

/// Maps a file to the settings of the deepest configured directory that
/// contains it.
#[derive(Debug, Default)]
pub struct SettingsResolver {
    fallback: Settings,
    items: Vec<ResolverItem>,
}

impl SettingsResolver {
    pub fn new(fallback: Settings) -> Self {
        Self { fallback, items: Vec::new() }
    }

    pub fn add(&mut self, directory: &Path, settings: Settings) {
        let path = absolutize(directory);
        self.items.retain(|item| item.path != path);
        self.items.push(ResolverItem { path, value: settings });
    }

    pub fn items(&self) -> &[ResolverItem] {
        &self.items
    }

    pub fn fallback(&self) -> &Settings {
        &self.fallback
    }

    pub fn resolve(&self, path: &Path) -> Option<&ResolverItem> {
        let path = absolutize(path);
        self.items
            .iter()
            .filter(|item| path.starts_with(&item.path))
            .max_by_key(|item| item.path.components().count())
    }

    pub fn resolve_or_fallback(&self, path: &Path) -> &Settings {
        self.resolve(path).map_or(&self.fallback, ResolverItem::value)
    }
}

/// Exclusion patterns of one settings scope, compiled once.
#[derive(Clone)]
struct Excludes {
    root: PathBuf,
    matcher: Gitignore,
}

impl Excludes {
    fn new(root: PathBuf, settings: &Settings, no_default_exclude: bool) -> Self {
        let mut builder = GitignoreBuilder::new(&root);
        for pattern in settings.linter.exclude.iter().flatten() {
            if let Err(err) = builder.add_line(None, pattern) {
                tracing::warn!("Ignoring invalid exclude pattern `{pattern}`: {err}");
            }
        }
        if !no_default_exclude && settings.linter.default_exclude.unwrap_or(true) {
            for pattern in DEFAULT_EXCLUDE_PATTERNS {
                let _ = builder.add_line(None, pattern);
            }
        }
        let matcher = builder.build().unwrap_or_else(|err| {
            tracing::warn!("Ignoring exclude patterns of {}: {err}", root.display());
            Gitignore::empty()
        });
        Self { root, matcher }
    }
}

/// Collect the C++ files to check. Files passed explicitly are always kept;
/// directories are walked, honouring `.gitignore` and the `exclude` /
/// default-exclude patterns of the settings that apply to each entry.
pub fn discover_cpp_file_paths<P: AsRef<Path>>(
    paths: &[P],
    resolver: &SettingsResolver,
    no_default_exclude: bool,
) -> Vec<Result<PathBuf, ignore::Error>> {
    let scopes: Vec<Excludes> = resolver
        .items()
        .iter()
        .map(|item| Excludes::new(item.path().to_path_buf(), item.value(), no_default_exclude))
        .collect();

    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_file() {
            files.push(Ok(path.to_path_buf()));
            continue;
        }

        // Entries without a configuration of their own use the fallback
        // settings, relative to the directory being walked.
        let fallback = Excludes::new(absolutize(path), resolver.fallback(), no_default_exclude);
        let scopes = scopes.clone();
        let walker = WalkBuilder::new(path)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                !is_excluded(&scopes, &fallback, entry.path(), is_dir)
            })
            .build();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
                    if is_file && has_cpp_extension(entry.path()) {
                        files.push(Ok(entry.into_path()));
                    }
                }
                Err(err) => files.push(Err(err)),
            }
        }
    }

    files
}

fn is_excluded(scopes: &[Excludes], fallback: &Excludes, path: &Path, is_dir: bool) -> bool {
    let path = absolutize(path);
    let scope = scopes
        .iter()
        .filter(|scope| path.starts_with(&scope.root))
        .max_by_key(|scope| scope.root.components().count())
        .unwrap_or(fallback);

    if !path.starts_with(&scope.root) || path == scope.root {
        return false;
    }
    scope.matcher.matched(&path, is_dir).is_ignore()
}

fn absolutize(path: &Path) -> PathBuf {
    path.absolutize()
        .map(|path| path.to_path_buf())
        .unwrap_or_else(|_| path.to_path_buf())
}
