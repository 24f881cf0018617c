use crate::rule_options::ResolvedRuleOptions;

/// Resolved configuration settings for one `heapalign.toml` (or the
/// defaults, when there is none).
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub linter: LinterSettings,
}

#[derive(Debug, Clone)]
pub struct LinterSettings {
    pub select: Option<Vec<String>>,
    pub extend_select: Option<Vec<String>>,
    pub ignore: Option<Vec<String>>,
    /// Gitignore-style patterns, relative to the directory of the config file.
    pub exclude: Option<Vec<String>>,
    /// Whether to apply `DEFAULT_EXCLUDE_PATTERNS`.
    pub default_exclude: Option<bool>,
    pub follow_includes: Option<bool>,
    pub rule_options: ResolvedRuleOptions,
}

impl Default for LinterSettings {
    /// [Default] handler for [LinterSettings]
    ///
    /// Uses `None` to indicate that an option was not specified, rather than
    /// empty vectors: `select = []` is a valid way to disable every rule.
    fn default() -> Self {
        Self {
            select: None,
            extend_select: None,
            ignore: None,
            exclude: None,
            default_exclude: None,
            follow_includes: None,
            rule_options: ResolvedRuleOptions::default(),
        }
    }
}
