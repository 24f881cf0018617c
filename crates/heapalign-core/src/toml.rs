use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::rule_options::ResolvedRuleOptions;
use crate::rule_options::aligned_operator_new::AlignedOperatorNewOptions;
use crate::settings::{LinterSettings, Settings};

pub fn parse_heapalign_toml(path: &Path) -> Result<TomlOptions, ParseTomlError> {
    let contents =
        fs::read_to_string(path).map_err(|err| ParseTomlError::Read(path.to_path_buf(), err))?;
    toml::from_str(&contents).map_err(|err| ParseTomlError::Deserialize(path.to_path_buf(), err))
}

#[derive(Debug, thiserror::Error)]
pub enum ParseTomlError {
    #[error("Failed to read {}: {}", .0.display(), .1)]
    Read(PathBuf, io::Error),
    #[error("Failed to parse {}:\n{}", .0.display(), .1)]
    Deserialize(PathBuf, toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct TomlOptions {
    pub lint: Option<LinterTomlOptions>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct LinterTomlOptions {
    pub select: Option<Vec<String>>,
    pub extend_select: Option<Vec<String>>,
    pub ignore: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub default_exclude: Option<bool>,
    pub follow_includes: Option<bool>,
    pub aligned_operator_new: Option<AlignedOperatorNewOptions>,
}

impl TomlOptions {
    pub fn into_settings(self) -> anyhow::Result<Settings> {
        let linter = self.lint.unwrap_or_default();
        let rule_options = ResolvedRuleOptions::resolve(linter.aligned_operator_new.as_ref())?;

        let linter = LinterSettings {
            select: linter.select,
            extend_select: linter.extend_select,
            ignore: linter.ignore,
            exclude: linter.exclude,
            default_exclude: linter.default_exclude,
            follow_includes: linter.follow_includes,
            rule_options,
        };

        Ok(Settings { linter })
    }
}
