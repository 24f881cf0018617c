use std::collections::HashSet;

use serde::Deserialize;

use super::resolve_with_extend;
use crate::utils::{is_identifier, normalize_spelling};

/// Fixed-size Eigen types whose storage needs 16-byte alignment.
pub const DEFAULT_TYPES: &[&str] = &[
    "Eigen::Matrix2f",
    "Eigen::Matrix3f",
    "Eigen::Matrix4f",
    "Eigen::MatrixXf",
    "Eigen::Matrix2d",
    "Eigen::Matrix3d",
    "Eigen::Matrix4d",
    "Eigen::MatrixXd",
    "Eigen::Vector2f",
    "Eigen::Vector3f",
    "Eigen::Vector4f",
    "Eigen::VectorXf",
    "Eigen::Vector2d",
    "Eigen::Vector3d",
    "Eigen::Vector4d",
    "Eigen::VectorXd",
];

/// Member names that count as a class-level allocation override. The macros
/// expand to `operator new` overloads.
pub const DEFAULT_ALLOCATION_OVERRIDES: &[&str] = &[
    "operator new",
    "EIGEN_MAKE_ALIGNED_OPERATOR_NEW",
    "EIGEN_MAKE_ALIGNED_OPERATOR_NEW_IF",
];

/// Which declaration a field is attributed to when records are nested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NestedRecords {
    /// A member belongs only to its innermost enclosing record.
    #[default]
    Innermost,
    /// A member also counts for every record that encloses it.
    All,
}

/// TOML options for `[lint.aligned-operator-new]`.
///
/// Use `types` to fully replace the default list of alignment-sensitive
/// types. Use `extend-types` to add to the default list. The same goes for
/// `allocation-overrides` and `extend-allocation-overrides`. Specifying both
/// variants of a field is an error.
#[derive(Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct AlignedOperatorNewOptions {
    pub types: Option<Vec<String>>,
    pub extend_types: Option<Vec<String>>,
    pub allocation_overrides: Option<Vec<String>>,
    pub extend_allocation_overrides: Option<Vec<String>>,
    pub nested_records: Option<NestedRecords>,
}

/// Resolved options for the `aligned_operator_new` rule, ready for use during
/// linting.
#[derive(Clone, Debug)]
pub struct ResolvedAlignedOperatorNewOptions {
    pub types: HashSet<String>,
    pub allocation_overrides: HashSet<String>,
    pub nested_records: NestedRecords,
}

impl ResolvedAlignedOperatorNewOptions {
    pub fn resolve(options: Option<&AlignedOperatorNewOptions>) -> anyhow::Result<Self> {
        let default_options = AlignedOperatorNewOptions::default();
        let options = options.unwrap_or(&default_options);

        let types = resolve_with_extend(
            options.types.as_ref(),
            options.extend_types.as_ref(),
            DEFAULT_TYPES,
            "aligned-operator-new",
            "types",
        )?;

        let allocation_overrides = resolve_with_extend(
            options.allocation_overrides.as_ref(),
            options.extend_allocation_overrides.as_ref(),
            DEFAULT_ALLOCATION_OVERRIDES,
            "aligned-operator-new",
            "allocation-overrides",
        )?;

        Ok(Self {
            types: types.iter().map(|ty| normalize_spelling(ty)).collect(),
            allocation_overrides: allocation_overrides
                .iter()
                .map(|name| normalize_spelling(name))
                .collect(),
            nested_records: options.nested_records.unwrap_or_default(),
        })
    }

    /// Override names that can only be spelled as a macro invocation in a
    /// class body, as opposed to a real member function name.
    pub fn allocation_macros(&self) -> impl Iterator<Item = &str> {
        self.allocation_overrides
            .iter()
            .map(String::as_str)
            .filter(|name| is_identifier(name))
    }
}

impl Default for ResolvedAlignedOperatorNewOptions {
    fn default() -> Self {
        Self::resolve(None).expect("default options should always resolve")
    }
}
