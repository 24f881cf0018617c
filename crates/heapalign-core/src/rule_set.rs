use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultStatus {
    #[default]
    Enabled,
    Disabled,
}

/// Group of rules that can be selected at once, e.g. `--select PERF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Perf,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[Category::Perf]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Perf => "PERF",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|category| category.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    AlignedOperatorNew,
}

impl Rule {
    pub fn all() -> &'static [Rule] {
        &[Rule::AlignedOperatorNew]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AlignedOperatorNew => "aligned_operator_new",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|rule| rule.name() == name)
    }

    pub fn categories(&self) -> &'static [Category] {
        match self {
            Self::AlignedOperatorNew => &[Category::Perf],
        }
    }

    pub fn default_status(&self) -> DefaultStatus {
        match self {
            Self::AlignedOperatorNew => DefaultStatus::Enabled,
        }
    }

    /// One-line summary shown by `heapalign rule`.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::AlignedOperatorNew => {
                "Classes with fixed-size Eigen members must provide an aligned `operator new`."
            }
        }
    }

    /// Longer documentation shown by `heapalign rule <name>`.
    pub fn documentation(&self) -> &'static str {
        match self {
            Self::AlignedOperatorNew => {
                crate::lints::perf::aligned_operator_new::aligned_operator_new::DOCUMENTATION
            }
        }
    }

    pub fn is_enabled_by_default(&self) -> bool {
        self.default_status() == DefaultStatus::Enabled
    }

    pub fn is_in_category(&self, category: Category) -> bool {
        self.categories().contains(&category)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet(BTreeSet<Rule>);

impl RuleSet {
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn all() -> Self {
        Rule::all().iter().copied().collect()
    }

    /// Rules that run when nothing is selected explicitly.
    pub fn default_rules() -> Self {
        Rule::all()
            .iter()
            .copied()
            .filter(Rule::is_enabled_by_default)
            .collect()
    }

    pub fn contains(&self, rule: &Rule) -> bool {
        self.0.contains(rule)
    }

    pub fn insert(&mut self, rule: Rule) -> bool {
        self.0.insert(rule)
    }

    pub fn remove(&mut self, rule: &Rule) -> bool {
        self.0.remove(rule)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for RuleSet {
    type Item = Rule;
    type IntoIter = std::collections::btree_set::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Extend<Rule> for RuleSet {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
