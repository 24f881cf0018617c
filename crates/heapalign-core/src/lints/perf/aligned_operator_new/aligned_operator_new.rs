use crate::ast::DescendantScope;
use crate::checker::Checker;
use crate::diagnostic::{Diagnostic, Violation};
use crate::finder::{MatchFinder, MatchResult};
use crate::lints::Check;
use crate::matcher::{
    DynMatcher, MatcherExt, any_of, field_decl, has_any_name, has_descendant_in_scope,
    is_expansion_in_main_file, method_decl, record_decl, type_is_any_of,
};
use crate::rule_options::aligned_operator_new::{NestedRecords, ResolvedAlignedOperatorNewOptions};
use crate::rule_set::Rule;

pub(crate) const MATCHED_CLASS: &str = "matched-class";
pub(crate) const ALLOC_OVERRIDE: &str = "alloc-override";
pub(crate) const UNSAFE_FIELD: &str = "unsafe-field";

pub(crate) const DOCUMENTATION: &str = "\
## What it does

Checks for classes, structs and unions that have a member of a fixed-size
vectorizable Eigen type (e.g. `Eigen::Matrix4f`, `Eigen::Vector4d`) but do
not provide an aligned `operator new`.

## Why is this bad?

Eigen assumes that these members are 16-byte aligned and uses aligned SIMD
loads and stores on them. Objects created with a plain `new` are only
guaranteed the default alignment of the platform allocator, so using such a
member of a heap-allocated object can crash or silently corrupt memory.

## Example

```cpp
struct Pose {
  Eigen::Matrix4f transform;
};
```

Use instead:

```cpp
struct Pose {
  Eigen::Matrix4f transform;
  EIGEN_MAKE_ALIGNED_OPERATOR_NEW
};
```

## Options

`[lint.aligned-operator-new]` accepts `types` / `extend-types`,
`allocation-overrides` / `extend-allocation-overrides`, and
`nested-records` (`\"innermost\"` or `\"all\"`).
";

pub struct AlignedOperatorNew {
    pub class: String,
    pub field: String,
    pub ty: String,
}

impl Violation for AlignedOperatorNew {
    fn name(&self) -> String {
        "aligned_operator_new".to_string()
    }
    fn body(&self) -> String {
        format!(
            "`{}` has a field `{}` of alignment-sensitive type `{}` but does not override `operator new`.",
            self.class, self.field, self.ty
        )
    }
    fn suggestion(&self) -> Option<String> {
        Some("Add `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` to the class body.".to_string())
    }
}

#[derive(Debug)]
pub(crate) struct AlignedOperatorNewCheck {
    options: ResolvedAlignedOperatorNewOptions,
}

impl AlignedOperatorNewCheck {
    pub(crate) fn new(options: &ResolvedAlignedOperatorNewOptions) -> Self {
        Self { options: options.clone() }
    }

    /// A record in the main file that either has an allocation override
    /// (bound as `alloc-override`) or, failing that, a field of one of the
    /// alignment-sensitive types (bound as `unsafe-field`).
    ///
    /// `any_of` stops at the first alternative that matches, so
    /// `unsafe-field` is only ever bound for records without an override.
    pub(crate) fn matcher(&self) -> DynMatcher {
        let scope = match self.options.nested_records {
            NestedRecords::Innermost => DescendantScope::EnclosingRecord,
            NestedRecords::All => DescendantScope::All,
        };

        let alloc_override = has_descendant_in_scope(
            method_decl()
                .and(has_any_name(&self.options.allocation_overrides))
                .bind(ALLOC_OVERRIDE),
            scope,
        );

        let unsafe_field = has_descendant_in_scope(
            field_decl()
                .and(type_is_any_of(&self.options.types))
                .bind(UNSAFE_FIELD),
            scope,
        );

        record_decl()
            .and(is_expansion_in_main_file())
            .and(any_of([alloc_override, unsafe_field]))
            .bind(MATCHED_CLASS)
    }
}

impl Check for AlignedOperatorNewCheck {
    fn rule(&self) -> Rule {
        Rule::AlignedOperatorNew
    }

    fn register_matchers<'c>(&'c self, finder: &mut MatchFinder<'c>) {
        finder.add_matcher(self.matcher(), self);
    }

    fn check(&self, result: &MatchResult<'_>, checker: &mut Checker) -> anyhow::Result<()> {
        let (record_node, record) = result.nodes.require_record(MATCHED_CLASS)?;

        // Members of an anonymous record that is itself a member live in the
        // enclosing object, which is reported instead.
        if record.name.is_none() && record_node.parent().is_some_and(|p| p.as_record().is_some()) {
            return Ok(());
        }

        if result.nodes.get(ALLOC_OVERRIDE)?.is_some() {
            return Ok(());
        }
        let Some((_, field)) = result.nodes.get_field(UNSAFE_FIELD)? else {
            return Ok(());
        };

        let diagnostic = Diagnostic::new(
            AlignedOperatorNew {
                class: record.display_name().to_string(),
                field: field.name.clone(),
                ty: field.ty.to_string(),
            },
            record.name_range,
        )
        .with_highlight(record_node.range());

        checker.report(diagnostic);
        Ok(())
    }
}
