//! Composable predicates over [`NodeRef`]s.
//!
//! A matcher answers "does this node, and possibly the subtree below it,
//! have property P". Matchers are plain values combined through the builder
//! functions at the bottom of this module:
//!
//! ```ignore
//! let matcher = record_decl()
//!     .and(is_expansion_in_main_file())
//!     .and(has_descendant(field_decl().and(type_is("Eigen::Matrix4f"))).bind("field"))
//!     .bind("record");
//! ```
//!
//! Every matcher upholds one rule: when it returns `false`, the bindings are
//! exactly what they were before the call.

use std::fmt::Debug;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::ast::{DescendantScope, NodeKind, NodeRef, TypeDescriptor};
use crate::bindings::BoundNodes;
use crate::utils::normalize_spelling;

pub trait Matcher: Debug + Send + Sync {
    fn matches<'a>(&self, node: NodeRef<'a>, bindings: &mut BoundNodes<'a>) -> bool;

    /// Push every name this matcher (or any matcher nested in it) can bind.
    fn bound_names(&self, _names: &mut Vec<&'static str>) {}
}

pub type DynMatcher = Arc<dyn Matcher>;

/// The names `matcher` can bind, deduplicated, in declaration order.
pub fn declared_names(matcher: &dyn Matcher) -> Vec<&'static str> {
    let mut names = Vec::new();
    matcher.bound_names(&mut names);
    let mut seen = FxHashSet::default();
    names.retain(|name| seen.insert(*name));
    names
}

#[derive(Debug)]
pub struct AllOf {
    matchers: Vec<DynMatcher>,
}

impl Matcher for AllOf {
    fn matches<'a>(&self, node: NodeRef<'a>, bindings: &mut BoundNodes<'a>) -> bool {
        let checkpoint = bindings.checkpoint();
        for matcher in &self.matchers {
            if !matcher.matches(node, bindings) {
                bindings.rollback(checkpoint);
                return false;
            }
        }
        true
    }

    fn bound_names(&self, names: &mut Vec<&'static str>) {
        for matcher in &self.matchers {
            matcher.bound_names(names);
        }
    }
}

/// Succeeds with the first sub-matcher that matches; later ones are not
/// evaluated and therefore bind nothing.
#[derive(Debug)]
pub struct AnyOf {
    matchers: Vec<DynMatcher>,
}

impl Matcher for AnyOf {
    fn matches<'a>(&self, node: NodeRef<'a>, bindings: &mut BoundNodes<'a>) -> bool {
        let checkpoint = bindings.checkpoint();
        for matcher in &self.matchers {
            if matcher.matches(node, bindings) {
                return true;
            }
            bindings.rollback(checkpoint);
        }
        false
    }

    fn bound_names(&self, names: &mut Vec<&'static str>) {
        for matcher in &self.matchers {
            matcher.bound_names(names);
        }
    }
}

/// Succeeds if any node strictly below the current one matches `inner`.
///
/// Descendants are tried one at a time in document order, and each one is
/// tested against the whole `inner` matcher before moving on. With
/// `inner = any_of(a, b)`, the first descendant matching either `a` or `b`
/// decides which of them binds.
#[derive(Debug)]
pub struct HasDescendant {
    inner: DynMatcher,
    scope: DescendantScope,
}

impl Matcher for HasDescendant {
    fn matches<'a>(&self, node: NodeRef<'a>, bindings: &mut BoundNodes<'a>) -> bool {
        for descendant in node.descendants_in(self.scope) {
            let checkpoint = bindings.checkpoint();
            if self.inner.matches(descendant, bindings) {
                return true;
            }
            bindings.rollback(checkpoint);
        }
        false
    }

    fn bound_names(&self, names: &mut Vec<&'static str>) {
        self.inner.bound_names(names);
    }
}

#[derive(Debug)]
pub struct Bind {
    name: &'static str,
    inner: DynMatcher,
}

impl Matcher for Bind {
    fn matches<'a>(&self, node: NodeRef<'a>, bindings: &mut BoundNodes<'a>) -> bool {
        let checkpoint = bindings.checkpoint();
        if self.inner.matches(node, bindings) {
            bindings.insert(self.name, node);
            true
        } else {
            bindings.rollback(checkpoint);
            false
        }
    }

    fn bound_names(&self, names: &mut Vec<&'static str>) {
        names.push(self.name);
        self.inner.bound_names(names);
    }
}

/// Exact comparison against a field's declared type. Nodes without a
/// declared type never match.
#[derive(Debug)]
pub struct TypeIs {
    ty: TypeDescriptor,
}

impl Matcher for TypeIs {
    fn matches<'a>(&self, node: NodeRef<'a>, _bindings: &mut BoundNodes<'a>) -> bool {
        node.as_field().is_some_and(|field| field.ty == self.ty)
    }
}

#[derive(Debug)]
pub struct TypeIsAnyOf {
    spellings: FxHashSet<String>,
}

impl Matcher for TypeIsAnyOf {
    fn matches<'a>(&self, node: NodeRef<'a>, _bindings: &mut BoundNodes<'a>) -> bool {
        node.as_field()
            .is_some_and(|field| self.spellings.contains(field.ty.as_str()))
    }
}

/// Matches the node's own name; records also match on their qualified name.
#[derive(Debug)]
pub struct HasName {
    name: String,
}

impl Matcher for HasName {
    fn matches<'a>(&self, node: NodeRef<'a>, _bindings: &mut BoundNodes<'a>) -> bool {
        name_matches(node, |name| name == self.name)
    }
}

#[derive(Debug)]
pub struct HasAnyName {
    names: FxHashSet<String>,
}

impl Matcher for HasAnyName {
    fn matches<'a>(&self, node: NodeRef<'a>, _bindings: &mut BoundNodes<'a>) -> bool {
        name_matches(node, |name| self.names.contains(name))
    }
}

fn name_matches(node: NodeRef<'_>, predicate: impl Fn(&str) -> bool) -> bool {
    if node.name().is_some_and(&predicate) {
        return true;
    }
    node.as_record()
        .is_some_and(|record| predicate(&record.qualified_name))
}

#[derive(Debug)]
pub struct IsExpansionInMainFile;

impl Matcher for IsExpansionInMainFile {
    fn matches<'a>(&self, node: NodeRef<'a>, _bindings: &mut BoundNodes<'a>) -> bool {
        node.is_in_main_file()
    }
}

#[derive(Debug)]
pub struct IsRecord;

impl Matcher for IsRecord {
    fn matches<'a>(&self, node: NodeRef<'a>, _bindings: &mut BoundNodes<'a>) -> bool {
        matches!(node.kind(), NodeKind::Record(_))
    }
}

#[derive(Debug)]
pub struct IsField;

impl Matcher for IsField {
    fn matches<'a>(&self, node: NodeRef<'a>, _bindings: &mut BoundNodes<'a>) -> bool {
        matches!(node.kind(), NodeKind::Field(_))
    }
}

#[derive(Debug)]
pub struct IsMethod;

impl Matcher for IsMethod {
    fn matches<'a>(&self, node: NodeRef<'a>, _bindings: &mut BoundNodes<'a>) -> bool {
        matches!(node.kind(), NodeKind::Method(_))
    }
}

/// Records with a member list and methods with a body.
#[derive(Debug)]
pub struct IsDefinition;

impl Matcher for IsDefinition {
    fn matches<'a>(&self, node: NodeRef<'a>, _bindings: &mut BoundNodes<'a>) -> bool {
        match node.kind() {
            NodeKind::Record(record) => record.is_definition,
            NodeKind::Method(method) => method.is_definition,
            _ => false,
        }
    }
}

pub fn all_of(matchers: impl IntoIterator<Item = DynMatcher>) -> DynMatcher {
    Arc::new(AllOf { matchers: matchers.into_iter().collect() })
}

pub fn any_of(matchers: impl IntoIterator<Item = DynMatcher>) -> DynMatcher {
    Arc::new(AnyOf { matchers: matchers.into_iter().collect() })
}

pub fn has_descendant(inner: DynMatcher) -> DynMatcher {
    has_descendant_in_scope(inner, DescendantScope::All)
}

pub fn has_descendant_in_scope(inner: DynMatcher, scope: DescendantScope) -> DynMatcher {
    Arc::new(HasDescendant { inner, scope })
}

pub fn bind(name: &'static str, inner: DynMatcher) -> DynMatcher {
    Arc::new(Bind { name, inner })
}

pub fn type_is(spelling: &str) -> DynMatcher {
    Arc::new(TypeIs { ty: TypeDescriptor::new(spelling) })
}

pub fn type_is_any_of<S: AsRef<str>>(spellings: impl IntoIterator<Item = S>) -> DynMatcher {
    let spellings = spellings
        .into_iter()
        .map(|spelling| normalize_spelling(spelling.as_ref()))
        .collect();
    Arc::new(TypeIsAnyOf { spellings })
}

pub fn has_name(name: &str) -> DynMatcher {
    Arc::new(HasName { name: normalize_spelling(name) })
}

pub fn has_any_name<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> DynMatcher {
    let names = names
        .into_iter()
        .map(|name| normalize_spelling(name.as_ref()))
        .collect();
    Arc::new(HasAnyName { names })
}

pub fn is_expansion_in_main_file() -> DynMatcher {
    Arc::new(IsExpansionInMainFile)
}

pub fn record_decl() -> DynMatcher {
    Arc::new(IsRecord)
}

pub fn field_decl() -> DynMatcher {
    Arc::new(IsField)
}

pub fn method_decl() -> DynMatcher {
    Arc::new(IsMethod)
}

pub fn is_definition() -> DynMatcher {
    Arc::new(IsDefinition)
}

pub trait MatcherExt {
    fn bind(self, name: &'static str) -> DynMatcher;
    fn and(self, other: DynMatcher) -> DynMatcher;
}

impl MatcherExt for DynMatcher {
    fn bind(self, name: &'static str) -> DynMatcher {
        bind(name, self)
    }

    fn and(self, other: DynMatcher) -> DynMatcher {
        all_of([self, other])
    }
}
