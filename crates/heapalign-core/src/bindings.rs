use crate::ast::{FieldDecl, NodeRef, RecordDecl};
use crate::error::BindingError;

/// Nodes captured under symbolic names during one successful match.
///
/// A `BoundNodes` lives for exactly one visit of the match finder. It borrows
/// the translation unit, so a binding can never outlive the tree it points
/// into. Lookups are checked against the names the registered matcher can
/// bind: asking for any other name is a programming error and is reported
/// as [`BindingError::Undeclared`] instead of an empty result.
#[derive(Debug, Clone)]
pub struct BoundNodes<'a> {
    entries: Vec<(&'static str, NodeRef<'a>)>,
    declared: &'a [&'static str],
}

/// Position in a [`BoundNodes`] that can be restored with
/// [`BoundNodes::rollback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl<'a> BoundNodes<'a> {
    pub fn new(declared: &'a [&'static str]) -> Self {
        Self { entries: Vec::new(), declared }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.entries.len())
    }

    /// Drop every binding recorded since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.entries.truncate(checkpoint.0);
    }

    pub fn insert(&mut self, name: &'static str, node: NodeRef<'a>) {
        self.entries.push((name, node));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, NodeRef<'a>)> + '_ {
        self.entries.iter().copied()
    }

    /// The node bound under `name`, or `None` if the match did not capture
    /// it. When a name was bound more than once, the latest binding wins.
    pub fn get(&self, name: &str) -> Result<Option<NodeRef<'a>>, BindingError> {
        if !self.declared.contains(&name) {
            return Err(BindingError::Undeclared { name: name.to_string() });
        }
        Ok(self
            .entries
            .iter()
            .rev()
            .find(|(bound, _)| *bound == name)
            .map(|(_, node)| *node))
    }

    pub fn require(&self, name: &str) -> Result<NodeRef<'a>, BindingError> {
        self.get(name)?
            .ok_or_else(|| BindingError::Unbound { name: name.to_string() })
    }

    pub fn require_record(
        &self,
        name: &str,
    ) -> Result<(NodeRef<'a>, &'a RecordDecl), BindingError> {
        let node = self.require(name)?;
        let record = node.as_record().ok_or_else(|| unexpected_kind(name, "record", node))?;
        Ok((node, record))
    }

    pub fn get_field(
        &self,
        name: &str,
    ) -> Result<Option<(NodeRef<'a>, &'a FieldDecl)>, BindingError> {
        let Some(node) = self.get(name)? else {
            return Ok(None);
        };
        let field = node.as_field().ok_or_else(|| unexpected_kind(name, "field", node))?;
        Ok(Some((node, field)))
    }
}

fn unexpected_kind(name: &str, expected: &'static str, node: NodeRef<'_>) -> BindingError {
    BindingError::UnexpectedKind {
        name: name.to_string(),
        expected,
        found: node.kind().name(),
    }
}
