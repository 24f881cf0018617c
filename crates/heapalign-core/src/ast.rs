//! Arena-backed syntax model consumed by the matchers.
//!
//! The front-end lowers a C++ parse tree into a [`TranslationUnit`]: a flat
//! vector of [`Node`]s addressed by [`NodeId`], where each node knows its
//! parent and its children in source order. Matchers never see the arena
//! directly; they navigate through [`NodeRef`], a copyable cursor borrowing
//! the unit, so any node reference handed out during matching cannot outlive
//! the tree it points into.

use std::fmt;
use std::path::{Path, PathBuf};

use biome_rowan::{TextRange, TextSize};

use crate::utils::normalize_spelling;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("more than u32::MAX syntax nodes"))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies one of the files that make up a translation unit. The primary
/// input file is always [`FileId::MAIN`]; headers reached through quoted
/// `#include`s get the following ids in the order they are first included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u32);

impl FileId {
    pub const MAIN: FileId = FileId(0);

    pub fn is_main(self) -> bool {
        self == Self::MAIN
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: FileId,
    pub range: TextRange,
}

impl SourceLocation {
    pub fn new(file: FileId, range: TextRange) -> Self {
        Self { file, range }
    }

    pub fn in_main_file(range: TextRange) -> Self {
        Self::new(FileId::MAIN, range)
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTag {
    Class,
    Struct,
    Union,
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Struct => write!(f, "struct"),
            Self::Union => write!(f, "union"),
        }
    }
}

/// A declared type, spelled the way it appears in the source after
/// whitespace normalization. Two descriptors are equal only if their
/// spellings are identical: no alias or typedef resolution happens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor(String);

impl TypeDescriptor {
    pub fn new(spelling: impl AsRef<str>) -> Self {
        Self(normalize_spelling(spelling.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDecl {
    /// `None` for anonymous structs, classes and unions.
    pub name: Option<String>,
    pub qualified_name: String,
    pub tag: RecordTag,
    /// `false` for forward declarations such as `struct S;`, which carry no
    /// member list.
    pub is_definition: bool,
    /// Range of the record's name, or of its keyword when anonymous.
    pub name_range: TextRange,
}

impl RecordDecl {
    /// Name used in messages: the qualified name, or a placeholder for
    /// anonymous records.
    pub fn display_name(&self) -> &str {
        &self.qualified_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub is_definition: bool,
    /// Set when the node stands for a macro invocation in a class body
    /// rather than a spelled-out member function.
    pub from_macro: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    TranslationUnit,
    Namespace { name: Option<String> },
    Record(RecordDecl),
    Field(FieldDecl),
    Method(MethodDecl),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TranslationUnit => "translation unit",
            Self::Namespace { .. } => "namespace",
            Self::Record(_) => "record",
            Self::Field(_) => "field",
            Self::Method(_) => "method",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    location: SourceLocation,
}

/// One primary file plus the headers it pulls in, lowered into a single tree.
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    nodes: Vec<Node>,
    files: Vec<SourceFile>,
}

impl TranslationUnit {
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef { unit: self, id: NodeId(0) }
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.index() < self.nodes.len(), "{id:?} is not part of this translation unit");
        NodeRef { unit: self, id }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn main_file(&self) -> &SourceFile {
        &self.files[FileId::MAIN.index()]
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.index()]
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// All nodes in pre-order, starting with the root.
    pub fn preorder(&self) -> impl Iterator<Item = NodeRef<'_>> {
        std::iter::once(self.root()).chain(self.root().descendants())
    }

    fn raw(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

/// How far a descendant walk reaches below its starting node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescendantScope {
    /// Every node in the subtree, including members of nested records.
    #[default]
    All,
    /// Nested records and methods are visited but not entered, so members are
    /// only seen from their innermost enclosing record. Anonymous member
    /// records are entered: their members are stored in the enclosing object.
    EnclosingRecord,
}

#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    unit: &'a TranslationUnit,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn unit(self) -> &'a TranslationUnit {
        self.unit
    }

    pub fn kind(self) -> &'a NodeKind {
        &self.unit.raw(self.id).kind
    }

    pub fn location(self) -> SourceLocation {
        self.unit.raw(self.id).location
    }

    pub fn range(self) -> TextRange {
        self.location().range
    }

    pub fn is_in_main_file(self) -> bool {
        self.location().file.is_main()
    }

    pub fn parent(self) -> Option<NodeRef<'a>> {
        self.unit
            .raw(self.id)
            .parent
            .map(|id| NodeRef { unit: self.unit, id })
    }

    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let unit = self.unit;
        unit.raw(self.id)
            .children
            .iter()
            .map(move |&id| NodeRef { unit, id })
    }

    /// Nodes strictly below this one, in pre-order (document order).
    pub fn descendants(self) -> Descendants<'a> {
        self.descendants_in(DescendantScope::All)
    }

    pub fn descendants_in(self, scope: DescendantScope) -> Descendants<'a> {
        let mut stack: Vec<NodeId> = self.unit.raw(self.id).children.clone();
        stack.reverse();
        Descendants { unit: self.unit, stack, scope }
    }

    pub fn as_record(self) -> Option<&'a RecordDecl> {
        match self.kind() {
            NodeKind::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_field(self) -> Option<&'a FieldDecl> {
        match self.kind() {
            NodeKind::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_method(self) -> Option<&'a MethodDecl> {
        match self.kind() {
            NodeKind::Method(method) => Some(method),
            _ => None,
        }
    }

    /// The unqualified name of the node, if it has one.
    pub fn name(self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::TranslationUnit => None,
            NodeKind::Namespace { name } => name.as_deref(),
            NodeKind::Record(record) => record.name.as_deref(),
            NodeKind::Field(field) => Some(&field.name),
            NodeKind::Method(method) => Some(&method.name),
        }
    }

    /// Closest record strictly above this node.
    pub fn enclosing_record(self) -> Option<NodeRef<'a>> {
        let mut current = self.parent();
        while let Some(node) = current {
            if node.as_record().is_some() {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    /// Source text covered by the node.
    pub fn text(self) -> &'a str {
        let location = self.location();
        let contents = &self.unit.file(location.file).contents;
        contents
            .get(usize::from(location.range.start())..usize::from(location.range.end()))
            .unwrap_or_default()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.unit, other.unit) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = self.location();
        write!(
            f,
            "{}#{} {:?}@{:?}{:?}",
            self.kind().name(),
            self.id.index(),
            self.name().unwrap_or(""),
            location.file,
            location.range
        )
    }
}

pub struct Descendants<'a> {
    unit: &'a TranslationUnit,
    stack: Vec<NodeId>,
    scope: DescendantScope,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.unit.raw(id);
        let enter = match self.scope {
            DescendantScope::All => true,
            DescendantScope::EnclosingRecord => match &node.kind {
                NodeKind::Record(record) => {
                    record.name.is_none()
                        && node.parent.is_some_and(|parent| {
                            matches!(self.unit.raw(parent).kind, NodeKind::Record(_))
                        })
                }
                NodeKind::Method(_) => false,
                _ => true,
            },
        };
        if enter {
            self.stack.extend(node.children.iter().rev());
        }
        Some(NodeRef { unit: self.unit, id })
    }
}

/// Builds a [`TranslationUnit`] top-down. Nodes opened with `start_*` become
/// the parent of everything pushed until the matching [`finish_node`] call,
/// so callers must emit children in source order.
///
/// [`finish_node`]: TranslationUnitBuilder::finish_node
#[derive(Debug)]
pub struct TranslationUnitBuilder {
    nodes: Vec<Node>,
    files: Vec<SourceFile>,
    open: Vec<NodeId>,
}

impl TranslationUnitBuilder {
    pub fn new(main_path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        let contents = contents.into();
        let len = TextSize::from(u32::try_from(contents.len()).unwrap_or(u32::MAX));
        let root = Node {
            kind: NodeKind::TranslationUnit,
            parent: None,
            children: Vec::new(),
            location: SourceLocation::in_main_file(TextRange::new(0.into(), len)),
        };
        Self {
            nodes: vec![root],
            files: vec![SourceFile { path: main_path.as_ref().to_path_buf(), contents }],
            open: vec![NodeId(0)],
        }
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> FileId {
        self.files.push(SourceFile {
            path: path.as_ref().to_path_buf(),
            contents: contents.into(),
        });
        FileId(u32::try_from(self.files.len() - 1).expect("too many included files"))
    }

    pub fn start_namespace(&mut self, name: Option<&str>, location: SourceLocation) -> NodeId {
        let kind = NodeKind::Namespace { name: name.map(normalize_spelling) };
        self.start_node(kind, location)
    }

    pub fn start_record(
        &mut self,
        tag: RecordTag,
        name: Option<&str>,
        is_definition: bool,
        location: SourceLocation,
        name_range: TextRange,
    ) -> NodeId {
        let name = name.map(normalize_spelling);
        let qualified_name = self.qualify(name.as_deref().unwrap_or(match tag {
            RecordTag::Class => "(anonymous class)",
            RecordTag::Struct => "(anonymous struct)",
            RecordTag::Union => "(anonymous union)",
        }));
        let record = RecordDecl { name, qualified_name, tag, is_definition, name_range };
        self.start_node(NodeKind::Record(record), location)
    }

    pub fn start_method(&mut self, method: MethodDecl, location: SourceLocation) -> NodeId {
        self.start_node(NodeKind::Method(method), location)
    }

    pub fn push_field(
        &mut self,
        name: &str,
        ty: TypeDescriptor,
        location: SourceLocation,
    ) -> NodeId {
        let field = FieldDecl { name: name.to_string(), ty };
        let id = self.start_node(NodeKind::Field(field), location);
        self.finish_node();
        id
    }

    pub fn push_method(&mut self, method: MethodDecl, location: SourceLocation) -> NodeId {
        let id = self.start_method(method, location);
        self.finish_node();
        id
    }

    pub fn finish_node(&mut self) {
        debug_assert!(self.open.len() > 1, "the root node cannot be finished");
        self.open.pop();
    }

    pub fn finish(self) -> TranslationUnit {
        debug_assert_eq!(self.open.len(), 1, "unbalanced start/finish calls");
        TranslationUnit { nodes: self.nodes, files: self.files }
    }

    fn start_node(&mut self, kind: NodeKind, location: SourceLocation) -> NodeId {
        let parent = *self.open.last().expect("the root node is always open");
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node { kind, parent: Some(parent), children: Vec::new(), location });
        self.nodes[parent.index()].children.push(id);
        self.open.push(id);
        id
    }

    /// Joins `name` with the names of the currently open namespaces and
    /// records. Anonymous namespaces do not contribute a component.
    fn qualify(&self, name: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        // The innermost open record already carries every scope above it.
        for id in self.open.iter().rev() {
            match &self.nodes[id.index()].kind {
                NodeKind::Record(record) => {
                    parts.push(&record.qualified_name);
                    break;
                }
                NodeKind::Namespace { name: Some(name) } => parts.push(name),
                _ => {}
            }
        }
        parts.reverse();
        parts.push(name);
        parts.join("::")
    }
}
