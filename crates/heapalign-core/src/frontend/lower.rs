use std::fs;
use std::path::{Path, PathBuf};

use biome_rowan::{TextRange, TextSize};
use rustc_hash::FxHashSet;
use tree_sitter::{Node, Parser, Tree};

use super::{FrontendOptions, parse};
use crate::ast::{
    FileId, MethodDecl, RecordTag, SourceLocation, TranslationUnit, TranslationUnitBuilder,
    TypeDescriptor,
};
use crate::utils::normalize_spelling;

pub(super) fn lower_translation_unit(
    parser: Parser,
    options: &FrontendOptions,
    path: &Path,
    contents: &str,
    tree: &Tree,
) -> anyhow::Result<TranslationUnit> {
    let mut lowering = Lowering {
        parser,
        options,
        builder: TranslationUnitBuilder::new(path, contents),
        seen_files: FxHashSet::default(),
    };
    lowering.seen_files.insert(canonical(path));

    let file = SourceText { id: FileId::MAIN, path, source: contents };
    lowering.lower_items(&file, tree.root_node());

    Ok(lowering.builder.finish())
}

/// One file being lowered: where its nodes come from and the text their
/// byte ranges index into.
struct SourceText<'s> {
    id: FileId,
    path: &'s Path,
    source: &'s str,
}

impl<'s> SourceText<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    fn location(&self, node: Node<'_>) -> SourceLocation {
        SourceLocation::new(self.id, text_range(node))
    }
}

struct Lowering<'o> {
    parser: Parser,
    options: &'o FrontendOptions,
    builder: TranslationUnitBuilder,
    seen_files: FxHashSet<PathBuf>,
}

impl Lowering<'_> {
    /// Lower the named children of a namespace-level construct.
    fn lower_items(&mut self, file: &SourceText<'_>, node: Node<'_>) {
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        for child in children {
            self.lower_item(file, child);
        }
    }

    fn lower_item(&mut self, file: &SourceText<'_>, node: Node<'_>) {
        match node.kind() {
            "namespace_definition" => self.lower_namespace(file, node),
            kind if is_record_specifier(kind) => self.lower_record(file, node),
            "preproc_include" => self.lower_include(file, node),
            "comment" => {}
            // Declarations, templates, linkage specifications, conditionals,
            // function bodies: anything may contain a record definition.
            _ => self.lower_items(file, node),
        }
    }

    fn lower_namespace(&mut self, file: &SourceText<'_>, node: Node<'_>) {
        let name = node.child_by_field_name("name").map(|name| file.text(name));
        self.builder.start_namespace(name, file.location(node));
        if let Some(body) = node.child_by_field_name("body") {
            self.lower_items(file, body);
        }
        self.builder.finish_node();
    }

    fn lower_record(&mut self, file: &SourceText<'_>, node: Node<'_>) {
        let tag = match node.kind() {
            "class_specifier" => RecordTag::Class,
            "union_specifier" => RecordTag::Union,
            _ => RecordTag::Struct,
        };
        let body = node.child_by_field_name("body");

        // `struct S *p;` only refers to a record.
        if body.is_none() && !is_forward_declaration(node) {
            return;
        }

        let name_node = node.child_by_field_name("name");
        let name = name_node
            .map(|name| file.text(name))
            .or_else(|| typedef_name(file, node));
        let name_range = match name_node {
            Some(name) => text_range(name),
            None => keyword_range(node),
        };

        self.builder
            .start_record(tag, name, body.is_some(), file.location(node), name_range);
        if let Some(body) = body {
            self.lower_members(file, body);
        }
        self.builder.finish_node();
    }

    fn lower_members(&mut self, file: &SourceText<'_>, list: Node<'_>) {
        let mut cursor = list.walk();
        let members: Vec<Node<'_>> = list.named_children(&mut cursor).collect();
        for member in members {
            self.lower_member(file, member);
        }
    }

    fn lower_member(&mut self, file: &SourceText<'_>, member: Node<'_>) {
        match member.kind() {
            "field_declaration" | "declaration" => {
                self.lower_allocation_macros(file, member);
                self.lower_member_declaration(file, member);
            }
            "function_definition" => {
                self.lower_allocation_macros(file, member);
                self.lower_method_definition(file, member);
            }
            "template_declaration" => self.lower_members(file, member),
            kind if is_conditional(kind) => self.lower_conditional_members(file, member),
            kind if is_record_specifier(kind) => self.lower_record(file, member),
            // Unexpanded macros often confuse the parser; keep looking for
            // members inside the error.
            "ERROR" => self.lower_members(file, member),
            "access_specifier" | "comment" | "friend_declaration" => {}
            kind if kind.starts_with("preproc_") => {}
            _ => {
                self.lower_allocation_macros(file, member);
                self.lower_items(file, member);
            }
        }
    }

    /// Both branches of `#if`/`#ifdef` are lowered; the condition itself is
    /// not a member.
    fn lower_conditional_members(&mut self, file: &SourceText<'_>, node: Node<'_>) {
        let condition: Vec<usize> = ["condition", "name"]
            .into_iter()
            .filter_map(|field| node.child_by_field_name(field))
            .map(|child| child.id())
            .collect();

        let mut cursor = node.walk();
        let members: Vec<Node<'_>> = node
            .named_children(&mut cursor)
            .filter(|child| !condition.contains(&child.id()))
            .collect();
        for member in members {
            self.lower_member(file, member);
        }
    }

    fn lower_member_declaration(&mut self, file: &SourceText<'_>, node: Node<'_>) {
        let ty = node.child_by_field_name("type");
        if let Some(ty) = ty
            && is_record_specifier(ty.kind())
        {
            self.lower_record(file, ty);
        }

        // Static data members are not part of the object.
        let is_static = has_storage_class(file, node, "static");

        let mut cursor = node.walk();
        let declarators: Vec<Node<'_>> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();

        for declarator in declarators {
            if let Some(function) = find_function_declarator(declarator) {
                self.lower_method(file, node, function, false, None);
                continue;
            }
            if is_static {
                continue;
            }
            let Some(ty) = ty else {
                continue;
            };
            let Some((name, suffix)) = declarator_name(file, declarator) else {
                continue;
            };
            let spelling = format!(
                "{}{}{}",
                leading_qualifiers(file, node, ty),
                type_spelling(file, ty),
                suffix
            );
            self.builder
                .push_field(name, TypeDescriptor::new(spelling), file.location(node));
        }
    }

    fn lower_method_definition(&mut self, file: &SourceText<'_>, node: Node<'_>) {
        let body = node.child_by_field_name("body");
        let function = node
            .child_by_field_name("declarator")
            .and_then(find_function_declarator);

        match function {
            Some(function) => self.lower_method(file, node, function, true, body),
            None => {
                if let Some(body) = body {
                    self.lower_items(file, body);
                }
            }
        }
    }

    fn lower_method(
        &mut self,
        file: &SourceText<'_>,
        node: Node<'_>,
        function: Node<'_>,
        is_definition: bool,
        body: Option<Node<'_>>,
    ) {
        let Some(name) = function.child_by_field_name("declarator") else {
            return;
        };
        let name = normalize_spelling(file.text(name));
        // Function-like allocation macros parse as member declarations; they
        // are picked up as macros instead.
        if self.options.allocation_macros.contains(&name) {
            return;
        }

        let method = MethodDecl {
            name,
            is_definition,
            from_macro: false,
        };
        self.builder.start_method(method, file.location(node));
        if let Some(body) = body {
            self.lower_items(file, body);
        }
        self.builder.finish_node();
    }

    /// Macros such as `EIGEN_MAKE_ALIGNED_OPERATOR_NEW` are not expanded, so
    /// tree-sitter sees a bare identifier, often glued to the next member.
    /// Any configured macro name spelled inside the member (but not inside a
    /// nested record or a function body) becomes a method node.
    fn lower_allocation_macros(&mut self, file: &SourceText<'_>, member: Node<'_>) {
        if self.options.allocation_macros.is_empty() {
            return;
        }

        let mut found = Vec::new();
        let mut stack = vec![member];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "identifier" | "type_identifier" | "field_identifier" => {
                    if self.options.allocation_macros.contains(file.text(node)) {
                        found.push(node);
                    }
                }
                "field_declaration_list" | "compound_statement" => {}
                _ => {
                    let mut cursor = node.walk();
                    stack.extend(node.named_children(&mut cursor));
                }
            }
        }
        found.sort_by_key(|node| node.start_byte());

        for node in found {
            let name = file.text(node);
            tracing::trace!(macro_name = name, path = %file.path.display(), "allocation macro");
            let method = MethodDecl {
                name: name.to_string(),
                is_definition: false,
                from_macro: true,
            };
            self.builder.push_method(method, file.location(node));
        }
    }

    fn lower_include(&mut self, file: &SourceText<'_>, node: Node<'_>) {
        if !self.options.follow_includes {
            return;
        }
        // `<...>` includes are system or third-party headers.
        let Some(path) = node.child_by_field_name("path") else {
            return;
        };
        if path.kind() != "string_literal" {
            return;
        }
        let target = file.text(path).trim_matches('"');
        if target.is_empty() {
            return;
        }

        let header = file
            .path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(target);
        if !self.seen_files.insert(canonical(&header)) {
            return;
        }

        let contents = match fs::read_to_string(&header) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::debug!(header = %header.display(), "skipping include: {err}");
                return;
            }
        };
        let tree = match parse(&mut self.parser, &header, &contents) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::debug!(header = %header.display(), "skipping include: {err}");
                return;
            }
        };

        tracing::debug!(header = %header.display(), "following include");
        let id = self.builder.add_file(&header, contents.clone());
        let included = SourceText { id, path: &header, source: &contents };
        self.lower_items(&included, tree.root_node());
    }
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn text_range(node: Node<'_>) -> TextRange {
    TextRange::new(offset(node.start_byte()), offset(node.end_byte()))
}

fn offset(byte: usize) -> TextSize {
    TextSize::from(u32::try_from(byte).unwrap_or(u32::MAX))
}

fn is_record_specifier(kind: &str) -> bool {
    matches!(kind, "class_specifier" | "struct_specifier" | "union_specifier")
}

fn is_conditional(kind: &str) -> bool {
    matches!(
        kind,
        "preproc_if" | "preproc_ifdef" | "preproc_else" | "preproc_elif" | "preproc_elifdef"
    )
}

/// A record specifier without a body declares a record only when it stands
/// alone, as in `struct S;`.
fn is_forward_declaration(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        "declaration" | "field_declaration" => parent.child_by_field_name("declarator").is_none(),
        "translation_unit" | "declaration_list" | "field_declaration_list"
        | "template_declaration" => true,
        kind => is_conditional(kind),
    }
}

/// `typedef struct { ... } Name;` gives the anonymous struct a name.
fn typedef_name<'s>(file: &SourceText<'s>, node: Node<'_>) -> Option<&'s str> {
    let parent = node.parent()?;
    if parent.kind() != "type_definition" {
        return None;
    }
    let declarator = parent.child_by_field_name("declarator")?;
    (declarator.kind() == "type_identifier").then(|| file.text(declarator))
}

/// Range of the `struct`/`class`/`union` keyword.
fn keyword_range(node: Node<'_>) -> TextRange {
    let mut cursor = node.walk();
    let keyword = node.children(&mut cursor).next();
    keyword.map_or_else(|| text_range(node), text_range)
}

fn has_storage_class(file: &SourceText<'_>, node: Node<'_>, class: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .any(|child| child.kind() == "storage_class_specifier" && file.text(child) == class);
    found
}

/// `const`/`volatile` written before the type.
fn leading_qualifiers(file: &SourceText<'_>, node: Node<'_>, ty: Node<'_>) -> String {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() == "type_qualifier" && child.end_byte() <= ty.start_byte())
        .map(|child| format!("{} ", file.text(child)))
        .collect()
}

fn type_spelling(file: &SourceText<'_>, ty: Node<'_>) -> String {
    if !is_record_specifier(ty.kind()) {
        return file.text(ty).to_string();
    }
    match ty.child_by_field_name("name") {
        Some(name) => file.text(name).to_string(),
        None => format!("(anonymous {})", keyword(ty.kind())),
    }
}

fn keyword(kind: &str) -> &'static str {
    match kind {
        "class_specifier" => "class",
        "union_specifier" => "union",
        _ => "struct",
    }
}

fn inner_declarator(node: Node<'_>) -> Option<Node<'_>> {
    if let Some(inner) = node.child_by_field_name("declarator") {
        return Some(inner);
    }
    let mut cursor = node.walk();
    let inner = node.named_children(&mut cursor).next();
    inner
}

/// The function declarator a member declarator wraps, if it declares a
/// member function. `void (*callback)(int)` declares a pointer instead.
fn find_function_declarator(declarator: Node<'_>) -> Option<Node<'_>> {
    let mut current = declarator;
    loop {
        match current.kind() {
            "function_declarator" => {
                let inner = current.child_by_field_name("declarator")?;
                return (inner.kind() != "parenthesized_declarator").then_some(current);
            }
            "pointer_declarator" | "reference_declarator" | "init_declarator"
            | "attributed_declarator" => current = inner_declarator(current)?,
            _ => return None,
        }
    }
}

/// The declared name and the type suffix contributed by the declarator,
/// e.g. `*p` gives `("p", " *")` and `a[3]` gives `("a", " [3]")`.
fn declarator_name<'s>(file: &SourceText<'s>, declarator: Node<'_>) -> Option<(&'s str, String)> {
    let mut suffix = String::new();
    let mut current = declarator;
    loop {
        match current.kind() {
            "field_identifier" | "identifier" => return Some((file.text(current), suffix)),
            "pointer_declarator" => suffix.push_str(" *"),
            "reference_declarator" => {
                if file.text(current).trim_start().starts_with("&&") {
                    suffix.push_str(" &&");
                } else {
                    suffix.push_str(" &");
                }
            }
            "array_declarator" => {
                let size = current
                    .child_by_field_name("size")
                    .map(|size| file.text(size))
                    .unwrap_or_default();
                suffix.push_str(&format!(" [{size}]"));
            }
            "init_declarator" | "parenthesized_declarator" | "attributed_declarator" => {}
            _ => return None,
        }
        current = inner_declarator(current)?;
    }
}
