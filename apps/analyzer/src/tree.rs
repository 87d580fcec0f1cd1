//! Tree-query provider for parsed submissions.
//!
//! Rule functions only see the `TreeQuery` trait: whole-unit lookups by name
//! or node kind, function lookup, and source text of a node. `GoPackage` is
//! the tree-sitter backed implementation; a package may span several files.
//! Node-local navigation (children, fields, doc comments) is done with the
//! free helpers below on plain `tree_sitter::Node`s.

use crate::error::{AnalyzerError, Result};
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// Read-only queries over one parsed submission.
pub trait TreeQuery {
    /// Source text of every file, in load order.
    fn sources(&self) -> Vec<&str>;

    /// Root node of every file, in load order.
    fn roots(&self) -> Vec<Node<'_>>;

    /// Identifier-like nodes whose text equals `name`, across all files.
    fn find_by_name(&self, name: &str) -> Vec<Node<'_>>;

    /// Nodes of the given grammar kind, across all files, in document order.
    fn find_by_kind(&self, kind: &str) -> Vec<Node<'_>>;

    /// Top-level function declaration named `name`.
    fn func_decl(&self, name: &str) -> Option<Node<'_>>;

    /// Source text covered by `node`; empty when the node is foreign.
    fn text<'a>(&'a self, node: Node<'a>) -> &'a str;
}

const NAME_KINDS: &[&str] = &[
    "identifier",
    "field_identifier",
    "type_identifier",
    "package_identifier",
];

/// One parsed Go source file.
pub struct GoFile {
    pub path: PathBuf,
    pub source: String,
    tree: Tree,
}

impl GoFile {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

/// A Go package made of one or more parsed files.
pub struct GoPackage {
    files: Vec<GoFile>,
}

impl GoPackage {
    /// Parse `(path, source)` pairs into one package.
    ///
    /// Tree-sitter is error tolerant: syntax errors end up as ERROR/MISSING
    /// nodes (see `syntax_errors`), not as a failure here.
    pub fn parse<I>(files: I) -> Result<Self>
    where
        I: IntoIterator<Item = (PathBuf, String)>,
    {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_go::LANGUAGE.into())?;
        let mut parsed = Vec::new();
        for (path, source) in files {
            let tree = parser
                .parse(&source, None)
                .ok_or_else(|| AnalyzerError::Parse(path.clone()))?;
            parsed.push(GoFile { path, source, tree });
        }
        Ok(Self { files: parsed })
    }

    /// Single in-memory file.
    pub fn parse_str(source: &str) -> Result<Self> {
        Self::parse([(PathBuf::from("solution.go"), source.to_string())])
    }

    pub fn files(&self) -> &[GoFile] {
        &self.files
    }

    /// Number of ERROR or MISSING nodes over all files.
    pub fn syntax_errors(&self) -> usize {
        self.files
            .iter()
            .map(|f| {
                let mut count = 0;
                walk(f.root(), &mut |n| {
                    if n.is_error() || n.is_missing() {
                        count += 1;
                    }
                });
                count
            })
            .sum()
    }

    fn file_of(&self, node: Node<'_>) -> Option<&GoFile> {
        let mut root = node;
        while let Some(parent) = root.parent() {
            root = parent;
        }
        self.files.iter().find(|f| f.root() == root)
    }

    pub fn path_of(&self, node: Node<'_>) -> Option<&Path> {
        self.file_of(node).map(|f| f.path.as_path())
    }
}

impl TreeQuery for GoPackage {
    fn sources(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.source.as_str()).collect()
    }

    fn roots(&self) -> Vec<Node<'_>> {
        self.files.iter().map(|f| f.root()).collect()
    }

    fn find_by_name(&self, name: &str) -> Vec<Node<'_>> {
        let mut out = Vec::new();
        for f in &self.files {
            let bytes = f.source.as_bytes();
            walk(f.root(), &mut |n| {
                if NAME_KINDS.contains(&n.kind()) && n.utf8_text(bytes).ok() == Some(name) {
                    out.push(n);
                }
            });
        }
        out
    }

    fn find_by_kind(&self, kind: &str) -> Vec<Node<'_>> {
        let mut out = Vec::new();
        for f in &self.files {
            out.extend(descendants(f.root(), kind));
        }
        out
    }

    fn func_decl(&self, name: &str) -> Option<Node<'_>> {
        self.files.iter().find_map(|f| {
            let root = f.root();
            (0..root.named_child_count())
                .filter_map(|i| root.named_child(i))
                .filter(|n| n.kind() == "function_declaration")
                .find(|n| {
                    n.child_by_field_name("name")
                        .and_then(|id| id.utf8_text(f.source.as_bytes()).ok())
                        == Some(name)
                })
        })
    }

    fn text<'a>(&'a self, node: Node<'a>) -> &'a str {
        self.file_of(node)
            .and_then(|f| node.utf8_text(f.source.as_bytes()).ok())
            .unwrap_or("")
    }
}

/// Preorder visit of `node` and every descendant, named or anonymous.
pub fn walk<'t>(node: Node<'t>, visit: &mut impl FnMut(Node<'t>)) {
    let mut stack = vec![node];
    while let Some(n) = stack.pop() {
        visit(n);
        for i in (0..n.child_count()).rev() {
            if let Some(child) = n.child(i) {
                stack.push(child);
            }
        }
    }
}

/// `node` and its descendants of the given kind, in document order.
pub fn descendants<'t>(node: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    walk(node, &mut |n| {
        if n.kind() == kind {
            out.push(n);
        }
    });
    out
}

pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .collect()
}

/// First comment of the comment block directly above `node`.
///
/// Comments separated from the node (or from each other) by a blank line do
/// not count, nor does a trailing comment on the line of the previous token.
pub fn doc_comment(node: Node<'_>) -> Option<Node<'_>> {
    let mut first: Option<Node<'_>> = None;
    let mut next_row = node.start_position().row;
    let mut cur = node.prev_named_sibling();
    while let Some(c) = cur {
        if c.kind() != "comment" || c.end_position().row + 1 < next_row {
            break;
        }
        let trailing = c.prev_named_sibling().map_or(false, |p| {
            p.kind() != "comment" && p.end_position().row == c.start_position().row
        });
        if trailing {
            break;
        }
        first = Some(c);
        next_row = c.start_position().row;
        cur = c.prev_named_sibling();
    }
    first
}

/// Number of entries in a parameter or result list.
///
/// A bare result type (e.g. `string`) counts as one; `(a, b string)` counts
/// as two.
pub fn list_arity(node: Node<'_>) -> usize {
    if node.kind() != "parameter_list" {
        return 1;
    }
    named_children(node)
        .into_iter()
        .filter(|c| c.kind().ends_with("parameter_declaration"))
        .map(|decl| {
            named_children(decl)
                .iter()
                .filter(|c| c.kind() == "identifier")
                .count()
                .max(1)
        })
        .sum()
}

/// Parameter names of a function declaration, in order.
pub fn param_names<'a>(pkg: &'a dyn TreeQuery, func: Node<'a>) -> Vec<&'a str> {
    let Some(params) = func.child_by_field_name("parameters") else {
        return Vec::new();
    };
    named_children(params)
        .into_iter()
        .flat_map(named_children)
        .filter(|c| c.kind() == "identifier")
        .map(|c| pkg.text(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = r#"// Package twofer shares.
package twofer

import "fmt"

// ShareWith returns the phrase.
func ShareWith(name string) string {
	return fmt.Sprintf("One for %s, one for me.", name)
}

func helper(a, b int) (int, error) { return a + b, nil }
"#;

    #[test]
    fn test_func_decl_and_text() {
        let pkg = GoPackage::parse_str(SRC).unwrap();
        let f = pkg.func_decl("ShareWith").unwrap();
        assert!(pkg.text(f).starts_with("func ShareWith(name string) string"));
        assert!(pkg.func_decl("Missing").is_none());
        assert_eq!(pkg.syntax_errors(), 0);
    }

    #[test]
    fn test_find_by_name_and_kind() {
        let pkg = GoPackage::parse_str(SRC).unwrap();
        let sprintf = pkg.find_by_name("Sprintf");
        assert_eq!(sprintf.len(), 1);
        assert_eq!(
            sprintf[0].parent().map(|p| p.kind()),
            Some("selector_expression")
        );
        assert_eq!(pkg.find_by_kind("function_declaration").len(), 2);
        assert!(pkg.find_by_name("Join").is_empty());
    }

    #[test]
    fn test_arity_and_param_names() {
        let pkg = GoPackage::parse_str(SRC).unwrap();
        let share = pkg.func_decl("ShareWith").unwrap();
        let helper = pkg.func_decl("helper").unwrap();
        let arity = |f: Node<'_>, field: &str| f.child_by_field_name(field).map(list_arity);
        assert_eq!(arity(share, "parameters"), Some(1));
        assert_eq!(arity(share, "result"), Some(1));
        assert_eq!(arity(helper, "parameters"), Some(2));
        assert_eq!(arity(helper, "result"), Some(2));
        assert_eq!(param_names(&pkg, helper), vec!["a", "b"]);
    }

    #[test]
    fn test_doc_comments() {
        let pkg = GoPackage::parse_str(SRC).unwrap();
        let share = pkg.func_decl("ShareWith").unwrap();
        let doc = doc_comment(share).unwrap();
        assert_eq!(pkg.text(doc), "// ShareWith returns the phrase.");
        assert!(doc_comment(pkg.func_decl("helper").unwrap()).is_none());

        let clause = pkg.find_by_kind("package_clause")[0];
        assert_eq!(pkg.text(doc_comment(clause).unwrap()), "// Package twofer shares.");
    }

    #[test]
    fn test_trailing_comment_is_not_part_of_doc_block() {
        let src = "package twofer\n\nimport \"fmt\" // formatting\n// ShareWith returns the phrase.\n// It never fails.\nfunc ShareWith(name string) string { return fmt.Sprint(name) }\n";
        let pkg = GoPackage::parse_str(src).unwrap();
        let doc = doc_comment(pkg.func_decl("ShareWith").unwrap()).unwrap();
        assert_eq!(pkg.text(doc), "// ShareWith returns the phrase.");

        let only_trailing = "package twofer\n\nimport \"fmt\" // formatting\nfunc ShareWith(name string) string { return fmt.Sprint(name) }\n";
        let pkg = GoPackage::parse_str(only_trailing).unwrap();
        assert!(doc_comment(pkg.func_decl("ShareWith").unwrap()).is_none());
    }

    #[test]
    fn test_syntax_errors_are_counted() {
        let pkg =
            GoPackage::parse_str("package twofer\n\nfunc ShareWith(name string string {\n").unwrap();
        assert!(pkg.syntax_errors() > 0);
    }

    #[test]
    fn test_text_resolves_the_owning_file() {
        let pkg = GoPackage::parse([
            (PathBuf::from("a.go"), "package p\n\nfunc A() {}\n".to_string()),
            (PathBuf::from("b.go"), "package p\n\nfunc Bee() {}\n".to_string()),
        ])
        .unwrap();
        let bee = pkg.func_decl("Bee").unwrap();
        assert_eq!(pkg.text(bee), "func Bee() {}");
        assert_eq!(pkg.path_of(bee), Some(Path::new("b.go")));
        assert_eq!(pkg.sources().len(), 2);
    }
}
