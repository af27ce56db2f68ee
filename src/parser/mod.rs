//! tree-sitter-go glue shared by the scanner and the
//! finishing pass.

pub mod package;
pub mod scan;
pub mod types;

use crate::error::{Error, Result};
use tree_sitter::{Node, Parser, Tree};

/// Parse Go source, rejecting any tree that contains an ERROR or MISSING node.
///
/// tree-sitter recovers from syntax errors by default; a partially recovered
/// tree is never handed to callers.
pub fn parse_go(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_go::LANGUAGE.into())?;

    let tree = parser
        .parse(source, None)
        .ok_or(Error::Parse { line: 1, column: 1 })?;

    if let Some(bad) = first_error(tree.root_node()) {
        let (line, column) = position(&bad);
        return Err(Error::Parse { line, column });
    }
    Ok(tree)
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Source text covered by a node.
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}

/// 1-based (line, column) of a node's start.
pub fn position(node: &Node) -> (usize, usize) {
    let pos = node.start_position();
    (pos.row + 1, pos.column + 1)
}

/// Look up a required field, treating its absence as a syntax error at `node`.
pub fn required_field<'t>(node: &Node<'t>, field: &str) -> Result<Node<'t>> {
    node.child_by_field_name(field).ok_or_else(|| {
        let (line, column) = position(node);
        Error::Parse { line, column }
    })
}
