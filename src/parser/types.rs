//! Type expressions, a deliberately closed grammar.
//!
//! Only identifiers, qualified identifiers, pointers, slices and maps are
//! modeled. Anything else (arrays, channels, function types, struct and
//! interface literals, generic instantiations, variadics) is rejected with
//! [`Error::Unsupported`] so that a signature is never emitted half right.

use super::{node_text, position, required_field};
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;
use tree_sitter::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `T`
    Name(String),
    /// `pkg.T`
    Qualified { package: String, name: String },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
}

impl TypeExpr {
    /// Convert a tree-sitter-go type node.
    pub fn from_node(node: Node, source: &str) -> Result<Self> {
        match node.kind() {
            "type_identifier" | "identifier" => Ok(Self::Name(node_text(&node, source).to_string())),
            "qualified_type" => {
                let package = required_field(&node, "package")?;
                let name = required_field(&node, "name")?;
                Ok(Self::Qualified {
                    package: node_text(&package, source).to_string(),
                    name: node_text(&name, source).to_string(),
                })
            }
            "pointer_type" => {
                let inner = first_named_child(node)?;
                Ok(Self::Pointer(Box::new(Self::from_node(inner, source)?)))
            }
            "slice_type" => {
                let element = required_field(&node, "element")?;
                Ok(Self::Slice(Box::new(Self::from_node(element, source)?)))
            }
            "map_type" => {
                let key = required_field(&node, "key")?;
                let value = required_field(&node, "value")?;
                Ok(Self::Map {
                    key: Box::new(Self::from_node(key, source)?),
                    value: Box::new(Self::from_node(value, source)?),
                })
            }
            _ => Err(unsupported(&node, source)),
        }
    }

    /// Package qualifiers referenced anywhere in this expression.
    pub fn collect_packages<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Self::Name(_) => {}
            Self::Qualified { package, .. } => {
                out.insert(package);
            }
            Self::Pointer(inner) | Self::Slice(inner) => inner.collect_packages(out),
            Self::Map { key, value } => {
                key.collect_packages(out);
                value.collect_packages(out);
            }
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Qualified { package, name } => write!(f, "{}.{}", package, name),
            Self::Pointer(inner) => write!(f, "*{}", inner),
            Self::Slice(inner) => write!(f, "[]{}", inner),
            Self::Map { key, value } => write!(f, "map[{}]{}", key, value),
        }
    }
}

/// One entry of a parameter or result list: `a, b T` or just `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub names: Vec<String>,
    pub ty: TypeExpr,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.names.is_empty() {
            write!(f, "{}", self.ty)
        } else {
            write!(f, "{} {}", self.names.join(", "), self.ty)
        }
    }
}

/// Convert a `parameters` or `result` node into fields.
///
/// `None` (no result) yields an empty list; a bare result type such as the
/// `error` in `func F() error` yields a single unnamed field.
pub fn field_list(node: Option<Node>, source: &str) -> Result<Vec<Field>> {
    let Some(node) = node else {
        return Ok(Vec::new());
    };
    if node.kind() != "parameter_list" {
        return Ok(vec![Field {
            names: Vec::new(),
            ty: TypeExpr::from_node(node, source)?,
        }]);
    }

    let mut fields = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "parameter_declaration" => {
                let ty = required_field(&child, "type")?;
                let mut name_cursor = child.walk();
                let names = child
                    .children_by_field_name("name", &mut name_cursor)
                    .map(|n| node_text(&n, source).to_string())
                    .collect();
                fields.push(Field {
                    names,
                    ty: TypeExpr::from_node(ty, source)?,
                });
            }
            "comment" => {}
            _ => return Err(unsupported(&child, source)),
        }
    }
    Ok(fields)
}

/// Comma-join rendered fields.
pub fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn first_named_child(node: Node) -> Result<Node> {
    let mut cursor = node.walk();
    let child = node
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment");
    child.ok_or_else(|| {
        let (line, column) = position(&node);
        Error::Parse { line, column }
    })
}

pub(crate) fn unsupported(node: &Node, source: &str) -> Error {
    let (line, column) = position(node);
    Error::Unsupported {
        kind: node.kind().to_string(),
        text: node_text(node, source).to_string(),
        line,
        column,
    }
}
