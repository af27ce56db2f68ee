//! Finishing pass: re-parse the draft, prune its imports to what the
//! interface bodies reference, and print it in canonical form.
//!
//! The draft import list is the union over every scanned file, so it is
//! usually a superset; an unused import does not compile in Go.

use super::imports;
use crate::error::{Error, Result};
use crate::model::Import;
use crate::parser::scan::{collect_imports, package_name};
use crate::parser::types::{field_list, join_fields, Field};
use crate::parser::{node_text, parse_go, position, required_field};
use std::collections::BTreeSet;
use tree_sitter::Node;

/// A parsed draft file, reduced to what the generator emits.
#[derive(Debug, Default)]
struct Draft {
    header: Vec<String>,
    package: String,
    imports: Vec<Import>,
    interfaces: Vec<Interface>,
}

#[derive(Debug)]
struct Interface {
    name: String,
    members: Vec<Member>,
}

#[derive(Debug)]
enum Member {
    Comment(String),
    Method {
        name: String,
        params: Vec<Field>,
        results: Vec<Field>,
    },
}

impl Member {
    fn render(&self) -> String {
        match self {
            Member::Comment(text) => text.trim_end().to_string(),
            Member::Method {
                name,
                params,
                results,
            } => {
                let mut out = format!("{}({})", name, join_fields(params));
                match results.as_slice() {
                    [] => {}
                    [single] if single.names.is_empty() => {
                        out.push(' ');
                        out.push_str(&single.to_string());
                    }
                    _ => out.push_str(&format!(" ({})", join_fields(results))),
                }
                out
            }
        }
    }
}

/// Turn draft text into the final file contents.
pub fn finish(draft: &str) -> Result<Vec<u8>> {
    let tree = parse_go(draft).map_err(|e| match e {
        Error::Parse { line, column } => Error::Format {
            message: format!("draft has a syntax error at line {}, column {}", line, column),
        },
        other => other,
    })?;
    let parsed = read_draft(tree.root_node(), draft)?;

    let mut used = BTreeSet::new();
    for iface in &parsed.interfaces {
        for member in &iface.members {
            if let Member::Method {
                params, results, ..
            } = member
            {
                for field in params.iter().chain(results) {
                    field.ty.collect_packages(&mut used);
                }
            }
        }
    }
    let imports = imports::resolve(&parsed.imports, &used);

    Ok(print(&parsed, &imports).into_bytes())
}

fn read_draft(root: Node, source: &str) -> Result<Draft> {
    let mut draft = Draft::default();
    let mut cursor = root.walk();

    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "comment" => {
                if draft.package.is_empty() {
                    draft.header.push(node_text(&child, source).trim_end().to_string());
                }
            }
            "package_clause" => {
                draft.package = package_name(&child, source).unwrap_or_default().to_string();
            }
            "import_declaration" => collect_imports(&child, source, &mut draft.imports),
            "type_declaration" => {
                let mut spec_cursor = child.walk();
                for spec in child.named_children(&mut spec_cursor) {
                    if spec.kind() == "type_spec" {
                        draft.interfaces.push(read_interface(&spec, source)?);
                    }
                }
            }
            kind => return Err(unexpected(&child, kind)),
        }
    }
    Ok(draft)
}

fn read_interface(spec: &Node, source: &str) -> Result<Interface> {
    let name = node_text(&required_field(spec, "name")?, source).to_string();
    let body = required_field(spec, "type")?;
    if body.kind() != "interface_type" {
        return Err(unexpected(&body, body.kind()));
    }

    let mut members = Vec::new();
    let mut cursor = body.walk();
    for elem in body.named_children(&mut cursor) {
        match elem.kind() {
            "comment" => members.push(Member::Comment(node_text(&elem, source).to_string())),
            "method_elem" => members.push(Member::Method {
                name: node_text(&required_field(&elem, "name")?, source).to_string(),
                params: field_list(elem.child_by_field_name("parameters"), source)?,
                results: field_list(elem.child_by_field_name("result"), source)?,
            }),
            kind => return Err(unexpected(&elem, kind)),
        }
    }
    Ok(Interface { name, members })
}

fn unexpected(node: &Node, kind: &str) -> Error {
    let (line, column) = position(node);
    Error::Format {
        message: format!("unexpected {} at line {}, column {}", kind, line, column),
    }
}

fn print(draft: &Draft, imports: &[Import]) -> String {
    let mut out = String::new();

    for line in &draft.header {
        out.push_str(line);
        out.push('\n');
    }
    if !draft.header.is_empty() {
        out.push('\n');
    }

    out.push_str(&format!("package {}\n", draft.package));

    let import_block = imports::render(imports);
    if !import_block.is_empty() {
        out.push('\n');
        out.push_str(&import_block);
    }

    for iface in &draft.interfaces {
        out.push_str(&format!("\ntype {} interface {{\n", iface.name));
        for member in &iface.members {
            out.push('\t');
            out.push_str(&member.render());
            out.push('\n');
        }
        out.push_str("}\n");
    }

    out
}
