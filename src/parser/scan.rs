//! Declaration scanner: one Go file in, one [`SourceUnit`] out.
//!
//! Walks the top-level declarations of a parsed file and keeps:
//! - the package name
//! - every import except blank (`_`) imports
//! - exported methods whose receiver base type is the target type,
//!   with their canonical signature and leading doc comment

use super::types::{field_list, join_fields, unsupported};
use super::{node_text, parse_go, required_field};
use crate::error::Result;
use crate::model::{Import, Method, SourceUnit};
use tree_sitter::Node;

/// Scan one Go source file for methods bound to `type_name`.
pub fn scan(source: &str, type_name: &str) -> Result<SourceUnit> {
    let tree = parse_go(source)?;
    let root = tree.root_node();
    let mut unit = SourceUnit::default();

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "package_clause" => {
                if let Some(name) = package_name(&child, source) {
                    unit.package = name.to_string();
                }
            }
            "import_declaration" => collect_imports(&child, source, &mut unit.imports),
            "method_declaration" => {
                if let Some(method) = scan_method(&child, source, type_name)? {
                    log::debug!("found {}.{}", type_name, method.name);
                    unit.methods.push(method);
                }
            }
            _ => {}
        }
    }

    Ok(unit)
}

pub(crate) fn package_name<'a>(clause: &Node, source: &'a str) -> Option<&'a str> {
    let mut cursor = clause.walk();
    let ident = clause
        .named_children(&mut cursor)
        .find(|n| n.kind() == "package_identifier");
    ident.map(|n| node_text(&n, source))
}

/// Append the specs of one `import` declaration, single or grouped.
pub(crate) fn collect_imports(decl: &Node, source: &str, out: &mut Vec<Import>) {
    let mut cursor = decl.walk();
    for child in decl.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => push_import(&child, source, out),
            "import_spec_list" => {
                let mut list_cursor = child.walk();
                for spec in child.named_children(&mut list_cursor) {
                    if spec.kind() == "import_spec" {
                        push_import(&spec, source, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_import(spec: &Node, source: &str, out: &mut Vec<Import>) {
    let Some(path) = spec.child_by_field_name("path") else {
        return;
    };
    let alias = spec.child_by_field_name("name").map(|n| node_text(&n, source));
    // Side-effect imports can never be referenced from generated code.
    if alias == Some("_") {
        return;
    }
    out.push(Import::new(alias, node_text(&path, source)));
}

fn scan_method(node: &Node, source: &str, type_name: &str) -> Result<Option<Method>> {
    let name = node_text(&required_field(node, "name")?, source);
    if !is_exported(name) {
        return Ok(None);
    }
    match receiver_base(node, source)? {
        Some(base) if base == type_name => {}
        _ => return Ok(None),
    }

    let params = field_list(node.child_by_field_name("parameters"), source)?;
    let results = field_list(node.child_by_field_name("result"), source)?;

    Ok(Some(Method {
        name: name.to_string(),
        signature: format!("{}({}) ({})", name, join_fields(&params), join_fields(&results)),
        docs: doc_comments(node, source),
    }))
}

/// Go's visibility rule: exported iff the first character is upper case.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Base type name of a method receiver: `T` and `*T` both give `T`.
///
/// A generic receiver (`*T[K]`) is rejected whatever its base type: the
/// emitted signatures would reference type parameters nothing declares.
fn receiver_base<'a>(method: &Node, source: &'a str) -> Result<Option<&'a str>> {
    let Some(receiver) = method.child_by_field_name("receiver") else {
        return Ok(None);
    };
    let mut cursor = receiver.walk();
    let Some(param) = receiver
        .named_children(&mut cursor)
        .find(|n| n.kind() == "parameter_declaration")
    else {
        return Ok(None);
    };

    let Some(mut ty) = param.child_by_field_name("type") else {
        return Ok(None);
    };
    loop {
        match ty.kind() {
            "pointer_type" | "parenthesized_type" => {
                let mut inner_cursor = ty.walk();
                let inner = ty
                    .named_children(&mut inner_cursor)
                    .find(|n| n.kind() != "comment");
                match inner {
                    Some(inner) => ty = inner,
                    None => return Ok(None),
                }
            }
            "generic_type" => return Err(unsupported(&ty, source)),
            "type_identifier" | "identifier" => return Ok(Some(node_text(&ty, source))),
            _ => return Ok(None),
        }
    }
}

/// Comment lines directly above `node`, without a blank line in between.
/// A comment trailing code on its own line does not belong to the group.
fn doc_comments(node: &Node, source: &str) -> Vec<String> {
    let mut docs = Vec::new();
    let mut next_row = node.start_position().row;
    let mut prev = node.prev_named_sibling();

    while let Some(comment) = prev {
        if comment.kind() != "comment" || comment.end_position().row + 1 != next_row {
            break;
        }
        let before = comment.prev_named_sibling();
        if let Some(before) = before {
            if before.kind() != "comment" && before.end_position().row == comment.start_position().row {
                break;
            }
        }
        docs.push(node_text(&comment, source).to_string());
        next_row = comment.start_position().row;
        prev = before;
    }

    docs.reverse();
    docs
}

/// Name of the first type declared on or after `line` (1-based).
///
/// Used with `go generate`, where `line` is the position of the directive
/// comment that precedes the type.
pub fn locate_type(source: &str, line: usize) -> Option<String> {
    let tree = parse_go(source).ok()?;
    let root = tree.root_node();
    let mut cursor = root.walk();

    for decl in root.named_children(&mut cursor) {
        if decl.kind() != "type_declaration" {
            continue;
        }
        let mut spec_cursor = decl.walk();
        let Some(spec) = decl
            .named_children(&mut spec_cursor)
            .find(|n| n.kind() == "type_spec" || n.kind() == "type_alias")
        else {
            continue;
        };
        if spec.start_position().row + 1 < line {
            continue;
        }
        return spec
            .child_by_field_name("name")
            .map(|n| node_text(&n, source).to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use indoc::indoc;

    const STORE: &str = indoc! {r#"
        package store

        import (
        	"context"
        	_ "embed"
        	yaml "gopkg.in/yaml.v3"
        )

        import "time"

        type Store struct{}

        // Get returns the value stored under id.
        // It fails when id is unknown.
        func (s *Store) Get(ctx context.Context, id string) (string, error) {
        	return "", nil
        }

        func (s Store) Len() int { return 0 }

        func (s *Store) private() {}

        func (o *Other) Get(id string) string { return id }

        func Helper(s *Store) {}

        var x = 1 // trailing
        func (s *Store) Touch(at time.Time) {}
    "#};

    #[test]
    fn package_and_imports() {
        let unit = scan(STORE, "Store").unwrap();
        assert_eq!(unit.package, "store");
        let imports: Vec<String> = unit.imports.iter().map(|i| i.to_string()).collect();
        assert_eq!(
            imports,
            ["\"context\"", "yaml \"gopkg.in/yaml.v3\"", "\"time\""]
        );
    }

    #[test]
    fn only_exported_methods_of_target() {
        let unit = scan(STORE, "Store").unwrap();
        let names: Vec<&str> = unit.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Get", "Len", "Touch"]);
    }

    #[test]
    fn signatures() {
        let unit = scan(STORE, "Store").unwrap();
        assert_eq!(
            unit.methods[0].signature,
            "Get(ctx context.Context, id string) (string, error)"
        );
        assert_eq!(unit.methods[1].signature, "Len() (int)");
        assert_eq!(unit.methods[2].signature, "Touch(at time.Time) ()");
    }

    #[test]
    fn doc_comments_verbatim() {
        let unit = scan(STORE, "Store").unwrap();
        assert_eq!(
            unit.methods[0].docs,
            [
                "// Get returns the value stored under id.",
                "// It fails when id is unknown."
            ]
        );
        assert!(unit.methods[1].docs.is_empty());
        // `// trailing` belongs to the var, not to Touch.
        assert!(unit.methods[2].docs.is_empty());
    }

    #[test]
    fn other_receiver_selected() {
        let unit = scan(STORE, "Other").unwrap();
        assert_eq!(unit.methods.len(), 1);
        assert_eq!(unit.methods[0].signature, "Get(id string) (string)");
    }

    #[test]
    fn doc_group_stops_at_blank_line() {
        let src = indoc! {"
            package p

            // Unrelated note.

            // Do things.
            func (t T) Do() {}
        "};
        let unit = scan(src, "T").unwrap();
        assert_eq!(unit.methods[0].docs, ["// Do things."]);
    }

    #[test]
    fn block_doc_comment() {
        let src = "package p\n\n/* Do\n   things. */\nfunc (t *T) Do() {}\n";
        let unit = scan(src, "T").unwrap();
        assert_eq!(unit.methods[0].docs, ["/* Do\n   things. */"]);
    }

    #[test]
    fn generic_receiver_fails() {
        let src = "package p\n\ntype Set[T comparable] struct{}\n\nfunc (s *Set[T]) Add(v T) bool { return true }\n";
        match scan(src, "Set") {
            Err(Error::Unsupported { kind, text, line, .. }) => {
                assert_eq!(kind, "generic_type");
                assert_eq!(text, "Set[T]");
                assert_eq!(line, 5);
            }
            other => panic!("expected unsupported error, got {other:?}"),
        }
    }

    #[test]
    fn generic_receiver_of_other_type_fails() {
        let src = "package p\n\nfunc (s Set[T]) Len() int { return 0 }\nfunc (t *T) Ok() {}\n";
        assert!(matches!(scan(src, "T"), Err(Error::Unsupported { .. })));
    }

    #[test]
    fn unexported_generic_method_is_ignored() {
        let src = "package p\n\nfunc (s *Set[T]) add(v T) {}\nfunc (t *T) Ok() {}\n";
        assert_eq!(scan(src, "T").unwrap().methods.len(), 1);
    }

    #[test]
    fn unsupported_type_on_target_fails() {
        let src = "package p\n\nfunc (t *T) On(cb func()) {}\n";
        assert!(matches!(scan(src, "T"), Err(Error::Unsupported { .. })));
    }

    #[test]
    fn unsupported_type_on_other_type_is_ignored() {
        let src = "package p\n\nfunc (u *U) On(cb func()) {}\nfunc (t *T) Ok() {}\n";
        let unit = scan(src, "T").unwrap();
        assert_eq!(unit.methods.len(), 1);
    }

    #[test]
    fn malformed_file_fails() {
        assert!(matches!(
            scan("package p\n\nfunc (t *T) Broken( {\n", "T"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn exported_rule() {
        assert!(is_exported("Get"));
        assert!(is_exported("Ünicode"));
        assert!(!is_exported("get"));
        assert!(!is_exported("_Get"));
        assert!(!is_exported(""));
    }

    #[test]
    fn locate_type_after_directive() {
        let src = indoc! {"
            package p

            type Before struct{}

            //go:generate ifacegen
            type Target struct{}

            type After struct{}
        "};
        assert_eq!(locate_type(src, 5).as_deref(), Some("Target"));
        assert_eq!(locate_type(src, 0).as_deref(), Some("Before"));
        assert_eq!(locate_type(src, 9), None);
    }

    #[test]
    fn locate_type_in_group() {
        let src = "package p\n\n//go:generate ifacegen\ntype (\n\tA struct{}\n\tB int\n)\n";
        assert_eq!(locate_type(src, 3).as_deref(), Some("A"));
    }

    #[test]
    fn locate_type_unparsable() {
        assert_eq!(locate_type("package", 1), None);
    }
}
