//! Import resolution against the qualifiers actually used in the output.

use crate::model::Import;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static RE_MAJOR_VERSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^v[0-9]+$").unwrap());

static RE_IDENT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{Nd}_]*").unwrap());

/// Standard library packages that may be added when a qualifier is used
/// without a matching import. Keyed by package name.
const STDLIB: &[(&str, &str)] = &[
    ("big", "math/big"),
    ("bufio", "bufio"),
    ("bytes", "bytes"),
    ("context", "context"),
    ("driver", "database/sql/driver"),
    ("ecdsa", "crypto/ecdsa"),
    ("ed25519", "crypto/ed25519"),
    ("fs", "io/fs"),
    ("http", "net/http"),
    ("io", "io"),
    ("json", "encoding/json"),
    ("log", "log"),
    ("multipart", "mime/multipart"),
    ("net", "net"),
    ("netip", "net/netip"),
    ("os", "os"),
    ("reflect", "reflect"),
    ("regexp", "regexp"),
    ("rsa", "crypto/rsa"),
    ("slog", "log/slog"),
    ("sql", "database/sql"),
    ("strings", "strings"),
    ("sync", "sync"),
    ("time", "time"),
    ("tls", "crypto/tls"),
    ("url", "net/url"),
    ("x509", "crypto/x509"),
    ("xml", "encoding/xml"),
];

/// Package name assumed from an import path when no alias is given:
/// `gopkg.in/yaml.v3` → `yaml`, `github.com/go-chi/chi/v5` → `chi`,
/// `github.com/mattn/go-sqlite3` → `sqlite3`.
pub fn assumed_name(path: &str) -> String {
    let mut elems = path.rsplit('/');
    let mut base = elems.next().unwrap_or(path);
    if RE_MAJOR_VERSION.is_match(base) {
        if let Some(parent) = elems.next() {
            base = parent;
        }
    }
    let base = base.strip_prefix("go-").unwrap_or(base);
    RE_IDENT_PREFIX
        .find(base)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Name under which an import is referenced in code.
pub fn local_name(import: &Import) -> String {
    match &import.alias {
        Some(alias) => alias.clone(),
        None => assumed_name(import.unquoted()),
    }
}

/// Standard library paths have no dot in their first element.
pub fn is_stdlib(path: &str) -> bool {
    !path.split('/').next().unwrap_or(path).contains('.')
}

/// Keep only imports whose name is referenced, once each, and add standard
/// library imports for referenced names that have none.
///
/// Dot imports cannot be analyzed and are always kept.
pub fn resolve(imports: &[Import], used: &BTreeSet<&str>) -> Vec<Import> {
    let mut kept: Vec<Import> = Vec::new();
    let mut bound: BTreeSet<String> = BTreeSet::new();

    for import in imports {
        if import.alias.as_deref() == Some(".") {
            if !kept.contains(import) {
                kept.push(import.clone());
            }
            continue;
        }
        let name = local_name(import);
        if used.contains(name.as_str()) && !bound.contains(&name) {
            bound.insert(name);
            kept.push(import.clone());
        } else {
            log::debug!("dropping import {}", import);
        }
    }

    for name in used {
        if bound.contains(*name) {
            continue;
        }
        match STDLIB.iter().find(|(pkg, _)| pkg == name) {
            Some((_, path)) => {
                log::debug!("adding import \"{}\"", path);
                kept.push(Import::new(None, &format!("\"{}\"", path)));
            }
            None => log::warn!("no import found for package `{}`", name),
        }
    }

    kept
}

/// Format an import declaration: nothing, a single `import "p"`, or a
/// parenthesized block with the standard library grouped first.
pub fn render(imports: &[Import]) -> String {
    match imports {
        [] => String::new(),
        // Never parenthesized, even when the draft held a one-entry block.
        [single] => format!("import {}\n", single),
        _ => {
            let (mut std, mut other): (Vec<&Import>, Vec<&Import>) =
                imports.iter().partition(|i| is_stdlib(i.unquoted()));
            let key = |i: &&Import| (i.unquoted().to_string(), i.alias.clone());
            std.sort_by_key(key);
            other.sort_by_key(key);

            let mut out = String::from("import (\n");
            for import in &std {
                out.push_str(&format!("\t{}\n", import));
            }
            if !std.is_empty() && !other.is_empty() {
                out.push('\n');
            }
            for import in &other {
                out.push_str(&format!("\t{}\n", import));
            }
            out.push_str(")\n");
            out
        }
    }
}
