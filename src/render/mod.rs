//! Interface rendering: a fixed draft template followed by the finishing pass.

pub mod finish;
pub mod imports;

use crate::error::Result;
use crate::model::Package;

/// Marker recognised by Go tooling as "generated, do not edit".
pub const GENERATED_MARKER: &str = "// Code generated by ifacegen. DO NOT EDIT.";

/// Render the draft declaration. No filtering happens here; the import list
/// is the raw union and is cleaned up by [`finish::finish`].
pub fn draft(package: &Package, iface: &str) -> String {
    let mut out = String::new();

    out.push_str(GENERATED_MARKER);
    out.push_str("\n\n");
    out.push_str(&format!("package {}\n\n", package.name));

    if !package.imports.is_empty() {
        out.push_str("import (\n");
        for import in &package.imports {
            out.push_str(&format!("\t{}\n", import));
        }
        out.push_str(")\n\n");
    }

    out.push_str(&format!("type {} interface {{\n", iface));
    for method in &package.methods {
        for doc in &method.docs {
            out.push_str(&format!("\t{}\n", doc));
        }
        out.push_str(&format!("\t{}\n", method.signature));
    }
    out.push_str("}\n");

    out
}

/// Draft and finish in one step.
pub fn generate(package: &Package, iface: &str) -> Result<Vec<u8>> {
    let text = draft(package, iface);
    log::debug!("draft:\n{}", text);
    finish::finish(&text)
}
