//! Data model for scanned Go sources, one unit per file, merged per package.

use std::fmt;

/// Everything extracted from a single Go source file for one target type.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub package: String,
    pub imports: Vec<Import>,
    pub methods: Vec<Method>,
}

/// An import spec. `path` keeps its quotes exactly as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Import {
    pub alias: Option<String>,
    pub path: String,
}

impl Import {
    pub fn new(alias: Option<&str>, path: &str) -> Self {
        Self {
            alias: alias.map(str::to_string),
            path: path.to_string(),
        }
    }

    /// Import path without the surrounding quotes.
    pub fn unquoted(&self) -> &str {
        self.path.trim_matches(|c| c == '"' || c == '`')
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} {}", alias, self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// An exported method bound to the target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    /// `Name(params) (results)`
    pub signature: String,
    /// Raw doc comment lines, markers included.
    pub docs: Vec<String>,
}

/// All source units of a directory merged into one logical package.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub imports: Vec<Import>,
    pub methods: Vec<Method>,
}

impl Package {
    /// Merge units in the order given. The first unit names the package,
    /// imports are deduplicated keeping first-seen order, methods are
    /// concatenated.
    pub fn merge<I>(units: I) -> Self
    where
        I: IntoIterator<Item = SourceUnit>,
    {
        let mut pkg = Package::default();
        for unit in units {
            if pkg.name.is_empty() {
                pkg.name = unit.package;
            }
            for import in unit.imports {
                if !pkg.imports.contains(&import) {
                    pkg.imports.push(import);
                }
            }
            pkg.methods.extend(unit.methods);
        }
        pkg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str) -> Method {
        Method {
            name: name.to_string(),
            signature: format!("{}() ()", name),
            docs: Vec::new(),
        }
    }

    #[test]
    fn import_display() {
        assert_eq!(Import::new(None, "\"io\"").to_string(), "\"io\"");
        assert_eq!(
            Import::new(Some("yaml"), "\"gopkg.in/yaml.v3\"").to_string(),
            "yaml \"gopkg.in/yaml.v3\""
        );
        assert_eq!(Import::new(None, "`io/fs`").unquoted(), "io/fs");
    }

    #[test]
    fn merge_dedups_imports_and_keeps_method_order() {
        let a = SourceUnit {
            package: "store".to_string(),
            imports: vec![Import::new(None, "\"context\""), Import::new(None, "\"io\"")],
            methods: vec![method("Get")],
        };
        let b = SourceUnit {
            package: "store".to_string(),
            imports: vec![Import::new(None, "\"context\""), Import::new(None, "\"time\"")],
            methods: vec![method("Put")],
        };
        let pkg = Package::merge([a, b]);
        assert_eq!(pkg.name, "store");
        let imports: Vec<String> = pkg.imports.iter().map(|i| i.to_string()).collect();
        assert_eq!(imports, ["\"context\"", "\"io\"", "\"time\""]);
        let names: Vec<&str> = pkg.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Get", "Put"]);
    }

    #[test]
    fn merge_keeps_aliased_and_plain_import_separately() {
        let unit = SourceUnit {
            package: "p".to_string(),
            imports: vec![
                Import::new(None, "\"net/http\""),
                Import::new(Some("nethttp"), "\"net/http\""),
            ],
            methods: Vec::new(),
        };
        assert_eq!(Package::merge([unit]).imports.len(), 2);
    }
}
