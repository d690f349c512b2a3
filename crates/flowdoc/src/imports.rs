use crate::dictionary::PackageDictionary;
use crate::part::{PartKind, SourcePart};
use go2md_syntax::ImportSpec;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps the package names usable in one file to their import paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    imports: HashMap<String, String>,
}

impl ImportTable {
    /// Build from the file's import directives.
    ///
    /// The alias is the explicit name, else the last path segment. Blank,
    /// dot and otherwise unnamed imports cannot be referenced and are dropped.
    pub fn new(specs: &[ImportSpec]) -> Self {
        let mut imports = HashMap::new();
        for spec in specs {
            let path = spec.path.trim_matches('"');
            let alias = match &spec.name {
                Some(name) => name.trim_end_matches('.'),
                None => path.rsplit('/').next().unwrap_or(path),
            };
            if matches!(alias, "" | "_" | "." | "/") {
                continue;
            }
            imports.insert(alias.to_string(), path.to_string());
        }
        Self { imports }
    }

    #[must_use]
    pub fn import_path(&self, alias: &str) -> Option<&str> {
        self.imports.get(alias).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.imports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Look up `alias.name` through the package dictionary
    #[must_use]
    pub fn get_part_for(
        &self,
        dictionary: &PackageDictionary,
        alias: &str,
        kind: PartKind,
        name: &str,
    ) -> Option<Arc<SourcePart>> {
        let import_path = self.import_path(alias)?;
        dictionary.lookup(import_path, kind, name)
    }
}
