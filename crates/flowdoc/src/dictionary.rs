use crate::error::{FlowDocError, Result};
use crate::part::{PartKey, PartKind, PartTable, SourcePart};
use crate::scanner::DeclarationScanner;
use go2md_syntax::{GoParser, SourceFile};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use walkdir::WalkDir;

const GO_EXTENSION: &str = ".go";
const GO_TEST_SUFFIX: &str = "_test.go";

/// Parses all compilation units of one directory
pub trait SourceLoader: Send + Sync {
    fn load_dir(&self, dir: &Path) -> Result<Vec<SourceFile>>;
}

/// Loads the non-test `.go` files of a directory, sorted by file name
#[derive(Debug, Default, Clone, Copy)]
pub struct GoSourceLoader;

impl GoSourceLoader {
    /// `*_test.go` files never take part in documentation
    #[must_use]
    pub fn is_source_file(name: &str) -> bool {
        let lowered = name.to_lowercase();
        lowered.ends_with(GO_EXTENSION) && !lowered.ends_with(GO_TEST_SUFFIX)
    }
}

impl SourceLoader for GoSourceLoader {
    fn load_dir(&self, dir: &Path) -> Result<Vec<SourceFile>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| FlowDocError::parse_dir(dir, e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if Self::is_source_file(&entry.file_name().to_string_lossy()) {
                paths.push(entry.into_path());
            }
        }

        let mut parser = GoParser::new()?;
        paths
            .iter()
            .map(|path| parser.parse_file(path).map_err(FlowDocError::from))
            .collect()
    }
}

/// All source parts of one import path; immutable once built
#[derive(Debug)]
pub struct Module {
    parts: PartTable,
}

impl Module {
    #[must_use]
    pub const fn new(parts: PartTable) -> Self {
        Self { parts }
    }

    #[must_use]
    pub fn get(&self, kind: PartKind, name: &str) -> Option<Arc<SourcePart>> {
        self.parts.get(&PartKey::new(kind, name)).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Run-wide, lazily filled map from import path to module.
///
/// A module is parsed the first time one of its parts is looked up. Parsing
/// happens outside the lock; if two callers race, the first inserted module
/// is kept and both see the same table.
pub struct PackageDictionary {
    modules: RwLock<HashMap<String, Arc<Module>>>,
    search_roots: Vec<PathBuf>,
    working_dir: PathBuf,
    loader: Box<dyn SourceLoader>,
}

impl PackageDictionary {
    /// `search_roots` are probed in order: vendor, workspaces, standard library
    pub fn new(
        search_roots: Vec<PathBuf>,
        working_dir: impl Into<PathBuf>,
        loader: Box<dyn SourceLoader>,
    ) -> Self {
        Self {
            modules: RwLock::new(HashMap::new()),
            search_roots,
            working_dir: working_dir.into(),
            loader,
        }
    }

    /// Dictionary backed by the tree-sitter Go loader
    pub fn with_go_loader(search_roots: Vec<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self::new(search_roots, working_dir, Box::new(GoSourceLoader))
    }

    /// Find a part of the module with the given import path
    #[must_use]
    pub fn lookup(&self, import_path: &str, kind: PartKind, name: &str) -> Option<Arc<SourcePart>> {
        self.module(import_path)?.get(kind, name)
    }

    /// Cached module, or the freshly parsed one; `None` if it cannot be loaded
    #[must_use]
    pub fn module(&self, import_path: &str) -> Option<Arc<Module>> {
        if let Some(module) = self.cached(import_path) {
            return Some(module);
        }

        let Some(dir) = self.resolve_dir(import_path) else {
            log::warn!("Unable to find a directory for import path '{import_path}'");
            return None;
        };

        let module = match self.load_module(import_path, &dir) {
            Ok(module) => module,
            Err(e) => {
                log::warn!(
                    "Unable to parse additional directory '{}': {e}",
                    dir.display()
                );
                return None;
            }
        };

        let mut modules = self
            .modules
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Some(Arc::clone(
            modules
                .entry(import_path.to_string())
                .or_insert_with(|| Arc::new(module)),
        ))
    }

    /// Directory holding the sources of `import_path`.
    ///
    /// Relative paths (`./x`, `../y`) are taken from the working directory;
    /// everything else is searched in the search roots, first match wins.
    #[must_use]
    pub fn resolve_dir(&self, import_path: &str) -> Option<PathBuf> {
        if import_path.is_empty() {
            return None;
        }
        if import_path.starts_with('.') {
            let dir = self.working_dir.join(import_path);
            return dir.is_dir().then_some(dir);
        }
        self.search_roots
            .iter()
            .map(|root| root.join(import_path))
            .find(|dir| dir.is_dir())
    }

    /// Number of modules parsed so far
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.modules
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    fn cached(&self, import_path: &str) -> Option<Arc<Module>> {
        self.modules
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(import_path)
            .cloned()
    }

    fn load_module(&self, import_path: &str, dir: &Path) -> Result<Module> {
        log::debug!("Parsing module '{import_path}' in {}", dir.display());
        let files = self.loader.load_dir(dir)?;
        // symlinks resolved, so links compare against the canonical project root
        let dir = dir.canonicalize().map_err(|e| FlowDocError::io(dir, e))?;
        let (parts, _) = DeclarationScanner::new(import_path, &dir).scan_all(&files);
        log::debug!("Module '{import_path}' has {} source parts", parts.len());
        Ok(Module::new(parts))
    }
}
