use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One parsed Go compilation unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFile {
    /// Path the file was read from (or the name it was given)
    pub path: PathBuf,

    /// Name from the `package` clause
    pub package: String,

    /// Import directives in source order
    pub imports: Vec<ImportSpec>,

    /// Top-level declarations in source order
    pub decls: Vec<Decl>,
}

impl SourceFile {
    /// Base name of the file, e.g. `sample.go`
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name with its extension stripped, e.g. `sample`
    #[must_use]
    pub fn base_name(&self) -> String {
        base_name_of(&self.path)
    }

    /// Whether this unit belongs to an external test package (`xxx_test`)
    #[must_use]
    pub fn is_test_package(&self) -> bool {
        self.package.ends_with("_test")
    }
}

/// Strip directory and extension from a file path
#[must_use]
pub fn base_name_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A single `import` directive
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit local name (`_`, `.` or an identifier), if given
    pub name: Option<String>,

    /// Import path without quotes
    pub path: String,
}

/// 1-based, inclusive line range of a declaration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Top-level declaration relevant for documentation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Decl {
    /// Function or method
    Func(FuncDecl),
    /// One name introduced by a `type` declaration
    Type(TypeSpec),
}

impl Decl {
    /// Declared name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Func(func) => &func.name,
            Self::Type(spec) => &spec.name,
        }
    }

    #[must_use]
    pub const fn span(&self) -> LineSpan {
        match self {
            Self::Func(func) => func.span,
            Self::Type(spec) => spec.span,
        }
    }
}

/// Function or method declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: String,

    /// Receiver type for methods (`*Blaer` -> `Blaer`)
    pub receiver: Option<String>,

    /// Normalized doc comment text (empty when undocumented)
    pub doc: String,

    pub span: LineSpan,
}

/// Type name introduced by a `type` declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: String,
    pub span: LineSpan,
}
