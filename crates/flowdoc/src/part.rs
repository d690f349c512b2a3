use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Kind of a discovered declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PartKind {
    /// Function documented with a flow
    Flow,
    /// Ordinary function or method
    Callable,
    /// Named type
    Type,
}

impl PartKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flow => "flow",
            Self::Callable => "function",
            Self::Type => "type",
        }
    }
}

/// Lookup key of a part inside one module
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartKey {
    pub kind: PartKind,
    pub name: String,
}

impl PartKey {
    pub fn new(kind: PartKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// Parts of one module keyed by `(kind, name)`
pub type PartTable = HashMap<PartKey, Arc<SourcePart>>;

/// A flow: links go to the generated document, not to the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowPart {
    /// Base name with any `_port` suffix removed
    pub name: String,
    /// Full doc comment, flow body included
    pub raw_doc: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Import path of the owning module, empty for the module being documented
    pub module_path: String,
    /// Absolute directory of the owning module
    pub dir: PathBuf,
    /// Base name of the output document the flow is written to
    pub document: String,
}

/// A callable or type: links go straight to the source lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodePart {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub module_path: String,
    pub dir: PathBuf,
    /// File name the declaration lives in, e.g. `sample.go`
    pub source_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SourcePart {
    Flow(FlowPart),
    Callable(CodePart),
    Type(CodePart),
}

impl SourcePart {
    #[must_use]
    pub const fn kind(&self) -> PartKind {
        match self {
            Self::Flow(_) => PartKind::Flow,
            Self::Callable(_) => PartKind::Callable,
            Self::Type(_) => PartKind::Type,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Flow(flow) => &flow.name,
            Self::Callable(code) | Self::Type(code) => &code.name,
        }
    }

    #[must_use]
    pub fn module_path(&self) -> &str {
        match self {
            Self::Flow(flow) => &flow.module_path,
            Self::Callable(code) | Self::Type(code) => &code.module_path,
        }
    }

    #[must_use]
    pub fn key(&self) -> PartKey {
        PartKey::new(self.kind(), self.name())
    }

    #[must_use]
    pub const fn as_flow(&self) -> Option<&FlowPart> {
        match self {
            Self::Flow(flow) => Some(flow),
            Self::Callable(_) | Self::Type(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_and_accessors() {
        let part = SourcePart::Callable(CodePart {
            name: "foo".to_string(),
            start_line: 3,
            end_line: 5,
            module_path: "github.com/org/repo".to_string(),
            dir: PathBuf::from("/src/repo"),
            source_file: "foo.go".to_string(),
        });
        assert_eq!(part.key(), PartKey::new(PartKind::Callable, "foo"));
        assert_eq!(part.module_path(), "github.com/org/repo");
        assert!(part.as_flow().is_none());
    }

    #[test]
    fn test_same_name_different_kind_are_distinct_keys() {
        assert_ne!(
            PartKey::new(PartKind::Flow, "Bla"),
            PartKey::new(PartKind::Callable, "Bla")
        );
    }
}
