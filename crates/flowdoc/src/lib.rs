//! # go2md Flow Documentation
//!
//! Generates Markdown documentation for the flows declared in the doc
//! comments of Go functions.
//!
//! A flow is introduced by a blank line and a line reading `flow:`; the
//! indented lines that follow describe it. Every compilation unit with at
//! least one flow gets a `<unit>.md` document with one section per flow, a
//! rendered diagram and a table linking the referenced components and data
//! types to their declarations.
//!
//! ## Architecture
//!
//! ```text
//! Directory of .go files
//!     │
//!     ├──> SourceLoader → SourceFile[] (go2md-syntax)
//!     │
//!     ├──> DeclarationScanner → PartTable { (kind, name) → SourcePart }
//!     │
//!     ├──> per flow
//!     │    ├─> extract_flow (prefix / flow / suffix)
//!     │    ├─> FlowRenderer → image + referenced names
//!     │    └─> reference table
//!     │         ├─> local PartTable
//!     │         ├─> ImportTable → PackageDictionary (lazy, memoized)
//!     │         └─> LinkResolver (relative / local / remote)
//!     │
//!     └──> <unit>.md + <Flow>.svg
//! ```
//!
//! ## Example
//!
//! ```rust
//! use go2md_flowdoc::extract_flow;
//!
//! let sections = extract_flow("Start\n\nflow:\n    in -> [foo] -> out\nEnd\n");
//! assert_eq!(sections.prefix, "Start\n");
//! assert_eq!(sections.flow, "in -> [foo] -> out\n");
//! assert_eq!(sections.suffix, "End\n");
//! ```

mod config;
mod dictionary;
mod error;
mod extract;
mod imports;
mod links;
mod part;
mod paths;
mod render;
mod scanner;
mod writer;

pub use config::{find_vcs_root, FlowDocConfig, RunSettings, CONFIG_FILE_NAME};
pub use dictionary::{GoSourceLoader, Module, PackageDictionary, SourceLoader};
pub use error::{FlowDocError, LinkError, Result};
pub use extract::{extract_flow, has_flow, FlowSections, DSL_INDENT, FLOW_MARKER};
pub use imports::ImportTable;
pub use links::{flow_anchor, remote_url, LinkResolver};
pub use part::{CodePart, FlowPart, PartKey, PartKind, PartTable, SourcePart};
pub use render::{FlowRenderer, OutlineRenderer, QualifiedName, Rendering};
pub use scanner::{flow_name, DeclarationScanner};
pub use writer::{
    filter_types, process_dir, process_dir_with, sort_types, FlowDocumenter, RunSummary,
};
