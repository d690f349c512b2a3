//! # go2md Syntax
//!
//! Declaration-level view of Go source files, built on Tree-sitter.
//!
//! ## Architecture
//!
//! ```text
//! Go source
//!     │
//!     ├──> Tree-sitter Parsing → AST
//!     │
//!     ├──> Top-level walk
//!     │    ├─> package clause
//!     │    ├─> import directives (alias + path)
//!     │    ├─> functions and methods (+ attached doc comments)
//!     │    └─> type specs (one per introduced name)
//!     │
//!     └──> SourceFile { package, imports, decls }
//! ```
//!
//! Only what documentation generation needs is kept: names, 1-based line
//! spans and normalized doc comment text. Bodies are never inspected.
//!
//! ## Example
//!
//! ```rust
//! use go2md_syntax::{Decl, GoParser};
//!
//! let mut parser = GoParser::new().unwrap();
//! let file = parser
//!     .parse_str("package demo\n\n// Hello greets.\nfunc Hello() {}\n", "demo.go")
//!     .unwrap();
//!
//! assert_eq!(file.package, "demo");
//! assert_eq!(file.decls[0].name(), "Hello");
//! ```

mod comment;
mod error;
mod parser;
mod types;

pub use comment::doc_text;
pub use error::{Result, SyntaxError};
pub use parser::GoParser;
pub use types::{base_name_of, Decl, FuncDecl, ImportSpec, LineSpan, SourceFile, TypeSpec};
