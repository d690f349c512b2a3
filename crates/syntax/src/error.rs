use std::path::PathBuf;
use thiserror::Error;

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, SyntaxError>;

/// Errors that can occur while parsing Go sources
#[derive(Error, Debug)]
pub enum SyntaxError {
    /// The source text contains syntax errors
    #[error("Parse error in {file}: {message}")]
    ParseError { file: String, message: String },

    /// IO error occurred while reading a source file
    #[error("IO error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl SyntaxError {
    /// Create a parse error
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }

    /// Create an IO error bound to the file it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}
