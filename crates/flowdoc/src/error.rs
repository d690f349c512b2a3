use std::path::PathBuf;
use thiserror::Error;

/// Result type for documentation runs
pub type Result<T> = std::result::Result<T, FlowDocError>;

/// Errors that can occur while documenting flows
#[derive(Error, Debug)]
pub enum FlowDocError {
    /// A Go source file of the documented package failed to parse
    #[error("Parse error: {0}")]
    Parse(#[from] go2md_syntax::SyntaxError),

    /// An imported package directory could not be parsed
    #[error("Unable to parse directory {dir}: {message}")]
    ParseDir { dir: PathBuf, message: String },

    /// The renderer rejected a flow
    #[error("Unable to render flow {flow}: {message}")]
    Render { flow: String, message: String },

    /// IO error while reading sources or writing a document
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file or command line values are unusable
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A path could not be resolved
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl FlowDocError {
    pub fn parse_dir(dir: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseDir {
            dir: dir.into(),
            message: message.into(),
        }
    }

    pub fn render(flow: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            flow: flow.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Non-fatal failure to turn a resolved part into a link
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LinkError {
    /// The source file has no relative path from the base directory
    #[error("cannot relate {target} to {base}")]
    Unrelated { base: PathBuf, target: PathBuf },

    /// The import path has fewer than three segments
    #[error("import path {0:?} is too short for a remote URL")]
    NoRemote(String),
}
