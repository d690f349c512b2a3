use crate::error::{FlowDocError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional configuration file in the processed directory
pub const CONFIG_FILE_NAME: &str = "go2md.toml";

const VENDOR_DIR: &str = "vendor";

/// Configuration for a documentation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowDocConfig {
    /// Link to out-of-project sources with absolute local paths instead of URLs
    pub local_links: bool,

    /// Project root; discovered from the version control root when unset
    pub project_root: Option<PathBuf>,

    /// Extra workspace roots, searched after the vendor directory
    pub search_roots: Vec<PathBuf>,

    /// Search `$GOPATH/src` (default `~/go/src`)
    pub include_gopath: bool,

    /// Search `$GOROOT/src`
    pub include_goroot: bool,
}

impl Default for FlowDocConfig {
    fn default() -> Self {
        Self {
            local_links: false,
            project_root: None,
            search_roots: vec![],
            include_gopath: true,
            include_goroot: true,
        }
    }
}

/// Everything a run needs, with all defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Absolute directory being documented; output is written here
    pub working_dir: PathBuf,
    pub project_root: PathBuf,
    /// Vendor, workspace roots, standard library, in lookup order
    pub search_roots: Vec<PathBuf>,
    pub local_links: bool,
}

impl FlowDocConfig {
    /// Read a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| FlowDocError::io(path, e))?;
        toml::from_str(&text)
            .map_err(|e| FlowDocError::config(format!("{}: {e}", path.display())))
    }

    /// `go2md.toml` from `dir` if present, defaults otherwise
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            log::debug!("Loading configuration from {}", path.display());
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(root) = &self.project_root {
            if !root.is_dir() {
                return Err(FlowDocError::config(format!(
                    "project root {} is not a directory",
                    root.display()
                )));
            }
        }
        Ok(())
    }

    /// Apply defaults for documenting `dir`
    pub fn resolve(&self, dir: &Path) -> Result<RunSettings> {
        self.validate()?;
        if !dir.is_dir() {
            return Err(FlowDocError::InvalidPath(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        let working_dir = dir
            .canonicalize()
            .map_err(|e| FlowDocError::io(dir, e))?;

        let project_root = match &self.project_root {
            Some(root) => root.canonicalize().map_err(|e| FlowDocError::io(root, e))?,
            None => find_vcs_root(&working_dir).unwrap_or_else(|| working_dir.clone()),
        };

        let mut search_roots = Vec::new();
        let vendor = project_root.join(VENDOR_DIR);
        if vendor.is_dir() {
            search_roots.push(vendor);
        }
        search_roots.extend(self.search_roots.iter().cloned());
        if self.include_gopath {
            search_roots.extend(gopath_roots());
        }
        if self.include_goroot {
            if let Some(goroot) = std::env::var_os("GOROOT").filter(|v| !v.is_empty()) {
                search_roots.push(PathBuf::from(goroot).join("src"));
            }
        }

        Ok(RunSettings {
            working_dir,
            project_root,
            search_roots,
            local_links: self.local_links,
        })
    }
}

/// Closest ancestor (or `start` itself) containing a `.git` entry
#[must_use]
pub fn find_vcs_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// `src` of every `$GOPATH` entry, `~/go/src` when unset
fn gopath_roots() -> Vec<PathBuf> {
    match std::env::var_os("GOPATH").filter(|v| !v.is_empty()) {
        Some(gopath) => std::env::split_paths(&gopath)
            .map(|entry| entry.join("src"))
            .collect(),
        None => dirs::home_dir()
            .map(|home| vec![home.join("go").join("src")])
            .unwrap_or_default(),
    }
}
