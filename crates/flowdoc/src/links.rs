use crate::error::LinkError;
use crate::part::SourcePart;
use crate::paths::{escapes, normalize, relative_to, to_slash};
use std::path::{Path, PathBuf};

/// Turns resolved source parts into Markdown link targets.
///
/// Targets inside the project become paths relative to the directory the
/// documents are written to. Targets outside of it become absolute local
/// paths when `local_links` is set, and repository URLs otherwise.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    project_root: PathBuf,
    working_dir: PathBuf,
    local_links: bool,
}

impl LinkResolver {
    pub fn new(project_root: &Path, working_dir: &Path, local_links: bool) -> Self {
        Self {
            project_root: normalize(project_root),
            working_dir: normalize(working_dir),
            local_links,
        }
    }

    /// Link from the document `from_document` to `part`
    pub fn link_for(&self, from_document: &str, part: &SourcePart) -> Result<String, LinkError> {
        match part {
            SourcePart::Flow(flow) => {
                let anchor = flow_anchor(&flow.name);
                if flow.module_path.is_empty() && flow.document == from_document {
                    return Ok(format!("#{anchor}"));
                }
                let target = flow.dir.join(format!("{}.md", flow.document));
                let file = self.file_link(&target, &flow.module_path)?;
                Ok(format!("{file}#{anchor}"))
            }
            SourcePart::Callable(code) | SourcePart::Type(code) => {
                let target = code.dir.join(&code.source_file);
                let file = self.file_link(&target, &code.module_path)?;
                Ok(format!("{file}#L{}-L{}", code.start_line, code.end_line))
            }
        }
    }

    /// Location of a file from the point of view of the output documents
    pub fn file_link(&self, target: &Path, module_path: &str) -> Result<String, LinkError> {
        let target = if target.is_absolute() {
            normalize(target)
        } else {
            normalize(&self.working_dir.join(target))
        };

        let from_root =
            relative_to(&self.project_root, &target).ok_or_else(|| LinkError::Unrelated {
                base: self.project_root.clone(),
                target: target.clone(),
            })?;

        if !escapes(&from_root) {
            let rel = relative_to(&self.working_dir, &target).ok_or_else(|| {
                LinkError::Unrelated {
                    base: self.working_dir.clone(),
                    target: target.clone(),
                }
            })?;
            return Ok(to_slash(&rel));
        }

        if self.local_links {
            return Ok(target.display().to_string());
        }

        let file_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        remote_url(module_path, &file_name)
    }
}

/// Anchor Markdown renderers generate for `## Flow: <name>`
#[must_use]
pub fn flow_anchor(name: &str) -> String {
    format!("flow-{}", name.to_lowercase())
}

/// `host/org/repo[/sub/path]` + file -> `https://host/org/repo/blob/master[/sub/path]/file`
pub fn remote_url(import_path: &str, file_name: &str) -> Result<String, LinkError> {
    let segments: Vec<&str> = import_path.splitn(4, '/').collect();
    if segments.len() < 3 || segments[..3].iter().any(|s| s.is_empty()) {
        return Err(LinkError::NoRemote(import_path.to_string()));
    }

    let mut url = format!("https://{}/blob/master", segments[..3].join("/"));
    if let Some(sub_path) = segments.get(3).filter(|s| !s.is_empty()) {
        url.push('/');
        url.push_str(sub_path.trim_end_matches('/'));
    }
    url.push('/');
    url.push_str(file_name);
    Ok(url)
}
