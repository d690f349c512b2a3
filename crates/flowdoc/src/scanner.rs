use crate::extract::has_flow;
use crate::part::{CodePart, FlowPart, PartTable, SourcePart};
use go2md_syntax::{Decl, SourceFile};
use std::path::Path;
use std::sync::Arc;

/// Classifies the declarations of one module into source parts
pub struct DeclarationScanner<'a> {
    module_path: &'a str,
    dir: &'a Path,
}

impl<'a> DeclarationScanner<'a> {
    /// `module_path` is empty for the module being documented
    pub const fn new(module_path: &'a str, dir: &'a Path) -> Self {
        Self { module_path, dir }
    }

    /// Scan every non-test unit, in the given order, into one table
    pub fn scan_all(&self, files: &[SourceFile]) -> (PartTable, Vec<FlowPart>) {
        let mut parts = PartTable::new();
        let mut flows = Vec::new();
        for file in files {
            if file.is_test_package() {
                log::debug!("Skipping test package file {}", file.path.display());
                continue;
            }
            flows.extend(self.scan_file(&mut parts, file));
        }
        (parts, flows)
    }

    /// Add the declarations of one unit to `parts`.
    ///
    /// Returns the flows found in this unit in declaration order. A later
    /// declaration with the same kind and name replaces an earlier one.
    pub fn scan_file(&self, parts: &mut PartTable, file: &SourceFile) -> Vec<FlowPart> {
        let source_file = file.file_name();
        let document = file.base_name();
        let mut flows = Vec::new();

        for decl in &file.decls {
            let span = decl.span();
            let part = match decl {
                Decl::Func(func) if has_flow(&func.doc) => {
                    let flow = FlowPart {
                        name: flow_name(&func.name).to_string(),
                        raw_doc: func.doc.clone(),
                        start_line: span.start,
                        end_line: span.end,
                        module_path: self.module_path.to_string(),
                        dir: self.dir.to_path_buf(),
                        document: document.clone(),
                    };
                    flows.push(flow.clone());
                    SourcePart::Flow(flow)
                }
                Decl::Func(func) => SourcePart::Callable(self.code_part(&func.name, span, &source_file)),
                Decl::Type(spec) => SourcePart::Type(self.code_part(&spec.name, span, &source_file)),
            };
            parts.insert(part.key(), Arc::new(part));
        }

        flows
    }

    fn code_part(&self, name: &str, span: go2md_syntax::LineSpan, source_file: &str) -> CodePart {
        CodePart {
            name: name.to_string(),
            start_line: span.start,
            end_line: span.end,
            module_path: self.module_path.to_string(),
            dir: self.dir.to_path_buf(),
            source_file: source_file.to_string(),
        }
    }
}

/// Flows may be split over several ports: `Foo_in`, `Foo_reset` -> `Foo`
#[must_use]
pub fn flow_name(name: &str) -> &str {
    match name.find('_') {
        Some(0) | None => name,
        Some(i) => &name[..i],
    }
}
