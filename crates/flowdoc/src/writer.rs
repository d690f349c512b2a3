//! Markdown output: one document per compilation unit that declares flows.
//!
//! Documents move through `Unopened -> Open -> Closed`; a render or output
//! failure moves a document to `Failed` and stops it, while the rest of the
//! run carries on.

use crate::config::RunSettings;
use crate::dictionary::{GoSourceLoader, PackageDictionary, SourceLoader};
use crate::error::{FlowDocError, Result};
use crate::extract::extract_flow;
use crate::imports::ImportTable;
use crate::links::LinkResolver;
use crate::part::{FlowPart, PartKey, PartKind, PartTable, SourcePart};
use crate::render::{FlowRenderer, QualifiedName, Rendering};
use crate::scanner::DeclarationScanner;
use go2md_syntax::SourceFile;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const TITLE_START: &str = "# Flow Documentation For File: ";
const FLOW_START: &str = "## Flow: ";
const REFERENCE_TABLE_HEADER: &str = "Components | Data\n---------- | -----\n";

/// Predeclared types that never get a reference entry
const BUILTIN_TYPES: &[&str] = &[
    "bool",
    "byte",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
    "any",
];

/// Counters reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub flows: usize,
    pub parts: usize,
    pub documents_written: usize,
    pub documents_failed: usize,
}

impl RunSummary {
    fn add(&mut self, other: Self) {
        self.flows += other.flows;
        self.parts += other.parts;
        self.documents_written += other.documents_written;
        self.documents_failed += other.documents_failed;
    }
}

/// Open output file; dropping it releases the handle
struct MarkdownDocument {
    path: PathBuf,
    out: BufWriter<File>,
}

impl MarkdownDocument {
    fn create(path: PathBuf, source_file: &str) -> Result<Self> {
        let file = File::create(&path).map_err(|e| FlowDocError::io(&path, e))?;
        let mut document = Self {
            path,
            out: BufWriter::new(file),
        };
        document.write_str(&format!("{TITLE_START}{source_file}\n\n"))?;
        Ok(document)
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(text.as_bytes())
            .map_err(|e| FlowDocError::io(&self.path, e))
    }

    fn finish(mut self) -> Result<()> {
        self.out.flush().map_err(|e| FlowDocError::io(&self.path, e))
    }
}

enum DocumentState {
    Unopened,
    Open(MarkdownDocument),
    Closed,
    Failed,
}

/// Output document of one compilation unit
struct DocumentSlot<'f> {
    base_name: String,
    file: &'f SourceFile,
    imports: ImportTable,
    state: DocumentState,
}

impl<'f> DocumentSlot<'f> {
    fn new(file: &'f SourceFile) -> Self {
        Self {
            base_name: file.base_name(),
            file,
            imports: ImportTable::new(&file.imports),
            state: DocumentState::Unopened,
        }
    }

    fn append(&mut self, dir: &Path, section: &str) -> Result<()> {
        if matches!(self.state, DocumentState::Unopened) {
            let path = dir.join(format!("{}.md", self.base_name));
            log::debug!("Starting document {}", path.display());
            self.state = DocumentState::Open(MarkdownDocument::create(path, &self.file.file_name())?);
        }
        // closed and failed documents take no more sections
        match &mut self.state {
            DocumentState::Open(document) => document.write_str(section),
            DocumentState::Unopened | DocumentState::Closed | DocumentState::Failed => Ok(()),
        }
    }

    fn fail(&mut self) {
        self.state = DocumentState::Failed;
    }

    /// Close the document; `Ok(true)` if it was written
    fn close(&mut self) -> Result<bool> {
        match std::mem::replace(&mut self.state, DocumentState::Closed) {
            DocumentState::Open(document) => document.finish().map(|()| true),
            DocumentState::Failed => {
                self.state = DocumentState::Failed;
                Ok(false)
            }
            DocumentState::Unopened | DocumentState::Closed => Ok(false),
        }
    }

    fn is_failed(&self) -> bool {
        matches!(self.state, DocumentState::Failed)
    }
}

/// Writes the flow documentation of the packages in one directory
pub struct FlowDocumenter<'a> {
    settings: &'a RunSettings,
    dictionary: &'a PackageDictionary,
    renderer: &'a dyn FlowRenderer,
    links: LinkResolver,
}

impl<'a> FlowDocumenter<'a> {
    pub fn new(
        settings: &'a RunSettings,
        dictionary: &'a PackageDictionary,
        renderer: &'a dyn FlowRenderer,
    ) -> Self {
        Self {
            settings,
            dictionary,
            renderer,
            links: LinkResolver::new(
                &settings.project_root,
                &settings.working_dir,
                settings.local_links,
            ),
        }
    }

    /// Document every non-test package found in `files`, in package name order
    pub fn document_files(&self, files: &[SourceFile]) -> RunSummary {
        let mut packages: BTreeMap<&str, Vec<&SourceFile>> = BTreeMap::new();
        for file in files {
            if file.is_test_package() {
                log::debug!("Skipping test package file {}", file.path.display());
                continue;
            }
            packages.entry(file.package.as_str()).or_default().push(file);
        }

        let mut summary = RunSummary::default();
        for (package, files) in packages {
            log::debug!("Documenting package {package} ({} files)", files.len());
            summary.add(self.document_package(&files));
        }
        summary
    }

    /// Document the files of one package; they share one part table
    pub fn document_package(&self, files: &[&SourceFile]) -> RunSummary {
        let scanner = DeclarationScanner::new("", &self.settings.working_dir);
        let mut parts = PartTable::new();
        let mut units = Vec::new();
        for &file in files {
            let flows = scanner.scan_file(&mut parts, file);
            if !flows.is_empty() {
                units.push((file, flows));
            }
        }

        let mut summary = RunSummary {
            parts: parts.len(),
            ..RunSummary::default()
        };

        for (file, flows) in units {
            summary.flows += flows.len();
            let mut slot = DocumentSlot::new(file);
            for flow in &flows {
                if let Err(e) = self.write_flow(&mut slot, flow, &parts) {
                    log::error!("Unable to document flow {} of {}: {e}", flow.name, file.file_name());
                    slot.fail();
                    break;
                }
            }

            match slot.close() {
                Ok(true) => {
                    log::info!("Ended document {}.md", slot.base_name);
                    summary.documents_written += 1;
                }
                Ok(false) if slot.is_failed() => summary.documents_failed += 1,
                Ok(false) => {}
                Err(e) => {
                    log::error!("Unable to close document {}.md: {e}", slot.base_name);
                    summary.documents_failed += 1;
                }
            }
        }

        summary
    }

    fn write_flow(&self, slot: &mut DocumentSlot<'_>, flow: &FlowPart, parts: &PartTable) -> Result<()> {
        log::debug!("Processing flow {}", flow.name);
        let sections = extract_flow(&flow.raw_doc);
        let rendering = self.renderer.render(&sections.flow, &flow.name)?;
        if let Some(info) = &rendering.diagnostic {
            log::info!("{info}");
        }

        let image_name = format!("{}.{}", flow.name, self.renderer.image_extension());
        let image_path = self.settings.working_dir.join(&image_name);
        std::fs::write(&image_path, &rendering.image).map_err(|e| FlowDocError::io(&image_path, e))?;

        let mut section = format!("{FLOW_START}{}\n{}\n", flow.name, sections.prefix);
        section.push_str(&format!("![Flow: {}](./{image_name})\n\n", flow.name));
        section.push_str(&self.reference_table(slot, parts, &rendering));
        section.push_str(&sections.suffix);

        slot.append(&self.settings.working_dir, &section)
    }

    fn reference_table(&self, slot: &DocumentSlot<'_>, parts: &PartTable, rendering: &Rendering) -> String {
        let mut components = rendering.components.clone();
        sort_types(&mut components);
        let mut data_types = filter_types(&rendering.data_types);
        sort_types(&mut data_types);

        let rows = components.len().max(data_types.len());
        if rows == 0 {
            return String::new();
        }

        let mut table = String::from(REFERENCE_TABLE_HEADER);
        for i in 0..rows {
            if let Some(component) = components.get(i) {
                let part = self.resolve(slot, parts, component, &[PartKind::Flow, PartKind::Callable]);
                table.push_str(&self.cell(slot, component, part));
            }
            table.push_str(" | ");
            if let Some(data_type) = data_types.get(i) {
                let part = self.resolve(slot, parts, data_type, &[PartKind::Type]);
                table.push_str(&self.cell(slot, data_type, part));
            }
            table.push('\n');
        }
        table.push('\n');
        table
    }

    /// First part found for `name`, trying `kinds` in order
    fn resolve(
        &self,
        slot: &DocumentSlot<'_>,
        parts: &PartTable,
        name: &QualifiedName,
        kinds: &[PartKind],
    ) -> Option<Arc<SourcePart>> {
        kinds.iter().find_map(|&kind| {
            if name.is_local() {
                parts.get(&PartKey::new(kind, name.local_name.as_str())).cloned()
            } else {
                slot.imports
                    .get_part_for(self.dictionary, &name.module_path, kind, &name.local_name)
            }
        })
    }

    fn cell(&self, slot: &DocumentSlot<'_>, name: &QualifiedName, part: Option<Arc<SourcePart>>) -> String {
        let text = name.to_string();
        let Some(part) = part else {
            log::warn!("No declaration found for '{text}' in {}", slot.file.file_name());
            return text;
        };
        match self.links.link_for(&slot.base_name, &part) {
            Ok(link) => format!("[{text}]({link})"),
            Err(e) => {
                log::warn!("Unable to compute a link for {} '{text}': {e}", part.kind().as_str());
                text
            }
        }
    }
}

/// Drop predeclared types and `map[...]`, reduce unqualified slices to the
/// element type
#[must_use]
pub fn filter_types(types: &[QualifiedName]) -> Vec<QualifiedName> {
    types
        .iter()
        .filter_map(|ty| {
            if !ty.is_local() {
                return Some(ty.clone());
            }
            if ty.local_name.starts_with("map[") {
                return None;
            }
            let local = ty.local_name.strip_prefix("[]").unwrap_or(&ty.local_name);
            if local.is_empty() || BUILTIN_TYPES.contains(&local) {
                return None;
            }
            Some(QualifiedName::local(local))
        })
        .collect()
}

/// Order by package alias, then local name, without duplicates
pub fn sort_types(types: &mut Vec<QualifiedName>) {
    types.sort();
    types.dedup();
}

/// Document the directory described by `settings` with the Go loader
pub fn process_dir(settings: &RunSettings, renderer: &dyn FlowRenderer) -> Result<RunSummary> {
    process_dir_with(settings, renderer, &GoSourceLoader, Box::new(GoSourceLoader))
}

/// Document a directory; `loader` reads the directory itself,
/// `module_loader` backs the dictionary of referenced modules
pub fn process_dir_with(
    settings: &RunSettings,
    renderer: &dyn FlowRenderer,
    loader: &dyn SourceLoader,
    module_loader: Box<dyn SourceLoader>,
) -> Result<RunSummary> {
    log::info!("Documenting flows in {}", settings.working_dir.display());
    let files = loader.load_dir(&settings.working_dir)?;
    if files.is_empty() {
        log::warn!("No Go source files in {}", settings.working_dir.display());
        return Ok(RunSummary::default());
    }

    let dictionary = PackageDictionary::new(
        settings.search_roots.clone(),
        &settings.working_dir,
        module_loader,
    );
    let summary = FlowDocumenter::new(settings, &dictionary, renderer).document_files(&files);
    log::info!(
        "Found {} flows in {} source parts; {} modules referenced",
        summary.flows,
        summary.parts,
        dictionary.cached_count()
    );
    Ok(summary)
}
