use crate::error::{FlowDocError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static DATA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^()]*)\)").expect("valid data regex"));
static COMPONENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]").expect("valid component regex"));

/// Name as written in a flow: `Type` or `pkg.Type`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Package name the type is qualified with, empty for local names
    pub module_path: String,
    pub local_name: String,
}

impl QualifiedName {
    pub fn new(module_path: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            local_name: local_name.into(),
        }
    }

    pub fn local(local_name: impl Into<String>) -> Self {
        Self::new("", local_name)
    }

    /// Split `pkg.Name`; pointer stars are dropped, slices of qualified
    /// types point at the element type
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim().trim_start_matches('*');
        if let Some((pkg, local)) = text.split_once('.') {
            let pkg = pkg.trim_start_matches("[]").trim_start_matches('*');
            let is_ident = !pkg.is_empty()
                && pkg.chars().all(|c| c.is_alphanumeric() || c == '_');
            if is_ident && !local.is_empty() {
                return Self::new(pkg, local);
            }
        }
        Self::local(text)
    }

    #[must_use]
    pub fn is_local(&self) -> bool {
        self.module_path.is_empty()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module_path.is_empty() {
            write!(f, "{}", self.local_name)
        } else {
            write!(f, "{}.{}", self.module_path, self.local_name)
        }
    }
}

/// Output of rendering one flow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendering {
    pub image: Vec<u8>,
    /// Component types in order of first appearance
    pub components: Vec<QualifiedName>,
    /// Data types in order of first appearance
    pub data_types: Vec<QualifiedName>,
    /// Informational message worth showing the user
    pub diagnostic: Option<String>,
}

/// Turns a flow body into a diagram and the names it references
pub trait FlowRenderer {
    /// File extension of the produced image, e.g. `svg`
    fn image_extension(&self) -> &str;

    fn render(&self, flow: &str, name: &str) -> Result<Rendering>;
}

/// Renders the flow as an SVG outline of its lines.
///
/// Components are the bracketed terms (`[foo]`, `[name Type]`, last word is
/// the type) and data types the items of parenthesized terms
/// (`(int)`, `(a pkg.Data, b int)`).
#[derive(Debug, Default, Clone, Copy)]
pub struct OutlineRenderer;

impl OutlineRenderer {
    fn check_balanced(flow: &str, name: &str) -> Result<()> {
        for (open, close) in [('[', ']'), ('(', ')')] {
            let mut depth = 0_i32;
            for c in flow.chars() {
                if c == open {
                    depth += 1;
                } else if c == close {
                    depth -= 1;
                }
                if depth < 0 {
                    return Err(FlowDocError::render(name, format!("unexpected '{close}'")));
                }
            }
            if depth != 0 {
                return Err(FlowDocError::render(name, format!("unclosed '{open}'")));
            }
        }
        Ok(())
    }

    fn collect(flow: &str) -> (Vec<QualifiedName>, Vec<QualifiedName>) {
        let mut components = Vec::new();
        let mut data_types = Vec::new();

        for caps in DATA_RE.captures_iter(flow) {
            for item in caps[1].split(',') {
                if let Some(ty) = item.split_whitespace().last() {
                    push_unique(&mut data_types, QualifiedName::parse(ty));
                }
            }
        }

        let without_data = DATA_RE.replace_all(flow, " ");
        for caps in COMPONENT_RE.captures_iter(&without_data) {
            if let Some(ty) = caps[1].split_whitespace().last() {
                push_unique(&mut components, QualifiedName::parse(ty));
            }
        }

        (components, data_types)
    }

    fn svg(flow: &str, name: &str) -> Vec<u8> {
        const LINE_HEIGHT: usize = 20;
        const CHAR_WIDTH: usize = 9;

        let lines: Vec<&str> = flow.lines().collect();
        let widest = lines
            .iter()
            .map(|line| line.chars().count())
            .chain(std::iter::once(name.chars().count() + 6))
            .max()
            .unwrap_or(0);
        let width = 20 + widest * CHAR_WIDTH;
        let height = 20 + (lines.len() + 1) * LINE_HEIGHT;

        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
        );
        svg.push_str(&format!(
            "<rect x=\"1\" y=\"1\" width=\"{}\" height=\"{}\" fill=\"white\" stroke=\"black\"/>\n",
            width - 2,
            height - 2
        ));
        svg.push_str(&format!(
            "<text x=\"10\" y=\"{LINE_HEIGHT}\" font-family=\"monospace\" font-size=\"14\" font-weight=\"bold\">Flow: {}</text>\n",
            escape_xml(name)
        ));
        for (i, line) in lines.iter().enumerate() {
            svg.push_str(&format!(
                "<text x=\"10\" y=\"{}\" font-family=\"monospace\" font-size=\"14\" xml:space=\"preserve\">{}</text>\n",
                (i + 2) * LINE_HEIGHT,
                escape_xml(line)
            ));
        }
        svg.push_str("</svg>\n");
        svg.into_bytes()
    }
}

impl FlowRenderer for OutlineRenderer {
    fn image_extension(&self) -> &str {
        "svg"
    }

    fn render(&self, flow: &str, name: &str) -> Result<Rendering> {
        if flow.trim().is_empty() {
            return Err(FlowDocError::render(name, "flow is empty"));
        }
        Self::check_balanced(flow, name)?;

        let (components, data_types) = Self::collect(flow);
        let diagnostic = components
            .is_empty()
            .then(|| format!("flow {name} references no components"));

        Ok(Rendering {
            image: Self::svg(flow, name),
            components,
            data_types,
            diagnostic,
        })
    }
}

fn push_unique(list: &mut Vec<QualifiedName>, name: QualifiedName) {
    if !name.local_name.is_empty() && !list.contains(&name) {
        list.push(name);
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
