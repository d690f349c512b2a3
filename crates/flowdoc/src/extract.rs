//! Carving a flow description out of a doc comment.
//!
//! A flow starts after a blank line followed by a line reading exactly
//! `flow:`. Its body is the run of following lines that are blank or indented
//! by [`DSL_INDENT`]; the first other line ends it.

/// Introduces a flow body inside a doc comment
pub const FLOW_MARKER: &str = "\n\nflow:\n";

/// Indentation every flow line carries
pub const DSL_INDENT: &str = "    ";

/// A doc comment split around its flow body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowSections {
    /// Text before the flow, ending with one newline
    pub prefix: String,
    /// Flow body with the indentation removed
    pub flow: String,
    /// Text after the flow, newline terminated unless empty
    pub suffix: String,
}

/// Whether the doc contains a flow marker at all
#[must_use]
pub fn has_flow(doc: &str) -> bool {
    doc.contains(FLOW_MARKER)
}

/// Split a doc comment (comment characters already removed) into the text
/// before the flow, the flow itself and the text after it.
#[must_use]
pub fn extract_flow(doc: &str) -> FlowSections {
    let Some(start) = doc.find(FLOW_MARKER) else {
        return FlowSections {
            prefix: doc.to_string(),
            ..FlowSections::default()
        };
    };

    let prefix = doc[..=start].to_string();
    let mut pos = start + FLOW_MARKER.len();

    let mut flow = String::new();
    while let Some((line, consumed)) = dsl_line(&doc[pos..]) {
        flow.push_str(line);
        if !line.ends_with('\n') {
            flow.push('\n');
        }
        pos += consumed;
    }

    let mut suffix = doc[pos..].to_string();
    if !suffix.is_empty() && !suffix.ends_with('\n') {
        suffix.push('\n');
    }

    FlowSections {
        prefix,
        flow,
        suffix,
    }
}

/// Next flow line of `tail` and the number of bytes it spans
fn dsl_line(tail: &str) -> Option<(&str, usize)> {
    if tail.is_empty() {
        return None;
    }
    let len = tail.find('\n').map_or(tail.len(), |n| n + 1);
    let line = &tail[..len];

    if line.trim().is_empty() {
        return Some(("\n", len));
    }
    line.strip_prefix(DSL_INDENT).map(|body| (body, len))
}
