//! Doc comment normalization.
//!
//! Turns the raw comment tokens that precede a declaration into the plain text
//! a Go reader expects: markers stripped, directives dropped, blank lines
//! collapsed, newline terminated.

/// Normalize a group of adjacent comments into doc text.
///
/// Comment markers (`//`, `/*`, `*/`) and the first space of a line comment
/// are removed, tool directives such as `//go:generate` are dropped, trailing
/// whitespace is trimmed, leading and trailing blank lines are removed and
/// runs of blank lines are reduced to one. Unless the result is empty it ends
/// with a newline.
pub fn doc_text<S: AsRef<str>>(comments: &[S]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for comment in comments {
        let raw = comment.as_ref();
        if let Some(body) = raw.strip_prefix("//") {
            if is_directive(body) {
                continue;
            }
            let body = body.strip_prefix(' ').unwrap_or(body);
            lines.push(body.to_string());
        } else if let Some(body) = raw.strip_prefix("/*") {
            let body = body.strip_suffix("*/").unwrap_or(body);
            lines.extend(body.split('\n').map(str::to_string));
        }
    }

    let mut kept: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        let line = line.trim_end().to_string();
        // leading blanks and blank runs
        if line.is_empty() && kept.last().map_or(true, String::is_empty) {
            continue;
        }
        kept.push(line);
    }
    while kept.last().is_some_and(String::is_empty) {
        kept.pop();
    }

    if kept.is_empty() {
        return String::new();
    }
    let mut text = kept.join("\n");
    text.push('\n');
    text
}

/// `//line`, `//extern`, `//export` and `//[a-z0-9]+:[a-z0-9]` comments
fn is_directive(body: &str) -> bool {
    if body.starts_with("line ") || body.starts_with("extern ") || body.starts_with("export ") {
        return true;
    }

    let bytes = body.as_bytes();
    let Some(colon) = body.find(':') else {
        return false;
    };
    if colon == 0 || colon + 1 >= bytes.len() {
        return false;
    }
    bytes[..=colon + 1]
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != colon)
        .all(|(_, b)| b.is_ascii_lowercase() || b.is_ascii_digit())
}
