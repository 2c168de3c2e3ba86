//! Markdown surface syntax for content controls.
//!
//! Controls and the selection are HTML comments on their own lines:
//!
//! ```markdown
//! <!-- cc tag="cc_intro" title="Introduction" -->
//! placeholder text
//! <!-- /cc -->
//!
//! <!-- cc:selection -->
//! <!-- /cc:selection -->
//! ```
//!
//! Markers are located with comrak so that comments inside code blocks,
//! block quotes or list items are left alone. Everything outside the markers
//! round-trips byte for byte. Attribute values escape `"` and `&` as
//! `&quot;` and `&amp;`.

use std::sync::LazyLock;

use comrak::nodes::NodeValue;
use comrak::{Arena, Options, parse_document};
use regex::Regex;

use crate::document::tree::{Block, DocumentTree, SelectionRegion};
use crate::document::types::DocumentError;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    // <!-- cc ... -->, <!-- /cc -->, <!-- cc:selection -->, <!-- /cc:selection -->
    Regex::new(r"^ {0,3}<!--\s*(/)?cc(:selection)?(\s+.*?)?\s*-->\s*$").unwrap()
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*"([^"]*)""#).unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Marker {
    OpenControl { tag: Option<String>, title: Option<String> },
    CloseControl,
    OpenSelection,
    CloseSelection,
}

/// Parse a markdown document into a tree of text, controls and selection.
///
/// Outside a region, markers are found with comrak on the rest of the
/// document. Inside a region, the closing marker is the first line that
/// looks like one, whatever markdown the body contains.
pub fn parse(input: &str) -> Result<DocumentTree, DocumentError> {
    let lines: Vec<&str> = input.split_inclusive('\n').collect();
    let mut starts = Vec::with_capacity(lines.len() + 1);
    let mut offset = 0;
    for line in &lines {
        starts.push(offset);
        offset += line.len();
    }
    starts.push(offset);

    let mut tree = DocumentTree::new();
    let mut seen_selection = false;
    let mut idx = 0;

    while idx < lines.len() {
        let Some((relative, marker)) = next_marker(&input[starts[idx]..]) else {
            tree.push_block(Block::Text(input[starts[idx]..].to_string()));
            break;
        };

        let at = idx + relative - 1;
        let line_no = at + 1;
        if at > idx {
            tree.push_block(Block::Text(input[starts[idx]..starts[at]].to_string()));
        }

        let open = lines[at].to_string();
        match marker {
            Marker::OpenControl { tag, title } => {
                let tag = tag.ok_or_else(|| malformed(line_no, "content control has no tag"))?;
                let (body, close_at) =
                    read_region(&lines, at + 1, Marker::CloseControl, line_no, "content control")?;
                tree.push_control(tag, title, strip_terminator(body), open, lines[close_at].to_string());
                idx = close_at + 1;
            }
            Marker::OpenSelection => {
                if seen_selection {
                    return Err(malformed(line_no, "document has more than one selection"));
                }
                seen_selection = true;
                let (body, close_at) =
                    read_region(&lines, at + 1, Marker::CloseSelection, line_no, "selection")?;
                tree.push_block(Block::Selection(SelectionRegion {
                    content: strip_terminator(body),
                    open_marker: open,
                    close_marker: lines[close_at].to_string(),
                }));
                idx = close_at + 1;
            }
            Marker::CloseControl | Marker::CloseSelection => {
                return Err(malformed(line_no, "closing marker without a matching opening marker"));
            }
        }
    }

    Ok(tree)
}

/// Collect region body lines from `from` up to the `close` marker.
/// Returns the body and the index of the closing line.
fn read_region(
    lines: &[&str],
    from: usize,
    close: Marker,
    opened_at: usize,
    what: &str,
) -> Result<(String, usize), DocumentError> {
    let mut body = String::new();
    for (idx, raw) in lines.iter().enumerate().skip(from) {
        match parse_marker(raw) {
            None => body.push_str(raw),
            Some(marker) if marker == close => return Ok((body, idx)),
            Some(_) => {
                return Err(malformed(
                    idx + 1,
                    &format!("marker inside the {what} opened at line {opened_at}"),
                ));
            }
        }
    }
    Err(malformed(opened_at, &format!("{what} is never closed")))
}

/// Render a tree back to markdown.
pub fn render(tree: &DocumentTree) -> String {
    let mut out = String::new();
    let blocks = tree.blocks();
    let eol = tree.line_ending();

    for (idx, block) in blocks.iter().enumerate() {
        match block {
            Block::Text(text) => out.push_str(text),
            Block::Control(control) => {
                push_region(&mut out, &control.open_marker, &control.content, &control.close_marker);
            }
            Block::Selection(selection) => {
                push_region(
                    &mut out,
                    &selection.open_marker,
                    &selection.content,
                    &selection.close_marker,
                );
            }
            Block::Paragraph(text) => {
                if !out.is_empty() {
                    ensure_newline(&mut out, eol);
                    if !out.ends_with(&format!("{eol}{eol}")) {
                        out.push_str(eol);
                    }
                }
                out.push_str(text);
                ensure_newline(&mut out, eol);
                if idx + 1 < blocks.len() {
                    out.push_str(eol);
                }
            }
        }
    }

    out
}

/// Check that `rendered` parses back to the controls and selection of `tree`.
///
/// Inserted text is free markdown. A line that looks like a marker, or an
/// unclosed fence in a fallback paragraph, would change the structure once
/// the file is read again.
pub fn verify_render(tree: &DocumentTree, rendered: &str) -> Result<(), DocumentError> {
    let reparsed = parse(rendered).map_err(|e| DocumentError::Unrepresentable(e.to_string()))?;

    let expected = tree.controls().map(|c| (c.tag.as_str(), c.content.as_str()));
    let found = reparsed.controls().map(|c| (c.tag.as_str(), c.content.as_str()));
    if !expected.eq(found) {
        return Err(DocumentError::Unrepresentable(
            "content controls change when the document is read back".to_string(),
        ));
    }

    let selection = |t: &DocumentTree| t.selection().map(|s| s.content.clone());
    if selection(tree) != selection(&reparsed) {
        return Err(DocumentError::Unrepresentable(
            "selection changes when the document is read back".to_string(),
        ));
    }

    Ok(())
}

/// Escape a value for use inside a double-quoted marker attribute.
pub(crate) fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

fn unescape_attr(value: &str) -> String {
    value.replace("&quot;", "\"").replace("&amp;", "&")
}

/// The first block-level marker comment in `input`, with its 1-based line.
fn next_marker(input: &str) -> Option<(usize, Marker)> {
    let arena = Arena::new();
    let options = Options::default();
    let root = parse_document(&arena, input, &options);
    let lines: Vec<&str> = input.lines().collect();

    // Only direct children of the document: comments nested in quotes,
    // lists or code are content.
    root.children().find_map(|node| {
        let data = node.data.borrow();
        if !matches!(data.value, NodeValue::HtmlBlock(_)) {
            return None;
        }

        let line_no = data.sourcepos.start.line;
        if data.sourcepos.end.line != line_no {
            return None;
        }

        let raw = line_no.checked_sub(1).and_then(|i| lines.get(i))?;
        parse_marker(raw).map(|marker| (line_no, marker))
    })
}

fn parse_marker(line: &str) -> Option<Marker> {
    let caps = MARKER_RE.captures(line)?;
    let closing = caps.get(1).is_some();
    let selection = caps.get(2).is_some();

    let marker = match (closing, selection) {
        (true, true) => Marker::CloseSelection,
        (true, false) => Marker::CloseControl,
        (false, true) => Marker::OpenSelection,
        (false, false) => {
            let attrs = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
            let mut tag = None;
            let mut title = None;
            for attr in ATTR_RE.captures_iter(attrs) {
                match &attr[1] {
                    "tag" => tag = Some(unescape_attr(&attr[2])),
                    "title" => title = Some(unescape_attr(&attr[2])),
                    _ => {}
                }
            }
            Marker::OpenControl { tag: tag.filter(|t| !t.is_empty()), title }
        }
    };

    Some(marker)
}

fn strip_terminator(mut body: String) -> String {
    if body.ends_with("\r\n") {
        body.truncate(body.len() - 2);
    } else if body.ends_with('\n') {
        body.pop();
    }
    body
}

fn push_region(out: &mut String, open: &str, content: &str, close: &str) {
    let eol = line_ending_of(open);
    ensure_newline(out, eol);
    out.push_str(open);
    ensure_newline(out, eol);
    if !content.is_empty() {
        out.push_str(content);
        out.push_str(eol);
    }
    out.push_str(close);
}

/// The terminator used by a marker line; `\n` when it has none.
pub(crate) fn line_ending_of(line: &str) -> &'static str {
    if line.ends_with("\r\n") { "\r\n" } else { "\n" }
}

fn ensure_newline(out: &mut String, eol: &str) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push_str(eol);
    }
}

fn malformed(line: usize, message: &str) -> DocumentError {
    DocumentError::Malformed { line, message: message.to_string() }
}
