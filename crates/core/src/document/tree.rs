use crate::document::markdown::{escape_attr, line_ending_of};
use crate::document::types::*;
use crate::sections::PlaceholderTag;

/// A tagged region whose content can be replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentControl {
    pub id: ControlId,
    pub tag: String,
    pub title: Option<String>,
    pub content: String,
    /// Marker lines exactly as they appeared in the source, terminators included
    pub(crate) open_marker: String,
    pub(crate) close_marker: String,
}

/// The active selection or cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRegion {
    pub content: String,
    pub(crate) open_marker: String,
    pub(crate) close_marker: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Verbatim content outside any marker
    Text(String),
    Control(ContentControl),
    Selection(SelectionRegion),
    /// A paragraph inserted by the fallback path
    Paragraph(String),
}

/// Structural tree of a document: an ordered list of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTree {
    blocks: Vec<Block>,
    next_id: usize,
}

impl DocumentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Text(text.into()));
        self
    }

    pub fn with_control(
        mut self,
        tag: impl Into<String>,
        title: Option<&str>,
        content: impl Into<String>,
    ) -> Self {
        let tag = tag.into();
        let open_marker = match title {
            Some(t) => format!(
                "<!-- cc tag=\"{}\" title=\"{}\" -->\n",
                escape_attr(&tag),
                escape_attr(t)
            ),
            None => format!("<!-- cc tag=\"{}\" -->\n", escape_attr(&tag)),
        };
        self.push_control(
            tag,
            title.map(ToOwned::to_owned),
            content.into(),
            open_marker,
            "<!-- /cc -->\n".to_string(),
        );
        self
    }

    pub fn with_selection(mut self, content: impl Into<String>) -> Self {
        self.blocks.push(Block::Selection(SelectionRegion {
            content: content.into(),
            open_marker: "<!-- cc:selection -->\n".to_string(),
            close_marker: "<!-- /cc:selection -->\n".to_string(),
        }));
        self
    }

    pub(crate) fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub(crate) fn push_control(
        &mut self,
        tag: String,
        title: Option<String>,
        content: String,
        open_marker: String,
        close_marker: String,
    ) {
        let id = ControlId(self.next_id);
        self.next_id += 1;
        self.blocks.push(Block::Control(ContentControl {
            id,
            tag,
            title,
            content,
            open_marker,
            close_marker,
        }));
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// All content controls in document order.
    pub fn controls(&self) -> impl Iterator<Item = &ContentControl> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Control(c) => Some(c),
            _ => None,
        })
    }

    pub fn control(&self, id: ControlId) -> Option<&ContentControl> {
        self.controls().find(|c| c.id == id)
    }

    /// Handles for every control carrying `tag`, in document order.
    pub fn controls_by_tag(&self, tag: &PlaceholderTag) -> Vec<ControlHandle> {
        self.controls().filter(|c| c.tag == tag.as_str()).map(ContentControl::handle).collect()
    }

    pub fn selection(&self) -> Option<&SelectionRegion> {
        self.blocks.iter().find_map(|b| match b {
            Block::Selection(s) => Some(s),
            _ => None,
        })
    }

    /// Paragraphs added by the fallback path, in document order.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Line terminator of the document, taken from its first line.
    pub fn line_ending(&self) -> &'static str {
        let first_line = self.blocks.iter().find_map(|b| {
            let text = match b {
                Block::Text(t) | Block::Paragraph(t) => t.as_str(),
                Block::Control(c) => c.open_marker.as_str(),
                Block::Selection(s) => s.open_marker.as_str(),
            };
            text.split_inclusive('\n').next().filter(|l| l.ends_with('\n'))
        });
        first_line.map_or("\n", line_ending_of)
    }

    /// Apply a batch. Every mutation is checked before any is performed, so
    /// a rejected batch leaves the tree untouched.
    pub fn apply(&mut self, batch: &MutationBatch) -> Result<(), DocumentError> {
        for op in batch.iter() {
            match op {
                Mutation::ReplaceContent { target, .. } => {
                    if self.control(*target).is_none() {
                        return Err(DocumentError::StaleHandle(*target));
                    }
                }
                Mutation::ReplaceSelection { .. } => {
                    if self.selection().is_none() {
                        return Err(DocumentError::NoSelection);
                    }
                }
                Mutation::InsertParagraph { .. } => {}
            }
        }

        for op in batch.iter() {
            match op {
                Mutation::ReplaceContent { target, text } => {
                    if let Some(control) = self.control_mut(*target) {
                        control.content = with_line_ending(text, line_ending_of(&control.open_marker));
                    }
                }
                Mutation::ReplaceSelection { text } => {
                    if let Some(selection) = self.selection_mut() {
                        selection.content =
                            with_line_ending(text, line_ending_of(&selection.open_marker));
                    }
                }
                Mutation::InsertParagraph { anchor: FallbackAnchor::End, text } => {
                    let text = with_line_ending(text, self.line_ending());
                    self.blocks.push(Block::Paragraph(text));
                }
                Mutation::InsertParagraph { anchor: FallbackAnchor::Start, text } => {
                    let text = with_line_ending(text, self.line_ending());
                    self.blocks.insert(0, Block::Paragraph(text));
                }
            }
        }

        Ok(())
    }

    fn control_mut(&mut self, id: ControlId) -> Option<&mut ContentControl> {
        self.blocks.iter_mut().find_map(|b| match b {
            Block::Control(c) if c.id == id => Some(c),
            _ => None,
        })
    }

    fn selection_mut(&mut self) -> Option<&mut SelectionRegion> {
        self.blocks.iter_mut().find_map(|b| match b {
            Block::Selection(s) => Some(s),
            _ => None,
        })
    }
}

/// Rewrite line breaks in inserted text to the document's terminator.
fn with_line_ending(text: &str, eol: &str) -> String {
    if eol == "\n" {
        text.to_string()
    } else {
        text.replace("\r\n", "\n").replace('\n', eol)
    }
}

impl ContentControl {
    pub fn handle(&self) -> ControlHandle {
        ControlHandle {
            id: self.id,
            tag: PlaceholderTag::new(self.tag.as_str()),
            title: self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentTree {
        DocumentTree::new()
            .with_text("# Protocol\n\n")
            .with_control("cc_intro", Some("Introduction"), "placeholder")
            .with_control("cc_intro", None, "second")
            .with_control("cc_methodology", Some("Methodology Section"), "")
    }

    #[test]
    fn ids_follow_document_order() {
        let tree = sample();
        let ids: Vec<_> = tree.controls().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn controls_by_tag_returns_all_matches_in_order() {
        let tree = sample();
        let found = tree.controls_by_tag(&"cc_intro".into());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, ControlId(0));
        assert_eq!(found[0].title.as_deref(), Some("Introduction"));
        assert_eq!(found[1].id, ControlId(1));
    }

    #[test]
    fn stale_handle_rejects_whole_batch() {
        let mut tree = sample();
        let before = tree.clone();
        let live = tree.controls_by_tag(&"cc_intro".into()).remove(0);
        let stale = ControlHandle { id: ControlId(42), ..live.clone() };

        let batch = MutationBatch::new()
            .replace_content(&live, "new")
            .replace_content(&stale, "never");

        assert!(matches!(tree.apply(&batch), Err(DocumentError::StaleHandle(ControlId(42)))));
        assert_eq!(tree, before);
    }

    #[test]
    fn replace_selection_without_selection_fails() {
        let mut tree = sample();
        let batch = MutationBatch::new().replace_selection("x");
        assert!(matches!(tree.apply(&batch), Err(DocumentError::NoSelection)));
    }

    #[test]
    fn paragraphs_honour_anchor() {
        let mut tree = sample();
        let batch = MutationBatch::new()
            .insert_paragraph(FallbackAnchor::End, "tail")
            .insert_paragraph(FallbackAnchor::Start, "head");
        tree.apply(&batch).unwrap();

        assert_eq!(tree.blocks().first(), Some(&Block::Paragraph("head".into())));
        assert_eq!(tree.blocks().last(), Some(&Block::Paragraph("tail".into())));
    }

    #[test]
    fn inserted_text_follows_crlf_markers() {
        let mut tree = DocumentTree::new().with_text("# Protocol\r\n\r\n");
        tree.push_control(
            "cc_intro".into(),
            None,
            "old".into(),
            "<!-- cc tag=\"cc_intro\" -->\r\n".into(),
            "<!-- /cc -->\r\n".into(),
        );
        let handle = tree.controls_by_tag(&"cc_intro".into()).remove(0);

        let batch = MutationBatch::new()
            .replace_content(&handle, "one\ntwo")
            .insert_paragraph(FallbackAnchor::End, "tail\nend");
        tree.apply(&batch).unwrap();

        assert_eq!(tree.line_ending(), "\r\n");
        assert_eq!(tree.controls().next().unwrap().content, "one\r\ntwo");
        assert_eq!(tree.paragraphs(), vec!["tail\r\nend"]);
    }

    #[test]
    fn titles_with_quotes_are_escaped_in_markers() {
        let tree = DocumentTree::new().with_control("cc_intro", Some(r#"The "CAH" study & more"#), "");
        let control = tree.controls().next().unwrap();
        assert_eq!(
            control.open_marker,
            "<!-- cc tag=\"cc_intro\" title=\"The &quot;CAH&quot; study &amp; more\" -->\n"
        );
    }
}
