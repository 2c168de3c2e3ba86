use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::document::DocumentSession;
use crate::document::markdown;
use crate::document::tree::DocumentTree;
use crate::document::types::*;
use crate::sections::PlaceholderTag;

/// A session over a markdown file on disk.
///
/// The file is read once when the session opens. Each applied batch is
/// rendered, checked to parse back to the same controls, and written back
/// before `apply` returns.
#[derive(Debug)]
pub struct MarkdownFileSession {
    path: PathBuf,
    tree: DocumentTree,
}

impl MarkdownFileSession {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref().to_path_buf();
        let input = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| DocumentError::Io { path: path.clone(), source })?;
        let tree = markdown::parse(&input)?;
        debug!(path = %path.display(), controls = tree.controls().count(), "opened document");
        Ok(Self { path, tree })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }
}

#[async_trait]
impl DocumentSession for MarkdownFileSession {
    async fn query_by_tag(
        &self,
        tag: &PlaceholderTag,
    ) -> Result<Vec<ControlHandle>, DocumentError> {
        Ok(self.tree.controls_by_tag(tag))
    }

    async fn query_active_selection(&self) -> Result<Option<SelectionHandle>, DocumentError> {
        Ok(self.tree.selection().map(|s| SelectionHandle { content: s.content.clone() }))
    }

    async fn list_controls(&self) -> Result<Vec<ControlHandle>, DocumentError> {
        Ok(self.tree.controls().map(|c| c.handle()).collect())
    }

    async fn apply(&mut self, batch: MutationBatch) -> Result<(), DocumentError> {
        // Work on a copy so a failed write leaves the session as it was.
        let mut next = self.tree.clone();
        next.apply(&batch)?;

        let rendered = markdown::render(&next);
        markdown::verify_render(&next, &rendered)?;
        tokio::fs::write(&self.path, rendered)
            .await
            .map_err(|source| DocumentError::Io { path: self.path.clone(), source })?;

        self.tree = next;
        debug!(path = %self.path.display(), ops = batch.len(), "flushed document");
        Ok(())
    }
}
