use async_trait::async_trait;
use tracing::debug;

use crate::document::DocumentSession;
use crate::document::tree::DocumentTree;
use crate::document::types::*;
use crate::sections::PlaceholderTag;

/// A session over a document held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    tree: DocumentTree,
    invalidated: bool,
    flushes: usize,
}

impl MemorySession {
    pub fn new(tree: DocumentTree) -> Self {
        Self { tree, invalidated: false, flushes: 0 }
    }

    /// Simulate the host dropping the session; every later call fails.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn into_tree(self) -> DocumentTree {
        self.tree
    }

    /// Number of batches applied so far.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    fn check(&self) -> Result<(), DocumentError> {
        if self.invalidated { Err(DocumentError::SessionInvalidated) } else { Ok(()) }
    }
}

#[async_trait]
impl DocumentSession for MemorySession {
    async fn query_by_tag(
        &self,
        tag: &PlaceholderTag,
    ) -> Result<Vec<ControlHandle>, DocumentError> {
        self.check()?;
        Ok(self.tree.controls_by_tag(tag))
    }

    async fn query_active_selection(&self) -> Result<Option<SelectionHandle>, DocumentError> {
        self.check()?;
        Ok(self.tree.selection().map(|s| SelectionHandle { content: s.content.clone() }))
    }

    async fn list_controls(&self) -> Result<Vec<ControlHandle>, DocumentError> {
        self.check()?;
        Ok(self.tree.controls().map(|c| c.handle()).collect())
    }

    async fn apply(&mut self, batch: MutationBatch) -> Result<(), DocumentError> {
        self.check()?;
        self.tree.apply(&batch)?;
        self.flushes += 1;
        debug!(ops = batch.len(), flushes = self.flushes, "applied batch to in-memory document");
        Ok(())
    }
}
