pub mod file;
pub mod markdown;
pub mod memory;
pub mod tree;
pub mod types;

use async_trait::async_trait;

use crate::sections::PlaceholderTag;

pub use file::MarkdownFileSession;
pub use memory::MemorySession;
pub use tree::{Block, ContentControl, DocumentTree, SelectionRegion};
pub use types::{
    ControlHandle, ControlId, DocumentError, FallbackAnchor, Mutation, MutationBatch,
    SelectionHandle,
};

/// Access to a live document's structural tree.
///
/// Queries return fully materialized values. Mutations are queued in a
/// [`MutationBatch`] and only become visible once [`apply`](Self::apply)
/// returns, which is the session's flush point. Every call may suspend.
#[async_trait]
pub trait DocumentSession: Send + Sync {
    /// All content controls carrying `tag`, in document order.
    async fn query_by_tag(
        &self,
        tag: &PlaceholderTag,
    ) -> Result<Vec<ControlHandle>, DocumentError>;

    /// The current selection or cursor, if the session has one.
    async fn query_active_selection(&self) -> Result<Option<SelectionHandle>, DocumentError>;

    /// Every content control in document order.
    async fn list_controls(&self) -> Result<Vec<ControlHandle>, DocumentError>;

    /// Execute a batch and flush it. A rejected batch changes nothing.
    async fn apply(&mut self, batch: MutationBatch) -> Result<(), DocumentError>;
}
