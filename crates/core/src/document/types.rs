use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sections::PlaceholderTag;

/// Identifier of a content control, assigned in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ControlId(pub usize);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A located content control, materialized by a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlHandle {
    pub id: ControlId,
    pub tag: PlaceholderTag,
    pub title: Option<String>,
}

/// The active selection, materialized by a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionHandle {
    /// Text currently covered by the selection (empty for a bare cursor)
    pub content: String,
}

/// Where a fallback paragraph goes when no control carries the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackAnchor {
    /// Append after the last block of the body
    #[default]
    End,
    /// Insert before the first block of the body
    Start,
}

impl fmt::Display for FallbackAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackAnchor::End => f.write_str("end"),
            FallbackAnchor::Start => f.write_str("start"),
        }
    }
}

/// A single queued document change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Replace the whole content of a control
    ReplaceContent { target: ControlId, text: String },
    /// Replace whatever the active selection covers
    ReplaceSelection { text: String },
    /// Insert a new paragraph at a body anchor
    InsertParagraph { anchor: FallbackAnchor, text: String },
}

/// Mutations queued during the second phase of an operation.
///
/// Nothing touches the document until the batch is handed to
/// [`DocumentSession::apply`](super::DocumentSession::apply).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationBatch {
    ops: Vec<Mutation>,
}

impl MutationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_content(mut self, target: &ControlHandle, text: impl Into<String>) -> Self {
        self.ops.push(Mutation::ReplaceContent { target: target.id, text: text.into() });
        self
    }

    pub fn replace_selection(mut self, text: impl Into<String>) -> Self {
        self.ops.push(Mutation::ReplaceSelection { text: text.into() });
        self
    }

    pub fn insert_paragraph(mut self, anchor: FallbackAnchor, text: impl Into<String>) -> Self {
        self.ops.push(Mutation::InsertParagraph { anchor, text: text.into() });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mutation> {
        self.ops.iter()
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document session is no longer available")]
    SessionInvalidated,

    #[error("failed to access document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document at line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("content control {0} no longer exists")]
    StaleHandle(ControlId),

    #[error("document has no active selection to replace")]
    NoSelection,

    #[error("inserted text would break the document structure: {0}")]
    Unrepresentable(String),
}
