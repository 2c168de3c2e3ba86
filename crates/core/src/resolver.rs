//! Placeholder resolution and text insertion.
//!
//! Every operation runs in two phases against a [`DocumentSession`]: the
//! query phase materializes what is in the document, then a single
//! [`MutationBatch`] is built from those results and flushed. A failing
//! query therefore never reaches the mutation phase.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::document::{
    ControlHandle, DocumentError, DocumentSession, FallbackAnchor, MutationBatch,
};
use crate::sections::{PlaceholderTag, Section};
use crate::text::GeneratedText;

#[derive(Debug, Error)]
pub enum InsertError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("no active selection or cursor in the document")]
    NoActiveSelection,
}

/// Which path an insertion took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The first control carrying the tag had its content replaced
    ReplacedAtTag {
        control: ControlHandle,
        /// Further controls with the same tag, left untouched
        ignored_duplicates: usize,
    },
    /// No control carried the tag; a paragraph was appended to the body
    FallbackAppended,
    /// No control carried the tag; a paragraph was inserted at the top
    FallbackPrepended,
    /// The active selection was replaced
    ReplacedSelection,
}

impl InsertOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, InsertOutcome::FallbackAppended | InsertOutcome::FallbackPrepended)
    }
}

/// Resolves placeholder tags and performs replace-or-fallback insertion.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionResolver {
    anchor: FallbackAnchor,
}

impl InsertionResolver {
    pub fn new(anchor: FallbackAnchor) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> FallbackAnchor {
        self.anchor
    }

    /// Replace the content of the first control tagged `tag`, or insert a
    /// paragraph at the fallback anchor if there is none.
    pub async fn insert_by_section<S>(
        &self,
        session: &mut S,
        tag: &PlaceholderTag,
        text: &GeneratedText,
    ) -> Result<InsertOutcome, InsertError>
    where
        S: DocumentSession + ?Sized,
    {
        let normalized = text.normalized();

        let mut matches = session.query_by_tag(tag).await?;
        debug!(%tag, matches = matches.len(), "resolved placeholder tag");

        if matches.is_empty() {
            warn!(%tag, anchor = %self.anchor, "no content control for tag, using fallback");
            let batch = MutationBatch::new().insert_paragraph(self.anchor, normalized);
            session.apply(batch).await?;

            return Ok(match self.anchor {
                FallbackAnchor::End => InsertOutcome::FallbackAppended,
                FallbackAnchor::Start => InsertOutcome::FallbackPrepended,
            });
        }

        let ignored_duplicates = matches.len() - 1;
        if ignored_duplicates > 0 {
            warn!(%tag, ignored_duplicates, "tag is duplicated, only the first control is filled");
        }

        let target = matches.swap_remove(0);
        let batch = MutationBatch::new().replace_content(&target, normalized);
        session.apply(batch).await?;

        info!(%tag, control = %target.id, "replaced content control");
        Ok(InsertOutcome::ReplacedAtTag { control: target, ignored_duplicates })
    }

    /// Replace the active selection (or insert at the cursor).
    pub async fn insert_at_cursor<S>(
        &self,
        session: &mut S,
        text: &GeneratedText,
    ) -> Result<InsertOutcome, InsertError>
    where
        S: DocumentSession + ?Sized,
    {
        let normalized = text.normalized();

        if session.query_active_selection().await?.is_none() {
            return Err(InsertError::NoActiveSelection);
        }

        session.apply(MutationBatch::new().replace_selection(normalized)).await?;
        info!("replaced active selection");
        Ok(InsertOutcome::ReplacedSelection)
    }
}

/// How many controls carry a section's tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionMatches {
    pub section: Section,
    pub tag: PlaceholderTag,
    pub matches: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStatus {
    Missing,
    Ok,
    Duplicated,
}

impl SectionMatches {
    pub fn status(&self) -> TagStatus {
        match self.matches {
            0 => TagStatus::Missing,
            1 => TagStatus::Ok,
            _ => TagStatus::Duplicated,
        }
    }
}

/// Snapshot of every control in a document, for troubleshooting resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub controls: Vec<ControlHandle>,
    pub sections: Vec<SectionMatches>,
}

impl Diagnostics {
    /// Sections whose tag is missing or duplicated.
    pub fn problems(&self) -> impl Iterator<Item = &SectionMatches> {
        self.sections.iter().filter(|s| s.status() != TagStatus::Ok)
    }
}

/// List every control and count matches per known section. Read-only.
pub async fn enumerate<S>(session: &S) -> Result<Diagnostics, DocumentError>
where
    S: DocumentSession + ?Sized,
{
    let controls = session.list_controls().await?;

    let sections = Section::all()
        .into_iter()
        .map(|section| {
            let tag = section.tag();
            let matches = controls.iter().filter(|c| c.tag == tag).count();
            SectionMatches { section, tag, matches }
        })
        .collect();

    Ok(Diagnostics { controls, sections })
}
