//! End-to-end flows: generate text, insert it, report the outcome.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{info, instrument};

use crate::document::{DocumentSession, FallbackAnchor};
use crate::generator::{ContentGenerator, GenerationError};
use crate::notify::{Notifier, NotifyKind};
use crate::resolver::{InsertError, InsertOutcome, InsertionResolver};
use crate::sections::{RegistryError, Section};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("content generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("insertion failed: {0}")]
    Insert(#[from] InsertError),
}

/// Drives one generation at a time against a document session.
pub struct Workflow<'a> {
    generator: &'a dyn ContentGenerator,
    notifier: &'a dyn Notifier,
    resolver: InsertionResolver,
    prompts: HashMap<Section, String>,
}

impl<'a> Workflow<'a> {
    pub fn new(generator: &'a dyn ContentGenerator, notifier: &'a dyn Notifier) -> Self {
        Self {
            generator,
            notifier,
            resolver: InsertionResolver::default(),
            prompts: HashMap::new(),
        }
    }

    pub fn with_anchor(mut self, anchor: FallbackAnchor) -> Self {
        self.resolver = InsertionResolver::new(anchor);
        self
    }

    /// Replace the built-in prompts for some sections.
    pub fn with_prompts(mut self, prompts: HashMap<Section, String>) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn prompt_for(&self, section: Section) -> &str {
        self.prompts.get(&section).map_or(section.default_prompt(), String::as_str)
    }

    /// Generate text for a section and place it at the section's placeholder.
    #[instrument(skip(self, session), fields(anchor = %self.resolver.anchor()))]
    pub async fn generate_section<S>(
        &self,
        session: &mut S,
        section: &str,
    ) -> Result<InsertOutcome, WorkflowError>
    where
        S: DocumentSession + ?Sized,
    {
        let result = self.run_section(session, section).await;
        self.report(result)
    }

    /// Generate text for a free-form prompt and place it at the selection.
    #[instrument(skip(self, session, prompt))]
    pub async fn generate_freeform<S>(
        &self,
        session: &mut S,
        prompt: &str,
    ) -> Result<InsertOutcome, WorkflowError>
    where
        S: DocumentSession + ?Sized,
    {
        let result = self.run_freeform(session, prompt).await;
        self.report(result)
    }

    async fn run_section<S>(
        &self,
        session: &mut S,
        section: &str,
    ) -> Result<InsertOutcome, WorkflowError>
    where
        S: DocumentSession + ?Sized,
    {
        let section: Section = section.parse()?;
        let tag = section.tag();

        self.notifier.notify(
            &format!("Generating {} content...", section.title().to_lowercase()),
            NotifyKind::Progress,
        );

        let text = self.generator.generate(Some(section), self.prompt_for(section)).await?;
        let outcome = self.resolver.insert_by_section(session, &tag, &text).await?;

        info!(%section, %tag, ?outcome, "section generated");
        Ok(outcome)
    }

    async fn run_freeform<S>(
        &self,
        session: &mut S,
        prompt: &str,
    ) -> Result<InsertOutcome, WorkflowError>
    where
        S: DocumentSession + ?Sized,
    {
        self.notifier.notify("Generating content...", NotifyKind::Progress);

        let text = self.generator.generate(None, prompt).await?;
        let outcome = self.resolver.insert_at_cursor(session, &text).await?;

        info!(?outcome, "free-form content generated");
        Ok(outcome)
    }

    fn report(
        &self,
        result: Result<InsertOutcome, WorkflowError>,
    ) -> Result<InsertOutcome, WorkflowError> {
        match &result {
            Ok(InsertOutcome::FallbackAppended) => self.notifier.notify(
                "Content generated; placeholder not found, added at the end of the document.",
                NotifyKind::Success,
            ),
            Ok(InsertOutcome::FallbackPrepended) => self.notifier.notify(
                "Content generated; placeholder not found, added at the start of the document.",
                NotifyKind::Success,
            ),
            Ok(_) => self.notifier.notify("Content generated successfully!", NotifyKind::Success),
            Err(e) => {
                self.notifier.notify(&format!("Error generating content: {e}"), NotifyKind::Error)
            }
        }
        result
    }
}
