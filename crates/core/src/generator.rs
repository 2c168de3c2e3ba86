//! Content generators: where section text comes from.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::sections::Section;
use crate::text::GeneratedText;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no response available for {0}")]
    MissingResponse(String),

    #[error("failed to read response {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("generator returned empty text for {0}")]
    Empty(String),
}

/// Produces text for a section (or for a free-form prompt when `section` is `None`).
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        section: Option<Section>,
        prompt: &str,
    ) -> Result<GeneratedText, GenerationError>;
}

/// File stem used for free-form responses.
pub const FREEFORM_RESPONSE: &str = "freeform";

/// Serves pre-written responses from a directory.
///
/// `intro.txt`, `objectives.txt` and `methodology.txt` answer section
/// requests; `freeform.txt` answers everything else. The prompt is not
/// interpreted.
#[derive(Debug, Clone)]
pub struct CannedGenerator {
    dir: PathBuf,
    latency: Duration,
}

impl CannedGenerator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), latency: Duration::ZERO }
    }

    /// Wait this long before answering, like a remote call would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn response_path(&self, section: Option<Section>) -> PathBuf {
        let stem = section.map_or(FREEFORM_RESPONSE, Section::as_str);
        self.dir.join(format!("{stem}.txt"))
    }
}

#[async_trait]
impl ContentGenerator for CannedGenerator {
    async fn generate(
        &self,
        section: Option<Section>,
        prompt: &str,
    ) -> Result<GeneratedText, GenerationError> {
        let path = self.response_path(section);
        debug!(path = %path.display(), prompt_len = prompt.len(), "reading canned response");

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GenerationError::MissingResponse(path.display().to_string()));
            }
            Err(source) => return Err(GenerationError::Io { path, source }),
        };

        if text.trim().is_empty() {
            return Err(GenerationError::Empty(path.display().to_string()));
        }

        Ok(GeneratedText::new(text.trim_end()))
    }
}

/// Latency of the built-in responses, matching a typical remote call.
pub const BUILTIN_LATENCY: Duration = Duration::from_millis(1500);

/// Serves the demo texts for the Crinetide CAH study that ship with the crate.
///
/// Free-form prompts have no built-in answer.
#[derive(Debug, Clone)]
pub struct BuiltinGenerator {
    latency: Duration,
}

impl Default for BuiltinGenerator {
    fn default() -> Self {
        Self { latency: BUILTIN_LATENCY }
    }
}

impl BuiltinGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn response(section: Section) -> &'static str {
        match section {
            Section::Intro => include_str!("../assets/responses/intro.txt"),
            Section::Objectives => include_str!("../assets/responses/objectives.txt"),
            Section::Methodology => include_str!("../assets/responses/methodology.txt"),
        }
    }
}

#[async_trait]
impl ContentGenerator for BuiltinGenerator {
    async fn generate(
        &self,
        section: Option<Section>,
        _prompt: &str,
    ) -> Result<GeneratedText, GenerationError> {
        let Some(section) = section else {
            return Err(GenerationError::MissingResponse(FREEFORM_RESPONSE.to_string()));
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        debug!(%section, "serving built-in response");
        Ok(GeneratedText::new(Self::response(section).trim_end()))
    }
}

/// Answers from an in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticGenerator {
    sections: HashMap<Section, String>,
    freeform: Option<String>,
}

impl StaticGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(mut self, section: Section, text: impl Into<String>) -> Self {
        self.sections.insert(section, text.into());
        self
    }

    pub fn with_freeform(mut self, text: impl Into<String>) -> Self {
        self.freeform = Some(text.into());
        self
    }
}

#[async_trait]
impl ContentGenerator for StaticGenerator {
    async fn generate(
        &self,
        section: Option<Section>,
        _prompt: &str,
    ) -> Result<GeneratedText, GenerationError> {
        let found = match section {
            Some(s) => self.sections.get(&s),
            None => self.freeform.as_ref(),
        };

        found.map(|t| GeneratedText::new(t.as_str())).ok_or_else(|| {
            GenerationError::MissingResponse(
                section.map_or(FREEFORM_RESPONSE, Section::as_str).to_string(),
            )
        })
    }
}
