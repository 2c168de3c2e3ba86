//! Placeholder resolution and text insertion for generated document sections.
//!
//! A [`Section`](sections::Section) maps to a placeholder tag; the
//! [`InsertionResolver`](resolver::InsertionResolver) finds the first content
//! control carrying that tag in a [`DocumentSession`](document::DocumentSession)
//! and replaces its content, or falls back to inserting a new paragraph.

pub mod config;
pub mod document;
pub mod generator;
pub mod notify;
pub mod resolver;
pub mod sections;
pub mod text;
pub mod workflow;

pub use document::{DocumentSession, DocumentTree, FallbackAnchor};
pub use resolver::{InsertError, InsertOutcome, InsertionResolver};
pub use sections::{PlaceholderTag, RegistryError, Section, resolve_tag};
pub use text::{GeneratedText, normalize};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
