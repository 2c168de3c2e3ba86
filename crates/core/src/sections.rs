//! The closed set of document sections and the placeholder tags they map to.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// A logical category of generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Intro,
    Objectives,
    Methodology,
}

/// String key used to locate content controls inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlaceholderTag(String);

impl PlaceholderTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceholderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlaceholderTag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown section '{0}' (expected one of: intro, objectives, methodology)")]
    UnknownSection(String),
}

/// Static configuration for one section.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub section: Section,
    pub tag: &'static str,
    pub title: &'static str,
    pub default_prompt: &'static str,
}

static SECTIONS: [SectionSpec; 3] = [
    SectionSpec {
        section: Section::Intro,
        tag: "cc_intro",
        title: "Introduction",
        default_prompt: INTRO_PROMPT,
    },
    SectionSpec {
        section: Section::Objectives,
        tag: "cc_objectives",
        title: "Objectives",
        default_prompt: OBJECTIVES_PROMPT,
    },
    SectionSpec {
        section: Section::Methodology,
        tag: "cc_methodology",
        title: "Methodology",
        default_prompt: METHODOLOGY_PROMPT,
    },
];

impl Section {
    /// All sections in declaration order.
    pub fn all() -> [Section; 3] {
        [Section::Intro, Section::Objectives, Section::Methodology]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Intro => "intro",
            Section::Objectives => "objectives",
            Section::Methodology => "methodology",
        }
    }

    pub fn spec(self) -> &'static SectionSpec {
        match self {
            Section::Intro => &SECTIONS[0],
            Section::Objectives => &SECTIONS[1],
            Section::Methodology => &SECTIONS[2],
        }
    }

    pub fn tag(self) -> PlaceholderTag {
        PlaceholderTag::new(self.spec().tag)
    }

    pub fn title(self) -> &'static str {
        self.spec().title
    }

    pub fn default_prompt(self) -> &'static str {
        self.spec().default_prompt
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::all()
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownSection(s.to_string()))
    }
}

/// Resolve a section identifier to its placeholder tag.
pub fn resolve_tag(section: &str) -> Result<PlaceholderTag, RegistryError> {
    section.parse::<Section>().map(Section::tag)
}

const INTRO_PROMPT: &str = "You are a regulatory writer specializing in UK CTA (Clinical Trial Application) documents. \
Write a compelling two-paragraph introduction for a Phase 2 study of the drug 'Crinetide' for Congenital Adrenal Hyperplasia (CAH).\n\n\
The introduction should:\n\
- Establish the medical need and burden of CAH\n\
- Introduce Crinetide as a potential therapeutic solution\n\
- Set up the rationale for this Phase 2 study\n\
- Be written in formal, regulatory language suitable for UK authorities\n\
- Be approximately 150-200 words total\n\n\
Focus on the clinical and regulatory context while maintaining scientific accuracy.";

const OBJECTIVES_PROMPT: &str = "You are a regulatory writer creating study objectives for a UK CTA Phase 2 study of Crinetide \
for Congenital Adrenal Hyperplasia. Write clear, specific primary and secondary objectives.\n\n\
Primary Objectives should focus on:\n\
- Efficacy endpoints (e.g., hormone levels, clinical symptoms)\n\
- Safety and tolerability measures\n\
- Dose-response relationships\n\n\
Secondary Objectives should include:\n\
- Biomarker analysis\n\
- Quality of life measures\n\
- Pharmacokinetic parameters\n\n\
Write 3-4 primary objectives and 4-5 secondary objectives, each as a single, clear sentence. \
Use regulatory language appropriate for UK CTA submissions.";

const METHODOLOGY_PROMPT: &str = "You are a regulatory writer drafting the methodology section for a UK CTA Phase 2 study of \
Crinetide for Congenital Adrenal Hyperplasia. Write a comprehensive methodology overview covering:\n\n\
Study Design:\n\
- Phase 2, randomized, double-blind, placebo-controlled study\n\
- Multi-center design across UK sites\n\
- Adaptive design elements for dose optimization\n\n\
Patient Population:\n\
- Adults (18-65 years) with confirmed CAH\n\
- Specific inclusion/exclusion criteria\n\
- Target enrollment numbers\n\n\
Treatment Regimen:\n\
- Crinetide administration details\n\
- Placebo comparator\n\
- Duration of treatment and follow-up\n\n\
Statistical Considerations:\n\
- Sample size justification\n\
- Primary and secondary endpoints\n\
- Statistical analysis plan\n\n\
Write in clear, regulatory language suitable for UK authorities. \
Focus on the key methodological elements that would be required for CTA approval.";

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("intro", "cc_intro")]
    #[case("objectives", "cc_objectives")]
    #[case("methodology", "cc_methodology")]
    fn resolves_documented_tags(#[case] section: &str, #[case] tag: &str) {
        assert_eq!(resolve_tag(section).unwrap().as_str(), tag);
    }

    #[rstest]
    #[case("unknown")]
    #[case("Intro")]
    #[case("")]
    fn rejects_identifiers_outside_the_registry(#[case] section: &str) {
        assert_eq!(
            resolve_tag(section),
            Err(RegistryError::UnknownSection(section.to_string()))
        );
    }

    #[test]
    fn identifiers_round_trip_through_from_str() {
        for section in Section::all() {
            assert_eq!(section.as_str().parse::<Section>().unwrap(), section);
        }
    }

    #[test]
    fn tags_are_unique() {
        let mut tags: Vec<_> = Section::all().iter().map(|s| s.spec().tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), 3);
    }

    #[test]
    fn prompts_are_present() {
        for section in Section::all() {
            assert!(section.default_prompt().contains("regulatory writer"));
        }
    }
}
