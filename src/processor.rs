//! Section processing: turning a plain-text section into render-ready
//! markup, with or without bionic emphasis.

use crate::bionic::{BionicTiering, format_block};
use crate::pagination::Section;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n+").unwrap());

/// A section plus its rendered markup. Derived on demand, never persisted;
/// recomputed whenever the bionic flag or the section list changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSection {
    pub section: Section,
    /// Markup actually shown: bionic if requested, plain otherwise.
    pub processed: String,
    /// Plain paragraph-wrapped markup, always available for fast toggling.
    pub regular_formatted: String,
    pub is_bionic: bool,
}

/// Wrap each non-empty paragraph of `text` in a `<p>` element.
pub fn paragraph_wrap(text: &str) -> String {
    RE_BLANK_LINE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{p}</p>"))
        .collect()
}

/// Produce markup for one section. Pure: safe to call on every mode toggle.
pub fn process(section: &Section, bionic: bool, tiering: &BionicTiering) -> ProcessedSection {
    let regular_formatted = paragraph_wrap(&section.content);
    let processed = if bionic {
        paragraph_wrap(&format_block(&section.content, tiering))
    } else {
        regular_formatted.clone()
    };
    ProcessedSection {
        section: section.clone(),
        processed,
        regular_formatted,
        is_bionic: bionic,
    }
}
