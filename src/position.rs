//! Reading-position capture and relocation.
//!
//! Re-pagination (font change, window resize) rebuilds the section list over
//! the same document, so a saved section index is meaningless afterwards.
//! What survives is the document itself: positions are stored as an offset
//! into the normalized text plus a verification snippet, and mapped back to
//! a section index against whatever section list is current.

use crate::pagination::Section;
use serde::{Deserialize, Serialize};

/// Persisted per-document position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingPosition {
    /// Byte offset into the normalized document. Advisory: only trusted when
    /// the snippet still matches there.
    pub character_index: usize,
    /// Section-count-derived progress, 0–100.
    pub percentage: f64,
    /// Text starting at `character_index`, the integrity check for the
    /// offset surviving a re-extraction.
    pub text_snippet: String,
}

/// Snapshot the position at `section_index` into a persistable form.
///
/// The snippet is the first `snippet_len` characters of the document from
/// the section's start.
pub fn capture(
    sections: &[Section],
    section_index: usize,
    document: &str,
    snippet_len: usize,
) -> Option<ReadingPosition> {
    let section = sections.get(section_index)?;
    let start = section.start.min(document.len());
    let snippet: String = document[start..].chars().take(snippet_len).collect();
    let percentage = ((section_index + 1) as f64 / sections.len() as f64) * 100.0;
    Some(ReadingPosition {
        character_index: start,
        percentage,
        text_snippet: snippet,
    })
}

/// Map a saved position back to an index into `sections`.
///
/// Trusts the saved offset only if the snippet still matches the document
/// there; otherwise searches the document for the snippet; otherwise falls
/// back to the first section.
pub fn locate(sections: &[Section], document: &str, position: &ReadingPosition) -> usize {
    let target = resolve_offset(document, position);
    match target {
        Some(offset) => section_for_offset(sections, offset),
        None => 0,
    }
}

/// First section whose range contains `offset`. The end bound is inclusive
/// so an offset parked exactly on a boundary resumes on the earlier section.
pub fn section_for_offset(sections: &[Section], offset: usize) -> usize {
    for section in sections {
        if offset >= section.start && offset <= section.end {
            return section.index;
        }
    }
    0
}

fn resolve_offset(document: &str, position: &ReadingPosition) -> Option<usize> {
    let snippet = position.text_snippet.as_str();
    let offset = position.character_index;

    if offset <= document.len()
        && document.is_char_boundary(offset)
        && document[offset..].starts_with(snippet)
    {
        return Some(offset);
    }

    if snippet.is_empty() {
        return None;
    }
    document.find(snippet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::{Capacity, Chrome, FontMetrics, Viewport, estimate};
    use crate::config::AppConfig;
    use crate::normalizer::normalize;
    use crate::pagination::{PaginationTuning, paginate};

    fn capacity_for(font_size: f32) -> Capacity {
        let config = AppConfig::default();
        estimate(
            Viewport {
                width: 1280.0,
                height: 800.0,
            },
            FontMetrics {
                size: font_size,
                line_height: config.line_height,
                avg_char_width_ratio: config.avg_char_width_ratio,
            },
            Chrome::from_config(&config),
            &config,
        )
    }

    fn document() -> String {
        let paragraphs: Vec<String> = (0..40)
            .map(|i| {
                format!(
                    "Paragraph number {i} tells a small part of the story. \
                     It rambles on just long enough to fill a few lines."
                )
            })
            .collect();
        normalize(&paragraphs.join("\n\n"))
    }

    #[test]
    fn capture_then_locate_is_identity_for_the_same_pagination() {
        let doc = document();
        let sections = paginate(&doc, &capacity_for(22.0), &PaginationTuning::default());
        assert!(sections.len() > 2);

        for index in [0, 1, sections.len() - 1] {
            let pos = capture(&sections, index, &doc, 100).unwrap();
            assert_eq!(locate(&sections, &doc, &pos), index);
        }
    }

    #[test]
    fn position_survives_a_resize() {
        let doc = document();
        let before = paginate(&doc, &capacity_for(22.0), &PaginationTuning::default());
        let after = paginate(&doc, &capacity_for(30.0), &PaginationTuning::default());
        assert_ne!(before.len(), after.len());

        let index = before.len() / 2;
        let pos = capture(&before, index, &doc, 100).unwrap();
        let relocated = locate(&after, &doc, &pos);

        let snippet_head: String = pos.text_snippet.chars().take(40).collect();
        assert!(
            after[relocated].content.contains(snippet_head.trim()),
            "relocated section does not contain the snippet"
        );
    }

    #[test]
    fn shifted_offset_falls_back_to_snippet_search() {
        let doc = document();
        let sections = paginate(&doc, &capacity_for(22.0), &PaginationTuning::default());
        let index = sections.len() / 2;
        let mut pos = capture(&sections, index, &doc, 100).unwrap();

        // Simulate a re-extraction that shifted everything by a few bytes.
        pos.character_index = pos.character_index.saturating_sub(7);
        assert_eq!(locate(&sections, &doc, &pos), index);
    }

    #[test]
    fn unknown_snippet_defaults_to_first_section() {
        let doc = document();
        let sections = paginate(&doc, &capacity_for(22.0), &PaginationTuning::default());
        let pos = ReadingPosition {
            character_index: doc.len() + 500,
            percentage: 50.0,
            text_snippet: "this text appears nowhere in the document".to_string(),
        };
        assert_eq!(locate(&sections, &doc, &pos), 0);
    }

    #[test]
    fn boundary_offset_resolves_to_the_earlier_section() {
        let doc = document();
        let sections = paginate(&doc, &capacity_for(22.0), &PaginationTuning::default());
        assert!(sections.len() > 1);
        let boundary = sections[0].end;
        assert_eq!(section_for_offset(&sections, boundary), 0);
    }

    #[test]
    fn percentage_reflects_progress() {
        let doc = document();
        let sections = paginate(&doc, &capacity_for(22.0), &PaginationTuning::default());
        let last = sections.len() - 1;
        let pos = capture(&sections, last, &doc, 100).unwrap();
        assert!((pos.percentage - 100.0).abs() < 1e-9);
        let first = capture(&sections, 0, &doc, 100).unwrap();
        assert!(first.percentage > 0.0 && first.percentage <= 100.0);
    }
}
