//! Pagination: splitting a normalized document into screen-sized sections.
//!
//! Strategy: greedily pack whole paragraphs into an accumulator until the
//! estimated height crosses a conservative fraction of the screen, then
//! flush. A paragraph that alone would overflow a screen is split on
//! sentence boundaries (and, failing that, on words) and emitted directly.
//!
//! Heights are the same character-count approximation the capacity
//! estimator uses; they decide where to cut and are never shown to anyone.
//! Every section records the half-open byte range of the document it came
//! from, so a saved offset can always be mapped back into a fresh section
//! list after the capacity changes.

use crate::capacity::Capacity;
use crate::config::AppConfig;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_PARA_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n+").unwrap());

/// One screen's worth of text, the unit of navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Trimmed document slice belonging to this section. No markup.
    pub content: String,
    /// Dense 0-based position in the section list.
    pub index: usize,
    /// Half-open byte range into the normalized document.
    pub start: usize,
    pub end: usize,
    /// Advisory height estimate used to decide the cut, in pixels.
    pub estimated_height: f32,
}

/// Knobs for the packing heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaginationTuning {
    /// Fraction of the available height a section may fill. Deliberately
    /// below 1.0 to leave rendering slack.
    pub fill_threshold: f32,
    /// Estimated vertical margin between adjacent paragraphs, in pixels.
    pub paragraph_margin_px: f32,
}

impl Default for PaginationTuning {
    fn default() -> Self {
        Self {
            fill_threshold: 0.8,
            paragraph_margin_px: 32.0,
        }
    }
}

impl PaginationTuning {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fill_threshold: config.fill_threshold,
            paragraph_margin_px: config.paragraph_margin_px,
        }
    }
}

/// Split `text` into an ordered, non-overlapping list of sections.
///
/// Deterministic: the same text and capacity always produce the same list.
/// Total: any string input yields a list (empty text yields an empty one).
pub fn paginate(text: &str, capacity: &Capacity, tuning: &PaginationTuning) -> Vec<Section> {
    let mut packer = ParagraphPacker::new(text, capacity, tuning);
    for span in paragraph_spans(text) {
        packer.push_paragraph(span);
    }
    packer.finish()
}

/// Estimate the rendered height of a block of text, in pixels.
///
/// Line count per paragraph is `ceil(chars / chars_per_line)`; paragraphs
/// are separated by the configured margin.
pub fn estimate_height(text: &str, capacity: &Capacity, tuning: &PaginationTuning) -> f32 {
    let mut total = 0.0;
    let mut paragraphs = 0usize;
    for (start, end) in paragraph_spans(text) {
        let chars = text[start..end].chars().count();
        let lines = chars.div_ceil(capacity.chars_per_line.max(1));
        total += lines as f32 * capacity.line_height_px;
        paragraphs += 1;
    }
    if paragraphs > 1 {
        total += (paragraphs - 1) as f32 * tuning.paragraph_margin_px;
    }
    total
}

/// Byte spans of the non-empty paragraphs in `text`, trimmed to their
/// non-whitespace extent.
pub(crate) fn paragraph_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut last = 0;
    for sep in RE_PARA_BREAK.find_iter(text) {
        push_trimmed(text, last, sep.start(), &mut spans);
        last = sep.end();
    }
    push_trimmed(text, last, text.len(), &mut spans);
    spans
}

fn push_trimmed(text: &str, start: usize, end: usize, spans: &mut Vec<(usize, usize)>) {
    let slice = &text[start..end];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = slice.len() - slice.trim_start().len();
    let trail = slice.len() - slice.trim_end().len();
    spans.push((start + lead, end - trail));
}

struct Accumulated {
    start: usize,
    end: usize,
    height: f32,
}

/// Greedy paragraph packer. Shared by the one-shot [`paginate`] and the
/// batched driver so both produce byte-identical section lists.
pub(crate) struct ParagraphPacker<'a> {
    text: &'a str,
    capacity: &'a Capacity,
    tuning: PaginationTuning,
    threshold: f32,
    sections: Vec<Section>,
    current: Option<Accumulated>,
}

impl<'a> ParagraphPacker<'a> {
    pub(crate) fn new(text: &'a str, capacity: &'a Capacity, tuning: &PaginationTuning) -> Self {
        Self {
            text,
            capacity,
            tuning: *tuning,
            threshold: capacity.available_height * tuning.fill_threshold,
            sections: Vec::new(),
            current: None,
        }
    }

    pub(crate) fn push_paragraph(&mut self, (start, end): (usize, usize)) {
        let text = self.text;
        let paragraph = &text[start..end];
        let height = estimate_height(paragraph, self.capacity, &self.tuning);

        if height > self.threshold {
            // The paragraph alone overflows a screen: flush whatever is
            // pending and emit the paragraph as sentence/word chunks.
            self.flush();
            for (rel_start, rel_end) in split_long_spans(paragraph, self.capacity.max_chars) {
                let chunk_start = start + rel_start;
                let chunk_end = start + rel_end;
                let chunk_height =
                    estimate_height(&text[chunk_start..chunk_end], self.capacity, &self.tuning);
                self.emit(chunk_start, chunk_end, chunk_height);
            }
            return;
        }

        if let Some(acc) = self.current.as_mut() {
            let joined = acc.height + self.tuning.paragraph_margin_px + height;
            if joined <= self.threshold {
                acc.end = end;
                acc.height = joined;
                return;
            }
            self.flush();
        }
        self.current = Some(Accumulated { start, end, height });
    }

    pub(crate) fn finish(mut self) -> Vec<Section> {
        self.flush();
        self.sections
    }

    pub(crate) fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn flush(&mut self) {
        if let Some(acc) = self.current.take() {
            self.emit(acc.start, acc.end, acc.height);
        }
    }

    fn emit(&mut self, start: usize, end: usize, estimated_height: f32) {
        let index = self.sections.len();
        self.sections.push(Section {
            content: self.text[start..end].to_string(),
            index,
            start,
            end,
            estimated_height,
        });
    }
}

/// Split an oversized paragraph into chunks no longer than `max_chars`
/// bytes, preferring sentence boundaries and falling back to words.
///
/// Never drops text and never cuts inside a word; a single word longer than
/// `max_chars` occupies its own (overlong) chunk.
pub fn split_long(paragraph: &str, max_chars: usize) -> Vec<String> {
    split_long_spans(paragraph, max_chars)
        .into_iter()
        .map(|(start, end)| paragraph[start..end].to_string())
        .collect()
}

/// Span-based core of [`split_long`]; offsets are relative to `paragraph`.
fn split_long_spans(paragraph: &str, max_chars: usize) -> Vec<(usize, usize)> {
    if paragraph.len() <= max_chars {
        return vec![(0, paragraph.len())];
    }

    let sentences = sentence_spans(paragraph);
    let coarse = pack_spans(&sentences, max_chars);

    let mut chunks = Vec::new();
    for (start, end) in coarse {
        if end - start <= max_chars {
            chunks.push((start, end));
            continue;
        }
        // A run-on sentence: re-split this chunk on whitespace.
        let words: Vec<(usize, usize)> = word_spans(&paragraph[start..end])
            .into_iter()
            .map(|(s, e)| (start + s, start + e))
            .collect();
        chunks.extend(pack_spans(&words, max_chars));
    }

    if chunks.is_empty() {
        vec![(0, paragraph.len())]
    } else {
        chunks
    }
}

/// Greedily pack ordered spans into chunks of at most `max_chars` bytes,
/// measured from the first span's start to the last span's end.
fn pack_spans(spans: &[(usize, usize)], max_chars: usize) -> Vec<(usize, usize)> {
    let mut chunks = Vec::new();
    let mut current: Option<(usize, usize)> = None;

    for &(start, end) in spans {
        match current {
            Some((chunk_start, chunk_end)) if end - chunk_start > max_chars => {
                chunks.push((chunk_start, chunk_end));
                current = Some((start, end));
            }
            Some((chunk_start, _)) => {
                current = Some((chunk_start, end));
            }
            None => {
                current = Some((start, end));
            }
        }
    }

    if let Some(chunk) = current {
        chunks.push(chunk);
    }
    chunks
}

/// Sentence spans: a sentence ends at `.`, `!` or `?` followed by
/// whitespace (or end of text). Trimmed to non-whitespace extent.
fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            let at_boundary = match chars.peek() {
                Some((_, next)) => next.is_whitespace(),
                None => true,
            };
            if at_boundary {
                let end = idx + ch.len_utf8();
                push_trimmed(text, start, end, &mut spans);
                start = end;
            }
        }
    }
    push_trimmed(text, start, text.len(), &mut spans);
    spans
}

/// Whitespace-delimited word spans.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                spans.push((s, idx));
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::{Chrome, FontMetrics, Viewport, estimate};
    use crate::normalizer::normalize;

    fn capacity() -> Capacity {
        let config = AppConfig::default();
        estimate(
            Viewport {
                width: 1280.0,
                height: 800.0,
            },
            FontMetrics::from_config(&config),
            Chrome::from_config(&config),
            &config,
        )
    }

    fn sample_document() -> String {
        let mut paragraphs = Vec::new();
        for i in 0..30 {
            paragraphs.push(format!(
                "Paragraph {i} holds a couple of sentences. Each one is long \
                 enough to take a few lines on screen at a comfortable size."
            ));
        }
        normalize(&paragraphs.join("\n\n"))
    }

    #[test]
    fn empty_text_yields_no_sections() {
        let cap = capacity();
        assert!(paginate("", &cap, &PaginationTuning::default()).is_empty());
        assert!(paginate("  \n\n  ", &cap, &PaginationTuning::default()).is_empty());
    }

    #[test]
    fn deterministic() {
        let doc = sample_document();
        let cap = capacity();
        let tuning = PaginationTuning::default();
        assert_eq!(paginate(&doc, &cap, &tuning), paginate(&doc, &cap, &tuning));
    }

    #[test]
    fn offsets_are_monotonic_and_dense() {
        let doc = sample_document();
        let cap = capacity();
        let sections = paginate(&doc, &cap, &PaginationTuning::default());
        assert!(!sections.is_empty());
        for (i, section) in sections.iter().enumerate() {
            assert_eq!(section.index, i);
            assert!(section.start < section.end, "empty span at {i}");
            if let Some(next) = sections.get(i + 1) {
                assert!(section.end <= next.start, "overlap at {i}");
            }
        }
    }

    #[test]
    fn sections_cover_the_document_modulo_boundary_whitespace() {
        let doc = sample_document();
        let cap = capacity();
        let sections = paginate(&doc, &cap, &PaginationTuning::default());

        // Content is exactly the document slice for the recorded range.
        for section in &sections {
            assert_eq!(section.content, &doc[section.start..section.end]);
        }

        // Gaps between consecutive ranges contain only whitespace.
        let mut cursor = 0;
        for section in &sections {
            assert!(
                doc[cursor..section.start].trim().is_empty(),
                "dropped text before section {}",
                section.index
            );
            cursor = section.end;
        }
        assert!(doc[cursor..].trim().is_empty());
    }

    #[test]
    fn oversized_paragraph_is_split_into_bounded_chunks() {
        let cap = capacity();
        let long = format!("Hello world. {}", "word ".repeat(500));
        let doc = normalize(&long);
        let sections = paginate(&doc, &cap, &PaginationTuning::default());
        assert!(sections.len() > 1);
        for section in &sections {
            assert!(
                section.content.len() <= cap.max_chars,
                "chunk of {} exceeds {}",
                section.content.len(),
                cap.max_chars
            );
        }
        assert!(sections[0].content.starts_with("Hello world."));
    }

    #[test]
    fn split_long_respects_the_bound() {
        let paragraph = format!("Hello world. {}", "word ".repeat(500));
        let chunks = split_long(paragraph.trim(), 100);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 100, "{} > 100", chunk.len());
        }
        assert!(chunks[0].starts_with("Hello world."));
    }

    #[test]
    fn split_long_returns_short_input_whole() {
        assert_eq!(split_long("short paragraph", 100), vec!["short paragraph"]);
    }

    #[test]
    fn split_long_never_drops_words() {
        let paragraph = format!("One. {}", "alpha beta gamma ".repeat(40)).trim().to_string();
        let original_words: Vec<&str> = paragraph.split_whitespace().collect();
        let chunk_words: Vec<String> = split_long(&paragraph, 60)
            .iter()
            .flat_map(|c| c.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .collect();
        assert_eq!(original_words.len(), chunk_words.len());
        for (a, b) in original_words.iter().zip(chunk_words.iter()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn single_overlong_word_gets_its_own_chunk() {
        let word = "x".repeat(300);
        let paragraph = format!("short start. {word} short end.");
        let chunks = split_long(&paragraph, 100);
        assert!(chunks.iter().any(|c| c.contains(&word)));
        for chunk in &chunks {
            assert!(
                chunk.len() <= 100 || chunk.contains(&word),
                "oversized chunk without the overlong word"
            );
        }
    }

    #[test]
    fn short_document_becomes_one_section() {
        let cap = capacity();
        let doc = "A single short paragraph.";
        let sections = paginate(doc, &cap, &PaginationTuning::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, doc);
        assert_eq!(sections[0].start, 0);
        assert_eq!(sections[0].end, doc.len());
    }

    #[test]
    fn height_estimate_scales_with_length() {
        let cap = capacity();
        let tuning = PaginationTuning::default();
        let short = estimate_height("one line", &cap, &tuning);
        let long = estimate_height(&"many words here ".repeat(40), &cap, &tuning);
        assert!(long > short);
        let two_paragraphs = estimate_height("a\n\nb", &cap, &tuning);
        assert!((two_paragraphs - (2.0 * cap.line_height_px + tuning.paragraph_margin_px)).abs() < 0.01);
    }
}
