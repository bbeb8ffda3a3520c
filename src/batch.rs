//! Cooperative batched pagination.
//!
//! Paginating a large document in one synchronous call can be perceptibly
//! slow inside an event loop, so this driver feeds the same paragraph
//! packer the one-shot paginator uses in fixed-size batches, yielding a
//! progress event between batches and checking for supersession. A second
//! rapid resize cancels the in-flight run via its token; a cancelled run
//! returns an error and its partial results are dropped, never merged.
//!
//! Batching is a performance accommodation only: the resulting section list
//! is byte-identical to `pagination::paginate` on the same input.

use crate::cancellation::CancellationToken;
use crate::capacity::Capacity;
use crate::pagination::{PaginationTuning, ParagraphPacker, Section, paragraph_spans};
use anyhow::Result;
use tracing::debug;

/// Emitted after each completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub paragraphs_done: usize,
    pub paragraphs_total: usize,
    pub sections_so_far: usize,
}

/// Paginate `text` in batches of `batch_size` paragraphs.
///
/// `on_progress` runs between batches; the caller yields control to its
/// event loop there. Returns an error without any sections if `token` is
/// cancelled before the run completes.
pub fn paginate_batched(
    text: &str,
    capacity: &Capacity,
    tuning: &PaginationTuning,
    batch_size: usize,
    token: &CancellationToken,
    mut on_progress: impl FnMut(BatchProgress),
) -> Result<Vec<Section>> {
    let spans = paragraph_spans(text);
    let total = spans.len();
    let batch_size = batch_size.max(1);
    let mut packer = ParagraphPacker::new(text, capacity, tuning);
    let mut done = 0usize;

    for batch in spans.chunks(batch_size) {
        token.check_cancelled("paginate")?;
        for &span in batch {
            packer.push_paragraph(span);
        }
        done += batch.len();
        on_progress(BatchProgress {
            paragraphs_done: done,
            paragraphs_total: total,
            sections_so_far: packer.section_count(),
        });
    }

    token.check_cancelled("paginate-finish")?;
    let sections = packer.finish();
    debug!(
        paragraphs = total,
        sections = sections.len(),
        "Batched pagination complete"
    );
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::{Chrome, FontMetrics, Viewport, estimate};
    use crate::config::AppConfig;
    use crate::normalizer::normalize;
    use crate::pagination::paginate;

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

    fn document() -> String {
        let paragraphs: Vec<String> = (0..100)
            .map(|i| format!("Paragraph {i} has enough words to occupy several rendered lines on a typical screen."))
            .collect();
        normalize(&paragraphs.join("\n\n"))
    }

    #[test]
    fn batched_output_equals_one_shot_output() {
        let doc = document();
        let cap = capacity();
        let tuning = PaginationTuning::default();
        for batch_size in [1, 7, 64, 10_000] {
            let batched = paginate_batched(
                &doc,
                &cap,
                &tuning,
                batch_size,
                &CancellationToken::new(),
                |_| {},
            )
            .unwrap();
            assert_eq!(batched, paginate(&doc, &cap, &tuning), "batch_size={batch_size}");
        }
    }

    #[test]
    fn progress_is_monotonic_and_complete() {
        let doc = document();
        let cap = capacity();
        let mut events = Vec::new();
        paginate_batched(
            &doc,
            &cap,
            &PaginationTuning::default(),
            16,
            &CancellationToken::new(),
            |p| events.push(p),
        )
        .unwrap();

        assert!(!events.is_empty());
        let total = events[0].paragraphs_total;
        assert_eq!(total, 100);
        for pair in events.windows(2) {
            assert!(pair[0].paragraphs_done < pair[1].paragraphs_done);
            assert!(pair[0].sections_so_far <= pair[1].sections_so_far);
        }
        assert_eq!(events.last().unwrap().paragraphs_done, total);
    }

    #[test]
    fn superseded_run_is_discarded() {
        let doc = document();
        let cap = capacity();
        let token = CancellationToken::new();
        token.cancel();
        let result = paginate_batched(
            &doc,
            &cap,
            &PaginationTuning::default(),
            16,
            &token,
            |_| panic!("cancelled run must not report progress"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn cancel_mid_run_stops_before_the_next_batch() {
        let doc = document();
        let cap = capacity();
        let token = CancellationToken::new();
        let cancel_after = 2;
        let mut batches_seen = 0usize;
        let result = paginate_batched(&doc, &cap, &PaginationTuning::default(), 16, &token, |_| {
            batches_seen += 1;
            if batches_seen == cancel_after {
                token.cancel();
            }
        });
        assert!(result.is_err());
        assert_eq!(batches_seen, cancel_after);
    }

    #[test]
    fn empty_document_completes_without_progress() {
        let cap = capacity();
        let mut events = 0usize;
        let sections = paginate_batched(
            "",
            &cap,
            &PaginationTuning::default(),
            16,
            &CancellationToken::new(),
            |_| events += 1,
        )
        .unwrap();
        assert!(sections.is_empty());
        assert_eq!(events, 0);
    }
}
