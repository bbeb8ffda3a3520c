//! Bionic formatting: bolding a length-dependent prefix of each word.
//!
//! The transform only ever touches ASCII-alphabetic runs. Digits,
//! punctuation, and whitespace are copied through verbatim so the output is
//! the input with `<span>`/`<strong>` markers spliced in, nothing more.

use crate::config::AppConfig;

/// Length-tier policy for how many leading characters get bolded.
///
/// Observed variants of this transform disagree on the exact boundaries
/// (medium tier ending at 5 vs 6, long-word ratio 0.4 vs 0.5); the values
/// here are configuration, and the defaults follow one canonical variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BionicTiering {
    /// Words up to this length bold a single character.
    pub short_max: usize,
    /// Words up to this length bold two characters.
    pub medium_max: usize,
    /// Fraction of a longer word to bold.
    pub bold_ratio: f32,
    /// Floor on the bold prefix for longer words.
    pub min_long_bold: usize,
}

impl Default for BionicTiering {
    fn default() -> Self {
        Self {
            short_max: 3,
            medium_max: 5,
            bold_ratio: 0.4,
            min_long_bold: 3,
        }
    }
}

impl BionicTiering {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            short_max: config.bionic_short_max,
            medium_max: config.bionic_medium_max,
            bold_ratio: config.bionic_bold_ratio,
            min_long_bold: config.bionic_min_long_bold,
        }
    }

    /// How many leading characters of a word of `len` characters to bold.
    fn bold_len(&self, len: usize) -> usize {
        if len <= 1 {
            0
        } else if len <= self.short_max {
            1
        } else if len <= self.medium_max {
            2
        } else {
            let scaled = (len as f32 * self.bold_ratio).ceil() as usize;
            scaled.max(self.min_long_bold)
        }
    }
}

/// Wrap one word in bionic markup. Non-alphabetic or single-character input
/// is returned unchanged.
pub fn format_word(word: &str, tiering: &BionicTiering) -> String {
    if !word.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return word.to_string();
    }
    let bold = tiering.bold_len(word.len());
    if bold == 0 {
        return word.to_string();
    }
    let (prefix, suffix) = word.split_at(bold);
    format!("<span class=\"bionic-word\"><strong>{prefix}</strong>{suffix}</span>")
}

/// Apply [`format_word`] to every ASCII-alphabetic run in `text`, copying
/// everything else (whitespace, punctuation, digits) through verbatim.
pub fn format_block(text: &str, tiering: &BionicTiering) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 2);
    let mut rest = text;

    while !rest.is_empty() {
        let run_end = rest
            .find(|ch: char| !ch.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        if run_end > 0 {
            out.push_str(&format_word(&rest[..run_end], tiering));
            rest = &rest[run_end..];
            continue;
        }
        let other_end = rest
            .find(|ch: char| ch.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        out.push_str(&rest[..other_end]);
        rest = &rest[other_end..];
    }

    out
}
