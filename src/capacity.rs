//! Viewport capacity estimation.
//!
//! The pipeline never touches a real layout engine, so everything here is a
//! character-count proxy for rendered geometry: average glyph width scales
//! with font size, line count is `ceil(chars / chars_per_line)`, and a
//! packing-efficiency factor deliberately under-fills each screen to absorb
//! line-wrap variance and paragraph spacing. The constants are tunable
//! heuristics, not measurements.

use crate::config::AppConfig;

/// Host viewport dimensions, queried at pagination time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Font parameters the estimate depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Point size of the reading font.
    pub size: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Average glyph width as a fraction of the font size.
    pub avg_char_width_ratio: f32,
}

/// Fixed UI chrome carved out of the viewport before text is laid in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chrome {
    pub top_inset: f32,
    pub bottom_inset: f32,
    pub horizontal_padding: f32,
    pub max_content_width: f32,
}

/// Character/line budget for one screen of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capacity {
    pub max_lines: usize,
    pub chars_per_line: usize,
    pub max_chars: usize,
    pub line_height_px: f32,
    pub available_height: f32,
}

impl FontMetrics {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            size: config.font_size as f32,
            line_height: config.line_height,
            avg_char_width_ratio: config.avg_char_width_ratio,
        }
    }
}

impl Chrome {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            top_inset: config.top_inset,
            bottom_inset: config.bottom_inset,
            horizontal_padding: config.horizontal_padding,
            max_content_width: config.max_content_width,
        }
    }
}

/// Estimate how much text fits in one screen.
///
/// Floors (`min_lines`, `min_chars_per_line`, `min_chars`) keep degenerate
/// viewports from producing a zero or negative budget; the safety buffer
/// drops a line to leave rendering slack.
pub fn estimate(
    viewport: Viewport,
    font: FontMetrics,
    chrome: Chrome,
    config: &AppConfig,
) -> Capacity {
    let available_height = (viewport.height - chrome.top_inset - chrome.bottom_inset).max(1.0);
    let available_width =
        (viewport.width - chrome.horizontal_padding).min(chrome.max_content_width);

    let line_height_px = font.size * font.line_height;
    let raw_lines = (available_height / line_height_px).floor() as i64
        - config.safety_buffer as i64;
    let max_lines = raw_lines.max(config.min_lines as i64) as usize;

    let char_width = font.size * font.avg_char_width_ratio;
    let raw_chars_per_line = (available_width / char_width).floor() as i64;
    let chars_per_line = raw_chars_per_line.max(config.min_chars_per_line as i64) as usize;

    let packed = (max_lines * chars_per_line) as f32 * config.packing_efficiency;
    let max_chars = (packed as usize).max(config.min_chars);

    Capacity {
        max_lines,
        chars_per_line,
        max_chars,
        line_height_px,
        available_height: (available_height - config.vertical_slack).max(1.0),
    }
}
