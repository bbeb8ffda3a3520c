use serde::Deserialize;

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub theme: ThemeMode,
    pub font_size: u32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Average glyph width as a fraction of the font size.
    pub avg_char_width_ratio: f32,

    /// Fallback viewport used when the host does not supply one.
    pub viewport_width: f32,
    pub viewport_height: f32,

    /// Fixed chrome carved out of the viewport.
    pub top_inset: f32,
    pub bottom_inset: f32,
    pub horizontal_padding: f32,
    pub max_content_width: f32,
    /// Extra height subtracted from the reported available height.
    pub vertical_slack: f32,

    /// Estimated margin between paragraphs, in pixels.
    pub paragraph_margin_px: f32,
    /// Under-fill factor applied to the per-screen character budget.
    pub packing_efficiency: f32,
    /// Fraction of the available height a section may fill.
    pub fill_threshold: f32,
    /// Lines dropped from the estimate to leave rendering slack.
    pub safety_buffer: usize,

    /// Floors guarding degenerate viewports.
    pub min_lines: usize,
    pub min_chars_per_line: usize,
    pub min_chars: usize,

    /// Whether sections render with bionic emphasis.
    pub bionic: bool,
    pub bionic_short_max: usize,
    pub bionic_medium_max: usize,
    pub bionic_bold_ratio: f32,
    pub bionic_min_long_bold: usize,

    /// Characters of verification text stored with a reading position.
    pub snippet_len: usize,

    /// Accepted upload size bounds, in bytes.
    pub min_file_bytes: u64,
    pub max_file_bytes: u64,

    /// Paragraphs per batch for cooperative pagination.
    pub batch_size: usize,

    pub cache_dir: String,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            theme: ThemeMode::Night,
            font_size: crate::config::defaults::default_font_size(),
            line_height: crate::config::defaults::default_line_height(),
            avg_char_width_ratio: crate::config::defaults::default_avg_char_width_ratio(),
            viewport_width: crate::config::defaults::default_viewport_width(),
            viewport_height: crate::config::defaults::default_viewport_height(),
            top_inset: crate::config::defaults::default_top_inset(),
            bottom_inset: crate::config::defaults::default_bottom_inset(),
            horizontal_padding: crate::config::defaults::default_horizontal_padding(),
            max_content_width: crate::config::defaults::default_max_content_width(),
            vertical_slack: crate::config::defaults::default_vertical_slack(),
            paragraph_margin_px: crate::config::defaults::default_paragraph_margin_px(),
            packing_efficiency: crate::config::defaults::default_packing_efficiency(),
            fill_threshold: crate::config::defaults::default_fill_threshold(),
            safety_buffer: crate::config::defaults::default_safety_buffer(),
            min_lines: crate::config::defaults::default_min_lines(),
            min_chars_per_line: crate::config::defaults::default_min_chars_per_line(),
            min_chars: crate::config::defaults::default_min_chars(),
            bionic: crate::config::defaults::default_bionic(),
            bionic_short_max: crate::config::defaults::default_bionic_short_max(),
            bionic_medium_max: crate::config::defaults::default_bionic_medium_max(),
            bionic_bold_ratio: crate::config::defaults::default_bionic_bold_ratio(),
            bionic_min_long_bold: crate::config::defaults::default_bionic_min_long_bold(),
            snippet_len: crate::config::defaults::default_snippet_len(),
            min_file_bytes: crate::config::defaults::default_min_file_bytes(),
            max_file_bytes: crate::config::defaults::default_max_file_bytes(),
            batch_size: crate::config::defaults::default_batch_size(),
            cache_dir: crate::config::defaults::default_cache_dir(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

/// Theme mode, persisted as a user preference.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    Day,
    #[default]
    Night,
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ThemeMode::Day => "Day",
            ThemeMode::Night => "Night",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
