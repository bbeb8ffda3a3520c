pub(crate) fn default_font_size() -> u32 {
    22
}

pub(crate) fn default_line_height() -> f32 {
    1.9
}

pub(crate) fn default_avg_char_width_ratio() -> f32 {
    0.6
}

pub(crate) fn default_viewport_width() -> f32 {
    1280.0
}

pub(crate) fn default_viewport_height() -> f32 {
    800.0
}

pub(crate) fn default_top_inset() -> f32 {
    80.0
}

pub(crate) fn default_bottom_inset() -> f32 {
    80.0
}

pub(crate) fn default_horizontal_padding() -> f32 {
    64.0
}

pub(crate) fn default_max_content_width() -> f32 {
    720.0
}

pub(crate) fn default_vertical_slack() -> f32 {
    40.0
}

pub(crate) fn default_paragraph_margin_px() -> f32 {
    32.0
}

pub(crate) fn default_packing_efficiency() -> f32 {
    0.7
}

pub(crate) fn default_fill_threshold() -> f32 {
    0.8
}

pub(crate) fn default_safety_buffer() -> usize {
    1
}

pub(crate) fn default_min_lines() -> usize {
    3
}

pub(crate) fn default_min_chars_per_line() -> usize {
    50
}

pub(crate) fn default_min_chars() -> usize {
    150
}

pub(crate) fn default_bionic() -> bool {
    true
}

pub(crate) fn default_bionic_short_max() -> usize {
    3
}

pub(crate) fn default_bionic_medium_max() -> usize {
    5
}

pub(crate) fn default_bionic_bold_ratio() -> f32 {
    0.4
}

pub(crate) fn default_bionic_min_long_bold() -> usize {
    3
}

pub(crate) fn default_snippet_len() -> usize {
    100
}

pub(crate) fn default_min_file_bytes() -> u64 {
    100
}

pub(crate) fn default_max_file_bytes() -> u64 {
    50 * 1024 * 1024
}

pub(crate) fn default_batch_size() -> usize {
    64
}

pub(crate) fn default_cache_dir() -> String {
    ".cache".to_string()
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}
