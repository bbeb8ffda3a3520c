//! Configuration loading for the reading pipeline.
//!
//! All tuning constants are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back
//! to defaults so the pipeline can always run. Values that earlier
//! iterations of this tool hardcoded per variant (packing efficiency, fill
//! threshold, bionic tier boundaries, file-size bounds) are all named
//! fields.

mod defaults;
mod io;
mod models;

pub use io::{load_config, parse_config, serialize_config};
pub use models::{AppConfig, LogLevel, ThemeMode};
