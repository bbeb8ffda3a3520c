//! Text pipeline for a bionic "speed reading" viewer.
//!
//! A document flows through the pipeline as: extracted plain text →
//! [`normalizer::normalize`] → [`pagination::paginate`] (or the cooperative
//! [`batch::paginate_batched`]) → [`processor::process`] per section. The
//! [`library`] keeps per-document metadata and the saved
//! [`position::ReadingPosition`] so a session can resume at the right
//! section even after a font or viewport change re-paginates the document.

pub mod batch;
pub mod bionic;
pub mod cancellation;
pub mod capacity;
pub mod config;
pub mod extract;
pub mod library;
pub mod normalizer;
pub mod pagination;
pub mod position;
pub mod processor;
