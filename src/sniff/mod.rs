//! Spider project inspection
//!
//! Classifies the source language of a spider directory from its file
//! suffixes and recognises crawler frameworks by their marker files.

mod framework;
mod language;

pub use framework::{detect_framework, Framework};
pub use language::{classify_language, detect_language, suffix_stats, Language, SUFFIX_IGNORE};
