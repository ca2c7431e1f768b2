//! Crawler framework detection from marker files

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A crawler framework recognised by its project marker file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Scrapy,
}

impl Framework {
    const ALL: &'static [Framework] = &[Framework::Scrapy];

    /// File whose presence at the project root marks the framework
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Scrapy => "scrapy.cfg",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scrapy => "scrapy",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks for a framework marker in the listing of `dir`
///
/// Only the top level is inspected. Any entry whose name matches a marker
/// exactly counts, whatever its file type.
/// Returns `Ok(None)` when no marker is present and an error when `dir`
/// cannot be read.
pub fn detect_framework(dir: &Path) -> std::io::Result<Option<Framework>> {
    let names = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<Vec<_>>>()?;

    let found = Framework::ALL
        .iter()
        .find(|framework| names.iter().any(|name| name.as_os_str() == framework.marker()))
        .copied();

    if let Some(framework) = found {
        tracing::debug!("Found {} in {}", framework.marker(), dir.display());
    }
    Ok(found)
}
