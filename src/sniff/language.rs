//! Source language classification from file-suffix statistics

use crate::config::LanguageConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Suffixes that never decide the language of a spider
pub const SUFFIX_IGNORE: &[&str] = &[
    "pyc", "pyo", "lock", "md", "txt", "cfg", "ini", "json", "yml", "yaml", "toml", "log",
    "gitignore",
];

/// Source language of a spider directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Go,
    Java,
    Ruby,
    Php,
    Rust,
    Other,
}

impl Language {
    /// Maps a file suffix (with or without the dot) to its language
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match normalize_suffix(suffix).as_str() {
            "py" => Some(Self::Python),
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" => Some(Self::TypeScript),
            "go" => Some(Self::Go),
            "java" => Some(Self::Java),
            "rb" => Some(Self::Ruby),
            "php" => Some(Self::Php),
            "rs" => Some(Self::Rust),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Go => "go",
            Self::Java => "java",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::Rust => "rust",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize_suffix(suffix: &str) -> String {
    suffix.trim_start_matches('.').to_ascii_lowercase()
}

/// Picks the language of the most frequent non-ignored suffix
///
/// Ties between equally frequent suffixes are broken arbitrarily. An empty
/// map, a map of only ignored suffixes, or an unmapped winner all give
/// [`Language::Other`].
pub fn classify_language(stats: &HashMap<String, usize>, config: &LanguageConfig) -> Language {
    let extra: Vec<String> = config
        .ignore_suffixes
        .iter()
        .map(|s| normalize_suffix(s))
        .collect();

    let top = stats
        .iter()
        .map(|(suffix, count)| (normalize_suffix(suffix), *count))
        .filter(|(suffix, _)| {
            !SUFFIX_IGNORE.contains(&suffix.as_str()) && !extra.contains(suffix)
        })
        .max_by_key(|(_, count)| *count);

    match top {
        Some((suffix, count)) => {
            let language = Language::from_suffix(&suffix).unwrap_or(Language::Other);
            tracing::debug!("Top suffix '{}' ({} files) -> {}", suffix, count, language);
            language
        }
        None => Language::Other,
    }
}

/// Counts files per suffix under `dir`, recursively
///
/// Hidden files and directories (leading `.`) are skipped. Files without
/// a suffix are not counted. Suffixes are stored without the dot.
pub fn suffix_stats(dir: &Path) -> std::io::Result<HashMap<String, usize>> {
    let mut stats = HashMap::new();
    collect_suffixes(dir, &mut stats)?;
    Ok(stats)
}

fn collect_suffixes(dir: &Path, stats: &mut HashMap<String, usize>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }

        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            collect_suffixes(&path, stats)?;
        } else if file_type.is_file() {
            if let Some(ext) = path.extension() {
                *stats
                    .entry(ext.to_string_lossy().to_ascii_lowercase())
                    .or_insert(0) += 1;
            }
        }
    }
    Ok(())
}

/// Scans `dir` and classifies its language
pub fn detect_language(dir: &Path, config: &LanguageConfig) -> std::io::Result<Language> {
    let stats = suffix_stats(dir)?;
    Ok(classify_language(&stats, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn stats(entries: &[(&str, usize)]) -> HashMap<String, usize> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_highest_count_wins() {
        let config = LanguageConfig::default();
        assert_eq!(
            classify_language(&stats(&[("py", 10), ("js", 2)]), &config),
            Language::Python
        );
        assert_eq!(
            classify_language(&stats(&[(".go", 3), (".py", 1)]), &config),
            Language::Go
        );
    }

    #[test]
    fn test_ignored_suffixes_do_not_win() {
        let config = LanguageConfig::default();
        assert_eq!(
            classify_language(&stats(&[("pyc", 50), ("md", 40), ("js", 1)]), &config),
            Language::JavaScript
        );
    }

    #[test]
    fn test_configured_ignore_suffixes() {
        let config = LanguageConfig {
            ignore_suffixes: vec![".HTML".to_string()],
        };
        assert_eq!(
            classify_language(&stats(&[("html", 9), ("py", 1)]), &config),
            Language::Python
        );
    }

    #[test]
    fn test_empty_stats_is_other() {
        let config = LanguageConfig::default();
        assert_eq!(classify_language(&HashMap::new(), &config), Language::Other);
        assert_eq!(
            classify_language(&stats(&[("lock", 2), ("txt", 1)]), &config),
            Language::Other
        );
    }

    #[test]
    fn test_unmapped_winner_is_other() {
        let config = LanguageConfig::default();
        assert_eq!(
            classify_language(&stats(&[("html", 9), ("css", 3)]), &config),
            Language::Other
        );
        assert_eq!(
            classify_language(&stats(&[("html", 9), ("py", 3)]), &config),
            Language::Other
        );
    }

    #[test]
    fn test_from_suffix() {
        assert_eq!(Language::from_suffix(".PY"), Some(Language::Python));
        assert_eq!(Language::from_suffix("mjs"), Some(Language::JavaScript));
        assert_eq!(Language::from_suffix("exe"), None);
        assert_eq!(Language::Python.to_string(), "python");
    }

    #[test]
    fn test_suffix_stats_recursive() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("spiders/sub")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("main.py"), "").unwrap();
        fs::write(dir.path().join("spiders/a.py"), "").unwrap();
        fs::write(dir.path().join("spiders/sub/b.PY"), "").unwrap();
        fs::write(dir.path().join("spiders/c.js"), "").unwrap();
        fs::write(dir.path().join("Makefile"), "").unwrap();
        fs::write(dir.path().join(".git/config.js"), "").unwrap();

        let stats = suffix_stats(dir.path()).unwrap();
        assert_eq!(stats.get("py"), Some(&3));
        assert_eq!(stats.get("js"), Some(&1));
        assert_eq!(stats.len(), 2);

        let config = LanguageConfig::default();
        assert_eq!(detect_language(dir.path(), &config).unwrap(), Language::Python);
    }

    #[test]
    fn test_suffix_stats_missing_dir() {
        assert!(suffix_stats(Path::new("/nonexistent/spider")).is_err());
    }
}
