//! URL pattern expansion
//!
//! A URL pattern is a template containing placeholders:
//!
//! - `{min,max}`: every integer from `min` to `max`, inclusive (none when
//!   `min > max`, which empties the whole expansion)
//! - `[a,b,c]`: each listed literal (tokens made of word characters and `-`)
//!
//! Placeholders are keyed in declaration order: numeric ranges first as
//! `n0, n1, ...` in the order they appear, then string sets as `s0, s1, ...`.
//! Expansion walks the Cartesian product of all value lists in that key
//! order with the last key varying fastest.
//!
//! # Example
//!
//! ```
//! use crawlkit::pattern::UrlPattern;
//!
//! let pattern = UrlPattern::parse("http://x.com/[a,b]-{0,1}.html").unwrap();
//! let urls: Vec<String> = pattern.urls().collect();
//! assert_eq!(
//!     urls,
//!     vec![
//!         "http://x.com/a-0.html",
//!         "http://x.com/b-0.html",
//!         "http://x.com/a-1.html",
//!         "http://x.com/b-1.html",
//!     ]
//! );
//! ```
//!
//! The number of URLs is the product of all value-list lengths. Nothing here
//! caps it; check [`UrlPattern::len`] before consuming a pattern eagerly.

mod placeholder;

pub use placeholder::Placeholder;

use crate::PatternError;
use placeholder::{scan_numeric, scan_string_sets};

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// Index into `UrlPattern::placeholders`
    Key(usize),
}

/// A parsed URL template
#[derive(Debug, Clone)]
pub struct UrlPattern {
    template: String,
    segments: Vec<Segment>,
    placeholders: Vec<(String, Placeholder)>,
}

impl UrlPattern {
    /// Parses a template, failing on malformed numeric ranges
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        let numeric = scan_numeric(template)?;
        let string_sets = scan_string_sets(template);

        let mut placeholders = Vec::with_capacity(numeric.len() + string_sets.len());
        let mut spans = Vec::with_capacity(numeric.len() + string_sets.len());

        for (i, slot) in numeric.into_iter().enumerate() {
            spans.push((slot.span, placeholders.len()));
            placeholders.push((format!("n{}", i), slot.placeholder));
        }
        for (j, slot) in string_sets.into_iter().enumerate() {
            spans.push((slot.span, placeholders.len()));
            placeholders.push((format!("s{}", j), slot.placeholder));
        }

        // Both scanners are anchored on distinct delimiters, so spans never overlap
        spans.sort_by_key(|(span, _)| span.start);

        let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0;
        for (span, key) in spans {
            if span.start > cursor {
                segments.push(Segment::Literal(template[cursor..span.start].to_string()));
            }
            segments.push(Segment::Key(key));
            cursor = span.end;
        }
        if cursor < template.len() {
            segments.push(Segment::Literal(template[cursor..].to_string()));
        }

        tracing::debug!(
            "Parsed URL pattern {} with {} placeholders",
            template,
            placeholders.len()
        );

        Ok(Self {
            template: template.to_string(),
            segments,
            placeholders,
        })
    }

    /// The template as written
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholders in key order, with their keys
    pub fn placeholders(&self) -> impl Iterator<Item = (&str, &Placeholder)> {
        self.placeholders.iter().map(|(key, p)| (key.as_str(), p))
    }

    /// The template with each placeholder replaced by its `{key}` token
    pub fn normalized(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Key(idx) => format!("{{{}}}", self.placeholders[*idx].0),
            })
            .collect()
    }

    /// Number of URLs the pattern expands to, `None` if it overflows `u64`
    pub fn len(&self) -> Option<u64> {
        self.placeholders
            .iter()
            .try_fold(1u128, |acc, (_, p)| acc.checked_mul(p.len()))
            .and_then(|n| u64::try_from(n).ok())
    }

    /// True when some placeholder has no values, e.g. a reversed range
    pub fn is_empty(&self) -> bool {
        self.is_exhausted()
    }

    /// A fresh lazy iterator over every concrete URL
    pub fn urls(&self) -> Urls<'_> {
        Urls {
            pattern: self,
            odometer: vec![0; self.placeholders.len()],
            done: self.is_exhausted(),
        }
    }

    fn is_exhausted(&self) -> bool {
        self.placeholders.iter().any(|(_, p)| p.is_empty())
    }

    /// Steps the odometer, last placeholder fastest; false once it wraps around
    fn advance(&self, odometer: &mut [u128]) -> bool {
        for idx in (0..odometer.len()).rev() {
            odometer[idx] += 1;
            if odometer[idx] < self.placeholders[idx].1.len() {
                return true;
            }
            odometer[idx] = 0;
        }
        false
    }

    fn render(&self, odometer: &[u128]) -> String {
        let mut url = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => url.push_str(text),
                Segment::Key(idx) => {
                    url.push_str(&self.placeholders[*idx].1.value_at(odometer[*idx]))
                }
            }
        }
        url
    }
}

/// Lazy iterator over the URLs of a [`UrlPattern`]
#[derive(Debug, Clone)]
pub struct Urls<'a> {
    pattern: &'a UrlPattern,
    odometer: Vec<u128>,
    done: bool,
}

impl Iterator for Urls<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        let url = self.pattern.render(&self.odometer);
        self.done = !self.pattern.advance(&mut self.odometer);
        Some(url)
    }
}

/// Owning variant of [`Urls`], returned by [`expand_urls`]
#[derive(Debug, Clone)]
pub struct IntoUrls {
    pattern: UrlPattern,
    odometer: Vec<u128>,
    done: bool,
}

impl Iterator for IntoUrls {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        let url = self.pattern.render(&self.odometer);
        self.done = !self.pattern.advance(&mut self.odometer);
        Some(url)
    }
}

impl IntoIterator for UrlPattern {
    type Item = String;
    type IntoIter = IntoUrls;

    fn into_iter(self) -> IntoUrls {
        let odometer = vec![0; self.placeholders.len()];
        let done = self.is_exhausted();
        IntoUrls {
            pattern: self,
            odometer,
            done,
        }
    }
}

/// Expands a template into its lazy URL sequence
///
/// Calling this again restarts the sequence from the beginning.
pub fn expand_urls(template: &str) -> Result<IntoUrls, PatternError> {
    Ok(UrlPattern::parse(template)?.into_iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(template: &str) -> Vec<String> {
        UrlPattern::parse(template).unwrap().urls().collect()
    }

    #[test]
    fn test_no_placeholders_yields_template() {
        for template in ["http://x.com/", "http://x.com/{id}", "http://x.com/a?b=[c d]", ""] {
            assert_eq!(expand(template), vec![template.to_string()]);
        }
    }

    #[test]
    fn test_numeric_range_inclusive() {
        assert_eq!(
            expand("http://x.com/page-{1,3}.html"),
            vec![
                "http://x.com/page-1.html",
                "http://x.com/page-2.html",
                "http://x.com/page-3.html",
            ]
        );
    }

    #[test]
    fn test_single_value_range() {
        assert_eq!(expand("http://x.com/{7,7}"), vec!["http://x.com/7"]);
    }

    #[test]
    fn test_numeric_before_string_set_order() {
        assert_eq!(
            expand("http://x.com/[a,b]-{0,1}.html"),
            vec![
                "http://x.com/a-0.html",
                "http://x.com/b-0.html",
                "http://x.com/a-1.html",
                "http://x.com/b-1.html",
            ]
        );
    }

    #[test]
    fn test_two_ranges_last_varies_fastest() {
        assert_eq!(
            expand("/{1,2}/{5,6}"),
            vec!["/1/5", "/1/6", "/2/5", "/2/6"]
        );
    }

    #[test]
    fn test_repeated_identical_placeholder_is_independent() {
        assert_eq!(
            expand("/{0,1}/{0,1}"),
            vec!["/0/0", "/0/1", "/1/0", "/1/1"]
        );
        assert_eq!(expand("/[x,y]/[x,y]"), vec!["/x/x", "/x/y", "/y/x", "/y/y"]);
    }

    #[test]
    fn test_malformed_numeric_placeholder() {
        let err = UrlPattern::parse("http://x.com/{a,3}").unwrap_err();
        assert!(matches!(err, PatternError::InvalidBound { .. }));
        assert!(expand_urls("http://x.com/{a,3}").is_err());
    }

    #[test]
    fn test_normalized_template() {
        let pattern = UrlPattern::parse("http://x.com/[a,b]/{1,2}/[c,d]/{3,4}").unwrap();
        assert_eq!(pattern.normalized(), "http://x.com/{s0}/{n0}/{s1}/{n1}");

        let keys: Vec<&str> = pattern.placeholders().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["n0", "n1", "s0", "s1"]);
    }

    #[test]
    fn test_len_is_product() {
        let pattern = UrlPattern::parse("/{1,10}/[a,b,c]").unwrap();
        assert_eq!(pattern.len(), Some(30));
        assert_eq!(pattern.urls().count(), 30);
        assert!(!pattern.is_empty());
    }

    #[test]
    fn test_reversed_range_expands_to_nothing() {
        let pattern = UrlPattern::parse("http://x.com/page-{5,3}.html").unwrap();
        assert_eq!(pattern.len(), Some(0));
        assert!(pattern.is_empty());
        assert_eq!(pattern.urls().count(), 0);
        assert_eq!(expand_urls("/{5,3}/[a,b]").unwrap().count(), 0);
    }

    #[test]
    fn test_full_u64_range_reaches_last_value() {
        let pattern = UrlPattern::parse("/{18446744073709551614,18446744073709551615}").unwrap();
        assert_eq!(pattern.len(), Some(2));
        assert_eq!(
            expand("/{18446744073709551614,18446744073709551615}"),
            vec!["/18446744073709551614", "/18446744073709551615"]
        );

        let full = UrlPattern::parse("/{0,18446744073709551615}").unwrap();
        assert_eq!(full.len(), None);
        assert!(!full.is_empty());
    }

    #[test]
    fn test_len_overflow() {
        let pattern =
            UrlPattern::parse("/{0,18446744073709551614}/{0,18446744073709551614}").unwrap();
        assert_eq!(pattern.len(), None);
    }

    #[test]
    fn test_huge_product_is_lazy() {
        let pattern = UrlPattern::parse("/{0,1000000}/{0,1000000}/{0,1000000}").unwrap();
        let first: Vec<String> = pattern.urls().take(2).collect();
        assert_eq!(first, vec!["/0/0/0", "/0/0/1"]);
    }

    #[test]
    fn test_urls_restart() {
        let pattern = UrlPattern::parse("/{1,2}").unwrap();
        let mut urls = pattern.urls();
        assert_eq!(urls.next().as_deref(), Some("/1"));

        let again: Vec<String> = pattern.urls().collect();
        assert_eq!(again, vec!["/1", "/2"]);
    }

    #[test]
    fn test_expand_urls_matches_pattern() {
        let template = "http://x.com/[news,tech]/page-{1,2}";
        let from_fn: Vec<String> = expand_urls(template).unwrap().collect();
        assert_eq!(from_fn, expand(template));
    }
}
