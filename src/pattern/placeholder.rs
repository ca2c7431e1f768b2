//! Placeholder scanning for URL templates

use crate::PatternError;
use regex::Regex;
use std::ops::{Range, RangeInclusive};
use std::sync::OnceLock;

/// Values a single placeholder expands to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// `{min,max}`, inclusive on both ends
    Numeric(RangeInclusive<u64>),

    /// `[a,b,c]`, literal alternatives in written order
    StringSet(Vec<String>),
}

impl Placeholder {
    /// Number of values this placeholder produces
    ///
    /// Counted as `u128` so `{0,18446744073709551615}` is not cut short.
    /// A reversed range such as `{5,3}` produces no values.
    pub fn len(&self) -> u128 {
        match self {
            Self::Numeric(range) if range.is_empty() => 0,
            Self::Numeric(range) => u128::from(range.end() - range.start()) + 1,
            Self::StringSet(values) => values.len() as u128,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders the value at `index` (must be `< len()`)
    pub fn value_at(&self, index: u128) -> String {
        match self {
            Self::Numeric(range) => (u128::from(*range.start()) + index).to_string(),
            Self::StringSet(values) => values[index as usize].clone(),
        }
    }
}

/// A placeholder found in the template, with its byte span
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub span: Range<usize>,
    pub placeholder: Placeholder,
}

fn numeric_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^{},]*),([^{},]*)\}").expect("numeric placeholder regex"))
}

fn string_set_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([\w\-,]+)\]").expect("string set placeholder regex"))
}

/// Finds every `{min,max}` placeholder, left to right
pub(crate) fn scan_numeric(template: &str) -> Result<Vec<Slot>, PatternError> {
    let mut slots = Vec::new();

    for caps in numeric_regex().captures_iter(template) {
        let min = parse_bound(template, &caps[1])?;
        let max = parse_bound(template, &caps[2])?;

        if let Some(whole) = caps.get(0) {
            slots.push(Slot {
                span: whole.range(),
                placeholder: Placeholder::Numeric(min..=max),
            });
        }
    }

    Ok(slots)
}

/// Finds every `[a,b,c]` placeholder, left to right
pub(crate) fn scan_string_sets(template: &str) -> Vec<Slot> {
    string_set_regex()
        .captures_iter(template)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let values = caps[1].split(',').map(str::to_string).collect();
            Some(Slot {
                span: whole.range(),
                placeholder: Placeholder::StringSet(values),
            })
        })
        .collect()
}

fn parse_bound(template: &str, bound: &str) -> Result<u64, PatternError> {
    if bound.is_empty() || !bound.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PatternError::InvalidBound {
            template: template.to_string(),
            bound: bound.to_string(),
        });
    }

    bound.parse::<u64>().map_err(|_| PatternError::InvalidBound {
        template: template.to_string(),
        bound: bound.to_string(),
    })
}
