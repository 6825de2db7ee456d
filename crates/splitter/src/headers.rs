//! Heading extraction and breadcrumb tracking.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Deepest ATX heading level.
pub const MAX_LEVEL: u8 = 6;

/// Headings found in one span, keyed by level (1..=6), in order of appearance.
pub type HeadingMap = BTreeMap<u8, Vec<String>>;

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| {
        Regex::new(r"(?m)^(#{1,6})[^\S\n]+(.*)$").expect("heading pattern is valid")
    })
}

/// Extract ATX headings from `span`.
///
/// A heading is a line starting with 1-6 `#` followed by horizontal
/// whitespace and non-empty text.
pub fn extract_headings(span: &str) -> HeadingMap {
    let mut headings = HeadingMap::new();

    for caps in heading_regex().captures_iter(span) {
        let level = caps[1].len() as u8;
        let content = caps[2].trim();
        if content.is_empty() {
            continue;
        }
        headings.entry(level).or_default().push(content.to_string());
    }

    headings
}

/// Most recent headings at each level, as of some point in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breadcrumb(HeadingMap);

impl Breadcrumb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `extracted` into the breadcrumb.
    ///
    /// Levels are visited shallowest first. A level present in `extracted`
    /// replaces the recorded entry and drops every deeper level; absent
    /// levels keep their inherited value.
    pub fn merge(mut self, extracted: &HeadingMap) -> Self {
        for level in 1..=MAX_LEVEL {
            let Some(titles) = extracted.get(&level) else {
                continue;
            };
            self.0.insert(level, titles.clone());
            self.0.retain(|recorded, _| *recorded <= level);
        }
        self
    }

    /// Headings recorded at `level`.
    pub fn get(&self, level: u8) -> Option<&[String]> {
        self.0.get(&level).map(Vec::as_slice)
    }

    /// Innermost heading of each recorded level, shallowest first.
    pub fn trail(&self) -> Vec<&str> {
        self.0
            .values()
            .filter_map(|titles| titles.last().map(String::as_str))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &HeadingMap {
        &self.0
    }
}

impl From<HeadingMap> for Breadcrumb {
    fn from(map: HeadingMap) -> Self {
        Self(map)
    }
}
