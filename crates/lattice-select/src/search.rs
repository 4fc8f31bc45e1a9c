//! Search matching and label highlighting.
//!
//! The query is user input and always matched as literal text: it is escaped
//! before being compiled, so characters like `(` or `*` match themselves.
//! Matching is a case-insensitive substring search.
//!
//! # Example
//!
//! ```
//! use lattice_select::search::SearchFilter;
//!
//! let filter = SearchFilter::new("option");
//! let segments = filter.highlight("Long Long Option 3");
//! let marked: Vec<_> = segments.iter().filter(|s| s.highlighted).collect();
//! assert_eq!(marked.len(), 1);
//! assert_eq!(marked[0].text, "Option");
//! ```

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// A run of label text, marked when it matches the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The text of this run.
    pub text: String,
    /// Whether this run is an occurrence of the query.
    pub highlighted: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
        }
    }

    fn marked(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: true,
        }
    }
}

/// How a search query affects the option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Every option stays listed; matches are highlighted.
    #[default]
    HighlightOnly,
    /// Options whose label does not contain the query are omitted.
    HideNonMatching,
}

/// A compiled search query.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    query: String,
    pattern: Option<Regex>,
}

impl SearchFilter {
    /// Compile `query` for matching.
    ///
    /// A blank or whitespace-only query is inactive: nothing is highlighted
    /// and every label matches.
    pub fn new(query: &str) -> Self {
        let pattern = if query.trim().is_empty() {
            None
        } else {
            match RegexBuilder::new(&regex::escape(query))
                .case_insensitive(true)
                .build()
            {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    tracing::warn!(target: "lattice_select::search", query, error = %err, "search pattern rejected, treating query as empty");
                    None
                }
            }
        };
        Self {
            query: query.to_string(),
            pattern,
        }
    }

    /// The raw query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the query filters anything.
    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    /// Whether `label` contains the query. Always true for an inactive filter.
    pub fn matches(&self, label: &str) -> bool {
        self.pattern
            .as_ref()
            .is_none_or(|pattern| pattern.is_match(label))
    }

    /// Split `label` into plain and highlighted segments.
    ///
    /// Concatenating the segment texts yields `label` unchanged.
    pub fn highlight(&self, label: &str) -> Vec<Segment> {
        let Some(pattern) = &self.pattern else {
            return vec![Segment::plain(label)];
        };

        let mut segments = Vec::new();
        let mut cursor = 0;
        for found in pattern.find_iter(label) {
            if found.start() > cursor {
                segments.push(Segment::plain(&label[cursor..found.start()]));
            }
            segments.push(Segment::marked(found.as_str()));
            cursor = found.end();
        }
        if cursor < label.len() || segments.is_empty() {
            segments.push(Segment::plain(&label[cursor..]));
        }
        segments
    }
}

/// Highlight occurrences of `query` in `label`.
pub fn highlight(query: &str, label: &str) -> Vec<Segment> {
    SearchFilter::new(query).highlight(label)
}
