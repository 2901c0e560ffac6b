//! Split a display string around case-insensitive occurrences of a search term.

use regex::RegexBuilder;
use serde::Serialize;
use utoipa::ToSchema;

/// A run of text that either matched the search term or did not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: false,
        }
    }
}

/// Split `text` into alternating plain/matched segments for `term`.
///
/// The term is matched literally (regex metacharacters have no effect) and without regard to
/// case. A blank term yields the whole text as one plain segment.
pub fn highlight(text: &str, term: &str) -> Vec<Segment> {
    let term = term.trim();
    if term.is_empty() || text.is_empty() {
        return vec![Segment::plain(text)];
    }

    let pattern = match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::debug!("highlight pattern rejected: {e}");
            return vec![Segment::plain(text)];
        }
    };

    let mut segments = Vec::new();
    let mut cursor = 0;
    for found in pattern.find_iter(text) {
        if found.start() > cursor {
            segments.push(Segment::plain(&text[cursor..found.start()]));
        }
        segments.push(Segment {
            text: found.as_str().to_string(),
            matched: true,
        });
        cursor = found.end();
    }
    if cursor < text.len() {
        segments.push(Segment::plain(&text[cursor..]));
    }
    segments
}
