//! Matching against callout snippets identified outside the pipeline.
use serde::Deserialize;

/// Fuzzy matcher for externally identified callouts.
///
/// A paragraph matches a snippet when one of their lowercased openings is a
/// prefix of the other, or when a snippet opening longer than
/// `min_overlap_chars` occurs anywhere in the paragraph.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalloutMatcher {
    snippets: Vec<String>,
    /// Number of leading characters compared on both sides.
    pub prefix_chars: usize,
    /// Snippet openings longer than this may match as a substring.
    pub min_overlap_chars: usize,
}

impl Default for CalloutMatcher {
    fn default() -> Self {
        Self { snippets: Vec::new(), prefix_chars: 50, min_overlap_chars: 20 }
    }
}

fn opening(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect::<String>().to_lowercase().trim().to_string()
}

impl CalloutMatcher {
    pub fn new<I, S>(snippets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { snippets: snippets.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    pub fn with_thresholds(mut self, prefix_chars: usize, min_overlap_chars: usize) -> Self {
        self.prefix_chars = prefix_chars;
        self.min_overlap_chars = min_overlap_chars;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn matches(&self, text: &str) -> bool {
        if self.snippets.is_empty() {
            return false;
        }
        let text = text.trim();
        let text_start = opening(text, self.prefix_chars);
        if text_start.is_empty() {
            return false;
        }
        let text_lower = text.to_lowercase();

        self.snippets.iter().any(|snippet| {
            let snippet_start = opening(snippet.trim(), self.prefix_chars);
            if snippet_start.is_empty() {
                return false;
            }
            text_start.starts_with(&snippet_start)
                || snippet_start.starts_with(&text_start)
                || (snippet_start.chars().count() > self.min_overlap_chars
                    && text_lower.contains(&snippet_start))
        })
    }
}
