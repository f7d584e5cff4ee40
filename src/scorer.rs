// Banking keyword frequency scoring
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{Result, XposeError};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

pub const DEFAULT_KEYWORDS: [&str; 4] = ["swift", "iban", "bic", "rtgs"];

/// Non-empty set of lowercase, whitespace-free keywords, matched
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Build a set from arbitrary terms. Terms go through [`normalize`] like
    /// the text they are matched against, so "Sort code" becomes "sortcode".
    /// Duplicates and blank terms are dropped.
    pub fn new<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: Vec<String> = Vec::new();
        for term in terms {
            let keyword = normalize(term.as_ref());
            if !keyword.is_empty() && !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }

        if keywords.is_empty() {
            return Err(XposeError::EmptyKeywordSet);
        }
        Ok(Self { keywords })
    }

    pub fn banking() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

}

/// Strip every whitespace run and lowercase what is left.
pub fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text, "").to_lowercase()
}

/// Count keyword occurrences in `text`.
///
/// Whitespace is removed before matching, so a term split across lines or
/// glued to its neighbours still counts. Matches are literal substrings and
/// non-overlapping per keyword; the per-keyword counts are summed.
pub fn score(text: &str, keywords: &KeywordSet) -> usize {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return 0;
    }

    keywords
        .iter()
        .map(|keyword| normalized.matches(keyword).count())
        .sum()
}
