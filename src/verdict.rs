// Suspicion decision from the two keyword counts
use crate::scorer::{score, KeywordSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub suspicious: bool,
    pub flat_count: usize,
    pub layer_count: usize,
}

impl Verdict {
    /// Layered content mentioning banking terms more often than the rendered
    /// page is the overlay pattern. Ties are not suspicious.
    pub fn from_counts(flat_count: usize, layer_count: usize) -> Self {
        Self {
            suspicious: layer_count > flat_count,
            flat_count,
            layer_count,
        }
    }
}

pub fn decide(flat_text: &str, layer_text: &str, keywords: &KeywordSet) -> Verdict {
    let flat_count = score(&flat_text.to_lowercase(), keywords);
    let layer_count = score(&layer_text.to_lowercase(), keywords);
    Verdict::from_counts(flat_count, layer_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_banking_terms_are_suspicious() {
        let verdict = decide("Invoice #123", "IBAN GB00 1234", &KeywordSet::banking());
        assert_eq!(verdict, Verdict { suspicious: true, flat_count: 0, layer_count: 1 });
    }

    #[test]
    fn test_tie_is_not_suspicious() {
        let text = "Please pay via SWIFT";
        let verdict = decide(text, text, &KeywordSet::banking());
        assert!(!verdict.suspicious);
        assert_eq!((verdict.flat_count, verdict.layer_count), (1, 1));
    }

    #[test]
    fn test_more_visible_terms_is_not_suspicious() {
        let verdict = decide("swift iban", "swift", &KeywordSet::banking());
        assert_eq!(verdict, Verdict { suspicious: false, flat_count: 2, layer_count: 1 });
    }

    #[test]
    fn test_from_counts_is_strict() {
        for flat in 0..4 {
            for layer in 0..4 {
                assert_eq!(Verdict::from_counts(flat, layer).suspicious, layer > flat);
            }
        }
    }
}
