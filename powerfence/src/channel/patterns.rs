//! Sets of acceptable prompt patterns.

use regex::bytes::Regex;

/// Where a prompt alternative matched in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptMatch {
    /// Index of the alternative that matched.
    pub index: usize,

    /// Byte offset where the match starts.
    pub start: usize,

    /// Byte offset where the match ends.
    pub end: usize,
}

/// An ordered set of acceptable terminal prompt patterns.
///
/// A device family may answer with any one of several prompts (an outlet
/// strip shows `RSM>`, `IPS>`, ... depending on the model). The match result
/// carries which alternative matched.
#[derive(Debug, Clone)]
pub struct PromptSet {
    patterns: Vec<Regex>,
}

impl PromptSet {
    /// Compile a set of regex patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// A set with a single regex pattern.
    pub fn single(pattern: &str) -> Result<Self, regex::Error> {
        Self::new([pattern])
    }

    /// A set matching `text` literally.
    pub fn literal(text: &str) -> Result<Self, regex::Error> {
        Self::single(&regex::escape(text))
    }

    /// Find the earliest match of any alternative.
    ///
    /// When two alternatives match at the same offset the lower index wins.
    pub fn find(&self, data: &[u8]) -> Option<PromptMatch> {
        let mut best: Option<PromptMatch> = None;
        for (index, pattern) in self.patterns.iter().enumerate() {
            if let Some(m) = pattern.find(data) {
                if best.is_none_or(|b| m.start() < b.start) {
                    best = Some(PromptMatch {
                        index,
                        start: m.start(),
                        end: m.end(),
                    });
                }
            }
        }
        best
    }

    /// Check if any alternative matches.
    pub fn is_match(&self, data: &[u8]) -> bool {
        self.patterns.iter().any(|p| p.is_match(data))
    }

    /// The source pattern strings, in order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.as_str())
    }

    /// Source pattern of the alternative at `index`.
    pub fn pattern(&self, index: usize) -> Option<&str> {
        self.patterns.get(index).map(|p| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_matching_alternative() {
        let prompts = PromptSet::new(["RSM>", "MPC>", "IPS>"]).unwrap();
        let m = prompts.find(b"status output\r\nIPS>").unwrap();
        assert_eq!(m.index, 2);
        assert_eq!(prompts.pattern(m.index), Some("IPS>"));
    }

    #[test]
    fn test_earliest_match_wins() {
        let prompts = PromptSet::new(["MPC>", "RSM>"]).unwrap();
        let m = prompts.find(b"RSM> later MPC>").unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.start, 0);
    }

    #[test]
    fn test_tie_goes_to_lower_index() {
        let prompts = PromptSet::new(["sys", "system>"]).unwrap();
        assert_eq!(prompts.find(b"system>").unwrap().index, 0);
    }

    #[test]
    fn test_literal_escapes_brackets() {
        let prompts = PromptSet::literal("system:blade[3]>").unwrap();
        assert!(prompts.is_match(b"system:blade[3]>"));
        assert!(!prompts.is_match(b"system:blade3>"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PromptSet::new(["ok>", "(broken"]).is_err());
    }
}
