//! Source classification by URL.

use std::fmt;

/// Which extractor handles an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Kbb,
    Zillow,
    Unsupported,
}

impl SourceKind {
    /// Classify by substring, KBB first.
    pub fn classify(url: &str) -> Self {
        if url.contains("kbb.com") {
            SourceKind::Kbb
        } else if url.contains("zillow.com") {
            SourceKind::Zillow
        } else {
            SourceKind::Unsupported
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Kbb => "kbb",
            SourceKind::Zillow => "zillow",
            SourceKind::Unsupported => "unsupported",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            SourceKind::classify("https://www.kbb.com/honda/odyssey/2016/"),
            SourceKind::Kbb
        );
        assert_eq!(
            SourceKind::classify("https://www.zillow.com/homedetails/123_zpid/"),
            SourceKind::Zillow
        );
        assert_eq!(
            SourceKind::classify("https://www.redfin.com/CO/Denver/home/1"),
            SourceKind::Unsupported
        );
        assert_eq!(SourceKind::classify(""), SourceKind::Unsupported);
    }

    #[test]
    fn test_kbb_wins_when_both_present() {
        assert_eq!(
            SourceKind::classify("https://www.zillow.com/redirect?to=kbb.com"),
            SourceKind::Kbb
        );
    }
}
