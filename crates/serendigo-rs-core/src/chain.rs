//! Chain-brand detection for "local only" searches.

use regex::{Regex, RegexBuilder};

/// Brands dropped by default when only local places are wanted.
pub const DEFAULT_CHAIN_BRANDS: &[&str] = &[
    "スターバックス",
    "Starbucks",
    "マクドナルド",
    "McDonald's",
    "ドトール",
    "タリーズ",
    "コメダ",
    "ケンタッキー",
    "モスバーガー",
    "吉野家",
    "すき家",
    "松屋",
    "サイゼリヤ",
    "ガスト",
    "セブンイレブン",
    "ファミリーマート",
    "ローソン",
];

/// Substring matcher over a fixed brand list (ASCII case-insensitive).
#[derive(Debug, Clone)]
pub struct ChainFilter {
    pattern: Option<Regex>,
}

impl ChainFilter {
    /// Build a filter from brand names. Names are matched literally.
    pub fn new<I, S>(brands: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = brands
            .into_iter()
            .map(|brand| brand.as_ref().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .map(|brand| regex::escape(&brand))
            .collect();
        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }
        let pattern = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .unicode(true)
            .build()?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Filter over [`DEFAULT_CHAIN_BRANDS`].
    pub fn with_default_brands() -> Result<Self, regex::Error> {
        Self::new(DEFAULT_CHAIN_BRANDS)
    }

    pub fn is_chain_brand(&self, name: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_default_brands_as_substrings() {
        let filter = ChainFilter::with_default_brands().expect("filter");
        assert!(filter.is_chain_brand("スターバックス コーヒー 丸の内店"));
        assert!(filter.is_chain_brand("STARBUCKS Reserve"));
        assert!(filter.is_chain_brand("McDonald's Tokyo Station"));
        assert!(filter.is_chain_brand("ローソン 八重洲店"));
        assert!(!filter.is_chain_brand("地元カフェ"));
        assert!(!filter.is_chain_brand("喫茶 まつや"));
    }

    #[test]
    fn brand_names_are_literal() {
        let filter = ChainFilter::new(["A.B (c)"]).expect("filter");
        assert!(filter.is_chain_brand("shop A.B (c) west"));
        assert!(!filter.is_chain_brand("AxB c"));
    }

    #[test]
    fn empty_list_matches_nothing() {
        let filter = ChainFilter::new(Vec::<String>::new()).expect("filter");
        assert!(!filter.is_chain_brand("Starbucks"));
        let blank = ChainFilter::new(["  "]).expect("filter");
        assert!(!blank.is_chain_brand("anything"));
    }
}
