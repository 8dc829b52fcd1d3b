use crate::ngram::NGram;

/// Keeps only the n-grams that can help spell one target.
///
/// An n-gram passes when:
/// - its initials occur contiguously inside the target
/// - its text does not give the target word away
/// - its text carries no link, if `exclude_urls` is set
#[derive(Clone, Debug)]
pub struct TargetFilter {
	target: String,
	exclude_urls: bool,
}

impl TargetFilter {
	pub fn new(target: &str, exclude_urls: bool) -> Self {
		Self { target: target.trim().to_lowercase(), exclude_urls }
	}

	pub fn target(&self) -> &str {
		&self.target
	}

	pub fn accepts(&self, ngram: &NGram) -> bool {
		self.target.contains(ngram.initials())
			&& !ngram.text().contains(&self.target)
			&& !(self.exclude_urls && ngram.text().contains("http"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ngram(text: &str) -> NGram {
		NGram::parse(text, 5).unwrap()
	}

	#[test]
	fn keeps_substrings_of_target() {
		let filter = TargetFilter::new("Cat", true);
		assert!(filter.accepts(&ngram("close all tabs")));
		assert!(filter.accepts(&ngram("all tabs")));
		assert!(filter.accepts(&ngram("apple")));
		assert!(!filter.accepts(&ngram("tabs all")));
		assert!(!filter.accepts(&ngram("dog")));
	}

	#[test]
	fn drops_giveaways_and_links() {
		let filter = TargetFilter::new("cat", true);
		assert!(!filter.accepts(&ngram("catch a thief")));
		assert!(!TargetFilter::new("hi", true).accepts(&ngram("https://t.co")));
		let lenient = TargetFilter::new("hi", false);
		assert!(lenient.accepts(&ngram("https://t.co")));
	}
}
