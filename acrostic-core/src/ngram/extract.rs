use super::token::{first_char, tokenize};
use crate::config::ExtractionMode;
use crate::error::{AcrosticError, Result};

/// Default maximum number of tokens in an n-gram.
pub const DEFAULT_MAX_LEN: usize = 5;

/// An ordered run of 1..=L cleaned tokens.
///
/// # Invariants
/// - `initials` holds exactly one character per token
/// - `text` is the tokens joined by single spaces, so splitting it on
///   whitespace gives the tokens back
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NGram {
	/// Surface form, used as the storage key.
	text: String,
	/// First character of each token, in order.
	initials: String,
	/// Number of tokens.
	len: usize,
}

impl NGram {
	/// Builds an n-gram from already-cleaned tokens.
	///
	/// # Errors
	/// Returns `Constraint` if the list is empty, longer than `max_len`,
	/// or contains an empty token or one with interior whitespace.
	pub fn new<S: AsRef<str>>(tokens: &[S], max_len: usize) -> Result<Self> {
		if tokens.is_empty() {
			return Err(AcrosticError::constraint("an n-gram needs at least one token"));
		}
		if tokens.len() > max_len {
			return Err(AcrosticError::constraint(format!(
				"{} tokens exceed the n-gram limit of {}",
				tokens.len(),
				max_len
			)));
		}

		let mut text = String::new();
		let mut initials = String::with_capacity(tokens.len());
		for token in tokens {
			let token = token.as_ref();
			if token.chars().any(char::is_whitespace) {
				return Err(AcrosticError::constraint(format!("token {:?} contains whitespace", token)));
			}
			let initial = first_char(token)
				.ok_or_else(|| AcrosticError::constraint("an n-gram cannot contain an empty token"))?;
			if !text.is_empty() {
				text.push(' ');
			}
			text.push_str(token);
			initials.push(initial);
		}

		Ok(Self { text, initials, len: tokens.len() })
	}

	/// Rebuilds an n-gram from its stored surface form.
	pub fn parse(text: &str, max_len: usize) -> Result<Self> {
		let tokens: Vec<&str> = text.split_whitespace().collect();
		Self::new(&tokens, max_len)
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn initials(&self) -> &str {
		&self.initials
	}

	/// Number of tokens.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Always false; an n-gram holds at least one token.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn tokens(&self) -> impl Iterator<Item = &str> {
		self.text.split(' ')
	}
}

/// Cuts text units into n-grams.
///
/// Cost is O(n·L) windows for an n-token input, which stays cheap because
/// L is a small constant.
#[derive(Clone, Debug)]
pub struct Extractor {
	max_len: usize,
	keep_tags: bool,
}

impl Default for Extractor {
	fn default() -> Self {
		Self { max_len: DEFAULT_MAX_LEN, keep_tags: false }
	}
}

impl Extractor {
	/// Creates an extractor producing n-grams of up to `max_len` tokens.
	///
	/// # Errors
	/// Returns `Constraint` if `max_len` is zero.
	pub fn new(max_len: usize, keep_tags: bool) -> Result<Self> {
		if max_len == 0 {
			return Err(AcrosticError::constraint("the n-gram limit must be at least 1"));
		}
		Ok(Self { max_len, keep_tags })
	}

	pub fn max_len(&self) -> usize {
		self.max_len
	}

	/// Extracts n-grams according to `mode`.
	pub fn extract(&self, text: &str, mode: ExtractionMode) -> Result<Vec<NGram>> {
		match mode {
			ExtractionMode::All => self.extract_all(text),
			ExtractionMode::Suffixes => self.extract_suffixes(text),
		}
	}

	/// Every contiguous window of length 1..=L, in order of start then length.
	pub fn extract_all(&self, text: &str) -> Result<Vec<NGram>> {
		let tokens = tokenize(text, self.keep_tags);
		self.windows(&tokens)
	}

	/// Only the windows ending at the last token, shortest first.
	pub fn extract_suffixes(&self, text: &str) -> Result<Vec<NGram>> {
		let tokens = tokenize(text, self.keep_tags);
		let n = tokens.len();
		(1..=n.min(self.max_len))
			.map(|len| NGram::new(&tokens[n - len..], self.max_len))
			.collect()
	}

	/// Every window of length 1..=L over an already-cleaned token sequence.
	pub fn windows<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<NGram>> {
		let n = tokens.len();
		let mut ngrams = Vec::with_capacity(n * self.max_len.min(n));
		for start in 0..n {
			for end in start + 1..=n.min(start + self.max_len) {
				ngrams.push(NGram::new(&tokens[start..end], self.max_len)?);
			}
		}
		Ok(ngrams)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn texts(ngrams: &[NGram]) -> Vec<&str> {
		ngrams.iter().map(NGram::text).collect()
	}

	#[test]
	fn ngram_keeps_one_initial_per_token() {
		let ngram = NGram::new(&["don't", "look:", "'back"], DEFAULT_MAX_LEN).unwrap();
		assert_eq!(ngram.text(), "don't look: 'back");
		assert_eq!(ngram.initials(), "dl'");
		assert_eq!(ngram.len(), 3);
		assert_eq!(ngram.tokens().collect::<Vec<_>>(), vec!["don't", "look:", "'back"]);
	}

	#[test]
	fn ngram_rejects_bad_token_lists() {
		let empty: [&str; 0] = [];
		assert!(matches!(NGram::new(&empty, 5), Err(AcrosticError::Constraint { .. })));
		assert!(matches!(NGram::new(&["a", "b", "c", "d", "e", "f"], 5), Err(AcrosticError::Constraint { .. })));
		assert!(matches!(NGram::new(&["a", "", "c"], 5), Err(AcrosticError::Constraint { .. })));
		assert!(matches!(NGram::new(&["a b"], 5), Err(AcrosticError::Constraint { .. })));
	}

	#[test]
	fn tagged_tokens_use_the_letter_after_the_marker() {
		let ngram = NGram::new(&["#yolo", "again"], 5).unwrap();
		assert_eq!(ngram.initials(), "ya");
	}

	#[test]
	fn parse_round_trips_text() {
		let ngram = NGram::parse("close all tabs", 5).unwrap();
		assert_eq!(ngram.initials(), "cat");
		assert_eq!(NGram::parse(ngram.text(), 5).unwrap(), ngram);
	}

	#[test]
	fn extract_short_sentence() {
		let extractor = Extractor::default();
		let ngrams = extractor.extract_all("Don't look: 'back !!").unwrap();
		assert_eq!(
			texts(&ngrams),
			vec!["don't", "don't look", "don't look back", "look", "look back", "back"]
		);
		let initials: Vec<&str> = ngrams.iter().map(NGram::initials).collect();
		assert_eq!(initials, vec!["d", "dl", "dlb", "l", "lb", "b"]);
	}

	#[test]
	fn extract_long_sentence_is_capped_by_limit() {
		let extractor = Extractor::default();
		let ngrams = extractor
			.extract_all("Don't look: 'back !!or youll see my hert braking")
			.unwrap();
		// 9 tokens, L = 5: 5 + 5 + 5 + 5 + 5 + 4 + 3 + 2 + 1
		assert_eq!(ngrams.len(), 35);
		assert!(ngrams.iter().all(|g| g.len() <= 5));
		assert!(texts(&ngrams).contains(&"youll see my hert braking"));
		assert!(!texts(&ngrams).contains(&"look back or youll see my"));
	}

	#[test]
	fn window_count_matches_triangle_when_short() {
		let extractor = Extractor::new(5, false).unwrap();
		for n in 0..=5usize {
			let tokens: Vec<String> = (0..n).map(|i| format!("w{}", i)).collect();
			let ngrams = extractor.windows(&tokens).unwrap();
			assert_eq!(ngrams.len(), n * (n + 1) / 2);
		}
	}

	#[test]
	fn suffixes_end_at_last_token() {
		let extractor = Extractor::new(3, false).unwrap();
		let ngrams = extractor.extract_suffixes("one two three four").unwrap();
		assert_eq!(texts(&ngrams), vec!["four", "three four", "two three four"]);
		assert!(extractor.extract_suffixes("...").unwrap().is_empty());
	}

	#[test]
	fn zero_limit_is_rejected() {
		assert!(Extractor::new(0, false).is_err());
	}
}
