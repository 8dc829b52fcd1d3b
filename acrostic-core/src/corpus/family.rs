use std::collections::HashMap;

use crate::error::{AcrosticError, Result};
use crate::ngram::NGram;

/// The buffered n-grams sharing one initials signature.
///
/// An `InitialFamily` corresponds to a signature such as `"the"` and stores
/// every surface text observed with it ("the history explains", "to help everyone"...)
/// together with how many times it was seen since the last flush.
///
/// ## Responsibilities:
/// - Accumulate occurrence counts while text is being ingested
/// - Define the line format used to persist counts
///
/// ## Invariants
/// - Every stored text has initials equal to `initials`
/// - Each stored count is strictly positive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitialFamily {
	/// Signature shared by every text (one character per token).
	initials: String,
	/// Buffered counts indexed by surface text.
	/// Example: { "laugh out loud" => 42, "lots of love" => 3 }
	counts: HashMap<String, u64>,
}

impl InitialFamily {
	/// Creates an empty family for a signature.
	///
	/// # Errors
	/// Returns `Constraint` if the signature is empty or longer than `max_len`.
	pub fn new(initials: &str, max_len: usize) -> Result<Self> {
		let len = initials.chars().count();
		if len == 0 || len > max_len {
			return Err(AcrosticError::constraint(format!(
				"initials '{}' must hold between 1 and {} characters",
				initials, max_len
			)));
		}
		Ok(Self { initials: initials.to_owned(), counts: HashMap::new() })
	}

	pub fn initials(&self) -> &str {
		&self.initials
	}

	/// Records `count` more occurrences of `ngram`.
	///
	/// Returns whether the text was already buffered.
	///
	/// # Errors
	/// Returns `Mismatch` if the n-gram belongs to another signature.
	pub fn add(&mut self, ngram: &NGram, count: u64) -> Result<bool> {
		if ngram.initials() != self.initials {
			return Err(AcrosticError::mismatch(&self.initials, ngram.initials()));
		}
		let existed = self.counts.contains_key(ngram.text());
		if count > 0 {
			*self.counts.entry(ngram.text().to_owned()).or_insert(0) += count;
		}
		Ok(existed)
	}

	/// Number of distinct texts currently buffered.
	pub fn size(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Buffered count of one text (0 if absent).
	pub fn count(&self, text: &str) -> u64 {
		self.counts.get(text).copied().unwrap_or(0)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.counts.iter().map(|(text, count)| (text.as_str(), *count))
	}

	/// Drops every buffered count. Called once the store owns them.
	pub fn clear(&mut self) {
		self.counts.clear();
	}
}

/// Collapses every whitespace run (tabs and newlines included) to one space.
///
/// A stored text can then never break the line format.
pub fn sanitize_text(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Formats one persisted record: `<text>\t<count>\n`.
pub fn serialize_line(text: &str, count: u64) -> String {
	format!("{}\t{}\n", sanitize_text(text), count)
}

/// Parses one persisted record.
///
/// A single trailing newline is accepted (and may be absent).
///
/// # Errors
/// Returns `Format` unless the line holds exactly one tab separating a
/// non-empty text from a non-negative integer.
pub fn parse_line(line: &str) -> Result<(String, u64)> {
	let body = line.strip_suffix('\n').unwrap_or(line);
	let body = body.strip_suffix('\r').unwrap_or(body);
	if body.contains('\n') {
		return Err(AcrosticError::format(format!("embedded newline in record {:?}", line)));
	}

	let mut fields = body.split('\t');
	let (text, count) = match (fields.next(), fields.next(), fields.next()) {
		(Some(text), Some(count), None) => (text, count),
		_ => {
			return Err(AcrosticError::format(format!(
				"expected exactly one tab in record {:?}",
				line
			)));
		}
	};
	if text.is_empty() {
		return Err(AcrosticError::format(format!("empty text in record {:?}", line)));
	}
	let count = count
		.parse::<u64>()
		.map_err(|_| AcrosticError::format(format!("invalid count in record {:?}", line)))?;

	Ok((text.to_owned(), count))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ngram(text: &str) -> NGram {
		NGram::parse(text, 5).unwrap()
	}

	#[test]
	fn new_family_is_empty() {
		let family = InitialFamily::new("abc", 5).unwrap();
		assert_eq!(family.size(), 0);
		assert!(InitialFamily::new("abcdef", 5).is_err());
		assert!(InitialFamily::new("", 5).is_err());
	}

	#[test]
	fn add_reports_previous_presence() {
		let mut family = InitialFamily::new("lol", 5).unwrap();
		assert!(!family.add(&ngram("lots of love"), 1).unwrap());
		assert!(family.add(&ngram("lots of love"), 1).unwrap());
		assert!(!family.add(&ngram("laugh out loud"), 1).unwrap());
		assert_eq!(family.size(), 2);
		assert_eq!(family.count("lots of love"), 2);
	}

	#[test]
	fn add_rejects_other_initials() {
		let mut family = InitialFamily::new("lol", 5).unwrap();
		let err = family.add(&ngram("laugh out now"), 1).unwrap_err();
		assert!(matches!(err, AcrosticError::Mismatch { .. }));
		assert_eq!(family.size(), 0);
	}

	#[test]
	fn increments_aggregate() {
		let mut split = InitialFamily::new("cat", 5).unwrap();
		for count in [1, 1, 7] {
			split.add(&ngram("close all tabs"), count).unwrap();
		}
		let mut whole = InitialFamily::new("cat", 5).unwrap();
		whole.add(&ngram("close all tabs"), 9).unwrap();
		assert_eq!(split, whole);
	}

	#[test]
	fn parse_line_accepts_one_tab() {
		assert_eq!(parse_line("foo bar\t3\n").unwrap(), ("foo bar".to_owned(), 3));
		assert_eq!(parse_line("foo bar\t3").unwrap(), ("foo bar".to_owned(), 3));
	}

	#[test]
	fn parse_line_fails_loudly() {
		for bad in ["foo\tbar\t3\n", "foo bar 3\n", "foo\t-3\n", "foo\tx\n", "\t3\n", "a\nb\t3\n"] {
			assert!(
				matches!(parse_line(bad), Err(AcrosticError::Format { .. })),
				"{:?} should not parse",
				bad
			);
		}
	}

	#[test]
	fn serialize_line_sanitizes_whitespace() {
		assert_eq!(serialize_line("foo\tbar\n baz", 4), "foo bar baz\t4\n");
		assert_eq!(parse_line(&serialize_line("a  b", 1)).unwrap(), ("a b".to_owned(), 1));
	}
}
