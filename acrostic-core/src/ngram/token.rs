/// Marker kept in front of tag-like tokens when tags are preserved.
pub const TAG_MARKER: char = '#';

fn is_letter(c: char) -> bool {
	c.is_alphabetic()
}

/// Cleans one raw token.
///
/// - Lower-cases the token
/// - Strips runs of non-letter characters from both ends only
///   (interior punctuation, digits and apostrophes survive)
/// - With `keep_tags`, a `#` directly in front of the first letter is kept
///
/// Returns an empty string when nothing but non-letters remain; callers drop it.
///
/// Examples: `"----yes"` → `"yes"`, `"N..o..."` → `"n..o"`, `"reno911"` → `"reno"`
pub fn clean_token(raw: &str, keep_tags: bool) -> String {
	let lower = raw.to_lowercase();
	let start = lower.trim_start_matches(|c: char| !is_letter(c));
	let core = start.trim_end_matches(|c: char| !is_letter(c));
	if core.is_empty() {
		return String::new();
	}

	let stripped = &lower[..lower.len() - start.len()];
	if keep_tags && stripped.ends_with(TAG_MARKER) {
		let mut tagged = String::with_capacity(core.len() + 1);
		tagged.push(TAG_MARKER);
		tagged.push_str(core);
		tagged
	} else {
		core.to_owned()
	}
}

/// Splits a text unit on whitespace, cleans every token and drops the empty ones.
///
/// Windows are later taken over this filtered sequence, so a dropped token never
/// breaks contiguity.
pub fn tokenize(text: &str, keep_tags: bool) -> Vec<String> {
	text.split_whitespace()
		.map(|raw| clean_token(raw, keep_tags))
		.filter(|token| !token.is_empty())
		.collect()
}

/// Returns the character a token contributes to an initials signature.
///
/// A leading tag marker is skipped when something follows it.
pub fn first_char(token: &str) -> Option<char> {
	let mut chars = token.chars();
	match (chars.next(), chars.next()) {
		(Some(TAG_MARKER), Some(next)) => Some(next),
		(first, _) => first,
	}
}
