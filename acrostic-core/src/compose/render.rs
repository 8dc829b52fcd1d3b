use crate::ngram::token::TAG_MARKER;

/// Upper-cases the first letter of a token and lower-cases the rest.
///
/// A leading tag marker is kept and the letter after it is capitalized.
pub fn capitalize(token: &str) -> String {
	let (marker, rest) = match token.strip_prefix(TAG_MARKER) {
		Some(rest) => (Some(TAG_MARKER), rest),
		None => (None, token),
	};

	let mut out = String::with_capacity(token.len());
	out.extend(marker);
	let mut chars = rest.chars();
	if let Some(first) = chars.next() {
		out.extend(first.to_uppercase());
		out.push_str(&chars.as_str().to_lowercase());
	}
	out
}

/// Capitalizes every token and joins them with `separator`.
pub fn render<'a, I>(tokens: I, separator: &str) -> String
where
	I: IntoIterator<Item = &'a str>,
{
	tokens.into_iter().map(capitalize).collect::<Vec<_>>().join(separator)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn capitalize_keeps_tag_marker() {
		assert_eq!(capitalize("close"), "Close");
		assert_eq!(capitalize("#yolo"), "#Yolo");
		assert_eq!(capitalize("don't"), "Don't");
		assert_eq!(capitalize("éCOLE"), "École");
		assert_eq!(capitalize("#"), "#");
	}

	#[test]
	fn render_joins_one_token_per_line() {
		assert_eq!(render(["close", "all", "tabs"], "\n"), "Close\nAll\nTabs");
		assert_eq!(render(["a", "b"], " "), "A B");
	}
}
