//! Text sources feeding `Corpus::ingest`.
//!
//! A source is any iterator of `Result<String>`, one item per text unit.
//! Two file-backed sources are provided:
//! - `LineSource`: one unit per non-empty line
//! - `WikipediaDump`: one unit per page of a MediaWiki XML export, with the
//!   wiki markup stripped down to prose

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

/// Every non-empty line of a text stream, read one line at a time.
#[derive(Debug)]
pub struct LineSource<R: BufRead> {
	lines: io::Lines<R>,
}

impl LineSource<BufReader<File>> {
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
		Ok(Self::new(BufReader::new(File::open(path)?)))
	}
}

impl<R: BufRead> LineSource<R> {
	pub fn new(reader: R) -> Self {
		Self { lines: reader.lines() }
	}
}

impl<R: BufRead> Iterator for LineSource<R> {
	type Item = Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			match self.lines.next()? {
				Ok(line) if line.trim().is_empty() => continue,
				Ok(line) => return Some(Ok(line)),
				Err(e) => return Some(Err(e.into())),
			}
		}
	}
}

static REF: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s)&lt;ref.*?(/&gt;|&lt;/ref&gt;|\]\]|\}\})").expect("valid regex"));
static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)&lt;!--.*?--&gt;").expect("valid regex"));
static TEMPLATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{\{.*?\}\}").expect("valid regex"));
static ESCAPED_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&lt;.*?&gt;").expect("valid regex"));
static TEXT_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<text[^>]*>|</text>").expect("valid regex"));

/// Pages of a MediaWiki XML export.
///
/// A page spans from the line holding `<text` through the line holding `</text>`.
pub struct WikipediaDump<R: BufRead> {
	reader: R,
}

impl WikipediaDump<BufReader<File>> {
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
		Ok(Self::new(BufReader::new(File::open(path)?)))
	}
}

impl<R: BufRead> WikipediaDump<R> {
	pub fn new(reader: R) -> Self {
		Self { reader }
	}

	fn next_page(&mut self) -> Result<Option<String>> {
		let mut lines = Vec::new();
		let mut started = false;
		let mut line = String::new();
		loop {
			line.clear();
			if self.reader.read_line(&mut line)? == 0 {
				break;
			}
			if !started && line.contains("<text") {
				started = true;
			}
			if started {
				lines.push(line.trim_end_matches(['\n', '\r']).to_owned());
				if line.contains("</text>") {
					break;
				}
			}
		}

		if lines.is_empty() {
			return Ok(None);
		}
		let page = TEXT_TAG.replace_all(&lines.join("\n"), "").into_owned();
		Ok(Some(clean_page(&page)))
	}
}

impl<R: BufRead> Iterator for WikipediaDump<R> {
	type Item = Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		self.next_page().transpose()
	}
}

/// Strips references, comments, templates and escaped tags, unescapes quotes
/// and ampersands, then resolves links to their labels.
pub fn clean_page(text: &str) -> String {
	let text = REF.replace_all(text, "");
	let text = COMMENT.replace_all(&text, "");
	let text = TEMPLATE.replace_all(&text, "");
	let text = ESCAPED_TAG.replace_all(&text, "");
	let text = text.replace("&quot;", "\"").replace("&amp;", "&");
	resolve_brackets(&text)
}

/// Replaces `[[target|label]]` by `label` and `[[target]]` by `target`.
///
/// Inside brackets every `|` restarts the label; an inner `[[` restarts it as well,
/// and only the outermost closing bracket emits it. Unmatched closers are dropped,
/// and an unclosed link is dropped with its content.
pub fn resolve_brackets(text: &str) -> String {
	let chars: Vec<char> = text.chars().collect();
	let mut out = String::with_capacity(text.len());
	let mut label = String::new();
	let mut depth = 0usize;
	let mut i = 0;

	while i < chars.len() {
		match (chars[i], chars.get(i + 1).copied()) {
			('[', Some('[')) => {
				depth += 1;
				label.clear();
				i += 2;
			}
			(']', Some(']')) => {
				if depth > 0 {
					depth -= 1;
					if depth == 0 {
						out.push_str(&label);
					}
				}
				i += 2;
			}
			(c, _) => {
				if depth == 0 {
					out.push(c);
				} else if c == '|' {
					label.clear();
				} else {
					label.push(c);
				}
				i += 1;
			}
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::AcrosticError;
	use std::io::Cursor;

	#[test]
	fn line_source_skips_blank_lines() {
		let source = LineSource::new(Cursor::new("one\n   \r\ntwo\r\n"));
		let units: Vec<String> = source.map(Result::unwrap).collect();
		assert_eq!(units, vec!["one", "two"]);
	}

	#[test]
	fn line_source_reads_lazily() {
		// the second line is not valid UTF-8; the first unit comes out before it is reached
		let bytes: &[u8] = b"first line\n\xff\xfe\n";
		let mut source = LineSource::new(Cursor::new(bytes));
		assert_eq!(source.next().unwrap().unwrap(), "first line");
		assert!(matches!(source.next(), Some(Err(AcrosticError::Io(_)))));
	}

	#[test]
	fn line_source_opens_files() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("input.txt");
		std::fs::write(&path, "Close all tabs\n\nCatch a thief\n").unwrap();
		let units: Vec<String> = LineSource::open(&path).unwrap().map(Result::unwrap).collect();
		assert_eq!(units, vec!["Close all tabs", "Catch a thief"]);
		assert!(LineSource::open(dir.path().join("absent.txt")).is_err());
	}

	#[test]
	fn brackets_resolve_to_labels() {
		assert_eq!(resolve_brackets("see [[Paris|the capital]] and [[Rome]]."), "see the capital and Rome.");
		assert_eq!(resolve_brackets("[[File:a.jpg|thumb|A [[cat]] sleeps]]"), "cat sleeps");
		assert_eq!(resolve_brackets("stray ]] closer"), "stray  closer");
		assert_eq!(resolve_brackets("last char kept"), "last char kept");
	}

	#[test]
	fn clean_page_strips_markup() {
		let raw = "He said &quot;hi&quot;&lt;ref&gt;Smith 2001&lt;/ref&gt; {{cite|x}} to [[Bob|Robert]] &amp; me&lt;!-- note --&gt;.";
		let cleaned = clean_page(raw);
		assert_eq!(
			cleaned.split_whitespace().collect::<Vec<_>>(),
			vec!["He", "said", "\"hi\"", "to", "Robert", "&", "me."]
		);
	}

	#[test]
	fn dump_yields_one_unit_per_page() {
		let dump = "<page>\n<title>X</title>\n<text xml:space=\"preserve\">First [[line|sentence]] here\nsecond line</text>\n</page>\n<page>\n<text xml:space=\"preserve\">Another page</text>\n</page>\n";
		let pages: Vec<String> = WikipediaDump::new(Cursor::new(dump)).map(Result::unwrap).collect();
		assert_eq!(pages, vec!["First sentence here\nsecond line", "Another page"]);
	}
}
