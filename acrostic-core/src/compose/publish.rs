use std::io::{self, Write};

use crate::error::{AcrosticError, Result};

/// Destination of finished, length-checked compositions.
///
/// A failure is reported once; retrying is the caller's decision.
pub trait PublishSink {
	fn publish(&mut self, rendered: &str) -> Result<()>;
}

/// Prints compositions to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl PublishSink for StdoutSink {
	fn publish(&mut self, rendered: &str) -> Result<()> {
		let mut out = io::stdout().lock();
		writeln!(out, "{}\n", rendered)
			.and_then(|_| out.flush())
			.map_err(|e| AcrosticError::Publish { message: e.to_string() })
	}
}

impl<F> PublishSink for F
where
	F: FnMut(&str) -> Result<()>,
{
	fn publish(&mut self, rendered: &str) -> Result<()> {
		self(rendered)
	}
}
