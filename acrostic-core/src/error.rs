use std::fmt;

use thiserror::Error;

/// Result type alias for acrostic operations.
pub type Result<T> = std::result::Result<T, AcrosticError>;

/// Errors that can occur while building a corpus or composing from it.
#[derive(Debug, Error)]
pub enum AcrosticError {
	/// A persisted line or file name is malformed. Signals storage corruption.
	#[error("format error: {message}")]
	Format {
		/// What was malformed, and where.
		message: String,
	},

	/// Initials disagree with the family (or file) they are routed to.
	#[error("initials mismatch: expected '{expected}', found '{found}'")]
	Mismatch {
		/// Initials of the receiving family.
		expected: String,
		/// Initials that were offered.
		found: String,
	},

	/// An n-gram or target violates a structural bound.
	#[error("constraint violated: {message}")]
	Constraint {
		/// Which bound was violated.
		message: String,
	},

	/// Composition gave up.
	#[error("could not compose '{target}': {reason}")]
	Exhaustion {
		/// The (normalized) target initials.
		target: String,
		/// Why no composition was produced.
		reason: ExhaustionReason,
	},

	/// Invalid or unreadable configuration.
	#[error("configuration error: {message}")]
	Config {
		/// Description of the problem.
		message: String,
	},

	/// The publish sink refused a finished composition.
	#[error("publish failed: {message}")]
	Publish {
		/// Sink-provided description.
		message: String,
	},

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	#[error("serialization error: {0}")]
	Serialization(#[from] postcard::Error),
}

impl AcrosticError {
	pub(crate) fn format(message: impl Into<String>) -> Self {
		Self::Format { message: message.into() }
	}

	pub(crate) fn constraint(message: impl Into<String>) -> Self {
		Self::Constraint { message: message.into() }
	}

	pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
		Self::Mismatch { expected: expected.into(), found: found.into() }
	}

	pub(crate) fn config(message: impl Into<String>) -> Self {
		Self::Config { message: message.into() }
	}
}

/// Why the composer stopped without a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExhaustionReason {
	/// Nothing in the store starts with the initials still to be covered.
	NoCandidates {
		/// Position in the target where the attempt got stuck.
		position: usize,
		/// The uncovered remainder of the target.
		remaining: String,
	},
	/// Every attempt was rejected.
	AttemptsExhausted {
		attempts: usize,
		too_long: usize,
		duplicates: usize,
		stuck: usize,
	},
}

impl fmt::Display for ExhaustionReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ExhaustionReason::NoCandidates { position, remaining } => {
				write!(f, "no candidates for '{}' at position {}", remaining, position)
			}
			ExhaustionReason::AttemptsExhausted { attempts, too_long, duplicates, stuck } => write!(
				f,
				"{} attempts failed ({} over length, {} duplicates, {} stuck)",
				attempts, too_long, duplicates, stuck
			),
		}
	}
}
