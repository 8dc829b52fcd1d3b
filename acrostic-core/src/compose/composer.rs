use rand::RngCore;

use super::publish::PublishSink;
use super::render::render;
use super::scoring::{Scorer, weighted_index};
use crate::config::AcrosticConfig;
use crate::error::{AcrosticError, ExhaustionReason, Result};
use crate::ngram::Extractor;
use crate::store::{Candidate, CorpusStore, Ledger};

/// Composition settings.
#[derive(Clone, Debug)]
pub struct ComposeOptions {
	/// Candidates gathered per step before scoring.
	pub pool_size: usize,
	/// Full attempts before giving up.
	pub max_attempts: usize,
	/// Maximum rendered length, in characters.
	pub char_limit: usize,
	/// Placed between rendered tokens.
	pub separator: String,
	/// Consult and update the ledger.
	pub dedupe: bool,
	/// Longest sub-n-gram whose usage is recorded on acceptance.
	pub max_ngram_len: usize,
}

impl Default for ComposeOptions {
	fn default() -> Self {
		(&AcrosticConfig::default()).into()
	}
}

impl From<&AcrosticConfig> for ComposeOptions {
	fn from(config: &AcrosticConfig) -> Self {
		Self {
			pool_size: config.pool_size,
			max_attempts: config.max_attempts,
			char_limit: config.char_limit,
			separator: config.separator.clone(),
			dedupe: config.dedupe,
			max_ngram_len: config.max_ngram_len,
		}
	}
}

/// One chosen piece of a composition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
	pub text: String,
	pub initials: String,
}

/// An accepted-length, non-duplicate composition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composition {
	/// Normalized target.
	pub target: String,
	/// Chunks in order; their initials concatenate to `target`.
	pub chunks: Vec<Chunk>,
	/// Capitalized tokens joined by the separator.
	pub rendered: String,
	/// Attempt (1-based) that produced it.
	pub attempts: usize,
}

impl Composition {
	pub fn tokens(&self) -> impl Iterator<Item = &str> {
		self.chunks.iter().flat_map(|chunk| chunk.text.split_whitespace())
	}
}

/// Result of a single attempt.
enum Attempt {
	Drafted(Vec<Chunk>),
	Stuck { position: usize, remaining: String },
}

/// Composes acrostics out of a corpus store.
///
/// # Responsibilities
/// - Gather, score and draw candidates position by position
/// - Reject over-length and already-published results, retrying up to a bound
/// - Record usage and ledger entries once a composition is accepted
pub struct Composer<S: CorpusStore> {
	store: S,
	ledger: Ledger,
	scorer: Box<dyn Scorer>,
	options: ComposeOptions,
}

impl<S: CorpusStore> Composer<S> {
	/// Creates a composer.
	///
	/// # Errors
	/// Returns `Config` if the pool size, attempt bound, char limit or n-gram limit is zero.
	pub fn new(
		store: S,
		ledger: Ledger,
		options: ComposeOptions,
		scorer: Box<dyn Scorer>,
	) -> Result<Self> {
		if options.pool_size == 0
			|| options.max_attempts == 0
			|| options.char_limit == 0
			|| options.max_ngram_len == 0
		{
			return Err(AcrosticError::config(
				"pool_size, max_attempts, char_limit and max_ngram_len must be at least 1",
			));
		}
		Ok(Self { store, ledger, scorer, options })
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	pub fn ledger(&self) -> &Ledger {
		&self.ledger
	}

	/// Composes with the thread-local generator.
	pub fn compose(&self, target: &str) -> Result<Composition> {
		self.compose_with_rng(target, &mut rand::rng())
	}

	/// Runs up to `max_attempts` attempts and returns the first acceptable result.
	///
	/// Only the first word of `target` is spelled. Nothing is recorded; see `accept`.
	///
	/// # Errors
	/// - `Constraint` if the target has no word
	/// - `Exhaustion` if nothing matches the first initials, or if every attempt
	///   was over length, a duplicate, or stuck
	pub fn compose_with_rng(&self, target: &str, rng: &mut dyn RngCore) -> Result<Composition> {
		let target = match target.split_whitespace().next() {
			Some(word) => word.to_lowercase(),
			None => return Err(AcrosticError::constraint("the target must not be empty")),
		};

		let (mut too_long, mut duplicates, mut stuck) = (0, 0, 0);
		for attempt in 1..=self.options.max_attempts {
			let chunks = match self.attempt(&target, rng)? {
				Attempt::Drafted(chunks) => chunks,
				// nothing to vary before the first chunk, retrying cannot help
				Attempt::Stuck { position: 0, remaining } => {
					return Err(AcrosticError::Exhaustion {
						target,
						reason: ExhaustionReason::NoCandidates { position: 0, remaining },
					});
				}
				Attempt::Stuck { position, remaining } => {
					log::warn!("attempt {} stuck at {} with '{}' left", attempt, position, remaining);
					stuck += 1;
					continue;
				}
			};

			let tokens = chunks.iter().flat_map(|chunk| chunk.text.split_whitespace());
			let rendered = render(tokens, &self.options.separator);

			let length = rendered.chars().count();
			if length > self.options.char_limit {
				log::debug!("attempt {} too long ({} > {})", attempt, length, self.options.char_limit);
				too_long += 1;
				continue;
			}
			if self.options.dedupe && self.ledger.contains(&rendered) {
				log::debug!("attempt {} already published", attempt);
				duplicates += 1;
				continue;
			}

			return Ok(Composition { target, chunks, rendered, attempts: attempt });
		}

		Err(AcrosticError::Exhaustion {
			target,
			reason: ExhaustionReason::AttemptsExhausted {
				attempts: self.options.max_attempts,
				too_long,
				duplicates,
				stuck,
			},
		})
	}

	/// One left-to-right pass over the target.
	fn attempt(&self, target: &str, rng: &mut dyn RngCore) -> Result<Attempt> {
		let letters: Vec<char> = target.chars().collect();
		let mut position = 0;
		let mut chunks = Vec::new();

		while position < letters.len() {
			let mut pool = self.gather(target, &letters[position..], rng)?;
			let scores: Vec<f64> = pool.iter().map(|candidate| self.scorer.score(candidate)).collect();
			let chosen = match weighted_index(&scores, rng) {
				Some(index) => pool.swap_remove(index),
				None => {
					return Ok(Attempt::Stuck {
						position,
						remaining: letters[position..].iter().collect(),
					});
				}
			};

			position += chosen.token_count();
			chunks.push(Chunk { text: chosen.text, initials: chosen.initials });
		}

		Ok(Attempt::Drafted(chunks))
	}

	/// Collects candidates for the longest prefixes of `desired` first, moving to
	/// shorter prefixes until the pool is full.
	///
	/// Texts containing the target word are skipped.
	fn gather(&self, target: &str, desired: &[char], rng: &mut dyn RngCore) -> Result<Vec<Candidate>> {
		let pool_size = self.options.pool_size;
		let mut pool = Vec::new();

		for len in (1..=desired.len()).rev() {
			if pool.len() >= pool_size {
				break;
			}
			let initials: String = desired[..len].iter().collect();
			let found = self.store.sample(&initials, pool_size, rng)?;
			pool.extend(found.into_iter().filter(|candidate| {
				!candidate.text.contains(target) && candidate.token_count() == len
			}));
		}

		Ok(pool)
	}

	/// Records an accepted composition.
	///
	/// - Every sub-n-gram (length 1..=L) of the token sequence gets one more use
	/// - The rendered text joins the ledger (when dedupe is on)
	pub fn accept(&mut self, composition: &Composition) -> Result<()> {
		let tokens: Vec<&str> = composition.tokens().collect();
		let extractor = Extractor::new(self.options.max_ngram_len, true)?;
		let ngrams = extractor.windows(&tokens)?;
		self.store.record_uses(&ngrams)?;

		if self.options.dedupe {
			self.ledger.insert(&composition.rendered)?;
		}

		log::info!(
			"accepted '{}' after {} attempt(s), {} usage updates",
			composition.target,
			composition.attempts,
			ngrams.len()
		);
		Ok(())
	}

	/// Composes, publishes, then records the composition.
	///
	/// A publish failure leaves the store and the ledger untouched.
	pub fn compose_and_publish<P>(&mut self, target: &str, sink: &mut P) -> Result<Composition>
	where
		P: PublishSink + ?Sized,
	{
		let composition = self.compose(target)?;
		sink.publish(&composition.rendered)?;
		self.accept(&composition)?;
		Ok(composition)
	}
}
