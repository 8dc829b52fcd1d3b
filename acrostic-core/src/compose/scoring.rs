use rand::Rng;

use crate::config::ScorerKind;
use crate::store::Candidate;

/// Upper bound of a single score, keeping the integer draw meaningful.
pub const MAX_SCORE: f64 = 1e15;

/// Fitness policy for candidates.
///
/// Implementations should grow with `seen` and shrink with `used`.
/// `score` applies the tag boost and clamps the result to `[1, MAX_SCORE]`,
/// so every candidate keeps a strictly positive weight.
pub trait Scorer: Send + Sync {
	/// Unclamped fitness.
	fn raw(&self, candidate: &Candidate) -> f64;

	/// Multiplier applied to tag-like candidates.
	fn tag_boost(&self) -> f64 {
		1.0
	}

	fn score(&self, candidate: &Candidate) -> f64 {
		let raw = self.raw(candidate);
		let boosted = if candidate.is_tagged() { raw * self.tag_boost() } else { raw };
		if boosted.is_nan() {
			return 1.0;
		}
		boosted.clamp(1.0, MAX_SCORE)
	}
}

/// `(len(text) · seen / (10 · used³)) ^ len(initials)`, tags doubled.
///
/// Overused phrases fall off sharply, and the exponent makes long chunks
/// compete only when clearly popular.
#[derive(Clone, Copy, Debug, Default)]
pub struct PopularityScorer;

impl Scorer for PopularityScorer {
	fn raw(&self, candidate: &Candidate) -> f64 {
		let used = candidate.used.max(1) as f64;
		let base = candidate.text.chars().count() as f64 * candidate.seen as f64 / (10.0 * used.powi(3));
		base.powi(candidate.token_count() as i32)
	}

	fn tag_boost(&self) -> f64 {
		2.0
	}
}

/// `len(text) · (seen / (10 · used)) ^ (2 · len(initials))`, tags times ten.
#[derive(Clone, Copy, Debug, Default)]
pub struct LegacyScorer;

impl Scorer for LegacyScorer {
	fn raw(&self, candidate: &Candidate) -> f64 {
		let used = candidate.used.max(1) as f64;
		let ratio = candidate.seen as f64 / (10.0 * used);
		candidate.text.chars().count() as f64 * ratio.powi(2 * candidate.token_count() as i32)
	}

	fn tag_boost(&self) -> f64 {
		10.0
	}
}

impl ScorerKind {
	pub fn build(self) -> Box<dyn Scorer> {
		match self {
			ScorerKind::Popularity => Box::new(PopularityScorer),
			ScorerKind::Legacy => Box::new(LegacyScorer),
		}
	}
}

/// Picks an index with probability proportional to its score.
///
/// Draws `r` uniformly in `[1, ⌊Σ scores⌋]` and subtracts scores in order until
/// `r` drops to zero or below. If rounding leaves a remainder after the last
/// score, the last index is chosen.
///
/// Returns `None` for an empty slice.
pub fn weighted_index<R: Rng + ?Sized>(scores: &[f64], rng: &mut R) -> Option<usize> {
	if scores.is_empty() {
		return None;
	}

	let total = scores.iter().sum::<f64>().floor().max(1.0) as u64;
	let mut r = rng.random_range(1..=total) as f64;
	for (i, score) in scores.iter().enumerate() {
		r -= score;
		if r <= 0.0 {
			return Some(i);
		}
	}

	Some(scores.len() - 1)
}
