//! Action Selection
//!
//! Stochastic choice of one chunk among a fixed set of actionable candidates,
//! following a Boltzmann distribution over their strengths:
//!
//! ```text
//! P(c) = e^(s(c)/T) / Σ_k e^(s(k)/T)
//! ```
//!
//! A candidate absent from the strength map has strength 0, so its term is 1.
//! High temperatures flatten the distribution toward uniform; low temperatures
//! sharpen it toward the strongest candidate.

use std::collections::BTreeSet;

use rand::distributions::{Distribution, WeightedIndex};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClarionError, Result};
use crate::nodes::{ActivationMap, ChunkId};

/// Set of selected chunks.
pub type ChunkSet = BTreeSet<ChunkId>;

/// Configuration for Boltzmann selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
	/// `T` - temperature of the Boltzmann distribution
	pub temperature: f64,
}

impl Default for SelectorConfig {
	fn default() -> Self {
		Self { temperature: 0.01 }
	}
}

/// Picks chunks to act upon given their strengths.
///
/// The random source is supplied per call, so selectors hold no hidden RNG
/// state and seeded sources give reproducible draws.
pub trait ChunkSelector {
	/// Select chunks given `strengths`.
	///
	/// # Errors
	///
	/// Implementation specific; see each selector.
	fn select(&self, strengths: &ActivationMap, rng: &mut dyn RngCore) -> Result<ChunkSet>;
}

/// Draws exactly one candidate from a Boltzmann distribution.
#[derive(Clone, Debug)]
pub struct BoltzmannSelector {
	// Sorted, deduplicated; fixes the draw order for seeded sources.
	chunks: Vec<ChunkId>,
	temperature: f64,
}

impl BoltzmannSelector {
	/// Create a selector over `chunks` at `temperature`.
	///
	/// # Errors
	///
	/// - [`ClarionError::NoCandidates`] if `chunks` is empty
	/// - [`ClarionError::InvalidTemperature`] unless `temperature` is finite and positive
	pub fn new(chunks: impl IntoIterator<Item = ChunkId>, temperature: f64) -> Result<Self> {
		if !(temperature.is_finite() && temperature > 0.0) {
			return Err(ClarionError::InvalidTemperature(temperature));
		}

		let chunks: Vec<ChunkId> = chunks.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
		if chunks.is_empty() {
			return Err(ClarionError::NoCandidates);
		}

		Ok(Self {
			chunks,
			temperature,
		})
	}

	/// Create a selector from configuration.
	///
	/// # Errors
	///
	/// Same as [`BoltzmannSelector::new`].
	pub fn from_config(
		chunks: impl IntoIterator<Item = ChunkId>,
		config: &SelectorConfig,
	) -> Result<Self> {
		Self::new(chunks, config.temperature)
	}

	/// Actionable candidates, in draw order.
	#[must_use]
	pub fn chunks(&self) -> &[ChunkId] {
		&self.chunks
	}

	/// Temperature of the distribution.
	#[must_use]
	pub const fn temperature(&self) -> f64 {
		self.temperature
	}

	/// Selection probability of every candidate.
	///
	/// The largest exponent is factored out of every term before
	/// exponentiation, which leaves the probabilities unchanged and keeps low
	/// temperatures from overflowing.
	///
	/// # Errors
	///
	/// [`ClarionError::DegenerateDistribution`] if a candidate strength divided
	/// by the temperature is not finite.
	pub fn distribution(&self, strengths: &ActivationMap) -> Result<Vec<(ChunkId, f64)>> {
		let exponents: Vec<f64> = self
			.chunks
			.iter()
			.map(|&chunk| strengths.chunk(chunk).unwrap_or(0.0) / self.temperature)
			.collect();

		if let Some(pos) = exponents.iter().position(|e| !e.is_finite()) {
			return Err(ClarionError::DegenerateDistribution {
				reason: format!(
					"strength of {} over temperature {} is {}",
					self.chunks[pos], self.temperature, exponents[pos]
				),
			});
		}

		let max = exponents.iter().copied().fold(f64::NEG_INFINITY, f64::max);
		let terms: Vec<f64> = exponents.iter().map(|e| (e - max).exp()).collect();
		let divisor: f64 = terms.iter().sum();

		Ok(self
			.chunks
			.iter()
			.zip(terms)
			.map(|(&chunk, term)| (chunk, term / divisor))
			.collect())
	}
}

impl ChunkSelector for BoltzmannSelector {
	/// Returns a singleton set.
	///
	/// # Errors
	///
	/// [`ClarionError::DegenerateDistribution`] as for
	/// [`BoltzmannSelector::distribution`].
	fn select(&self, strengths: &ActivationMap, rng: &mut dyn RngCore) -> Result<ChunkSet> {
		let distribution = self.distribution(strengths)?;

		let index = WeightedIndex::new(distribution.iter().map(|&(_, p)| p)).map_err(|e| {
			ClarionError::DegenerateDistribution {
				reason: e.to_string(),
			}
		})?;
		let (choice, probability) = distribution[index.sample(rng)];

		debug!(
			chunk = %choice,
			probability,
			temperature = self.temperature,
			candidates = self.chunks.len(),
			"boltzmann selection"
		);

		Ok(ChunkSet::from([choice]))
	}
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used, clippy::cast_precision_loss)]
mod tests {
	use std::collections::HashMap;

	use rand::rngs::StdRng;
	use rand::SeedableRng;

	use super::*;

	const A: ChunkId = ChunkId(1);
	const B: ChunkId = ChunkId(2);
	const C: ChunkId = ChunkId(3);

	fn strengths() -> ActivationMap {
		[(A, 0.2), (B, 0.9), (C, 0.5)].into_iter().collect()
	}

	fn frequencies(
		selector: &BoltzmannSelector,
		input: &ActivationMap,
		draws: usize,
		seed: u64,
	) -> HashMap<ChunkId, f64> {
		let mut rng = StdRng::seed_from_u64(seed);
		let mut counts: HashMap<ChunkId, usize> = HashMap::new();
		for _ in 0..draws {
			for chunk in selector.select(input, &mut rng).unwrap() {
				*counts.entry(chunk).or_insert(0) += 1;
			}
		}
		counts
			.into_iter()
			.map(|(chunk, n)| (chunk, n as f64 / draws as f64))
			.collect()
	}

	#[test]
	fn test_rejects_empty_candidates() {
		let err = BoltzmannSelector::new(Vec::new(), 1.0).unwrap_err();
		assert_eq!(err, ClarionError::NoCandidates);
	}

	#[test]
	fn test_rejects_bad_temperature() {
		for t in [0.0, -1.0, f64::NAN, f64::INFINITY] {
			let err = BoltzmannSelector::new([A], t).unwrap_err();
			assert!(matches!(err, ClarionError::InvalidTemperature(_)));
		}
	}

	#[test]
	fn test_distribution_matches_softmax() {
		let t = 0.5;
		let selector = BoltzmannSelector::new([A, B, C], t).unwrap();
		let dist = selector.distribution(&strengths()).unwrap();

		let raw = [0.2f64, 0.9, 0.5].map(|s| (s / t).exp());
		let total: f64 = raw.iter().sum();
		for ((chunk, p), expected) in dist.iter().zip(raw) {
			assert!((p - expected / total).abs() < 1e-12, "{chunk}");
		}
		assert!((dist.iter().map(|(_, p)| p).sum::<f64>() - 1.0).abs() < 1e-12);
	}

	#[test]
	fn test_missing_candidate_has_zero_strength() {
		let selector = BoltzmannSelector::new([A, B], 1.0).unwrap();
		let implicit: ActivationMap = [(A, 1.0)].into_iter().collect();
		let explicit: ActivationMap = [(A, 1.0), (B, 0.0)].into_iter().collect();
		assert_eq!(
			selector.distribution(&implicit).unwrap(),
			selector.distribution(&explicit).unwrap()
		);

		let expected_b = 1.0 / (1f64.exp() + 1.0);
		let dist = selector.distribution(&implicit).unwrap();
		assert!((dist[1].1 - expected_b).abs() < 1e-12);
	}

	#[test]
	fn test_ignores_non_candidates() {
		let selector = BoltzmannSelector::new([A, B], 1.0).unwrap();
		let mut input = strengths();
		let _ = input.insert(ChunkId(99), 50.0);
		let dist = selector.distribution(&input).unwrap();
		assert_eq!(dist.len(), 2);
		assert!(dist.iter().all(|&(c, _)| c == A || c == B));
	}

	#[test]
	fn test_select_returns_singleton() {
		let selector = BoltzmannSelector::new([A, B, C], 1.0).unwrap();
		let mut rng = StdRng::seed_from_u64(7);
		let chosen = selector.select(&strengths(), &mut rng).unwrap();
		assert_eq!(chosen.len(), 1);
		assert!(chosen.iter().all(|c| selector.chunks().contains(c)));
	}

	#[test]
	fn test_seeded_draws_reproducible() {
		let selector = BoltzmannSelector::new([A, B, C], 0.3).unwrap();
		let input = strengths();
		let mut rng1 = StdRng::seed_from_u64(42);
		let mut rng2 = StdRng::seed_from_u64(42);
		for _ in 0..100 {
			assert_eq!(
				selector.select(&input, &mut rng1).unwrap(),
				selector.select(&input, &mut rng2).unwrap()
			);
		}
	}

	#[test]
	fn test_high_temperature_is_uniform() {
		let selector = BoltzmannSelector::new([A, B, C], 1e6).unwrap();
		let freq = frequencies(&selector, &strengths(), 30_000, 11);
		for chunk in [A, B, C] {
			let f = freq.get(&chunk).copied().unwrap_or(0.0);
			assert!((f - 1.0 / 3.0).abs() < 0.02, "{chunk}: {f}");
		}
	}

	#[test]
	fn test_low_temperature_picks_maximum() {
		let selector = BoltzmannSelector::new([A, B, C], 1e-4).unwrap();
		let freq = frequencies(&selector, &strengths(), 1_000, 3);
		assert_eq!(freq.get(&B).copied(), Some(1.0));
	}

	#[test]
	fn test_low_temperature_ties_split() {
		let selector = BoltzmannSelector::new([A, B, C], 1e-4).unwrap();
		let input: ActivationMap = [(A, 0.8), (B, 0.8), (C, 0.1)].into_iter().collect();
		let freq = frequencies(&selector, &input, 2_000, 5);
		assert!(freq.get(&C).is_none());
		let a = freq.get(&A).copied().unwrap_or(0.0);
		assert!((a - 0.5).abs() < 0.05, "{a}");
		assert_eq!(freq, frequencies(&selector, &input, 2_000, 5));
	}

	#[test]
	fn test_non_finite_strength_is_degenerate() {
		let selector = BoltzmannSelector::new([A, B], 1.0).unwrap();
		let input: ActivationMap = [(A, f64::NAN)].into_iter().collect();
		let mut rng = StdRng::seed_from_u64(1);
		let err = selector.select(&input, &mut rng).unwrap_err();
		assert!(matches!(err, ClarionError::DegenerateDistribution { .. }));
	}

	#[test]
	fn test_from_config() {
		let selector =
			BoltzmannSelector::from_config([C, A, A], &SelectorConfig::default()).unwrap();
		assert_eq!(selector.chunks(), &[A, C]);
		assert_eq!(selector.temperature(), 0.01);
	}
}
