//! Activation Channels
//!
//! Directional activation transfer between a chunk and its microfeatures.
//!
//! Top-down: a chunk of strength `s` drives each of its microfeatures with
//! ```text
//! a(f) = s × w(dim f) / n(dim f)
//! ```
//! so the activation spread over one dimension always totals `s × w(dim)`.
//!
//! Bottom-up: microfeature evidence drives the chunk with
//! ```text
//! s = Σ_{d ∈ D} w(d) × max_{f ∈ d} a(f) / (Σ_d w(d))^1.1
//! ```
//! where `D` holds only the dimensions with at least one present microfeature,
//! while the divisor sums every dimension weight of the chunk.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::nodes::{ActivationMap, Chunk, ChunkId, Dimension, Microfeature};

/// Exponent applied to the total weight in the bottom-up divisor.
pub const BOTTOM_UP_EXPONENT: f64 = 1.1;

/// Maps an input activation map to an output activation map.
pub trait Channel {
	/// Compute output activations from `input`.
	fn propagate(&self, input: &ActivationMap) -> ActivationMap;
}

// ============================================================================
// Top-Down
// ============================================================================

#[derive(Clone, Debug)]
struct TopDownTarget {
	feature: Microfeature,
	weight: f64,
	count: f64,
}

/// Top-down channel from one chunk to its microfeatures.
#[derive(Clone, Debug)]
pub struct TopDown {
	chunk: ChunkId,
	targets: SmallVec<[TopDownTarget; 4]>,
}

impl TopDown {
	/// Bind a top-down channel to `chunk`.
	#[must_use]
	pub fn new(chunk: &Chunk) -> Self {
		let counts = Self::count_values(chunk.microfeatures());

		#[allow(clippy::cast_precision_loss)]
		let targets = chunk
			.weighted_features()
			.map(|(feature, weight)| TopDownTarget {
				feature: feature.clone(),
				weight,
				count: counts[feature.dimension()] as f64,
			})
			.collect();

		Self {
			chunk: chunk.id(),
			targets,
		}
	}

	/// Count the microfeatures falling in each dimension.
	#[must_use]
	pub fn count_values(microfeatures: &[Microfeature]) -> BTreeMap<Dimension, usize> {
		let mut counts = BTreeMap::new();
		for f in microfeatures {
			*counts.entry(f.dimension().clone()).or_insert(0) += 1;
		}
		counts
	}

	/// Source chunk of this channel.
	#[must_use]
	pub const fn chunk(&self) -> ChunkId {
		self.chunk
	}
}

impl Channel for TopDown {
	/// Returns an empty map when the source chunk is absent from `input`.
	fn propagate(&self, input: &ActivationMap) -> ActivationMap {
		let Some(strength) = input.chunk(self.chunk) else {
			return ActivationMap::new();
		};

		self.targets
			.iter()
			.map(|t| (t.feature.clone(), strength * t.weight / t.count))
			.collect()
	}
}

// ============================================================================
// Bottom-Up
// ============================================================================

/// Bottom-up channel from microfeatures to one chunk.
#[derive(Clone, Debug)]
pub struct BottomUp {
	chunk: ChunkId,
	// Sorted by dimension, so same-dimension features are adjacent.
	features: SmallVec<[(Microfeature, f64); 4]>,
	divisor: f64,
}

impl BottomUp {
	/// Bind a bottom-up channel to `chunk`.
	#[must_use]
	pub fn new(chunk: &Chunk) -> Self {
		Self {
			chunk: chunk.id(),
			features: chunk
				.weighted_features()
				.map(|(f, w)| (f.clone(), w))
				.collect(),
			divisor: chunk.total_weight().powf(BOTTOM_UP_EXPONENT),
		}
	}

	/// Target chunk of this channel.
	#[must_use]
	pub const fn chunk(&self) -> ChunkId {
		self.chunk
	}

	/// Chunk strength supported by the microfeature activations in `input`.
	#[must_use]
	pub fn strength(&self, input: &ActivationMap) -> f64 {
		// (dimension, weight, max activation) for dimensions with evidence
		let mut dim2activation: SmallVec<[(&Dimension, f64, f64); 4]> = SmallVec::new();

		for (feature, weight) in &self.features {
			let Some(activation) = input.feature(feature) else {
				continue;
			};
			if let Some((dim, _, max)) = dim2activation.last_mut() {
				if *dim == feature.dimension() {
					if *max < activation {
						*max = activation;
					}
					continue;
				}
			}
			dim2activation.push((feature.dimension(), *weight, activation));
		}

		let evidence: f64 = dim2activation.iter().map(|&(_, w, a)| w * a).sum();
		evidence / self.divisor
	}
}

impl Channel for BottomUp {
	fn propagate(&self, input: &ActivationMap) -> ActivationMap {
		std::iter::once((self.chunk, self.strength(input))).collect()
	}
}
