//! # Clarion Core
//!
//! Activation propagation and action selection for a dual-representation
//! cognitive architecture: symbolic chunks built from sub-symbolic
//! (dimension, value) microfeatures.
//!
//! ## Core Concepts
//!
//! ### Propagation
//!
//! Activation maps flow through channels, each a pure function from one map
//! to another:
//!
//! 1. **Top-down** - a chunk drives its microfeatures, splitting each
//!    dimension's weight evenly among that dimension's values
//!    ```text
//!    a(f) = s × w(dim f) / n(dim f)
//!    ```
//!
//! 2. **Bottom-up** - microfeatures drive a chunk, taking the strongest value
//!    per dimension and penalizing many-dimension chunks
//!    ```text
//!    s = Σ_D w(d) × max a(f) / (Σ w(d))^1.1
//!    ```
//!
//! 3. **Rules** - condition chunks drive a conclusion chunk
//!    ```text
//!    s(conclusion) = Σ w(c) × s(c)
//!    ```
//!
//! A junction merges the outputs of several channels into one map.
//!
//! ### Selection
//!
//! A Boltzmann selector draws one actionable chunk with probability
//! proportional to `e^(s/T)`.
//!
//! ### Statistics
//!
//! Base-level activation tracks recency and frequency of use with power-law
//! decay; match statistics count positive and negative outcomes.
//!
//! ## Example
//!
//! ```rust
//! use clarion_core::{
//!     ActivationMap, BottomUp, BoltzmannSelector, Channel, ChunkId, ChunkSelector, Chunk,
//!     Junction, MaxJunction, Microfeature, Rule,
//! };
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let white = Microfeature::new("Color", "White");
//! let square = Microfeature::new("Shape", "Square");
//! let white_square =
//!     Chunk::with_uniform_weights(ChunkId(1), [white.clone(), square.clone()]).unwrap();
//!
//! // Sensory input over microfeatures
//! let sensory: ActivationMap = [(white, 1.0), (square, 1.0)].into_iter().collect();
//!
//! // Bottom-up recognition, then a rule "white square -> press"
//! let recognized = BottomUp::new(&white_square).propagate(&sensory);
//! let press = Rule::new([(ChunkId(1), 1.0)], ChunkId(10)).propagate(&recognized);
//!
//! let combined = MaxJunction.combine([&recognized, &press]);
//!
//! let selector = BoltzmannSelector::new([ChunkId(10), ChunkId(11)], 0.1).unwrap();
//! let mut rng = StdRng::seed_from_u64(0);
//! let action = selector.select(&combined, &mut rng).unwrap();
//! assert_eq!(action.len(), 1);
//! ```
//!
//! ## References
//!
//! - Sun, R. (2016). *Anatomy of the Mind* - Clarion theory, chapter 3

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channels;
pub mod error;
pub mod junction;
pub mod nodes;
pub mod rules;
pub mod selection;
pub mod stats;

pub use channels::{BottomUp, Channel, TopDown, BOTTOM_UP_EXPONENT};
pub use error::{ClarionError, Result};
pub use junction::{Junction, MaxJunction};
pub use nodes::{get_nodes, ActivationMap, Chunk, ChunkId, Dimension, Microfeature, Node};
pub use rules::Rule;
pub use selection::{BoltzmannSelector, ChunkSelector, ChunkSet, SelectorConfig};
pub use stats::{Bla, BlaConfig, MatchStatistics};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use rand::rngs::StdRng;
	use rand::SeedableRng;

	use super::*;

	#[test]
	fn test_full_cycle() {
		let white = Microfeature::new("Color", "White");
		let black = Microfeature::new("Color", "Black");
		let square = Microfeature::new("Shape", "Square");

		let white_square =
			Chunk::with_uniform_weights(ChunkId(1), [white.clone(), square.clone()]).unwrap();
		let black_square =
			Chunk::with_uniform_weights(ChunkId(2), [black, square.clone()]).unwrap();

		let sensory: ActivationMap = [(white, 1.0), (square, 1.0)].into_iter().collect();

		let channels: Vec<Box<dyn Channel>> = vec![
			Box::new(BottomUp::new(&white_square)),
			Box::new(BottomUp::new(&black_square)),
		];
		let recognized: Vec<ActivationMap> =
			channels.iter().map(|c| c.propagate(&sensory)).collect();
		let chunks = MaxJunction.combine(&recognized);

		let white_strength = chunks.chunk(ChunkId(1)).unwrap();
		let black_strength = chunks.chunk(ChunkId(2)).unwrap();
		assert!(white_strength > black_strength);

		// Both chunks propose an action; the better-recognized one dominates.
		let rules = [
			Rule::new([(ChunkId(1), 1.0)], ChunkId(10)),
			Rule::new([(ChunkId(2), 1.0)], ChunkId(11)),
		];
		let proposals: Vec<ActivationMap> = rules.iter().map(|r| r.propagate(&chunks)).collect();
		let actions = MaxJunction.combine(&proposals);

		let selector = BoltzmannSelector::new([ChunkId(10), ChunkId(11)], 1e-3).unwrap();
		let mut rng = StdRng::seed_from_u64(17);
		let chosen = selector.select(&actions, &mut rng).unwrap();
		assert_eq!(chosen, ChunkSet::from([ChunkId(10)]));

		// Using the chunk feeds its statistics.
		let mut bla = Bla::default();
		bla.update(1.0);
		assert!(!bla.below_density(2.0).unwrap());

		// Top-down feedback reconstructs the chosen chunk's microfeatures.
		let feedback = TopDown::new(&white_square).propagate(&chunks);
		assert_eq!(feedback.len(), 2);
	}
}
