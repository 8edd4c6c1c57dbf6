//! Error types for activation, selection, and statistics.
//!
//! Only caller-contract violations and conditions the theory leaves undefined
//! are errors. A node missing from an activation map never is: each consumer
//! applies its own default.

use crate::nodes::{ChunkId, Dimension};

/// Errors raised by the activation engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClarionError {
	/// A chunk owns a microfeature whose dimension has no weight.
	#[error("chunk {chunk} has no weight for dimension `{dimension}`")]
	MissingWeight {
		/// Offending chunk
		chunk: ChunkId,
		/// Dimension without a weight entry
		dimension: Dimension,
	},

	/// A dimension weight is negative or not finite.
	#[error("chunk {chunk} has invalid weight {weight} for dimension `{dimension}`")]
	InvalidWeight {
		/// Offending chunk
		chunk: ChunkId,
		/// Dimension carrying the weight
		dimension: Dimension,
		/// The rejected weight
		weight: f64,
	},

	/// A chunk was defined without any microfeatures.
	#[error("chunk {0} has no microfeatures")]
	EmptyChunk(ChunkId),

	/// All dimension weights of a chunk are zero.
	#[error("chunk {0} has zero total dimension weight")]
	ZeroTotalWeight(ChunkId),

	/// A selector was built over an empty candidate set.
	#[error("selector has no candidate chunks")]
	NoCandidates,

	/// Selection temperature must be finite and strictly positive.
	#[error("invalid selection temperature {0}")]
	InvalidTemperature(f64),

	/// Strengths produced no valid probability distribution.
	#[error("selection distribution is undefined: {reason}")]
	DegenerateDistribution {
		/// Why the distribution could not be built
		reason: String,
	},

	/// Base-level activation was queried at the instant of a recorded use.
	#[error("base-level activation queried at recorded timestamp {timestamp}")]
	CoincidentTimestamp {
		/// The timestamp equal to the query time
		timestamp: f64,
	},

	/// Base-level activation was queried before a recorded use.
	#[error("base-level activation queried at {current_time}, before recorded timestamp {timestamp}")]
	TimestampAfterQuery {
		/// The recorded timestamp
		timestamp: f64,
		/// The query time
		current_time: f64,
	},
}

impl ClarionError {
	/// Check if this error comes from an ill-formed chunk definition.
	#[must_use]
	pub const fn is_node_model(&self) -> bool {
		matches!(
			self,
			Self::MissingWeight { .. }
				| Self::InvalidWeight { .. }
				| Self::EmptyChunk(_)
				| Self::ZeroTotalWeight(_)
		)
	}

	/// Check if this error comes from querying a statistic at an invalid time.
	#[must_use]
	pub const fn is_timing(&self) -> bool {
		matches!(
			self,
			Self::CoincidentTimestamp { .. } | Self::TimestampAfterQuery { .. }
		)
	}
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, ClarionError>;
