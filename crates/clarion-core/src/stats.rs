//! Usage Statistics
//!
//! Records attached to chunks, rules, and other constructs by their owner.
//! They know nothing about the construct they describe; the owner decides
//! when a use or an outcome has happened.
//!
//! Base-level activation (power-law decay over recorded uses):
//! ```text
//! B(t) = b + c × Σ_k (t - t_k)^(-d)
//! ```
//!
//! Match statistics: positive and negative outcome counters, discounted
//! multiplicatively over time.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::{ClarionError, Result};

// ============================================================================
// Base-Level Activation
// ============================================================================

/// Parameters of a base-level activation record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlaConfig {
	/// `b` - activation before any recorded use
	pub initial_activation: f64,
	/// `c` - amplitude of the decaying use traces
	pub amplitude: f64,
	/// `d` - power-law decay rate
	pub decay_rate: f64,
	/// Threshold below which the construct counts as not retrievable
	pub density: f64,
}

impl Default for BlaConfig {
	fn default() -> Self {
		Self {
			initial_activation: 0.0,
			amplitude: 2.0,
			decay_rate: 0.5,
			density: 0.0,
		}
	}
}

/// Base-level activation record: a parameter set plus recorded use times.
///
/// No timestamp is recorded at creation; call [`Bla::update`] for that.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bla {
	config: BlaConfig,
	timestamps: Vec<f64>,
}

impl Bla {
	/// Create an empty record.
	#[must_use]
	pub const fn new(config: BlaConfig) -> Self {
		Self {
			config,
			timestamps: Vec::new(),
		}
	}

	/// Record a use at `current_time`.
	///
	/// Timestamps are not required to be increasing.
	pub fn update(&mut self, current_time: f64) {
		trace!(current_time, uses = self.timestamps.len() + 1, "bla update");
		self.timestamps.push(current_time);
	}

	/// Base-level activation at `current_time`.
	///
	/// # Errors
	///
	/// - [`ClarionError::CoincidentTimestamp`] if `current_time` equals a
	///   recorded timestamp (zero elapsed time has no finite trace)
	/// - [`ClarionError::TimestampAfterQuery`] if `current_time` precedes a
	///   recorded timestamp
	pub fn compute_bla(&self, current_time: f64) -> Result<f64> {
		let mut summation = 0.0;

		for &timestamp in &self.timestamps {
			let elapsed = current_time - timestamp;
			match elapsed.partial_cmp(&0.0) {
				Some(Ordering::Equal) => {
					return Err(ClarionError::CoincidentTimestamp { timestamp });
				}
				Some(Ordering::Less) => {
					return Err(ClarionError::TimestampAfterQuery {
						timestamp,
						current_time,
					});
				}
				Some(Ordering::Greater) | None => {
					summation += elapsed.powf(-self.config.decay_rate);
				}
			}
		}

		Ok(self
			.config
			.amplitude
			.mul_add(summation, self.config.initial_activation))
	}

	/// Whether base-level activation at `current_time` is below density.
	///
	/// # Errors
	///
	/// Same as [`Bla::compute_bla`].
	pub fn below_density(&self, current_time: f64) -> Result<bool> {
		Ok(self.compute_bla(current_time)? < self.config.density)
	}

	/// Recorded use times, in recording order.
	#[must_use]
	pub fn timestamps(&self) -> &[f64] {
		&self.timestamps
	}

	/// Record parameters.
	#[must_use]
	pub const fn config(&self) -> &BlaConfig {
		&self.config
	}

	/// Change the retrieval density threshold.
	pub fn set_density(&mut self, density: f64) {
		self.config.density = density;
	}
}

// ============================================================================
// Match Statistics
// ============================================================================

/// Positive and negative match counters.
///
/// Deciding whether a match is positive, and combining the counters into a
/// score, is up to the owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
	positive: f64,
	negative: f64,
}

impl MatchStatistics {
	/// Create counters at zero.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			positive: 0.0,
			negative: 0.0,
		}
	}

	/// Count one positive or negative match.
	pub fn update(&mut self, positive_match: bool) {
		if positive_match {
			self.positive += 1.0;
		} else {
			self.negative += 1.0;
		}
		trace!(positive = self.positive, negative = self.negative, "match update");
	}

	/// Multiply both counters by `multiplier`.
	///
	/// Multipliers outside `[0, 1]` are applied as given.
	pub fn discount(&mut self, multiplier: f64) {
		if !(0.0..=1.0).contains(&multiplier) {
			warn!(multiplier, "match statistics discount outside [0, 1]");
		}
		self.positive *= multiplier;
		self.negative *= multiplier;
	}

	/// Positive match count.
	#[must_use]
	pub const fn positive(&self) -> f64 {
		self.positive
	}

	/// Negative match count.
	#[must_use]
	pub const fn negative(&self) -> f64 {
		self.negative
	}
}
