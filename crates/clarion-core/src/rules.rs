//! Associative Rules
//!
//! A rule `c1 c2 c3 -> c4` drives its conclusion chunk with the weighted sum
//! of its condition chunk strengths:
//!
//! ```text
//! s(conclusion) = Σ_c w(c) × s(c)
//! ```
//!
//! Absent conditions count as inactive. Weights are not normalized.

use std::collections::BTreeMap;

use crate::channels::Channel;
use crate::nodes::{ActivationMap, ChunkId};

/// Weighted condition chunks leading to one conclusion chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
	chunk2weight: BTreeMap<ChunkId, f64>,
	conclusion: ChunkId,
}

impl Rule {
	/// Create a rule from condition weights and a conclusion chunk.
	pub fn new(chunk2weight: impl IntoIterator<Item = (ChunkId, f64)>, conclusion: ChunkId) -> Self {
		Self {
			chunk2weight: chunk2weight.into_iter().collect(),
			conclusion,
		}
	}

	/// Conclusion chunk.
	#[must_use]
	pub const fn conclusion(&self) -> ChunkId {
		self.conclusion
	}

	/// Condition chunks and their weights.
	#[must_use]
	pub const fn conditions(&self) -> &BTreeMap<ChunkId, f64> {
		&self.chunk2weight
	}

	/// Conclusion strength given condition strengths in `input`.
	#[must_use]
	pub fn strength(&self, input: &ActivationMap) -> f64 {
		self.chunk2weight
			.iter()
			.filter_map(|(&chunk, &weight)| input.chunk(chunk).map(|s| s * weight))
			.sum()
	}
}

impl Channel for Rule {
	fn propagate(&self, input: &ActivationMap) -> ActivationMap {
		std::iter::once((self.conclusion, self.strength(input))).collect()
	}
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
	use super::*;

	const C1: ChunkId = ChunkId(1);
	const C2: ChunkId = ChunkId(2);
	const C3: ChunkId = ChunkId(3);

	fn rule() -> Rule {
		Rule::new([(C1, 0.5), (C2, 0.5)], C3)
	}

	#[test]
	fn test_rule_weighted_sum() {
		let rule = rule();
		let cases: [(&[(ChunkId, f64)], f64); 5] = [
			(&[(C1, 0.0), (C2, 0.0)], 0.0),
			(&[(C1, 0.0), (C2, 1.0)], 0.5),
			(&[(C1, 0.0), (C2, 1.0), (C3, 1.0)], 0.5),
			(&[(C1, 0.5), (C2, 1.0)], 0.75),
			(&[(C1, 1.0), (C2, 1.0)], 1.0),
		];

		for (input, expected) in cases {
			let input: ActivationMap = input.iter().copied().collect();
			let output = rule.propagate(&input);
			assert_eq!(output.len(), 1);
			let strength = output.chunk(C3).unwrap_or(f64::NAN);
			assert!((strength - expected).abs() < 1e-10, "{input:?} -> {strength}");
		}
	}

	#[test]
	fn test_rule_missing_condition_is_inactive() {
		let rule = rule();
		let input: ActivationMap = [(C2, 0.8)].into_iter().collect();
		assert!((rule.strength(&input) - 0.4).abs() < 1e-10);
		assert_eq!(rule.strength(&ActivationMap::new()), 0.0);
	}

	#[test]
	fn test_rule_no_normalization() {
		let rule = Rule::new([(C1, 2.0), (C2, 3.0)], C3);
		let input: ActivationMap = [(C1, 1.0), (C2, 1.0)].into_iter().collect();
		assert!((rule.strength(&input) - 5.0).abs() < 1e-10);
	}
}
