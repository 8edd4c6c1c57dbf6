//! Activation Junctions
//!
//! A junction merges several activation maps (channel outputs, rule outputs,
//! external input) into one. Maps lacking a node simply do not vote on it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::nodes::{ActivationMap, Node};

/// Combination policy over activation maps.
pub trait Junction {
	/// Merge `maps` into a single activation map.
	fn combine<'a, I>(&self, maps: I) -> ActivationMap
	where
		I: IntoIterator<Item = &'a ActivationMap>;
}

/// Keeps, per node, the maximum activation found in any input map.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxJunction;

impl Junction for MaxJunction {
	fn combine<'a, I>(&self, maps: I) -> ActivationMap
	where
		I: IntoIterator<Item = &'a ActivationMap>,
	{
		let mut activations: HashMap<Node, f64> = HashMap::new();

		for map in maps {
			for (node, activation) in map.iter() {
				match activations.entry(node.clone()) {
					Entry::Occupied(mut entry) => {
						if *entry.get() < activation {
							let _ = entry.insert(activation);
						}
					}
					Entry::Vacant(entry) => {
						let _ = entry.insert(activation);
					}
				}
			}
		}

		activations.into_iter().collect()
	}
}
