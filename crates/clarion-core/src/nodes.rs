//! Node Model
//!
//! Chunks are symbolic units built from microfeatures, each microfeature a
//! (dimension, value) pair. Activation maps assign a real strength to any mix
//! of chunks and microfeatures.
//!
//! Chunks are keyed by [`ChunkId`]; microfeatures compare structurally, so two
//! separately constructed `(Color, White)` features are the same map key.

use std::collections::{hash_map, BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ClarionError, Result};

/// Inline capacity for a chunk's microfeatures.
pub(crate) type FeatureVec = SmallVec<[Microfeature; 4]>;

// ============================================================================
// Dimensions and Microfeatures
// ============================================================================

/// A named axis grouping mutually exclusive microfeature values.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dimension(Arc<str>);

impl Dimension {
	/// Create a dimension from its label.
	pub fn new(label: impl Into<Arc<str>>) -> Self {
		Self(label.into())
	}

	/// The dimension label.
	#[must_use]
	pub fn label(&self) -> &str {
		&self.0
	}
}

impl From<&str> for Dimension {
	fn from(label: &str) -> Self {
		Self::new(label)
	}
}

impl From<String> for Dimension {
	fn from(label: String) -> Self {
		Self::new(label)
	}
}

impl fmt::Display for Dimension {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// An immutable (dimension, value) pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Microfeature {
	dimension: Dimension,
	value: Arc<str>,
}

impl Microfeature {
	/// Create a microfeature.
	pub fn new(dimension: impl Into<Dimension>, value: impl Into<Arc<str>>) -> Self {
		Self {
			dimension: dimension.into(),
			value: value.into(),
		}
	}

	/// Dimension this microfeature belongs to.
	#[must_use]
	pub const fn dimension(&self) -> &Dimension {
		&self.dimension
	}

	/// Value within the dimension.
	#[must_use]
	pub fn value(&self) -> &str {
		&self.value
	}
}

impl fmt::Display for Microfeature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}, {})", self.dimension, self.value)
	}
}

// ============================================================================
// Chunks
// ============================================================================

/// Stable identity of a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId(pub u64);

impl fmt::Display for ChunkId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "chunk#{}", self.0)
	}
}

/// A symbolic unit: a set of microfeatures plus a weight per dimension.
///
/// Construction validates that every microfeature dimension carries a finite,
/// non-negative weight, so downstream weight lookups cannot fail.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
	id: ChunkId,
	microfeatures: FeatureVec,
	dim2weight: BTreeMap<Dimension, f64>,
}

impl Chunk {
	/// Build a chunk from its microfeatures and dimension weights.
	///
	/// Duplicate microfeatures collapse into one.
	///
	/// # Errors
	///
	/// - [`ClarionError::EmptyChunk`] if `microfeatures` is empty
	/// - [`ClarionError::InvalidWeight`] for a negative or non-finite weight
	/// - [`ClarionError::MissingWeight`] if a microfeature dimension has no weight
	/// - [`ClarionError::ZeroTotalWeight`] if all weights are zero
	pub fn new<F, W>(id: ChunkId, microfeatures: F, dim2weight: W) -> Result<Self>
	where
		F: IntoIterator<Item = Microfeature>,
		W: IntoIterator<Item = (Dimension, f64)>,
	{
		let mut features: FeatureVec = microfeatures.into_iter().collect();
		features.sort_unstable();
		features.dedup();

		if features.is_empty() {
			return Err(ClarionError::EmptyChunk(id));
		}

		let dim2weight: BTreeMap<Dimension, f64> = dim2weight.into_iter().collect();

		for (dimension, &weight) in &dim2weight {
			if !weight.is_finite() || weight < 0.0 {
				return Err(ClarionError::InvalidWeight {
					chunk: id,
					dimension: dimension.clone(),
					weight,
				});
			}
		}

		if let Some(f) = features
			.iter()
			.find(|f| !dim2weight.contains_key(f.dimension()))
		{
			return Err(ClarionError::MissingWeight {
				chunk: id,
				dimension: f.dimension().clone(),
			});
		}

		if dim2weight.values().sum::<f64>() <= 0.0 {
			return Err(ClarionError::ZeroTotalWeight(id));
		}

		Ok(Self {
			id,
			microfeatures: features,
			dim2weight,
		})
	}

	/// Build a chunk giving every dimension present a weight of 1.0.
	///
	/// # Errors
	///
	/// [`ClarionError::EmptyChunk`] if `microfeatures` is empty.
	pub fn with_uniform_weights<F>(id: ChunkId, microfeatures: F) -> Result<Self>
	where
		F: IntoIterator<Item = Microfeature>,
	{
		let features: FeatureVec = microfeatures.into_iter().collect();
		let weights: Vec<(Dimension, f64)> = features
			.iter()
			.map(|f| (f.dimension().clone(), 1.0))
			.collect();
		Self::new(id, features, weights)
	}

	/// Chunk identity.
	#[must_use]
	pub const fn id(&self) -> ChunkId {
		self.id
	}

	/// Microfeatures in sorted order, without duplicates.
	#[must_use]
	pub fn microfeatures(&self) -> &[Microfeature] {
		&self.microfeatures
	}

	/// Dimension weights.
	#[must_use]
	pub const fn dim2weight(&self) -> &BTreeMap<Dimension, f64> {
		&self.dim2weight
	}

	/// Weight of one dimension, if the chunk defines it.
	#[must_use]
	pub fn weight(&self, dimension: &Dimension) -> Option<f64> {
		self.dim2weight.get(dimension).copied()
	}

	/// Dimensions carrying a weight.
	pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
		self.dim2weight.keys()
	}

	/// Sum of all dimension weights.
	#[must_use]
	pub fn total_weight(&self) -> f64 {
		self.dim2weight.values().sum()
	}

	/// Microfeatures paired with the weight of their dimension.
	pub fn weighted_features(&self) -> impl Iterator<Item = (&Microfeature, f64)> {
		// Every microfeature dimension has a weight, checked in `Chunk::new`.
		self.microfeatures
			.iter()
			.map(move |f| (f, self.dim2weight[f.dimension()]))
	}
}

// ============================================================================
// Activation Maps
// ============================================================================

/// Key of an activation map.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Node {
	/// A chunk, by identity
	Chunk(ChunkId),
	/// A microfeature, by value
	Microfeature(Microfeature),
}

impl From<ChunkId> for Node {
	fn from(id: ChunkId) -> Self {
		Self::Chunk(id)
	}
}

impl From<&Chunk> for Node {
	fn from(chunk: &Chunk) -> Self {
		Self::Chunk(chunk.id())
	}
}

impl From<Microfeature> for Node {
	fn from(feature: Microfeature) -> Self {
		Self::Microfeature(feature)
	}
}

impl From<&Microfeature> for Node {
	fn from(feature: &Microfeature) -> Self {
		Self::Microfeature(feature.clone())
	}
}

impl fmt::Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Chunk(id) => fmt::Display::fmt(id, f),
			Self::Microfeature(feature) => fmt::Display::fmt(feature, f),
		}
	}
}

/// Partial mapping from nodes to activation strengths.
///
/// An absent node means "unspecified"; readers pick the default that fits
/// them through [`ActivationMap::get_or`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActivationMap(HashMap<Node, f64>);

impl ActivationMap {
	/// Create an empty map.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Create an empty map with room for `capacity` nodes.
	#[must_use]
	pub fn with_capacity(capacity: usize) -> Self {
		Self(HashMap::with_capacity(capacity))
	}

	/// Set the activation of a node, returning the previous value.
	pub fn insert(&mut self, node: impl Into<Node>, activation: f64) -> Option<f64> {
		self.0.insert(node.into(), activation)
	}

	/// Activation of a node, if specified.
	#[must_use]
	pub fn get(&self, node: &Node) -> Option<f64> {
		self.0.get(node).copied()
	}

	/// Activation of a node, or `default` when unspecified.
	#[must_use]
	pub fn get_or(&self, node: &Node, default: f64) -> f64 {
		self.get(node).unwrap_or(default)
	}

	/// Activation of a chunk, if specified.
	#[must_use]
	pub fn chunk(&self, id: ChunkId) -> Option<f64> {
		self.get(&Node::Chunk(id))
	}

	/// Activation of a microfeature, if specified.
	#[must_use]
	pub fn feature(&self, feature: &Microfeature) -> Option<f64> {
		self.get(&Node::from(feature))
	}

	/// Whether the node has a specified activation.
	#[must_use]
	pub fn contains(&self, node: &Node) -> bool {
		self.0.contains_key(node)
	}

	/// Number of specified nodes.
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether no node is specified.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterate over (node, activation) pairs in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = (&Node, f64)> {
		self.0.iter().map(|(node, &a)| (node, a))
	}

	/// Iterate over specified nodes.
	pub fn nodes(&self) -> impl Iterator<Item = &Node> {
		self.0.keys()
	}

	/// Iterate over the chunk entries only.
	pub fn chunk_strengths(&self) -> impl Iterator<Item = (ChunkId, f64)> + '_ {
		self.0.iter().filter_map(|(node, &a)| match node {
			Node::Chunk(id) => Some((*id, a)),
			Node::Microfeature(_) => None,
		})
	}

	/// Copy of this map keeping only the given chunks.
	#[must_use]
	pub fn restrict_to<'a>(&self, chunks: impl IntoIterator<Item = &'a ChunkId>) -> Self {
		chunks
			.into_iter()
			.filter_map(|&id| self.chunk(id).map(|a| (Node::Chunk(id), a)))
			.collect()
	}
}

impl<N: Into<Node>> FromIterator<(N, f64)> for ActivationMap {
	fn from_iter<I: IntoIterator<Item = (N, f64)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(n, a)| (n.into(), a)).collect())
	}
}

impl<N: Into<Node>> Extend<(N, f64)> for ActivationMap {
	fn extend<I: IntoIterator<Item = (N, f64)>>(&mut self, iter: I) {
		self.0.extend(iter.into_iter().map(|(n, a)| (n.into(), a)));
	}
}

impl IntoIterator for ActivationMap {
	type Item = (Node, f64);
	type IntoIter = hash_map::IntoIter<Node, f64>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

/// Union of the nodes specified by any of the given maps.
pub fn get_nodes<'a>(maps: impl IntoIterator<Item = &'a ActivationMap>) -> HashSet<Node> {
	maps.into_iter()
		.flat_map(|map| map.nodes())
		.cloned()
		.collect()
}
