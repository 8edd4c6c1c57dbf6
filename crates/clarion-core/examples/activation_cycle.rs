//! Activation Cycle Example
//!
//! One pass of a simple agent: sensory microfeatures are recognized as
//! chunks, rules turn chunks into action proposals, and a Boltzmann selector
//! picks an action. The chosen action's statistics are then updated.
//!
//! Run with: `cargo run --example activation_cycle`

use clarion_core::{
	ActivationMap, Bla, BoltzmannSelector, BottomUp, Channel, Chunk, ChunkId, ChunkSelector,
	Dimension, Junction, MatchStatistics, MaxJunction, Microfeature, Result, Rule, TopDown,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const FRUIT: ChunkId = ChunkId(1);
const BALL: ChunkId = ChunkId(2);
const EAT: ChunkId = ChunkId(10);
const THROW: ChunkId = ChunkId(11);

fn main() -> Result<()> {
	println!("=== Activation Cycle ===\n");

	let red = Microfeature::new("Color", "Red");
	let green = Microfeature::new("Color", "Green");
	let round = Microfeature::new("Shape", "Round");
	let soft = Microfeature::new("Texture", "Soft");
	let rubbery = Microfeature::new("Texture", "Rubbery");

	// Texture matters most for telling fruit from a ball.
	let fruit = Chunk::new(
		FRUIT,
		[red.clone(), green.clone(), round.clone(), soft.clone()],
		[
			(Dimension::from("Color"), 0.5),
			(Dimension::from("Shape"), 0.5),
			(Dimension::from("Texture"), 1.0),
		],
	)?;
	let ball = Chunk::with_uniform_weights(BALL, [red.clone(), round.clone(), rubbery])?;

	// What the agent perceives: something red, round and soft
	let sensory: ActivationMap = [(red, 1.0), (round, 1.0), (soft, 0.9)].into_iter().collect();

	println!("Bottom-up recognition:");
	let recognized = MaxJunction.combine(&[
		BottomUp::new(&fruit).propagate(&sensory),
		BottomUp::new(&ball).propagate(&sensory),
	]);
	for (name, id) in [("fruit", FRUIT), ("ball", BALL)] {
		println!("  {name:<6} {:.3}", recognized.chunk(id).unwrap_or(0.0));
	}

	println!("\nTop-down expectation from 'fruit':");
	let expected = TopDown::new(&fruit).propagate(&recognized);
	let mut features: Vec<_> = expected.iter().collect();
	features.sort_by(|a, b| a.0.to_string().cmp(&b.0.to_string()));
	for (feature, activation) in features {
		println!("  {:<20} {activation:.3}", feature.to_string());
	}

	let rules = [Rule::new([(FRUIT, 1.0)], EAT), Rule::new([(BALL, 1.0)], THROW)];
	let proposals: Vec<ActivationMap> = rules.iter().map(|r| r.propagate(&recognized)).collect();
	let actions = MaxJunction.combine(&proposals);

	let selector = BoltzmannSelector::new([EAT, THROW], 0.1)?;
	println!("\nAction distribution (T = {}):", selector.temperature());
	for (id, probability) in selector.distribution(&actions)? {
		println!("  {:<10} {probability:.3}", id.to_string());
	}

	let mut rng = StdRng::seed_from_u64(2016);
	let chosen = selector.select(&actions, &mut rng)?;
	println!("\nChosen: {chosen:?}");

	// The driver records the use and the outcome.
	let mut usage = Bla::default();
	let mut outcomes = MatchStatistics::new();
	usage.update(1.0);
	outcomes.update(chosen.contains(&EAT));

	for t in [2.0, 5.0, 20.0] {
		println!(
			"  BLA at t={t:>4}: {:.3} (below density: {})",
			usage.compute_bla(t)?,
			usage.below_density(t)?
		);
	}
	outcomes.discount(0.9);
	println!(
		"  Matches: +{:.2} / -{:.2}",
		outcomes.positive(),
		outcomes.negative()
	);

	Ok(())
}
