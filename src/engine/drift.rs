//! Stand-in engine for running the viewer without the evolution backend.
//!
//! Agents walk along their heading with a small random wander, wrap around
//! the unit square and eat any food they touch. Fitness is food eaten.
//! There is no brain and no selection: every generation starts from a
//! fresh random population.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{Animal, Engine, FitnessStats, Food, WorldSnapshot};
use crate::core::config::EngineConfig;
use crate::core::error::Result;

pub struct DriftEngine {
    config: EngineConfig,
    rng: ChaCha8Rng,
    world: WorldSnapshot,
    /// Food eaten this generation, indexed like `world.animals`
    satiation: Vec<u32>,
    age: u64,
    seed: u64,
}

impl DriftEngine {
    /// Create an engine with a random population.
    ///
    /// Uses `config.seed` when set, otherwise draws a seed from the OS.
    pub fn new(config: EngineConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let foods = (0..config.foods).map(|_| random_food(&mut rng)).collect();
        let animals = (0..config.animals)
            .map(|_| random_animal(&mut rng))
            .collect();

        Self {
            satiation: vec![0; config.animals],
            world: WorldSnapshot::new(foods, animals),
            config,
            rng,
            age: 0,
            seed,
        }
    }

    /// Seed the RNG was built from, for reproducing a run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ticks into the running generation.
    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn satiation(&self) -> &[u32] {
        &self.satiation
    }

    fn process_collisions(&mut self) {
        let reach = self.config.eat_distance;
        for (animal, eaten) in self.world.animals.iter().zip(self.satiation.iter_mut()) {
            for food in &mut self.world.foods {
                let dx = animal.x - food.x;
                let dy = animal.y - food.y;
                if (dx * dx + dy * dy).sqrt() <= reach {
                    *food = random_food(&mut self.rng);
                    *eaten += 1;
                }
            }
        }
    }

    fn process_movements(&mut self) {
        let speed = self.config.speed;
        let max_turn = self.config.max_turn;
        for animal in &mut self.world.animals {
            if max_turn > 0.0 {
                animal.rotation += self.rng.gen_range(-max_turn..=max_turn);
            }
            animal.rotation = animal.rotation.rem_euclid(TAU);
            // rem_euclid rounds tiny negatives up to TAU itself
            if animal.rotation >= TAU {
                animal.rotation = 0.0;
            }
            animal.x = (animal.x + animal.rotation.cos() * speed).rem_euclid(1.0);
            animal.y = (animal.y + animal.rotation.sin() * speed).rem_euclid(1.0);
        }
    }

    fn evolve(&mut self) -> FitnessStats {
        let stats = FitnessStats::from_scores(self.satiation.iter().map(|&eaten| eaten as f32));

        self.age = 0;
        for animal in &mut self.world.animals {
            *animal = random_animal(&mut self.rng);
        }
        self.satiation.iter_mut().for_each(|eaten| *eaten = 0);

        // Reshuffle food so the boundary is visible on screen
        for food in &mut self.world.foods {
            *food = random_food(&mut self.rng);
        }

        stats
    }
}

impl Engine for DriftEngine {
    fn tick(&mut self) -> Result<Option<FitnessStats>> {
        self.process_collisions();
        self.process_movements();

        self.age += 1;
        if self.age >= self.config.generation_length {
            Ok(Some(self.evolve()))
        } else {
            Ok(None)
        }
    }

    fn force_generation(&mut self) -> Result<FitnessStats> {
        loop {
            if let Some(stats) = self.tick()? {
                return Ok(stats);
            }
        }
    }

    fn snapshot(&self) -> &WorldSnapshot {
        &self.world
    }
}

fn random_food(rng: &mut ChaCha8Rng) -> Food {
    Food::new(rng.gen(), rng.gen())
}

fn random_animal(rng: &mut ChaCha8Rng) -> Animal {
    Animal::new(rng.gen(), rng.gen(), rng.gen_range(0.0..TAU))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(generation_length: u64) -> DriftEngine {
        DriftEngine::new(EngineConfig {
            generation_length,
            seed: Some(42),
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_population_matches_config() {
        let engine = seeded(100);
        assert_eq!(engine.snapshot().animals.len(), 20);
        assert_eq!(engine.snapshot().foods.len(), 40);
        assert_eq!(engine.seed(), 42);
    }

    #[test]
    fn test_positions_stay_normalized() {
        let mut engine = seeded(10_000);
        for _ in 0..500 {
            engine.tick().unwrap();
        }
        for animal in &engine.snapshot().animals {
            assert!((0.0..=1.0).contains(&animal.x));
            assert!((0.0..=1.0).contains(&animal.y));
            assert!((0.0..TAU).contains(&animal.rotation));
        }
    }

    #[test]
    fn test_boundary_after_generation_length_ticks() {
        let mut engine = seeded(50);
        for _ in 0..49 {
            assert!(engine.tick().unwrap().is_none());
        }
        assert!(engine.tick().unwrap().is_some());
        assert_eq!(engine.age(), 0);
        assert!(engine.satiation().iter().all(|&eaten| eaten == 0));
    }

    #[test]
    fn test_force_generation_restarts_count() {
        let mut engine = seeded(50);
        for _ in 0..10 {
            engine.tick().unwrap();
        }
        let stats = engine.force_generation().unwrap();
        assert!(stats.min <= stats.avg && stats.avg <= stats.max);
        assert_eq!(engine.age(), 0);
        assert!(engine.tick().unwrap().is_none());
    }

    #[test]
    fn test_same_seed_same_world() {
        let mut a = seeded(100);
        let mut b = seeded(100);
        for _ in 0..25 {
            a.tick().unwrap();
            b.tick().unwrap();
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_agent_on_food_eats_it() {
        let mut engine = DriftEngine::new(EngineConfig {
            animals: 1,
            foods: 1,
            max_turn: 0.0,
            seed: Some(1),
            ..EngineConfig::default()
        });
        let animal = engine.world.animals[0];
        engine.world.foods[0] = Food::new(animal.x, animal.y);

        engine.tick().unwrap();
        assert_eq!(engine.satiation(), &[1]);
    }
}
