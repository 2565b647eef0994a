//! Discovery Order Shuffling
//!
//! Cases, groups and bench commands are permuted once right after discovery so
//! that no report consumer comes to depend on filesystem order. The permutation
//! is injectable: tests pass `ShuffleOrder::Preserve` (or their own `Shuffler`)
//! to get a stable order.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{SeedableRng, thread_rng};

/// Something that permutes a freshly discovered list in place
pub trait Shuffler {
    /// Reorder `items`
    fn shuffle<T>(&self, items: &mut [T]);
}

/// Built-in shuffling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShuffleOrder {
    /// Fresh randomness on every call
    #[default]
    Random,
    /// Reproducible permutation derived from a seed
    Seeded(u64),
    /// Keep discovery order (sorted by name)
    Preserve,
}

impl ShuffleOrder {
    /// `Seeded` when a seed is given, `Random` otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map(ShuffleOrder::Seeded).unwrap_or_default()
    }
}

impl Shuffler for ShuffleOrder {
    fn shuffle<T>(&self, items: &mut [T]) {
        match self {
            ShuffleOrder::Random => items.shuffle(&mut thread_rng()),
            ShuffleOrder::Seeded(seed) => items.shuffle(&mut StdRng::seed_from_u64(*seed)),
            ShuffleOrder::Preserve => {}
        }
    }
}

impl<S: Shuffler> Shuffler for &S {
    fn shuffle<T>(&self, items: &mut [T]) {
        (**self).shuffle(items)
    }
}
