use std::hash::{Hash, Hasher};

use rand::prelude::*;

use crate::GameRng;

/// Construct a throwaway random number generator seeded by a noise value.
///
/// The same seed value always produces the same generator, so eg. a realm
/// seed paired with a region coordinate gives that region its own stream
/// that does not depend on the order regions are generated in.
pub fn srng(seed: &(impl Hash + ?Sized)) -> GameRng {
    let mut h = crate::FastHasher::default();
    seed.hash(&mut h);
    GameRng::seed_from_u64(h.finish())
}

/// Roll `n` dice with `sides` sides and sum the result.
pub fn dice(rng: &mut (impl Rng + ?Sized), n: u32, sides: u32) -> u32 {
    if sides == 0 {
        return 0;
    }
    (0..n).map(|_| rng.gen_range(1..=sides)).sum()
}

pub trait RngExt {
    fn one_chance_in(&mut self, n: usize) -> bool;

    /// Roll d100 against a percentage.
    fn percent_chance(&mut self, pc: u32) -> bool;
}

impl<T: Rng + ?Sized> RngExt for T {
    fn one_chance_in(&mut self, n: usize) -> bool {
        if n == 0 {
            return false;
        }
        self.gen_range(0..n) == 0
    }

    fn percent_chance(&mut self, pc: u32) -> bool {
        self.gen_range(0..100) < pc
    }
}
