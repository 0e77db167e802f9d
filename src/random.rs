use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const MULTIPLIER_A: i64 = 1103515245;
const INCREMENT_C: i64 = 12345;
const DEFAULT_SEED: i64 = 3819201;

/// Source of randomness for expansion, rollouts and worker seeding.
///
/// Every search worker owns its own generator, created through [`RandomGenerator::from_seed`]
/// with a seed drawn from the move selector, so parallel trees are not correlated.
pub trait RandomGenerator: Default + Send {
    /// Creates a generator from an explicit seed.
    fn from_seed(seed: u64) -> Self;

    /// Returns a raw 64-bit value, used to seed further generators.
    fn next_seed(&mut self) -> u64;

    /// Returns a number in `from..to`. `to` must be greater than `from`.
    fn next_range(&mut self, from: usize, to: usize) -> usize;

    /// Picks a uniformly random element, or `None` for an empty slice.
    fn get_random_from_slice<'a, K>(&mut self, items: &'a [K]) -> Option<&'a K> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_range(0, items.len()))
    }
}

/// Fast non-cryptographic generator, seeded from the OS by default.
pub struct StandardRandomGenerator {
    rng: SmallRng,
}

impl Default for StandardRandomGenerator {
    fn default() -> Self {
        StandardRandomGenerator {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl RandomGenerator for StandardRandomGenerator {
    fn from_seed(seed: u64) -> Self {
        StandardRandomGenerator {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn next_seed(&mut self) -> u64 {
        self.rng.random()
    }

    fn next_range(&mut self, from: usize, to: usize) -> usize {
        self.rng.random_range(from..to)
    }
}

/// Linear congruential generator with a fixed default seed.
///
/// Produces the same sequence on every platform, which makes whole searches reproducible in tests.
pub struct CustomNumberGenerator {
    seed: i64,
}

impl Default for CustomNumberGenerator {
    fn default() -> Self {
        CustomNumberGenerator::new(DEFAULT_SEED)
    }
}

impl CustomNumberGenerator {
    pub const fn new(seed: i64) -> Self {
        Self { seed }
    }

    fn next(&mut self) -> u32 {
        self.seed = (self.seed * MULTIPLIER_A + INCREMENT_C).rem_euclid(i32::MAX as i64);
        self.seed as u32
    }
}

impl RandomGenerator for CustomNumberGenerator {
    fn from_seed(seed: u64) -> Self {
        CustomNumberGenerator::new((seed % i32::MAX as u64) as i64)
    }

    fn next_seed(&mut self) -> u64 {
        let high = self.next() as u64;
        let low = self.next() as u64;
        (high << 32) | low
    }

    fn next_range(&mut self, from: usize, to: usize) -> usize {
        from + (self.next() as usize) % (to - from)
    }
}

#[cfg(test)]
mod tests {
    use crate::random::{CustomNumberGenerator, RandomGenerator, StandardRandomGenerator};

    #[test]
    fn custom_generator_is_reproducible() {
        // arrange
        let mut first = CustomNumberGenerator::new(42);
        let mut second = CustomNumberGenerator::from_seed(42);

        // act
        let a: Vec<usize> = (0..20).map(|_| first.next_range(0, 10)).collect();
        let b: Vec<usize> = (0..20).map(|_| second.next_range(0, 10)).collect();

        // assert
        assert_eq!(a, b);
        assert!(a.iter().all(|&x| x < 10));
    }

    #[test]
    fn ranges_respect_bounds() {
        let mut custom = CustomNumberGenerator::default();
        let mut standard = StandardRandomGenerator::from_seed(7);
        for _ in 0..1000 {
            let x = custom.next_range(3, 8);
            let y = standard.next_range(3, 8);
            assert!((3..8).contains(&x));
            assert!((3..8).contains(&y));
        }
    }

    #[test]
    fn seeded_standard_generators_agree() {
        let mut first = StandardRandomGenerator::from_seed(1234);
        let mut second = StandardRandomGenerator::from_seed(1234);
        for _ in 0..10 {
            assert_eq!(first.next_seed(), second.next_seed());
        }
    }

    #[test]
    fn random_from_slice() {
        let mut crg = CustomNumberGenerator::default();
        let empty: [u8; 0] = [];
        assert!(crg.get_random_from_slice(&empty).is_none());

        let vec = vec![432, 6542, 534, 6, 13];
        for _ in 0..50 {
            let picked = crg.get_random_from_slice(&vec).copied();
            assert!(picked.is_some_and(|x| vec.contains(&x)));
        }
    }
}
