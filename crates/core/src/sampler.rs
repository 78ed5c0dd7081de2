//! Random sampling of questions without replacement.

use rand::Rng;

/// Number of questions drawn per session.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Draws random subsets of a question bank.
pub struct Sampler;

impl Sampler {
    /// Shuffle `items` in place with Fisher–Yates.
    ///
    /// Walks from the last index down to 1, swapping each slot with a uniformly
    /// chosen slot in `0..=i`, so every ordering is equally likely.
    pub fn shuffle<T, R: Rng + ?Sized>(rng: &mut R, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = rng.random_range(0..=i);
            items.swap(i, j);
        }
    }

    /// Return up to `count` distinct items from `items` in random order.
    ///
    /// When fewer than `count` items exist, every item is returned shuffled.
    #[must_use]
    pub fn draw<T: Clone, R: Rng + ?Sized>(rng: &mut R, items: &[T], count: usize) -> Vec<T> {
        let mut pool = items.to_vec();
        Self::shuffle(rng, &mut pool);
        pool.truncate(count);
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn draws_requested_count_without_duplicates() {
        let mut rng = StdRng::seed_from_u64(7);
        let items: Vec<u32> = (0..25).collect();
        let drawn = Sampler::draw(&mut rng, &items, DEFAULT_SAMPLE_SIZE);

        assert_eq!(drawn.len(), DEFAULT_SAMPLE_SIZE);
        let unique: HashSet<_> = drawn.iter().collect();
        assert_eq!(unique.len(), drawn.len());
        assert!(drawn.iter().all(|d| items.contains(d)));
    }

    #[test]
    fn short_input_returns_everything() {
        let mut rng = StdRng::seed_from_u64(1);
        let items = vec!["a", "b", "c"];
        let mut drawn = Sampler::draw(&mut rng, &items, 10);
        drawn.sort_unstable();
        assert_eq!(drawn, items);
    }

    #[test]
    fn empty_and_zero_count() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(Sampler::draw::<u8, _>(&mut rng, &[], 10).is_empty());
        assert!(Sampler::draw(&mut rng, &[1, 2, 3], 0).is_empty());
    }

    #[test]
    fn same_seed_same_order() {
        let items: Vec<u32> = (0..40).collect();
        let a = Sampler::draw(&mut StdRng::seed_from_u64(99), &items, 10);
        let b = Sampler::draw(&mut StdRng::seed_from_u64(99), &items, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn orderings_are_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(2024);
        let items = [0_u8, 1, 2];
        let trials = 60_000;
        let mut counts: HashMap<Vec<u8>, u32> = HashMap::new();
        for _ in 0..trials {
            *counts.entry(Sampler::draw(&mut rng, &items, 3)).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        let expected = f64::from(trials) / 6.0;
        for (ordering, count) in counts {
            let deviation = (f64::from(count) - expected).abs() / expected;
            assert!(deviation < 0.05, "{ordering:?} seen {count} times");
        }
    }
}
