use std::ops::RangeInclusive;

use rand::distributions::{Alphanumeric, Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Character set for generated strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    Alpha,
    Numeric,
    AlphaNumeric,
}

/// Source of fallback data when the seed has nothing for a control.
pub trait DataGenerator {
    /// Index of one element out of `len`, or `None` to pick nothing.
    /// Must return `None` when `len` is zero.
    fn next_index(&mut self, len: usize) -> Option<usize>;

    /// A string for the field named by `request_key`.
    fn generate_string(&mut self, request_key: &str, kind: StringKind) -> String;

    fn generate_bool(&mut self) -> bool;
}

/// Pick one item through the generator, `None` for an empty slice.
pub fn pick_one<'a, T>(generator: &mut dyn DataGenerator, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    generator.next_index(items.len()).and_then(|i| items.get(i))
}

/// Random data from a seedable RNG.
pub struct RandomGenerator {
    rng: StdRng,
    string_len: RangeInclusive<usize>,
}

impl RandomGenerator {
    pub const DEFAULT_LENGTH: RangeInclusive<usize> = 8..=16;

    /// Reproducible generator: the same seed yields the same fill.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            string_len: Self::DEFAULT_LENGTH,
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            string_len: Self::DEFAULT_LENGTH,
        }
    }

    /// Set the length range of generated strings. An inverted range is
    /// swapped, and a zero minimum is raised to one.
    pub fn with_length(mut self, min: usize, max: usize) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.string_len = lo.max(1)..=hi.max(1);
        self
    }
}

const ALPHA: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

impl DataGenerator for RandomGenerator {
    fn next_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..len))
    }

    fn generate_string(&mut self, _request_key: &str, kind: StringKind) -> String {
        let len = self.rng.gen_range(self.string_len.clone());

        match kind {
            StringKind::AlphaNumeric => (&mut self.rng)
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect(),
            StringKind::Alpha => {
                let dist = Uniform::from(0..ALPHA.len());
                (0..len)
                    .map(|_| char::from(ALPHA[dist.sample(&mut self.rng)]))
                    .collect()
            }
            StringKind::Numeric => (0..len)
                .map(|_| char::from(b'0' + self.rng.gen_range(0..10u8)))
                .collect(),
        }
    }

    fn generate_bool(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}
