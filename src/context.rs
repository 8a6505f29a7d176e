use rand::{Rng, SeedableRng, rngs::StdRng};

/// Per-worker transformation state.
///
/// Holds the random source consulted by stochastic variations, the render-wide preserve-Z flag and
/// iteration progress. A `Context` is not shared between threads: every worker owns one, seeded
/// independently through [`Context::for_worker`].
#[derive(Debug, Clone)]
pub struct Context {
    rng: StdRng,
    preserve_z: bool,
    iteration: u64,
}

impl Context {
    /// Create a context with a deterministic seed and preserve-Z disabled.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            preserve_z: false,
            iteration: 0,
        }
    }

    /// Create the context for worker `index` of a render seeded with `seed`.
    ///
    /// Seeds are decorrelated with a splitmix64 finalizer so neighbouring workers do not share
    /// overlapping streams.
    pub fn for_worker(seed: u64, index: usize) -> Self {
        Self::seeded(mix_seed(seed ^ (index as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)))
    }

    /// Builder-style preserve-Z toggle.
    pub fn with_preserve_z(mut self, preserve_z: bool) -> Self {
        self.preserve_z = preserve_z;
        self
    }

    /// Set the preserve-Z flag (once per render).
    pub fn set_preserve_z(&mut self, preserve_z: bool) {
        self.preserve_z = preserve_z;
    }

    /// Whether 2D variations carry `amount * z` into their output.
    pub fn is_preserve_z(&self) -> bool {
        self.preserve_z
    }

    /// Uniform double in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Uniform integer in `[0, bound)`, derived from exactly one [`Context::random`] draw.
    ///
    /// Returns `0` for non-positive bounds.
    pub fn random_int(&mut self, bound: i32) -> i32 {
        let u = self.random();
        if bound <= 0 {
            return 0;
        }
        ((u * f64::from(bound)).floor() as i32).min(bound - 1)
    }

    /// Iterations completed by the owning worker.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub(crate) fn advance(&mut self) {
        self.iteration = self.iteration.wrapping_add(1);
    }
}

fn mix_seed(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
#[path = "../tests/unit/context.rs"]
mod tests;
