// Minimal PRNG (no external crates).
//
// This is NOT cryptographically secure.
// It drives the stochastic activation and rewiring and must be reproducible
// for a fixed seed, so every network owns exactly one instance.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prng {
    state: u64,
}

const ZERO_STATE_REPLACEMENT: u64 = 0x9E3779B97F4A7C15;

impl Prng {
    pub fn new(seed: u64) -> Self {
        // Scramble the seed so that nearby seeds start far apart, and avoid a zero state.
        Self::from_state(splitmix64(seed))
    }

    /// Independent, deterministically derived sub-stream.
    ///
    /// The same `(seed, stream)` pair always yields the same generator; distinct
    /// streams are decorrelated through a splitmix64 finalizer.
    pub fn derive(seed: u64, stream: u64) -> Self {
        let mixed = splitmix64(seed ^ splitmix64(stream.wrapping_add(ZERO_STATE_REPLACEMENT)));
        Self::from_state(mixed)
    }

    pub(crate) fn from_state(state: u64) -> Self {
        // Avoid a zero state.
        let state = if state == 0 {
            ZERO_STATE_REPLACEMENT
        } else {
            state
        };
        Self { state }
    }

    pub(crate) fn state(&self) -> u64 {
        self.state
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform sample in `[0, 1)` with 53 bits of precision.
    #[inline]
    pub fn next_f64_01(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Bernoulli draw: `true` with probability `p`.
    ///
    /// `p <= 0` never fires and `p >= 1` always fires.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.next_f64_01() < p
    }

    /// Uniform integer in `[low, high)`. Returns `low` for an empty range.
    #[inline]
    pub fn gen_range_usize(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        let span = (high - low) as u128;
        // Multiply-shift keeps the bias negligible for any span.
        let v = ((self.next_u64() as u128 * span) >> 64) as usize;
        low + v
    }
}

#[inline]
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
