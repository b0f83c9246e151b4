//! Fast-step kernels: signal computation and stochastic activation.
//!
//! A fast step is two stages separated by a barrier:
//! 1. every node's signal is computed from the same pre-update state
//!    (this stage may run on several threads),
//! 2. every node samples its new state from the single sequential RNG stream.
//!
//! Signals are integers, so every execution tier yields bit-identical results.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::connectivity::{Activity, Connectivity};
use crate::prng::Prng;

/// Execution tier for the signal stage.
///
/// - `Scalar`: single-threaded row sums (default, works everywhere)
/// - `Simd`: single-threaded with 4-lane dense row products (requires `simd`)
/// - `Parallel`: rows split across rayon workers (requires `parallel`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExecutionTier {
    #[default]
    Scalar,
    Simd,
    Parallel,
}

impl ExecutionTier {
    /// The tier actually used, honoring compile-time feature gates.
    pub fn effective(self) -> ExecutionTier {
        match self {
            ExecutionTier::Scalar => ExecutionTier::Scalar,
            ExecutionTier::Simd => {
                #[cfg(feature = "simd")]
                {
                    ExecutionTier::Simd
                }
                #[cfg(not(feature = "simd"))]
                {
                    ExecutionTier::Scalar
                }
            }
            ExecutionTier::Parallel => {
                #[cfg(feature = "parallel")]
                {
                    ExecutionTier::Parallel
                }
                #[cfg(not(feature = "parallel"))]
                {
                    ExecutionTier::Scalar
                }
            }
        }
    }
}

/// `signals[i] = sum_j C[i, j] * state[j]` for every node.
pub fn compute_signals<M: Connectivity>(
    matrix: &M,
    state: &[Activity],
    signals: &mut [i32],
    tier: ExecutionTier,
) {
    debug_assert_eq!(signals.len(), matrix.size());
    match tier.effective() {
        ExecutionTier::Scalar => compute_signals_scalar(matrix, state, signals),
        ExecutionTier::Simd => {
            for (i, out) in signals.iter_mut().enumerate() {
                *out = matrix.row_signal_simd(i, state);
            }
        }
        ExecutionTier::Parallel => compute_signals_parallel(matrix, state, signals),
    }
}

fn compute_signals_scalar<M: Connectivity>(matrix: &M, state: &[Activity], signals: &mut [i32]) {
    for (i, out) in signals.iter_mut().enumerate() {
        *out = matrix.row_signal(i, state);
    }
}

#[cfg(feature = "parallel")]
fn compute_signals_parallel<M: Connectivity>(matrix: &M, state: &[Activity], signals: &mut [i32]) {
    // for_each joins all workers before returning: sampling sees a complete signal vector.
    signals
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, out)| *out = matrix.row_signal(i, state));
}

#[cfg(not(feature = "parallel"))]
fn compute_signals_parallel<M: Connectivity>(matrix: &M, state: &[Activity], signals: &mut [i32]) {
    compute_signals_scalar(matrix, state, signals);
}

/// Logistic activation probability `1 / (1 + exp(-2 * beta * (signal - 0.5)))`.
///
/// `beta == 0` gives exactly 0.5. Overflow saturates: a huge positive
/// exponent yields 0 and a huge negative one yields 1, never NaN.
#[inline]
pub fn activation_probability(signal: i32, beta: f64) -> f64 {
    let exponent = -2.0 * beta * (signal as f64 - 0.5);
    // exp(+inf) = inf -> 0, exp(-inf) = 0 -> 1.
    let p = 1.0 / (1.0 + exponent.exp());
    if p.is_nan() {
        0.5
    } else {
        p
    }
}

/// Sample every node's next state from its signal. Returns the number of
/// nodes that became active.
///
/// `next` is fully overwritten; the caller swaps it in as the new state.
pub fn sample_states(signals: &[i32], beta: f64, rng: &mut Prng, next: &mut [Activity]) -> usize {
    let mut active = 0usize;
    for (s, &signal) in next.iter_mut().zip(signals) {
        let fire = rng.gen_bool(activation_probability(signal, beta));
        *s = Activity::from(fire);
        active += fire as usize;
    }
    active
}
