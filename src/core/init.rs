//! Initial state and connectivity providers.
//!
//! Each provider is a small value satisfying a single-method capability
//! (`get`). Randomized providers draw from the network's own [`Prng`], so a
//! seeded network is reproducible from construction onwards.
//!
//! [`StateSpec`] and [`ConnectivitySpec`] are closed, serializable
//! descriptions of the built-in providers, used by configuration files.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::connectivity::{Activity, Connectivity, DenseMatrix};
use crate::error::ConfigError;
use crate::prng::Prng;

/// Produces the initial state vector (values in `{0, 1}`, length `size`).
pub trait StateInit {
    fn get(&self, size: usize, rng: &mut Prng) -> Vec<Activity>;

    /// Check provider parameters before anything is drawn.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Produces the initial `n x n` connectivity (values in `{-1, 0, 1}`, zero diagonal).
pub trait ConnectivityInit {
    fn get(&self, n: usize, rng: &mut Prng) -> DenseMatrix;

    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// All nodes resting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZerosState;

impl StateInit for ZerosState {
    fn get(&self, size: usize, _rng: &mut Prng) -> Vec<Activity> {
        vec![0; size]
    }
}

/// All nodes firing.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnesState;

impl StateInit for OnesState {
    fn get(&self, size: usize, _rng: &mut Prng) -> Vec<Activity> {
        vec![1; size]
    }
}

/// Each node independently firing with probability `p`.
#[derive(Debug, Clone, Copy)]
pub struct RandomState {
    pub p: f64,
}

impl RandomState {
    pub fn new(p: f64) -> Self {
        Self { p }
    }
}

impl Default for RandomState {
    fn default() -> Self {
        Self { p: 0.5 }
    }
}

impl StateInit for RandomState {
    fn get(&self, size: usize, rng: &mut Prng) -> Vec<Activity> {
        (0..size).map(|_| Activity::from(rng.gen_bool(self.p))).collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("p", self.p)
    }
}

/// Uniformly random binary state (each node fair-coin).
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformState;

impl StateInit for UniformState {
    fn get(&self, size: usize, rng: &mut Prng) -> Vec<Activity> {
        (0..size).map(|_| (rng.next_u64() >> 63) as Activity).collect()
    }
}

/// Network with no links.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZerosConnectivity;

impl ConnectivityInit for ZerosConnectivity {
    fn get(&self, n: usize, _rng: &mut Prng) -> DenseMatrix {
        DenseMatrix::zeros(n)
    }
}

/// Fully connected network without self-loops, all `+1` (or all `-1`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OnesConnectivity {
    pub negative: bool,
}

impl OnesConnectivity {
    pub fn new(negative: bool) -> Self {
        Self { negative }
    }
}

impl ConnectivityInit for OnesConnectivity {
    fn get(&self, n: usize, _rng: &mut Prng) -> DenseMatrix {
        let value = if self.negative { -1 } else { 1 };
        let mut matrix = DenseMatrix::zeros(n);
        for i in 0..n {
            for j in (0..n).filter(|&j| j != i) {
                matrix.set(i, j, value);
            }
        }
        matrix
    }
}

/// Directed random network: each off-diagonal cell is `+1` with probability
/// `p_plus`, `-1` with probability `p_minus`, otherwise `0`.
#[derive(Debug, Clone, Copy)]
pub struct RandomConnectivity {
    pub p_plus: f64,
    pub p_minus: f64,
}

impl RandomConnectivity {
    pub fn new(p_plus: f64, p_minus: f64) -> Self {
        Self { p_plus, p_minus }
    }
}

impl Default for RandomConnectivity {
    fn default() -> Self {
        Self {
            p_plus: 0.5,
            p_minus: 0.5,
        }
    }
}

impl ConnectivityInit for RandomConnectivity {
    fn get(&self, n: usize, rng: &mut Prng) -> DenseMatrix {
        let mut matrix = DenseMatrix::zeros(n);
        for i in 0..n {
            for j in (0..n).filter(|&j| j != i) {
                let u = rng.next_f64_01();
                let value = if u < self.p_minus {
                    -1
                } else if u < self.p_minus + self.p_plus {
                    1
                } else {
                    0
                };
                if value != 0 {
                    matrix.set(i, j, value);
                }
            }
        }
        matrix
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("p_plus", self.p_plus)?;
        check_probability("p_minus", self.p_minus)?;
        let sum = self.p_plus + self.p_minus;
        if sum > 1.0 {
            return Err(ConfigError::ProbabilitySum(sum));
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Probability { name, value });
    }
    Ok(())
}

/// Serializable choice among the built-in state providers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum StateSpec {
    #[default]
    Zeros,
    Ones,
    Random {
        p: f64,
    },
    Uniform,
}

impl StateInit for StateSpec {
    fn get(&self, size: usize, rng: &mut Prng) -> Vec<Activity> {
        match *self {
            StateSpec::Zeros => ZerosState.get(size, rng),
            StateSpec::Ones => OnesState.get(size, rng),
            StateSpec::Random { p } => RandomState::new(p).get(size, rng),
            StateSpec::Uniform => UniformState.get(size, rng),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            StateSpec::Random { p } => RandomState::new(p).validate(),
            _ => Ok(()),
        }
    }
}

/// Serializable choice among the built-in connectivity providers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ConnectivitySpec {
    #[default]
    Zeros,
    Ones {
        #[cfg_attr(feature = "serde", serde(default))]
        negative: bool,
    },
    Random {
        p_plus: f64,
        p_minus: f64,
    },
}

impl ConnectivityInit for ConnectivitySpec {
    fn get(&self, n: usize, rng: &mut Prng) -> DenseMatrix {
        match *self {
            ConnectivitySpec::Zeros => ZerosConnectivity.get(n, rng),
            ConnectivitySpec::Ones { negative } => OnesConnectivity::new(negative).get(n, rng),
            ConnectivitySpec::Random { p_plus, p_minus } => {
                RandomConnectivity::new(p_plus, p_minus).get(n, rng)
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            ConnectivitySpec::Random { p_plus, p_minus } => {
                RandomConnectivity::new(p_plus, p_minus).validate()
            }
            _ => Ok(()),
        }
    }
}
