use tracing::{debug, info, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::connectivity::{
    in_degrees, out_degrees, Activity, Connectivity, DenseMatrix, LinkCounts, NodeId,
};
use crate::error::{ConfigError, Error, Result};
use crate::init::{ConnectivityInit, StateInit};
use crate::kernel::{compute_signals, sample_states, ExecutionTier};
use crate::memory::{ActivityMemory, MemoryModel};
use crate::observer::{Observer, ProgressLogger};
use crate::prng::Prng;
use crate::rewiring::{rewire, RewireOutcome};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NetworkConfig {
    /// Number of nodes. Must be >= 1.
    pub n: usize,

    /// Memory factor in [0, 1]: 0 tracks the current state, 1 freezes the
    /// initial value. Ignored by `MemoryModel::Window`.
    pub alpha: f64,

    /// Inverse temperature, >= 0. At 0 every node fires with probability 0.5.
    pub beta: f64,

    /// Fast activation steps per rewiring step. Must be >= 1.
    pub tau: usize,

    /// RNG seed. If set, makes the run reproducible; otherwise one is drawn
    /// from the clock and reported by [`Network::seed`].
    pub seed: Option<u64>,

    /// Memory values below `epsilon` (or above `1 - epsilon`) count as saturated.
    pub epsilon: f64,

    pub memory: MemoryModel,

    pub tier: ExecutionTier,
}

impl Default for NetworkConfig {
    /// 100 nodes, `alpha = 0.2`, `beta = 10`, `tau = 10`, exponential memory.
    fn default() -> Self {
        Self {
            n: 100,
            alpha: 0.2,
            beta: 10.0,
            tau: 10,
            seed: None,
            epsilon: Self::DEFAULT_EPSILON,
            memory: MemoryModel::Exponential,
            tier: ExecutionTier::Scalar,
        }
    }
}

impl NetworkConfig {
    pub const DEFAULT_EPSILON: f64 = 1e-9;

    pub fn with_size(n: usize) -> Self {
        Self {
            n,
            ..Default::default()
        }
    }

    /// Validate the configuration. Called by [`Network::new`] before anything
    /// is allocated or drawn.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n < 1 {
            return Err(ConfigError::NodeCount(self.n));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::Alpha(self.alpha));
        }
        // Also rejects NaN. +inf is the deterministic threshold limit.
        if !(self.beta >= 0.0) {
            return Err(ConfigError::Beta(self.beta));
        }
        if self.tau < 1 {
            return Err(ConfigError::Tau(self.tau));
        }
        if !(self.epsilon > 0.0 && self.epsilon < 0.5) {
            return Err(ConfigError::Epsilon(self.epsilon));
        }
        if let MemoryModel::Window(0) = self.memory {
            return Err(ConfigError::Window(0));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_tau(mut self, tau: usize) -> Self {
        self.tau = tau;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_memory(mut self, memory: MemoryModel) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_tier(mut self, tier: ExecutionTier) -> Self {
        self.tier = tier;
        self
    }
}

/// Lifecycle: `Idle -> Running -> Completed`. `reset` returns to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RunPhase {
    #[default]
    Idle,
    Running,
    Completed,
}

/// Metrics of one macro-step (`tau` fast steps + one rewiring step).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MacroStep {
    pub index: usize,
    /// Active nodes summed over the `tau` fast steps, divided by `tau * n`.
    pub active_fraction: f64,
    /// `links_plus / n`.
    pub deg_plus: f64,
    /// `links_minus / n`.
    pub deg_minus: f64,
    /// `active_fraction[t] / active_fraction[t - 1]`, or 0 when undefined.
    pub branching: f64,
    pub rewiring: RewireOutcome,
}

/// The four per-macro-step time series of a run, each of length `evolution_steps`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunSeries {
    pub deg_plus: Vec<f64>,
    pub deg_minus: Vec<f64>,
    pub branching: Vec<f64>,
    pub active_fraction: Vec<f64>,
}

impl RunSeries {
    fn with_capacity(steps: usize) -> Self {
        Self {
            deg_plus: Vec::with_capacity(steps),
            deg_minus: Vec::with_capacity(steps),
            branching: Vec::with_capacity(steps),
            active_fraction: Vec::with_capacity(steps),
        }
    }

    fn push(&mut self, step: &MacroStep) {
        self.deg_plus.push(step.deg_plus);
        self.deg_minus.push(step.deg_minus);
        self.branching.push(step.branching);
        self.active_fraction.push(step.active_fraction);
    }

    pub fn len(&self) -> usize {
        self.active_fraction.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_fraction.is_empty()
    }

    /// `(deg_plus, deg_minus, branching, active_fraction)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            self.deg_plus,
            self.deg_minus,
            self.branching,
            self.active_fraction,
        )
    }
}

/// Branching ratio between consecutive macro-step active fractions.
#[inline]
pub fn branching_parameter(current: f64, previous: Option<f64>) -> f64 {
    match previous {
        Some(prev) if prev != 0.0 => current / prev,
        _ => 0.0,
    }
}

/// Starting point kept for `reset`.
#[derive(Debug, Clone)]
pub(crate) struct InitialConditions<M> {
    pub(crate) state: Vec<Activity>,
    pub(crate) matrix: M,
    pub(crate) rng: Prng,
}

/// Co-evolving activity and connectivity of `n` binary nodes.
///
/// Fast dynamics: every node samples a new state from the logistic of its
/// signal. Slow dynamics: after `tau` fast steps one node rewires one in-link
/// based on its activity memory. Generic over the connectivity
/// representation; [`DenseMatrix`] by default.
#[derive(Debug, Clone)]
pub struct Network<M: Connectivity = DenseMatrix> {
    pub(crate) cfg: NetworkConfig,
    pub(crate) seed: u64,

    pub(crate) state: Vec<Activity>,
    // Scratch buffers reused by every fast step.
    pub(crate) next_state: Vec<Activity>,
    pub(crate) signals: Vec<i32>,

    pub(crate) matrix: M,
    pub(crate) counts: LinkCounts,
    pub(crate) memory: ActivityMemory,

    pub(crate) rng: Prng,
    pub(crate) phase: RunPhase,

    pub(crate) fast_steps: u64,
    pub(crate) macro_steps: u64,

    pub(crate) initial: InitialConditions<M>,
}

impl<M: Connectivity> Network<M> {
    /// Validate `cfg` and the providers, then draw the initial state and
    /// connectivity from the network's own RNG.
    pub fn new<S, C>(cfg: NetworkConfig, state_init: &S, connectivity_init: &C) -> Result<Self>
    where
        S: StateInit + ?Sized,
        C: ConnectivityInit + ?Sized,
    {
        cfg.validate()?;
        state_init.validate()?;
        connectivity_init.validate()?;

        let seed = cfg.seed.unwrap_or_else(entropy_seed);
        let mut rng = Prng::new(seed);

        let state = state_init.get(cfg.n, &mut rng);
        let dense = connectivity_init.get(cfg.n, &mut rng);

        Self::assemble(cfg, seed, rng, state, &dense).map_err(Error::from)
    }

    /// Build from an explicit initial state and connectivity.
    pub fn from_parts(cfg: NetworkConfig, state: Vec<Activity>, dense: &DenseMatrix) -> Result<Self> {
        cfg.validate()?;
        let seed = cfg.seed.unwrap_or_else(entropy_seed);
        Self::assemble(cfg, seed, Prng::new(seed), state, dense).map_err(Error::from)
    }

    fn assemble(
        cfg: NetworkConfig,
        seed: u64,
        rng: Prng,
        state: Vec<Activity>,
        dense: &DenseMatrix,
    ) -> Result<Self, ConfigError> {
        check_state(&state, cfg.n)?;
        if dense.size() != cfg.n {
            return Err(ConfigError::ConnectivityShape {
                expected: cfg.n,
                got: dense.size(),
            });
        }
        dense.validate()?;

        let matrix = M::from_dense(dense);
        let counts = LinkCounts::recount(&matrix);
        let memory = ActivityMemory::new(cfg.memory, cfg.alpha, &state);

        info!(
            n = cfg.n,
            alpha = cfg.alpha,
            beta = cfg.beta,
            tau = cfg.tau,
            seed,
            links_plus = counts.plus,
            links_minus = counts.minus,
            representation = core::any::type_name::<M>(),
            "network constructed"
        );

        Ok(Self {
            cfg,
            seed,
            next_state: vec![0; cfg.n],
            signals: vec![0; cfg.n],
            matrix,
            counts,
            memory,
            phase: RunPhase::Idle,
            fast_steps: 0,
            macro_steps: 0,
            initial: InitialConditions {
                state: state.clone(),
                matrix: M::from_dense(dense),
                rng: rng.clone(),
            },
            state,
            rng,
        })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.cfg
    }

    /// Effective seed (drawn from the clock when the config has none).
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn node_count(&self) -> usize {
        self.cfg.n
    }

    pub fn state(&self) -> &[Activity] {
        &self.state
    }

    pub fn connectivity(&self) -> &M {
        &self.matrix
    }

    pub fn link_counts(&self) -> LinkCounts {
        self.counts
    }

    pub fn memory(&self) -> &ActivityMemory {
        &self.memory
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn fast_steps(&self) -> u64 {
        self.fast_steps
    }

    pub fn macro_steps(&self) -> u64 {
        self.macro_steps
    }

    /// Incoming links per node.
    pub fn in_degrees(&self) -> Vec<usize> {
        in_degrees(&self.matrix)
    }

    /// Outgoing links per node.
    pub fn out_degrees(&self) -> Vec<usize> {
        out_degrees(&self.matrix)
    }

    /// One fast step: compute all signals, then sample every node's new state
    /// and fold it into the memory. Returns the number of active nodes.
    pub fn step_state(&mut self) -> usize {
        compute_signals(&self.matrix, &self.state, &mut self.signals, self.cfg.tier);
        let active = sample_states(
            &self.signals,
            self.cfg.beta,
            &mut self.rng,
            &mut self.next_state,
        );
        core::mem::swap(&mut self.state, &mut self.next_state);
        self.memory.update(&self.state);
        self.fast_steps += 1;
        active
    }

    /// One rewiring step on a uniformly drawn node.
    pub fn step_rewiring(&mut self) -> RewireOutcome {
        let outcome = rewire(
            &mut self.matrix,
            &mut self.counts,
            &self.memory,
            self.cfg.epsilon,
            &mut self.rng,
        );
        trace!(?outcome, "rewiring");
        outcome
    }

    fn macro_step(&mut self, index: usize, previous: Option<f64>) -> MacroStep {
        let mut active = 0usize;
        for _ in 0..self.cfg.tau {
            active += self.step_state();
        }
        let rewiring = self.step_rewiring();
        self.macro_steps += 1;

        let n = self.cfg.n as f64;
        let active_fraction = active as f64 / (self.cfg.tau as f64 * n);
        MacroStep {
            index,
            active_fraction,
            deg_plus: self.counts.plus as f64 / n,
            deg_minus: self.counts.minus as f64 / n,
            branching: branching_parameter(active_fraction, previous),
            rewiring,
        }
    }

    /// Run `evolution_steps` macro-steps and return the four time series.
    ///
    /// With `progress` set, progress is logged at `info` level every tenth of
    /// the run.
    pub fn run(&mut self, evolution_steps: usize, progress: bool) -> Result<RunSeries> {
        if progress {
            let mut logger = ProgressLogger::new(evolution_steps);
            self.run_with_observer(evolution_steps, &mut logger)
        } else {
            self.run_with_observer(evolution_steps, &mut |_: &MacroStep| {})
        }
    }

    /// Like [`Network::run`], invoking `observer` after every macro-step.
    pub fn run_with_observer<O>(&mut self, evolution_steps: usize, observer: &mut O) -> Result<RunSeries>
    where
        O: Observer + ?Sized,
    {
        if self.phase == RunPhase::Completed {
            return Err(Error::RunCompleted);
        }
        self.phase = RunPhase::Running;
        debug!(evolution_steps, seed = self.seed, "run started");

        let mut series = RunSeries::with_capacity(evolution_steps);
        let mut previous = None;
        for index in 0..evolution_steps {
            let step = self.macro_step(index, previous);
            previous = Some(step.active_fraction);
            series.push(&step);
            observer.on_macro_step(&step);
        }

        self.phase = RunPhase::Completed;
        info!(
            evolution_steps,
            links_plus = self.counts.plus,
            links_minus = self.counts.minus,
            "run completed"
        );
        Ok(series)
    }

    /// Restore the initial state, connectivity, memory and RNG position.
    /// A run after `reset` repeats the first run exactly.
    pub fn reset(&mut self) {
        self.state.clone_from(&self.initial.state);
        self.matrix = self.initial.matrix.clone();
        self.counts = LinkCounts::recount(&self.matrix);
        self.memory = ActivityMemory::new(self.cfg.memory, self.cfg.alpha, &self.state);
        self.rng = self.initial.rng.clone();
        self.phase = RunPhase::Idle;
        self.fast_steps = 0;
        self.macro_steps = 0;
        debug!(seed = self.seed, "network reset");
    }

    /// Full structural check: zero diagonal, entries in `{-1, 0, 1}`, binary
    /// state, memory in `[0, 1]`, and counters equal to a recount.
    pub fn invariants_hold(&self) -> bool {
        let n = self.cfg.n;
        let dense = self.matrix.to_dense();
        check_state(&self.state, n).is_ok()
            && dense.size() == n
            && dense.validate().is_ok()
            && self.memory.len() == n
            && self
                .memory
                .to_vec()
                .iter()
                .all(|a| (0.0..=1.0).contains(a))
            && self.counters_consistent()
    }

    /// Whether the incremental link counters equal a full recount.
    pub fn counters_consistent(&self) -> bool {
        self.counts == LinkCounts::recount(&self.matrix)
    }

    /// Memory value of one node.
    pub fn memory_value(&self, node: NodeId) -> f64 {
        self.memory.value(node)
    }
}

pub(crate) fn check_state(state: &[Activity], n: usize) -> Result<(), ConfigError> {
    if state.len() != n {
        return Err(ConfigError::StateLength {
            expected: n,
            got: state.len(),
        });
    }
    if let Some((index, &value)) = state.iter().enumerate().find(|&(_, &s)| s > 1) {
        return Err(ConfigError::StateValue { index, value });
    }
    Ok(())
}

fn entropy_seed() -> u64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    nanos ^ ((std::process::id() as u64) << 32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::SparseMatrix;
    use crate::init::{
        OnesConnectivity, OnesState, RandomConnectivity, RandomState, ZerosConnectivity,
        ZerosState,
    };

    fn small_cfg() -> NetworkConfig {
        NetworkConfig::with_size(20)
            .with_alpha(0.2)
            .with_beta(2.0)
            .with_tau(3)
            .with_seed(17)
    }

    #[test]
    fn config_validation_rejects_out_of_range() {
        assert_eq!(
            NetworkConfig::with_size(0).validate(),
            Err(ConfigError::NodeCount(0))
        );
        assert!(matches!(
            NetworkConfig::default().with_alpha(1.5).validate(),
            Err(ConfigError::Alpha(_))
        ));
        assert!(NetworkConfig::default()
            .with_alpha(f64::NAN)
            .validate()
            .is_err());
        assert!(matches!(
            NetworkConfig::default().with_beta(-0.1).validate(),
            Err(ConfigError::Beta(_))
        ));
        assert!(NetworkConfig::default()
            .with_beta(f64::NAN)
            .validate()
            .is_err());
        assert!(NetworkConfig::default()
            .with_beta(f64::INFINITY)
            .validate()
            .is_ok());
        assert_eq!(
            NetworkConfig::default().with_tau(0).validate(),
            Err(ConfigError::Tau(0))
        );
        assert!(NetworkConfig::default()
            .with_epsilon(0.0)
            .validate()
            .is_err());
        assert_eq!(
            NetworkConfig::default()
                .with_memory(MemoryModel::Window(0))
                .validate(),
            Err(ConfigError::Window(0))
        );
        assert!(NetworkConfig::default().validate().is_ok());
    }

    #[test]
    fn construction_fails_before_drawing() {
        let err = Network::<DenseMatrix>::new(
            NetworkConfig::with_size(0),
            &ZerosState,
            &ZerosConnectivity,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NodeCount(0))));

        let err = Network::<DenseMatrix>::new(
            small_cfg(),
            &RandomState::new(2.0),
            &ZerosConnectivity,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::Probability { name: "p", .. })
        ));
    }

    #[test]
    fn from_parts_validates_initial_data() {
        let cfg = NetworkConfig::with_size(3).with_seed(1);
        let err = Network::<DenseMatrix>::from_parts(cfg, vec![0, 1], &DenseMatrix::zeros(3))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::StateLength {
                expected: 3,
                got: 2
            })
        ));

        let err = Network::<DenseMatrix>::from_parts(cfg, vec![0, 2, 0], &DenseMatrix::zeros(3))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::StateValue { index: 1, value: 2 })
        ));

        let err = Network::<DenseMatrix>::from_parts(cfg, vec![0, 0, 0], &DenseMatrix::zeros(4))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::ConnectivityShape { .. })
        ));

        let mut cells = vec![0; 9];
        cells[8] = -1;
        let dense = DenseMatrix::from_cells(3, cells).unwrap();
        let err = Network::<DenseMatrix>::from_parts(cfg, vec![0, 0, 0], &dense).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::SelfLoop { index: 2, value: -1 })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_connectivity_is_checked_before_construction() {
        assert!(serde_json::from_str::<DenseMatrix>(r#"{"n":3,"cells":[]}"#).is_err());

        let dense: DenseMatrix =
            serde_json::from_str(r#"{"n":3,"cells":[0,1,0,0,0,-1,0,0,0]}"#).unwrap();
        let cfg = NetworkConfig::with_size(3).with_seed(1);
        let net: Network<SparseMatrix> = Network::from_parts(cfg, vec![0, 0, 0], &dense).unwrap();
        assert_eq!(net.link_counts(), LinkCounts { plus: 1, minus: 1 });
    }

    #[test]
    fn counters_start_from_recount() {
        let net: Network =
            Network::new(small_cfg(), &ZerosState, &OnesConnectivity::new(true)).unwrap();
        assert_eq!(net.link_counts(), LinkCounts { plus: 0, minus: 380 });
        assert_eq!(net.phase(), RunPhase::Idle);
        assert_eq!(net.memory().to_vec(), vec![0.0; 20]);
    }

    #[test]
    fn fast_step_keeps_state_binary_and_memory_bounded() {
        let mut net: Network = Network::new(
            small_cfg(),
            &RandomState::new(0.5),
            &RandomConnectivity::new(0.1, 0.1),
        )
        .unwrap();
        for _ in 0..100 {
            let active = net.step_state();
            assert!(active <= 20);
            assert_eq!(active, net.state().iter().filter(|&&s| s == 1).count());
            assert!(net.state().iter().all(|&s| s <= 1));
            assert!(net
                .memory()
                .to_vec()
                .iter()
                .all(|&a| (0.0..=1.0).contains(&a)));
        }
        assert_eq!(net.fast_steps(), 100);
    }

    #[test]
    fn run_produces_series_of_requested_length() {
        let mut net: Network =
            Network::new(small_cfg(), &OnesState, &RandomConnectivity::new(0.05, 0.05)).unwrap();
        let series = net.run(50, false).unwrap();
        assert_eq!(series.len(), 50);
        assert_eq!(series.deg_plus.len(), 50);
        assert_eq!(series.deg_minus.len(), 50);
        assert_eq!(series.branching.len(), 50);
        assert_eq!(series.branching[0], 0.0);
        assert_eq!(net.phase(), RunPhase::Completed);
        assert_eq!(net.macro_steps(), 50);
        assert_eq!(net.fast_steps(), 150);
        assert!(net.counters_consistent());
        assert!(net.invariants_hold());
    }

    #[test]
    fn completed_run_requires_reset() {
        let mut net: Network = Network::new(small_cfg(), &ZerosState, &ZerosConnectivity).unwrap();
        let first = net.run(10, false).unwrap();
        assert!(matches!(net.run(10, false), Err(Error::RunCompleted)));
        net.reset();
        assert_eq!(net.phase(), RunPhase::Idle);
        let second = net.run(10, false).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_steps_returns_empty_series() {
        let mut net: Network = Network::new(small_cfg(), &ZerosState, &ZerosConnectivity).unwrap();
        let series = net.run(0, true).unwrap();
        assert!(series.is_empty());
        assert_eq!(net.phase(), RunPhase::Completed);
    }

    #[test]
    fn branching_handles_zero_and_first_step() {
        assert_eq!(branching_parameter(0.4, None), 0.0);
        assert_eq!(branching_parameter(0.4, Some(0.0)), 0.0);
        assert_eq!(branching_parameter(0.4, Some(0.2)), 2.0);
        assert_eq!(branching_parameter(0.0, Some(0.5)), 0.0);
    }

    #[test]
    fn branching_series_matches_active_fraction_ratio() {
        let mut net: Network = Network::new(
            small_cfg().with_beta(0.5),
            &RandomState::new(0.5),
            &RandomConnectivity::new(0.1, 0.1),
        )
        .unwrap();
        let s = net.run(40, false).unwrap();
        for t in 1..s.len() {
            let expected = branching_parameter(s.active_fraction[t], Some(s.active_fraction[t - 1]));
            assert_eq!(s.branching[t], expected);
        }
    }

    #[test]
    fn sparse_and_dense_runs_match() {
        let cfg = small_cfg();
        let init = RandomConnectivity::new(0.1, 0.05);
        let mut dense: Network<DenseMatrix> = Network::new(cfg, &OnesState, &init).unwrap();
        let mut sparse: Network<SparseMatrix> = Network::new(cfg, &OnesState, &init).unwrap();
        let a = dense.run(200, false).unwrap();
        let b = sparse.run(200, false).unwrap();
        assert_eq!(a, b);
        assert_eq!(dense.connectivity(), &sparse.connectivity().to_dense());
    }

    #[test]
    fn observer_sees_every_macro_step() {
        let mut net: Network = Network::new(small_cfg(), &ZerosState, &ZerosConnectivity).unwrap();
        let mut seen = Vec::new();
        let series = net
            .run_with_observer(12, &mut |step: &MacroStep| seen.push(step.index))
            .unwrap();
        assert_eq!(seen, (0..12).collect::<Vec<_>>());
        assert_eq!(series.len(), 12);
    }

    #[test]
    fn unseeded_network_reports_its_seed() {
        let cfg = NetworkConfig::with_size(8).with_tau(2);
        let mut a: Network = Network::new(cfg, &RandomState::new(0.5), &ZerosConnectivity).unwrap();
        let replay_cfg = cfg.with_seed(a.seed());
        let mut b: Network =
            Network::new(replay_cfg, &RandomState::new(0.5), &ZerosConnectivity).unwrap();
        assert_eq!(a.run(30, false).unwrap(), b.run(30, false).unwrap());
    }
}
