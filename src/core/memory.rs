//! Per-node activity memory.
//!
//! The rewiring policy reads one memory value per node in `[0, 1]` to decide
//! whether the node has been silent, saturated, or in between.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::connectivity::{Activity, NodeId};

/// How the memory value of a node is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MemoryModel {
    /// Exponential moving average with factor `alpha`:
    /// `A[i] <- s[i] * (1 - alpha) + A[i] * alpha`.
    #[default]
    Exponential,
    /// Mean of the last `W` states of the node.
    Window(usize),
}

/// Exponential moving average of each node's state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExponentialMemory {
    alpha: f64,
    values: Vec<f64>,
}

impl ExponentialMemory {
    /// Starts at the initial state.
    pub fn new(alpha: f64, initial: &[Activity]) -> Self {
        Self {
            alpha,
            values: initial.iter().map(|&s| s as f64).collect(),
        }
    }

    pub fn update(&mut self, state: &[Activity]) {
        let keep = self.alpha;
        let take = 1.0 - keep;
        for (a, &s) in self.values.iter_mut().zip(state) {
            // Rounding may push the sum one ulp past 1.
            *a = (s as f64 * take + *a * keep).clamp(0.0, 1.0);
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

/// Mean of the most recent `window` states, kept in a ring buffer of
/// capacity `window` indexed by `step mod window`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowedMemory {
    window: usize,
    n: usize,
    /// Row-major `window x n` ring of past states.
    history: Vec<Activity>,
    /// Number of filled slots (saturates at `window`).
    filled: usize,
    /// Next slot to write.
    cursor: usize,
    /// Per-node sum over the filled slots.
    sums: Vec<u32>,
}

impl WindowedMemory {
    pub fn new(window: usize, initial: &[Activity]) -> Self {
        let n = initial.len();
        let window = window.max(1);
        let mut memory = Self {
            window,
            n,
            history: vec![0; window * n],
            filled: 0,
            cursor: 0,
            sums: vec![0; n],
        };
        memory.update(initial);
        memory
    }

    pub fn update(&mut self, state: &[Activity]) {
        let slot = &mut self.history[self.cursor * self.n..(self.cursor + 1) * self.n];
        let evicting = self.filled == self.window;
        for ((old, sum), &s) in slot.iter_mut().zip(self.sums.iter_mut()).zip(state) {
            if evicting {
                *sum -= *old as u32;
            }
            *sum += s as u32;
            *old = s;
        }
        if !evicting {
            self.filled += 1;
        }
        self.cursor = (self.cursor + 1) % self.window;
    }

    #[inline]
    pub fn value(&self, node: NodeId) -> f64 {
        if self.filled == 0 {
            return 0.0;
        }
        self.sums[node] as f64 / self.filled as f64
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Whether the ring layout and running sums agree with the stored history.
    pub fn is_consistent(&self) -> bool {
        if self.window == 0
            || Some(self.history.len()) != self.window.checked_mul(self.n)
            || self.sums.len() != self.n
            || self.filled > self.window
            || self.cursor >= self.window
            || (self.filled < self.window && self.cursor != self.filled)
        {
            return false;
        }
        if self.history.iter().any(|&s| s > 1) {
            return false;
        }
        let mut sums = vec![0u32; self.n];
        for slot in self.history.chunks_exact(self.n.max(1)).take(self.filled) {
            for (sum, &s) in sums.iter_mut().zip(slot) {
                *sum += s as u32;
            }
        }
        sums == self.sums
    }
}

/// Activity memory of every node, following the configured [`MemoryModel`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActivityMemory {
    Exponential(ExponentialMemory),
    Windowed(WindowedMemory),
}

impl ActivityMemory {
    pub fn new(model: MemoryModel, alpha: f64, initial: &[Activity]) -> Self {
        match model {
            MemoryModel::Exponential => {
                ActivityMemory::Exponential(ExponentialMemory::new(alpha, initial))
            }
            MemoryModel::Window(w) => ActivityMemory::Windowed(WindowedMemory::new(w, initial)),
        }
    }

    /// Fold one fast-step state into the memory.
    pub fn update(&mut self, state: &[Activity]) {
        match self {
            ActivityMemory::Exponential(m) => m.update(state),
            ActivityMemory::Windowed(m) => m.update(state),
        }
    }

    #[inline]
    pub fn value(&self, node: NodeId) -> f64 {
        match self {
            ActivityMemory::Exponential(m) => m.values[node],
            ActivityMemory::Windowed(m) => m.value(node),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ActivityMemory::Exponential(m) => m.values.len(),
            ActivityMemory::Windowed(m) => m.n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The model this memory follows.
    pub fn model(&self) -> MemoryModel {
        match self {
            ActivityMemory::Exponential(_) => MemoryModel::Exponential,
            ActivityMemory::Windowed(m) => MemoryModel::Window(m.window),
        }
    }

    /// Memory factor of the exponential model; `None` for the window model.
    pub fn alpha(&self) -> Option<f64> {
        match self {
            ActivityMemory::Exponential(m) => Some(m.alpha),
            ActivityMemory::Windowed(_) => None,
        }
    }

    /// Structural self-check used when loading images.
    pub fn is_consistent(&self) -> bool {
        match self {
            ActivityMemory::Exponential(m) => {
                (0.0..=1.0).contains(&m.alpha)
                    && m.values.iter().all(|a| (0.0..=1.0).contains(a))
            }
            ActivityMemory::Windowed(m) => m.is_consistent(),
        }
    }

    /// Memory values of all nodes.
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            ActivityMemory::Exponential(m) => m.values.clone(),
            ActivityMemory::Windowed(m) => (0..m.n).map(|i| m.value(i)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_tracks_current_state_without_memory() {
        let mut m = ExponentialMemory::new(0.0, &[0, 1, 0]);
        m.update(&[1, 0, 0]);
        assert_eq!(m.values(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn ema_is_frozen_with_full_memory() {
        let mut m = ExponentialMemory::new(1.0, &[0, 1]);
        for _ in 0..10 {
            m.update(&[1, 0]);
        }
        assert_eq!(m.values(), &[0.0, 1.0]);
    }

    #[test]
    fn ema_blends_and_stays_in_unit_interval() {
        let mut m = ExponentialMemory::new(0.2, &[0]);
        m.update(&[1]);
        assert!((m.values()[0] - 0.8).abs() < 1e-12);
        m.update(&[0]);
        assert!((m.values()[0] - 0.16).abs() < 1e-12);

        for &alpha in &[0.0, 0.1, 0.3, 0.5, 0.7, 0.9, 0.99, 1.0] {
            let mut m = ExponentialMemory::new(alpha, &[1, 0, 1]);
            for step in 0..500 {
                let s = [(step % 2) as Activity, 1, 0];
                m.update(&s);
                assert!(m.values().iter().all(|&a| (0.0..=1.0).contains(&a)));
            }
        }
    }

    #[test]
    fn ema_saturates_towards_one() {
        let mut m = ExponentialMemory::new(0.5, &[0]);
        for _ in 0..200 {
            m.update(&[1]);
        }
        assert!(m.values()[0] > 1.0 - 1e-9);
        assert!(m.values()[0] <= 1.0);
    }

    #[test]
    fn window_averages_recent_states() {
        let mut m = WindowedMemory::new(3, &[1, 0]);
        assert_eq!(m.value(0), 1.0);
        m.update(&[0, 0]);
        assert_eq!(m.value(0), 0.5);
        m.update(&[0, 1]);
        assert!((m.value(0) - 1.0 / 3.0).abs() < 1e-12);
        // Evicts the initial state.
        m.update(&[0, 1]);
        assert_eq!(m.value(0), 0.0);
        assert!((m.value(1) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn window_of_one_tracks_current_state() {
        let mut m = WindowedMemory::new(1, &[1]);
        m.update(&[0]);
        assert_eq!(m.value(0), 0.0);
        m.update(&[1]);
        assert_eq!(m.value(0), 1.0);
        assert_eq!(m.window(), 1);
    }

    #[test]
    fn activity_memory_dispatch() {
        let mut exp = ActivityMemory::new(MemoryModel::Exponential, 0.0, &[0, 1]);
        let mut win = ActivityMemory::new(MemoryModel::Window(2), 0.0, &[0, 1]);
        exp.update(&[1, 1]);
        win.update(&[1, 1]);
        assert_eq!(exp.to_vec(), vec![1.0, 1.0]);
        assert_eq!(win.to_vec(), vec![0.5, 1.0]);
        assert_eq!(exp.len(), 2);
        assert_eq!(win.value(1), 1.0);
        assert_eq!(exp.model(), MemoryModel::Exponential);
        assert_eq!(win.model(), MemoryModel::Window(2));
        assert_eq!(exp.alpha(), Some(0.0));
        assert_eq!(win.alpha(), None);
    }

    #[test]
    fn window_consistency_check() {
        let mut m = WindowedMemory::new(3, &[1, 0, 1]);
        assert!(m.is_consistent());
        for step in 0..7 {
            m.update(&[(step % 2) as Activity, 1, 0]);
            assert!(m.is_consistent());
        }
        let mut broken = m.clone();
        broken.sums[0] += 1;
        assert!(!broken.is_consistent());
        let mut broken = m;
        broken.history[0] = 2;
        assert!(!broken.is_consistent());
    }
}
