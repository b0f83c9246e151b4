use tracing::info;

use crate::connectivity::{Connectivity, LinkCounts};
use crate::network::{MacroStep, Network, RunPhase};

/// Per-macro-step callback.
///
/// Called synchronously after each macro-step's metrics are recorded. It
/// cannot fail the run and sees only the step record, never the network.
pub trait Observer {
    fn on_macro_step(&mut self, step: &MacroStep);
}

impl<F> Observer for F
where
    F: FnMut(&MacroStep),
{
    fn on_macro_step(&mut self, step: &MacroStep) {
        self(step)
    }
}

/// Logs run progress at `info` level every tenth of the run.
#[derive(Debug, Clone)]
pub struct ProgressLogger {
    total: usize,
    every: usize,
}

impl ProgressLogger {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            every: (total / 10).max(1),
        }
    }
}

impl Observer for ProgressLogger {
    fn on_macro_step(&mut self, step: &MacroStep) {
        let done = step.index + 1;
        if done % self.every == 0 || done == self.total {
            info!(
                step = done,
                total = self.total,
                active_fraction = step.active_fraction,
                deg_plus = step.deg_plus,
                deg_minus = step.deg_minus,
                "simulation progress"
            );
        }
    }
}

/// A read-only snapshot of a network.
///
/// Snapshotting is on-demand and allocates; the hot loop is unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSnapshot {
    pub phase: RunPhase,
    pub node_count: usize,
    pub fast_steps: u64,
    pub macro_steps: u64,
    pub links: LinkCounts,
    /// Fraction of currently active nodes.
    pub active_fraction: f64,
    pub mean_memory: f64,
    /// Nodes whose memory is below `epsilon`.
    pub silent_nodes: usize,
    /// Nodes whose memory is above `1 - epsilon`.
    pub saturated_nodes: usize,
    pub max_in_degree: usize,
}

pub struct NetworkAdapter<'a, M: Connectivity> {
    network: &'a Network<M>,
}

impl<'a, M: Connectivity> NetworkAdapter<'a, M> {
    pub fn new(network: &'a Network<M>) -> Self {
        Self { network }
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        let net = self.network;
        let n = net.node_count();
        let eps = net.config().epsilon;
        let memory = net.memory().to_vec();
        let active = net.state().iter().filter(|&&s| s == 1).count();

        NetworkSnapshot {
            phase: net.phase(),
            node_count: n,
            fast_steps: net.fast_steps(),
            macro_steps: net.macro_steps(),
            links: net.link_counts(),
            active_fraction: active as f64 / n as f64,
            mean_memory: memory.iter().sum::<f64>() / n as f64,
            silent_nodes: memory.iter().filter(|&&a| a < eps).count(),
            saturated_nodes: memory.iter().filter(|&&a| a > 1.0 - eps).count(),
            max_in_degree: net.in_degrees().into_iter().max().unwrap_or(0),
        }
    }
}
