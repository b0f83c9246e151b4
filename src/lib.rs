//! # rewire
//!
//! Co-evolving activity and signed connectivity of binary-state nodes.
//!
//! Nodes switch on or off stochastically according to the signed input they
//! receive; on a slower time scale, one node at a time adds or removes an
//! incoming link depending on how active it has been. The run reports the
//! mean excitatory and inhibitory degrees, the branching ratio and the active
//! fraction after every rewiring step.
//!
//! ## Quick Start
//!
//! ```
//! use rewire::prelude::*;
//!
//! let cfg = NetworkConfig::with_size(50)
//!     .with_alpha(0.0)
//!     .with_beta(10.0)
//!     .with_tau(10)
//!     .with_seed(42);
//! let mut net: Network = Network::new(
//!     cfg,
//!     &ZerosState,
//!     &RandomConnectivity::new(0.01, 0.01),
//! )
//! .unwrap();
//!
//! let series = net.run(100, false).unwrap();
//! assert_eq!(series.len(), 100);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): config/series serialization and network images
//! - `cli` (default): the `rewire` demo binary's log subscriber
//! - `parallel`: multi-threaded signal computation via rayon
//! - `simd`: 4-lane dense row products via the `wide` crate
//!
//! ## Modules
//!
//! - [`network`]: the two-rate engine
//! - [`connectivity`]: dense and sparse signed matrices
//! - [`kernel`]: signal and activation kernels
//! - [`rewiring`]: the structural plasticity rule
//! - [`memory`]: per-node activity memory
//! - [`init`]: initial state and connectivity providers
//! - [`observer`]: per-step callbacks and read-only snapshots

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/connectivity.rs"]
pub mod connectivity;

#[path = "core/init.rs"]
pub mod init;

#[path = "core/memory.rs"]
pub mod memory;

#[path = "core/kernel.rs"]
pub mod kernel;

#[path = "core/rewiring.rs"]
pub mod rewiring;

#[path = "core/network.rs"]
pub mod network;

#[cfg(feature = "serde")]
#[path = "core/storage.rs"]
pub mod storage;

pub mod observer;

/// Prelude module for convenient imports.
///
/// ```
/// use rewire::prelude::*;
/// ```
pub mod prelude {
    pub use crate::connectivity::{
        Activity, Connectivity, DenseMatrix, Link, LinkCounts, NodeId, SparseMatrix,
    };
    pub use crate::error::{ConfigError, Error, Result};
    pub use crate::init::{
        ConnectivityInit, ConnectivitySpec, OnesConnectivity, OnesState, RandomConnectivity,
        RandomState, StateInit, StateSpec, UniformState, ZerosConnectivity, ZerosState,
    };
    pub use crate::kernel::ExecutionTier;
    pub use crate::memory::MemoryModel;
    pub use crate::network::{MacroStep, Network, NetworkConfig, RunPhase, RunSeries};
    pub use crate::observer::{NetworkAdapter, NetworkSnapshot, Observer, ProgressLogger};
    pub use crate::rewiring::RewireOutcome;
}
