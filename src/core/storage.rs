//! Network images: a magic header, a version, and an LZ4-compressed JSON
//! payload with everything needed to continue (or reset) a network.
//!
//! Layout (little endian):
//! `MAGIC[8] | version u32 | raw_len u64 | compressed_len u64 | payload`

use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

use crate::connectivity::{Activity, Connectivity, DenseMatrix, LinkCounts};
use crate::error::{Error, Result};
use crate::memory::ActivityMemory;
use crate::network::{check_state, InitialConditions, Network, NetworkConfig, RunPhase};
use crate::prng::Prng;

pub const MAGIC: &[u8; 8] = b"REWIRE01";
pub const VERSION_V1: u32 = 1;
pub const VERSION_CURRENT: u32 = VERSION_V1;

/// Upper bound on the decompressed payload, guarding against corrupt headers.
const MAX_PAYLOAD_BYTES: u64 = 1 << 34;

const MAX_LZ4_RATIO: u64 = 255;

pub fn compress_lz4(input: &[u8]) -> Vec<u8> {
    lz4_flex::compress(input)
}

pub fn decompress_lz4(input: &[u8], expected_size: usize) -> io::Result<Vec<u8>> {
    // Strict format: raw LZ4 block with external expected size.
    lz4_flex::decompress(input, expected_size)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "lz4 decompression failed"))
}

#[derive(Debug, Serialize, Deserialize)]
struct NetworkImage {
    cfg: NetworkConfig,
    seed: u64,
    n: usize,
    state: Vec<Activity>,
    cells: Vec<i8>,
    memory: ActivityMemory,
    rng_state: u64,
    phase: RunPhase,
    fast_steps: u64,
    macro_steps: u64,
    initial_state: Vec<Activity>,
    initial_cells: Vec<i8>,
    initial_rng_state: u64,
}

impl<M: Connectivity> Network<M> {
    /// Write a compressed image of the network.
    pub fn save_image_to<W: Write>(&self, w: &mut W) -> Result<()> {
        let image = NetworkImage {
            cfg: self.cfg,
            seed: self.seed,
            n: self.cfg.n,
            state: self.state.clone(),
            cells: self.matrix.to_dense().cells().to_vec(),
            memory: self.memory.clone(),
            rng_state: self.rng.state(),
            phase: self.phase,
            fast_steps: self.fast_steps,
            macro_steps: self.macro_steps,
            initial_state: self.initial.state.clone(),
            initial_cells: self.initial.matrix.to_dense().cells().to_vec(),
            initial_rng_state: self.initial.rng.state(),
        };
        let raw = serde_json::to_vec(&image)?;
        write_payload(w, &raw)?;
        Ok(())
    }

    /// Read an image written by [`Network::save_image_to`], re-validating every
    /// structural invariant and recounting links.
    pub fn load_image_from<R: Read>(r: &mut R) -> Result<Self> {
        let raw = read_payload(r)?;
        let image: NetworkImage = serde_json::from_slice(&raw)?;

        image.cfg.validate()?;
        if image.n != image.cfg.n {
            return Err(Error::Image(format!(
                "node count {} does not match config {}",
                image.n, image.cfg.n
            )));
        }
        check_state(&image.state, image.n)?;
        check_state(&image.initial_state, image.n)?;
        let dense = DenseMatrix::from_cells(image.n, image.cells)?;
        dense.validate()?;
        let initial_dense = DenseMatrix::from_cells(image.n, image.initial_cells)?;
        initial_dense.validate()?;

        if image.memory.len() != image.n
            || image.memory.model() != image.cfg.memory
            || !image.memory.is_consistent()
        {
            return Err(Error::Image("activity memory is inconsistent".into()));
        }
        // `reset` rebuilds the memory from the config, so both must agree.
        if let Some(alpha) = image.memory.alpha() {
            if alpha != image.cfg.alpha {
                return Err(Error::Image(format!(
                    "memory alpha {alpha} does not match config alpha {}",
                    image.cfg.alpha
                )));
            }
        }
        if image.phase == RunPhase::Running {
            return Err(Error::Image("image taken mid-run".into()));
        }

        let matrix = M::from_dense(&dense);
        let counts = LinkCounts::recount(&matrix);
        Ok(Self {
            cfg: image.cfg,
            seed: image.seed,
            state: image.state,
            next_state: vec![0; image.n],
            signals: vec![0; image.n],
            matrix,
            counts,
            memory: image.memory,
            rng: Prng::from_state(image.rng_state),
            phase: image.phase,
            fast_steps: image.fast_steps,
            macro_steps: image.macro_steps,
            initial: InitialConditions {
                state: image.initial_state,
                matrix: M::from_dense(&initial_dense),
                rng: Prng::from_state(image.initial_rng_state),
            },
        })
    }

    /// Size of the encoded image in bytes.
    pub fn image_size_bytes(&self) -> Result<usize> {
        let mut buf = Vec::new();
        self.save_image_to(&mut buf)?;
        Ok(buf.len())
    }
}

fn write_payload<W: Write>(w: &mut W, raw: &[u8]) -> io::Result<()> {
    let compressed = compress_lz4(raw);
    w.write_all(MAGIC)?;
    w.write_all(&VERSION_CURRENT.to_le_bytes())?;
    w.write_all(&(raw.len() as u64).to_le_bytes())?;
    w.write_all(&(compressed.len() as u64).to_le_bytes())?;
    w.write_all(&compressed)
}

/// Read the header and the compressed payload, returning the raw JSON bytes.
fn read_payload<R: Read>(r: &mut R) -> Result<Vec<u8>> {
    let mut magic = [0u8; 8];
    r.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(Error::Image("bad magic".into()));
    }
    let version = read_u32_le(r)?;
    if version != VERSION_CURRENT {
        return Err(Error::Image(format!("unsupported version {version}")));
    }
    let raw_len = read_u64_le(r)?;
    let compressed_len = read_u64_le(r)?;
    if raw_len > MAX_PAYLOAD_BYTES || compressed_len > MAX_PAYLOAD_BYTES {
        return Err(Error::Image("payload too large".into()));
    }

    // Grows with the bytes actually present, not with the header's claim.
    let mut compressed = Vec::new();
    r.by_ref().take(compressed_len).read_to_end(&mut compressed)?;
    if compressed.len() as u64 != compressed_len {
        return Err(Error::Image(format!(
            "truncated payload: {} of {compressed_len} bytes",
            compressed.len()
        )));
    }
    // An LZ4 block expands at most 255x.
    if raw_len > (compressed_len * MAX_LZ4_RATIO).saturating_add(16) {
        return Err(Error::Image("decompressed length exceeds lz4 bound".into()));
    }
    Ok(decompress_lz4(&compressed, raw_len as usize)?)
}

fn read_u32_le<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut b = [0u8; 4];
    r.read_exact(&mut b)?;
    Ok(u32::from_le_bytes(b))
}

fn read_u64_le<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut b = [0u8; 8];
    r.read_exact(&mut b)?;
    Ok(u64::from_le_bytes(b))
}
