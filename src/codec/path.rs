//! Swap path representation and wire codec.
//!
//! A swap path is an ordered sequence of hops through fee-tiered pools,
//! carried on the wire as `asset(20B) [feeTier(3B) asset(20B)]*`. A single
//! bare asset (exactly 20 bytes) is the sentinel for "no conversion required":
//! the leg's asset already matches the needed asset. Paths are opaque bytes to
//! the orchestrator and adapters; only the path finder and the swap venue
//! interpret hop structure, and they do so through this typed parser.

use crate::codec::ByteReader;
use crate::errors::{CodecError, Result};
use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of one encoded hop (fee tier + next asset).
const HOP_WIDTH: usize = 23;

/// A pool fee tier in hundredths of a basis point, as fee-tiered AMMs quote them.
///
/// The reserved tier `0` marks a parity hop: a non-market 1:1 conversion
/// (e.g. a wrapped-stablecoin redeemer) that bypasses the venue's pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeeTier(pub u32);

impl FeeTier {
    /// 1:1 parity conversion, no pool involved.
    pub const PARITY: FeeTier = FeeTier(0);
    /// 0.01%
    pub const LOWEST: FeeTier = FeeTier(100);
    /// 0.05%
    pub const LOW: FeeTier = FeeTier(500);
    /// 0.3%
    pub const MEDIUM: FeeTier = FeeTier(3_000);
    /// 1%
    pub const HIGH: FeeTier = FeeTier(10_000);

    /// Whether this tier is the reserved parity marker.
    pub fn is_parity(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One hop of a swap path: cross `fee`-tier liquidity into `asset_out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathHop {
    pub fee: FeeTier,
    pub asset_out: Address,
}

/// A typed swap path: a start asset followed by zero or more hops.
///
/// Zero hops means "no conversion required"; the path still names the asset
/// so consumers can validate it against the leg being processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPath {
    start: Address,
    hops: Vec<PathHop>,
}

impl SwapPath {
    /// A no-conversion path for `asset`.
    pub fn identity(asset: Address) -> Self {
        Self {
            start: asset,
            hops: Vec::new(),
        }
    }

    /// A single-hop path `asset_in -[fee]-> asset_out`.
    pub fn single(asset_in: Address, fee: FeeTier, asset_out: Address) -> Self {
        Self {
            start: asset_in,
            hops: vec![PathHop {
                fee,
                asset_out,
            }],
        }
    }

    /// Extend this path with one more hop, returning the longer path.
    pub fn extended(&self, fee: FeeTier, asset_out: Address) -> Self {
        let mut hops = self.hops.clone();
        hops.push(PathHop { fee, asset_out });
        Self {
            start: self.start,
            hops,
        }
    }

    /// The asset the path starts from.
    pub fn start_asset(&self) -> Address {
        self.start
    }

    /// The asset the path ends at. Equal to the start asset for identity paths.
    pub fn end_asset(&self) -> Address {
        self.hops.last().map(|h| h.asset_out).unwrap_or(self.start)
    }

    /// The hops in execution order.
    pub fn hops(&self) -> &[PathHop] {
        &self.hops
    }

    /// Number of hops.
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    /// Whether this path performs no conversion.
    pub fn is_identity(&self) -> bool {
        self.hops.is_empty()
    }

    /// Encode to the `asset [fee asset]*` wire layout.
    pub fn encode(&self) -> Bytes {
        let mut out = Vec::with_capacity(20 + self.hops.len() * HOP_WIDTH);
        out.extend_from_slice(self.start.as_slice());
        for hop in &self.hops {
            out.extend_from_slice(&hop.fee.0.to_be_bytes()[1..4]);
            out.extend_from_slice(hop.asset_out.as_slice());
        }
        Bytes::from(out)
    }

    /// Decode from the wire layout.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::EmptyPath` for an empty buffer and
    /// `CodecError::InvalidPathLength` when the buffer is not
    /// `20 + k * 23` bytes long.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(CodecError::EmptyPath.into());
        }
        if data.len() < 20 || (data.len() - 20) % HOP_WIDTH != 0 {
            return Err(CodecError::InvalidPathLength { len: data.len() }.into());
        }

        let mut reader = ByteReader::new(data);
        let start = reader.take_address()?;
        let hop_count = (data.len() - 20) / HOP_WIDTH;
        let mut hops = Vec::with_capacity(hop_count);
        for _ in 0..hop_count {
            let fee = FeeTier(reader.take_u24()?);
            let asset_out = reader.take_address()?;
            hops.push(PathHop { fee, asset_out });
        }
        reader.finish()?;

        Ok(Self { start, hops })
    }
}

impl fmt::Display for SwapPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        for hop in &self.hops {
            write!(f, " -[{}]-> {}", hop.fee, hop.asset_out)?;
        }
        Ok(())
    }
}
