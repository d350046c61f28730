//! Typed byte codecs for payloads crossing the callback boundary.
//!
//! Three payloads are carried as opaque bytes through the system and decoded
//! only at their consumer:
//!
//! - **Swap paths** (`path`): `asset(20B) [feeTier(3B) asset(20B)]*` hop
//!   sequences produced by the path finder and interpreted by the swap venue.
//! - **Positions** (`position`): the adapter-specific encoding of borrow and
//!   collateral legs; never interpreted by the orchestrator.
//! - **Callback payloads** (`callback`): `(user, adapter, target_market,
//!   position_data)` round-tripped through the flash-loan callback.
//!
//! All decoding goes through the explicit, length-checked [`ByteReader`];
//! there is no offset arithmetic over flat buffers. Every payload carries a
//! one-byte schema version so the layout can evolve.

pub mod callback;
pub mod path;
pub mod position;

pub use callback::CallbackPayload;
pub use path::{FeeTier, PathHop, SwapPath};
pub use position::{BorrowLeg, CollateralLeg, LegAmount, Position};

use crate::errors::{CodecError, Result};
use alloy::primitives::{Address, U256};

/// Cursor over an immutable byte buffer with length-checked reads.
///
/// Every read either returns the requested bytes or a `CodecError::Truncated`
/// naming the offset and shortfall; a reader is expected to be drained with
/// [`ByteReader::finish`] so trailing garbage is rejected.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Wrap a buffer for reading from the start.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// Read exactly `len` bytes.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(CodecError::Truncated {
                offset: self.offset,
                needed: len - self.remaining(),
            }
            .into());
        }
        let slice = &self.buf[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Read a single byte.
    pub fn take_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a big-endian `u16`.
    pub fn take_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read a 3-byte big-endian unsigned integer (fee tier wire width).
    pub fn take_u24(&mut self) -> Result<u32> {
        let bytes = self.take(3)?;
        Ok(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }

    /// Read a 20-byte address.
    pub fn take_address(&mut self) -> Result<Address> {
        Ok(Address::from_slice(self.take(20)?))
    }

    /// Read a 32-byte big-endian `U256`.
    pub fn take_u256(&mut self) -> Result<U256> {
        Ok(U256::from_be_slice(self.take(32)?))
    }

    /// Assert the buffer is fully consumed.
    pub fn finish(self) -> Result<()> {
        if self.remaining() != 0 {
            return Err(CodecError::TrailingBytes {
                count: self.remaining(),
            }
            .into());
        }
        Ok(())
    }
}
