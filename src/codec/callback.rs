//! Flash-loan callback payload codec.
//!
//! The orchestrator threads `(user, adapter, target_market, position_data)`
//! through the flash-loan provider as opaque bytes and re-derives the tuple
//! when the callback fires. The position data inside stays opaque here; only
//! the adapter decodes it.

use crate::codec::ByteReader;
use crate::errors::{CodecError, Result};
use alloy::primitives::{Address, Bytes};

/// Current callback payload schema version.
pub const CALLBACK_SCHEMA_VERSION: u8 = 1;

/// The tuple carried through the flash-loan callback boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackPayload {
    /// The user whose position is being migrated.
    pub user: Address,
    /// The adapter address authorized for this migration.
    pub adapter: Address,
    /// The target lending market.
    pub target_market: Address,
    /// Opaque adapter-specific position encoding.
    pub position_data: Bytes,
}

impl CallbackPayload {
    /// Encode to `version(1) user(20) adapter(20) market(20) posLen(2) pos`.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::FieldTooLong` when the position data does not fit
    /// the two-byte length prefix.
    pub fn encode(&self) -> Result<Bytes> {
        let position_len: u16 =
            self.position_data
                .len()
                .try_into()
                .map_err(|_| CodecError::FieldTooLong {
                    field: "position_data",
                    len: self.position_data.len(),
                    max: u16::MAX as usize,
                })?;
        let mut out = Vec::with_capacity(63 + self.position_data.len());
        out.push(CALLBACK_SCHEMA_VERSION);
        out.extend_from_slice(self.user.as_slice());
        out.extend_from_slice(self.adapter.as_slice());
        out.extend_from_slice(self.target_market.as_slice());
        out.extend_from_slice(&position_len.to_be_bytes());
        out.extend_from_slice(&self.position_data);
        Ok(Bytes::from(out))
    }

    /// Decode and validate the full payload.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data);

        let version = reader.take_u8()?;
        if version != CALLBACK_SCHEMA_VERSION {
            return Err(CodecError::UnsupportedVersion {
                version,
                expected: CALLBACK_SCHEMA_VERSION,
            }
            .into());
        }

        let user = reader.take_address()?;
        let adapter = reader.take_address()?;
        let target_market = reader.take_address()?;
        let position_len = reader.take_u16()? as usize;
        let position_data = Bytes::copy_from_slice(reader.take(position_len)?);
        reader.finish()?;

        Ok(Self {
            user,
            adapter,
            target_market,
            position_data,
        })
    }
}
