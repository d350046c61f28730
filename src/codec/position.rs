//! Position payload codec.
//!
//! A position is the adapter-defined payload carried opaquely through
//! `migrate` and the flash-loan callback: an ordered list of borrow legs
//! followed by an ordered list of collateral legs, plus the full-migration
//! flag. Leg order is preserved exactly as supplied because route and bound
//! validity can depend on amounts computed from earlier legs.
//!
//! The payload has no lifecycle beyond a single call: it is decoded, consumed,
//! and discarded.

use crate::codec::{ByteReader, SwapPath};
use crate::errors::{CodecError, Result};
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Current position payload schema version.
pub const POSITION_SCHEMA_VERSION: u8 = 1;

/// Upper bound on legs per side, to reject absurd payloads before allocation.
const MAX_LEGS: usize = 64;

/// Wire flag bit: full migration requested.
const FLAG_FULL_MIGRATION: u8 = 0b0000_0001;

/// Amount of a leg: either an exact figure or the entirety of the user's
/// balance for the asset, read from live protocol accounting at execution
/// time.
///
/// The `All` sentinel is load-bearing: a flash-loan call is atomic, so the
/// balance at the moment of execution is deterministic and "migrate
/// everything" never requires a pre-computed number. On the wire `All`
/// encodes as `U256::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegAmount {
    Exact(U256),
    All,
}

impl LegAmount {
    fn encode(&self) -> U256 {
        match self {
            LegAmount::Exact(amount) => *amount,
            LegAmount::All => U256::MAX,
        }
    }

    fn decode(raw: U256) -> Self {
        if raw == U256::MAX {
            LegAmount::All
        } else {
            LegAmount::Exact(raw)
        }
    }

    /// Resolve against a live balance read from protocol accounting.
    pub fn resolve(&self, live_balance: U256) -> U256 {
        match self {
            LegAmount::Exact(amount) => *amount,
            LegAmount::All => live_balance,
        }
    }
}

/// One outstanding debt to clear in the source protocol.
///
/// `swap_path` converts working funds into the debt asset when they differ
/// (identity path otherwise); `swap_bound` is the maximum input the swap may
/// consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowLeg {
    pub debt_asset: Address,
    pub amount: LegAmount,
    pub swap_path: SwapPath,
    pub swap_bound: U256,
}

/// One collateral balance to move into the target protocol.
///
/// `swap_path` converts the withdrawn collateral into the target's deposit
/// asset when they differ; `swap_bound` is the minimum output the swap must
/// produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralLeg {
    pub collateral_asset: Address,
    pub amount: LegAmount,
    pub swap_path: SwapPath,
    pub swap_bound: U256,
}

/// A user's position to migrate: borrow legs then collateral legs, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub borrows: Vec<BorrowLeg>,
    pub collaterals: Vec<CollateralLeg>,
    /// When set, the adapter must verify the source protocol reports zero
    /// remaining debt (within dust tolerance) after all borrow legs.
    pub full_migration: bool,
}

impl Position {
    /// Encode to the versioned wire layout:
    /// `version(1) flags(1) borrowCount(2) borrowLeg* collateralCount(2) collateralLeg*`
    /// where a leg is `asset(20) amount(32) bound(32) pathLen(2) path`.
    ///
    /// # Errors
    ///
    /// Returns a `CodecError` when either leg list exceeds the hard maximum
    /// or a swap path does not fit its two-byte length prefix.
    pub fn encode(&self) -> Result<Bytes> {
        check_leg_count(self.borrows.len())?;
        check_leg_count(self.collaterals.len())?;

        let mut out = Vec::new();
        out.push(POSITION_SCHEMA_VERSION);
        out.push(if self.full_migration {
            FLAG_FULL_MIGRATION
        } else {
            0
        });

        out.extend_from_slice(&(self.borrows.len() as u16).to_be_bytes());
        for leg in &self.borrows {
            encode_leg(
                &mut out,
                leg.debt_asset,
                leg.amount,
                &leg.swap_path,
                leg.swap_bound,
            )?;
        }

        out.extend_from_slice(&(self.collaterals.len() as u16).to_be_bytes());
        for leg in &self.collaterals {
            encode_leg(
                &mut out,
                leg.collateral_asset,
                leg.amount,
                &leg.swap_path,
                leg.swap_bound,
            )?;
        }

        Ok(Bytes::from(out))
    }

    /// Decode from the versioned wire layout.
    ///
    /// # Errors
    ///
    /// Returns a `CodecError` for unsupported versions, truncated buffers,
    /// trailing bytes, or leg counts above the hard maximum.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data);

        let version = reader.take_u8()?;
        if version != POSITION_SCHEMA_VERSION {
            return Err(CodecError::UnsupportedVersion {
                version,
                expected: POSITION_SCHEMA_VERSION,
            }
            .into());
        }
        let flags = reader.take_u8()?;
        let full_migration = flags & FLAG_FULL_MIGRATION != 0;

        let borrow_count = reader.take_u16()? as usize;
        check_leg_count(borrow_count)?;
        let mut borrows = Vec::with_capacity(borrow_count);
        for _ in 0..borrow_count {
            let (asset, amount, swap_path, swap_bound) = decode_leg(&mut reader)?;
            borrows.push(BorrowLeg {
                debt_asset: asset,
                amount,
                swap_path,
                swap_bound,
            });
        }

        let collateral_count = reader.take_u16()? as usize;
        check_leg_count(collateral_count)?;
        let mut collaterals = Vec::with_capacity(collateral_count);
        for _ in 0..collateral_count {
            let (asset, amount, swap_path, swap_bound) = decode_leg(&mut reader)?;
            collaterals.push(CollateralLeg {
                collateral_asset: asset,
                amount,
                swap_path,
                swap_bound,
            });
        }

        reader.finish()?;

        Ok(Self {
            borrows,
            collaterals,
            full_migration,
        })
    }
}

fn check_leg_count(count: usize) -> Result<()> {
    if count > MAX_LEGS {
        return Err(CodecError::TooManyLegs {
            count,
            max: MAX_LEGS,
        }
        .into());
    }
    Ok(())
}

fn encode_leg(
    out: &mut Vec<u8>,
    asset: Address,
    amount: LegAmount,
    path: &SwapPath,
    bound: U256,
) -> Result<()> {
    out.extend_from_slice(asset.as_slice());
    out.extend_from_slice(&amount.encode().to_be_bytes::<32>());
    out.extend_from_slice(&bound.to_be_bytes::<32>());
    let encoded_path = path.encode();
    let path_len: u16 = encoded_path
        .len()
        .try_into()
        .map_err(|_| CodecError::FieldTooLong {
            field: "swap_path",
            len: encoded_path.len(),
            max: u16::MAX as usize,
        })?;
    out.extend_from_slice(&path_len.to_be_bytes());
    out.extend_from_slice(&encoded_path);
    Ok(())
}

fn decode_leg(reader: &mut ByteReader<'_>) -> Result<(Address, LegAmount, SwapPath, U256)> {
    let asset = reader.take_address()?;
    let amount = LegAmount::decode(reader.take_u256()?);
    let bound = reader.take_u256()?;
    let path_len = reader.take_u16()? as usize;
    let swap_path = SwapPath::decode(reader.take(path_len)?)?;
    Ok((asset, amount, swap_path, bound))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FeeTier;
    use crate::errors::MigrationError;

    fn addr(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    fn sample_position() -> Position {
        Position {
            borrows: vec![BorrowLeg {
                debt_asset: addr(10),
                amount: LegAmount::All,
                swap_path: SwapPath::single(addr(1), FeeTier::LOW, addr(10)),
                swap_bound: U256::from(1_150_000u64),
            }],
            collaterals: vec![CollateralLeg {
                collateral_asset: addr(20),
                amount: LegAmount::Exact(U256::from(500u64)),
                swap_path: SwapPath::identity(addr(20)),
                swap_bound: U256::ZERO,
            }],
            full_migration: true,
        }
    }

    #[test]
    fn test_position_round_trip_preserves_semantics() {
        let position = sample_position();
        let decoded = Position::decode(&position.encode().unwrap()).unwrap();
        assert_eq!(decoded, position);
        assert!(decoded.full_migration);
        // The ALL sentinel survives the wire as the sentinel, not a number
        assert_eq!(decoded.borrows[0].amount, LegAmount::All);
    }

    #[test]
    fn test_all_sentinel_resolution() {
        assert_eq!(
            LegAmount::All.resolve(U256::from(777)),
            U256::from(777)
        );
        assert_eq!(
            LegAmount::Exact(U256::from(5)).resolve(U256::from(777)),
            U256::from(5)
        );
        // U256::MAX on the wire is indistinguishable from ALL by design
        assert_eq!(LegAmount::decode(U256::MAX), LegAmount::All);
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let mut encoded = sample_position().encode().unwrap().to_vec();
        encoded[0] = 9;
        assert!(matches!(
            Position::decode(&encoded),
            Err(MigrationError::Codec(CodecError::UnsupportedVersion {
                version: 9,
                expected: POSITION_SCHEMA_VERSION,
            }))
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_and_padded_payloads() {
        let encoded = sample_position().encode().unwrap().to_vec();

        let truncated = &encoded[..encoded.len() - 3];
        assert!(matches!(
            Position::decode(truncated),
            Err(MigrationError::Codec(CodecError::Truncated { .. }))
        ));

        let mut padded = encoded.clone();
        padded.push(0xFF);
        assert!(matches!(
            Position::decode(&padded),
            Err(MigrationError::Codec(CodecError::TrailingBytes { count: 1 }))
        ));
    }

    #[test]
    fn test_encode_rejects_oversized_swap_path() {
        // Enough hops that the encoded path outgrows its two-byte prefix
        let mut path = SwapPath::identity(addr(1));
        for i in 0..2_900u32 {
            path = path.extended(FeeTier::LOW, addr((i % 200) as u8));
        }
        let position = Position {
            borrows: vec![BorrowLeg {
                debt_asset: addr(10),
                amount: LegAmount::All,
                swap_path: path,
                swap_bound: U256::ZERO,
            }],
            collaterals: vec![],
            full_migration: false,
        };
        assert!(matches!(
            position.encode(),
            Err(MigrationError::Codec(CodecError::FieldTooLong {
                field: "swap_path",
                ..
            }))
        ));
    }

    #[test]
    fn test_decode_rejects_absurd_leg_counts() {
        // version + flags + borrow count of u16::MAX, nothing else
        let encoded = vec![POSITION_SCHEMA_VERSION, 0, 0xFF, 0xFF];
        assert!(matches!(
            Position::decode(&encoded),
            Err(MigrationError::Codec(CodecError::TooManyLegs { .. }))
        ));
    }
}
