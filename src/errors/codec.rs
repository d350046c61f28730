//! Payload and swap path decoding errors.

/// Errors that can occur while decoding byte payloads
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Buffer truncated: needed {needed} more bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    #[error("Unexpected {count} trailing bytes after payload")]
    TrailingBytes { count: usize },

    #[error("Unsupported payload version {version}, expected {expected}")]
    UnsupportedVersion { version: u8, expected: u8 },

    #[error("Swap path has invalid length {len}: expected 20 + k * 23 bytes")]
    InvalidPathLength { len: usize },

    #[error("Swap path is empty")]
    EmptyPath,

    #[error("Leg count {count} exceeds maximum of {max}")]
    TooManyLegs { count: usize, max: usize },

    #[error("Encoded {field} length {len} exceeds the {max}-byte wire limit")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}
