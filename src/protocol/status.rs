//! Status codes
//!
//! The fixed table a single non-zero status byte indexes into.

use crate::error::CacheError;

/// Coded server failures. Discriminants are the wire status byte; byte 0 is
/// success and has no code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StatusCode {
    Syntax = 1,
    NotFound = 2,
    AlreadyExists = 3,
    NonExpiringSaveFailed = 4,
    ExpiringSaveFailed = 5,
    RestoreFailed = 6,
}

/// Status table, index = status byte. Slot 0 is reserved for success.
pub static STATUS_TABLE: [Option<StatusCode>; 7] = [
    None,
    Some(StatusCode::Syntax),
    Some(StatusCode::NotFound),
    Some(StatusCode::AlreadyExists),
    Some(StatusCode::NonExpiringSaveFailed),
    Some(StatusCode::ExpiringSaveFailed),
    Some(StatusCode::RestoreFailed),
];

impl StatusCode {
    /// Look up a non-zero status byte; `None` for 0 and anything past the table
    pub fn from_byte(byte: u8) -> Option<Self> {
        STATUS_TABLE.get(byte as usize).copied().flatten()
    }

    /// The error this code stands for
    pub fn to_error(self) -> CacheError {
        match self {
            StatusCode::Syntax => CacheError::Syntax,
            StatusCode::NotFound => CacheError::NotFound,
            StatusCode::AlreadyExists => CacheError::AlreadyExists,
            StatusCode::NonExpiringSaveFailed => CacheError::NonExpiringSaveFailed,
            StatusCode::ExpiringSaveFailed => CacheError::ExpiringSaveFailed,
            StatusCode::RestoreFailed => CacheError::RestoreFailed,
        }
    }
}
