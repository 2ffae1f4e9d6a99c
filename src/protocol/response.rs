//! Response definitions
//!
//! Classifies the raw bytes of one status read.

use crate::error::{CacheError, Result};
use super::StatusCode;

/// One decoded status segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment {
    /// Single zero byte
    Ok,

    /// Single non-zero byte found in the status table
    Code(StatusCode),

    /// Multi-byte reply, or a byte outside the table: free text from the server
    Diagnostic(Vec<u8>),
}

impl StatusSegment {
    /// Classify the bytes returned by one read.
    ///
    /// The number of bytes read decides the case; an empty read is end of
    /// stream and must be handled by the caller before getting here.
    pub fn classify(bytes: &[u8]) -> Self {
        match bytes {
            [0] => StatusSegment::Ok,
            [byte] => match StatusCode::from_byte(*byte) {
                Some(code) => StatusSegment::Code(code),
                None => StatusSegment::Diagnostic(bytes.to_vec()),
            },
            _ => StatusSegment::Diagnostic(bytes.to_vec()),
        }
    }

    /// Convert to `Ok(())` or the matching error
    pub fn into_result(self) -> Result<()> {
        match self {
            StatusSegment::Ok => Ok(()),
            StatusSegment::Code(code) => Err(code.to_error()),
            StatusSegment::Diagnostic(raw) => {
                Err(CacheError::Server(String::from_utf8_lossy(&raw).into_owned()))
            }
        }
    }

    /// Whether the server reported success; every other segment is a failure
    pub fn is_ok(&self) -> bool {
        matches!(self, StatusSegment::Ok)
    }
}
