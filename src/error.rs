//! Error types for cachelink
//!
//! Provides a unified error type for all session operations.

use std::fmt;

use thiserror::Error;

/// Result type alias using CacheError
pub type Result<T> = std::result::Result<T, CacheError>;

/// Unified error type for cachelink operations
#[derive(Debug, Error)]
pub enum CacheError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Server Status Codes (fixed table, see protocol::status)
    // -------------------------------------------------------------------------
    #[error("syntax is wrong")]
    Syntax,

    #[error("item not found")]
    NotFound,

    #[error("item already exists")]
    AlreadyExists,

    #[error("non-expiring cache save failed")]
    NonExpiringSaveFailed,

    #[error("expiring cache save failed")]
    ExpiringSaveFailed,

    #[error("restore from file failed")]
    RestoreFailed,

    /// Free-text diagnostic sent by the server in place of a status byte
    #[error("server error: {0}")]
    Server(String),

    // -------------------------------------------------------------------------
    // Payload Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("persist failed: {0}")]
    Persist(PersistFailure),

    // -------------------------------------------------------------------------
    // Connection Setup Errors
    // -------------------------------------------------------------------------
    #[error("authentication rejected by server")]
    AuthRejected,

    #[error("invalid cipher key length {len}: expected 16, 24 or 32 bytes")]
    InvalidCipherKey { len: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CacheError {
    /// True for the "item not found" status
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound)
    }

    /// True for the "item already exists" status
    pub fn is_already_exists(&self) -> bool {
        matches!(self, CacheError::AlreadyExists)
    }

    /// Whether the session is still usable after this error.
    ///
    /// Status-table outcomes and server diagnostics leave the stream in step
    /// with the server. Transport, decode and handshake failures do not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CacheError::Syntax
                | CacheError::NotFound
                | CacheError::AlreadyExists
                | CacheError::NonExpiringSaveFailed
                | CacheError::ExpiringSaveFailed
                | CacheError::RestoreFailed
                | CacheError::Server(_)
                | CacheError::Persist(_)
        )
    }
}

/// Outcome of a two-phase save where at least one phase failed
#[derive(Debug)]
pub struct PersistFailure {
    /// Failure writing entries without an expiry
    pub non_expiring: Option<Box<CacheError>>,

    /// Failure writing entries with an expiry
    pub expiring: Option<Box<CacheError>>,
}

impl PersistFailure {
    /// Build from the two phase results; `None` when both phases succeeded
    pub fn from_phases(non_expiring: Result<()>, expiring: Result<()>) -> Option<Self> {
        let failure = Self {
            non_expiring: non_expiring.err().map(Box::new),
            expiring: expiring.err().map(Box::new),
        };
        if failure.non_expiring.is_none() && failure.expiring.is_none() {
            None
        } else {
            Some(failure)
        }
    }
}

impl fmt::Display for PersistFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        if let Some(e) = &self.non_expiring {
            write!(f, "non-expiring cache save failed ({})", e)?;
            first = false;
        }
        if let Some(e) = &self.expiring {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "expiring cache save failed ({})", e)?;
        }
        Ok(())
    }
}
