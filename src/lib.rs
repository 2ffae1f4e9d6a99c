//! # cachelink
//!
//! A blocking client for a remote key-value cache server:
//! - Challenge-response authentication with an AES-CBC credential
//! - JSON command envelopes, unframed status/payload replies
//! - One connection per session, one lock per request/reply exchange
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Callers (any thread)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Session                                │
//! │          (Mutex held across write + every read)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Codec    │          │  Handshake  │
//!   │   (JSON)    │          │  (Cipher)   │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          └───────────┬────────────┘
//!                      ▼
//!              ┌─────────────┐
//!              │  Transport  │
//!              │    (TCP)    │
//!              └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use cachelink::Session;
//!
//! let session = Session::connect("127.0.0.1", 8448, "123456", "SJL *loves* ZHH-")?;
//! session.set("name", "value")?;
//! assert_eq!(session.get("name", 64)?, "value");
//! session.shutdown()?;
//! # Ok::<(), cachelink::CacheError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod cipher;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CacheError, PersistFailure, Result};
pub use config::ClientConfig;
pub use network::{Session, Transport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of cachelink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
