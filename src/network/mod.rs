//! Network Module
//!
//! Connection setup and the session facade.
//!
//! ## Architecture
//! - One TCP connection per session, owned exclusively
//! - Authentication handshake before the session is returned
//! - One lock held across each full request/reply exchange

mod transport;
mod handshake;
mod session;

pub use transport::{dial, Transport};
pub use handshake::{authenticate, AUTH_ACCEPTED, AUTH_REQUIRED};
pub use session::Session;
