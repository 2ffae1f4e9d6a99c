//! Authentication handshake
//!
//! Runs once per connection, before the session is handed out:
//!
//! ```text
//! server → client   [flag]          1 = credentials required
//! client → server   base64(AES-CBC(password))
//! server → client   [verdict]       0 = accepted
//! ```

use std::io::{Read, Write};

use crate::cipher;
use crate::error::{CacheError, Result};

/// Flag byte announcing that the server wants credentials
pub const AUTH_REQUIRED: u8 = 1;

/// Verdict byte for accepted credentials
pub const AUTH_ACCEPTED: u8 = 0;

/// Run the handshake over a freshly established stream.
///
/// The key is only checked when the server asks for credentials.
pub fn authenticate<S: Read + Write>(stream: &mut S, password: &str, key: &[u8]) -> Result<()> {
    let mut flag = [0u8; 1];
    stream.read_exact(&mut flag)?;

    if flag[0] != AUTH_REQUIRED {
        tracing::debug!("Server does not require authentication");
        return Ok(());
    }

    let credential = cipher::encrypt_password(password, key)?;
    stream.write_all(credential.as_bytes())?;
    stream.flush()?;

    let mut verdict = [0u8; 1];
    stream.read_exact(&mut verdict)?;

    if verdict[0] != AUTH_ACCEPTED {
        tracing::debug!("Server rejected credentials (verdict {})", verdict[0]);
        return Err(CacheError::AuthRejected);
    }

    tracing::debug!("Authenticated");
    Ok(())
}
