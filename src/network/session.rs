//! Session
//!
//! The authenticated handle over one connection.

use std::io::{self, Read};
use std::net::TcpStream;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::ClientConfig;
use crate::error::{CacheError, PersistFailure, Result};
use crate::protocol::{
    decode_count, decode_keys, decode_ttl, decode_value, read_segment, read_status, write_command,
    Command, ReplyShape, COUNT_BUFFER_SIZE, TTL_BUFFER_SIZE,
};
use super::handshake::authenticate;
use super::transport::{dial, Transport};

/// A live, authenticated connection to the cache server
///
/// ## Concurrency Model
///
/// The protocol has no request identifiers: replies are matched to requests
/// purely by order on the stream. Every operation therefore holds `conn`
/// from the moment its command is written until its last reply segment has
/// been read, so exchanges from concurrent callers never interleave.
///
/// There are no timeouts beyond those configured on the socket; a server
/// that stops answering blocks the caller holding the lock, and everyone
/// queued behind it.
pub struct Session<T: Transport = TcpStream> {
    /// The transport; `None` once the session has been shut down
    conn: Mutex<Option<T>>,
}

impl Session<TcpStream> {
    /// Dial `host:port` and authenticate
    pub fn connect(
        host: impl Into<String>,
        port: u16,
        password: impl Into<String>,
        cipher_key: impl AsRef<[u8]>,
    ) -> Result<Self> {
        let config = ClientConfig::builder()
            .host(host)
            .port(port)
            .password(password)
            .cipher_key(cipher_key)
            .build();
        Self::connect_with(&config)
    }

    /// Dial and authenticate using a full configuration
    pub fn connect_with(config: &ClientConfig) -> Result<Self> {
        let stream = dial(config)?;
        Self::handshake(stream, &config.password, &config.cipher_key)
    }
}

impl<T: Transport> Session<T> {
    /// Authenticate over an established transport.
    ///
    /// On any handshake failure the transport is closed and the error returned.
    pub fn handshake(mut transport: T, password: &str, cipher_key: &[u8]) -> Result<Self> {
        if let Err(e) = authenticate(&mut transport, password, cipher_key) {
            let _ = transport.close();
            return Err(e);
        }
        Ok(Self {
            conn: Mutex::new(Some(transport)),
        })
    }

    /// Whether `shutdown`/`close` has run
    pub fn is_closed(&self) -> bool {
        self.conn.lock().is_none()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Store `value` under `key`, overwriting any previous value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let command = Command::Set {
            key: key.to_string(),
            value: value.to_string(),
        };
        self.exchange(&command, 0).map(drop)
    }

    /// Store `value` under `key` for `expiry` (millisecond granularity)
    pub fn set_ex(&self, key: &str, value: &str, expiry: Duration) -> Result<()> {
        let command = Command::SetEx {
            key: key.to_string(),
            value: value.to_string(),
            expiry,
        };
        self.exchange(&command, 0).map(drop)
    }

    /// Store `value` only if `key` is absent; fails with `AlreadyExists` otherwise
    pub fn set_nx(&self, key: &str, value: &str) -> Result<()> {
        let command = Command::SetNx {
            key: key.to_string(),
            value: value.to_string(),
        };
        self.exchange(&command, 0).map(drop)
    }

    pub fn del(&self, key: &str) -> Result<()> {
        self.exchange(&Command::Del { key: key.to_string() }, 0).map(drop)
    }

    /// Delete with background reclamation on the server. Same reply as `del`.
    pub fn unlink(&self, key: &str) -> Result<()> {
        self.exchange(&Command::Unlink { key: key.to_string() }, 0).map(drop)
    }

    pub fn incr(&self, key: &str) -> Result<()> {
        self.exchange(&Command::Incr { key: key.to_string() }, 0).map(drop)
    }

    pub fn incr_by(&self, key: &str, delta: i64) -> Result<()> {
        let command = Command::IncrBy {
            key: key.to_string(),
            delta,
        };
        self.exchange(&command, 0).map(drop)
    }

    /// Remove every entry
    pub fn clear(&self) -> Result<()> {
        self.exchange(&Command::Cls, 0).map(drop)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetch the value stored under `key`.
    ///
    /// `max_size` is the read buffer for the value; longer values are
    /// truncated and the remainder is left on the stream.
    pub fn get(&self, key: &str, max_size: usize) -> Result<String> {
        let payload = self.exchange(&Command::Get { key: key.to_string() }, max_size)?;
        decode_value(payload)
    }

    /// Number of stored items
    pub fn count(&self) -> Result<u64> {
        let payload = self.exchange(&Command::Cnt, COUNT_BUFFER_SIZE)?;
        decode_count(&payload)
    }

    /// Remaining time-to-live of `key`
    pub fn ttl(&self, key: &str) -> Result<Duration> {
        let payload = self.exchange(&Command::Ttl { key: key.to_string() }, TTL_BUFFER_SIZE)?;
        decode_ttl(&payload)
    }

    /// Keys matching `pattern`; `max_size` bounds the JSON reply
    pub fn keys(&self, pattern: &str, max_size: usize) -> Result<Vec<String>> {
        let command = Command::Keys {
            pattern: pattern.to_string(),
        };
        let payload = self.exchange(&command, max_size)?;
        decode_keys(&payload)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Persist the store to a server-side file.
    ///
    /// The server reports the non-expiring and the expiring partitions
    /// separately. Both reports are always read; a failure in either (or
    /// both) is returned as [`CacheError::Persist`].
    pub fn save(&self, filename: &str) -> Result<()> {
        let command = Command::Save {
            filename: filename.to_string(),
        };
        self.exchange(&command, 0).map(drop)
    }

    /// Restore the store from a server-side file
    pub fn load(&self, filename: &str) -> Result<()> {
        let command = Command::Load {
            filename: filename.to_string(),
        };
        self.exchange(&command, 0).map(drop)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Send EXIT (best effort) and close the connection
    pub fn shutdown(&self) -> Result<()> {
        self.terminate(Command::Exit)
    }

    /// Send QUIT (best effort) and close the connection
    pub fn close(&self) -> Result<()> {
        self.terminate(Command::Quit)
    }

    fn terminate(&self, command: Command) -> Result<()> {
        let mut guard = self.conn.lock();
        let mut transport = guard.take().ok_or_else(not_connected)?;

        tracing::debug!("Sending {:?} and closing session", command.op_code());
        let sent = write_command(&mut transport, &command);

        // Later callers find `None` and fail instead of waiting on the lock.
        drop(guard);

        let closed = transport.close();
        sent?;
        closed?;
        Ok(())
    }

    // =========================================================================
    // Exchange
    // =========================================================================

    /// Write `command` and read the reply its op code calls for, all under
    /// the lock. `capacity` sizes the payload read; the payload is empty for
    /// status-only replies.
    fn exchange(&self, command: &Command, capacity: usize) -> Result<Vec<u8>> {
        let mut guard = self.conn.lock();
        let conn = guard.as_mut().ok_or_else(not_connected)?;

        let shape = command.op_code().reply_shape();
        tracing::trace!("Sending {:?}, expecting {:?}", command.op_code(), shape);
        write_command(conn, command)?;

        match shape {
            ReplyShape::Status => read_ok(conn).map(|()| Vec::new()),
            ReplyShape::StatusThenPayload => read_payload(conn, capacity),
            ReplyShape::TwoStatus => read_persist_phases(conn).map(|()| Vec::new()),
            ReplyShape::None => Ok(Vec::new()),
        }
    }
}

fn not_connected() -> CacheError {
    io::Error::new(io::ErrorKind::NotConnected, "session is closed").into()
}

/// Read one status segment and map it to a result
fn read_ok<R: Read>(conn: &mut R) -> Result<()> {
    read_status(conn)?.into_result()
}

/// Read a status segment, then on success one payload segment
fn read_payload<R: Read>(conn: &mut R, capacity: usize) -> Result<Vec<u8>> {
    read_status(conn)?.into_result()?;
    read_segment(conn, capacity)
}

/// Read both persistence reports; transport errors abort, status failures are collected
fn read_persist_phases<R: Read>(conn: &mut R) -> Result<()> {
    let non_expiring = read_status(conn)?.into_result();
    let expiring = read_status(conn)?.into_result();
    match PersistFailure::from_phases(non_expiring, expiring) {
        None => Ok(()),
        Some(failure) => Err(CacheError::Persist(failure)),
    }
}
