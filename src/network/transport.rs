//! Transport abstraction
//!
//! The byte stream a session owns.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::Result;

/// A bidirectional byte stream that can be closed explicitly
pub trait Transport: Read + Write + Send {
    /// Close both directions of the stream
    fn close(&mut self) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            // Already torn down by the peer
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

/// Dial the configured endpoint and apply socket options
pub fn dial(config: &ClientConfig) -> Result<TcpStream> {
    config.validate()?;

    let addr = config.addr();
    tracing::debug!("Connecting to {}", addr);
    let stream = TcpStream::connect(addr.as_str())?;

    stream.set_nodelay(config.nodelay)?;
    if config.read_timeout_ms > 0 {
        stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
    }
    if config.write_timeout_ms > 0 {
        stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
    }

    Ok(stream)
}
