//! Protocol codec
//!
//! Encoding of request envelopes and decoding of reply segments.
//!
//! ## Wire Format
//!
//! ### Request
//! A single JSON object written as one message:
//! ```text
//! {"op": 2, "key": "name", "val": "value", "exp": "10000"}
//! ```
//! - `op`:  operation code (number)
//! - `key`: key, pattern or filename (always present, may be empty)
//! - `val`: value or increment delta (omitted when empty)
//! - `exp`: expiry in milliseconds as decimal text (omitted when empty)
//!
//! ### Reply
//! Replies carry no length prefix. Each segment is whatever one read returns:
//! ```text
//! status segment:  [0x00]          success
//!                  [code]          status table entry
//!                  [b0 b1 ...]     free-text server diagnostic
//! payload segment: raw bytes       value / count / ttl / {"keys": [...]}
//! ```
//! A read buffer smaller than the reply silently truncates it, so callers
//! must size payload buffers for the largest reply they expect.

use std::io::{self, Read, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};
use super::{Command, OpCode, StatusSegment};

/// Read buffer for a status segment
pub const STATUS_BUFFER_SIZE: usize = 128;

/// Read buffer for the `Cnt` payload (any u64 in decimal)
pub const COUNT_BUFFER_SIZE: usize = 20;

/// Read buffer for the `Ttl` payload
pub const TTL_BUFFER_SIZE: usize = 128;

// =============================================================================
// Request Envelope
// =============================================================================

#[derive(Debug, Serialize)]
struct EnvelopeRef<'a> {
    op: u8,
    key: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    val: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    exp: &'a str,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    op: u8,
    #[serde(default)]
    key: String,
    #[serde(default)]
    val: String,
    #[serde(default)]
    exp: String,
}

/// Encode a command to its JSON envelope
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    let value = command.value();
    let expiry = command
        .expiry_millis()
        .map(|ms| ms.to_string())
        .unwrap_or_default();

    let envelope = EnvelopeRef {
        op: command.op_code() as u8,
        key: command.key(),
        val: &value,
        exp: &expiry,
    };

    serde_json::to_vec(&envelope).map_err(|e| CacheError::Encode(e.to_string()))
}

/// Decode a JSON envelope back into a command
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let envelope: Envelope = serde_json::from_slice(bytes)
        .map_err(|e| CacheError::Decode(format!("request envelope: {}", e)))?;

    let op = OpCode::from_u8(envelope.op)
        .ok_or_else(|| CacheError::Decode(format!("unknown op code: {}", envelope.op)))?;

    let Envelope { key, val, exp, .. } = envelope;
    let command = match op {
        OpCode::SetEx => {
            let millis: u64 = exp
                .parse()
                .map_err(|_| CacheError::Decode(format!("invalid expiry: {:?}", exp)))?;
            Command::SetEx {
                key,
                value: val,
                expiry: Duration::from_millis(millis),
            }
        }
        OpCode::SetNx => Command::SetNx { key, value: val },
        OpCode::Set => Command::Set { key, value: val },
        OpCode::Get => Command::Get { key },
        OpCode::Del => Command::Del { key },
        OpCode::Unlink => Command::Unlink { key },
        OpCode::Incr => Command::Incr { key },
        OpCode::IncrBy => {
            let delta: i64 = val
                .parse()
                .map_err(|_| CacheError::Decode(format!("invalid delta: {:?}", val)))?;
            Command::IncrBy { key, delta }
        }
        OpCode::Ttl => Command::Ttl { key },
        OpCode::Keys => Command::Keys { pattern: key },
        OpCode::Cnt => Command::Cnt,
        OpCode::Save => Command::Save { filename: key },
        OpCode::Load => Command::Load { filename: key },
        OpCode::Cls => Command::Cls,
        OpCode::Exit => Command::Exit,
        OpCode::Quit => Command::Quit,
    };

    Ok(command)
}

/// Write a command to a stream as one message
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Reply Segments
// =============================================================================

/// Perform one read of at most `capacity` bytes.
///
/// End of stream is an `UnexpectedEof` I/O error, never an empty segment.
pub fn read_segment<R: Read>(reader: &mut R, capacity: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; capacity];
    let n = loop {
        match reader.read(&mut buf) {
            Ok(n) => break n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    };
    if n == 0 && capacity > 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed by server").into());
    }
    buf.truncate(n);
    Ok(buf)
}

/// Read and classify one status segment
pub fn read_status<R: Read>(reader: &mut R) -> Result<StatusSegment> {
    let bytes = read_segment(reader, STATUS_BUFFER_SIZE)?;
    Ok(StatusSegment::classify(&bytes))
}

// =============================================================================
// Payload Decoding
// =============================================================================

#[derive(Debug, Deserialize)]
struct KeyList {
    #[serde(default)]
    keys: Option<Vec<String>>,
}

/// Decode a value payload as UTF-8 text
pub fn decode_value(payload: Vec<u8>) -> Result<String> {
    String::from_utf8(payload).map_err(|e| CacheError::Decode(format!("value is not UTF-8: {}", e)))
}

/// Decode the decimal item count
pub fn decode_count(payload: &[u8]) -> Result<u64> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| CacheError::Decode("count is not UTF-8".to_string()))?;
    text.parse()
        .map_err(|_| CacheError::Decode(format!("invalid count: {:?}", text)))
}

/// Decode the `{"keys": [...]}` payload; a null or missing list is empty
pub fn decode_keys(payload: &[u8]) -> Result<Vec<String>> {
    let list: KeyList = serde_json::from_slice(payload)
        .map_err(|e| CacheError::Decode(format!("key list: {}", e)))?;
    Ok(list.keys.unwrap_or_default())
}

/// Decode the TTL payload
pub fn decode_ttl(payload: &[u8]) -> Result<Duration> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| CacheError::Decode("ttl is not UTF-8".to_string()))?;
    parse_duration(text)
}

/// Parse a duration written as a sequence of `<number><unit>` pairs
///
/// Examples: `"9.998s"`, `"1m30s"`, `"250ms"`, `"1h2m3.5s"`, `"0"`.
/// Units: `h`, `m`, `s`, `ms`, `us`/`µs`/`μs`, `ns`.
pub fn parse_duration(text: &str) -> Result<Duration> {
    let invalid = || CacheError::Decode(format!("invalid duration: {:?}", text));

    let mut rest = text.strip_prefix('+').unwrap_or(text);
    if rest.starts_with('-') {
        return Err(CacheError::Decode(format!("negative duration: {:?}", text)));
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total_nanos: u128 = 0;
    while !rest.is_empty() {
        // integer part
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, after_int) = rest.split_at(int_len);

        // fractional part
        let (frac_digits, after_frac) = match after_int.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
                after_dot.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        // unit
        let unit_len = after_frac
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() || *c == '.')
            .map(|(i, _)| i)
            .unwrap_or(after_frac.len());
        let (unit, after_unit) = after_frac.split_at(unit_len);
        let unit_nanos: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            _ => return Err(invalid()),
        };

        let whole: u128 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| invalid())?
        };
        let mut nanos = whole.checked_mul(unit_nanos).ok_or_else(invalid)?;

        // Digits past 18 are below nanosecond resolution for every unit.
        let frac_digits = &frac_digits[..frac_digits.len().min(18)];
        if !frac_digits.is_empty() {
            let frac: u128 = frac_digits.parse().map_err(|_| invalid())?;
            let scale = 10u128.pow(frac_digits.len() as u32);
            nanos = nanos
                .checked_add(frac * unit_nanos / scale)
                .ok_or_else(invalid)?;
        }

        total_nanos = total_nanos.checked_add(nanos).ok_or_else(invalid)?;
        rest = after_unit;
    }

    let secs = u64::try_from(total_nanos / 1_000_000_000).map_err(|_| invalid())?;
    Ok(Duration::new(secs, (total_nanos % 1_000_000_000) as u32))
}
