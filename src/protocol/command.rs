//! Command definitions
//!
//! The operation-code catalog and the typed commands a session sends.

use std::borrow::Cow;
use std::time::Duration;

/// Operation codes. Discriminants are wire values; order must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    SetEx = 0,
    SetNx = 1,
    Set = 2,
    Get = 3,
    Del = 4,
    Unlink = 5,
    Incr = 6,
    IncrBy = 7,
    Ttl = 8,
    Keys = 9,
    Cnt = 10,
    Save = 11,
    Load = 12,
    Cls = 13,
    Exit = 14,
    Quit = 15,
}

impl OpCode {
    const ALL: [OpCode; 16] = [
        OpCode::SetEx,
        OpCode::SetNx,
        OpCode::Set,
        OpCode::Get,
        OpCode::Del,
        OpCode::Unlink,
        OpCode::Incr,
        OpCode::IncrBy,
        OpCode::Ttl,
        OpCode::Keys,
        OpCode::Cnt,
        OpCode::Save,
        OpCode::Load,
        OpCode::Cls,
        OpCode::Exit,
        OpCode::Quit,
    ];

    /// Look up an op code by its wire value
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Shape of the reply the server sends for this operation
    pub fn reply_shape(self) -> ReplyShape {
        match self {
            OpCode::Get | OpCode::Ttl | OpCode::Keys | OpCode::Cnt => ReplyShape::StatusThenPayload,
            OpCode::Save => ReplyShape::TwoStatus,
            OpCode::Exit | OpCode::Quit => ReplyShape::None,
            _ => ReplyShape::Status,
        }
    }
}

/// What the client reads after writing a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// One status segment
    Status,
    /// One status segment, then a payload read only on success
    StatusThenPayload,
    /// Two independent status segments (save)
    TwoStatus,
    /// Nothing; the connection is closed afterwards
    None,
}

/// A request to the cache server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store a value that expires after `expiry`
    SetEx { key: String, value: String, expiry: Duration },

    /// Store a value only if the key is absent
    SetNx { key: String, value: String },

    /// Store a value unconditionally
    Set { key: String, value: String },

    /// Fetch a value
    Get { key: String },

    /// Remove a key
    Del { key: String },

    /// Remove a key, reclaiming it in the background on the server
    Unlink { key: String },

    /// Add one to a numeric value
    Incr { key: String },

    /// Add `delta` to a numeric value
    IncrBy { key: String, delta: i64 },

    /// Remaining time-to-live of a key
    Ttl { key: String },

    /// List keys matching a pattern
    Keys { pattern: String },

    /// Number of stored items
    Cnt,

    /// Persist the store to a server-side file
    Save { filename: String },

    /// Restore the store from a server-side file
    Load { filename: String },

    /// Remove every entry
    Cls,

    /// Ask the server to end the session and exit
    Exit,

    /// Ask the server to end the session
    Quit,
}

impl Command {
    /// Get the operation code
    pub fn op_code(&self) -> OpCode {
        match self {
            Command::SetEx { .. } => OpCode::SetEx,
            Command::SetNx { .. } => OpCode::SetNx,
            Command::Set { .. } => OpCode::Set,
            Command::Get { .. } => OpCode::Get,
            Command::Del { .. } => OpCode::Del,
            Command::Unlink { .. } => OpCode::Unlink,
            Command::Incr { .. } => OpCode::Incr,
            Command::IncrBy { .. } => OpCode::IncrBy,
            Command::Ttl { .. } => OpCode::Ttl,
            Command::Keys { .. } => OpCode::Keys,
            Command::Cnt => OpCode::Cnt,
            Command::Save { .. } => OpCode::Save,
            Command::Load { .. } => OpCode::Load,
            Command::Cls => OpCode::Cls,
            Command::Exit => OpCode::Exit,
            Command::Quit => OpCode::Quit,
        }
    }

    /// The `key` field: the key, pattern or filename; empty for global commands
    pub fn key(&self) -> &str {
        match self {
            Command::SetEx { key, .. }
            | Command::SetNx { key, .. }
            | Command::Set { key, .. }
            | Command::Get { key }
            | Command::Del { key }
            | Command::Unlink { key }
            | Command::Incr { key }
            | Command::IncrBy { key, .. }
            | Command::Ttl { key } => key,
            Command::Keys { pattern } => pattern,
            Command::Save { filename } | Command::Load { filename } => filename,
            Command::Cnt | Command::Cls | Command::Exit | Command::Quit => "",
        }
    }

    /// The `val` field: the value for writes, the delta for `IncrBy`
    pub fn value(&self) -> Cow<'_, str> {
        match self {
            Command::SetEx { value, .. } | Command::SetNx { value, .. } | Command::Set { value, .. } => {
                Cow::Borrowed(value)
            }
            Command::IncrBy { delta, .. } => Cow::Owned(delta.to_string()),
            _ => Cow::Borrowed(""),
        }
    }

    /// The `exp` field: expiry truncated to whole milliseconds
    pub fn expiry_millis(&self) -> Option<u128> {
        match self {
            Command::SetEx { expiry, .. } => Some(expiry.as_millis()),
            _ => None,
        }
    }
}
