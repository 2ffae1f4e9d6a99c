//! Protocol Module
//!
//! Defines the wire protocol spoken to the cache server.
//!
//! ## Request Format
//! One JSON envelope per command:
//! ```text
//! {"op": <code>, "key": "<key>", "val": "<value>", "exp": "<millis>"}
//! ```
//! `val` and `exp` are omitted when empty.
//!
//! ### Operation Codes
//! - 0: SETEX   1: SETNX   2: SET     3: GET
//! - 4: DEL     5: UNLINK  6: INCR    7: INCRBY
//! - 8: TTL     9: KEYS    10: CNT    11: SAVE
//! - 12: LOAD   13: CLS    14: EXIT   15: QUIT
//!
//! ## Reply Format
//! Unframed. A status segment (one byte, or free text), then for
//! GET/TTL/KEYS/CNT a payload segment. SAVE replies with two status segments.
//!
//! ### Status Codes
//! - 0: OK
//! - 1: SYNTAX
//! - 2: NOT_FOUND
//! - 3: ALREADY_EXISTS
//! - 4: NON_EXPIRING_SAVE_FAILED
//! - 5: EXPIRING_SAVE_FAILED
//! - 6: RESTORE_FAILED

mod command;
mod response;
mod status;
mod codec;

pub use command::{Command, OpCode, ReplyShape};
pub use response::StatusSegment;
pub use status::{StatusCode, STATUS_TABLE};
pub use codec::{
    encode_command, decode_command, write_command,
    read_segment, read_status,
    decode_value, decode_count, decode_keys, decode_ttl, parse_duration,
    STATUS_BUFFER_SIZE, COUNT_BUFFER_SIZE, TTL_BUFFER_SIZE,
};
