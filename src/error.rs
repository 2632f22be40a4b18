//! The public error surface of `feed`.
//!
//! Per spec.md §7, the decode failure taxonomy (bad magic, protocol violations, meta length
//! mismatches) is deliberately *not* part of the public contract — the caller only ever learns
//! that the stream could not be decoded further. Reasons are still logged through the `log`
//! crate at the point of failure, which is this crate's side channel for diagnostics, matching
//! the `LOG_ERROR` call sites in the original.

use std::error;
use std::fmt;

/// The stream could not be decoded past the current byte. The `Decoder` must not be fed
/// further; construct a new one to decode a new stream.
#[derive(Clone, Copy, Debug)]
pub struct Aborted;

impl fmt::Display for Aborted {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MIDI stream decode aborted: malformed or unsupported input")
    }
}

impl error::Error for Aborted {}
