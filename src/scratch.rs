//! The per-phase scratch area that lets a handler suspend mid-field and resume on the next
//! fragment.
//!
//! spec.md models this as a tagged union of three overlapping shapes (a fixed byte buffer, a
//! VLQ accumulator, or a pair of drop counters) reusing one block of memory. The Rust rendition
//! makes the tag explicit as an `enum` instead of an unchecked union, so only the variant the
//! active phase actually wrote can ever be read back.

use crate::formats::VlqBuilder;

/// Large enough for the SMF header (14 bytes), the largest fixed-width field any phase
/// accumulates. Reused for the track header (8 bytes) and the tempo field (3 bytes) too.
pub const FIXED_BUF_CAP: usize = 14;

pub const TRACK_HEADER_LEN: usize = 8;
pub const SET_TEMPO_LEN: usize = 3;

#[derive(Debug)]
pub enum Scratch {
    Empty,
    /// Accumulates a fixed-width field across fragment boundaries.
    FixedBuf {
        buf: [u8; FIXED_BUF_CAP],
        filled: usize,
    },
    /// Accumulates a VLQ (event delta, or a meta/sysex/escape payload length).
    Vlq(VlqBuilder),
    /// Tracks progress dropping an unrecognized meta/sysex/escape payload.
    Drop { total_len: u32, drop_len: u32 },
}

impl Default for Scratch {
    fn default() -> Scratch {
        Scratch::Empty
    }
}

impl Scratch {
    pub fn new_fixed_buf() -> Scratch {
        Scratch::FixedBuf {
            buf: [0u8; FIXED_BUF_CAP],
            filled: 0,
        }
    }

    pub fn new_vlq() -> Scratch {
        Scratch::Vlq(VlqBuilder::new())
    }

    pub fn new_drop(total_len: u32) -> Scratch {
        Scratch::Drop {
            total_len,
            drop_len: 0,
        }
    }

    /// Feeds as much of `buf` as needed (and available) into a `FixedBuf` scratch to reach
    /// `target_len`. Returns `(consumed, Some(filled_slice))` once `target_len` bytes have
    /// accumulated, or `(consumed, None)` if more input is still needed.
    ///
    /// Panics if called on a non-`FixedBuf` variant or if `self` wasn't freshly constructed via
    /// `new_fixed_buf` for this accumulation — a decoder-internal invariant, never caller-facing.
    pub fn accumulate_fixed<'a>(
        &'a mut self,
        input: &[u8],
        target_len: usize,
    ) -> (usize, Option<&'a [u8]>) {
        match self {
            Scratch::FixedBuf { buf, filled } => {
                let remaining = target_len - *filled;
                let take = remaining.min(input.len());
                buf[*filled..*filled + take].copy_from_slice(&input[..take]);
                *filled += take;
                if *filled >= target_len {
                    (take, Some(&buf[..target_len]))
                } else {
                    (take, None)
                }
            }
            other => panic!("accumulate_fixed called on non-FixedBuf scratch: {:?}", other),
        }
    }
}
