//! The SMF header chunk, parsed exactly once per decode session.

use std::fmt;

/// SMF format field: how the declared tracks relate to one another.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Format {
    /// Single track.
    Single,
    /// Two or more tracks, played simultaneously (synchronous).
    MultiTrack,
    /// Two or more independent sequences (asynchronous). Decoded like `MultiTrack`: this
    /// decoder applies the tempo map sequentially and does not give format 2 any special
    /// timing treatment (see spec.md Non-goals).
    MultiSequence,
    Unknown(u16),
}
impl Format {
    pub fn new(format: u16) -> Format {
        match format {
            0 => Format::Single,
            1 => Format::MultiTrack,
            2 => Format::MultiSequence,
            other => Format::Unknown(other),
        }
    }
}
impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Format::Single => write!(f, "single track"),
            Format::MultiTrack => write!(f, "multi-track synchronous"),
            Format::MultiSequence => write!(f, "multi-sequence asynchronous"),
            Format::Unknown(v) => write!(f, "unknown format {}", v),
        }
    }
}

/// The parsed `MThd` chunk. `len` is retained for diagnostics only (see spec.md §4.2: the
/// decoder relies on `END_OF_TRACK`, not any declared length, to know when a track ends).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Header {
    pub len: u32,
    pub format: Format,
    pub num_tracks: u16,
    pub ticks_per_quarter: u16,
}
