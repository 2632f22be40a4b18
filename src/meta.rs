//! Meta-event sub-type classification, used only for diagnostics.
//!
//! The decoder cares about exactly two meta sub-types (`EndOfTrack`, `SetTempo`); every other
//! sub-type is recognized here purely so log messages can name what's being skipped instead of
//! printing a bare hex byte, mirroring `messages::MetaEvent` in this crate family's SMF
//! libraries.

use std::fmt;

pub const END_OF_TRACK: u8 = 0x2f;
pub const SET_TEMPO: u8 = 0x51;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum MetaType {
    SequenceNumber,
    Text,
    Copyright,
    TrackName,
    InstrumentName,
    Lyric,
    Marker,
    CuePoint,
    ProgramName,
    DeviceName,
    ChannelPrefix,
    MidiPort,
    EndOfTrack,
    SetTempo,
    SmpteOffset,
    TimeSignature,
    KeySignature,
    SequencerSpecific,
    Unknown(u8),
}
impl MetaType {
    pub fn from_sub_type(sub_type: u8) -> MetaType {
        match sub_type {
            0x00 => MetaType::SequenceNumber,
            0x01 => MetaType::Text,
            0x02 => MetaType::Copyright,
            0x03 => MetaType::TrackName,
            0x04 => MetaType::InstrumentName,
            0x05 => MetaType::Lyric,
            0x06 => MetaType::Marker,
            0x07 => MetaType::CuePoint,
            0x08 => MetaType::ProgramName,
            0x09 => MetaType::DeviceName,
            0x20 => MetaType::ChannelPrefix,
            0x21 => MetaType::MidiPort,
            END_OF_TRACK => MetaType::EndOfTrack,
            SET_TEMPO => MetaType::SetTempo,
            0x54 => MetaType::SmpteOffset,
            0x58 => MetaType::TimeSignature,
            0x59 => MetaType::KeySignature,
            0x7f => MetaType::SequencerSpecific,
            other => MetaType::Unknown(other),
        }
    }
}
impl fmt::Display for MetaType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            MetaType::SequenceNumber => "SequenceNumber".to_string(),
            MetaType::Text => "Text".to_string(),
            MetaType::Copyright => "Copyright".to_string(),
            MetaType::TrackName => "TrackName".to_string(),
            MetaType::InstrumentName => "InstrumentName".to_string(),
            MetaType::Lyric => "Lyric".to_string(),
            MetaType::Marker => "Marker".to_string(),
            MetaType::CuePoint => "CuePoint".to_string(),
            MetaType::ProgramName => "ProgramName".to_string(),
            MetaType::DeviceName => "DeviceName".to_string(),
            MetaType::ChannelPrefix => "ChannelPrefix".to_string(),
            MetaType::MidiPort => "MidiPort".to_string(),
            MetaType::EndOfTrack => "EndOfTrack".to_string(),
            MetaType::SetTempo => "SetTempo".to_string(),
            MetaType::SmpteOffset => "SmpteOffset".to_string(),
            MetaType::TimeSignature => "TimeSignature".to_string(),
            MetaType::KeySignature => "KeySignature".to_string(),
            MetaType::SequencerSpecific => "SequencerSpecific".to_string(),
            MetaType::Unknown(t) => format!("Unknown(0x{:02x})", t),
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_end_of_track_and_set_tempo() {
        assert_eq!(MetaType::from_sub_type(0x2f), MetaType::EndOfTrack);
        assert_eq!(MetaType::from_sub_type(0x51), MetaType::SetTempo);
    }

    #[test]
    fn unknown_sub_type_round_trips_its_byte() {
        match MetaType::from_sub_type(0x12) {
            MetaType::Unknown(b) => assert_eq!(b, 0x12),
            other => panic!("expected Unknown, got {:?}", other),
        }
    }
}
