//! The streaming SMF decoder: phase dispatch, the ten phase handlers, and the event normalizer.
//!
//! This is the core described by spec.md §4. `Decoder::feed` is the only entry point a caller
//! needs; everything else in this module is the state machine behind it.

use byteorder::{BigEndian, ByteOrder};
use log::{debug, error, trace};

use crate::error::Aborted;
use crate::event::{ChannelEvent, ChannelEventKind};
use crate::formats::Tag;
use crate::header::{Format, Header};
use crate::meta::{MetaType, END_OF_TRACK, SET_TEMPO};
use crate::phase::{Phase, StepOutcome};
use crate::scratch::{Scratch, SET_TEMPO_LEN, TRACK_HEADER_LEN};
use crate::sink::EventSink;
use crate::track::TrackState;

const HEADER_LEN: usize = 14;
const DEFAULT_TEMPO_USEC_PER_QUARTER: u32 = 500_000;

const FIRST_CHANNEL_EVENT: u8 = 0x80;
const LAST_CHANNEL_EVENT: u8 = 0xef;
const META_PREFIX: u8 = 0xff;
const SYSEX: u8 = 0xf0;
const ESCAPE: u8 = 0xf7;

/// A push-driven, resumable SMF decoder. Feed it bytes in arbitrarily small fragments; it
/// delivers channel events and a completion signal through the `EventSink` it was built with.
///
/// No dynamic allocation happens inside the decode loop: `Decoder` is a fixed-size record, and
/// the only heap use this crate introduces is whatever the caller's own `S` does.
pub struct Decoder<S: EventSink> {
    header: Option<Header>,
    track: TrackState,
    tempo: u32,
    tracks_done: u16,
    phase: Phase,
    scratch: Scratch,
    sink: S,
}

impl<S: EventSink> Decoder<S> {
    /// Builds a fresh decoder awaiting the SMF header.
    pub fn new(sink: S) -> Decoder<S> {
        Decoder {
            header: None,
            track: TrackState::default(),
            tempo: 0,
            tracks_done: 0,
            phase: Phase::Header,
            scratch: Scratch::Empty,
            sink,
        }
    }

    /// True once every declared track has ended and `on_complete` has fired (or is about to,
    /// within the `feed` call that reaches it).
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// The parsed SMF header, once available (after the first 14 header bytes are fed).
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// The tempo that will be used to normalize the *next* event's delta, in microseconds per
    /// quarter note. Reflects the SMF default (500000) until a `SET_TEMPO` meta event or the
    /// first channel event has been processed.
    pub fn tempo_usec_per_quarter(&self) -> u32 {
        if self.tempo == 0 {
            DEFAULT_TEMPO_USEC_PER_QUARTER
        } else {
            self.tempo
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Unwraps the decoder, returning ownership of its sink back to the caller.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Consumes a contiguous byte fragment. See spec.md §4.1 for the full contract: this either
    /// returns `Ok(())` (including the case where the decoder is mid-field and awaiting more
    /// bytes) or `Err(Aborted)`, after which the decoder must not be fed further.
    pub fn feed(&mut self, mut buf: &[u8]) -> Result<(), Aborted> {
        while !buf.is_empty() {
            let (outcome, consumed) = self.step(buf);
            debug_assert!(consumed <= buf.len());
            match outcome {
                StepOutcome::Abort => return Err(Aborted),
                StepOutcome::Ok => self.scratch = Scratch::Empty,
                StepOutcome::Again => {}
            }
            buf = &buf[consumed..];
        }
        if self.phase == Phase::Complete {
            trace!("MIDI stream decode complete");
            self.sink.on_complete();
        }
        Ok(())
    }

    fn step(&mut self, buf: &[u8]) -> (StepOutcome, usize) {
        match self.phase {
            Phase::Header => self.step_header(buf),
            Phase::TrackHeader => self.step_track_header(buf),
            Phase::EventDelta => self.step_event_delta(buf),
            Phase::EventStatus => self.step_event_status(buf),
            Phase::EventParam1 => self.step_event_param1(buf),
            Phase::EventParam2 => self.step_event_param2(buf),
            Phase::EventNonChannel => self.step_event_non_channel(buf),
            Phase::EventDrop => self.step_event_drop(buf),
            Phase::EventSetTempo => self.step_event_set_tempo(buf),
            Phase::Complete => (StepOutcome::Ok, 0),
        }
    }

    fn step_header(&mut self, buf: &[u8]) -> (StepOutcome, usize) {
        if matches!(self.scratch, Scratch::Empty) {
            self.scratch = Scratch::new_fixed_buf();
        }
        let (consumed, done) = self.scratch.accumulate_fixed(buf, HEADER_LEN);
        let fields = match done {
            None => return (StepOutcome::Again, consumed),
            Some(fields) => fields,
        };

        if !Tag::Header.matches(&[fields[0], fields[1], fields[2], fields[3]]) {
            error!("invalid SMF header magic: {:02x?}", &fields[0..4]);
            return (StepOutcome::Abort, consumed);
        }
        let len = BigEndian::read_u32(&fields[4..8]);
        let format = Format::new(BigEndian::read_u16(&fields[8..10]));
        let num_tracks = BigEndian::read_u16(&fields[10..12]);
        let ticks_per_quarter = BigEndian::read_u16(&fields[12..14]);

        debug!(
            "SMF header: {}, {} track(s), {} ticks/quarter",
            format, num_tracks, ticks_per_quarter
        );
        self.header = Some(Header {
            len,
            format,
            num_tracks,
            ticks_per_quarter,
        });
        self.phase = Phase::TrackHeader;
        (StepOutcome::Ok, consumed)
    }

    fn step_track_header(&mut self, buf: &[u8]) -> (StepOutcome, usize) {
        if matches!(self.scratch, Scratch::Empty) {
            self.scratch = Scratch::new_fixed_buf();
        }
        let (consumed, done) = self.scratch.accumulate_fixed(buf, TRACK_HEADER_LEN);
        let fields = match done {
            None => return (StepOutcome::Again, consumed),
            Some(fields) => fields,
        };

        if !Tag::Track.matches(&[fields[0], fields[1], fields[2], fields[3]]) {
            error!("invalid MTrk magic: {:02x?}", &fields[0..4]);
            return (StepOutcome::Abort, consumed);
        }
        self.track.len = BigEndian::read_u32(&fields[4..8]);
        self.track.reset_running_status();
        self.phase = Phase::EventDelta;
        (StepOutcome::Ok, consumed)
    }

    fn step_event_delta(&mut self, buf: &[u8]) -> (StepOutcome, usize) {
        if matches!(self.scratch, Scratch::Empty) {
            self.scratch = Scratch::new_vlq();
        }
        let builder = match &mut self.scratch {
            Scratch::Vlq(b) => b,
            other => unreachable!("EventDelta scratch must be Vlq, got {:?}", other),
        };

        let mut consumed = 0;
        for &byte in buf {
            builder.push(byte);
            consumed += 1;
            if builder.closed() {
                break;
            }
        }
        if !builder.closed() {
            return (StepOutcome::Again, consumed);
        }

        self.track.event.delta = builder.build().val();
        self.track.event.is_meta = false;
        self.phase = Phase::EventStatus;
        (StepOutcome::Ok, consumed)
    }

    fn step_event_status(&mut self, buf: &[u8]) -> (StepOutcome, usize) {
        let byte = buf[0];
        let (status, consumed) = if byte & 0x80 == 0 {
            if !self.track.last_event_status_avail() {
                error!("running status byte 0x{:02x} but no prior status on this track", byte);
                return (StepOutcome::Abort, 0);
            }
            (self.track.last_event_status(), 0)
        } else {
            (byte, 1)
        };

        self.track.event.status = status;
        self.track.record_status(status);

        if status >= FIRST_CHANNEL_EVENT && status <= LAST_CHANNEL_EVENT {
            self.phase = Phase::EventParam1;
        } else if status == META_PREFIX || status == SYSEX || status == ESCAPE {
            self.phase = Phase::EventNonChannel;
        } else {
            error!("unrecognized event status: 0x{:02x}", status);
            return (StepOutcome::Abort, consumed);
        }
        (StepOutcome::Ok, consumed)
    }

    fn step_event_param1(&mut self, buf: &[u8]) -> (StepOutcome, usize) {
        self.track.event.param1 = buf[0];
        let status = self.track.event.status;
        if ChannelEventKind::from_status(status).is_one_byte() {
            self.track.event.param2 = 0;
            self.phase = Phase::EventDelta;
            self.fire_event();
        } else {
            self.phase = Phase::EventParam2;
        }
        (StepOutcome::Ok, 1)
    }

    fn step_event_param2(&mut self, buf: &[u8]) -> (StepOutcome, usize) {
        self.track.event.param2 = buf[0];
        self.phase = Phase::EventDelta;
        self.fire_event();
        (StepOutcome::Ok, 1)
    }

    fn step_event_non_channel(&mut self, buf: &[u8]) -> (StepOutcome, usize) {
        let mut offset = 0;
        if self.track.event.status == META_PREFIX && !self.track.event.is_meta {
            let sub_type = buf[0];
            if sub_type > 0x7f {
                error!("invalid meta sub-type: 0x{:02x}, not in 0x00-0x7f", sub_type);
                return (StepOutcome::Abort, 1);
            }
            self.track.event.is_meta = true;
            self.track.event.status = sub_type;
            offset = 1;
            if buf.len() == 1 {
                // Next fragment continues the VLQ length; this phase isn't done yet.
                return (StepOutcome::Ok, offset);
            }
        }

        if matches!(self.scratch, Scratch::Empty) {
            self.scratch = Scratch::new_vlq();
        }
        let builder = match &mut self.scratch {
            Scratch::Vlq(b) => b,
            other => unreachable!("EventNonChannel scratch must be Vlq here, got {:?}", other),
        };
        let mut consumed_here = 0;
        for &byte in &buf[offset..] {
            builder.push(byte);
            consumed_here += 1;
            if builder.closed() {
                break;
            }
        }
        let total_consumed = offset + consumed_here;
        if !builder.closed() {
            return (StepOutcome::Again, total_consumed);
        }
        let total_len = builder.build().val();

        let is_meta = self.track.event.is_meta;
        let status = self.track.event.status;

        if is_meta && status == END_OF_TRACK {
            if total_len != 0 {
                error!("END_OF_TRACK with non-zero length {}", total_len);
                return (StepOutcome::Abort, total_consumed);
            }
            self.tracks_done += 1;
            let num_tracks = self.header.as_ref().map_or(0, |h| h.num_tracks);
            debug!("track {} of {} ended", self.tracks_done, num_tracks);
            self.phase = if self.tracks_done == num_tracks {
                Phase::Complete
            } else {
                Phase::TrackHeader
            };
            return (StepOutcome::Ok, total_consumed);
        }

        if is_meta && status == SET_TEMPO {
            if total_len != SET_TEMPO_LEN as u32 {
                error!("SET_TEMPO with length {} (expected 3)", total_len);
                return (StepOutcome::Abort, total_consumed);
            }
            self.phase = Phase::EventSetTempo;
            return (StepOutcome::Ok, total_consumed);
        }

        if is_meta {
            debug!("skipping meta event {} ({} bytes)", MetaType::from_sub_type(status), total_len);
        } else {
            debug!("skipping {} event ({} bytes)", if status == SYSEX { "sysex" } else { "escape" }, total_len);
        }
        self.scratch = Scratch::new_drop(total_len);
        self.phase = Phase::EventDrop;
        (StepOutcome::Again, total_consumed)
    }

    fn step_event_drop(&mut self, buf: &[u8]) -> (StepOutcome, usize) {
        let (total_len, drop_len) = match &self.scratch {
            Scratch::Drop { total_len, drop_len } => (*total_len, *drop_len),
            other => unreachable!("EventDrop scratch must be Drop, got {:?}", other),
        };
        let remaining = (total_len - drop_len) as usize;
        let take = remaining.min(buf.len());
        let new_drop_len = drop_len + take as u32;

        if new_drop_len < total_len {
            self.scratch = Scratch::Drop {
                total_len,
                drop_len: new_drop_len,
            };
            return (StepOutcome::Again, take);
        }
        self.phase = Phase::EventDelta;
        (StepOutcome::Ok, take)
    }

    fn step_event_set_tempo(&mut self, buf: &[u8]) -> (StepOutcome, usize) {
        if matches!(self.scratch, Scratch::Empty) {
            self.scratch = Scratch::new_fixed_buf();
        }
        let (consumed, done) = self.scratch.accumulate_fixed(buf, SET_TEMPO_LEN);
        let bytes = match done {
            None => return (StepOutcome::Again, consumed),
            Some(bytes) => bytes,
        };
        self.tempo = (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2]);
        debug!("tempo changed to {} usec/quarter", self.tempo);
        self.phase = Phase::EventDelta;
        (StepOutcome::Ok, consumed)
    }

    /// Normalizes the in-progress event's delta from ticks to microseconds and hands it to the
    /// sink. Integer-only, widened to 64 bits for the multiply so a pathological delta/tempo
    /// pair can't overflow before the divide; the truncation back to `u32` silently wraps for
    /// absurd inputs rather than aborting (spec.md §4.3).
    fn fire_event(&mut self) {
        if self.tempo == 0 {
            self.tempo = DEFAULT_TEMPO_USEC_PER_QUARTER;
        }
        let header = self
            .header
            .as_ref()
            .expect("header phase always completes before any event phase");
        // ticks_per_quarter is assumed positive (spec.md §3); guard only against the division
        // panic a zero divisor would otherwise cause on malformed input.
        let divisor = u64::from(header.ticks_per_quarter.max(1));
        let delta_ticks = u64::from(self.track.event.delta);
        let tempo = u64::from(self.tempo);
        let delta_us = (delta_ticks * tempo + divisor / 2) / divisor;

        let event = ChannelEvent {
            delta_us: delta_us as u32,
            status: self.track.event.status,
            param1: self.track.event.param1,
            param2: self.track.event.param2,
        };
        trace!("{}", event);
        self.sink.on_event(&event);
    }
}
