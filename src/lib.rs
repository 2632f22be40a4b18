//! An incremental, resumable decoder for Standard MIDI File (SMF) byte streams.
//!
//! # Examples
//!
//! The decoder is push-driven: feed it bytes as they arrive, in whatever fragmentation your
//! transport gives you — a single byte at a time works just as well as the whole file at once.
//! Implement `EventSink` to receive decoded channel events and a completion signal.
//!
//! ```
//! use midi_stream_decoder::{ChannelEvent, Decoder, EventSink};
//!
//! struct NoteCounter {
//!     notes_on: u32,
//! }
//! impl EventSink for NoteCounter {
//!     fn on_event(&mut self, event: &ChannelEvent) {
//!         if event.kind() == midi_stream_decoder::ChannelEventKind::NoteOn {
//!             self.notes_on += 1;
//!         }
//!     }
//!     fn on_complete(&mut self) {}
//! }
//!
//! # const SMF_BYTES: &[u8] = &[
//! #     0x4d, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x01, 0x00, 0x60,
//! #     0x4d, 0x54, 0x72, 0x6b, 0x00, 0x00, 0x00, 0x0b,
//! #     0x00, 0x90, 0x3c, 0x40, 0x60, 0x80, 0x3c, 0x40, 0x00, 0xff, 0x2f, 0x00,
//! # ];
//! let mut decoder = Decoder::new(NoteCounter { notes_on: 0 });
//! for byte in SMF_BYTES {
//!     decoder.feed(&[*byte]).unwrap();
//! }
//! assert!(decoder.is_complete());
//! assert_eq!(decoder.into_sink().notes_on, 1);
//! ```

mod decoder;
mod error;
mod event;
mod formats;
mod header;
mod meta;
mod phase;
mod scratch;
mod sink;
mod track;
mod util;

pub use crate::decoder::Decoder;
pub use crate::error::Aborted;
pub use crate::event::{ChannelEvent, ChannelEventKind};
pub use crate::formats::{Tag, Vlq, VlqBuilder};
pub use crate::header::{Format, Header};
pub use crate::meta::MetaType;
pub use crate::sink::{EventSink, NullSink};
pub use crate::util::note_to_freq;
