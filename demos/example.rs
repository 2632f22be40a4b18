//! Feeds an SMF file into `Decoder` in small chunks, printing every channel event and the
//! header once it's known. Run with `cargo run --example example -- path/to/file.mid`.

use std::env;
use std::fs;
use std::process;

use midi_stream_decoder::{ChannelEvent, Decoder, EventSink};

const CHUNK_SIZE: usize = 64;

struct PrintingSink {
    event_count: u32,
}
impl EventSink for PrintingSink {
    fn on_event(&mut self, event: &ChannelEvent) {
        self.event_count += 1;
        println!("{}", event);
    }
    fn on_complete(&mut self) {
        println!("decode complete, {} channel event(s) seen", self.event_count);
    }
}

fn main() {
    env_logger::init();

    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: example <path/to/file.mid>");
            process::exit(1);
        }
    };
    let bytes = fs::read(&path).unwrap_or_else(|e| {
        eprintln!("failed to read {}: {}", path, e);
        process::exit(1);
    });

    let mut decoder = Decoder::new(PrintingSink { event_count: 0 });
    for chunk in bytes.chunks(CHUNK_SIZE) {
        if let Err(err) = decoder.feed(chunk) {
            eprintln!("decode failed: {}", err);
            process::exit(1);
        }
    }

    if let Some(header) = decoder.header() {
        println!(
            "{} SMF, {} track(s), {} ticks/quarter",
            header.format, header.num_tracks, header.ticks_per_quarter
        );
    }
    if !decoder.is_complete() {
        eprintln!("warning: input ended before every declared track reached END_OF_TRACK");
    }
}
