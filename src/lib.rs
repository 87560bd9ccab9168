pub mod config;
pub mod error;
pub mod event;
pub mod parser;
pub mod playback;
pub mod songs;
pub mod time;
pub mod tuning;

pub use config::{PlayerConfig, SchedulerConfig, TuningSetting};
pub use error::*;
pub use event::{Channel, Event, Finger, Hand, KoraString, Tablature};
pub use parser::parse;
pub use playback::{AudioBackend, ConsoleBackend, Scheduler, Transport};
pub use songs::{song, songs, SongPreset};
pub use time::{NoteValue, Tick, TICKS_PER_QUARTER};
pub use tuning::{preset, presets, ScalePreset, Tuning};

/// Parse tablature and build a scheduler ready to play it.
///
/// This is the main entry point for playback.
pub fn schedule(source: &str, bpm: f64, config: SchedulerConfig) -> Result<Scheduler, TabError> {
    let mut scheduler = Scheduler::new(bpm, config)?;
    scheduler.set_events(&parse(source));
    Ok(scheduler)
}
