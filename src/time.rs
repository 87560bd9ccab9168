//! # Tick/Time Model
//!
//! Logical time is counted in ticks. A quarter note is always 12 ticks, which
//! divides evenly into eighths (6), triplet eighths (4) and sixteenths (3).
//!
//! Converting ticks to seconds needs a tempo:
//! ```text
//! seconds_per_tick = (60 / bpm) / 12
//! ```
//! At 120 BPM one tick lasts 1/24 s, so tick 24 (two quarters) is 1.0 s.

/// A position or length in logical time.
pub type Tick = u32;

pub const TICKS_PER_QUARTER: Tick = 12;
pub const TICKS_EIGHTH: Tick = 6;
pub const TICKS_TRIPLET: Tick = 4;
pub const TICKS_SIXTEENTH: Tick = 3;

/// Named duration classes of the notation's first column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValue {
    Quarter,
    Eighth,
    Triplet,
    Sixteenth,
}

impl NoteValue {
    /// Look up a duration symbol (`+`, `♪`, `🎶`, `♬`).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(NoteValue::Quarter),
            "♪" => Some(NoteValue::Eighth),
            "🎶" => Some(NoteValue::Triplet),
            "♬" => Some(NoteValue::Sixteenth),
            _ => None,
        }
    }

    pub fn ticks(self) -> Tick {
        match self {
            NoteValue::Quarter => TICKS_PER_QUARTER,
            NoteValue::Eighth => TICKS_EIGHTH,
            NoteValue::Triplet => TICKS_TRIPLET,
            NoteValue::Sixteenth => TICKS_SIXTEENTH,
        }
    }
}

/// Length of one tick in seconds at the given quarter-note tempo.
pub fn seconds_per_tick(bpm: f64) -> f64 {
    (60.0 / bpm) / TICKS_PER_QUARTER as f64
}

pub fn ticks_to_seconds(ticks: f64, bpm: f64) -> f64 {
    ticks * seconds_per_tick(bpm)
}

pub fn seconds_to_ticks(seconds: f64, bpm: f64) -> f64 {
    seconds / seconds_per_tick(bpm)
}
