//! # Notation Parser
//!
//! Translates kora tablature text into timed [`Event`]s.
//!
//! ## Line Format
//! ```text
//! <symbol> <target> [modifier]
//!
//! 1   4D          measure start: cursor reset to 0, quarter note
//! +   4G          quarter note at the cursor
//! =   2D          same tick/duration as the previous note (chord)
//! ♪   3G   x2     two eighth notes in a row
//! +   5G   P      quarter note, thumb instead of the default finger
//! +   S           quarter rest
//! +   TXT  Refrain
//! +   PAGE
//! ```
//!
//! ## Symbols
//! - `+` / `♪` / `🎶` / `♬` - quarter / eighth / triplet / sixteenth, advance the cursor
//! - `=` - synchronize with the previous note, cursor unchanged
//! - digits - measure marker; only `1` resets the cursor to 0, any number then acts as `+`
//! - anything else - line ignored
//!
//! ## Targets
//! - `TXT` - annotation carrying the rest of the line
//! - `PAGE` - page break (duration 0)
//! - `S` / `SILENCE` / `SEP` - rest, no event
//! - otherwise a string id such as `4G`
//!
//! The parser never fails. Lines it cannot read are dropped.
//!
//! ## Design
//! Parsing is a fold over the lines: [`step`] takes the [`ParserState`] and one
//! line and returns the next state plus the events that line produced. [`parse`]
//! threads a fresh state through every line and sorts the result by tick.

use crate::event::{Channel, Event, Finger, KoraString};
use crate::time::{NoteValue, Tick, TICKS_PER_QUARTER};

/// Cursor carried from one line to the next.
///
/// Tick arithmetic saturates at `Tick::MAX`; very long inputs pile up on the
/// last tick instead of wrapping back to the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserState {
    /// Default start of the next note.
    pub current_tick: Tick,
    /// `(tick, duration)` of the last note line, the anchor for `=`.
    pub last_event: Option<(Tick, Tick)>,
}

/// Resolved timing of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timing {
    start: Tick,
    duration: Tick,
}

enum Target<'a> {
    Text,
    PageBreak,
    Silence,
    Voice(&'a str),
}

fn classify_target(target: &str) -> Target<'_> {
    match target {
        "TXT" => Target::Text,
        "PAGE" => Target::PageBreak,
        "S" | "SILENCE" | "SEP" => Target::Silence,
        other => Target::Voice(other),
    }
}

/// Larger `xN` counts are treated as an unknown modifier.
const MAX_REPETITIONS: u32 = 256;

enum Modifier {
    Repeat(u32),
    Finger(Finger),
}

/// `xN` (any case) or a finger letter. Uppercased token expected.
fn parse_modifier(token: &str) -> Option<Modifier> {
    if let Some(count) = token.strip_prefix('X') {
        if !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit()) {
            return count
                .parse::<u32>()
                .ok()
                .filter(|&n| n <= MAX_REPETITIONS)
                .map(Modifier::Repeat);
        }
        return None;
    }
    Finger::from_token(token).map(Modifier::Finger)
}

/// Resolve the first column against the cursor.
///
/// Returns `None` when the line must be discarded without touching the state.
fn resolve_symbol(symbol: &str, state: &mut ParserState) -> Option<Timing> {
    if symbol == "=" {
        let (start, duration) = state.last_event?;
        return Some(Timing { start, duration });
    }

    if !symbol.is_empty() && symbol.bytes().all(|b| b.is_ascii_digit()) {
        let start = if symbol == "1" { 0 } else { state.current_tick };
        state.current_tick = start.saturating_add(TICKS_PER_QUARTER);
        return Some(Timing {
            start,
            duration: TICKS_PER_QUARTER,
        });
    }

    let value = NoteValue::from_symbol(symbol)?;
    let timing = Timing {
        start: state.current_tick,
        duration: value.ticks(),
    };
    state.current_tick = state.current_tick.saturating_add(timing.duration);
    Some(timing)
}

/// Interpret one line.
///
/// `line_index` is the 0-based line number, used to build event ids.
pub fn step(mut state: ParserState, line_index: usize, line: &str) -> (ParserState, Vec<Event>) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return (state, Vec::new());
    }

    let timing = match resolve_symbol(parts[0], &mut state) {
        Some(timing) => timing,
        None => {
            log::trace!(target: "parser", "line {}: skipped {:?}", line_index + 1, line.trim());
            return (state, Vec::new());
        }
    };

    let target = parts[1].to_uppercase();
    match classify_target(&target) {
        Target::Text => {
            state.last_event = None;
            let event = Event {
                id: format!("txt-{}", line_index),
                tick: timing.start,
                duration: timing.duration,
                channel: Channel::Text,
                finger: None,
                message: Some(parts[2..].join(" ")),
            };
            (state, vec![event])
        }
        Target::PageBreak => {
            state.last_event = None;
            let event = Event {
                id: format!("pg-{}", line_index),
                tick: timing.start,
                duration: 0,
                channel: Channel::PageBreak,
                finger: None,
                message: None,
            };
            (state, vec![event])
        }
        Target::Silence => {
            state.last_event = None;
            (state, Vec::new())
        }
        Target::Voice(id) => {
            let mut finger = KoraString::from_id(id).map(|s| s.default_finger());
            let mut repetitions = 1;
            match parts.get(2).and_then(|m| parse_modifier(&m.to_uppercase())) {
                Some(Modifier::Repeat(n)) => repetitions = n,
                Some(Modifier::Finger(f)) => finger = Some(f),
                None => {}
            }

            let events: Vec<Event> = (0..repetitions)
                .map(|copy| Event {
                    id: format!("note-{}-{}", line_index, copy),
                    tick: timing.start.saturating_add(copy.saturating_mul(timing.duration)),
                    duration: timing.duration,
                    channel: Channel::Voice(id.to_string()),
                    finger,
                    message: None,
                })
                .collect();

            if repetitions > 1 {
                state.current_tick = timing
                    .start
                    .saturating_add(repetitions.saturating_mul(timing.duration));
            }
            state.last_event = Some((timing.start, timing.duration));
            (state, events)
        }
    }
}

/// Parse tablature text into events sorted by tick.
///
/// Events sharing a tick keep their order of appearance.
///
/// # Example
/// ```
/// use koratab::parse;
///
/// let events = parse("1   1D\n+   1G");
/// assert_eq!(events.len(), 2);
/// assert_eq!(events[0].tick, 0);
/// assert_eq!(events[1].tick, 12);
/// ```
pub fn parse(text: &str) -> Vec<Event> {
    let (_, mut events) = text.trim().lines().enumerate().fold(
        (ParserState::default(), Vec::new()),
        |(state, mut events), (index, line)| {
            let (next, produced) = step(state, index, line);
            events.extend(produced);
            (next, events)
        },
    );
    events.sort_by_key(|e| e.tick);
    log::debug!(target: "parser", "parsed {} events", events.len());
    events
}
