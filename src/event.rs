//! # Events and the Event Store
//!
//! ## Type Hierarchy
//! ```text
//! Tablature
//!   └── Vec<Event> (sorted by tick, stable)
//!         ├── id: String ("note-3-0", "txt-7", "pg-12")
//!         ├── tick / duration: Tick
//!         ├── channel: Channel
//!         │     ├── Voice(String)  playable string, e.g. "4G"
//!         │     ├── Text           annotation, carries `message`
//!         │     └── PageBreak      layout marker
//!         ├── finger: Option<Finger> (P = thumb, I = index)
//!         └── message: Option<String>
//! ```
//!
//! Text and page-break events are only for the renderer; `Tablature::audible`
//! is what the playback scheduler consumes.

use serde::Serialize;

use crate::parser::parse;
use crate::time::Tick;

/// Which hand plucks a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

/// Finger annotation attached to a played note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Finger {
    /// `P` (pouce)
    #[serde(rename = "P")]
    Thumb,
    /// `I`
    #[serde(rename = "I")]
    Index,
}

impl Finger {
    /// Parse an already-uppercased modifier token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "P" => Some(Finger::Thumb),
            "I" => Some(Finger::Index),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Finger::Thumb => "P",
            Finger::Index => "I",
        }
    }
}

/// The twelve strings of the kora, six per hand, numbered from the bass up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KoraString {
    pub hand: Hand,
    pub index: u8,
}

impl KoraString {
    /// All strings in ascending scale order: 1D 1G 2D 2G ... 6D 6G.
    pub fn scale_order() -> impl Iterator<Item = KoraString> {
        (1..=6u8).flat_map(|index| {
            [Hand::Right, Hand::Left]
                .into_iter()
                .map(move |hand| KoraString { hand, index })
        })
    }

    /// Parse an id such as `"3G"` or `"6D"` (uppercase).
    pub fn from_id(id: &str) -> Option<Self> {
        let mut chars = id.chars();
        let index = chars.next()?.to_digit(10)? as u8;
        let hand = match chars.next()? {
            'G' => Hand::Left,
            'D' => Hand::Right,
            _ => return None,
        };
        if chars.next().is_some() || !(1..=6).contains(&index) {
            return None;
        }
        Some(KoraString { hand, index })
    }

    pub fn id(&self) -> String {
        let hand = match self.hand {
            Hand::Left => 'G',
            Hand::Right => 'D',
        };
        format!("{}{}", self.index, hand)
    }

    /// Bass strings (1-3) are played with the thumb, the upper ones with the index.
    pub fn default_finger(&self) -> Finger {
        if self.index <= 3 {
            Finger::Thumb
        } else {
            Finger::Index
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    Voice(String),
    Text,
    PageBreak,
}

impl Channel {
    pub fn is_audible(&self) -> bool {
        matches!(self, Channel::Voice(_))
    }

    pub fn voice(&self) -> Option<&str> {
        match self {
            Channel::Voice(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

/// A single timed item of a parsed tablature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub tick: Tick,
    pub duration: Tick,
    pub channel: Channel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finger: Option<Finger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Event {
    pub fn is_audible(&self) -> bool {
        self.channel.is_audible()
    }
}

/// The ordered events of one parse.
///
/// Immutable once built; re-parse when the text changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tablature {
    events: Vec<Event>,
}

impl Tablature {
    pub fn parse(text: &str) -> Self {
        Self { events: parse(text) }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events that produce sound, in playback order.
    pub fn audible(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_audible())
    }

    /// Text annotations as `(tick, message)`.
    pub fn texts(&self) -> impl Iterator<Item = (Tick, &str)> {
        self.events.iter().filter_map(|e| match (&e.channel, &e.message) {
            (Channel::Text, Some(message)) => Some((e.tick, message.as_str())),
            _ => None,
        })
    }

    pub fn page_break_ticks(&self) -> Vec<Tick> {
        self.events
            .iter()
            .filter(|e| e.channel == Channel::PageBreak)
            .map(|e| e.tick)
            .collect()
    }

    /// First tick after every event has finished.
    pub fn end_tick(&self) -> Tick {
        self.events
            .iter()
            .map(|e| e.tick.saturating_add(e.duration))
            .max()
            .unwrap_or(0)
    }
}
