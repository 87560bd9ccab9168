//! # Tunings
//!
//! A tuning maps each string id (`1D`, `4G`, ...) to a pitch name (`E3`, `A4`, ...).
//! The audio backend resolves every dispatched note through the active tuning;
//! a string with no pitch is silent.
//!
//! Scale presets are written as a run of pitches in scale order
//! (`1D 1G 2D 2G ... 6D 6G`), e.g. `"E3G3A3C4D4E4G4A4C5D5E5G5"`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::TabError;
use crate::event::KoraString;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tuning(BTreeMap<String, String>);

impl Tuning {
    /// The reference tuning of the instrument.
    pub fn base() -> Self {
        Self::from_note_sequence("E3G3A3C4D4E4G4A4C5D5E5G5")
    }

    /// Build a tuning from pitches concatenated in scale order.
    ///
    /// Strings beyond the last pitch stay unmapped.
    pub fn from_note_sequence(notes: &str) -> Self {
        let map = KoraString::scale_order()
            .map(|s| s.id())
            .zip(split_pitches(notes))
            .collect();
        Tuning(map)
    }

    pub fn pitch_for(&self, channel: &str) -> Option<&str> {
        self.0.get(channel).map(String::as_str)
    }

    pub fn set(&mut self, channel: impl Into<String>, pitch: impl Into<String>) {
        self.0.insert(channel.into(), pitch.into());
    }

    /// Distinct pitches, the set of resources a backend has to prepare.
    pub fn unique_pitches(&self) -> BTreeSet<&str> {
        self.0.values().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for Tuning {
    fn from(map: BTreeMap<String, String>) -> Self {
        Tuning(
            map.into_iter()
                .map(|(k, v)| (k.to_uppercase(), v))
                .collect(),
        )
    }
}

/// Split `"F3G#3A#3C4"` into `["F3", "G#3", "A#3", "C4"]`.
///
/// A pitch is a letter A-G, an optional `#` or `b`, then octave digits.
/// Other characters are skipped.
fn split_pitches(notes: &str) -> Vec<String> {
    let chars: Vec<char> = notes.chars().collect();
    let mut pitches = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if !('A'..='G').contains(&chars[i]) {
            i += 1;
            continue;
        }
        let mut pitch = String::from(chars[i]);
        i += 1;
        if i < chars.len() && (chars[i] == '#' || chars[i] == 'b') {
            pitch.push(chars[i]);
            i += 1;
        }
        while i < chars.len() && chars[i].is_ascii_digit() {
            pitch.push(chars[i]);
            i += 1;
        }
        pitches.push(pitch);
    }
    pitches
}

/// A named scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalePreset {
    pub name: &'static str,
    pub tuning: Tuning,
}

const PRESET_TABLE: [(&str, &str); 8] = [
    ("1. Pentatonique Fondamentale", "E3G3A3C4D4E4G4A4C5D5E5G5"),
    ("2. Pentatonique (Descente Basse)", "F3G3A3C4D4E4G4A4C5D5E5G5"),
    ("3. Manitoumani (Standard)", "F3G3A3C4D4E4G4A4B4C5E5G5"),
    ("4. Orientale Sahara", "F3A3B3D4E4F4G#4A4B4C5E5F5"),
    ("5. Fa Blues Augmenté Nyama", "F3G#3A#3C4D#4F4G4G#4A#4C5D#5F5"),
    ("6. Fa Ionien", "F3A3A#3C4D4E4F4G4A4C5D5F5"),
    ("7. Une Âme", "F3G3G#3C4D4D#4F4G#4A#4C5D#5F5"),
    ("8. Impressionniste", "E3F3A3B3C4E4G4A4B4C5E5G5"),
];

pub fn presets() -> Vec<ScalePreset> {
    PRESET_TABLE
        .iter()
        .map(|&(name, notes)| ScalePreset {
            name,
            tuning: Tuning::from_note_sequence(notes),
        })
        .collect()
}

/// Find a preset by 1-based number, full name, or name without its number
/// (case-insensitive).
pub fn preset(key: &str) -> Result<ScalePreset, TabError> {
    let key = key.trim();
    let wanted = key.to_lowercase();
    let by_index = key.parse::<usize>().ok();
    presets()
        .into_iter()
        .enumerate()
        .find(|(i, p)| {
            let name = p.name.to_lowercase();
            let bare = name.split_once(". ").map(|(_, rest)| rest).unwrap_or(&name);
            by_index == Some(i + 1) || name == wanted || bare == wanted
        })
        .map(|(_, p)| p)
        .ok_or_else(|| TabError::UnknownTuning(key.to_string()))
}
