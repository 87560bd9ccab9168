//! # Built-in Songs
//!
//! Ready-to-play tablatures shipped with the player: a scale exercise, a
//! Manitoumani arrangement and a tour of the four note values.
//!
//! Look one up with [`song`] by 1-based number, full name or a
//! case-insensitive fragment of the name.

use crate::error::TabError;
use crate::event::Tablature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongPreset {
    pub name: &'static str,
    pub code: &'static str,
}

impl SongPreset {
    pub fn tablature(&self) -> Tablature {
        Tablature::parse(self.code)
    }
}

const BEGINNER_EXERCISE: &str = "1   1D
+   S
+   1G
+   S
+   2D
+   S
+   2G
+   S
+   3D
+   S
+   3G
+   S
+   4D
+   S
+   4G
+   S
+   5D
+   S
+   5G
+   S
+   6D
+   S
+   6G
+   S
+   TXT  DESCENTE
+   6G
+   S
+   6D
+   S
+   5G
+   S
+   5D
+   S
+   4G
+   S
+   4D
+   S
+   3G
+   S
+   3D
+   S
+   2G
+   S
+   2D
+   S
+   1G
+   S
+   1D";

const MANITOUMANI: &str = "1   4D
+   4G
+   5D
+   5G
+   4G
=   2D
+   3G
+   6D   x2
+   2G
=   5G
+  3G
+  6D   x2
+  2G
=  5G
+ 3G
+ 6D   x2
+ 2G
= 5G
+   TXT  REPETER 2x
+   PAGE
+   4D
+   4G
+   5D
+   5G
+   4G
=   1D
+   2G
+   6D   x2
+   2G
=   4G
+   1D
+   2G
+   6D   x2
+   2G
=   4G
+ S
+ S
+ PAGE
+   1G
+   3D
+   3G
+   5D
+   1G
+   3D
+   3G
+   5D
+ S
+ S
+ S
+ S
+ S
+ S
+ S
+ 4D
+ PAGE
+   4G
+   5D
+   5G
+   4G
=   2D
+   3G
+   6D   x2
+   2G
=   5G
+  3G
+  6D   x2
+  2G
=  5G
+ 3G
+ 6D   x2
+ 2G
= 5G";

const RHYTHM_DEMO: &str = "1   6G
+   TXT  NOIRES (+)
+   6D
+   5G
+   5D
+   S
+   TXT  CROCHES (♪)
♪   4G
♪   4D
♪   3G
♪   3D
+   S
+   TXT  TRIOLETS (🎶)
🎶   2G
🎶   2D
🎶   1G
🎶   1D
🎶   2G
🎶   2D
+   S
+   TXT  DOUBLES (♬)
♬ 6G
♬ 6D
♬ 5G
♬ 5D
♬ 4G
♬ 4D
♬ 3G
♬ 3D";

const SONG_TABLE: [SongPreset; 3] = [
    SongPreset {
        name: "Exercice Débutant 1 : Montée/Descente",
        code: BEGINNER_EXERCISE,
    },
    SongPreset {
        name: "Manitoumani -M- & Lamomali",
        code: MANITOUMANI,
    },
    SongPreset {
        name: "Démonstration Rythmes",
        code: RHYTHM_DEMO,
    },
];

pub fn songs() -> &'static [SongPreset] {
    &SONG_TABLE
}

/// Find a song by 1-based number, exact name, or a fragment of its name
/// (case-insensitive). The first match wins.
pub fn song(key: &str) -> Result<SongPreset, TabError> {
    let key = key.trim();
    let wanted = key.to_lowercase();
    if let Ok(index) = key.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| SONG_TABLE.get(i))
            .copied()
            .ok_or_else(|| TabError::UnknownSong(key.to_string()));
    }
    if wanted.is_empty() {
        return Err(TabError::UnknownSong(key.to_string()));
    }
    SONG_TABLE
        .iter()
        .find(|s| s.name.to_lowercase() == wanted)
        .or_else(|| {
            SONG_TABLE
                .iter()
                .find(|s| s.name.to_lowercase().contains(&wanted))
        })
        .copied()
        .ok_or_else(|| TabError::UnknownSong(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Channel;

    #[test]
    fn test_every_song_parses_to_notes() {
        for song in songs() {
            let tab = song.tablature();
            assert!(tab.audible().count() > 0, "{} has no notes", song.name);
        }
    }

    #[test]
    fn test_beginner_exercise_climbs_and_descends() {
        let tab = song("1").unwrap().tablature();
        let strings: Vec<&str> = tab.audible().filter_map(|e| e.channel.voice()).collect();
        assert_eq!(strings.len(), 24);
        assert_eq!(strings.first(), Some(&"1D"));
        assert_eq!(strings[11], "6G");
        assert_eq!(strings[12], "6G");
        assert_eq!(strings.last(), Some(&"1D"));
        assert_eq!(tab.texts().collect::<Vec<_>>(), vec![(288, "DESCENTE")]);
    }

    #[test]
    fn test_manitoumani_has_pages_and_chords() {
        let tab = song("manitoumani").unwrap().tablature();
        assert_eq!(tab.page_break_ticks().len(), 3);
        let first_chord: Vec<&str> = tab
            .audible()
            .filter(|e| e.tick == 48)
            .filter_map(|e| e.channel.voice())
            .collect();
        assert_eq!(first_chord, vec!["4G", "2D"]);
    }

    #[test]
    fn test_rhythm_demo_uses_every_note_value() {
        let tab = song("Démonstration Rythmes").unwrap().tablature();
        let mut durations: Vec<u32> = tab.audible().map(|e| e.duration).collect();
        durations.sort_unstable();
        durations.dedup();
        assert_eq!(durations, vec![3, 4, 6, 12]);
        assert!(tab.events().iter().any(|e| e.channel == Channel::Text));
    }

    #[test]
    fn test_song_lookup() {
        assert_eq!(song("2").unwrap().name, "Manitoumani -M- & Lamomali");
        assert_eq!(song("RYTHMES").unwrap().name, "Démonstration Rythmes");
        assert!(matches!(song("0"), Err(TabError::UnknownSong(_))));
        assert!(matches!(song("4"), Err(TabError::UnknownSong(_))));
        assert!(matches!(song("  "), Err(TabError::UnknownSong(_))));
        assert!(matches!(song("bolero"), Err(TabError::UnknownSong(_))));
    }
}
