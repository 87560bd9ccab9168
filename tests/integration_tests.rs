//! Integration tests for koratab
//!
//! Tests the path from tablature text through the scheduler to backend triggers.

use std::cell::Cell;
use std::rc::Rc;

use koratab::playback::{AudioBackend, Transport};
use koratab::{
    parse, presets, schedule, songs, Channel, SchedulerConfig, TabError, Tablature, Tuning,
};

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
+   TXT  REPETER 2x
+   PAGE
+   4D";

struct Recorder {
    clock: Rc<Cell<f64>>,
    notes: Vec<(String, f64)>,
}

impl AudioBackend for Recorder {
    fn now(&self) -> f64 {
        self.clock.get()
    }

    fn resume(&mut self) -> Result<(), TabError> {
        Ok(())
    }

    fn prepare(&mut self) -> Result<(), TabError> {
        Ok(())
    }

    fn trigger(&mut self, channel: &str, at: f64) {
        self.notes.push((channel.to_string(), at));
    }
}

#[test]
fn test_parse_song_excerpt() {
    let tab = Tablature::parse(MANITOUMANI);
    let voices: Vec<(&str, u32)> = tab
        .audible()
        .map(|e| (e.channel.voice().unwrap(), e.tick))
        .collect();
    assert_eq!(
        voices,
        vec![
            ("4D", 0),
            ("4G", 12),
            ("5D", 24),
            ("5G", 36),
            ("4G", 48),
            ("2D", 48),
            ("3G", 60),
            ("6D", 72),
            ("6D", 84),
            ("2G", 96),
            ("5G", 96),
            ("4D", 132),
        ]
    );
    assert_eq!(tab.texts().collect::<Vec<_>>(), vec![(108, "REPETER 2x")]);
    assert_eq!(tab.page_break_ticks(), vec![120]);
}

#[test]
fn test_reparse_is_identical() {
    assert_eq!(parse(MANITOUMANI), parse(MANITOUMANI));
}

#[test]
fn test_garbage_lines_are_skipped() {
    let events = parse("hello world\n1 1D\n## comment\n\n+ 1G\nlonely");
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].tick, 12);
}

#[test]
fn test_play_song_end_to_end() {
    let clock = Rc::new(Cell::new(0.0));
    let scheduler = schedule(MANITOUMANI, 120.0, SchedulerConfig::default()).unwrap();
    assert_eq!(scheduler.events().len(), 12);
    assert!(scheduler
        .events()
        .iter()
        .all(|e| e.channel != Channel::Text && e.channel != Channel::PageBreak));

    let recorder = Recorder {
        clock: clock.clone(),
        notes: Vec::new(),
    };
    let mut transport = Transport::new(scheduler, recorder);
    let last_tick = Rc::new(Cell::new(0.0));
    let sink = last_tick.clone();
    transport.on_tick(move |tick| sink.set(tick));

    transport.play().unwrap();
    let sleeper = clock.clone();
    transport.run(move |d| sleeper.set(sleeper.get() + d.as_secs_f64()));

    let notes = &transport.backend().notes;
    assert_eq!(notes.len(), 12);
    assert!(notes.windows(2).all(|w| w[0].1 <= w[1].1));
    // 4D at tick 132 -> 5.5 s after the 0.1 s start delay
    assert!((notes[11].1 - 5.6).abs() < 1e-9);
    assert!(last_tick.get() > 132.0);
    assert!(!transport.is_playing());
}

#[test]
fn test_presets_cover_every_string() {
    for preset in presets() {
        assert_eq!(preset.tuning.len(), 12, "{}", preset.name);
    }
}

#[test]
fn test_builtin_songs_play_through() {
    for song in songs() {
        let expected = song.tablature().audible().count();
        let clock = Rc::new(Cell::new(0.0));
        let scheduler = schedule(song.code, 180.0, SchedulerConfig::default()).unwrap();
        let recorder = Recorder {
            clock: clock.clone(),
            notes: Vec::new(),
        };
        let mut transport = Transport::new(scheduler, recorder);
        transport.play().unwrap();
        let sleeper = clock.clone();
        transport.run(move |d| sleeper.set(sleeper.get() + d.as_secs_f64()));

        let notes = &transport.backend().notes;
        assert_eq!(notes.len(), expected, "{}", song.name);
        let base = Tuning::base();
        assert!(
            notes.iter().all(|(channel, _)| base.pitch_for(channel).is_some()),
            "{} uses a string outside the instrument",
            song.name
        );
    }
}
