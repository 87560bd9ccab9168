//! Audio subsystem boundary.
//!
//! The scheduler only needs a clock, a way to wake that clock, a way to get the
//! tuning's sounds ready, and a way to fire a string at an exact future time.
//! Rendering the sound itself happens behind [`AudioBackend::trigger`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use crate::error::TabError;
use crate::tuning::Tuning;

pub trait AudioBackend {
    /// Monotonic audio clock in seconds.
    fn now(&self) -> f64;

    /// Start the clock if it is suspended. Blocks until it runs.
    fn resume(&mut self) -> Result<(), TabError>;

    /// Make every pitch of the active tuning playable. Blocks until ready.
    fn prepare(&mut self) -> Result<(), TabError>;

    /// Schedule `channel` to sound at clock time `at`.
    fn trigger(&mut self, channel: &str, at: f64);
}

/// How a pitch will be voiced.
#[derive(Debug, Clone, PartialEq)]
pub enum Voicing {
    Sample(PathBuf),
    /// No sample found; a plucked sine stands in.
    Synth,
}

/// A note handed to the output, after tuning lookup and humanization.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub channel: String,
    pub pitch: String,
    pub voicing: Voicing,
    pub at: f64,
    pub velocity: f32,
}

/// Slight random loudness per note.
pub fn humanized_velocity() -> f32 {
    0.9 + fastrand::f32() * 0.1
}

/// Backend that keeps time with the system clock and reports every note
/// through the log instead of a sound card.
pub struct ConsoleBackend {
    epoch: Instant,
    running: bool,
    tuning: Tuning,
    samples_dir: Option<PathBuf>,
    voicings: BTreeMap<String, Voicing>,
    triggered: Vec<Trigger>,
}

impl ConsoleBackend {
    pub fn new(tuning: Tuning, samples_dir: Option<PathBuf>) -> Self {
        Self {
            epoch: Instant::now(),
            running: false,
            tuning,
            samples_dir,
            voicings: BTreeMap::new(),
            triggered: Vec::new(),
        }
    }

    /// Swap the tuning. Prepared voicings are dropped and reloaded on the next
    /// `prepare()`.
    pub fn set_tuning(&mut self, tuning: Tuning) {
        self.tuning = tuning;
        self.voicings.clear();
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn voicing(&self, pitch: &str) -> Option<&Voicing> {
        self.voicings.get(pitch)
    }

    pub fn triggered(&self) -> &[Trigger] {
        &self.triggered
    }
}

impl AudioBackend for ConsoleBackend {
    fn now(&self) -> f64 {
        if self.running {
            self.epoch.elapsed().as_secs_f64()
        } else {
            0.0
        }
    }

    fn resume(&mut self) -> Result<(), TabError> {
        if !self.running {
            self.epoch = Instant::now();
            self.running = true;
            log::debug!(target: "audio", "clock resumed");
        }
        Ok(())
    }

    fn prepare(&mut self) -> Result<(), TabError> {
        let pending: Vec<String> = self
            .tuning
            .unique_pitches()
            .into_iter()
            .filter(|p| !self.voicings.contains_key(*p))
            .map(str::to_string)
            .collect();

        for pitch in pending {
            let sample = self
                .samples_dir
                .as_ref()
                .map(|dir| dir.join(format!("{}.wav", pitch)))
                .filter(|path| path.is_file());
            let voicing = match sample {
                Some(path) => Voicing::Sample(path),
                None => {
                    log::warn!(target: "audio", "no sample for {}, using synthesized fallback", pitch);
                    Voicing::Synth
                }
            };
            self.voicings.insert(pitch, voicing);
        }
        log::info!(target: "audio", "{} voicings ready", self.voicings.len());
        Ok(())
    }

    fn trigger(&mut self, channel: &str, at: f64) {
        let Some(pitch) = self.tuning.pitch_for(channel) else {
            return;
        };
        // Unprepared since the last tuning change.
        let Some(voicing) = self.voicings.get(pitch) else {
            log::debug!(target: "audio", "{} ({}) has no voicing, dropped", channel, pitch);
            return;
        };
        let trigger = Trigger {
            channel: channel.to_string(),
            pitch: pitch.to_string(),
            voicing: voicing.clone(),
            at,
            velocity: humanized_velocity(),
        };
        log::info!(
            target: "audio",
            "{:>8.3}s  {:<3} {:<4} vel {:.2}",
            trigger.at,
            trigger.channel,
            trigger.pitch,
            trigger.velocity
        );
        self.triggered.push(trigger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_suspended_until_resumed() {
        let mut backend = ConsoleBackend::new(Tuning::base(), None);
        assert_eq!(backend.now(), 0.0);
        backend.resume().unwrap();
        assert!(backend.now() >= 0.0);
    }

    #[test]
    fn test_missing_samples_fall_back() {
        let mut backend = ConsoleBackend::new(Tuning::base(), Some(PathBuf::from("/nonexistent")));
        backend.prepare().unwrap();
        assert_eq!(backend.voicing("E3"), Some(&Voicing::Synth));
    }

    #[test]
    fn test_set_tuning_invalidates_voicings() {
        let mut backend = ConsoleBackend::new(Tuning::base(), None);
        backend.prepare().unwrap();
        backend.set_tuning(Tuning::from_note_sequence("F3"));
        assert_eq!(backend.voicing("E3"), None);
        backend.prepare().unwrap();
        assert_eq!(backend.voicing("F3"), Some(&Voicing::Synth));
    }

    #[test]
    fn test_trigger_resolves_pitch_and_drops_unmapped() {
        let mut backend = ConsoleBackend::new(Tuning::base(), None);
        backend.prepare().unwrap();
        backend.trigger("4G", 1.5);
        backend.trigger("9X", 2.0);
        let triggered = backend.triggered();
        assert_eq!(triggered.len(), 1);
        assert_eq!(triggered[0].pitch, "A4");
        assert_eq!(triggered[0].voicing, Voicing::Synth);
        assert!((0.9..=1.0).contains(&triggered[0].velocity));
    }

    #[test]
    fn test_trigger_after_retune_waits_for_prepare() {
        let mut backend = ConsoleBackend::new(Tuning::base(), None);
        backend.prepare().unwrap();
        backend.set_tuning(Tuning::from_note_sequence("F3"));
        backend.trigger("1D", 0.5);
        assert!(backend.triggered().is_empty());

        backend.prepare().unwrap();
        backend.trigger("1D", 0.75);
        assert_eq!(backend.triggered().len(), 1);
        assert_eq!(backend.triggered()[0].pitch, "F3");
    }

    #[test]
    fn test_trigger_before_prepare_is_dropped() {
        let mut backend = ConsoleBackend::new(Tuning::base(), None);
        backend.resume().unwrap();
        backend.trigger("1D", 0.0);
        assert!(backend.triggered().is_empty());
    }
}
