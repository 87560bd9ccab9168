//! Lookahead scheduler.
//!
//! Maps ticks to audio-clock deadlines and decides which events are due. It
//! does no timing of its own: the caller feeds it the clock through
//! [`Scheduler::advance`] (dispatch) and [`Scheduler::position_at`] (cursor).

use crate::config::SchedulerConfig;
use crate::error::TabError;
use crate::event::Event;
use crate::time::{seconds_to_ticks, ticks_to_seconds, Tick};

use super::backend::AudioBackend;

/// A note the backend must schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub channel: String,
    pub tick: Tick,
    /// Absolute audio-clock time.
    pub at: f64,
}

/// Outcome of one dispatcher pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    pub dispatched: Vec<Dispatch>,
    /// The session ended during this pass.
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PlayState {
    Idle,
    Playing {
        /// Audio-clock time of tick 0.
        session_start: f64,
        next_index: usize,
    },
}

/// One playback session's worth of state: events, tempo and position.
#[derive(Debug, Clone)]
pub struct Scheduler {
    events: Vec<Event>,
    bpm: f64,
    config: SchedulerConfig,
    state: PlayState,
}

fn check_tempo(bpm: f64) -> Result<f64, TabError> {
    if bpm.is_finite() && bpm > 0.0 {
        Ok(bpm)
    } else {
        Err(TabError::InvalidTempo(bpm))
    }
}

impl Scheduler {
    pub fn new(bpm: f64, config: SchedulerConfig) -> Result<Self, TabError> {
        config.validate()?;
        Ok(Self {
            events: Vec::new(),
            bpm: check_tempo(bpm)?,
            config,
            state: PlayState::Idle,
        })
    }

    /// Replace the event set. Text and page breaks are dropped here; what
    /// remains is kept in tick order.
    pub fn set_events(&mut self, events: &[Event]) {
        let mut audible: Vec<Event> = events.iter().filter(|e| e.is_audible()).cloned().collect();
        audible.sort_by_key(|e| e.tick);
        log::debug!(
            target: "playback",
            "{} audible events ({} filtered)",
            audible.len(),
            events.len() - audible.len()
        );
        self.events = audible;
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Change tempo. Takes effect on the next pass without moving tick 0, so
    /// notes not yet dispatched jump to the new grid.
    pub fn set_tempo(&mut self, bpm: f64) -> Result<(), TabError> {
        self.bpm = check_tempo(bpm)?;
        Ok(())
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlayState::Playing { .. })
    }

    /// Audio-clock time of tick 0, while playing.
    pub fn session_start(&self) -> Option<f64> {
        match self.state {
            PlayState::Playing { session_start, .. } => Some(session_start),
            PlayState::Idle => None,
        }
    }

    /// Index of the next event to dispatch, while playing.
    pub fn next_index(&self) -> Option<usize> {
        match self.state {
            PlayState::Playing { next_index, .. } => Some(next_index),
            PlayState::Idle => None,
        }
    }

    /// Start a session. The clock is resumed and the backend's resources are
    /// prepared first; if either fails the scheduler stays idle.
    pub fn play<B: AudioBackend>(&mut self, backend: &mut B) -> Result<(), TabError> {
        if self.is_playing() {
            return Err(TabError::AlreadyPlaying);
        }
        backend.resume()?;
        backend.prepare()?;

        let session_start = backend.now() + self.config.start_delay_secs;
        self.state = PlayState::Playing {
            session_start,
            next_index: 0,
        };
        log::info!(
            target: "playback",
            "playing {} events at {} BPM",
            self.events.len(),
            self.bpm
        );
        Ok(())
    }

    /// Return to idle. Safe to call at any time.
    pub fn stop(&mut self) {
        if self.is_playing() {
            log::info!(target: "playback", "stopped");
        }
        self.state = PlayState::Idle;
    }

    fn deadline(&self, session_start: f64, tick: Tick) -> f64 {
        session_start + ticks_to_seconds(tick as f64, self.bpm)
    }

    /// Dispatcher pass at clock time `now`.
    ///
    /// Hands out every pending event whose deadline is within the horizon, then
    /// ends the session once the tail after the last event has elapsed. Does
    /// nothing when idle.
    pub fn advance(&mut self, now: f64) -> Step {
        let PlayState::Playing {
            session_start,
            mut next_index,
        } = self.state
        else {
            return Step::default();
        };

        let mut step = Step::default();
        let horizon = now + self.config.horizon_secs();
        while let Some(event) = self.events.get(next_index) {
            let at = self.deadline(session_start, event.tick);
            if at >= horizon {
                break;
            }
            if let Some(channel) = event.channel.voice() {
                step.dispatched.push(Dispatch {
                    channel: channel.to_string(),
                    tick: event.tick,
                    at,
                });
            }
            next_index += 1;
        }

        self.state = PlayState::Playing {
            session_start,
            next_index,
        };

        if next_index >= self.events.len() {
            let done = match self.events.last() {
                Some(last) => now > self.deadline(session_start, last.tick) + self.config.tail_secs,
                None => true,
            };
            if done {
                log::debug!(target: "playback", "sequence finished at {:.3}s", now);
                self.stop();
                step.finished = true;
            }
        }

        if !step.dispatched.is_empty() {
            log::trace!(target: "playback", "dispatched {} at {:.3}s", step.dispatched.len(), now);
        }
        step
    }

    /// Interpolated tick position at clock time `now`, clamped at 0.
    /// `None` when idle.
    pub fn position_at(&self, now: f64) -> Option<f64> {
        let session_start = self.session_start()?;
        Some(seconds_to_ticks(now - session_start, self.bpm).max(0.0))
    }
}
