//! Single-threaded driver for a [`Scheduler`].
//!
//! Two periodic jobs share one loop: the dispatcher every `lookahead_ms`, and
//! the position reporter once per display frame. [`Transport::pump`] runs
//! whichever is due; [`Transport::run`] repeats that until playback ends.

use std::time::Duration;

use crate::error::TabError;
use crate::event::Event;

use super::backend::AudioBackend;
use super::scheduler::Scheduler;

type TickListener = Box<dyn FnMut(f64)>;

/// Shortest wait handed to `sleep`, so a clock that is a hair short of a due
/// time still moves forward.
const MIN_SLEEP_SECS: f64 = 0.001;

pub struct Transport<B: AudioBackend> {
    scheduler: Scheduler,
    backend: B,
    listener: Option<TickListener>,
    next_dispatch_at: f64,
    next_frame_at: f64,
}

impl<B: AudioBackend> Transport<B> {
    pub fn new(scheduler: Scheduler, backend: B) -> Self {
        Self {
            scheduler,
            backend,
            listener: None,
            next_dispatch_at: 0.0,
            next_frame_at: 0.0,
        }
    }

    /// Subscribe to position updates. Replaces any previous listener.
    pub fn on_tick(&mut self, listener: impl FnMut(f64) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    pub fn set_events(&mut self, events: &[Event]) {
        self.scheduler.set_events(events);
    }

    pub fn set_tempo(&mut self, bpm: f64) -> Result<(), TabError> {
        self.scheduler.set_tempo(bpm)
    }

    pub fn play(&mut self) -> Result<(), TabError> {
        self.scheduler.play(&mut self.backend)?;
        let now = self.backend.now();
        self.next_dispatch_at = now;
        self.next_frame_at = now;
        Ok(())
    }

    /// Stop immediately. Pending jobs see the idle state and do nothing.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Run the jobs that are due. Returns whether playback is still running.
    pub fn pump(&mut self) -> bool {
        if !self.scheduler.is_playing() {
            return false;
        }
        let now = self.backend.now();
        let config = *self.scheduler.config();

        if now >= self.next_dispatch_at {
            let step = self.scheduler.advance(now);
            for dispatch in &step.dispatched {
                self.backend.trigger(&dispatch.channel, dispatch.at);
            }
            self.next_dispatch_at = now + config.lookahead_secs();
        }

        if now >= self.next_frame_at {
            if let (Some(tick), Some(listener)) =
                (self.scheduler.position_at(now), self.listener.as_mut())
            {
                listener(tick);
            }
            self.next_frame_at = now + config.frame_secs();
        }

        self.scheduler.is_playing()
    }

    /// Seconds until the next job is due.
    pub fn until_next_job(&self) -> f64 {
        let due = self.next_dispatch_at.min(self.next_frame_at);
        (due - self.backend.now()).max(0.0)
    }

    /// Drive playback to the end. `sleep` is called between jobs.
    pub fn run(&mut self, mut sleep: impl FnMut(Duration)) {
        while self.pump() {
            let wait = self.until_next_job();
            if wait > 0.0 {
                sleep(Duration::from_secs_f64(wait.max(MIN_SLEEP_SECS)));
            }
        }
    }
}
