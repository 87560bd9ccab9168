//! # Playback Module
//!
//! Real-time playback of parsed tablature with a lookahead scheduler.
//!
//! ## Sub-modules
//! - `backend` - [`AudioBackend`] trait (clock + trigger) and the [`ConsoleBackend`]
//! - `scheduler` - [`Scheduler`], the pure dispatch/position state machine
//! - `transport` - [`Transport`], the loop that drives a scheduler against a backend
//!
//! ## Timing
//! ```text
//! deadline(event) = session_start + event.tick * (60 / bpm) / 12
//! ```
//! Every `lookahead_ms` (25 ms) the dispatcher hands the backend each event
//! whose deadline is less than `horizon_ms` (100 ms) away, together with that
//! deadline, so the backend can start the sound on the exact sample. Poll jitter
//! never reaches the audio.
//!
//! Independently, once per frame, the position reporter computes
//! ```text
//! tick = (now - session_start) / seconds_per_tick
//! ```
//! and passes it to the tick listener, so a cursor moves smoothly between
//! dispatcher passes.
//!
//! Once everything is dispatched the session runs for `tail_secs` (2 s) past the
//! last deadline to let strings ring out, then stops by itself.
//!
//! ## Example
//! ```rust,no_run
//! use koratab::playback::{ConsoleBackend, Scheduler, Transport};
//! use koratab::{parse, SchedulerConfig, Tuning};
//!
//! let events = parse("1 1D\n+ 1G\n= 4D");
//! let mut scheduler = Scheduler::new(120.0, SchedulerConfig::default()).unwrap();
//! scheduler.set_events(&events);
//!
//! let mut transport = Transport::new(scheduler, ConsoleBackend::new(Tuning::base(), None));
//! transport.on_tick(|tick| println!("at tick {:.1}", tick));
//! transport.play().unwrap();
//! transport.run(std::thread::sleep);
//! ```

mod backend;
mod scheduler;
mod transport;


pub use backend::{humanized_velocity, AudioBackend, ConsoleBackend, Trigger, Voicing};
pub use scheduler::{Dispatch, Scheduler, Step};
pub use transport::Transport;
