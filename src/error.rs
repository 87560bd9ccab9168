//! # Error Types
//!
//! This module defines all error types for koratab.
//!
//! The notation parser never fails: malformed lines are dropped. Errors only come
//! from the playback side (audio clock, resources, tempo) and from loading
//! configuration.
//!
//! ## Error Types
//! - `ClockUnavailable` - The audio clock could not be started or resumed
//! - `ResourcesUnavailable` - Playable resources for the tuning could not be prepared
//! - `AlreadyPlaying` - `play()` was called while a session is running
//! - `InvalidTempo` - Tempo is not a finite, positive BPM value
//! - `InvalidSchedulerConfig` - Poll interval, horizon, tail or frame rate out of range
//! - `UnknownTuning` - A tuning preset name or index did not match
//! - `UnknownSong` - A built-in song name or index did not match
//! - `Config` / `Io` - Configuration file could not be read or parsed
//!
//! ## Usage
//! ```rust,ignore
//! use koratab::{Scheduler, TabError};
//!
//! match scheduler.play(&mut backend) {
//!     Ok(()) => println!("Playing"),
//!     Err(TabError::ClockUnavailable(reason)) => eprintln!("No audio: {}", reason),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    /// The audio clock is missing or refused to resume.
    ///
    /// Recoverable: the scheduler stays idle and the caller resets its UI.
    ///
    /// # Example
    /// ```
    /// # use koratab::TabError;
    /// let err = TabError::ClockUnavailable("device busy".to_string());
    /// assert_eq!(err.to_string(), "Audio clock unavailable: device busy");
    /// ```
    #[error("Audio clock unavailable: {0}")]
    ClockUnavailable(String),

    /// The backend could not make the active tuning playable.
    #[error("Audio resources not ready: {0}")]
    ResourcesUnavailable(String),

    #[error("Playback is already running")]
    AlreadyPlaying,

    /// # Example
    /// ```
    /// # use koratab::TabError;
    /// let err = TabError::InvalidTempo(0.0);
    /// assert_eq!(err.to_string(), "Invalid tempo: 0 BPM");
    /// ```
    #[error("Invalid tempo: {0} BPM")]
    InvalidTempo(f64),

    /// A scheduler timing value is out of range.
    ///
    /// # Example
    /// ```
    /// # use koratab::TabError;
    /// let err = TabError::InvalidSchedulerConfig("frame_rate must be > 0".to_string());
    /// assert_eq!(err.to_string(), "Invalid scheduler settings: frame_rate must be > 0");
    /// ```
    #[error("Invalid scheduler settings: {0}")]
    InvalidSchedulerConfig(String),

    #[error("Unknown tuning preset: {0}")]
    UnknownTuning(String),

    #[error("Unknown song: {0}")]
    UnknownSong(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
