//! Audio-driven rhythm charts and live timing judgment.
//!
//! [`chart`] turns decoded audio (or, without audio, a seeded grid) into a
//! list of timed notes; [`play`] judges player input against that list.

pub mod audio;
pub mod chart;
pub mod config;
pub mod error;
pub mod play;
pub mod song;

pub use error::{Error, Result};
