//! Playback display.
//!
//! A [`PlaybackSource`] is polled on a fixed tick and its snapshots are
//! rendered either as a single status line ([`oneline`]) or as a centered
//! panel in the alternate screen ([`fullscreen`]).

pub mod fullscreen;
pub mod oneline;
mod poller;

pub use poller::{DisplayState, NOTHING_PLAYING, PlaybackSource, SpotifySession};
