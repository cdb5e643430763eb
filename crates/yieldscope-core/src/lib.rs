//! Timeline animation, playback, sessions, and configuration for
//! Yieldscope.
//!
//! This crate is the server-authoritative heart of the timeline dashboard:
//! the cyclic year animator, the play/pause parity toggle, the session
//! state those act on, and the typed configuration the binary loads at
//! startup.
//!
//! # Modules
//!
//! - [`animator`] -- Cyclic year advancement over a crop's year sequence.
//! - [`config`] -- Typed `yieldscope.yaml` configuration with defaults and
//!   environment overrides.
//! - [`playback`] -- The play/pause toggle as a pure parity function of
//!   the click counter.
//! - [`session`] -- Timeline sessions and the single typed-command
//!   handler.

pub mod animator;
pub mod config;
pub mod playback;
pub mod session;

// Re-export primary types at crate root.
pub use config::{AppConfig, ConfigError};
pub use session::TimelineSession;
