//! Shared type definitions for the Yieldscope dashboards.
//!
//! This crate is the single source of truth for types used across the
//! Yieldscope workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the dashboard pages.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for session identifiers
//! - [`enums`] -- Enumeration types (metrics, chart kinds, themes)
//! - [`structs`] -- Observation rows, animation state, wire payloads
//! - [`commands`] -- Typed timeline commands and outcomes

pub mod commands;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use commands::{CommandOutcome, DashCommand};
pub use enums::{ChartKind, Metric, Theme};
pub use ids::SessionId;
pub use structs::{AnimationState, DashMeta, Observation, SummaryCards, YearUpdate};
