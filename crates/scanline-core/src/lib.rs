//! Core pipeline for scanline.
//!
//! Two stream pumps classify scanner output into [`events::Event`]s and feed a
//! bounded channel drained by a single renderer that keeps a live status line
//! at the bottom of the terminal. Nothing here parses CLI flags or spawns
//! processes; the binary crate owns those concerns.

pub mod classify;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod pump;
pub mod render;
pub mod status;
pub mod theme;
