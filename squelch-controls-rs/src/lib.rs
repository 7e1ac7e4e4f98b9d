//! Control surface state for a monophonic synth voice.
//!
//! - [`parameter_values`] — the fixed-size parameter store shared by the UI
//!   poll, the draw callback and the audio path.
//! - [`takeover`] — the soft-takeover engine that turns raw pot and encoder
//!   gestures into parameter writes without jumps.
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`] and
//!   [`defmt::Format`] on public types.

#![no_std]

pub mod parameter_values;
pub mod takeover;
