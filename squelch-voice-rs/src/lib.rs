//! CV/MIDI front end and plugin instance for a monophonic acid-bass voice.
//!
//! [`Voice`] owns everything one plugin instance needs: the memory
//! [`Pool`](squelch_pool::Pool) the engine's buffers come from, the
//! parameter store, the soft-takeover control surface and the
//! [`InputArbiter`] that turns gate, pitch and accent CV plus MIDI into
//! engine calls. The synthesis engine itself is anything implementing
//! [`SynthEngine`].
//!
//! ```text
//!  pots/encoders ──► SoftTakeover ──► ParameterValues ──► smoother ──┐
//!                                           │                        ▼
//!                                           └── changes ──────► SynthEngine ──► bus
//!  gate/pitch/accent CV ──► SchmittTrigger ─► InputArbiter ─────────▲
//!  MIDI ────────────────────────────────────► InputArbiter ─────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! let mut memory = [0u8; 4096];
//! let mut voice = Voice::new(MyEngine::default(), &mut memory, 48_000.0)?;
//!
//! // UI context
//! let pots = voice.setup_ui();
//! voice.custom_ui(&UiSnapshot::from_host(controls, positions, encoders));
//! let frame = voice.draw_state();
//!
//! // Audio context
//! voice.midi_message(0x90, 48, 100);
//! voice.step(&mut bus, frames, 48_000.0);
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`] and
//!   [`defmt::Format`] on public types.

#![no_std]

pub mod arbiter;
pub mod draw;
pub mod engine;
pub mod error;
pub mod gate;
pub mod midi;
pub mod params;
pub mod pitch;
pub mod smoother;
mod voice;

// ── Re-exports for convenience ───────────────────────────────────────

pub use arbiter::{CvFrame, GateArbitrationState, InputArbiter, NoteSource};
pub use draw::{DrawState, Readout};
pub use engine::SynthEngine;
pub use error::VoiceError;
pub use params::{ParamId, PitchMode, PARAMETERS, PARAM_COUNT};
pub use voice::{bus_offset, Voice, OUTPUT_GAIN};
