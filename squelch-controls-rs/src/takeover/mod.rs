//! Soft takeover for physical pots, plus relative encoder editing.
//!
//! After a preset recall the stored value of a parameter no longer matches
//! where its pot physically sits. Writing the pot's raw position on the next
//! touch would make the parameter jump. Instead every pot channel keeps a
//! *logical target* that follows the pot's relative movement and only snaps
//! to the raw position once the two agree:
//!
//! ```text
//!   raw pos  0.50 ──► 0.49 ──► 0.78
//!   target   0.80 ──► 0.79 ──► 0.78   (snapped: pot reached the target)
//!              ▲        │
//!              └ recall └ relative move, |0.49 - 0.79| too far to snap
//! ```
//!
//! A channel is back in sync when the raw position lands within
//! [`TakeoverConfig::sync_window`] of the target (before or after the
//! relative move), or when the pot reaches either end of its travel, where
//! the physical and logical positions cannot disagree.
//!
//! Each pot drives two parameters: the *primary* one, and an *alternate*
//! one edited while the pot's push-button is held. Encoders are already
//! relative and edit their parameter directly.
//!
//! Every successful edit also opens an [`ActiveDisplay`] that the draw
//! callback shows instead of the default overview until its countdown runs
//! out.

mod channel;
mod config;
mod display;
mod engine;
mod layout;
mod scaling;
mod ui;

pub use channel::{Layer, PotChannel};
pub use config::TakeoverConfig;
pub use display::ActiveDisplay;
pub use engine::{ControlEdit, ControlSource, EncoderUpdate, PotUpdate, SoftTakeover, MAX_EDITS};
pub use layout::{ControlLayout, EncoderBinding, PotBinding, PotLayout};
pub use scaling::{ScalingError, ScalingRule, Taper};
pub use ui::{EncoderId, PotId, PotSample, UiSnapshot, ENCODER_COUNT, POT_COUNT};
