//! Synthesizer parameter storage with change tracking.
//!
//! This module provides the [`ParameterValues`] data structure that holds
//! the integer value of every plugin parameter. It is the central state
//! written by the control surface (through the soft-takeover engine) and by
//! preset recall, and read by the audio path and the draw callback.
//!
//! # Layout
//!
//! Parameters are addressed by a flat index into a table of
//! [`ParameterSpec`]s supplied at construction. The table fixes the name,
//! range and default of every slot:
//!
//! ```text
//! index:  0         1          2       3           ...
//!         [Output]  [Out Mode] [Cutoff] [Resonance] ...
//! ```
//!
//! # Change Tracking
//!
//! Each parameter carries two independent change flags:
//!
//! - **`changed_engine`** — set when the value must be forwarded to the
//!   synthesis engine on the next audio block.
//! - **`changed_display`** — set when the draw callback needs to refresh
//!   this parameter.
//!
//! Consumers call [`ParameterValues::take_engine_changes()`] or
//! [`ParameterValues::take_display_changes()`] to read and clear their
//! respective flags.
//!
//! # Preset Recall
//!
//! [`ParameterValues::restore()`] overwrites every value at once and bumps
//! a recall counter. The control surface compares counters to know when
//! its soft-takeover targets must be rebuilt from the stored values.
//!
//! # `no_std` Compatibility
//!
//! This module uses no heap allocation. All storage is fixed-size arrays
//! sized by a const generic; change lists are `heapless` vectors.

mod error;
mod parameter;
mod store;
mod values;

pub use error::ParameterError;
pub use parameter::{Parameter, ParameterSpec};
pub use store::ParameterStore;
pub use values::{ParameterChange, ParameterValues};
