use super::scaling::ScalingRule;
use super::ui::{ENCODER_COUNT, POT_COUNT};

/// A parameter driven by a pot, with the curve used to reach it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PotBinding {
    /// Index into the parameter store.
    pub param: usize,
    /// Mapping between pot position and parameter value.
    pub rule: ScalingRule,
}

/// The two parameters a pot can drive.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PotLayout {
    /// Edited while the pot's button is released.
    pub primary: PotBinding,
    /// Edited while the pot's button is held.
    pub alt: PotBinding,
}

/// A parameter stepped directly by an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderBinding {
    /// Index into the parameter store.
    pub param: usize,
    /// Lowest value the encoder can reach (inclusive).
    pub min: i32,
    /// Highest value the encoder can reach (inclusive).
    pub max: i32,
    /// Change per detent.
    pub step: i32,
}

impl EncoderBinding {
    /// Apply `delta` detents to `current`, clamped to `[min, max]`.
    pub fn apply(&self, current: i32, delta: i8) -> i32 {
        current
            .saturating_add(i32::from(delta).saturating_mul(self.step))
            .clamp(self.min, self.max)
    }
}

/// Which parameter every physical control edits.
///
/// Encoders without a binding are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlLayout {
    /// One layout per pot, indexed by [`PotId::index`](super::PotId::index).
    pub pots: [PotLayout; POT_COUNT],
    /// One optional binding per encoder, indexed by
    /// [`EncoderId::index`](super::EncoderId::index).
    pub encoders: [Option<EncoderBinding>; ENCODER_COUNT],
}
