//! Typed view of the host's per-poll UI snapshot.
//!
//! The host reports pot movement and pot-button state as bits in one
//! control word. [`UiSnapshot::from_host`] decodes that word once into one
//! record per control so the engine can iterate channels uniformly.

/// Number of physical pots.
pub const POT_COUNT: usize = 3;

/// Number of physical encoders.
pub const ENCODER_COUNT: usize = 2;

/// Host control-word bit set when a pot moved since the last poll.
const POT_MOVED_BITS: [u32; POT_COUNT] = [1 << 11, 1 << 12, 1 << 13];

/// Host control-word bit set while a pot's push-button is held.
const POT_BUTTON_BITS: [u32; POT_COUNT] = [1 << 4, 1 << 5, 1 << 6];

/// Physical pot identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PotId {
    /// Cutoff, or env mod with the button held.
    Left,
    /// Resonance, or accent with the button held.
    Centre,
    /// Decay, or slide time with the button held.
    Right,
}

impl PotId {
    /// All pots in panel order.
    pub const ALL: [PotId; POT_COUNT] = [PotId::Left, PotId::Centre, PotId::Right];

    /// Array index of this pot.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Physical encoder identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderId {
    /// Left encoder.
    Left,
    /// Right encoder.
    Right,
}

impl EncoderId {
    /// All encoders in panel order.
    pub const ALL: [EncoderId; ENCODER_COUNT] = [EncoderId::Left, EncoderId::Right];

    /// Array index of this encoder.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// State of one pot in a UI snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PotSample {
    /// Raw position in `[0, 1]`.
    pub position: f32,
    /// The pot moved since the previous poll.
    pub moved: bool,
    /// The pot's push-button is held.
    pub button: bool,
}

/// One UI poll worth of raw control input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UiSnapshot {
    /// Per-pot samples, indexed by [`PotId::index`].
    pub pots: [PotSample; POT_COUNT],
    /// Signed detent counts since the previous poll, indexed by
    /// [`EncoderId::index`].
    pub encoders: [i8; ENCODER_COUNT],
}

impl UiSnapshot {
    /// Decode the host's control word, pot positions and encoder deltas.
    ///
    /// Positions outside `[0, 1]` are clamped. A non-finite position is
    /// reported as 0 and not moved.
    pub fn from_host(
        controls: u32,
        pots: [f32; POT_COUNT],
        encoders: [i8; ENCODER_COUNT],
    ) -> Self {
        Self {
            pots: core::array::from_fn(|i| {
                let finite = pots[i].is_finite();
                PotSample {
                    position: if finite { pots[i].clamp(0.0, 1.0) } else { 0.0 },
                    moved: finite && controls & POT_MOVED_BITS[i] != 0,
                    button: controls & POT_BUTTON_BITS[i] != 0,
                }
            }),
            encoders,
        }
    }

    /// Sample for one pot.
    pub fn pot(&self, pot: PotId) -> PotSample {
        self.pots[pot.index()]
    }

    /// Delta for one encoder.
    pub fn encoder(&self, encoder: EncoderId) -> i8 {
        self.encoders[encoder.index()]
    }

    /// Builder used by tests and host shims: mark `pot` as moved to `position`.
    pub fn with_pot(mut self, pot: PotId, position: f32, button: bool) -> Self {
        self.pots[pot.index()] = PotSample {
            position,
            moved: true,
            button,
        };
        self
    }

    /// Builder used by tests and host shims: set an encoder delta.
    pub fn with_encoder(mut self, encoder: EncoderId, delta: i8) -> Self {
        self.encoders[encoder.index()] = delta;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_host_decodes_moved_and_button_bits() {
        let controls = (1 << 12) | (1 << 4) | (1 << 13) | (1 << 6);
        let ui = UiSnapshot::from_host(controls, [0.1, 0.2, 0.3], [0, -2]);

        assert_eq!(
            ui.pot(PotId::Left),
            PotSample {
                position: 0.1,
                moved: false,
                button: true
            }
        );
        assert!(ui.pot(PotId::Centre).moved);
        assert!(!ui.pot(PotId::Centre).button);
        assert!(ui.pot(PotId::Right).moved);
        assert!(ui.pot(PotId::Right).button);
        assert_eq!(ui.encoder(EncoderId::Right), -2);
    }

    #[test]
    fn from_host_clamps_positions() {
        let ui = UiSnapshot::from_host(0, [-0.5, 1.5, 0.5], [0, 0]);
        assert_eq!(ui.pots[0].position, 0.0);
        assert_eq!(ui.pots[1].position, 1.0);
        assert_eq!(ui.pots[2].position, 0.5);
    }

    #[test]
    fn from_host_drops_non_finite_positions() {
        let ui = UiSnapshot::from_host(
            (1 << 11) | (1 << 4) | (1 << 13),
            [f32::NAN, f32::INFINITY, 0.5],
            [0, 0],
        );
        assert_eq!(ui.pots[0].position, 0.0);
        assert!(!ui.pots[0].moved);
        assert!(!ui.pots[1].moved);
        assert!(ui.pots[2].moved);
    }

    #[test]
    fn ids_index_in_panel_order() {
        for (i, pot) in PotId::ALL.iter().enumerate() {
            assert_eq!(pot.index(), i);
        }
        for (i, encoder) in EncoderId::ALL.iter().enumerate() {
            assert_eq!(encoder.index(), i);
        }
    }
}
