use libm::fabsf;

use super::config::TakeoverConfig;

/// Which of a pot's two parameters an update edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layer {
    /// Button released.
    Primary,
    /// Button held.
    Alt,
}

/// Soft-takeover state of one physical pot.
///
/// Both targets are logical positions in `[0, 1]`; they are clamped on
/// every update and on every restore.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PotChannel {
    last_position: f32,
    primary_target: f32,
    alt_target: f32,
    button_was_pressed: bool,
}

impl Default for PotChannel {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}

impl PotChannel {
    /// Channel whose pot is assumed to sit at the primary target.
    pub fn new(primary_target: f32, alt_target: f32) -> Self {
        let primary_target = primary_target.clamp(0.0, 1.0);
        Self {
            last_position: primary_target,
            primary_target,
            alt_target: alt_target.clamp(0.0, 1.0),
            button_was_pressed: false,
        }
    }

    /// Re-seed both targets from stored parameter values (instance setup or
    /// preset recall).
    ///
    /// The pot's true position is unknown here, so the last position is
    /// assumed to match the primary target; the first real touch then starts
    /// out of sync until the resync rule converges.
    pub fn restore(&mut self, primary_target: f32, alt_target: f32) {
        *self = Self {
            button_was_pressed: self.button_was_pressed,
            ..Self::new(primary_target, alt_target)
        };
    }

    /// Feed one raw position sample and return the edited layer and its new
    /// target.
    ///
    /// 1. `delta = position - last_position`
    /// 2. The selected target moves by `delta` and is clamped to `[0, 1]`.
    /// 3. The target snaps to `position` when `position` is within the sync
    ///    window of the target (before or after the move) or on a rail.
    /// 4. `last_position = position`
    ///
    /// A non-finite `position` leaves the channel untouched and returns the
    /// current target of the selected layer.
    pub fn update(&mut self, position: f32, button: bool, config: &TakeoverConfig) -> (Layer, f32) {
        let layer = if button { Layer::Alt } else { Layer::Primary };
        if !position.is_finite() {
            return (layer, self.target(layer));
        }

        let delta = position - self.last_position;
        let target = match layer {
            Layer::Primary => &mut self.primary_target,
            Layer::Alt => &mut self.alt_target,
        };

        let previous = *target;
        *target = (previous + delta).clamp(0.0, 1.0);

        let in_sync = fabsf(position - *target) < config.sync_window
            || fabsf(position - previous) < config.sync_window
            || config.at_rail(position);
        if in_sync {
            *target = position.clamp(0.0, 1.0);
        }

        let value = *target;
        self.last_position = position;
        self.button_was_pressed = button;
        (layer, value)
    }

    /// Record the button state on a poll where the pot did not move.
    pub fn set_button(&mut self, button: bool) {
        self.button_was_pressed = button;
    }

    /// Last raw position seen.
    pub fn last_position(&self) -> f32 {
        self.last_position
    }

    /// Logical target of the given layer.
    pub fn target(&self, layer: Layer) -> f32 {
        match layer {
            Layer::Primary => self.primary_target,
            Layer::Alt => self.alt_target,
        }
    }

    /// Whether the pot's button was held on the last poll.
    pub fn button_was_pressed(&self) -> bool {
        self.button_was_pressed
    }

    /// Whether the raw position currently matches the target of `layer`.
    pub fn is_synced(&self, layer: Layer) -> bool {
        self.last_position == self.target(layer)
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
