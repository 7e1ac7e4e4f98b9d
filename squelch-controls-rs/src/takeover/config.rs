/// Tuning for the soft-takeover engine.
///
/// The thresholds are fixed when the engine is built; they are not exposed
/// as runtime parameters. [`TakeoverConfig::default()`] reproduces the
/// shipped behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TakeoverConfig {
    /// Distance between raw position and target below which the target
    /// snaps to the raw position. Default: 0.02.
    pub sync_window: f32,
    /// Raw positions at or below this value always snap. Default: 0.01.
    pub low_rail: f32,
    /// Raw positions at or above this value always snap. Default: 0.99.
    pub high_rail: f32,
    /// Countdown loaded into the [`ActiveDisplay`](super::ActiveDisplay) on
    /// every edit, in audio frames. Default: 48000 (one second at 48 kHz).
    pub display_ticks: i32,
    /// Amount subtracted from the countdown on every UI poll, in audio
    /// frames. Default: 128.
    pub display_step: i32,
}

impl Default for TakeoverConfig {
    fn default() -> Self {
        Self {
            sync_window: 0.02,
            low_rail: 0.01,
            high_rail: 0.99,
            display_ticks: 48_000,
            display_step: 128,
        }
    }
}

impl TakeoverConfig {
    /// Whether `position` sits on either end of the pot's travel.
    pub fn at_rail(&self, position: f32) -> bool {
        position <= self.low_rail || position >= self.high_rail
    }

    /// Number of UI polls an untouched display stays up.
    pub fn display_polls(&self) -> i32 {
        if self.display_step <= 0 {
            return i32::MAX;
        }
        (self.display_ticks + self.display_step - 1) / self.display_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let c = TakeoverConfig::default();
        assert_eq!(c.sync_window, 0.02);
        assert_eq!(c.low_rail, 0.01);
        assert_eq!(c.high_rail, 0.99);
        assert_eq!(c.display_ticks, 48_000);
        assert_eq!(c.display_step, 128);
    }

    #[test]
    fn rails_are_inclusive() {
        let c = TakeoverConfig::default();
        assert!(c.at_rail(0.0));
        assert!(c.at_rail(0.01));
        assert!(!c.at_rail(0.011));
        assert!(!c.at_rail(0.5));
        assert!(c.at_rail(0.99));
        assert!(c.at_rail(1.0));
    }

    #[test]
    fn display_polls_rounds_up() {
        let c = TakeoverConfig::default();
        assert_eq!(c.display_polls(), 375);

        let c = TakeoverConfig {
            display_ticks: 100,
            display_step: 30,
            ..TakeoverConfig::default()
        };
        assert_eq!(c.display_polls(), 4);
    }
}
