//! Control-rate smoothing of the parameters that sweep audibly.
//!
//! Cutoff, resonance and decay are filtered every sample toward their
//! stored value and pushed to the engine once every [`CONTROL_STRIDE`]
//! samples. The stride counter runs across audio blocks, so the push
//! cadence does not depend on the host's block size.

use crate::engine::SynthEngine;

/// One-pole coefficient applied per sample.
pub const SMOOTHING_COEFFICIENT: f32 = 0.001;

/// Samples between two pushes to the engine.
pub const CONTROL_STRIDE: u32 = 8;

/// First-order lowpass toward a moving target.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OnePole {
    value: f32,
}

impl OnePole {
    /// Filter resting at `initial`.
    pub const fn new(initial: f32) -> Self {
        Self { value: initial }
    }

    /// Advance one sample toward `target` and return the new value.
    pub fn process(&mut self, target: f32) -> f32 {
        self.value += SMOOTHING_COEFFICIENT * (target - self.value);
        self.value
    }

    /// Value after the last processed sample.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Jump straight to `value`.
    pub fn set(&mut self, value: f32) {
        self.value = value;
    }
}

/// Latest stored values of the smoothed parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SmoothedTargets {
    /// Filter cutoff in Hz.
    pub cutoff: f32,
    /// Resonance in percent.
    pub resonance: f32,
    /// Envelope decay in ms.
    pub decay: f32,
}

/// Smoother state for the three filtered parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSmoother {
    cutoff: OnePole,
    resonance: OnePole,
    decay: OnePole,
    counter: u32,
}

impl ControlSmoother {
    /// Start every filter at `initial`; the first processed sample pushes.
    pub fn new(initial: SmoothedTargets) -> Self {
        Self {
            cutoff: OnePole::new(initial.cutoff),
            resonance: OnePole::new(initial.resonance),
            decay: OnePole::new(initial.decay),
            counter: 0,
        }
    }

    /// Advance one sample, pushing to `engine` on stride boundaries.
    pub fn process<E: SynthEngine>(&mut self, targets: SmoothedTargets, engine: &mut E) {
        let cutoff = self.cutoff.process(targets.cutoff);
        let resonance = self.resonance.process(targets.resonance);
        let decay = self.decay.process(targets.decay);

        if self.counter == 0 {
            engine.set_cutoff(cutoff);
            engine.set_resonance(resonance);
            engine.set_decay(decay);
        }
        self.counter = (self.counter + 1) % CONTROL_STRIDE;
    }

    /// Current smoothed values.
    pub fn values(&self) -> SmoothedTargets {
        SmoothedTargets {
            cutoff: self.cutoff.value(),
            resonance: self.resonance.value(),
            decay: self.decay.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Pushes {
        cutoff: u32,
        last_cutoff: f32,
    }

    impl SynthEngine for Pushes {
        fn set_cutoff(&mut self, hz: f32) {
            self.cutoff += 1;
            self.last_cutoff = hz;
        }
        fn set_resonance(&mut self, _: f32) {}
        fn set_env_mod(&mut self, _: f32) {}
        fn set_decay(&mut self, _: f32) {}
        fn set_accent(&mut self, _: f32) {}
        fn set_waveform(&mut self, _: f32) {}
        fn set_volume(&mut self, _: f32) {}
        fn set_slide_time(&mut self, _: f32) {}
        fn set_oversampling(&mut self, _: u32) {}
        fn note_on(&mut self, _: u8, _: u8) {}
        fn all_notes_off(&mut self) {}
        fn set_pitch_bend(&mut self, _: f32) {}
        fn set_oscillator_frequency(&mut self, _: f32) {}
        fn set_accent_gain(&mut self, _: f32) {}
        fn next_sample(&mut self) -> f32 {
            0.0
        }
        fn set_sample_rate(&mut self, _: f32) {}
    }

    const START: SmoothedTargets = SmoothedTargets {
        cutoff: 1000.0,
        resonance: 50.0,
        decay: 300.0,
    };

    #[test]
    fn one_pole_moves_by_coefficient() {
        let mut pole = OnePole::new(0.0);
        assert_relative_eq!(pole.process(1000.0), 1.0, epsilon = 1e-4);
        assert_relative_eq!(pole.process(1000.0), 1.999, epsilon = 1e-4);
    }

    #[test]
    fn one_pole_converges() {
        let mut pole = OnePole::new(20.0);
        for _ in 0..20_000 {
            pole.process(5000.0);
        }
        assert_relative_eq!(pole.value(), 5000.0, max_relative = 1e-3);
    }

    #[test]
    fn pushes_every_eighth_sample() {
        let mut smoother = ControlSmoother::new(START);
        let mut engine = Pushes::default();
        for _ in 0..17 {
            smoother.process(START, &mut engine);
        }
        // Samples 0, 8 and 16.
        assert_eq!(engine.cutoff, 3);
    }

    #[test]
    fn stride_spans_blocks() {
        let mut smoother = ControlSmoother::new(START);
        let mut engine = Pushes::default();
        // Three blocks of 5 samples: pushes at samples 0 and 8 only.
        for _ in 0..3 {
            for _ in 0..5 {
                smoother.process(START, &mut engine);
            }
        }
        assert_eq!(engine.cutoff, 2);
    }

    #[test]
    fn pushed_value_is_smoothed_not_target() {
        let mut smoother = ControlSmoother::new(START);
        let mut engine = Pushes::default();
        let target = SmoothedTargets {
            cutoff: 2000.0,
            ..START
        };
        smoother.process(target, &mut engine);
        assert_relative_eq!(engine.last_cutoff, 1001.0, epsilon = 1e-3);
        assert_relative_eq!(smoother.values().cutoff, 1001.0, epsilon = 1e-3);
    }
}
