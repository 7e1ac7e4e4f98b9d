//! CV to pitch and accent conversions (1 V/octave, 0 V = middle C).

use libm::powf;

/// Reference tuning of A4 in Hz.
pub const A4_HZ: f32 = 440.0;

/// MIDI note of 0 V.
pub const CV_ZERO_NOTE: u8 = 60;

/// Accent CV above which a note-on uses [`ACCENT_VELOCITY`].
pub const ACCENT_THRESHOLD: f32 = 2.5;

/// Velocity of an accented CV note.
pub const ACCENT_VELOCITY: u8 = 127;

/// Velocity of an unaccented CV note.
pub const NORMAL_VELOCITY: u8 = 80;

/// Continuous frequency for a pitch CV, no quantization.
pub fn cv_to_frequency(cv: f32) -> f32 {
    A4_HZ * powf(2.0, (cv * 12.0 - 9.0) / 12.0)
}

/// Nearest MIDI note for a pitch CV, clamped to `0..=127`.
pub fn cv_to_midi_note(cv: f32) -> u8 {
    let note = (f32::from(CV_ZERO_NOTE) + cv * 12.0).clamp(0.0, 127.0);
    (note + 0.5) as u8
}

/// Note-on velocity for the accent CV at a rising gate. A disconnected
/// accent input never accents.
pub fn accent_velocity(accent_cv: Option<f32>) -> u8 {
    match accent_cv {
        Some(cv) if cv > ACCENT_THRESHOLD => ACCENT_VELOCITY,
        _ => NORMAL_VELOCITY,
    }
}

/// Accent gain for the engine while the gate is high: the CV above the
/// threshold mapped to `[0, 0.5]`.
pub fn accent_gain(accent_cv: f32) -> f32 {
    ((accent_cv - ACCENT_THRESHOLD) / ACCENT_THRESHOLD).clamp(0.0, 1.0) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_volts_is_middle_c() {
        assert_relative_eq!(cv_to_frequency(0.0), 261.6256, max_relative = 1e-5);
        assert_relative_eq!(cv_to_frequency(0.75), 440.0, max_relative = 1e-5);
        assert_relative_eq!(cv_to_frequency(1.0), 523.2511, max_relative = 1e-5);
    }

    #[test]
    fn frequency_is_continuous_between_notes() {
        let f = cv_to_frequency(0.5 / 12.0);
        assert!(f > cv_to_frequency(0.0) && f < cv_to_frequency(1.0 / 12.0));
    }

    #[test]
    fn midi_note_rounds_and_clamps() {
        assert_eq!(cv_to_midi_note(0.0), 60);
        assert_eq!(cv_to_midi_note(1.0), 72);
        assert_eq!(cv_to_midi_note(0.04), 60);
        assert_eq!(cv_to_midi_note(0.05), 61);
        assert_eq!(cv_to_midi_note(-10.0), 0);
        assert_eq!(cv_to_midi_note(10.0), 127);
    }

    #[test]
    fn accent_selects_velocity() {
        assert_eq!(accent_velocity(Some(3.0)), 127);
        assert_eq!(accent_velocity(Some(2.5)), 80);
        assert_eq!(accent_velocity(None), 80);
    }

    #[test]
    fn accent_gain_maps_above_threshold() {
        assert_eq!(accent_gain(0.0), 0.0);
        assert_eq!(accent_gain(2.5), 0.0);
        assert_relative_eq!(accent_gain(3.75), 0.25);
        assert_eq!(accent_gain(5.0), 0.5);
        assert_eq!(accent_gain(9.0), 0.5);
    }
}
