use squelch_pool::{Pool, PoolError};

/// Call contract of the synthesis engine a [`Voice`](crate::Voice) drives.
///
/// The engine itself (oscillator, filter, envelopes) lives outside this
/// crate. Setters may be called at control rate from the audio callback and
/// must not allocate there.
pub trait SynthEngine {
    /// Filter cutoff in Hz.
    fn set_cutoff(&mut self, hz: f32);
    /// Filter resonance, 0–100.
    fn set_resonance(&mut self, percent: f32);
    /// Envelope-to-cutoff depth, 0–100.
    fn set_env_mod(&mut self, percent: f32);
    /// Filter envelope decay in ms.
    fn set_decay(&mut self, ms: f32);
    /// Accent depth, 0–100.
    fn set_accent(&mut self, percent: f32);
    /// Saw/square blend, 0–1.
    fn set_waveform(&mut self, blend: f32);
    /// Output level in dB.
    fn set_volume(&mut self, db: f32);
    /// Portamento time in ms.
    fn set_slide_time(&mut self, ms: f32);
    /// Oversampling factor: 1, 2 or 4.
    fn set_oversampling(&mut self, factor: u32);

    /// Start a note; velocity 0 releases `note`.
    fn note_on(&mut self, note: u8, velocity: u8);
    /// Release everything, whatever the engine believes is playing.
    fn all_notes_off(&mut self);
    /// Pitch offset in semitones.
    fn set_pitch_bend(&mut self, semitones: f32);
    /// Override the oscillator frequency directly, in Hz.
    fn set_oscillator_frequency(&mut self, hz: f32);
    /// Extra accent level driven by CV, 0–1.
    fn set_accent_gain(&mut self, gain: f32);

    /// Render and return the next output sample.
    fn next_sample(&mut self) -> f32;
    /// Host sample rate in Hz.
    fn set_sample_rate(&mut self, hz: f32);

    /// Take setup-time buffers from the instance pool.
    ///
    /// Called once, before any other method. Engines without dynamic
    /// buffers keep the default.
    fn setup(&mut self, _pool: &mut Pool<'_>) -> Result<(), PoolError> {
        Ok(())
    }
}
