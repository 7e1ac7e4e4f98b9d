use heapless::Vec;
use squelch::parameter_values::{ParameterStore, ParameterValues};
use squelch::takeover::{ControlEdit, SoftTakeover, TakeoverConfig, UiSnapshot, MAX_EDITS, POT_COUNT};
use squelch_pool::Pool;

use crate::arbiter::{CvFrame, InputArbiter};
use crate::draw::{DrawState, OVERVIEW_PARAMS};
use crate::engine::SynthEngine;
use crate::error::VoiceError;
use crate::midi::MidiChannelFilter;
use crate::params::{control_layout, oversampling_factor, OutputMode, ParamId, PitchMode, PARAMETERS, PARAM_COUNT};
use crate::smoother::{ControlSmoother, SmoothedTargets};

/// Gain applied to every engine sample before it reaches the bus.
pub const OUTPUT_GAIN: f32 = 5.0;

/// Offset of host bus `bus` (1-based) in a flat buffer of `bus_len` samples
/// holding `frames` samples per bus.
///
/// Returns `None` for bus 0 (disconnected) and for buses that do not fit in
/// the buffer.
pub fn bus_offset(bus: i32, frames: usize, bus_len: usize) -> Option<usize> {
    let index = usize::try_from(bus).ok()?.checked_sub(1)?;
    let offset = index.checked_mul(frames)?;
    if offset.checked_add(frames)? > bus_len {
        return None;
    }
    Some(offset)
}

/// One plugin instance: the parameter store, the control surface, the
/// input arbiter and the engine they drive.
///
/// The host calls [`step`](Self::step) and [`midi_message`](Self::midi_message)
/// from the audio context, and [`setup_ui`](Self::setup_ui),
/// [`custom_ui`](Self::custom_ui) and [`draw_state`](Self::draw_state) from
/// the UI context.
pub struct Voice<'a, E: SynthEngine> {
    engine: E,
    pool: Pool<'a>,
    params: ParameterValues<PARAM_COUNT>,
    takeover: SoftTakeover,
    arbiter: InputArbiter,
    smoother: ControlSmoother,
    sample_rate: f32,
    recall_seen: u32,
    overview: [i32; 3],
}

impl<'a, E: SynthEngine> Voice<'a, E> {
    /// Build an instance on top of `memory` and bring `engine` to the
    /// default parameter state.
    ///
    /// The engine takes its buffers from `memory` first; if they do not fit,
    /// construction fails with [`VoiceError::Pool`].
    pub fn new(mut engine: E, memory: &'a mut [u8], sample_rate: f32) -> Result<Self, VoiceError> {
        let mut pool = Pool::new(memory);
        engine.setup(&mut pool)?;
        engine.set_sample_rate(sample_rate);

        let params = ParameterValues::new(&PARAMETERS);
        let mut takeover = SoftTakeover::new(control_layout()?, TakeoverConfig::default());
        takeover.setup(&params);

        let targets = smoothed_targets(&params);
        let pitch_mode = PitchMode::from_value(params.parameter(ParamId::PitchMode.index()));
        let overview = OVERVIEW_PARAMS.map(|id| params.parameter(id.index()));
        let mut voice = Self {
            engine,
            pool,
            recall_seen: params.recall_count(),
            params,
            takeover,
            arbiter: InputArbiter::new(pitch_mode),
            smoother: ControlSmoother::new(targets),
            sample_rate,
            overview,
        };

        voice.engine.set_cutoff(targets.cutoff);
        voice.engine.set_resonance(targets.resonance);
        voice.engine.set_decay(targets.decay);
        for id in ParamId::ALL {
            voice.parameter_changed(id);
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Voice ready at {} Hz, pool {}/{} bytes used",
            sample_rate,
            voice.pool.used(),
            voice.pool.capacity()
        );

        Ok(voice)
    }

    // ── Audio context ────────────────────────────────────────────────

    /// Render one block of `frames` samples into `bus`.
    ///
    /// Bus `n` occupies `bus[(n - 1) * frames..n * frames]`. CV inputs set
    /// to bus 0, or to a bus outside `bus`, are skipped. If the output bus
    /// does not fit, the block is left untouched.
    pub fn step(&mut self, bus: &mut [f32], frames: usize, sample_rate: f32) {
        if sample_rate != self.sample_rate {
            self.engine.set_sample_rate(sample_rate);
            self.sample_rate = sample_rate;

            #[cfg(feature = "defmt")]
            defmt::debug!("Sample rate changed to {} Hz", sample_rate);
        }

        for change in self.params.take_engine_changes() {
            if let Some(id) = ParamId::from_index(change.index) {
                self.parameter_changed(id);
            }
        }

        let route = |id: ParamId| bus_offset(self.params.parameter(id.index()), frames, bus.len());
        let Some(out) = route(ParamId::Output) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("Output bus outside the {}-sample buffer", bus.len());
            return;
        };
        let pitch = route(ParamId::PitchCv);
        let gate = route(ParamId::Gate);
        let accent = route(ParamId::AccentCv);

        let mode = OutputMode::from_value(self.params.parameter(ParamId::OutputMode.index()));
        let targets = smoothed_targets(&self.params);

        for i in 0..frames {
            self.smoother.process(targets, &mut self.engine);

            let frame = CvFrame {
                pitch: pitch.map(|offset| bus[offset + i]),
                gate: gate.map(|offset| bus[offset + i]),
                accent: accent.map(|offset| bus[offset + i]),
            };
            self.arbiter.process_cv(frame, &mut self.engine);

            let sample = self.engine.next_sample() * OUTPUT_GAIN;
            let slot = &mut bus[out + i];
            match mode {
                OutputMode::Replace => *slot = sample,
                OutputMode::Add => *slot += sample,
            }
        }
    }

    /// Handle one incoming MIDI message. Returns `false` if it was filtered
    /// out or ignored.
    pub fn midi_message(&mut self, status: u8, data1: u8, data2: u8) -> bool {
        let filter = MidiChannelFilter::from_param(self.params.parameter(ParamId::MidiChannel.index()));
        self.arbiter
            .process_midi(status, data1, data2, filter, &mut self.engine)
    }

    // ── UI context ───────────────────────────────────────────────────

    /// Seed the pot channels from the stored values and return the pot
    /// positions they imply.
    pub fn setup_ui(&mut self) -> [f32; POT_COUNT] {
        self.recall_seen = self.params.recall_count();
        self.takeover.setup(&self.params)
    }

    /// Run one UI poll. A preset recall since the previous poll re-seeds
    /// the pot channels first; the overview picks up every store change
    /// afterwards.
    pub fn custom_ui(&mut self, ui: &UiSnapshot) -> Vec<ControlEdit, MAX_EDITS> {
        if self.params.recall_count() != self.recall_seen {
            self.setup_ui();
        }
        let edits = self.takeover.poll(ui, &mut self.params);
        self.refresh_overview();
        edits
    }

    /// Drain the store's display changes into the overview columns.
    ///
    /// Returns `true` if an overview value changed and the frame needs a
    /// redraw.
    pub fn refresh_overview(&mut self) -> bool {
        let mut redraw = false;
        for change in self.params.take_display_changes() {
            let column = OVERVIEW_PARAMS
                .iter()
                .position(|id| id.index() == change.index);
            if let Some(column) = column {
                redraw |= self.overview[column] != change.value;
                self.overview[column] = change.value;
            }
        }
        redraw
    }

    /// What the draw callback should show this frame.
    ///
    /// The overview shows the values as of the last
    /// [`refresh_overview`](Self::refresh_overview).
    pub fn draw_state(&self) -> DrawState {
        if let Some(state) = self.takeover.active_display().and_then(DrawState::active) {
            return state;
        }
        DrawState::overview(self.overview)
    }

    // ── Parameters ───────────────────────────────────────────────────

    /// Current stored value of `id`.
    pub fn parameter(&self, id: ParamId) -> i32 {
        self.params.parameter(id.index())
    }

    /// Write `id`, clamped to its range. The engine sees the change on the
    /// next [`step`](Self::step).
    pub fn set_parameter(&mut self, id: ParamId, value: i32) {
        self.params.set_parameter(id.index(), value);
    }

    /// Replace every stored value from a preset.
    pub fn restore_preset(&mut self, values: &[i32]) -> Result<(), VoiceError> {
        self.params.restore(values)?;
        Ok(())
    }

    /// The whole parameter store.
    pub fn parameters(&self) -> &ParameterValues<PARAM_COUNT> {
        &self.params
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The synthesis engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the synthesis engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Gate and note arbitration state.
    pub fn arbiter(&self) -> &InputArbiter {
        &self.arbiter
    }

    /// Pot and encoder takeover state.
    pub fn takeover(&self) -> &SoftTakeover {
        &self.takeover
    }

    /// Smoothed cutoff, resonance and decay.
    pub fn smoother(&self) -> &ControlSmoother {
        &self.smoother
    }

    /// Memory pool the engine was set up from.
    pub fn pool(&self) -> &Pool<'a> {
        &self.pool
    }

    /// Sample rate of the last block, in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Forward a stored parameter to the engine. Smoothed parameters and
    /// routing are read every block instead.
    fn parameter_changed(&mut self, id: ParamId) {
        let value = self.params.parameter(id.index());
        match id {
            ParamId::EnvMod => self.engine.set_env_mod(value as f32),
            ParamId::Accent => self.engine.set_accent(value as f32),
            ParamId::Waveform => self.engine.set_waveform(value as f32 / 100.0),
            ParamId::Volume => self.engine.set_volume(value as f32),
            ParamId::SlideTime => self.engine.set_slide_time(value as f32),
            ParamId::Oversampling => self.engine.set_oversampling(oversampling_factor(value)),
            ParamId::PitchMode => self.arbiter.set_pitch_mode(PitchMode::from_value(value)),
            ParamId::Output
            | ParamId::OutputMode
            | ParamId::Cutoff
            | ParamId::Resonance
            | ParamId::Decay
            | ParamId::MidiChannel
            | ParamId::PitchCv
            | ParamId::Gate
            | ParamId::AccentCv => {}
        }
    }
}

fn smoothed_targets(params: &impl ParameterStore) -> SmoothedTargets {
    SmoothedTargets {
        cutoff: params.parameter(ParamId::Cutoff.index()) as f32,
        resonance: params.parameter(ParamId::Resonance.index()) as f32,
        decay: params.parameter(ParamId::Decay.index()) as f32,
    }
}
