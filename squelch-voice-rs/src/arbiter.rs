//! Per-sample note arbitration between CV/gate and MIDI.
//!
//! The voice is monophonic and both sources drive the same engine. Neither
//! source locks the other out:
//!
//! - A rising gate starts a note (accent CV picks the velocity).
//! - While the gate is high, pitch CV steers the oscillator: directly as a
//!   frequency in [`PitchMode::Continuous`], or through a fresh note-on
//!   whenever the rounded note changes in [`PitchMode::Quantized`].
//! - A falling gate always sends all-notes-off, even if the tracked note
//!   has drifted from what the engine thinks is playing.
//! - MIDI notes go straight to the engine; legato between overlapping MIDI
//!   notes is the engine's business.

use crate::engine::SynthEngine;
use crate::gate::{GateEdge, SchmittTrigger};
use crate::midi::{bend_semitones, MidiChannelFilter, MidiMessage, CC_ALL_NOTES_OFF, CC_ALL_SOUND_OFF};
use crate::params::PitchMode;
use crate::pitch::{accent_gain, accent_velocity, cv_to_frequency, cv_to_midi_note, CV_ZERO_NOTE};

/// Which input started the note that is currently sounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NoteSource {
    /// Nothing is sounding.
    #[default]
    None,
    /// Started by a rising gate or a quantized pitch change.
    Cv,
    /// Started by a MIDI note-on.
    Midi,
}

/// Arbitration state, touched only by the audio path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GateArbitrationState {
    /// Gate level after the previous sample.
    pub previous_gate_high: bool,
    /// Last note sent to the engine by either source.
    pub current_note: Option<u8>,
    /// MIDI note currently held down.
    pub held_note: Option<u8>,
    /// Input that owns `current_note`.
    pub note_source: NoteSource,
}

impl GateArbitrationState {
    fn release_all(&mut self) {
        self.current_note = None;
        self.held_note = None;
        self.note_source = NoteSource::None;
    }
}

/// One sample of the CV inputs. `None` marks a disconnected input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CvFrame {
    /// Pitch CV in volts, 1V/oct around middle C.
    pub pitch: Option<f32>,
    /// Gate level in volts.
    pub gate: Option<f32>,
    /// Accent CV in volts.
    pub accent: Option<f32>,
}

/// Gate detector plus note arbitration for one voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputArbiter {
    gate: SchmittTrigger,
    state: GateArbitrationState,
    pitch_mode: PitchMode,
}

impl InputArbiter {
    /// Idle arbiter with the gate low and nothing sounding.
    pub fn new(pitch_mode: PitchMode) -> Self {
        Self {
            pitch_mode,
            ..Self::default()
        }
    }

    /// How pitch CV is applied while the gate is high.
    pub fn pitch_mode(&self) -> PitchMode {
        self.pitch_mode
    }

    /// Switch pitch handling. Takes effect on the next sample.
    pub fn set_pitch_mode(&mut self, mode: PitchMode) {
        self.pitch_mode = mode;
    }

    /// Current note tracking.
    pub fn state(&self) -> &GateArbitrationState {
        &self.state
    }

    /// Debounced gate level after the last sample.
    pub fn gate_high(&self) -> bool {
        self.gate.is_high()
    }

    // ── CV path ──────────────────────────────────────────────────────

    /// Process one audio sample of CV input.
    ///
    /// Nothing happens while the gate input is disconnected.
    pub fn process_cv<E: SynthEngine>(&mut self, frame: CvFrame, engine: &mut E) {
        let Some(level) = frame.gate else {
            return;
        };
        let edge = self.gate.process(level);
        let high = self.gate.is_high();

        if edge == Some(GateEdge::Rising) {
            let note = match (self.pitch_mode, frame.pitch) {
                (PitchMode::Quantized, Some(cv)) => cv_to_midi_note(cv),
                _ => CV_ZERO_NOTE,
            };
            engine.note_on(note, accent_velocity(frame.accent));
            self.state.current_note = Some(note);
            self.state.note_source = NoteSource::Cv;
        }

        if high {
            if let Some(cv) = frame.pitch {
                match self.pitch_mode {
                    PitchMode::Continuous => engine.set_oscillator_frequency(cv_to_frequency(cv)),
                    PitchMode::Quantized => {
                        let note = cv_to_midi_note(cv);
                        if self.state.current_note != Some(note) {
                            engine.note_on(note, accent_velocity(frame.accent));
                            self.state.current_note = Some(note);
                            self.state.note_source = NoteSource::Cv;
                        }
                    }
                }
            }
            if let Some(cv) = frame.accent {
                engine.set_accent_gain(accent_gain(cv));
            }
        }

        if edge == Some(GateEdge::Falling) {
            engine.all_notes_off();
            self.state.release_all();
        }

        self.state.previous_gate_high = high;
    }

    // ── MIDI path ────────────────────────────────────────────────────

    /// Handle one incoming MIDI triple. Returns `false` if the message was
    /// filtered out or is not one the voice responds to.
    pub fn process_midi<E: SynthEngine>(
        &mut self,
        status: u8,
        data1: u8,
        data2: u8,
        filter: MidiChannelFilter,
        engine: &mut E,
    ) -> bool {
        let Some(message) = MidiMessage::parse(status, data1, data2) else {
            return false;
        };
        if !filter.accepts(message.channel()) {
            return false;
        }

        match message {
            MidiMessage::NoteOn { note, velocity, .. } if velocity > 0 => {
                engine.note_on(note, velocity);
                self.state.held_note = Some(note);
                self.state.current_note = Some(note);
                self.state.note_source = NoteSource::Midi;
            }
            MidiMessage::NoteOn { note, .. } | MidiMessage::NoteOff { note, .. } => {
                engine.note_on(note, 0);
                if self.state.held_note == Some(note) {
                    self.state.held_note = None;
                    if self.state.note_source == NoteSource::Midi {
                        self.state.current_note = None;
                        self.state.note_source = NoteSource::None;
                    }
                }
            }
            MidiMessage::ControlChange { controller, .. }
                if controller == CC_ALL_SOUND_OFF || controller == CC_ALL_NOTES_OFF =>
            {
                engine.all_notes_off();
                self.state.release_all();
            }
            MidiMessage::ControlChange { .. } => return false,
            MidiMessage::PitchBend { value, .. } => engine.set_pitch_bend(bend_semitones(value)),
        }
        true
    }
}
