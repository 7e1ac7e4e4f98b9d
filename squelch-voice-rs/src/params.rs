//! Parameter table of the voice and the default control-surface layout.

use core::fmt::{self, Write};

use squelch::parameter_values::ParameterSpec;
use squelch::takeover::{
    ControlLayout, EncoderBinding, PotBinding, PotLayout, ScalingError, ScalingRule,
};

/// Number of entries in [`PARAMETERS`].
pub const PARAM_COUNT: usize = 16;

/// Highest host bus index a CV input or the output can select.
pub const BUS_COUNT: i32 = 28;

/// Oversampling factor for each value of [`ParamId::Oversampling`].
pub const OVERSAMPLING_FACTORS: [u32; 3] = [1, 2, 4];

/// Index of every parameter in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamId {
    /// Output bus, 1-based.
    Output,
    /// Add to or replace the output bus.
    OutputMode,
    /// Filter cutoff in Hz.
    Cutoff,
    /// Filter resonance in percent.
    Resonance,
    /// Envelope to cutoff amount in percent.
    EnvMod,
    /// Envelope decay in ms.
    Decay,
    /// Accent depth in percent.
    Accent,
    /// Saw to square blend in percent.
    Waveform,
    /// Output level in dB.
    Volume,
    /// Glide time in ms.
    SlideTime,
    /// Index into [`OVERSAMPLING_FACTORS`].
    Oversampling,
    /// MIDI channel, 0 for omni.
    MidiChannel,
    /// Pitch CV input bus, 0 when disconnected.
    PitchCv,
    /// Gate input bus, 0 when disconnected.
    Gate,
    /// Accent CV input bus, 0 when disconnected.
    AccentCv,
    /// Continuous or quantized pitch CV.
    PitchMode,
}

impl ParamId {
    /// All parameters in table order.
    pub const ALL: [ParamId; PARAM_COUNT] = [
        ParamId::Output,
        ParamId::OutputMode,
        ParamId::Cutoff,
        ParamId::Resonance,
        ParamId::EnvMod,
        ParamId::Decay,
        ParamId::Accent,
        ParamId::Waveform,
        ParamId::Volume,
        ParamId::SlideTime,
        ParamId::Oversampling,
        ParamId::MidiChannel,
        ParamId::PitchCv,
        ParamId::Gate,
        ParamId::AccentCv,
        ParamId::PitchMode,
    ];

    /// Store index of this parameter.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parameter at store index `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Static description from [`PARAMETERS`].
    pub fn spec(self) -> &'static ParameterSpec {
        &PARAMETERS[self.index()]
    }

    /// Unit suffix shown after the value.
    pub fn unit(self) -> &'static str {
        match self {
            ParamId::Cutoff => "Hz",
            ParamId::Resonance | ParamId::EnvMod | ParamId::Accent | ParamId::Waveform => "%",
            ParamId::Decay | ParamId::SlideTime => "ms",
            ParamId::Volume => "dB",
            _ => "",
        }
    }
}

/// Name, range and default of every parameter, indexed by [`ParamId`].
pub static PARAMETERS: [ParameterSpec; PARAM_COUNT] = [
    ParameterSpec::new("Output", 1, BUS_COUNT, 13),
    ParameterSpec::new("Output mode", 0, 1, 0),
    ParameterSpec::new("Cutoff", 20, 20000, 1000),
    ParameterSpec::new("Resonance", 0, 100, 50),
    ParameterSpec::new("Env Mod", 0, 100, 25),
    ParameterSpec::new("Decay", 30, 3000, 300),
    ParameterSpec::new("Accent", 0, 100, 50),
    ParameterSpec::new("Waveform", 0, 100, 0),
    ParameterSpec::new("Volume", -40, 6, -12),
    ParameterSpec::new("Slide Time", 1, 200, 60),
    ParameterSpec::new("Oversample", 0, 2, 1),
    ParameterSpec::new("MIDI Ch", 0, 16, 0),
    ParameterSpec::new("Pitch CV", 0, BUS_COUNT, 0),
    ParameterSpec::new("Gate", 0, BUS_COUNT, 0),
    ParameterSpec::new("Accent CV", 0, BUS_COUNT, 0),
    ParameterSpec::new("Pitch Mode", 0, 1, 0),
];

// ── Enumerated parameters ────────────────────────────────────────────

/// How a block's output is combined with what is already on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputMode {
    /// Mix into what is already on the bus.
    Add,
    /// Overwrite the bus.
    Replace,
}

impl OutputMode {
    /// Decode the stored `Output mode` value.
    pub fn from_value(value: i32) -> Self {
        if value == 0 {
            OutputMode::Add
        } else {
            OutputMode::Replace
        }
    }
}

/// How pitch CV reaches the oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PitchMode {
    /// Frequency follows the CV every sample (glide comes from the CV).
    #[default]
    Continuous,
    /// CV is rounded to a MIDI note; a new note-on fires on every change.
    Quantized,
}

impl PitchMode {
    /// Decode the stored `Pitch Mode` value.
    pub fn from_value(value: i32) -> Self {
        if value == 0 {
            PitchMode::Continuous
        } else {
            PitchMode::Quantized
        }
    }
}

/// Oversampling factor for the stored enum value, clamped to the table.
pub fn oversampling_factor(value: i32) -> u32 {
    OVERSAMPLING_FACTORS[value.clamp(0, OVERSAMPLING_FACTORS.len() as i32 - 1) as usize]
}

/// Write `value` the way the display shows it: enum parameters by name,
/// everything else as an integer followed by its unit.
pub fn write_value<W: Write>(out: &mut W, id: ParamId, value: i32) -> fmt::Result {
    match id {
        ParamId::OutputMode => out.write_str(match OutputMode::from_value(value) {
            OutputMode::Add => "Add",
            OutputMode::Replace => "Replace",
        }),
        ParamId::PitchMode => out.write_str(match PitchMode::from_value(value) {
            PitchMode::Continuous => "Cont",
            PitchMode::Quantized => "Quant",
        }),
        ParamId::Oversampling => write!(out, "{}x", oversampling_factor(value)),
        ParamId::MidiChannel if value == 0 => out.write_str("Omni"),
        ParamId::PitchCv | ParamId::Gate | ParamId::AccentCv if value == 0 => {
            out.write_str("None")
        }
        _ => write!(out, "{}{}", value, id.unit()),
    }
}

// ── Control layout ───────────────────────────────────────────────────

/// The panel mapping the voice ships with.
///
/// | Control       | Primary                | Alt (button held) |
/// |---------------|------------------------|-------------------|
/// | Left pot      | Cutoff (exponential)   | Env Mod           |
/// | Centre pot    | Resonance              | Accent            |
/// | Right pot     | Decay                  | Slide Time        |
/// | Left encoder  | Waveform, 1 % per step |                   |
/// | Right encoder | Volume, 1 dB per step  |                   |
pub fn control_layout() -> Result<ControlLayout, ScalingError> {
    let percent = ScalingRule::linear(0.0, 100.0)?;
    let pot = |primary: ParamId, primary_rule: ScalingRule, alt: ParamId, alt_rule: ScalingRule| PotLayout {
        primary: PotBinding {
            param: primary.index(),
            rule: primary_rule,
        },
        alt: PotBinding {
            param: alt.index(),
            rule: alt_rule,
        },
    };

    Ok(ControlLayout {
        pots: [
            pot(
                ParamId::Cutoff,
                ScalingRule::exponential(20.0, 1000.0)?,
                ParamId::EnvMod,
                percent,
            ),
            pot(ParamId::Resonance, percent, ParamId::Accent, percent),
            pot(
                ParamId::Decay,
                ScalingRule::linear(30.0, 3000.0)?,
                ParamId::SlideTime,
                ScalingRule::linear(1.0, 200.0)?,
            ),
        ],
        encoders: [
            Some(encoder(ParamId::Waveform, 1)),
            Some(encoder(ParamId::Volume, 1)),
        ],
    })
}

fn encoder(id: ParamId, step: i32) -> EncoderBinding {
    let spec = id.spec();
    EncoderBinding {
        param: id.index(),
        min: spec.min,
        max: spec.max,
        step,
    }
}
