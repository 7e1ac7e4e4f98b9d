//! Decoding of the channel-voice messages the voice responds to.

/// Controller number of "All Sound Off".
pub const CC_ALL_SOUND_OFF: u8 = 120;

/// Controller number of "All Notes Off".
pub const CC_ALL_NOTES_OFF: u8 = 123;

/// Pitch-bend range at full deflection, in semitones.
pub const BEND_RANGE_SEMITONES: f32 = 2.0;

const BEND_CENTRE: i16 = 8192;

/// A decoded MIDI channel-voice message. Channels are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MidiMessage {
    /// `0x9n`. Velocity 0 is a release.
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// `0x8n`.
    NoteOff { channel: u8, note: u8, velocity: u8 },
    /// `0xBn`.
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// Signed bend amount, `-8192..=8191`.
    PitchBend { channel: u8, value: i16 },
}

impl MidiMessage {
    /// Decode one status/data triple. Returns `None` for message types the
    /// voice ignores.
    ///
    /// ```
    /// use squelch_voice::midi::MidiMessage;
    ///
    /// assert_eq!(
    ///     MidiMessage::parse(0x93, 60, 100),
    ///     Some(MidiMessage::NoteOn { channel: 3, note: 60, velocity: 100 })
    /// );
    /// assert_eq!(MidiMessage::parse(0xC0, 5, 0), None);
    /// ```
    pub fn parse(status: u8, data1: u8, data2: u8) -> Option<Self> {
        let channel = status & 0x0F;
        let (data1, data2) = (data1 & 0x7F, data2 & 0x7F);

        match status & 0xF0 {
            0x90 => Some(MidiMessage::NoteOn {
                channel,
                note: data1,
                velocity: data2,
            }),
            0x80 => Some(MidiMessage::NoteOff {
                channel,
                note: data1,
                velocity: data2,
            }),
            0xB0 => Some(MidiMessage::ControlChange {
                channel,
                controller: data1,
                value: data2,
            }),
            0xE0 => Some(MidiMessage::PitchBend {
                channel,
                value: ((i16::from(data2) << 7) | i16::from(data1)) - BEND_CENTRE,
            }),
            _ => None,
        }
    }

    /// Zero-based channel the message was sent on.
    pub fn channel(&self) -> u8 {
        match *self {
            MidiMessage::NoteOn { channel, .. }
            | MidiMessage::NoteOff { channel, .. }
            | MidiMessage::ControlChange { channel, .. }
            | MidiMessage::PitchBend { channel, .. } => channel,
        }
    }
}

/// Pitch-bend amount in semitones.
pub fn bend_semitones(value: i16) -> f32 {
    f32::from(value) * BEND_RANGE_SEMITONES / f32::from(BEND_CENTRE)
}

/// Which incoming channels reach the voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MidiChannelFilter {
    /// Every channel.
    #[default]
    Omni,
    /// Only this zero-based channel.
    Channel(u8),
}

impl MidiChannelFilter {
    /// Filter for the stored MIDI channel parameter: 0 is omni, 1–16 pick a
    /// channel.
    pub fn from_param(value: i32) -> Self {
        if value <= 0 {
            MidiChannelFilter::Omni
        } else {
            MidiChannelFilter::Channel((value - 1).min(15) as u8)
        }
    }

    /// Whether a message on zero-based `channel` passes.
    pub fn accepts(&self, channel: u8) -> bool {
        match *self {
            MidiChannelFilter::Omni => true,
            MidiChannelFilter::Channel(c) => c == channel,
        }
    }
}
