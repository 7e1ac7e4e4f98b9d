/// Level a low gate must exceed to go high.
pub const GATE_HIGH: f32 = 1.5;

/// Level a high gate must fall below to go low.
pub const GATE_LOW: f32 = 1.0;

/// A gate transition reported by [`SchmittTrigger::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateEdge {
    /// Low to high.
    Rising,
    /// High to low.
    Falling,
}

/// Gate detector with separate rising and falling thresholds.
///
/// A low gate goes high only above [`GATE_HIGH`]; a high gate stays high
/// until the level drops below [`GATE_LOW`]. Noise between the two levels
/// never produces an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SchmittTrigger {
    high: bool,
}

impl SchmittTrigger {
    /// Start with the gate low.
    pub const fn new() -> Self {
        Self { high: false }
    }

    /// Feed one sample; returns the edge it caused, if any.
    pub fn process(&mut self, level: f32) -> Option<GateEdge> {
        let high = if self.high {
            level >= GATE_LOW
        } else {
            level > GATE_HIGH
        };

        let edge = match (self.high, high) {
            (false, true) => Some(GateEdge::Rising),
            (true, false) => Some(GateEdge::Falling),
            _ => None,
        };
        self.high = high;
        edge
    }

    /// Gate state after the last sample.
    pub fn is_high(&self) -> bool {
        self.high
    }

    /// Force the gate low without reporting an edge.
    pub fn reset(&mut self) {
        self.high = false;
    }
}
