//! Snapshot of what the draw callback should show.
//!
//! This module only decides *what* goes on screen: the transient
//! single-parameter view while an edit is fresh, otherwise the three-column
//! overview. Text is pre-formatted into fixed-capacity strings so the
//! host's renderer never formats anything itself.

use heapless::String;
use squelch::takeover::ActiveDisplay;

use crate::params::{write_value, ParamId};

/// Capacity of a formatted value, e.g. `"-40dB"` or `"20000Hz"`.
pub const VALUE_CAPACITY: usize = 12;

/// Title drawn above the overview.
pub const TITLE: &str = "SQUELCH";

/// Parameters shown by the overview, left to right.
pub const OVERVIEW_PARAMS: [ParamId; 3] = [ParamId::Cutoff, ParamId::Resonance, ParamId::Decay];

/// One labelled value on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readout {
    /// Parameter name.
    pub label: &'static str,
    /// Value with its unit, e.g. `"1000Hz"`.
    pub value: String<VALUE_CAPACITY>,
}

impl Readout {
    /// Format `value` for parameter `id`. Values too long for the buffer
    /// are truncated.
    pub fn new(label: &'static str, id: ParamId, value: i32) -> Self {
        let mut text = String::new();
        let _ = write_value(&mut text, id, value);
        Self { label, value: text }
    }
}

/// What one frame shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawState {
    /// Default view: title and three columns.
    Overview {
        title: &'static str,
        columns: [Readout; 3],
    },
    /// A single parameter, shown after an edit until its countdown ends.
    Active(Readout),
}

impl DrawState {
    /// Overview of the stored cutoff, resonance and decay.
    pub fn overview(values: [i32; 3]) -> Self {
        const LABELS: [&str; 3] = ["CUT", "RES", "DEC"];
        DrawState::Overview {
            title: TITLE,
            columns: core::array::from_fn(|i| Readout::new(LABELS[i], OVERVIEW_PARAMS[i], values[i])),
        }
    }

    /// Single-parameter view for an active edit. Returns `None` if the edit
    /// is not for a known parameter.
    pub fn active(display: &ActiveDisplay) -> Option<Self> {
        let id = ParamId::from_index(display.param)?;
        Some(DrawState::Active(Readout::new(id.spec().name, id, display.value)))
    }

    /// Whether this is the transient view.
    pub fn is_active(&self) -> bool {
        matches!(self, DrawState::Active(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_formats_three_columns() {
        let DrawState::Overview { title, columns } = DrawState::overview([1000, 50, 300]) else {
            panic!("expected overview");
        };
        assert_eq!(title, "SQUELCH");
        assert_eq!(columns[0].label, "CUT");
        assert_eq!(columns[0].value, "1000Hz");
        assert_eq!(columns[1].value, "50%");
        assert_eq!(columns[2].label, "DEC");
        assert_eq!(columns[2].value, "300ms");
    }

    #[test]
    fn active_view_names_the_parameter() {
        let display = ActiveDisplay::new(ParamId::Volume.index(), -7, 100);
        let state = DrawState::active(&display).unwrap();
        assert!(state.is_active());

        let mut value = String::new();
        value.push_str("-7dB").unwrap();
        assert_eq!(state, DrawState::Active(Readout { label: "Volume", value }));
    }

    #[test]
    fn unknown_parameter_has_no_view() {
        let display = ActiveDisplay::new(99, 0, 100);
        assert_eq!(DrawState::active(&display), None);
    }

    #[test]
    fn long_values_are_truncated_not_dropped() {
        let readout = Readout::new("X", ParamId::Cutoff, i32::MIN);
        assert!(!readout.value.is_empty());
        assert!(readout.value.len() <= VALUE_CAPACITY);
    }
}
