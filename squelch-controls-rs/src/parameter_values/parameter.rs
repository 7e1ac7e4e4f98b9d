/// Static description of one parameter slot: display name, range, default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterSpec {
    /// Display name, shown by the transient single-parameter view.
    pub name: &'static str,
    /// Minimum allowed value (inclusive).
    pub min: i32,
    /// Maximum allowed value (inclusive).
    pub max: i32,
    /// Value on construction and after [`reset_to_defaults`](super::ParameterValues::reset_to_defaults).
    pub default: i32,
}

impl ParameterSpec {
    /// Shorthand used to build parameter tables.
    pub const fn new(name: &'static str, min: i32, max: i32, default: i32) -> Self {
        Self {
            name,
            min,
            max,
            default,
        }
    }
}

/// Individual synthesizer parameter with value, range, and change tracking.
///
/// Each parameter has a clamped value range and two independent change flags
/// for the synthesis engine and display consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Parameter {
    /// Current parameter value, always within `[min_value, max_value]`.
    pub value: i32,
    /// Minimum allowed value (inclusive).
    pub min_value: i32,
    /// Maximum allowed value (inclusive).
    pub max_value: i32,
    /// The audio path has not yet forwarded this value to the engine.
    pub changed_engine: bool,
    /// The display has not yet picked up this value.
    pub changed_display: bool,
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            value: 0,
            min_value: 0,
            max_value: 127,
            changed_engine: false,
            changed_display: false,
        }
    }
}

impl Parameter {
    /// Build a parameter at its default value with no pending changes.
    pub fn from_spec(spec: &ParameterSpec) -> Self {
        Self {
            value: spec.default.clamp(spec.min, spec.max),
            min_value: spec.min,
            max_value: spec.max,
            changed_engine: false,
            changed_display: false,
        }
    }

    /// Store a new value, clamped to `[min_value, max_value]`.
    ///
    /// Both change flags are set even when the clamped value equals the old
    /// one; consumers treat a flag as "re-send", not "differs".
    pub fn set_value(&mut self, v: i32) {
        self.value = v.clamp(self.min_value, self.max_value);
        self.changed_engine = true;
        self.changed_display = true;
    }
}
