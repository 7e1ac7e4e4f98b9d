use heapless::Vec;

use super::error::ParameterError;
use super::parameter::{Parameter, ParameterSpec};
use super::store::ParameterStore;

/// Describes a single parameter change, returned by the change consumption methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterChange {
    /// Static display name of the parameter (from its [`ParameterSpec`]).
    pub name: &'static str,
    /// Index of the parameter in the table.
    pub index: usize,
    /// Current value after the change.
    pub value: i32,
}

/// Main parameter storage.
///
/// Holds one [`Parameter`] per entry of a static [`ParameterSpec`] table,
/// tracks change flags for the engine and display consumers, and counts
/// preset recalls so the control surface can resynchronise.
///
/// # Initialization
///
/// [`ParameterValues::new()`] builds every slot at its table default with no
/// pending change flags.
///
/// # Examples
///
/// ```
/// use squelch::parameter_values::{ParameterSpec, ParameterValues};
///
/// static TABLE: [ParameterSpec; 2] = [
///     ParameterSpec::new("Cutoff", 20, 20000, 1000),
///     ParameterSpec::new("Resonance", 0, 100, 50),
/// ];
///
/// let mut pv = ParameterValues::new(&TABLE);
/// pv.set_value(1, 150).unwrap();
/// assert_eq!(pv.value(1), Some(100)); // clamped
///
/// let changes = pv.take_display_changes();
/// assert_eq!(changes.len(), 1);
/// assert_eq!(changes[0].name, "Resonance");
/// ```
pub struct ParameterValues<const N: usize> {
    specs: &'static [ParameterSpec; N],
    params: [Parameter; N],
    recall_count: u32,
}

impl<const N: usize> ParameterValues<N> {
    /// Create a store with every slot at its table default.
    pub fn new(specs: &'static [ParameterSpec; N]) -> Self {
        Self {
            specs,
            params: core::array::from_fn(|i| Parameter::from_spec(&specs[i])),
            recall_count: 0,
        }
    }

    /// Number of parameter slots.
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns `true` if the table is empty.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    // ── Access ───────────────────────────────────────────────────────

    /// Static description of parameter `index`.
    pub fn spec(&self, index: usize) -> Option<&'static ParameterSpec> {
        self.specs.get(index)
    }

    /// Immutable reference to parameter `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.params.get(index)
    }

    /// Current value of parameter `index`, or `None` if out of bounds.
    pub fn value(&self, index: usize) -> Option<i32> {
        self.params.get(index).map(|p| p.value)
    }

    /// Set a parameter value, clamped to its range, marking both change flags.
    ///
    /// Returns [`ParameterError::InvalidIndex`] if `index` is out of bounds.
    pub fn set_value(&mut self, index: usize, value: i32) -> Result<(), ParameterError> {
        let param = self
            .params
            .get_mut(index)
            .ok_or(ParameterError::InvalidIndex)?;
        param.set_value(value);
        Ok(())
    }

    // ── Preset recall ────────────────────────────────────────────────

    /// Overwrite every value from a preset and bump the recall counter.
    ///
    /// All values are clamped and flagged for both consumers. Nothing is
    /// written unless `values` holds exactly one entry per parameter.
    pub fn restore(&mut self, values: &[i32]) -> Result<(), ParameterError> {
        if values.len() != N {
            return Err(ParameterError::LengthMismatch {
                expected: N,
                found: values.len(),
            });
        }
        for (param, &value) in self.params.iter_mut().zip(values) {
            param.set_value(value);
        }
        self.recall_count = self.recall_count.wrapping_add(1);

        #[cfg(feature = "defmt")]
        defmt::debug!("Preset restored ({} parameters)", N);
        Ok(())
    }

    /// Return every parameter to its table default. Counts as a recall.
    pub fn reset_to_defaults(&mut self) {
        for (param, spec) in self.params.iter_mut().zip(self.specs.iter()) {
            param.set_value(spec.default);
        }
        self.recall_count = self.recall_count.wrapping_add(1);
    }

    /// Number of recalls (restores and resets) since construction, wrapping.
    pub fn recall_count(&self) -> u32 {
        self.recall_count
    }

    // ── Change consumption ───────────────────────────────────────────

    /// Collect all parameters whose engine change flag is set, then clear
    /// those flags.
    ///
    /// Only clears `changed_engine`; the `changed_display` flag is left intact.
    pub fn take_engine_changes(&mut self) -> Vec<ParameterChange, N> {
        self.take_changes(|param| &mut param.changed_engine)
    }

    /// Collect all parameters whose display change flag is set, then clear
    /// those flags.
    ///
    /// Only clears `changed_display`; the `changed_engine` flag is left intact.
    pub fn take_display_changes(&mut self) -> Vec<ParameterChange, N> {
        self.take_changes(|param| &mut param.changed_display)
    }

    fn take_changes(
        &mut self,
        flag: impl Fn(&mut Parameter) -> &mut bool,
    ) -> Vec<ParameterChange, N> {
        let mut result = Vec::new();

        for (index, (param, spec)) in self.params.iter_mut().zip(self.specs.iter()).enumerate() {
            let value = param.value;
            let changed = flag(param);
            if *changed {
                *changed = false;
                // One entry per slot at most, so capacity N is never exceeded.
                let _ = result.push(ParameterChange {
                    name: spec.name,
                    index,
                    value,
                });
            }
        }

        result
    }
}

impl<const N: usize> ParameterStore for ParameterValues<N> {
    fn parameter(&self, index: usize) -> i32 {
        self.value(index).unwrap_or(0)
    }

    fn set_parameter(&mut self, index: usize, value: i32) {
        if let Err(_e) = self.set_value(index, value) {
            #[cfg(feature = "defmt")]
            defmt::warn!("set_parameter({}): {}", index, _e);
        }
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    static TABLE: [ParameterSpec; 4] = [
        ParameterSpec::new("Cutoff", 20, 20000, 1000),
        ParameterSpec::new("Resonance", 0, 100, 50),
        ParameterSpec::new("Decay", 30, 3000, 300),
        ParameterSpec::new("Volume", -40, 6, -12),
    ];

    fn make_pv() -> ParameterValues<4> {
        ParameterValues::new(&TABLE)
    }

    // ── Default state ────────────────────────────────────────────────

    #[test]
    fn default_state_uses_spec_defaults() {
        let mut pv = make_pv();
        assert_eq!(pv.len(), 4);
        assert_eq!(pv.value(0), Some(1000));
        assert_eq!(pv.value(3), Some(-12));
        assert_eq!(pv.recall_count(), 0);

        // No changes should be pending.
        assert!(pv.take_engine_changes().is_empty());
        assert!(pv.take_display_changes().is_empty());
    }

    #[test]
    fn ranges_come_from_spec() {
        let pv = make_pv();
        let param = pv.get(2).unwrap();
        assert_eq!(param.min_value, 30);
        assert_eq!(param.max_value, 3000);
        assert_eq!(pv.spec(2).unwrap().name, "Decay");
    }

    // ── Writes ───────────────────────────────────────────────────────

    #[test]
    fn set_value_marks_both_flags() {
        let mut pv = make_pv();
        pv.set_value(1, 75).unwrap();

        let param = pv.get(1).unwrap();
        assert_eq!(param.value, 75);
        assert!(param.changed_engine);
        assert!(param.changed_display);
    }

    #[test]
    fn set_value_clamps() {
        let mut pv = make_pv();
        pv.set_value(0, 50_000).unwrap();
        assert_eq!(pv.value(0), Some(20000));

        pv.set_value(3, -100).unwrap();
        assert_eq!(pv.value(3), Some(-40));
    }

    #[test]
    fn set_value_invalid_index() {
        let mut pv = make_pv();
        assert_eq!(pv.set_value(4, 1), Err(ParameterError::InvalidIndex));
        assert!(pv.get(4).is_none());
        assert!(pv.value(100).is_none());
    }

    #[test]
    fn store_trait_ignores_unknown_indices() {
        let mut pv = make_pv();
        pv.set_parameter(9, 5);
        assert_eq!(pv.parameter(9), 0);
        assert!(pv.take_engine_changes().is_empty());

        pv.set_parameter(1, 10);
        assert_eq!(pv.parameter(1), 10);
    }

    // ── Preset recall ────────────────────────────────────────────────

    #[test]
    fn restore_overwrites_all_and_counts() {
        let mut pv = make_pv();
        pv.restore(&[500, 10, 1000, 0]).unwrap();

        assert_eq!(pv.value(0), Some(500));
        assert_eq!(pv.value(3), Some(0));
        assert_eq!(pv.recall_count(), 1);
        assert_eq!(pv.take_engine_changes().len(), 4);
    }

    #[test]
    fn restore_rejects_wrong_length() {
        let mut pv = make_pv();
        assert_eq!(
            pv.restore(&[1, 2]),
            Err(ParameterError::LengthMismatch {
                expected: 4,
                found: 2
            })
        );
        assert_eq!(pv.value(0), Some(1000));
        assert_eq!(pv.recall_count(), 0);
    }

    #[test]
    fn reset_to_defaults_counts_as_recall() {
        let mut pv = make_pv();
        pv.set_value(0, 20).unwrap();
        pv.take_engine_changes();

        pv.reset_to_defaults();
        assert_eq!(pv.value(0), Some(1000));
        assert_eq!(pv.recall_count(), 1);
    }

    // ── Change consumption ───────────────────────────────────────────

    #[test]
    fn take_display_changes_returns_name_and_value() {
        let mut pv = make_pv();
        pv.set_value(2, 1234).unwrap();

        let changes = pv.take_display_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0],
            ParameterChange {
                name: "Decay",
                index: 2,
                value: 1234
            }
        );

        // Flags are cleared, so the second call returns nothing.
        assert!(pv.take_display_changes().is_empty());
    }

    #[test]
    fn take_engine_changes_does_not_clear_display_flag() {
        let mut pv = make_pv();
        pv.set_value(0, 440).unwrap();

        assert_eq!(pv.take_engine_changes().len(), 1);
        assert!(pv.get(0).unwrap().changed_display);
        assert_eq!(pv.take_display_changes().len(), 1);
    }

    #[test]
    fn changes_are_reported_in_index_order() {
        let mut pv = make_pv();
        pv.set_value(3, 0).unwrap();
        pv.set_value(1, 1).unwrap();

        let changes = pv.take_engine_changes();
        assert_eq!(changes[0].name, "Resonance");
        assert_eq!(changes[1].name, "Volume");
    }
}
