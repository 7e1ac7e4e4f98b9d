use heapless::Vec;
use libm::roundf;

use crate::parameter_values::ParameterStore;

use super::channel::{Layer, PotChannel};
use super::config::TakeoverConfig;
use super::display::ActiveDisplay;
use super::layout::ControlLayout;
use super::ui::{EncoderId, PotId, PotSample, UiSnapshot, ENCODER_COUNT, POT_COUNT};

/// Most edits a single poll can produce: one per control.
pub const MAX_EDITS: usize = POT_COUNT + ENCODER_COUNT;

/// Result of one pot update.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PotUpdate {
    /// Parameter the pot edited.
    pub param: usize,
    /// Which of the pot's two parameters was edited.
    pub layer: Layer,
    /// New logical target in `[0, 1]`.
    pub target: f32,
    /// Target mapped through the binding's scaling rule.
    pub value: f32,
}

impl PotUpdate {
    /// Value to write into the integer parameter store.
    pub fn store_value(&self) -> i32 {
        roundf(self.value) as i32
    }
}

/// Result of one encoder update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderUpdate {
    /// Parameter the encoder edited.
    pub param: usize,
    /// New clamped value.
    pub value: i32,
}

/// Physical control that produced an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlSource {
    /// One of the three pots.
    Pot(PotId),
    /// One of the two encoders.
    Encoder(EncoderId),
}

/// A parameter write performed by [`SoftTakeover::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlEdit {
    /// Control that was moved.
    pub source: ControlSource,
    /// Index of the parameter written.
    pub param: usize,
    /// Value written to the store.
    pub value: i32,
}

/// Soft-takeover engine for every pot and encoder on the panel.
///
/// Owned by the plugin instance and driven from the UI-poll callback. The
/// engine never reads the audio state; it only reads and writes the
/// parameter store.
///
/// # Examples
///
/// ```
/// use squelch::parameter_values::{ParameterSpec, ParameterValues};
/// use squelch::takeover::{
///     ControlLayout, PotBinding, PotId, PotLayout, ScalingRule, SoftTakeover,
///     TakeoverConfig, UiSnapshot,
/// };
///
/// static TABLE: [ParameterSpec; 2] = [
///     ParameterSpec::new("Resonance", 0, 100, 80),
///     ParameterSpec::new("Accent", 0, 100, 50),
/// ];
/// let percent = ScalingRule::linear(0.0, 100.0).unwrap();
/// let pot = PotLayout {
///     primary: PotBinding { param: 0, rule: percent },
///     alt: PotBinding { param: 1, rule: percent },
/// };
/// let layout = ControlLayout { pots: [pot; 3], encoders: [None; 2] };
///
/// let mut store = ParameterValues::new(&TABLE);
/// let mut takeover = SoftTakeover::new(layout, TakeoverConfig::default());
/// takeover.setup(&store);
///
/// // Setup seeds the channel at the stored 80%, so a small move from
/// // there edits the value relative to it.
/// let ui = UiSnapshot::default().with_pot(PotId::Left, 0.79, false);
/// takeover.poll(&ui, &mut store);
/// assert_eq!(store.value(0), Some(79));
/// ```
pub struct SoftTakeover {
    layout: ControlLayout,
    config: TakeoverConfig,
    channels: [PotChannel; POT_COUNT],
    display: Option<ActiveDisplay>,
}

impl SoftTakeover {
    /// Build the engine with every channel centred. Call
    /// [`setup`](Self::setup) before the first poll.
    pub fn new(layout: ControlLayout, config: TakeoverConfig) -> Self {
        Self {
            layout,
            config,
            channels: [PotChannel::default(); POT_COUNT],
            display: None,
        }
    }

    /// Seed every channel from the values currently in `store`.
    ///
    /// Runs at instance construction and after every preset recall. Returns
    /// the inverse-scaled primary position of each pot, for hosts that track
    /// pot pickup themselves.
    pub fn setup(&mut self, store: &impl ParameterStore) -> [f32; POT_COUNT] {
        for (channel, pot) in self.channels.iter_mut().zip(self.layout.pots.iter()) {
            let primary = pot.primary.rule.unscale(store.parameter(pot.primary.param) as f32);
            let alt = pot.alt.rule.unscale(store.parameter(pot.alt.param) as f32);
            channel.restore(primary, alt);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Soft takeover seeded from stored values");

        core::array::from_fn(|i| self.channels[i].target(Layer::Primary))
    }

    // ── Single-control updates ───────────────────────────────────────

    /// Feed one pot sample.
    ///
    /// Returns `None` when the pot did not move or reported a non-finite
    /// position; the button state is still recorded. Every update refreshes
    /// the [`ActiveDisplay`].
    pub fn process_pot(&mut self, pot: PotId, sample: PotSample) -> Option<PotUpdate> {
        let channel = &mut self.channels[pot.index()];
        if !sample.moved || !sample.position.is_finite() {
            channel.set_button(sample.button);
            return None;
        }

        let (layer, target) = channel.update(sample.position, sample.button, &self.config);
        let layout = &self.layout.pots[pot.index()];
        let binding = match layer {
            Layer::Primary => &layout.primary,
            Layer::Alt => &layout.alt,
        };

        let update = PotUpdate {
            param: binding.param,
            layer,
            target,
            value: binding.rule.scale(target),
        };
        self.refresh_display(update.param, update.store_value());
        Some(update)
    }

    /// Apply `delta` detents from an encoder to `current`.
    ///
    /// Returns `None` for a zero delta or an unbound encoder. Every update
    /// refreshes the [`ActiveDisplay`].
    pub fn process_encoder(
        &mut self,
        encoder: EncoderId,
        delta: i8,
        current: i32,
    ) -> Option<EncoderUpdate> {
        if delta == 0 {
            return None;
        }
        let binding = self.layout.encoders[encoder.index()]?;

        let update = EncoderUpdate {
            param: binding.param,
            value: binding.apply(current, delta),
        };
        self.refresh_display(update.param, update.value);
        Some(update)
    }

    // ── Poll ─────────────────────────────────────────────────────────

    /// Run one UI poll: advance the display countdown, then update every
    /// pot and encoder in panel order, writing results into `store`.
    pub fn poll<S: ParameterStore>(&mut self, ui: &UiSnapshot, store: &mut S) -> Vec<ControlEdit, MAX_EDITS> {
        let mut edits = Vec::new();
        self.tick_display();

        for pot in PotId::ALL {
            if let Some(update) = self.process_pot(pot, ui.pot(pot)) {
                let value = update.store_value();
                store.set_parameter(update.param, value);
                let _ = edits.push(ControlEdit {
                    source: ControlSource::Pot(pot),
                    param: update.param,
                    value,
                });
            }
        }

        for encoder in EncoderId::ALL {
            let Some(binding) = self.layout.encoders[encoder.index()] else {
                continue;
            };
            let current = store.parameter(binding.param);
            if let Some(update) = self.process_encoder(encoder, ui.encoder(encoder), current) {
                store.set_parameter(update.param, update.value);
                let _ = edits.push(ControlEdit {
                    source: ControlSource::Encoder(encoder),
                    param: update.param,
                    value: update.value,
                });
            }
        }

        edits
    }

    // ── Display ──────────────────────────────────────────────────────

    /// Advance the transient display by one UI poll.
    pub fn tick_display(&mut self) {
        if let Some(display) = &mut self.display {
            display.tick(self.config.display_step);
            if !display.is_active() {
                self.display = None;
            }
        }
    }

    /// The transient single-parameter view, while it is still open.
    pub fn active_display(&self) -> Option<&ActiveDisplay> {
        self.display.as_ref()
    }

    fn refresh_display(&mut self, param: usize, value: i32) {
        self.display = Some(ActiveDisplay::new(param, value, self.config.display_ticks));
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Takeover state of one pot.
    pub fn channel(&self, pot: PotId) -> &PotChannel {
        &self.channels[pot.index()]
    }

    /// Control-to-parameter bindings.
    pub fn layout(&self) -> &ControlLayout {
        &self.layout
    }

    /// Thresholds and display timing.
    pub fn config(&self) -> &TakeoverConfig {
        &self.config
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter_values::{ParameterSpec, ParameterValues};
    use crate::takeover::{EncoderBinding, PotBinding, PotLayout, ScalingRule};
    use approx::assert_relative_eq;

    const CUTOFF: usize = 0;
    const RESONANCE: usize = 1;
    const DECAY: usize = 2;
    const ENV_MOD: usize = 3;
    const ACCENT: usize = 4;
    const SLIDE: usize = 5;
    const WAVEFORM: usize = 6;

    static TABLE: [ParameterSpec; 7] = [
        ParameterSpec::new("Cutoff", 20, 20000, 1000),
        ParameterSpec::new("Resonance", 0, 100, 50),
        ParameterSpec::new("Decay", 30, 3000, 300),
        ParameterSpec::new("Env Mod", 0, 100, 25),
        ParameterSpec::new("Accent", 0, 100, 50),
        ParameterSpec::new("Slide Time", 1, 200, 60),
        ParameterSpec::new("Waveform", 0, 100, 0),
    ];

    fn binding(param: usize, rule: ScalingRule) -> PotBinding {
        PotBinding { param, rule }
    }

    fn layout() -> ControlLayout {
        let percent = ScalingRule::linear(0.0, 100.0).unwrap();
        ControlLayout {
            pots: [
                PotLayout {
                    primary: binding(CUTOFF, ScalingRule::exponential(20.0, 1000.0).unwrap()),
                    alt: binding(ENV_MOD, percent),
                },
                PotLayout {
                    primary: binding(RESONANCE, percent),
                    alt: binding(ACCENT, percent),
                },
                PotLayout {
                    primary: binding(DECAY, ScalingRule::linear(30.0, 3000.0).unwrap()),
                    alt: binding(SLIDE, ScalingRule::linear(1.0, 200.0).unwrap()),
                },
            ],
            encoders: [
                Some(EncoderBinding {
                    param: WAVEFORM,
                    min: 0,
                    max: 100,
                    step: 5,
                }),
                None,
            ],
        }
    }

    fn make() -> (SoftTakeover, ParameterValues<7>) {
        let store = ParameterValues::new(&TABLE);
        let mut takeover = SoftTakeover::new(layout(), TakeoverConfig::default());
        takeover.setup(&store);
        (takeover, store)
    }

    // ── Setup ────────────────────────────────────────────────────────

    #[test]
    fn setup_inverse_scales_stored_values() {
        let store = ParameterValues::new(&TABLE);
        let mut takeover = SoftTakeover::new(layout(), TakeoverConfig::default());
        let pots = takeover.setup(&store);

        // log(1000 / 20) / log(1000)
        assert_relative_eq!(pots[0], 0.566_32, epsilon = 1e-4);
        assert_relative_eq!(pots[1], 0.5, epsilon = 1e-6);
        assert_relative_eq!(pots[2], 270.0 / 2970.0, epsilon = 1e-6);

        let channel = takeover.channel(PotId::Centre);
        assert_relative_eq!(channel.target(Layer::Alt), 0.5, epsilon = 1e-6);
        assert_relative_eq!(channel.last_position(), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn setup_after_recall_moves_targets_not_values() {
        let (mut takeover, mut store) = make();
        store.restore(&[20000, 90, 3000, 0, 0, 1, 0]).unwrap();
        store.take_engine_changes();

        takeover.setup(&store);
        assert_relative_eq!(
            takeover.channel(PotId::Centre).target(Layer::Primary),
            0.9,
            epsilon = 1e-6
        );
        assert!(store.take_engine_changes().is_empty());
    }

    // ── Pots ─────────────────────────────────────────────────────────

    #[test]
    fn unmoved_pots_write_nothing() {
        let (mut takeover, mut store) = make();
        let ui = UiSnapshot::from_host(0, [0.9, 0.1, 0.3], [0, 0]);

        assert!(takeover.poll(&ui, &mut store).is_empty());
        assert!(store.take_engine_changes().is_empty());
        assert!(takeover.active_display().is_none());
    }

    #[test]
    fn recall_reseeds_relative_editing() {
        let (mut takeover, mut store) = make();
        let ui = UiSnapshot::default().with_pot(PotId::Centre, 0.52, false);
        takeover.poll(&ui, &mut store);
        assert_eq!(store.value(RESONANCE), Some(52));

        // A recall moves the value away from the knob.
        store.set_value(RESONANCE, 80).unwrap();
        takeover.setup(&store);

        // The channel now assumes the pot sits at 0.80; a notch down edits
        // relative to the recalled value.
        let ui = UiSnapshot::default().with_pot(PotId::Centre, 0.79, false);
        takeover.poll(&ui, &mut store);
        assert_eq!(store.value(RESONANCE), Some(79));
    }

    #[test]
    fn non_finite_pot_sample_writes_nothing() {
        let (mut takeover, mut store) = make();
        let ui = UiSnapshot::default().with_pot(PotId::Left, f32::NAN, false);

        assert!(takeover.poll(&ui, &mut store).is_empty());
        assert_eq!(store.value(CUTOFF), Some(1000));
        assert!(takeover.active_display().is_none());

        // Tracking resumes from the seeded position.
        let target = takeover.channel(PotId::Left).target(Layer::Primary);
        assert!(target.is_finite());
        let ui = UiSnapshot::default().with_pot(PotId::Left, 1.0, false);
        takeover.poll(&ui, &mut store);
        assert_eq!(store.value(CUTOFF), Some(20000));
    }

    #[test]
    fn pot_update_emits_scaled_target() {
        let (mut takeover, _) = make();
        let sample = PotSample {
            position: 1.0,
            moved: true,
            button: false,
        };
        let update = takeover.process_pot(PotId::Left, sample).unwrap();
        assert_eq!(update.param, CUTOFF);
        assert_eq!(update.target, 1.0);
        assert_relative_eq!(update.value, 20_000.0, max_relative = 1e-5);
        assert_eq!(update.store_value(), 20_000);
    }

    #[test]
    fn held_button_edits_alt_parameter() {
        let (mut takeover, mut store) = make();
        let ui = UiSnapshot::default().with_pot(PotId::Left, 0.0, true);
        let edits = takeover.poll(&ui, &mut store);

        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].param, ENV_MOD);
        assert_eq!(store.value(ENV_MOD), Some(0));
        assert_eq!(store.value(CUTOFF), Some(1000));
    }

    // ── Encoders ─────────────────────────────────────────────────────

    #[test]
    fn encoder_steps_and_clamps() {
        let (mut takeover, mut store) = make();
        let ui = UiSnapshot::default().with_encoder(EncoderId::Left, 3);
        takeover.poll(&ui, &mut store);
        assert_eq!(store.value(WAVEFORM), Some(15));

        let ui = UiSnapshot::default().with_encoder(EncoderId::Left, -10);
        let edits = takeover.poll(&ui, &mut store);
        assert_eq!(store.value(WAVEFORM), Some(0));
        assert_eq!(
            edits[0],
            ControlEdit {
                source: ControlSource::Encoder(EncoderId::Left),
                param: WAVEFORM,
                value: 0
            }
        );
    }

    #[test]
    fn unbound_encoder_is_ignored() {
        let (mut takeover, mut store) = make();
        let ui = UiSnapshot::default().with_encoder(EncoderId::Right, 4);
        assert!(takeover.poll(&ui, &mut store).is_empty());
        assert!(takeover.process_encoder(EncoderId::Right, 4, 0).is_none());
        assert!(takeover.process_encoder(EncoderId::Left, 0, 0).is_none());
    }

    // ── Display ──────────────────────────────────────────────────────

    #[test]
    fn edit_opens_display_with_rounded_value() {
        let (mut takeover, mut store) = make();
        let ui = UiSnapshot::default().with_pot(PotId::Right, 0.5, false);
        takeover.poll(&ui, &mut store);

        let display = takeover.active_display().unwrap();
        assert_eq!(display.param, DECAY);
        assert_eq!(display.value, 1515);
        assert_eq!(display.remaining_ticks, 48_000);
        assert_eq!(store.value(DECAY), Some(1515));
    }

    #[test]
    fn display_closes_after_countdown() {
        let (mut takeover, mut store) = make();
        let ui = UiSnapshot::default().with_encoder(EncoderId::Left, 1);
        takeover.poll(&ui, &mut store);

        let idle = UiSnapshot::default();
        let polls = takeover.config().display_polls();
        for _ in 0..polls - 1 {
            takeover.poll(&idle, &mut store);
            assert!(takeover.active_display().is_some());
        }
        takeover.poll(&idle, &mut store);
        assert!(takeover.active_display().is_none());
    }

    #[test]
    fn new_edit_resets_countdown() {
        let (mut takeover, mut store) = make();
        takeover.poll(&UiSnapshot::default().with_encoder(EncoderId::Left, 1), &mut store);
        for _ in 0..10 {
            takeover.poll(&UiSnapshot::default(), &mut store);
        }
        takeover.poll(&UiSnapshot::default().with_pot(PotId::Centre, 0.5, false), &mut store);

        let display = takeover.active_display().unwrap();
        assert_eq!(display.param, RESONANCE);
        assert_eq!(display.remaining_ticks, 48_000);
    }
}
