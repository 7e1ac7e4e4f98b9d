/// Transient single-parameter view opened by a control edit.
///
/// While [`is_active`](Self::is_active) the draw callback shows this
/// parameter instead of the default overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActiveDisplay {
    /// Index of the edited parameter.
    pub param: usize,
    /// Integer value written by the edit.
    pub value: i32,
    /// Countdown in audio frames; the view closes once it reaches zero.
    pub remaining_ticks: i32,
}

impl ActiveDisplay {
    /// Open (or re-open) the view for `param`.
    pub fn new(param: usize, value: i32, ticks: i32) -> Self {
        Self {
            param,
            value,
            remaining_ticks: ticks,
        }
    }

    /// Advance the countdown by `step` frames. Stops at the first
    /// non-positive value.
    pub fn tick(&mut self, step: i32) {
        if self.remaining_ticks > 0 {
            self.remaining_ticks = self.remaining_ticks.saturating_sub(step);
        }
    }

    /// Whether the view should still be drawn.
    pub fn is_active(&self) -> bool {
        self.remaining_ticks > 0
    }
}
