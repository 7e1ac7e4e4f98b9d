/// Read/write access to the host's integer parameter array.
///
/// The control surface reads current values and requests writes through
/// this seam. Indices are trusted: implementations may ignore writes to
/// unknown indices and return `0` for reads. Clamping to the declared range
/// is the implementation's job, not the caller's.
pub trait ParameterStore {
    /// Current value of parameter `index`.
    fn parameter(&self, index: usize) -> i32;

    /// Request that parameter `index` be set to `value`.
    fn set_parameter(&mut self, index: usize, value: i32);
}
