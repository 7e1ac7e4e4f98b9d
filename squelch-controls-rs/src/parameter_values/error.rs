use core::fmt;

/// Errors that can occur when working with parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterError {
    /// Parameter index is out of bounds (must be < the table length).
    InvalidIndex,
    /// A preset did not hold exactly one value per parameter.
    LengthMismatch {
        /// Number of parameters in the store.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParameterError::InvalidIndex => write!(f, "Parameter index out of range"),
            ParameterError::LengthMismatch { expected, found } => write!(
                f,
                "Expected {} parameter values, found {}",
                expected, found
            ),
        }
    }
}
