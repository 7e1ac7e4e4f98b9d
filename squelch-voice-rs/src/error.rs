use core::fmt;

use squelch::parameter_values::ParameterError;
use squelch::takeover::ScalingError;
use squelch_pool::PoolError;

/// Errors raised while building or configuring a [`Voice`](crate::Voice).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VoiceError {
    /// The engine could not get its setup buffers from the pool.
    Pool(PoolError),
    /// A preset did not fit the parameter table.
    Parameter(ParameterError),
    /// A control binding has an unusable scaling range.
    Scaling(ScalingError),
}

impl fmt::Display for VoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceError::Pool(e) => write!(f, "pool: {}", e),
            VoiceError::Parameter(e) => write!(f, "parameter: {}", e),
            VoiceError::Scaling(e) => write!(f, "scaling: {}", e),
        }
    }
}

impl From<PoolError> for VoiceError {
    fn from(e: PoolError) -> Self {
        VoiceError::Pool(e)
    }
}

impl From<ParameterError> for VoiceError {
    fn from(e: ParameterError) -> Self {
        VoiceError::Parameter(e)
    }
}

impl From<ScalingError> for VoiceError {
    fn from(e: ScalingError) -> Self {
        VoiceError::Scaling(e)
    }
}
