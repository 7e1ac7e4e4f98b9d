use core::fmt;

use libm::{logf, powf};

/// Curve used to map a `[0, 1]` control position onto a parameter range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Taper {
    /// `value = min + pos * (max - min)`
    Linear,
    /// `value = min * base^pos`
    Exponential {
        /// Ratio between the top and bottom of the range.
        base: f32,
    },
}

/// Rejected scaling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScalingError {
    /// Linear range with `max <= min`, or a non-finite bound.
    EmptyRange,
    /// Exponential range whose minimum is not strictly positive.
    NonPositiveMinimum,
    /// Exponential base that is not finite and greater than one.
    InvalidBase,
}

impl fmt::Display for ScalingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScalingError::EmptyRange => write!(f, "Scaling range is empty"),
            ScalingError::NonPositiveMinimum => {
                write!(f, "Exponential scaling needs a positive minimum")
            }
            ScalingError::InvalidBase => {
                write!(f, "Exponential base must be finite and greater than 1")
            }
        }
    }
}

/// Immutable mapping between a `[0, 1]` control position and a parameter's
/// physical range.
///
/// [`scale`](Self::scale) and [`unscale`](Self::unscale) are inverses for
/// both tapers. Constructors validate the range so neither direction can
/// divide by zero or take the logarithm of a non-positive number.
///
/// # Examples
///
/// ```
/// use squelch::takeover::ScalingRule;
///
/// // 20 Hz .. 20 kHz over three decades.
/// let cutoff = ScalingRule::exponential(20.0, 1000.0).unwrap();
/// assert_eq!(cutoff.scale(0.0), 20.0);
/// assert!((cutoff.scale(1.0) - 20_000.0).abs() < 1.0);
/// assert!((cutoff.unscale(cutoff.scale(0.5)) - 0.5).abs() < 1e-5);
///
/// assert!(ScalingRule::linear(10.0, 10.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScalingRule {
    min: f32,
    max: f32,
    taper: Taper,
}

impl ScalingRule {
    /// Linear mapping onto `[min, max]`.
    pub fn linear(min: f32, max: f32) -> Result<Self, ScalingError> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(ScalingError::EmptyRange);
        }
        Ok(Self {
            min,
            max,
            taper: Taper::Linear,
        })
    }

    /// Exponential mapping onto `[min, min * base]`.
    pub fn exponential(min: f32, base: f32) -> Result<Self, ScalingError> {
        if !min.is_finite() || min <= 0.0 {
            return Err(ScalingError::NonPositiveMinimum);
        }
        if !base.is_finite() || base <= 1.0 {
            return Err(ScalingError::InvalidBase);
        }
        let max = min * base;
        if !max.is_finite() {
            return Err(ScalingError::InvalidBase);
        }
        Ok(Self {
            min,
            max,
            taper: Taper::Exponential { base },
        })
    }

    /// Bottom of the physical range.
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Top of the physical range.
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Curve of the mapping.
    pub fn taper(&self) -> Taper {
        self.taper
    }

    /// Whether the mapping is exponential.
    pub fn is_exponential(&self) -> bool {
        matches!(self.taper, Taper::Exponential { .. })
    }

    /// Map a control position to a parameter value.
    pub fn scale(&self, position: f32) -> f32 {
        match self.taper {
            Taper::Linear => self.min + position * (self.max - self.min),
            Taper::Exponential { base } => self.min * powf(base, position),
        }
    }

    /// Map a parameter value back to a control position.
    ///
    /// For the exponential taper, values below `min` are treated as `min`.
    /// The result is not clamped to `[0, 1]`.
    pub fn unscale(&self, value: f32) -> f32 {
        match self.taper {
            Taper::Linear => (value - self.min) / (self.max - self.min),
            Taper::Exponential { base } => {
                let value = if value < self.min { self.min } else { value };
                logf(value / self.min) / logf(base)
            }
        }
    }
}
