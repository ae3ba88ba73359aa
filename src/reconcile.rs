//! Reconciliation of two differential-expression result sets.
//!
//! The [`Engine`] joins two [`DeSet`](crate::de::DeSet)s through a
//! [`Resolver`](crate::identity::Resolver), correlates the effect sizes of the
//! paired genes, diagnoses the comparison [`Polarity`], and reports overlap
//! statistics on the significant subsets.
//!
//! Signs are never flipped unless a [`Correction`] other than
//! [`Correction::None`] is requested through the [`Config`].

pub mod correlation;
pub mod engine;
pub mod polarity;
pub mod result;

pub use correlation::Correlation;
pub use engine::Engine;
pub use polarity::Polarity;
pub use result::OnlyCounts;
pub use result::OnlyGene;
pub use result::OnlyReason;
pub use result::OverlapStats;
pub use result::PairedGene;
pub use result::ReconciliationResult;
pub use result::SignificanceCall;

/// The default correlation magnitude beyond which a polarity is inferred.
pub const DEFAULT_POLARITY_THRESHOLD: f64 = 0.8;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to a reconciliation [`Config`].
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The polarity threshold was outside of `[0, 1)`.
    InvalidPolarityThreshold(f64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidPolarityThreshold(value) => write!(
                f,
                "invalid polarity threshold: expected a value within [0, 1), found {value}"
            ),
        }
    }
}

impl std::error::Error for Error {}

////////////////////////////////////////////////////////////////////////////////////////
// Sign correction
////////////////////////////////////////////////////////////////////////////////////////

/// Whether the effect sizes of set B are negated before the overlap statistics
/// are recomputed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Correction {
    /// Only raw statistics are reported.
    #[default]
    None,

    /// Set B is always negated.
    Reverse,

    /// Set B is negated only when the inferred polarity is
    /// [`Polarity::Reversed`].
    FollowInferred,
}

impl std::fmt::Display for Correction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Correction::None => write!(f, "none"),
            Correction::Reverse => write!(f, "reverse"),
            Correction::FollowInferred => write!(f, "follow-inferred"),
        }
    }
}

impl std::str::FromStr for Correction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Correction::None),
            "reverse" => Ok(Correction::Reverse),
            "follow-inferred" => Ok(Correction::FollowInferred),
            _ => Err(format!(
                "invalid correction: expected `none`, `reverse`, or `follow-inferred`, found `{s}`"
            )),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Configuration
////////////////////////////////////////////////////////////////////////////////////////

/// The configuration of an [`Engine`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// The correlation magnitude that must be exceeded to infer a polarity.
    polarity_threshold: f64,

    /// The requested sign correction.
    correction: Correction,
}

impl Config {
    /// Attempts to create a new configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::reconcile::Config;
    /// use genebridge::reconcile::Correction;
    ///
    /// let config = Config::try_new(0.9, Correction::FollowInferred)?;
    /// assert_eq!(config.polarity_threshold(), 0.9);
    /// assert_eq!(config.correction(), Correction::FollowInferred);
    ///
    /// assert!(Config::try_new(1.0, Correction::None).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(polarity_threshold: f64, correction: Correction) -> Result<Self, Error> {
        if !(0.0..1.0).contains(&polarity_threshold) {
            return Err(Error::InvalidPolarityThreshold(polarity_threshold));
        }

        Ok(Self {
            polarity_threshold,
            correction,
        })
    }

    /// Gets the polarity threshold.
    pub fn polarity_threshold(&self) -> f64 {
        self.polarity_threshold
    }

    /// Gets the requested sign correction.
    pub fn correction(&self) -> Correction {
        self.correction
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            polarity_threshold: DEFAULT_POLARITY_THRESHOLD,
            correction: Correction::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.polarity_threshold(), 0.8);
        assert_eq!(config.correction(), Correction::None);
    }

    #[test]
    fn test_invalid_polarity_threshold() {
        assert_eq!(
            Config::try_new(-0.1, Correction::None).unwrap_err(),
            Error::InvalidPolarityThreshold(-0.1)
        );
        assert!(Config::try_new(f64::NAN, Correction::None).is_err());
    }

    #[test]
    fn test_correction_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        for correction in [
            Correction::None,
            Correction::Reverse,
            Correction::FollowInferred,
        ] {
            assert_eq!(correction.to_string().parse::<Correction>()?, correction);
        }

        assert!("flip".parse::<Correction>().is_err());
        Ok(())
    }
}
