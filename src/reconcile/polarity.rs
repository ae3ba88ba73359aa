//! Polarity diagnosis.

use crate::reconcile::Correlation;

/// The inferred relationship between the comparison directions of two
/// analyses.
///
/// This is a heuristic read off the correlation of paired effect sizes. It is
/// reported, never applied on its own.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Polarity {
    /// Effect sizes agree in sign.
    Concordant,

    /// Effect sizes are systematically negated.
    Reversed,

    /// Neither direction is supported strongly enough.
    Undetermined,
}

impl Polarity {
    /// Infers the polarity from a correlation.
    ///
    /// The coefficient must be strictly beyond `threshold` (or `-threshold`).
    /// An undefined correlation is always [`Polarity::Undetermined`].
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::reconcile::Correlation;
    /// use genebridge::reconcile::Polarity;
    ///
    /// assert_eq!(Polarity::infer(&Correlation::Defined(0.95), 0.8), Polarity::Concordant);
    /// assert_eq!(Polarity::infer(&Correlation::Defined(-1.0), 0.8), Polarity::Reversed);
    /// assert_eq!(Polarity::infer(&Correlation::Defined(0.8), 0.8), Polarity::Undetermined);
    /// assert_eq!(
    ///     Polarity::infer(&Correlation::InsufficientData { pairs: 1 }, 0.8),
    ///     Polarity::Undetermined
    /// );
    /// ```
    pub fn infer(correlation: &Correlation, threshold: f64) -> Self {
        match correlation.coefficient() {
            Some(r) if r > threshold => Polarity::Concordant,
            Some(r) if r < -threshold => Polarity::Reversed,
            _ => Polarity::Undetermined,
        }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarity::Concordant => write!(f, "concordant"),
            Polarity::Reversed => write!(f, "reversed"),
            Polarity::Undetermined => write!(f, "undetermined"),
        }
    }
}
