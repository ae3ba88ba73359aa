//! Significance thresholds and the genes that pass them.

use std::collections::BTreeSet;

use crate::de::DeGene;
use crate::de::DeSet;

/// An error related to constructing [`Thresholds`].
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The effect threshold was negative or not finite.
    InvalidEffectThreshold(f64),

    /// The significance threshold was outside of `(0, 1]`.
    InvalidSignificanceThreshold(f64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidEffectThreshold(value) => write!(
                f,
                "invalid effect threshold: expected a finite, non-negative value, found {value}"
            ),
            Error::InvalidSignificanceThreshold(value) => write!(
                f,
                "invalid significance threshold: expected a value within (0, 1], found {value}"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// The cutoffs that make a gene significant within one analysis.
///
/// A gene is significant when `|effect_size| >= effect` _and_
/// `significance < significance`. There is deliberately no default: each
/// analysis states its own cutoffs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// The minimum absolute effect size.
    effect: f64,

    /// The exclusive upper bound on the adjusted significance.
    significance: f64,
}

impl Thresholds {
    /// Attempts to create new thresholds.
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::de::DeGene;
    /// use genebridge::de::Thresholds;
    ///
    /// let thresholds = Thresholds::try_new(1.0, 0.01)?;
    ///
    /// assert!(thresholds.is_significant(&DeGene::try_new("g1", -2.0, 0.001)?));
    /// assert!(thresholds.is_significant(&DeGene::try_new("g2", 1.0, 0.001)?));
    /// assert!(!thresholds.is_significant(&DeGene::try_new("g3", 2.0, 0.01)?));
    /// assert!(!thresholds.is_significant(&DeGene::try_new("g4", 0.1, 0.5)?));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(effect: f64, significance: f64) -> Result<Self, Error> {
        if !effect.is_finite() || effect < 0.0 {
            return Err(Error::InvalidEffectThreshold(effect));
        }

        if !(significance > 0.0 && significance <= 1.0) {
            return Err(Error::InvalidSignificanceThreshold(significance));
        }

        Ok(Self {
            effect,
            significance,
        })
    }

    /// Gets the minimum absolute effect size.
    pub fn effect(&self) -> f64 {
        self.effect
    }

    /// Gets the exclusive upper bound on the adjusted significance.
    pub fn significance(&self) -> f64 {
        self.significance
    }

    /// Returns whether a gene's absolute effect size reaches the effect cutoff.
    pub fn passes_effect(&self, gene: &DeGene) -> bool {
        gene.effect_size().abs() >= self.effect
    }

    /// Returns whether a gene's adjusted significance is below the
    /// significance cutoff.
    pub fn passes_significance(&self, gene: &DeGene) -> bool {
        gene.significance() < self.significance
    }

    /// Returns whether a gene passes both cutoffs.
    pub fn is_significant(&self, gene: &DeGene) -> bool {
        self.passes_effect(gene) && self.passes_significance(gene)
    }

    /// Classifies every gene of a set.
    pub fn classify(&self, set: &DeSet) -> SignificantSet {
        SignificantSet {
            ids: set
                .iter()
                .filter(|gene| self.is_significant(gene))
                .map(|gene| gene.gene_id().to_string())
                .collect(),
            thresholds: *self,
        }
    }
}

/// The genes of one analysis that pass its [`Thresholds`].
#[derive(Clone, Debug, PartialEq)]
pub struct SignificantSet {
    /// The significant gene identifiers.
    ids: BTreeSet<String>,

    /// The thresholds the set was built with.
    thresholds: Thresholds,
}

impl SignificantSet {
    /// Returns whether a gene is significant.
    pub fn contains(&self, gene_id: &str) -> bool {
        self.ids.contains(gene_id)
    }

    /// Gets an iterator over the significant gene identifiers, sorted.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Gets the number of significant genes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns whether no gene is significant.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Gets the thresholds the set was built with.
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }
}
