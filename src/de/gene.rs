//! A single gene's differential-expression result.

/// An error related to a [`DeGene`].
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The gene identifier was empty.
    EmptyGeneId,

    /// The effect size was not a finite number.
    NonFiniteEffectSize(f64),

    /// The significance value was outside of `[0, 1]`.
    SignificanceOutOfRange(f64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptyGeneId => write!(f, "empty gene identifier"),
            Error::NonFiniteEffectSize(value) => {
                write!(f, "effect size must be finite, found {value}")
            }
            Error::SignificanceOutOfRange(value) => {
                write!(f, "significance must be within [0, 1], found {value}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// One gene's result within a differential-expression analysis.
///
/// The identifier is in the analysis' native annotation release.
#[derive(Clone, Debug, PartialEq)]
pub struct DeGene {
    /// The gene identifier.
    gene_id: String,

    /// The signed effect size (log fold change).
    effect_size: f64,

    /// The adjusted significance (adjusted p-value or FDR).
    significance: f64,
}

impl DeGene {
    /// Attempts to create a new [`DeGene`].
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::de::DeGene;
    ///
    /// let gene = DeGene::try_new("g1", -2.0, 0.001)?;
    /// assert_eq!(gene.effect_size(), -2.0);
    ///
    /// assert!(DeGene::try_new("g1", f64::NAN, 0.001).is_err());
    /// assert!(DeGene::try_new("g1", 1.0, 1.5).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        gene_id: impl Into<String>,
        effect_size: f64,
        significance: f64,
    ) -> Result<Self, Error> {
        let gene_id = gene_id.into();

        if gene_id.is_empty() {
            return Err(Error::EmptyGeneId);
        }

        if !effect_size.is_finite() {
            return Err(Error::NonFiniteEffectSize(effect_size));
        }

        if !(0.0..=1.0).contains(&significance) {
            return Err(Error::SignificanceOutOfRange(significance));
        }

        Ok(Self {
            gene_id,
            effect_size,
            significance,
        })
    }

    /// Gets the gene identifier.
    pub fn gene_id(&self) -> &str {
        &self.gene_id
    }

    /// Gets the signed effect size.
    pub fn effect_size(&self) -> f64 {
        self.effect_size
    }

    /// Gets the adjusted significance.
    pub fn significance(&self) -> f64 {
        self.significance
    }
}
