//! The column layout of a headerless DE result table.

use std::num::ParseFloatError;

use crate::de::DeGene;
use crate::de::gene;

/// The default gene identifier column (DESeq2 tabular output).
pub const DEFAULT_GENE_ID_COLUMN: usize = 0;

/// The default effect size column (`log2FoldChange` in DESeq2 tabular output).
pub const DEFAULT_EFFECT_SIZE_COLUMN: usize = 2;

/// The default significance column (`padj` in DESeq2 tabular output).
pub const DEFAULT_SIGNIFICANCE_COLUMN: usize = 6;

/// The default column delimiter.
pub const DEFAULT_DELIMITER: char = '\t';

/// An error associated with parsing a DE result row.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseError {
    /// The row was too short to hold a configured column.
    MissingColumn {
        /// The 0-based column that was requested.
        column: usize,

        /// The number of columns found.
        found: usize,
    },

    /// The effect size was not a number.
    InvalidEffectSize(ParseFloatError),

    /// The significance was not a number.
    InvalidSignificance(ParseFloatError),

    /// The parsed values did not form a valid gene result.
    Gene(gene::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingColumn { column, found } => write!(
                f,
                "missing column: expected column {column} (0-based), found {found} columns"
            ),
            ParseError::InvalidEffectSize(err) => write!(f, "invalid effect size: {err}"),
            ParseError::InvalidSignificance(err) => write!(f, "invalid significance: {err}"),
            ParseError::Gene(err) => write!(f, "invalid gene result: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Where the three values of a DE result live within a row.
///
/// The layout is configured rather than inferred from a header row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Columns {
    /// The 0-based gene identifier column.
    gene_id: usize,

    /// The 0-based effect size column.
    effect_size: usize,

    /// The 0-based significance column.
    significance: usize,

    /// The column delimiter.
    delimiter: char,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            gene_id: DEFAULT_GENE_ID_COLUMN,
            effect_size: DEFAULT_EFFECT_SIZE_COLUMN,
            significance: DEFAULT_SIGNIFICANCE_COLUMN,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl Columns {
    /// Creates a tab-delimited layout from 0-based column positions.
    pub fn new(gene_id: usize, effect_size: usize, significance: usize) -> Self {
        Self {
            gene_id,
            effect_size,
            significance,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Sets the column delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Gets the gene identifier column.
    pub fn gene_id(&self) -> usize {
        self.gene_id
    }

    /// Gets the effect size column.
    pub fn effect_size(&self) -> usize {
        self.effect_size
    }

    /// Gets the significance column.
    pub fn significance(&self) -> usize {
        self.significance
    }

    /// Gets the column delimiter.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Parses one row into a [`DeGene`].
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::de::Columns;
    ///
    /// let columns = Columns::default();
    /// let gene = columns.parse("g1\t812.3\t-2.5\t0.3\t-8.1\t1e-10\t3e-9")?;
    ///
    /// assert_eq!(gene.gene_id(), "g1");
    /// assert_eq!(gene.effect_size(), -2.5);
    /// assert_eq!(gene.significance(), 3e-9);
    ///
    /// assert!(columns.parse("g2\t0\tNA\tNA\tNA\tNA\tNA").is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(&self, line: &str) -> Result<DeGene, ParseError> {
        let fields = line.split(self.delimiter).collect::<Vec<_>>();

        let field = |column: usize| {
            fields
                .get(column)
                .map(|value| value.trim())
                .ok_or(ParseError::MissingColumn {
                    column,
                    found: fields.len(),
                })
        };

        let gene_id = field(self.gene_id)?;
        let effect_size = field(self.effect_size)?
            .parse::<f64>()
            .map_err(ParseError::InvalidEffectSize)?;
        let significance = field(self.significance)?
            .parse::<f64>()
            .map_err(ParseError::InvalidSignificance)?;

        DeGene::try_new(gene_id, effect_size, significance).map_err(ParseError::Gene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_layout() -> Result<(), Box<dyn std::error::Error>> {
        let columns = Columns::new(0, 1, 2).with_delimiter(',');
        let gene = columns.parse("g1, 2.0, 0.001")?;
        assert_eq!(gene.gene_id(), "g1");
        assert_eq!(gene.effect_size(), 2.0);
        assert_eq!(gene.significance(), 0.001);
        Ok(())
    }

    #[test]
    fn test_missing_column() {
        let err = Columns::default().parse("g1\t1.0\t2.0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing column: expected column 6 (0-based), found 3 columns"
        );
    }

    #[test]
    fn test_non_numeric_values() {
        let columns = Columns::new(0, 1, 2);

        let err = columns.parse("g1\tNA\t0.01").unwrap_err();
        assert!(matches!(err, ParseError::InvalidEffectSize(_)));

        let err = columns.parse("g1\t1.0\t").unwrap_err();
        assert!(matches!(err, ParseError::InvalidSignificance(_)));
    }

    #[test]
    fn test_out_of_range_values() {
        let columns = Columns::new(0, 1, 2);

        let err = columns.parse("g1\tinf\t0.01").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid gene result: effect size must be finite, found inf"
        );

        let err = columns.parse("g1\t1.0\t-0.5").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Gene(gene::Error::SignificanceOutOfRange(_))
        ));

        let err = columns.parse("\t1.0\t0.5").unwrap_err();
        assert_eq!(err, ParseError::Gene(gene::Error::EmptyGeneId));
    }
}
