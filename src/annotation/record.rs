//! A single feature record within an annotation stream.

use std::str::FromStr;

use omics::coordinate::Strand;
use omics::coordinate::position;
use omics::coordinate::position::Number;
use omics::coordinate::position::base::Position;
use omics::coordinate::strand;

use crate::annotation::attributes;
use crate::annotation::interval;
use crate::annotation::interval::GenomicInterval;

/// The delimiter between the columns of a record.
pub const DELIMITER: char = '\t';

/// The number of expected columns in a record.
pub const NUM_FIELDS: usize = 9;

/// The strand symbols of a feature that is not stranded (`.`) or whose strand
/// is unknown (`?`).
const UNSTRANDED: [&str; 2] = [".", "?"];

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error associated with parsing a record.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// An incorrect number of columns in the line.
    IncorrectNumberOfFields(usize),

    /// An empty sequence identifier.
    EmptySequenceId,

    /// An invalid start position.
    InvalidStart(position::Error),

    /// An invalid end position.
    InvalidEnd(position::Error),

    /// An invalid strand.
    InvalidStrand(strand::Error),

    /// An interval error.
    Interval(interval::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(fields) => write!(
                f,
                "invalid number of fields in record: expected {} fields, found {} fields",
                NUM_FIELDS, fields
            ),
            ParseError::EmptySequenceId => write!(f, "empty sequence identifier"),
            ParseError::InvalidStart(err) => write!(f, "invalid start: {err}"),
            ParseError::InvalidEnd(err) => write!(f, "invalid end: {err}"),
            ParseError::InvalidStrand(err) => write!(f, "invalid strand: {err}"),
            ParseError::Interval(err) => write!(f, "interval error: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

////////////////////////////////////////////////////////////////////////////////////////
// Records
////////////////////////////////////////////////////////////////////////////////////////

/// A feature record within an annotation stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// The sequence (chromosome or contig) name.
    sequence_id: String,

    /// The feature type (e.g., `CDS` or `gene`).
    feature_type: String,

    /// The start position (1-based, inclusive).
    start: Number,

    /// The end position (1-based, inclusive).
    end: Number,

    /// The strand, if the feature is stranded.
    strand: Option<Strand>,

    /// The raw attribute column.
    attributes: String,
}

impl Record {
    /// Gets the sequence name.
    pub fn sequence_id(&self) -> &str {
        &self.sequence_id
    }

    /// Gets the feature type.
    pub fn feature_type(&self) -> &str {
        &self.feature_type
    }

    /// Gets the start position.
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end position.
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the strand.
    ///
    /// Returns [`None`] for unstranded features (`.` or `?`).
    pub fn strand(&self) -> Option<Strand> {
        self.strand
    }

    /// Gets the raw attribute column.
    pub fn attributes(&self) -> &str {
        &self.attributes
    }

    /// Gets the `locus_tag` attribute, if present.
    pub fn locus_tag(&self) -> Option<&str> {
        attributes::locus_tag(&self.attributes)
    }

    /// Gets the `old_locus_tag` attribute, if present.
    pub fn old_locus_tag(&self) -> Option<&str> {
        attributes::old_locus_tag(&self.attributes)
    }

    /// Converts the record into a [`GenomicInterval`] keyed by its locus tag.
    ///
    /// Returns [`None`] when the record has no usable `locus_tag` or is not
    /// stranded.
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::annotation::Record;
    ///
    /// let record = "chr1\tsrc\tCDS\t100\t200\t.\t+\t0\tlocus_tag=g1".parse::<Record>()?;
    /// let interval = record.into_interval().unwrap();
    ///
    /// assert_eq!(interval.locus_tag(), "g1");
    /// assert_eq!(interval.len(), 101);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn into_interval(self) -> Option<GenomicInterval> {
        let locus_tag = self.locus_tag()?.to_string();
        let strand = self.strand?;

        GenomicInterval::try_new(self.sequence_id, self.start, self.end, strand, locus_tag).ok()
    }
}

impl FromStr for Record {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(DELIMITER).collect::<Vec<_>>();

        if parts.len() != NUM_FIELDS {
            return Err(ParseError::IncorrectNumberOfFields(parts.len()));
        }

        let sequence_id = parts[0].trim();
        if sequence_id.is_empty() {
            return Err(ParseError::EmptySequenceId);
        }

        let start = parts[3]
            .trim()
            .parse::<Position>()
            .map_err(ParseError::InvalidStart)?
            .get();
        let end = parts[4]
            .trim()
            .parse::<Position>()
            .map_err(ParseError::InvalidEnd)?
            .get();

        let strand = match parts[6].trim() {
            symbol if UNSTRANDED.contains(&symbol) => None,
            symbol => Some(symbol.parse::<Strand>().map_err(ParseError::InvalidStrand)?),
        };

        interval::validate(start, end).map_err(ParseError::Interval)?;

        Ok(Self {
            sequence_id: sequence_id.to_string(),
            feature_type: parts[2].trim().to_string(),
            start,
            end,
            strand,
            attributes: parts[8].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_record() -> Result<(), Box<dyn std::error::Error>> {
        let record = "chr1\tGenbank\tCDS\t300\t500\t.\t-\t0\tID=cds-2;locus_tag=g2"
            .parse::<Record>()?;

        assert_eq!(record.sequence_id(), "chr1");
        assert_eq!(record.feature_type(), "CDS");
        assert_eq!(record.start(), 300);
        assert_eq!(record.end(), 500);
        assert_eq!(record.strand(), Some(Strand::Negative));
        assert_eq!(record.locus_tag(), Some("g2"));
        assert_eq!(record.old_locus_tag(), None);

        Ok(())
    }

    #[test]
    fn test_incorrect_number_of_fields() {
        let err = "chr1\tGenbank\tCDS\t300".parse::<Record>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number of fields in record: expected 9 fields, found 4 fields"
        );
    }

    #[test]
    fn test_invalid_start() {
        let err = "chr1\tsrc\tCDS\tabc\t500\t.\t+\t0\tlocus_tag=g1"
            .parse::<Record>()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid start: parse error: invalid digit found in string: `abc`"
        );

        let err = "chr1\tsrc\tCDS\t0\t500\t.\t+\t0\tlocus_tag=g1"
            .parse::<Record>()
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidStart(position::Error::IncompatibleValue { value: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_strand() {
        let err = "chr1\tsrc\tCDS\t1\t500\t.\tx\t0\tlocus_tag=g1"
            .parse::<Record>()
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidStrand(_)));
        assert!(err.to_string().starts_with("invalid strand: "));
    }

    #[test]
    fn test_unstranded_record() -> Result<(), Box<dyn std::error::Error>> {
        let record = "chr1\tRefSeq\tregion\t1\t5000\t.\t.\t.\tID=chr1:1..5000"
            .parse::<Record>()?;
        assert_eq!(record.feature_type(), "region");
        assert_eq!(record.strand(), None);

        let record = "chr1\tsrc\tCDS\t1\t10\t.\t?\t0\tlocus_tag=g1".parse::<Record>()?;
        assert_eq!(record.strand(), None);
        assert!(record.into_interval().is_none());

        Ok(())
    }

    #[test]
    fn test_end_at_last_position() {
        let line = format!(
            "chr1\tsrc\tCDS\t10\t{}\t.\t+\t0\tlocus_tag=g1",
            Number::MAX
        );
        let err = line.parse::<Record>().unwrap_err();
        assert_eq!(
            err,
            ParseError::Interval(interval::Error::EndOutOfRange(Number::MAX))
        );
    }

    #[test]
    fn test_end_before_start() {
        let err = "chr1\tsrc\tCDS\t500\t100\t.\t+\t0\tlocus_tag=g1"
            .parse::<Record>()
            .unwrap_err();
        assert!(matches!(err, ParseError::Interval(_)));
    }

    #[test]
    fn test_missing_locus_tag_yields_no_interval() -> Result<(), Box<dyn std::error::Error>> {
        let record = "chr1\tsrc\tCDS\t1\t10\t.\t+\t0\tID=cds-1".parse::<Record>()?;
        assert!(record.into_interval().is_none());
        Ok(())
    }
}
