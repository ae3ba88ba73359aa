//! Coding-feature intervals on a genome.

use omics::coordinate::Strand;
use omics::coordinate::position::Number;

/// An error related to a [`GenomicInterval`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The start position was zero (positions are 1-based).
    ZeroStart,

    /// The end position was before the start position.
    EndBeforeStart {
        /// The start position.
        start: Number,

        /// The end position.
        end: Number,
    },

    /// The end position was the largest representable position.
    ///
    /// Intervals are searched as half-open ranges (`start..end + 1`), so the
    /// last position cannot be covered.
    EndOutOfRange(Number),

    /// The locus tag was empty.
    EmptyLocusTag,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ZeroStart => write!(f, "start position must be at least 1"),
            Error::EndBeforeStart { start, end } => {
                write!(f, "end position ({end}) is before start position ({start})")
            }
            Error::EndOutOfRange(end) => write!(f, "end position ({end}) is out of range"),
            Error::EmptyLocusTag => write!(f, "empty locus tag"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Checks that `start..=end` is a valid 1-based, fully-closed range.
pub(crate) fn validate(start: Number, end: Number) -> Result<()> {
    if start == 0 {
        return Err(Error::ZeroStart);
    }

    if end < start {
        return Err(Error::EndBeforeStart { start, end });
    }

    if end == Number::MAX {
        return Err(Error::EndOutOfRange(end));
    }

    Ok(())
}

/// A coding feature from one annotation release.
///
/// Positions are 1-based and fully closed (`start..=end`). Intervals are
/// immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct GenomicInterval {
    /// The sequence (chromosome or contig) name.
    sequence_id: String,

    /// The start position.
    start: Number,

    /// The end position.
    end: Number,

    /// The strand.
    strand: Strand,

    /// The locus tag (unique within an annotation release).
    locus_tag: String,
}

impl GenomicInterval {
    /// Attempts to create a new [`GenomicInterval`].
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::annotation::GenomicInterval;
    /// use omics::coordinate::Strand;
    ///
    /// let interval = GenomicInterval::try_new("chr1", 100, 200, Strand::Positive, "g1")?;
    /// assert_eq!(interval.len(), 101);
    ///
    /// assert!(GenomicInterval::try_new("chr1", 0, 200, Strand::Positive, "g1").is_err());
    /// assert!(GenomicInterval::try_new("chr1", 201, 200, Strand::Positive, "g1").is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        sequence_id: impl Into<String>,
        start: Number,
        end: Number,
        strand: Strand,
        locus_tag: impl Into<String>,
    ) -> Result<Self> {
        validate(start, end)?;

        let locus_tag = locus_tag.into();
        if locus_tag.is_empty() {
            return Err(Error::EmptyLocusTag);
        }

        Ok(Self {
            sequence_id: sequence_id.into(),
            start,
            end,
            strand,
            locus_tag,
        })
    }

    /// Gets the sequence name.
    pub fn sequence_id(&self) -> &str {
        &self.sequence_id
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
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Gets the locus tag.
    pub fn locus_tag(&self) -> &str {
        &self.locus_tag
    }

    /// Gets the number of positions covered by the interval.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Number {
        self.end - self.start + 1
    }

    /// Returns a copy of `self` extended to also cover `other`'s span.
    pub(crate) fn span(&self, other: &GenomicInterval) -> Self {
        Self {
            sequence_id: self.sequence_id.clone(),
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            strand: self.strand,
            locus_tag: self.locus_tag.clone(),
        }
    }

    /// Returns whether `other` sits on the same sequence and strand.
    pub fn is_colocated_with(&self, other: &GenomicInterval) -> bool {
        self.sequence_id == other.sequence_id && self.strand == other.strand
    }
}

impl std::fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{}:{}:{}-{}",
            self.locus_tag, self.sequence_id, self.strand, self.start, self.end
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let interval = GenomicInterval::try_new("chr1", 300, 500, Strand::Negative, "g2")?;
        assert_eq!(interval.to_string(), "g2@chr1:-:300-500");
        Ok(())
    }

    #[test]
    fn test_single_position_interval() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let interval = GenomicInterval::try_new("chr1", 7, 7, Strand::Positive, "g")?;
        assert_eq!(interval.len(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_intervals() {
        let err = GenomicInterval::try_new("chr1", 0, 1, Strand::Positive, "g").unwrap_err();
        assert_eq!(err.to_string(), "start position must be at least 1");

        let err = GenomicInterval::try_new("chr1", 5, 4, Strand::Positive, "g").unwrap_err();
        assert_eq!(err.to_string(), "end position (4) is before start position (5)");

        let err = GenomicInterval::try_new("chr1", 1, 4, Strand::Positive, "").unwrap_err();
        assert_eq!(err, Error::EmptyLocusTag);
    }

    #[test]
    fn test_end_at_last_position() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = GenomicInterval::try_new("chr1", 10, Number::MAX, Strand::Positive, "g")
            .unwrap_err();
        assert_eq!(err, Error::EndOutOfRange(Number::MAX));

        let last = Number::MAX - 1;
        let interval = GenomicInterval::try_new("chr1", 10, last, Strand::Positive, "g")?;
        assert_eq!(interval.len(), Number::MAX - 10);
        Ok(())
    }

    #[test]
    fn test_span() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let first = GenomicInterval::try_new("chr1", 100, 150, Strand::Positive, "g")?;
        let second = GenomicInterval::try_new("chr1", 180, 260, Strand::Positive, "g")?;
        let span = first.span(&second);
        assert_eq!((span.start(), span.end()), (100, 260));
        Ok(())
    }
}
