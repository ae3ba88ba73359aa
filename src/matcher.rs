//! Pairing the coding features of two annotation releases by coordinates.
//!
//! For every interval in annotation A, the [`Matcher`] looks for its best
//! counterpart in annotation B among the intervals on the same sequence _and_
//! the same strand. Intervals on opposite strands are never paired, even when
//! their coordinates overlap completely. The best candidate is the one with
//! the longest overlap (see [`OverlapCandidate::preference()`] for the
//! tie-break), and it is only accepted when its overlap covers strictly more
//! than the configured fraction of the shorter interval.
//!
//! ```
//! use genebridge::annotation::GenomicInterval;
//! use genebridge::annotation::index::Builder;
//! use genebridge::matcher::Matcher;
//! use omics::coordinate::Strand;
//!
//! let a = Builder::default().build_from_intervals([
//!     GenomicInterval::try_new("chr1", 100, 200, Strand::Positive, "g1")?,
//!     GenomicInterval::try_new("chr1", 300, 500, Strand::Positive, "g2")?,
//! ]);
//! let b = Builder::default().build_from_intervals([
//!     GenomicInterval::try_new("chr1", 150, 210, Strand::Positive, "h1")?,
//!     GenomicInterval::try_new("chr1", 305, 490, Strand::Negative, "h2")?,
//! ]);
//!
//! let matches = Matcher::default().run(&a, &b);
//!
//! assert_eq!(matches.get("g1").map(|m| m.id_b()), Some("h1"));
//! assert_eq!(matches.unmatched(), &[String::from("g2")]);
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;

use omics::coordinate::position::Number;
use rust_lapper as lapper;
use tracing::debug;
use tracing::info;

use crate::annotation::Index;
use crate::annotation::index::Partition;
use crate::identity::IdentityMapping;
use crate::identity::MappingSource;

pub mod candidate;

pub use candidate::OverlapCandidate;
pub use candidate::overlap_fraction;
pub use candidate::overlap_length;

/// The default overlap-fraction threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// An interval within a partition's lookup structure, pointing back at the
/// position of the genomic interval within the partition.
type Iv = lapper::Interval<Number, usize>;

/// An error related to configuring a [`Matcher`].
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The threshold was not a finite value within `[0, 1)`.
    InvalidThreshold(f64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidThreshold(value) => write!(
                f,
                "invalid overlap threshold: expected a value within [0, 1), found {value}"
            ),
        }
    }
}

impl std::error::Error for Error {}

////////////////////////////////////////////////////////////////////////////////////////
// Matches
////////////////////////////////////////////////////////////////////////////////////////

/// An accepted counterpart for an interval in annotation A.
#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    /// The locus tag in annotation B.
    id_b: String,

    /// The number of shared positions.
    overlap_length: Number,

    /// The overlap as a fraction of the shorter interval.
    overlap_fraction: f64,
}

impl Match {
    /// Gets the locus tag in annotation B.
    pub fn id_b(&self) -> &str {
        &self.id_b
    }

    /// Gets the number of shared positions.
    pub fn overlap_length(&self) -> Number {
        self.overlap_length
    }

    /// Gets the overlap as a fraction of the shorter interval.
    pub fn overlap_fraction(&self) -> f64 {
        self.overlap_fraction
    }
}

/// The outcome of a matching pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Matches {
    /// The accepted matches, keyed by the locus tag in annotation A.
    matched: BTreeMap<String, Match>,

    /// The annotation A locus tags without an accepted match (sorted).
    unmatched: Vec<String>,
}

impl Matches {
    /// Gets the accepted match for a locus tag in annotation A.
    pub fn get(&self, id_a: &str) -> Option<&Match> {
        self.matched.get(id_a)
    }

    /// Gets an iterator over the accepted matches, ordered by the locus tag in
    /// annotation A.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Match)> {
        self.matched.iter().map(|(id_a, m)| (id_a.as_str(), m))
    }

    /// Gets the number of accepted matches.
    pub fn len(&self) -> usize {
        self.matched.len()
    }

    /// Returns whether no interval was matched.
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    /// Gets the sorted locus tags in annotation A that were not matched.
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    /// Converts the accepted matches into coordinate-derived
    /// [`IdentityMapping`]s, using the overlap fraction as the confidence.
    pub fn mappings(&self) -> impl Iterator<Item = IdentityMapping> + '_ {
        self.iter().map(|(id_a, m)| {
            IdentityMapping::new(id_a, m.id_b(), MappingSource::Coordinate, m.overlap_fraction())
        })
    }

    /// Merges the output of a single partition into `self`.
    fn extend(&mut self, other: Matches) {
        self.matched.extend(other.matched);
        self.unmatched.extend(other.unmatched);
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Matcher
////////////////////////////////////////////////////////////////////////////////////////

/// A coordinate-overlap matcher.
#[derive(Clone, Debug)]
pub struct Matcher {
    /// The overlap fraction a candidate must strictly exceed to be accepted.
    threshold: f64,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Matcher {
    /// Attempts to create a matcher with a custom overlap-fraction threshold.
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::matcher::Matcher;
    ///
    /// let matcher = Matcher::try_with_threshold(0.8)?;
    /// assert_eq!(matcher.threshold(), 0.8);
    ///
    /// assert!(Matcher::try_with_threshold(1.0).is_err());
    /// assert!(Matcher::try_with_threshold(f64::NAN).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_with_threshold(threshold: f64) -> Result<Self, Error> {
        if !threshold.is_finite() || !(0.0..1.0).contains(&threshold) {
            return Err(Error::InvalidThreshold(threshold));
        }

        Ok(Self { threshold })
    }

    /// Gets the overlap-fraction threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Matches every interval of annotation `a` against annotation `b`.
    ///
    /// Each `(sequence_id, strand)` partition of `a` is only ever compared
    /// with the partition of `b` under the same key. Partitions are
    /// independent and their outputs are simply unioned, as locus tags are
    /// unique within an annotation.
    pub fn run(&self, a: &Index, b: &Index) -> Matches {
        let mut matches = Matches::default();

        for (key, partition_a) in a.partitions() {
            let output = match b.partition(key) {
                Some(partition_b) => self.run_partition(partition_a, partition_b),
                None => Matches {
                    matched: BTreeMap::new(),
                    unmatched: partition_a
                        .iter()
                        .map(|interval| interval.locus_tag().to_string())
                        .collect(),
                },
            };

            debug!(
                "partition {key}: {} matched, {} unmatched",
                output.len(),
                output.unmatched().len()
            );

            matches.extend(output);
        }

        matches.unmatched.sort();

        info!(
            "coordinate matching: {} matched, {} unmatched",
            matches.len(),
            matches.unmatched.len()
        );

        matches
    }

    /// Matches the intervals of one partition of annotation A against the
    /// partition with the same key in annotation B.
    fn run_partition(&self, a: &Partition, b: &Partition) -> Matches {
        // Lookups are half-open. Interval ends are always below `Number::MAX`.
        let targets = b.iter().collect::<Vec<_>>();
        let lookup = lapper::Lapper::new(
            targets
                .iter()
                .enumerate()
                .map(|(i, interval)| Iv {
                    start: interval.start(),
                    stop: interval.end() + 1,
                    val: i,
                })
                .collect(),
        );

        let mut output = Matches::default();

        for interval in a.iter() {
            let best = lookup
                .find(interval.start(), interval.end() + 1)
                .map(|iv| OverlapCandidate::new(interval, targets[iv.val]))
                .filter(|candidate| candidate.overlap_length() > 0)
                .max_by(|x, y| x.preference(y));

            match best {
                Some(candidate) if candidate.overlap_fraction() > self.threshold => {
                    output.matched.insert(
                        interval.locus_tag().to_string(),
                        Match {
                            id_b: candidate.b().locus_tag().to_string(),
                            overlap_length: candidate.overlap_length(),
                            overlap_fraction: candidate.overlap_fraction(),
                        },
                    );
                }
                _ => output.unmatched.push(interval.locus_tag().to_string()),
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use omics::coordinate::Strand;

    use super::*;
    use crate::annotation::GenomicInterval;
    use crate::annotation::index::Builder;

    fn index(intervals: &[(&str, Number, Number, Strand, &str)]) -> Index {
        Builder::default().build_from_intervals(intervals.iter().map(
            |(seq, start, end, strand, tag)| {
                GenomicInterval::try_new(*seq, *start, *end, *strand, *tag).unwrap()
            },
        ))
    }

    #[test]
    fn test_end_to_end_scenario() {
        let a = index(&[
            ("chr1", 100, 200, Strand::Positive, "g1"),
            ("chr1", 300, 500, Strand::Positive, "g2"),
        ]);
        let b = index(&[
            ("chr1", 150, 210, Strand::Positive, "h1"),
            ("chr1", 305, 490, Strand::Negative, "h2"),
        ]);

        let matches = Matcher::default().run(&a, &b);

        let g1 = matches.get("g1").unwrap();
        assert_eq!(g1.id_b(), "h1");
        assert_eq!(g1.overlap_length(), 51);
        assert!(g1.overlap_fraction() > 0.5);

        assert!(matches.get("g2").is_none());
        assert_eq!(matches.unmatched(), &[String::from("g2")]);
    }

    #[test]
    fn test_strand_isolation() {
        let a = index(&[
            ("chr1", 100, 200, Strand::Positive, "p"),
            ("chr1", 100, 200, Strand::Negative, "n"),
        ]);
        let b = index(&[
            ("chr1", 100, 200, Strand::Negative, "h_neg"),
            ("chr2", 100, 200, Strand::Positive, "h_other_contig"),
        ]);

        let matches = Matcher::default().run(&a, &b);

        assert_eq!(matches.get("n").map(Match::id_b), Some("h_neg"));
        assert!(matches.get("p").is_none());
        assert_eq!(matches.unmatched(), &[String::from("p")]);
    }

    #[test]
    fn test_threshold_boundary_is_strict() {
        // Overlap of 50 positions over a shorter length of 100.
        let a = index(&[("chr1", 100, 199, Strand::Positive, "g")]);
        let b = index(&[("chr1", 150, 249, Strand::Positive, "h")]);
        let matches = Matcher::default().run(&a, &b);
        assert!(matches.is_empty());

        // Overlap of 50_002 positions over a shorter length of 100_000.
        let a = index(&[("chr1", 1, 100_000, Strand::Positive, "g")]);
        let b = index(&[("chr1", 49_999, 149_998, Strand::Positive, "h")]);
        let matches = Matcher::default().run(&a, &b);
        let m = matches.get("g").unwrap();
        assert_eq!(m.overlap_length(), 50_002);
        assert!(m.overlap_fraction() > 0.5);

        let a = index(&[("chr1", 1, 100_000, Strand::Positive, "g")]);
        let b = index(&[("chr1", 50_000, 149_999, Strand::Positive, "h")]);
        let matches = Matcher::default().run(&a, &b);
        assert_eq!(matches.get("g").unwrap().overlap_fraction(), 0.50001);
    }

    #[test]
    fn test_end_of_coordinate_space() -> Result<(), Box<dyn std::error::Error>> {
        let last = Number::MAX - 1;

        let a = index(&[("chr1", 10, last, Strand::Positive, "g1")]);
        let b = index(&[("chr1", 20, last, Strand::Positive, "h1")]);
        let matches = Matcher::default().run(&a, &b);
        assert_eq!(matches.get("g1").map(Match::id_b), Some("h1"));
        assert_eq!(matches.get("g1").map(Match::overlap_length), Some(last - 19));

        // A feature ending on the last representable position never reaches
        // the matcher: the record is rejected while the index is built.
        let line = format!("chr1\tsrc\tCDS\t10\t{}\t.\t+\t0\tlocus_tag=g1\n", Number::MAX);
        let a = Builder::default().try_build_from(crate::Reader::new(line.as_bytes()))?;
        assert!(a.is_empty());
        assert_eq!(a.summary().malformed(), 1);
        assert!(Matcher::default().run(&a, &b).is_empty());

        Ok(())
    }

    #[test]
    fn test_custom_threshold() -> Result<(), Box<dyn std::error::Error>> {
        let a = index(&[("chr1", 100, 199, Strand::Positive, "g")]);
        let b = index(&[("chr1", 130, 229, Strand::Positive, "h")]);

        assert_eq!(Matcher::default().run(&a, &b).len(), 1);
        assert!(Matcher::try_with_threshold(0.75)?.run(&a, &b).is_empty());

        Ok(())
    }

    #[test]
    fn test_best_overlap_wins() {
        let a = index(&[("chr1", 100, 300, Strand::Positive, "g")]);
        let b = index(&[
            ("chr1", 50, 160, Strand::Positive, "small"),
            ("chr1", 150, 320, Strand::Positive, "large"),
        ]);

        let matches = Matcher::default().run(&a, &b);
        assert_eq!(matches.get("g").map(Match::id_b), Some("large"));
    }

    #[test]
    fn test_deterministic_with_duplicate_intervals() {
        let a = index(&[
            ("chr1", 100, 199, Strand::Positive, "g2"),
            ("chr1", 100, 199, Strand::Positive, "g1"),
        ]);
        let b = index(&[
            ("chr1", 100, 199, Strand::Positive, "h3"),
            ("chr1", 100, 199, Strand::Positive, "h1"),
            ("chr1", 100, 199, Strand::Positive, "h2"),
        ]);

        let first = Matcher::default().run(&a, &b);
        let second = Matcher::default().run(&a, &b);

        assert_eq!(first, second);
        assert_eq!(
            format!("{:?}", first.iter().collect::<Vec<_>>()),
            format!("{:?}", second.iter().collect::<Vec<_>>())
        );
        assert_eq!(first.get("g1").map(Match::id_b), Some("h1"));
        assert_eq!(first.get("g2").map(Match::id_b), Some("h1"));
    }

    #[test]
    fn test_missing_partition_is_unmatched() {
        let a = index(&[
            ("chrX", 1, 10, Strand::Positive, "x2"),
            ("chrX", 20, 30, Strand::Positive, "x1"),
        ]);
        let b = index(&[("chr1", 1, 10, Strand::Positive, "h")]);

        let matches = Matcher::default().run(&a, &b);
        assert!(matches.is_empty());
        assert_eq!(
            matches.unmatched(),
            &[String::from("x1"), String::from("x2")]
        );
    }

    #[test]
    fn test_mappings_carry_coordinate_source() {
        let a = index(&[("chr1", 100, 199, Strand::Positive, "g")]);
        let b = index(&[("chr1", 100, 199, Strand::Positive, "h")]);

        let mappings = Matcher::default().run(&a, &b).mappings().collect::<Vec<_>>();
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].id_a(), "g");
        assert_eq!(mappings[0].id_b(), "h");
        assert_eq!(mappings[0].source(), MappingSource::Coordinate);
        assert_eq!(mappings[0].confidence(), 1.0);
    }
}
